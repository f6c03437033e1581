//! Local (per-observation) explanations.

pub mod ice;

pub use ice::{IceOptions, IceRecord, IceTable, individual_conditional_expectation};
