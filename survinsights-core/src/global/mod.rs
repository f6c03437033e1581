//! Global explanations: partial dependence, permutation importance and
//! accumulated local effects.

pub mod ale;
pub mod grouping;
pub mod pdp;
pub mod pfi;
pub mod unsupported;

pub use ale::{AleBinning, AleOptions, AleRow, AleTable, N_BINS, compute_ale, compute_ale_with};
pub use grouping::GroupedMean;
pub use pdp::{PdpOptions, PdpRow, PdpTable, compute_pdp};
pub use pfi::{PfiOptions, PfiRow, PfiTable, ScoringType, compute_pfi, compute_pfi_with_rng};
pub use unsupported::{feature_interaction, functional_decomposition};
