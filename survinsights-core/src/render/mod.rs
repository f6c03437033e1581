//! Render layer: turns finished result tables into line charts.
//!
//! Chart construction is pure; drawing is delegated to a [`ChartSink`].
//! [`SvgSink`] is the bundled sink.

pub mod charts;
pub mod colormap;
pub mod svg;

pub use charts::{AleCurve, accumulate_ale, ale_chart, pdp_chart, pfi_chart};
pub use colormap::Rgb;
pub use svg::SvgSink;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::global::{AleTable, PdpTable, PfiTable};

/// One polyline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub color: Rgb,
    pub points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LegendPosition {
    UpperRight,
    LowerLeft,
}

/// How series are identified on the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Legend {
    /// Named entries, laid out in `columns` columns.
    Entries {
        position: LegendPosition,
        columns: usize,
    },
    /// Continuous colour scale mapping `min..=max` through the BrBG colormap.
    Colorbar { label: String, min: f64, max: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Fixed y-axis range; fitted to the data when `None`.
    pub y_range: Option<(f64, f64)>,
    pub legend: Legend,
    pub series: Vec<Series>,
}

/// Destination for finished charts.
pub trait ChartSink {
    fn draw(&mut self, chart: &Chart) -> Result<()>;
}

pub fn plot_pdp(table: &PdpTable, sink: &mut dyn ChartSink) -> Result<()> {
    sink.draw(&pdp_chart(table))
}

pub fn plot_pfi(table: &PfiTable, sink: &mut dyn ChartSink) -> Result<()> {
    sink.draw(&pfi_chart(table))
}

pub fn plot_ale(table: &AleTable, sink: &mut dyn ChartSink) -> Result<()> {
    sink.draw(&ale_chart(table))
}
