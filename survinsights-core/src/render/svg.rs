//! Standalone SVG line-chart sink.

use std::fmt::{self, Write as _};
use std::io;

use super::colormap::brbg;
use super::{Chart, ChartSink, Legend, LegendPosition};
use crate::error::{ExplainError, Result};

const WIDTH: f64 = 900.0;
const HEIGHT: f64 = 500.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 110.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 60.0;
const TICKS: usize = 5;

/// Writes each drawn chart as one SVG document to `W`.
pub struct SvgSink<W> {
    out: W,
}

impl<W: io::Write> SvgSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

struct Frame {
    x: (f64, f64),
    y: (f64, f64),
}

impl Frame {
    fn fit(chart: &Chart) -> Result<Self> {
        let points = chart.series.iter().flat_map(|s| s.points.iter());
        let (mut x_lo, mut x_hi, mut y_lo, mut y_hi) =
            (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY);
        for &(x, y) in points.filter(|(x, y)| x.is_finite() && y.is_finite()) {
            x_lo = x_lo.min(x);
            x_hi = x_hi.max(x);
            y_lo = y_lo.min(y);
            y_hi = y_hi.max(y);
        }
        if !x_lo.is_finite() {
            return Err(ExplainError::render(format!(
                "chart {:?} has no finite points",
                chart.title
            )));
        }
        let y = chart.y_range.unwrap_or((y_lo, y_hi));
        Ok(Self {
            x: pad(x_lo, x_hi),
            y: pad(y.0, y.1),
        })
    }

    fn px(&self, x: f64) -> f64 {
        MARGIN_LEFT + (x - self.x.0) / (self.x.1 - self.x.0) * (WIDTH - MARGIN_LEFT - MARGIN_RIGHT)
    }

    fn py(&self, y: f64) -> f64 {
        HEIGHT - MARGIN_BOTTOM - (y - self.y.0) / (self.y.1 - self.y.0) * (HEIGHT - MARGIN_TOP - MARGIN_BOTTOM)
    }
}

/// Widen a degenerate range so it can be scaled.
fn pad(lo: f64, hi: f64) -> (f64, f64) {
    if hi > lo { (lo, hi) } else { (lo - 0.5, hi + 0.5) }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Render `chart` as an SVG document.
pub fn to_svg(chart: &Chart) -> Result<String> {
    let frame = Frame::fit(chart)?;
    let mut svg = String::new();
    write_document(&mut svg, chart, &frame)
        .map_err(|e| ExplainError::render(format!("formatting chart {:?}: {e}", chart.title)))?;
    Ok(svg)
}

fn write_document(svg: &mut String, chart: &Chart, frame: &Frame) -> fmt::Result {
    writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" font-family="serif" font-size="13">"#
    )?;
    writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#)?;
    writeln!(
        svg,
        r#"<rect x="{MARGIN_LEFT}" y="{MARGIN_TOP}" width="{}" height="{}" fill="none" stroke="black" stroke-width="2"/>"#,
        WIDTH - MARGIN_LEFT - MARGIN_RIGHT,
        HEIGHT - MARGIN_TOP - MARGIN_BOTTOM
    )?;

    for i in 0..=TICKS {
        let f = i as f64 / TICKS as f64;
        let xv = frame.x.0 + f * (frame.x.1 - frame.x.0);
        let yv = frame.y.0 + f * (frame.y.1 - frame.y.0);
        writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="middle">{}</text>"#,
            frame.px(xv),
            HEIGHT - MARGIN_BOTTOM + 18.0,
            format_tick(xv)
        )?;
        writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="end">{}</text>"#,
            MARGIN_LEFT - 6.0,
            frame.py(yv) + 4.0,
            format_tick(yv)
        )?;
    }

    for series in &chart.series {
        let path: Vec<String> = series
            .points
            .iter()
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .map(|&(x, y)| format!("{:.2},{:.2}", frame.px(x), frame.py(y)))
            .collect();
        writeln!(
            svg,
            r#"<polyline fill="none" stroke="{}" stroke-width="2" points="{}"><title>{}</title></polyline>"#,
            series.color,
            path.join(" "),
            escape(&series.name)
        )?;
    }

    match &chart.legend {
        Legend::Entries { position, columns } => {
            let columns = (*columns).max(1);
            let (x0, y0) = match position {
                LegendPosition::UpperRight => (WIDTH - MARGIN_RIGHT - 120.0 * columns as f64, MARGIN_TOP + 16.0),
                LegendPosition::LowerLeft => {
                    let rows = chart.series.len().div_ceil(columns);
                    (MARGIN_LEFT + 10.0, HEIGHT - MARGIN_BOTTOM - 16.0 * rows as f64)
                }
            };
            for (i, series) in chart.series.iter().enumerate() {
                let x = x0 + 120.0 * (i % columns) as f64;
                let y = y0 + 16.0 * (i / columns) as f64;
                writeln!(
                    svg,
                    r#"<line x1="{x:.1}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="{}" stroke-width="2"/><text x="{:.1}" y="{:.1}">{}</text>"#,
                    x + 18.0,
                    series.color,
                    x + 22.0,
                    y + 4.0,
                    escape(&series.name)
                )?;
            }
        }
        Legend::Colorbar { label, min, max } => {
            let x = WIDTH - MARGIN_RIGHT + 30.0;
            let steps = 20;
            let height = (HEIGHT - MARGIN_TOP - MARGIN_BOTTOM) / steps as f64;
            for i in 0..steps {
                let shade = 1.0 - i as f64 / (steps - 1) as f64;
                writeln!(
                    svg,
                    r#"<rect x="{x:.1}" y="{:.1}" width="16" height="{:.1}" fill="{}"/>"#,
                    MARGIN_TOP + i as f64 * height,
                    height + 0.5,
                    brbg(shade)
                )?;
            }
            writeln!(
                svg,
                r#"<text x="{:.1}" y="{:.1}">{}</text><text x="{:.1}" y="{:.1}">{}</text><text x="{:.1}" y="{:.1}">{}</text>"#,
                x + 20.0,
                MARGIN_TOP + 10.0,
                format_tick(*max),
                x + 20.0,
                HEIGHT - MARGIN_BOTTOM,
                format_tick(*min),
                x,
                MARGIN_TOP - 8.0,
                escape(label)
            )?;
        }
    }

    writeln!(
        svg,
        r#"<text x="{:.1}" y="28" text-anchor="middle" font-size="17">{}</text>"#,
        WIDTH / 2.0,
        escape(&chart.title)
    )?;
    writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" text-anchor="middle">{}</text>"#,
        (MARGIN_LEFT + WIDTH - MARGIN_RIGHT) / 2.0,
        HEIGHT - 15.0,
        escape(&chart.x_label)
    )?;
    writeln!(
        svg,
        r#"<text transform="translate(18,{:.1}) rotate(-90)" text-anchor="middle">{}</text>"#,
        HEIGHT / 2.0,
        escape(&chart.y_label)
    )?;
    svg.write_str("</svg>\n")
}

fn format_tick(v: f64) -> String {
    if v.abs() >= 100.0 || v == v.trunc() {
        format!("{v:.0}")
    } else {
        format!("{v:.2}")
    }
}

impl<W: io::Write> ChartSink for SvgSink<W> {
    fn draw(&mut self, chart: &Chart) -> Result<()> {
        let svg = to_svg(chart)?;
        self.out.write_all(svg.as_bytes())?;
        self.out.flush()?;
        tracing::debug!(title = %chart.title, series = chart.series.len(), "chart written");
        Ok(())
    }
}
