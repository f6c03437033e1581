//! Chart builders for each result table.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::colormap::{brbg, categorical, normalize};
use super::{Chart, Legend, LegendPosition, Series};
use crate::global::{AleTable, PdpTable, PfiTable};
use crate::prediction::OutputType;

fn y_label(output_type: OutputType) -> &'static str {
    match output_type {
        OutputType::Survival => "Survival prediction",
        OutputType::Risk => "Risk prediction",
        OutputType::Chf => "Cumulative hazard",
    }
}

/// One line per evaluation time over the feature grid, coloured by time.
pub fn pdp_chart(table: &PdpTable) -> Chart {
    let times = table.times();
    let shades = normalize(&times);
    let series = times
        .iter()
        .zip(&shades)
        .map(|(&t, &shade)| Series {
            name: format!("t={t}"),
            color: brbg(shade),
            points: table
                .rows
                .iter()
                .filter(|r| r.time == t)
                .map(|r| (r.x, r.pred))
                .collect(),
        })
        .collect();

    Chart {
        title: format!("PDP for feature {}", table.feature),
        x_label: String::new(),
        y_label: y_label(table.output_type).to_string(),
        y_range: table.output_type.is_probability().then_some((0.0, 1.0)),
        legend: Legend::Colorbar {
            label: "Time".to_string(),
            min: times.first().copied().unwrap_or(0.0),
            max: times.last().copied().unwrap_or(0.0),
        },
        series,
    }
}

/// One line per feature over time.
pub fn pfi_chart(table: &PfiTable) -> Chart {
    let series = table
        .features()
        .into_iter()
        .enumerate()
        .map(|(i, feature)| Series {
            name: feature.to_string(),
            color: categorical(i),
            points: table
                .rows
                .iter()
                .filter(|r| r.feature == feature)
                .map(|r| (r.time, r.perf))
                .collect(),
        })
        .collect();

    Chart {
        title: "Permutation feature importance".to_string(),
        x_label: "Times".to_string(),
        y_label: String::new(),
        y_range: None,
        legend: Legend::Entries {
            position: LegendPosition::LowerLeft,
            columns: 3,
        },
        series,
    }
}

/// Accumulated effect curve up to and including one bin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AleCurve {
    pub group: usize,
    pub group_value: f64,
    /// `(time, accumulated effect)`, ascending in time.
    pub points: Vec<(f64, f64)>,
}

/// Running sum of per-bin local effects: the curve for bin `g` holds, per
/// time, the sum over all bins `<= g`.
pub fn accumulate_ale(table: &AleTable) -> Vec<AleCurve> {
    let mut by_group: BTreeMap<usize, (f64, Vec<(f64, f64)>)> = BTreeMap::new();
    for row in &table.rows {
        by_group
            .entry(row.group)
            .or_insert_with(|| (row.group_value, Vec::new()))
            .1
            .push((row.time, row.pred));
    }

    let times = table.times();
    let mut running = vec![0.0; times.len()];
    let mut curves = Vec::with_capacity(by_group.len());
    for (group, (group_value, effects)) in by_group {
        for (time, pred) in effects {
            if let Ok(k) = times.binary_search_by(|t| t.total_cmp(&time)) {
                running[k] += pred;
            }
        }
        curves.push(AleCurve {
            group,
            group_value,
            points: times.iter().copied().zip(running.iter().copied()).collect(),
        });
    }
    curves
}

/// Accumulated curves over time, coloured by the bin's lower edge.
pub fn ale_chart(table: &AleTable) -> Chart {
    let curves = accumulate_ale(table);
    let values: Vec<f64> = curves.iter().map(|c| c.group_value).collect();
    let shades = normalize(&values);
    let series = curves
        .into_iter()
        .zip(shades)
        .map(|(curve, shade)| Series {
            name: format!("{}<={}", table.feature, curve.group_value),
            color: brbg(shade),
            points: curve.points,
        })
        .collect();

    Chart {
        title: "Accumulated local effects".to_string(),
        x_label: "Time".to_string(),
        y_label: String::new(),
        y_range: None,
        legend: Legend::Colorbar {
            label: table.feature.clone(),
            min: values.first().copied().unwrap_or(0.0),
            max: values.last().copied().unwrap_or(0.0),
        },
        series,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::global::{AleRow, PdpRow, PfiRow, ScoringType};
    use crate::performance::Metric;
    use pretty_assertions::assert_eq;

    fn ale_table() -> AleTable {
        let row = |group, time, pred| AleRow {
            group,
            time,
            pred,
            group_value: group as f64 * 10.0,
        };
        AleTable {
            feature: "x0".into(),
            output_type: OutputType::Survival,
            breakpoints: vec![0.0, 10.0, 20.0, 30.0],
            rows: vec![
                row(0, 1.0, -0.1),
                row(0, 2.0, -0.2),
                row(1, 1.0, -0.3),
                row(1, 2.0, -0.1),
                row(2, 1.0, 0.05),
                row(2, 2.0, 0.0),
            ],
        }
    }

    #[test]
    fn test_accumulate_ale_running_sum() {
        let curves = accumulate_ale(&ale_table());
        assert_eq!(curves.len(), 3);
        assert_eq!(curves[0].points, vec![(1.0, -0.1), (2.0, -0.2)]);
        let second: Vec<f64> = curves[1].points.iter().map(|p| p.1).collect();
        assert!((second[0] + 0.4).abs() < 1e-12);
        assert!((second[1] + 0.3).abs() < 1e-12);
        let third: Vec<f64> = curves[2].points.iter().map(|p| p.1).collect();
        assert!((third[0] + 0.35).abs() < 1e-12);
        assert!((third[1] + 0.3).abs() < 1e-12);
        assert_eq!(curves[2].group_value, 20.0);
    }

    #[test]
    fn test_pdp_chart_one_series_per_time() {
        let rows = [1.0, 2.0]
            .iter()
            .flat_map(|&x| {
                [5.0, 10.0].map(|time| PdpRow {
                    x,
                    time,
                    pred: 0.5,
                })
            })
            .collect();
        let table = PdpTable {
            feature: "age".into(),
            output_type: OutputType::Survival,
            rows,
        };
        let chart = pdp_chart(&table);
        assert_eq!(chart.series.len(), 2);
        assert_eq!(chart.series[0].points, vec![(1.0, 0.5), (2.0, 0.5)]);
        assert_eq!(chart.y_range, Some((0.0, 1.0)));
        assert_eq!(chart.title, "PDP for feature age");
        assert_ne!(chart.series[0].color, chart.series[1].color);
    }

    #[test]
    fn test_pfi_chart_one_series_per_feature() {
        let table = PfiTable {
            loss: Metric::BrierScore,
            scoring: ScoringType::Ratio,
            rows: vec![
                PfiRow {
                    feature: "a".into(),
                    time: 1.0,
                    perf: 0.9,
                },
                PfiRow {
                    feature: "b".into(),
                    time: 1.0,
                    perf: 1.0,
                },
            ],
        };
        let chart = pfi_chart(&table);
        let names: Vec<&str> = chart.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(matches!(
            chart.legend,
            Legend::Entries {
                position: LegendPosition::LowerLeft,
                columns: 3
            }
        ));
    }
}
