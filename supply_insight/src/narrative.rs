//! Deterministic narrative lines over an aggregation result.
//!
//! Pure string interpolation of values the aggregation already computed;
//! callers render the lines as-is next to the tables and charts.

use crate::config::*;

/// Assembles the insight lines for one aggregation.
///
/// `label` names the dataset, `dimension` and `measure` are the column
/// names the aggregation ran over.
pub fn summarize(
    label: &str,
    dimension: &str,
    measure: &str,
    agg: &Aggregation,
) -> Vec<String> {
    if agg.is_empty() {
        return vec![format!("{}: no numeric data to display.", label)];
    }

    let mut lines: Vec<String> = Vec::new();
    lines.push(format!(
        "{}: {} {} groups total {:.2} {}.",
        label,
        agg.groups.len(),
        dimension,
        agg.total(),
        measure
    ));

    if let Some(top) = agg.top(1).first() {
        lines.push(format!(
            "Highest {}: {} with {:.2}.",
            measure, top.key, top.sum
        ));
    }
    if let Some(bottom) = agg.bottom(1).first() {
        lines.push(format!(
            "Lowest {}: {} with {:.2}.",
            measure, bottom.key, bottom.sum
        ));
    }

    for g in agg.anomalies() {
        let direction = match g.flag {
            AnomalyFlag::High => "above",
            AnomalyFlag::Low => "below",
            AnomalyFlag::None => continue,
        };
        lines.push(format!(
            "{} sits {:.2} standard deviations {} the mean of {:.2}.",
            g.key,
            g.z_score.abs(),
            direction,
            agg.mean
        ));
    }
    lines
}
