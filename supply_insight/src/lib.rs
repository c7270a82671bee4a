mod config;
pub mod builder;
pub mod manual;
pub mod narrative;
pub mod responder;
pub mod scorecard;

use log::{debug, info};

use std::collections::HashMap;

pub use crate::config::*;

// **** Private structures ****

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
struct GroupId(u32);

/// Running totals per group. Keys are interned once and the insertion order
/// of first appearance is preserved.
struct GroupAccumulator {
    ids_by_key: HashMap<String, GroupId>,
    ordered_keys: Vec<(String, GroupId)>,
    sums: HashMap<GroupId, f64>,
}

impl GroupAccumulator {
    fn new() -> GroupAccumulator {
        GroupAccumulator {
            ids_by_key: HashMap::new(),
            ordered_keys: Vec::new(),
            sums: HashMap::new(),
        }
    }

    fn add(&mut self, key: &str, value: f64) {
        let gid = match self.ids_by_key.get(key) {
            Some(gid) => *gid,
            None => {
                let gid = GroupId(self.ordered_keys.len() as u32);
                self.ids_by_key.insert(key.to_string(), gid);
                self.ordered_keys.push((key.to_string(), gid));
                gid
            }
        };
        *self.sums.entry(gid).or_insert(0.0) += value;
    }

    fn into_sums(self) -> Vec<(String, f64)> {
        let sums = self.sums;
        self.ordered_keys
            .into_iter()
            .map(|(key, gid)| (key, *sums.get(&gid).unwrap_or(&0.0)))
            .collect()
    }
}

// **** Numeric coercion ****

/// Coerces one raw cell into a numeric value.
///
/// Textual values are trimmed and comma thousands separators are stripped
/// before parsing. Blank cells, whitespace-only cells and the usual textual
/// missing-value markers (`NaN`, `NA`, `N/A`, `null`, case-insensitive) map
/// to `None`, as does any value that fails to parse. This function never
/// errors.
pub fn coerce_value(value: &CellValue) -> Option<f64> {
    match value {
        CellValue::Number(x) if x.is_nan() => None,
        CellValue::Number(x) => Some(*x),
        CellValue::Empty => None,
        CellValue::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() || is_missing_marker(trimmed) {
                return None;
            }
            trimmed.replace(',', "").parse::<f64>().ok()
        }
    }
}

/// Applies [coerce_value] to a whole column, keeping the length.
pub fn coerce_column(values: &[CellValue]) -> Vec<Option<f64>> {
    values.iter().map(coerce_value).collect()
}

fn is_missing_marker(s: &str) -> bool {
    matches!(
        s.to_lowercase().as_str(),
        "nan" | "na" | "n/a" | "null" | "none"
    )
}

// **** Group aggregation ****

/// Groups the rows of `table` by the `dimension` column, sums the coerced
/// `measure` column per group and derives a z-score and outlier flag for
/// every group.
///
/// Arguments:
/// * `table` the source table
/// * `dimension` name of the categorical column used to group rows
/// * `measure` name of the numeric column summed per group
/// * `options` thresholds governing the outlier flags
///
/// Rows whose measure value has no numeric reading are dropped before
/// grouping. A table with zero rows, or with zero coercible measure values,
/// yields an empty [Aggregation] rather than an error. Requesting a column
/// that is not in the header fails with [InsightError::UnknownColumn].
pub fn aggregate(
    table: &Table,
    dimension: &str,
    measure: &str,
    options: &AggregationOptions,
) -> Result<Aggregation, InsightError> {
    let dim_idx = table
        .column_index(dimension)
        .ok_or(InsightError::UnknownColumn {
            column: dimension.to_string(),
        })?;
    let measure_idx = table
        .column_index(measure)
        .ok_or(InsightError::UnknownColumn {
            column: measure.to_string(),
        })?;

    info!(
        "aggregate: {} rows, dimension: {:?}, measure: {:?}",
        table.num_rows(),
        dimension,
        measure
    );

    let mut acc = GroupAccumulator::new();
    let mut rows_used: usize = 0;
    let mut rows_dropped: usize = 0;
    for row in table.rows() {
        match row.get(measure_idx).and_then(coerce_value) {
            Some(value) => {
                let key = row[dim_idx].as_dimension();
                acc.add(&key, value);
                rows_used += 1;
            }
            None => {
                rows_dropped += 1;
            }
        }
    }
    debug!(
        "aggregate: rows used: {:?}, rows dropped: {:?}",
        rows_used, rows_dropped
    );

    let sums = acc.into_sums();
    let (mean, std_dev) = population_stats(&sums);
    debug!("aggregate: mean: {:?}, std_dev: {:?}", mean, std_dev);

    let threshold = options.anomaly_threshold;
    let groups: Vec<GroupStat> = sums
        .into_iter()
        .map(|(key, sum)| {
            let deviation = sum - mean;
            // Divisor 1 in the degenerate zero-variance case: the z-score
            // then equals the raw deviation, which is itself zero.
            let z_score = if std_dev != 0.0 {
                deviation / std_dev
            } else {
                deviation
            };
            let flag = if z_score > threshold {
                AnomalyFlag::High
            } else if z_score < -threshold {
                AnomalyFlag::Low
            } else {
                AnomalyFlag::None
            };
            GroupStat {
                key,
                sum,
                z_score,
                flag,
            }
        })
        .collect();

    Ok(Aggregation {
        groups,
        mean,
        std_dev,
        rows_used,
        rows_dropped,
    })
}

/// Mean and population standard deviation (ddof = 0) of the group sums.
fn population_stats(sums: &[(String, f64)]) -> (f64, f64) {
    if sums.is_empty() {
        return (0.0, 0.0);
    }
    let n = sums.len() as f64;
    let mean = sums.iter().map(|(_, s)| *s).sum::<f64>() / n;
    let variance = sums
        .iter()
        .map(|(_, s)| (s - mean) * (s - mean))
        .sum::<f64>()
        / n;
    (mean, variance.sqrt())
}

#[cfg(test)]
mod tests {
    use crate::builder::TableBuilder;
    use crate::*;

    fn district_table(rows: &[(&str, &str)]) -> Table {
        let mut builder =
            TableBuilder::new(&["district".to_string(), "card_count".to_string()]);
        for (district, count) in rows {
            builder.push_text_row(&[district.to_string(), count.to_string()]);
        }
        builder.build()
    }

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn coerce_strips_thousands_separators() {
        assert_eq!(coerce_value(&text("12,345")), Some(12345.0));
        assert_eq!(coerce_value(&text("1,234,567.5")), Some(1234567.5));
    }

    #[test]
    fn coerce_blank_and_missing_markers() {
        for s in ["", "   ", "NaN", "nan", "NA", "n/a", "null"] {
            assert_eq!(coerce_value(&text(s)), None, "input {:?}", s);
        }
        assert_eq!(coerce_value(&CellValue::Empty), None);
    }

    #[test]
    fn coerce_unparseable_text_is_no_value() {
        assert_eq!(coerce_value(&text("twelve")), None);
        assert_eq!(coerce_value(&text("12a")), None);
    }

    #[test]
    fn coerce_numeric_cells() {
        assert_eq!(coerce_value(&CellValue::Number(4.5)), Some(4.5));
        assert_eq!(coerce_value(&CellValue::Number(f64::NAN)), None);
    }

    #[test]
    fn coerce_column_keeps_length() {
        let column = vec![text("1"), CellValue::Empty, text("oops"), text("2,000")];
        assert_eq!(
            coerce_column(&column),
            vec![Some(1.0), None, None, Some(2000.0)]
        );
    }

    #[test]
    fn sums_are_conserved() {
        let table = district_table(&[
            ("Guntur", "1,000"),
            ("Krishna", "250"),
            ("Guntur", "500"),
            ("Prakasam", "n/a"),
            ("Krishna", ""),
        ]);
        let agg =
            aggregate(&table, "district", "card_count", &AggregationOptions::DEFAULT).unwrap();
        assert_eq!(agg.total(), 1750.0);
        assert_eq!(agg.rows_used, 3);
        assert_eq!(agg.rows_dropped, 2);
    }

    #[test]
    fn groups_keep_first_appearance_order() {
        let table = district_table(&[("B", "1"), ("A", "2"), ("B", "3")]);
        let agg =
            aggregate(&table, "district", "card_count", &AggregationOptions::DEFAULT).unwrap();
        let keys: Vec<&str> = agg.groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["B", "A"]);
        assert_eq!(agg.groups[0].sum, 4.0);
    }

    #[test]
    fn zero_variance_means_zero_z_scores() {
        let table = district_table(&[("A", "10"), ("B", "10"), ("C", "10")]);
        let agg =
            aggregate(&table, "district", "card_count", &AggregationOptions::DEFAULT).unwrap();
        assert_eq!(agg.std_dev, 0.0);
        for g in &agg.groups {
            assert_eq!(g.z_score, 0.0);
            assert_eq!(g.flag, AnomalyFlag::None);
        }
    }

    #[test]
    fn dominant_group_is_flagged_high() {
        // With five unit groups and one dominant one, the dominant z-score
        // is sqrt(5) > 2 under the population standard deviation.
        let table = district_table(&[
            ("A", "1"),
            ("B", "1"),
            ("C", "1"),
            ("D", "1"),
            ("E", "1"),
            ("F", "100"),
        ]);
        let agg =
            aggregate(&table, "district", "card_count", &AggregationOptions::DEFAULT).unwrap();
        for g in &agg.groups {
            if g.key == "F" {
                assert!(g.z_score > 2.0, "z was {}", g.z_score);
                assert_eq!(g.flag, AnomalyFlag::High);
            } else {
                assert_eq!(g.flag, AnomalyFlag::None);
            }
        }
        assert_eq!(agg.high_anomalies().len(), 1);
        assert!(agg.low_anomalies().is_empty());
    }

    #[test]
    fn threshold_is_configurable() {
        // Four groups cap the population z-score at sqrt(3), so the
        // dominant group only trips a lowered threshold.
        let table =
            district_table(&[("A", "1"), ("B", "1"), ("C", "1"), ("D", "100")]);
        let strict =
            aggregate(&table, "district", "card_count", &AggregationOptions::DEFAULT).unwrap();
        assert!(strict.anomalies().is_empty());

        let options = AggregationOptions {
            anomaly_threshold: 1.5,
        };
        let relaxed = aggregate(&table, "district", "card_count", &options).unwrap();
        let flagged: Vec<&str> = relaxed
            .anomalies()
            .iter()
            .map(|g| g.key.as_str())
            .collect();
        assert_eq!(flagged, vec!["D"]);
    }

    #[test]
    fn unknown_column_is_an_error() {
        let table = district_table(&[("A", "1")]);
        let res = aggregate(&table, "district", "bogus", &AggregationOptions::DEFAULT);
        assert_eq!(
            res,
            Err(InsightError::UnknownColumn {
                column: "bogus".to_string()
            })
        );
        let res = aggregate(&table, "bogus", "card_count", &AggregationOptions::DEFAULT);
        assert!(res.is_err());
    }

    #[test]
    fn empty_table_yields_empty_aggregation() {
        let table = district_table(&[]);
        let agg =
            aggregate(&table, "district", "card_count", &AggregationOptions::DEFAULT).unwrap();
        assert!(agg.is_empty());
        assert_eq!(agg.mean, 0.0);
        assert_eq!(agg.std_dev, 0.0);
    }

    #[test]
    fn uncoercible_measure_yields_empty_aggregation() {
        let table = district_table(&[("A", "x"), ("B", ""), ("C", "NaN")]);
        let agg =
            aggregate(&table, "district", "card_count", &AggregationOptions::DEFAULT).unwrap();
        assert!(agg.is_empty());
        assert_eq!(agg.rows_dropped, 3);
    }

    #[test]
    fn top_and_bottom_views_are_sorted() {
        let table = district_table(&[
            ("A", "30"),
            ("B", "10"),
            ("C", "50"),
            ("D", "20"),
        ]);
        let agg =
            aggregate(&table, "district", "card_count", &AggregationOptions::DEFAULT).unwrap();
        let top: Vec<&str> = agg.top(2).iter().map(|g| g.key.as_str()).collect();
        assert_eq!(top, vec!["C", "A"]);
        let bottom: Vec<&str> = agg.bottom(2).iter().map(|g| g.key.as_str()).collect();
        assert_eq!(bottom, vec!["B", "D"]);
        // Larger n than groups is not an error.
        assert_eq!(agg.top(10).len(), 4);
    }

    #[test]
    fn anomalies_are_sorted_by_magnitude() {
        let table = district_table(&[
            ("A", "100"),
            ("B", "-80"),
            ("C", "0"),
            ("D", "5"),
            ("E", "-5"),
            ("F", "2"),
        ]);
        let options = AggregationOptions {
            anomaly_threshold: 1.0,
        };
        let agg = aggregate(&table, "district", "card_count", &options).unwrap();
        let anomalies = agg.anomalies();
        for pair in anomalies.windows(2) {
            assert!(pair[0].z_score.abs() >= pair[1].z_score.abs());
        }
    }

    #[test]
    fn numeric_dimension_cells_group_by_rendering() {
        let mut builder = TableBuilder::new(&["ward".to_string(), "count".to_string()]);
        builder.push_row(vec![CellValue::Number(14.0), text("3")]);
        builder.push_row(vec![text("14"), text("4")]);
        let table = builder.build();
        let agg = aggregate(&table, "ward", "count", &AggregationOptions::DEFAULT).unwrap();
        assert_eq!(agg.groups.len(), 1);
        assert_eq!(agg.groups[0].sum, 7.0);
    }
}
