// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// One cell of a loaded table.
///
/// Cells keep whatever shape the file reader produced. Coercion to a
/// numeric value only happens when a column is used as a measure, see
/// [crate::coerce_value].
#[derive(PartialEq, Debug, Clone)]
pub enum CellValue {
    /// Textual content, including numbers that arrived as text
    /// (possibly with thousands separators).
    Text(String),
    /// A value that was already numeric in the source file.
    Number(f64),
    /// A missing cell.
    Empty,
}

impl CellValue {
    /// The string rendering used when the cell acts as a grouping key.
    pub fn as_dimension(&self) -> String {
        match self {
            CellValue::Text(s) => s.trim().to_string(),
            CellValue::Number(x) => format!("{}", x),
            CellValue::Empty => String::new(),
        }
    }
}

/// An immutable table: a header naming the columns, plus data rows.
///
/// Tables are loaded once per dataset and never mutated afterwards. There is
/// no fixed schema beyond "header + rows": callers pick the dimension and
/// measure columns by name and validate them against [Table::column_index]
/// at call time.
#[derive(PartialEq, Debug, Clone)]
pub struct Table {
    pub(crate) columns: Vec<String>,
    pub(crate) rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// The column names, in file order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// The position of a column in the header, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ******** Output data structures *********

/// Outlier flag derived from a group's z-score.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum AnomalyFlag {
    None,
    High,
    Low,
}

/// One aggregated group: the dimension key, the summed measure and the
/// statistics derived from it.
#[derive(PartialEq, Debug, Clone)]
pub struct GroupStat {
    pub key: String,
    pub sum: f64,
    pub z_score: f64,
    pub flag: AnomalyFlag,
}

/// The result of aggregating one measure column over one dimension column.
///
/// `groups` keeps the insertion order of first appearance in the source
/// table. The order is not significant to correctness; the sorted
/// presentations are derived views ([Aggregation::top],
/// [Aggregation::bottom], [Aggregation::anomalies]).
#[derive(PartialEq, Debug, Clone)]
pub struct Aggregation {
    pub groups: Vec<GroupStat>,
    /// Mean of the group sums.
    pub mean: f64,
    /// Population standard deviation (ddof = 0) of the group sums.
    pub std_dev: f64,
    /// Rows whose measure value was coercible and entered a group sum.
    pub rows_used: usize,
    /// Rows dropped because the measure value had no numeric reading.
    pub rows_dropped: usize,
}

impl Aggregation {
    /// True when no row carried a coercible measure value.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Sum over all group sums. Equals the sum of every coercible measure
    /// value in the source table.
    pub fn total(&self) -> f64 {
        self.groups.iter().map(|g| g.sum).sum()
    }

    /// The `n` largest groups by sum, descending. Ties break on the key so
    /// the view is deterministic.
    pub fn top(&self, n: usize) -> Vec<&GroupStat> {
        let mut sorted = self.sorted_by_sum();
        sorted.reverse();
        sorted.truncate(n);
        sorted
    }

    /// The `n` smallest groups by sum, ascending.
    pub fn bottom(&self, n: usize) -> Vec<&GroupStat> {
        let mut sorted = self.sorted_by_sum();
        sorted.truncate(n);
        sorted
    }

    /// Every flagged group, sorted by decreasing z-score magnitude.
    pub fn anomalies(&self) -> Vec<&GroupStat> {
        let mut flagged: Vec<&GroupStat> = self
            .groups
            .iter()
            .filter(|g| g.flag != AnomalyFlag::None)
            .collect();
        flagged.sort_by(|a, b| {
            b.z_score
                .abs()
                .partial_cmp(&a.z_score.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.key.cmp(&b.key))
        });
        flagged
    }

    pub fn high_anomalies(&self) -> Vec<&GroupStat> {
        self.anomalies()
            .into_iter()
            .filter(|g| g.flag == AnomalyFlag::High)
            .collect()
    }

    pub fn low_anomalies(&self) -> Vec<&GroupStat> {
        self.anomalies()
            .into_iter()
            .filter(|g| g.flag == AnomalyFlag::Low)
            .collect()
    }

    fn sorted_by_sum(&self) -> Vec<&GroupStat> {
        let mut sorted: Vec<&GroupStat> = self.groups.iter().collect();
        sorted.sort_by(|a, b| {
            a.sum
                .partial_cmp(&b.sum)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.key.cmp(&b.key))
        });
        sorted
    }
}

/// Errors that prevent an aggregation from completing.
///
/// Missing or uncoercible cell values are not errors: they are dropped
/// silently and only reflected in [Aggregation::rows_dropped].
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum InsightError {
    /// The requested column is not present in the table header. Callers are
    /// expected to restrict selectable columns to [Table::columns].
    UnknownColumn { column: String },
}

impl Error for InsightError {}

impl Display for InsightError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InsightError::UnknownColumn { column } => {
                write!(f, "unknown column: {}", column)
            }
        }
    }
}

// ********* Configuration **********

/// Tuning knobs for the aggregation.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct AggregationOptions {
    /// A group is flagged [AnomalyFlag::High] when its z-score exceeds this
    /// threshold, [AnomalyFlag::Low] below the negated threshold.
    pub anomaly_threshold: f64,
}

impl AggregationOptions {
    pub const DEFAULT: AggregationOptions = AggregationOptions {
        anomaly_threshold: 2.0,
    };
}
