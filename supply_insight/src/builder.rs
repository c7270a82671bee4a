pub use crate::config::*;

/// A builder for assembling tables row by row.
///
/// Readers push rows as they parse them; the builder normalizes every row
/// to the header width before the table is sealed.
///
/// ```
/// use supply_insight::builder::TableBuilder;
///
/// let mut builder = TableBuilder::new(&[
///     "district".to_string(),
///     "card_count".to_string(),
/// ]);
/// builder.push_text_row(&["Guntur".to_string(), "12,345".to_string()]);
/// let table = builder.build();
///
/// assert_eq!(table.num_rows(), 1);
/// assert_eq!(table.column_index("card_count"), Some(1));
/// ```
pub struct TableBuilder {
    pub(crate) _columns: Vec<String>,
    pub(crate) _rows: Vec<Vec<CellValue>>,
}

impl TableBuilder {
    pub fn new(columns: &[String]) -> TableBuilder {
        TableBuilder {
            _columns: columns.to_vec(),
            _rows: Vec::new(),
        }
    }

    /// Adds a row of raw cells. Rows shorter than the header are padded
    /// with [CellValue::Empty]; longer rows are truncated to the header
    /// width.
    pub fn push_row(&mut self, mut cells: Vec<CellValue>) {
        let width = self._columns.len();
        cells.truncate(width);
        while cells.len() < width {
            cells.push(CellValue::Empty);
        }
        self._rows.push(cells);
    }

    /// Adds a row of textual cells, the common case for delimited files.
    pub fn push_text_row(&mut self, cells: &[String]) {
        let row: Vec<CellValue> = cells
            .iter()
            .map(|s| CellValue::Text(s.clone()))
            .collect();
        self.push_row(row);
    }

    pub fn build(self) -> Table {
        Table {
            columns: self._columns,
            rows: self._rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_rows_are_padded() {
        let mut builder = TableBuilder::new(&[
            "a".to_string(),
            "b".to_string(),
            "c".to_string(),
        ]);
        builder.push_text_row(&["1".to_string()]);
        let table = builder.build();
        assert_eq!(table.rows()[0].len(), 3);
        assert_eq!(table.rows()[0][2], CellValue::Empty);
    }

    #[test]
    fn long_rows_are_truncated() {
        let mut builder = TableBuilder::new(&["a".to_string()]);
        builder.push_row(vec![
            CellValue::Number(1.0),
            CellValue::Number(2.0),
        ]);
        let table = builder.build();
        assert_eq!(table.rows()[0], vec![CellValue::Number(1.0)]);
    }
}
