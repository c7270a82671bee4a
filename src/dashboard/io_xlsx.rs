// Primitives for reading Excel workbooks.

use calamine::{open_workbook, DataType, Reader, Xlsx};

use log::debug;
use snafu::prelude::*;

use supply_insight::builder::TableBuilder;
use supply_insight::{CellValue, Table};

use crate::dashboard::{DashResult, EmptyExcelSnafu, OpeningExcelSnafu};

pub fn read_xlsx_table(path: &str, worksheet_name: &Option<String>) -> DashResult<Table> {
    let wrange = get_range(path, worksheet_name)?;
    let mut iter = wrange.rows();
    let header = iter.next().context(EmptyExcelSnafu { path })?;
    let columns: Vec<String> = header.iter().map(|dt| to_cell(dt).as_dimension()).collect();
    debug!("read_xlsx_table: header: {:?}", columns);

    let mut builder = TableBuilder::new(&columns);
    for row in iter {
        let cells: Vec<CellValue> = row.iter().map(to_cell).collect();
        builder.push_row(cells);
    }
    Ok(builder.build())
}

fn to_cell(dt: &DataType) -> CellValue {
    match dt {
        DataType::String(s) => CellValue::Text(s.clone()),
        DataType::Float(f) => CellValue::Number(*f),
        DataType::Int(i) => CellValue::Number(*i as f64),
        DataType::Bool(b) => CellValue::Number(if *b { 1.0 } else { 0.0 }),
        DataType::DateTime(f) => CellValue::Number(*f),
        DataType::Empty => CellValue::Empty,
        // Cell-level errors behave like missing values.
        _ => CellValue::Empty,
    }
}

fn get_range(
    path: &str,
    worksheet_name_o: &Option<String>,
) -> DashResult<calamine::Range<DataType>> {
    debug!(
        "get_range: path: {:?} worksheet: {:?}",
        path, worksheet_name_o
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    if let Some(worksheet_name) = worksheet_name_o {
        let wrange = workbook
            .worksheet_range(worksheet_name)
            .context(EmptyExcelSnafu { path })?
            .context(OpeningExcelSnafu { path })?;
        Ok(wrange)
    } else {
        let all_worksheets = workbook.worksheets();
        match all_worksheets.as_slice() {
            [] => whatever!("workbook {} has no worksheets", path),
            [(worksheet_name, wrange)] => {
                debug!("get_range: using single worksheet {:?}", worksheet_name);
                Ok(wrange.clone())
            }
            _ => {
                whatever!(
                    "workbook {} has several worksheets, the worksheet name must be provided",
                    path
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_map_onto_the_table_model() {
        assert_eq!(
            to_cell(&DataType::String("Guntur".to_string())),
            CellValue::Text("Guntur".to_string())
        );
        assert_eq!(to_cell(&DataType::Float(1.5)), CellValue::Number(1.5));
        assert_eq!(to_cell(&DataType::Int(12)), CellValue::Number(12.0));
        assert_eq!(to_cell(&DataType::Bool(true)), CellValue::Number(1.0));
        assert_eq!(to_cell(&DataType::Empty), CellValue::Empty);
    }
}
