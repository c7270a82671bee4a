// Primitives for reading CSV files.

use std::io::Read;

use log::debug;
use snafu::prelude::*;

use supply_insight::builder::TableBuilder;
use supply_insight::Table;

use crate::dashboard::{CsvLineParseSnafu, CsvOpenSnafu, DashResult};

pub fn read_csv_table(path: &str) -> DashResult<Table> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    read_table(rdr)
}

pub fn read_csv_table_from_reader<R: Read>(reader: R) -> DashResult<Table> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    read_table(rdr)
}

fn read_table<R: Read>(rdr: csv::Reader<R>) -> DashResult<Table> {
    let mut records = rdr.into_records();
    let header = match records.next() {
        Some(r) => r.context(CsvLineParseSnafu { lineno: 1usize })?,
        None => whatever!("csv input has no header row"),
    };
    let columns: Vec<String> = header.iter().map(|s| s.trim().to_string()).collect();
    debug!("read_table: header: {:?}", columns);

    let mut builder = TableBuilder::new(&columns);
    for (idx, line_r) in records.enumerate() {
        // The header sits on line 1.
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        debug!("read_table: lineno: {:?} row: {:?}", lineno, line);
        let cells: Vec<String> = line.iter().map(|s| s.to_string()).collect();
        builder.push_text_row(&cells);
    }
    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use supply_insight::{aggregate, AggregationOptions, CellValue};

    #[test]
    fn header_and_rows_are_read() {
        let data = "District,FPS Count\nGuntur,\"1,200\"\nKrishna,800\n";
        let table = read_csv_table_from_reader(data.as_bytes()).unwrap();
        assert_eq!(table.columns(), &["District", "FPS Count"]);
        assert_eq!(table.num_rows(), 2);
        assert_eq!(
            table.rows()[0][1],
            CellValue::Text("1,200".to_string())
        );
    }

    #[test]
    fn short_rows_are_padded_to_the_header() {
        let data = "a,b,c\n1\n";
        let table = read_csv_table_from_reader(data.as_bytes()).unwrap();
        assert_eq!(table.rows()[0].len(), 3);
        assert_eq!(table.rows()[0][2], CellValue::Empty);
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(read_csv_table_from_reader("".as_bytes()).is_err());
    }

    #[test]
    fn csv_feeds_the_aggregation_end_to_end() {
        let data = "District,Cards\nGuntur,\"12,345\"\nKrishna,655\nGuntur,1000\n";
        let table = read_csv_table_from_reader(data.as_bytes()).unwrap();
        let agg =
            aggregate(&table, "District", "Cards", &AggregationOptions::DEFAULT).unwrap();
        assert_eq!(agg.total(), 14000.0);
        assert_eq!(agg.groups.len(), 2);
        assert_eq!(agg.groups[0].key, "Guntur");
        assert_eq!(agg.groups[0].sum, 13345.0);
    }
}
