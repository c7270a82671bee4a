// Process-wide cache of loaded tables.
//
// Tables are write-once per key and read-only afterwards; the mutex only
// guards the map itself. There is no expiry: source files are static for
// the lifetime of the process, and a changed path is simply a new key.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock, Mutex};

use log::{debug, info};

use supply_insight::Table;

use crate::dashboard::io_common::TableFormat;
use crate::dashboard::{io_csv, io_xlsx, DashResult};

type CacheKey = (PathBuf, Option<String>);

static TABLES: LazyLock<Mutex<HashMap<CacheKey, Arc<Table>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

pub fn load_table(
    path: &Path,
    format: TableFormat,
    worksheet: &Option<String>,
) -> DashResult<Arc<Table>> {
    let key: CacheKey = (path.to_path_buf(), worksheet.clone());
    if let Some(hit) = lookup(&key) {
        debug!("load_table: cache hit for {:?}", path);
        return Ok(hit);
    }

    let path_s = path.display().to_string();
    info!("load_table: reading {:?}", path_s);
    let table = match format {
        TableFormat::Csv => io_csv::read_csv_table(&path_s)?,
        TableFormat::Xlsx => io_xlsx::read_xlsx_table(&path_s, worksheet)?,
    };

    let shared = Arc::new(table);
    let mut map = TABLES.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    // Keep the first loaded table if another session raced us here.
    let entry = map.entry(key).or_insert_with(|| shared.clone());
    Ok(entry.clone())
}

fn lookup(key: &CacheKey) -> Option<Arc<Table>> {
    let map = TABLES.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    map.get(key).cloned()
}
