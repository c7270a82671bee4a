use std::path::{Path, PathBuf};

use snafu::prelude::*;

use crate::dashboard::{DashResult, UnsupportedFormatSnafu};

/// Supported on-disk table formats.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum TableFormat {
    Csv,
    Xlsx,
}

impl TableFormat {
    fn from_name(name: &str) -> Option<TableFormat> {
        match name.to_lowercase().as_str() {
            "csv" => Some(TableFormat::Csv),
            "xlsx" | "excel" => Some(TableFormat::Xlsx),
            _ => None,
        }
    }
}

/// Picks the table format from the explicit configuration value when
/// present, else from the file extension.
pub fn detect_format(explicit: &Option<String>, path: &Path) -> DashResult<TableFormat> {
    if let Some(name) = explicit {
        return TableFormat::from_name(name).context(UnsupportedFormatSnafu {
            format: name.clone(),
        });
    }
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    TableFormat::from_name(extension).context(UnsupportedFormatSnafu { format: extension })
}

/// Dataset paths are relative to the directory holding the configuration
/// file.
pub fn resolve_path(root: &Path, file_path: &str) -> PathBuf {
    let p = Path::new(file_path);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        root.join(p)
    }
}

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(path)
        .to_string()
}
