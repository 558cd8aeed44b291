//! Query-result export through DuckDB
//!
//! DuckDB writes the files itself. Spreadsheets go through the `spatial`
//! extension's GDAL copy format (`COPY (query) TO 'file.xlsx' WITH (FORMAT
//! GDAL, DRIVER 'xlsx')`); query results go to CSV with DuckDB's built-in
//! writer.

mod csv;
mod excel;
mod statement;

pub use csv::{csv_copy_statement, csv_export_path, export_csv};
pub use excel::{export_to_excel, ExcelExporter, SPATIAL_EXTENSION};
pub use statement::{CopyStatement, DEFAULT_DRIVER, DEFAULT_FORMAT, DEFAULT_OUTPUT, DEFAULT_QUERY};

use crate::error::{ExportError, ExportResult};
use std::path::{Path, PathBuf};

/// Result of a finished export
#[derive(Debug, Clone)]
pub struct ExportStats {
    pub output_path: PathBuf,
    pub bytes_written: u64,
}

fn check_output_path(path: &Path) -> ExportResult<()> {
    if path.as_os_str().is_empty() {
        return Err(ExportError::InvalidOutputPath {
            path: path.to_path_buf(),
            reason: "path is empty".to_string(),
        });
    }
    if path.is_dir() {
        return Err(ExportError::InvalidOutputPath {
            path: path.to_path_buf(),
            reason: "path is a directory".to_string(),
        });
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            return Err(ExportError::InvalidOutputPath {
                path: path.to_path_buf(),
                reason: format!("parent directory '{}' does not exist", parent.display()),
            });
        }
    }
    Ok(())
}
