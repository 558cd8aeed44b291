//! Spreadsheet export through DuckDB's spatial extension

use super::statement::CopyStatement;
use super::{check_output_path, ExportStats};
use crate::error::{ExportError, ExportResult};
use duckdb::Connection;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Extension providing the GDAL copy format
pub const SPATIAL_EXTENSION: &str = "spatial";

/// Runs `COPY` statements on a DuckDB connection
pub struct ExcelExporter {
    conn: Connection,
}

impl ExcelExporter {
    pub fn open_in_memory() -> ExportResult<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    /// `INSTALL <name>` (downloads the extension on first use)
    pub fn install_extension(&self, name: &str) -> ExportResult<()> {
        check_extension_name(name)?;
        debug!(extension = name, "Installing extension");
        self.conn.execute_batch(&format!("INSTALL {}", name))?;
        Ok(())
    }

    /// `LOAD <name>`
    pub fn load_extension(&self, name: &str) -> ExportResult<()> {
        check_extension_name(name)?;
        debug!(extension = name, "Loading extension");
        self.conn.execute_batch(&format!("LOAD {}", name))?;
        Ok(())
    }

    /// Run the statement and report the written file
    pub fn execute(&self, statement: &CopyStatement) -> ExportResult<ExportStats> {
        let target = statement.target();
        check_output_path(target)?;

        let sql = statement.build();
        debug!(%sql, "Running export");
        self.conn.execute_batch(&sql)?;

        let bytes_written = fs::metadata(target)?.len();
        info!(
            "Exported query results to {} ({} bytes)",
            target.display(),
            bytes_written
        );

        Ok(ExportStats {
            output_path: target.to_path_buf(),
            bytes_written,
        })
    }
}

/// Connect, install and load `spatial`, then export `query` to `output`
pub fn export_to_excel<P: AsRef<Path>>(query: &str, output: P) -> ExportResult<ExportStats> {
    let exporter = ExcelExporter::open_in_memory()?;
    exporter.install_extension(SPATIAL_EXTENSION)?;
    exporter.load_extension(SPATIAL_EXTENSION)?;
    exporter.execute(&CopyStatement::from_query(query).to_file(output))
}

fn check_extension_name(name: &str) -> ExportResult<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(ExportError::InvalidExtension {
            name: name.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_rejects_bad_extension_names() {
        let exporter = ExcelExporter::open_in_memory().unwrap();
        for name in ["", "spatial; DROP TABLE x", "../evil"] {
            assert!(matches!(
                exporter.load_extension(name),
                Err(ExportError::InvalidExtension { .. })
            ));
        }
    }

    #[test]
    fn test_missing_parent_directory() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("missing").join("out.xlsx");

        let exporter = ExcelExporter::open_in_memory().unwrap();
        let err = exporter
            .execute(&CopyStatement::default().to_file(&target))
            .unwrap_err();
        assert!(matches!(err, ExportError::InvalidOutputPath { .. }));
        assert!(!target.exists());
    }

    #[test]
    fn test_directory_target_rejected() {
        let dir = tempdir().unwrap();
        let exporter = ExcelExporter::open_in_memory().unwrap();
        let err = exporter
            .execute(&CopyStatement::default().to_file(dir.path()))
            .unwrap_err();
        assert!(matches!(err, ExportError::InvalidOutputPath { .. }));
    }
}
