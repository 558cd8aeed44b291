//! CSV export of a DuckDB relation

use super::statement::quote;
use super::{check_output_path, ExportStats};
use crate::error::ExportResult;
use duckdb::Connection;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use uuid::Uuid;

/// `<dir>/<stem>-<uuid>.csv` next to `source`
pub fn csv_export_path(source: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "export".to_string());
    let name = format!("{}-{}.csv", stem, Uuid::new_v4());
    match source.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    }
}

/// `COPY <relation> TO '<target>' WITH (HEADER, DELIMITER ',')`
pub fn csv_copy_statement(relation: &str, target: &Path) -> String {
    format!(
        "COPY {} TO {} WITH (HEADER, DELIMITER ',')",
        relation,
        quote(&target.to_string_lossy())
    )
}

/// Copy `relation` (a table name or parenthesized query) to `target`
pub fn export_csv(conn: &Connection, relation: &str, target: &Path) -> ExportResult<ExportStats> {
    check_output_path(target)?;

    let sql = csv_copy_statement(relation, target);
    debug!(%sql, "Running CSV export");
    conn.execute_batch(&sql)?;

    let bytes_written = fs::metadata(target)?.len();
    info!("Exported {} to {} ({} bytes)", relation, target.display(), bytes_written);

    Ok(ExportStats {
        output_path: target.to_path_buf(),
        bytes_written,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExportError;
    use tempfile::tempdir;

    #[test]
    fn test_copy_statement() {
        assert_eq!(
            csv_copy_statement("query_result", Path::new("/tmp/large-1.csv")),
            "COPY query_result TO '/tmp/large-1.csv' WITH (HEADER, DELIMITER ',')"
        );
    }

    #[test]
    fn test_export_path_is_unique_and_beside_source() {
        let source = Path::new("/data/large.parquet");
        let a = csv_export_path(source);
        let b = csv_export_path(source);

        assert_ne!(a, b);
        assert_eq!(a.parent(), Some(Path::new("/data")));
        let name = a.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("large-"));
        assert!(name.ends_with(".csv"));
        // stem + '-' + 36-char uuid + ".csv"
        assert_eq!(name.len(), "large-".len() + 36 + ".csv".len());
    }

    #[test]
    fn test_export_table() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("out.csv");
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t AS SELECT 1 AS a, 'x,y' AS b")
            .unwrap();

        let stats = export_csv(&conn, "t", &target).unwrap();
        assert_eq!(stats.output_path, target);

        let text = fs::read_to_string(&target).unwrap();
        assert_eq!(text.lines().collect::<Vec<_>>(), vec!["a,b", "1,\"x,y\""]);
    }

    #[test]
    fn test_export_rejects_missing_directory() {
        let dir = tempdir().unwrap();
        let conn = Connection::open_in_memory().unwrap();
        let err = export_csv(&conn, "(SELECT 1)", &dir.path().join("no").join("out.csv"))
            .unwrap_err();
        assert!(matches!(err, ExportError::InvalidOutputPath { .. }));
    }
}
