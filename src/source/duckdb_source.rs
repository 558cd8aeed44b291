//! DuckDB-backed page source
//!
//! Serves pages with `SELECT * FROM <relation> LIMIT n OFFSET m` on an
//! in-memory DuckDB connection. The relation starts as
//! `read_parquet('<path>')`; [`DuckDbSource::run_query`] materializes a user
//! query into the `query_result` table and pages through that instead. Row
//! order follows DuckDB's insertion-order preservation, which matches the
//! file order.

use crate::error::{ExportResult, SourceError, SourceResult};
use crate::export::{csv_export_path, export_csv, ExportStats};
use crate::source::PageSource;
use arrow::compute::concat_batches;
use arrow::record_batch::RecordBatch;
use duckdb::Connection;
use regex::{NoExpand, Regex};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, info};

/// Table holding the result of the last [`DuckDbSource::run_query`]
pub const QUERY_RESULT_TABLE: &str = "query_result";

/// Placeholder a user query reads the file through
static DATA_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bFROM\s+data\b").expect("Invalid placeholder regex"));

/// What the page queries read from
#[derive(Debug, Clone, PartialEq, Eq)]
enum Relation {
    /// The Parquet file itself
    File,
    /// A materialized query result
    Table(&'static str),
}

/// Pages of a Parquet file (or of a query over it) read through DuckDB.
pub struct DuckDbSource {
    conn: Connection,
    path: PathBuf,
    relation: Relation,
    total_rows: u64,
}

impl DuckDbSource {
    /// Open an in-memory DuckDB connection over `path` and count its rows
    pub fn open<P: AsRef<Path>>(path: P) -> SourceResult<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open_in_memory()?;
        let total_rows = count_rows(&conn, &scan_expr(&path))?;

        debug!(path = %path.display(), rows = total_rows, "Opened DuckDB page source");

        Ok(Self {
            conn,
            path,
            relation: Relation::File,
            total_rows,
        })
    }

    /// Open `path` and page through the result of `sql` (which reads `FROM data`)
    pub fn query<P: AsRef<Path>>(path: P, sql: &str) -> SourceResult<Self> {
        let mut source = Self::open(path)?;
        source.run_query(sql)?;
        Ok(source)
    }

    /// Run `sql` against the file and make its result the paged relation.
    ///
    /// `FROM data` in the query is rewritten to the file scan; a query without
    /// it fails with `SourceError::MissingDataTable`. The previous result table
    /// is replaced. Returns the result row count.
    pub fn run_query(&mut self, sql: &str) -> SourceResult<u64> {
        let query = rewrite_data_placeholder(sql, &self.path)?;

        self.conn.execute_batch(&format!(
            "DROP TABLE IF EXISTS {table}; CREATE TABLE {table} AS {query}",
            table = QUERY_RESULT_TABLE,
            query = query
        ))?;

        self.relation = Relation::Table(QUERY_RESULT_TABLE);
        self.total_rows = count_rows(&self.conn, QUERY_RESULT_TABLE)?;

        info!(rows = self.total_rows, "Query result stored in {}", QUERY_RESULT_TABLE);
        Ok(self.total_rows)
    }

    /// True once a query result is being paged
    pub fn is_query_result(&self) -> bool {
        matches!(self.relation, Relation::Table(_))
    }

    /// Path of the scanned file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// SQL used to fetch one page
    pub fn page_query(&self, offset: u64, limit: usize) -> String {
        format!(
            "SELECT * FROM {} LIMIT {} OFFSET {}",
            self.from_clause(),
            limit,
            offset
        )
    }

    /// Write the paged relation to CSV with a header row.
    ///
    /// Without a target the file goes next to the Parquet file as
    /// `<stem>-<uuid>.csv`.
    pub fn export_csv(&self, target: Option<&Path>) -> ExportResult<ExportStats> {
        let target = match target {
            Some(path) => path.to_path_buf(),
            None => csv_export_path(&self.path),
        };
        let relation = match &self.relation {
            Relation::Table(table) => table.to_string(),
            Relation::File => format!("(SELECT * FROM {})", scan_expr(&self.path)),
        };
        export_csv(&self.conn, &relation, &target)
    }

    fn from_clause(&self) -> String {
        match &self.relation {
            Relation::File => scan_expr(&self.path),
            Relation::Table(table) => table.to_string(),
        }
    }
}

impl PageSource for DuckDbSource {
    fn total_rows(&self) -> u64 {
        self.total_rows
    }

    fn read_rows(&self, offset: u64, limit: usize) -> SourceResult<RecordBatch> {
        let sql = self.page_query(offset, limit);
        debug!(%sql, "Running page query");

        let mut stmt = self.conn.prepare(&sql)?;
        let arrow = stmt.query_arrow([])?;
        let schema = arrow.get_schema();
        let batches: Vec<RecordBatch> = arrow.collect();

        Ok(concat_batches(&schema, &batches)?)
    }
}

impl std::fmt::Debug for DuckDbSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DuckDbSource")
            .field("path", &self.path)
            .field("relation", &self.relation)
            .field("rows", &self.total_rows)
            .finish()
    }
}

/// Replace the first `FROM data` in `sql` with a scan of `path`
pub fn rewrite_data_placeholder(sql: &str, path: &Path) -> SourceResult<String> {
    if !DATA_PLACEHOLDER.is_match(sql) {
        return Err(SourceError::MissingDataTable);
    }
    let from = format!("FROM {}", scan_expr(path));
    let rewritten = DATA_PLACEHOLDER.replace(sql, NoExpand(&from));
    Ok(rewritten.trim().trim_end_matches(';').trim_end().to_string())
}

fn count_rows(conn: &Connection, relation: &str) -> SourceResult<u64> {
    let sql = format!("SELECT COUNT(*) FROM {}", relation);
    let count: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
    Ok(count.max(0) as u64)
}

/// `read_parquet('<path>')` with single quotes doubled
fn scan_expr(path: &Path) -> String {
    let literal = path.to_string_lossy().replace('\'', "''");
    format!("read_parquet('{}')", literal)
}
