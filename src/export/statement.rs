//! `COPY ... TO ... WITH (...)` statement builder

use std::path::{Path, PathBuf};

/// Query exported when none is given
pub const DEFAULT_QUERY: &str = "SELECT 1 as a, 2 as b";

/// Output file written when none is given
pub const DEFAULT_OUTPUT: &str = "output.xlsx";

/// Copy format that routes through the spatial extension's GDAL writer
pub const DEFAULT_FORMAT: &str = "GDAL";

/// GDAL driver for spreadsheet output
pub const DEFAULT_DRIVER: &str = "xlsx";

/// Builder for a DuckDB `COPY (query) TO 'file' WITH (FORMAT .., DRIVER '..')`
/// statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyStatement {
    query: String,
    target: PathBuf,
    format: String,
    driver: String,
}

impl Default for CopyStatement {
    fn default() -> Self {
        Self::from_query(DEFAULT_QUERY)
    }
}

impl CopyStatement {
    /// Copy the results of `query` to the default target
    pub fn from_query(query: &str) -> Self {
        Self {
            query: query.trim().to_string(),
            target: PathBuf::from(DEFAULT_OUTPUT),
            format: DEFAULT_FORMAT.to_string(),
            driver: DEFAULT_DRIVER.to_string(),
        }
    }

    pub fn to_file<P: AsRef<Path>>(mut self, target: P) -> Self {
        self.target = target.as_ref().to_path_buf();
        self
    }

    pub fn driver(mut self, driver: &str) -> Self {
        self.driver = driver.to_string();
        self
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Render the SQL text
    pub fn build(&self) -> String {
        let mut sql = String::with_capacity(64 + self.query.len());
        sql.push_str("COPY (");
        sql.push_str(&self.query);
        sql.push_str(") TO ");
        sql.push_str(&quote(&self.target.to_string_lossy()));
        sql.push_str(" WITH (FORMAT ");
        sql.push_str(&self.format);
        sql.push_str(", DRIVER ");
        sql.push_str(&quote(&self.driver));
        sql.push(')');
        sql
    }
}

/// Single-quoted SQL string literal
pub(super) fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_statement() {
        assert_eq!(
            CopyStatement::default().build(),
            "COPY (SELECT 1 as a, 2 as b) TO 'output.xlsx' WITH (FORMAT GDAL, DRIVER 'xlsx')"
        );
    }

    #[test]
    fn test_custom_target_and_driver() {
        let sql = CopyStatement::from_query("SELECT * FROM t")
            .to_file("/tmp/report.ods")
            .driver("ODS")
            .build();

        assert!(sql.starts_with("COPY (SELECT * FROM t) TO '/tmp/report.ods'"));
        assert!(sql.ends_with("WITH (FORMAT GDAL, DRIVER 'ODS')"));
    }

    #[test]
    fn test_target_quotes_escaped() {
        let sql = CopyStatement::default().to_file("bob's.xlsx").build();
        assert!(sql.contains("TO 'bob''s.xlsx'"));
    }

    #[test]
    fn test_query_trimmed() {
        let stmt = CopyStatement::from_query("  SELECT 42 as x \n");
        assert_eq!(stmt.query(), "SELECT 42 as x");
        assert_eq!(stmt.target(), Path::new(DEFAULT_OUTPUT));
    }
}
