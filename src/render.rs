//! Row rendering for batches and pages
//!
//! JSON rows come from Arrow's line-delimited JSON writer; string rows format
//! every cell with Arrow's display formatter, so nested and temporal values
//! show the same way the pretty table does.

use arrow::error::ArrowError;
use arrow::json::LineDelimitedWriter;
use arrow::record_batch::RecordBatch;
use arrow::util::display::{ArrayFormatter, FormatOptions};
use arrow::util::pretty::pretty_format_batches;
use serde_json::{Map, Value};

/// Convert batches to JSON rows (one object per row, nulls omitted)
pub fn batches_to_json(batches: &[RecordBatch]) -> Result<Vec<Value>, ArrowError> {
    if batches.is_empty() {
        return Ok(vec![]);
    }

    let mut buf = Vec::new();
    {
        let mut writer = LineDelimitedWriter::new(&mut buf);
        for batch in batches {
            writer.write(batch)?;
        }
        writer.finish()?;
    }

    let output = String::from_utf8_lossy(&buf);
    output
        .lines()
        .filter(|line| !line.is_empty())
        .map(|line| serde_json::from_str(line).map_err(|e| ArrowError::JsonError(e.to_string())))
        .collect()
}

/// Convert batches to rows where every cell is a string (`""` for null)
pub fn batches_to_string_rows(batches: &[RecordBatch]) -> Result<Vec<Value>, ArrowError> {
    let options = FormatOptions::default();
    let mut rows = Vec::new();

    for batch in batches {
        let schema = batch.schema();
        let formatters = batch
            .columns()
            .iter()
            .map(|column| ArrayFormatter::try_new(column.as_ref(), &options))
            .collect::<Result<Vec<_>, _>>()?;

        for row in 0..batch.num_rows() {
            let mut object = Map::with_capacity(formatters.len());
            for (field, formatter) in schema.fields().iter().zip(&formatters) {
                object.insert(
                    field.name().clone(),
                    Value::String(formatter.value(row).to_string()),
                );
            }
            rows.push(Value::Object(object));
        }
    }

    Ok(rows)
}

/// Render batches as an ASCII table
pub fn pretty_table(batches: &[RecordBatch]) -> Result<String, ArrowError> {
    Ok(pretty_format_batches(batches)?.to_string())
}
