//! File summary and schema description
//!
//! Produces the footer facts and column listing shown by the `metadata`
//! command. Both serialize to JSON with serde.

use crate::source::ParquetFile;
use arrow::datatypes::{DataType, Field, Schema};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Footer-level facts about a Parquet file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileSummary {
    pub file_name: String,
    pub created_by: Option<String>,
    pub num_rows: i64,
    pub num_row_groups: usize,
    pub format_version: i32,
    /// Always `None`: encrypted footers are rejected when the file is opened
    pub encryption_algorithm: Option<String>,
    pub footer_signing_key_metadata: Option<String>,
    pub row_groups: Vec<RowGroupSummary>,
}

/// Size facts for one row group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowGroupSummary {
    pub index: usize,
    pub num_rows: i64,
    pub total_byte_size: i64,
    pub compressed_size: i64,
}

impl FileSummary {
    pub fn from_file(file: &ParquetFile) -> Self {
        let metadata = file.parquet_metadata();
        let file_metadata = metadata.file_metadata();

        let file_name = file
            .path()
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| file.path().display().to_string());

        let row_groups = metadata
            .row_groups()
            .iter()
            .enumerate()
            .map(|(index, rg)| RowGroupSummary {
                index,
                num_rows: rg.num_rows(),
                total_byte_size: rg.total_byte_size(),
                compressed_size: rg.compressed_size(),
            })
            .collect();

        Self {
            file_name,
            created_by: file_metadata.created_by().map(str::to_string),
            num_rows: file_metadata.num_rows(),
            num_row_groups: metadata.num_row_groups(),
            format_version: file_metadata.version(),
            encryption_algorithm: None,
            footer_signing_key_metadata: None,
            row_groups,
        }
    }

    /// Sum of compressed row-group sizes
    pub fn compressed_bytes(&self) -> u64 {
        self.row_groups
            .iter()
            .map(|rg| rg.compressed_size.max(0) as u64)
            .sum()
    }

    /// `(key, value)` pairs in display order
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("file_name", self.file_name.clone()),
            (
                "created_by",
                self.created_by.clone().unwrap_or_default(),
            ),
            ("num_rows", self.num_rows.to_string()),
            ("num_row_groups", self.num_row_groups.to_string()),
            ("format_version", self.format_version.to_string()),
            (
                "encryption_algorithm",
                self.encryption_algorithm.clone().unwrap_or_default(),
            ),
            (
                "footer_signing_key_metadata",
                self.footer_signing_key_metadata.clone().unwrap_or_default(),
            ),
        ]
    }
}

/// One column of the schema
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnInfo {
    /// 1-based position
    pub index: usize,
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: Value,
    pub nullable: bool,
    pub metadata: BTreeMap<String, String>,
}

impl ColumnInfo {
    /// Type label as a single string (nested types as compact JSON)
    pub fn type_label(&self) -> String {
        match &self.data_type {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// Describe every top-level field of `schema`
pub fn describe_schema(schema: &Schema) -> Vec<ColumnInfo> {
    schema
        .fields()
        .iter()
        .enumerate()
        .map(|(i, field)| ColumnInfo {
            index: i + 1,
            name: field.name().clone(),
            data_type: type_label(field),
            nullable: field.is_nullable(),
            metadata: field
                .metadata()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        })
        .collect()
}

/// Lists become `[child]`, structs `{name: child}`, everything else a string
/// with `Utf8` spelled `String`.
fn type_label(field: &Field) -> Value {
    match field.data_type() {
        DataType::List(child) | DataType::LargeList(child) | DataType::FixedSizeList(child, _) => {
            Value::Array(vec![type_label(child)])
        }
        DataType::Struct(children) => {
            let mut object = Map::with_capacity(children.len());
            for child in children.iter() {
                object.insert(child.name().clone(), type_label(child));
            }
            Value::Object(object)
        }
        other => Value::String(other.to_string().replace("Utf8", "String")),
    }
}
