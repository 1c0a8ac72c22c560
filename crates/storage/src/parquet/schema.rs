//! Column discovery and JSON value to Arrow type mapping.

use std::collections::HashMap;

use arrow::datatypes::{DataType, Field, Schema};
use ptax_core::QuoteRecord;
use serde_json::Value;

/// Narrowest type that holds every non-null value seen so far in a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ColumnKind {
    /// Only nulls (or nothing) observed yet.
    Unknown,
    Boolean,
    Int64,
    Float64,
    Utf8,
}

impl ColumnKind {
    fn of(value: &Value) -> Self {
        match value {
            Value::Null => ColumnKind::Unknown,
            Value::Bool(_) => ColumnKind::Boolean,
            Value::Number(n) if n.is_i64() => ColumnKind::Int64,
            Value::Number(_) => ColumnKind::Float64,
            _ => ColumnKind::Utf8,
        }
    }

    fn merge(self, other: Self) -> Self {
        use ColumnKind::*;
        match (self, other) {
            (Unknown, k) | (k, Unknown) => k,
            (a, b) if a == b => a,
            (Int64, Float64) | (Float64, Int64) => Float64,
            _ => Utf8,
        }
    }

    pub(crate) fn data_type(self) -> DataType {
        match self {
            ColumnKind::Boolean => DataType::Boolean,
            ColumnKind::Int64 => DataType::Int64,
            ColumnKind::Float64 => DataType::Float64,
            // All-null columns are kept as nullable strings.
            ColumnKind::Utf8 | ColumnKind::Unknown => DataType::Utf8,
        }
    }
}

/// Column names in order of first appearance, with their inferred kinds.
pub(crate) fn infer_columns(records: &[QuoteRecord]) -> Vec<(String, ColumnKind)> {
    let mut columns: Vec<(String, ColumnKind)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        for (key, value) in record {
            let kind = ColumnKind::of(value);
            match index.get(key) {
                Some(&i) => columns[i].1 = columns[i].1.merge(kind),
                None => {
                    index.insert(key.clone(), columns.len());
                    columns.push((key.clone(), kind));
                }
            }
        }
    }

    columns
}

/// Build an Arrow [`Schema`] from inferred columns. Every field is nullable
/// because any record may omit any key.
pub(crate) fn build_schema(columns: &[(String, ColumnKind)]) -> Schema {
    let fields: Vec<Field> = columns
        .iter()
        .map(|(name, kind)| Field::new(name, kind.data_type(), true))
        .collect();
    Schema::new(fields)
}
