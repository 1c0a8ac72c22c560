//! Build typed Arrow arrays from JSON record values.

use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanBuilder, Float64Builder, Int64Builder, StringBuilder};
use ptax_core::QuoteRecord;
use serde_json::Value;

use super::schema::ColumnKind;

/// Build one array per column, row by row across `records`.
///
/// A missing key or JSON `null` becomes a null slot. Under a `Utf8` column,
/// strings are kept verbatim and any other value is stored as its JSON text.
pub(crate) fn build_arrays(records: &[QuoteRecord], columns: &[(String, ColumnKind)]) -> Vec<ArrayRef> {
    let num_rows = records.len();

    columns
        .iter()
        .map(|(name, kind)| {
            let values = records.iter().map(|r| r.get(name).filter(|v| !v.is_null()));

            let array: ArrayRef = match kind {
                ColumnKind::Boolean => {
                    let mut builder = BooleanBuilder::with_capacity(num_rows);
                    for v in values {
                        builder.append_option(v.and_then(Value::as_bool));
                    }
                    Arc::new(builder.finish())
                }
                ColumnKind::Int64 => {
                    let mut builder = Int64Builder::with_capacity(num_rows);
                    for v in values {
                        builder.append_option(v.and_then(Value::as_i64));
                    }
                    Arc::new(builder.finish())
                }
                ColumnKind::Float64 => {
                    let mut builder = Float64Builder::with_capacity(num_rows);
                    for v in values {
                        builder.append_option(v.and_then(Value::as_f64));
                    }
                    Arc::new(builder.finish())
                }
                ColumnKind::Utf8 | ColumnKind::Unknown => {
                    let mut builder = StringBuilder::with_capacity(num_rows, num_rows * 24);
                    for v in values {
                        match v {
                            Some(Value::String(s)) => builder.append_value(s),
                            Some(other) => builder.append_value(other.to_string()),
                            None => builder.append_null(),
                        }
                    }
                    Arc::new(builder.finish())
                }
            };
            array
        })
        .collect()
}
