use std::collections::HashSet;
use std::sync::Arc;

use datafusion::arrow::array::{
    ArrayRef, BooleanBuilder, Float64Builder, Int64Builder, StringBuilder,
};
use datafusion::arrow::datatypes::{DataType, Field, Schema};
use datafusion::arrow::record_batch::RecordBatch;

use super::error::HubError;

// ---------------------------------------------------------------------------
// Header normalization
// ---------------------------------------------------------------------------

/// Rewrite a raw header into its canonical column identifier.
///
/// The replacement order is part of the contract: trim, spaces and hyphens
/// to underscores, strip `?` `(` `)`, then lowercase. Running it on an
/// already-normalized name is a no-op.
pub fn normalize_header(raw: &str) -> String {
    raw.trim()
        .replace(' ', "_")
        .replace('-', "_")
        .replace('?', "")
        .replace('(', "")
        .replace(')', "")
        .to_lowercase()
}

// ---------------------------------------------------------------------------
// CSV ingestion
// ---------------------------------------------------------------------------

/// Parse CSV bytes into a record batch with normalized column names.
///
/// Column types are inferred over the non-empty cells of each column:
/// all-integer → Int64, else all-float → Float64, else all true/false →
/// Boolean, else Utf8. Empty cells become nulls. Any parse failure aborts
/// the whole ingestion; the caller registers nothing.
pub fn ingest_csv(bytes: &[u8]) -> Result<RecordBatch, HubError> {
    let mut reader = csv::Reader::from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| HubError::Parse(format!("reading header row: {e}")))?
        .clone();
    if headers.is_empty() {
        return Err(HubError::Parse("missing header row".to_string()));
    }

    let mut names: Vec<String> = Vec::with_capacity(headers.len());
    let mut seen: HashSet<String> = HashSet::new();
    for raw in headers.iter() {
        let normalized = normalize_header(raw);
        if normalized.is_empty() {
            return Err(HubError::Parse(format!(
                "header `{raw}` normalizes to an empty column name"
            )));
        }
        if !seen.insert(normalized.clone()) {
            return Err(HubError::DuplicateColumn {
                raw: raw.to_string(),
                normalized,
            });
        }
        names.push(normalized);
    }

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| HubError::Parse(format!("row {}: {e}", idx + 1)))?;
        records.push(record);
    }

    let mut fields = Vec::with_capacity(names.len());
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(names.len());
    for (col_idx, name) in names.iter().enumerate() {
        let ty = infer_column(records.iter().map(|r| r.get(col_idx).unwrap_or("")));
        let array = build_array(ty, records.iter().map(|r| r.get(col_idx).unwrap_or("")));
        fields.push(Field::new(name, ty.data_type(), true));
        arrays.push(array);
    }

    let schema = Arc::new(Schema::new(fields));
    RecordBatch::try_new(schema, arrays).map_err(|e| HubError::Parse(e.to_string()))
}

// ---------------------------------------------------------------------------
// Column type inference
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnType {
    Integer,
    Float,
    Boolean,
    Text,
}

impl ColumnType {
    fn data_type(self) -> DataType {
        match self {
            ColumnType::Integer => DataType::Int64,
            ColumnType::Float => DataType::Float64,
            ColumnType::Boolean => DataType::Boolean,
            ColumnType::Text => DataType::Utf8,
        }
    }
}

/// Pick the narrowest type that fits every non-empty cell of a column.
fn infer_column<'a>(values: impl Iterator<Item = &'a str>) -> ColumnType {
    let mut is_int = true;
    let mut is_float = true;
    let mut is_bool = true;
    let mut saw_value = false;

    for raw in values {
        let cell = raw.trim();
        if cell.is_empty() {
            continue;
        }
        saw_value = true;
        is_int = is_int && cell.parse::<i64>().is_ok();
        is_float = is_float && cell.parse::<f64>().is_ok();
        is_bool = is_bool && (cell == "true" || cell == "false");
        if !is_int && !is_float && !is_bool {
            return ColumnType::Text;
        }
    }

    if !saw_value {
        ColumnType::Text
    } else if is_int {
        ColumnType::Integer
    } else if is_float {
        ColumnType::Float
    } else if is_bool {
        ColumnType::Boolean
    } else {
        ColumnType::Text
    }
}

fn build_array<'a>(ty: ColumnType, values: impl Iterator<Item = &'a str>) -> ArrayRef {
    match ty {
        ColumnType::Integer => {
            let mut builder = Int64Builder::new();
            for raw in values {
                let cell = raw.trim();
                if cell.is_empty() {
                    builder.append_null();
                } else {
                    // infer_column guaranteed the parse
                    builder.append_option(cell.parse::<i64>().ok());
                }
            }
            Arc::new(builder.finish())
        }
        ColumnType::Float => {
            let mut builder = Float64Builder::new();
            for raw in values {
                let cell = raw.trim();
                if cell.is_empty() {
                    builder.append_null();
                } else {
                    builder.append_option(cell.parse::<f64>().ok());
                }
            }
            Arc::new(builder.finish())
        }
        ColumnType::Boolean => {
            let mut builder = BooleanBuilder::new();
            for raw in values {
                let cell = raw.trim();
                if cell.is_empty() {
                    builder.append_null();
                } else {
                    builder.append_value(cell == "true");
                }
            }
            Arc::new(builder.finish())
        }
        ColumnType::Text => {
            let mut builder = StringBuilder::new();
            for raw in values {
                if raw.is_empty() {
                    builder.append_null();
                } else {
                    builder.append_value(raw);
                }
            }
            Arc::new(builder.finish())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use datafusion::arrow::array::Array;

    #[test]
    fn normalize_strips_question_marks_and_lowercases() {
        assert_eq!(
            normalize_header("Do you have Depression?"),
            "do_you_have_depression"
        );
        assert_eq!(normalize_header("What is your CGPA?"), "what_is_your_cgpa");
    }

    #[test]
    fn normalize_handles_spaces_hyphens_and_parens() {
        assert_eq!(normalize_header("Release Year"), "release_year");
        assert_eq!(normalize_header(" date-added "), "date_added");
        assert_eq!(normalize_header("Duration (minutes)"), "duration_minutes");
    }

    #[test]
    fn normalize_is_idempotent() {
        for raw in [
            "Do you have Depression?",
            "What is your CGPA?",
            "Release Year",
            "already_normalized",
        ] {
            let once = normalize_header(raw);
            assert_eq!(normalize_header(&once), once);
        }
    }

    #[test]
    fn ingest_normalizes_headers_and_infers_types() {
        let batch = ingest_csv(b"Type,Release Year\nMovie,2020\n").unwrap();
        let schema = batch.schema();
        let names: Vec<&str> = schema
            .fields()
            .iter()
            .map(|f| f.name().as_str())
            .collect();
        assert_eq!(names, vec!["type", "release_year"]);
        assert_eq!(batch.schema().field(0).data_type(), &DataType::Utf8);
        assert_eq!(batch.schema().field(1).data_type(), &DataType::Int64);
        assert_eq!(batch.num_rows(), 1);
    }

    #[test]
    fn ingest_rejects_empty_input() {
        let err = ingest_csv(b"").unwrap_err();
        assert!(matches!(err, HubError::Parse(_)), "got {err:?}");
    }

    #[test]
    fn ingest_rejects_ragged_rows() {
        let err = ingest_csv(b"a,b\n1,2,3\n").unwrap_err();
        assert!(matches!(err, HubError::Parse(_)), "got {err:?}");
    }

    #[test]
    fn ingest_rejects_colliding_headers() {
        let err = ingest_csv(b"Release Year,release_year\n2020,2021\n").unwrap_err();
        match err {
            HubError::DuplicateColumn { normalized, .. } => {
                assert_eq!(normalized, "release_year");
            }
            other => panic!("expected DuplicateColumn, got {other:?}"),
        }
    }

    #[test]
    fn ingest_accepts_header_only_input() {
        let batch = ingest_csv(b"a,b\n").unwrap();
        assert_eq!(batch.num_rows(), 0);
        assert_eq!(batch.num_columns(), 2);
    }

    #[test]
    fn empty_cells_become_nulls() {
        let batch = ingest_csv(b"year,label\n2020,x\n,y\n").unwrap();
        assert_eq!(batch.schema().field(0).data_type(), &DataType::Int64);
        assert!(batch.column(0).is_null(1));
    }

    #[test]
    fn mixed_column_falls_back_to_text() {
        let batch = ingest_csv(b"v\n1\nx\n").unwrap();
        assert_eq!(batch.schema().field(0).data_type(), &DataType::Utf8);
    }

    #[test]
    fn float_and_bool_columns_are_inferred() {
        let batch = ingest_csv(b"score,flag\n3.5,true\n2,false\n").unwrap();
        assert_eq!(batch.schema().field(0).data_type(), &DataType::Float64);
        assert_eq!(batch.schema().field(1).data_type(), &DataType::Boolean);
    }
}
