use super::writer::OrderedBytesWriter;
use crate::{
    error::EncodeError,
    schema::{ColumnType, Dialect},
    value::Value,
};

// Null tags, ascending form, emitted ahead of the value bytes so the
// presence bit is part of the prefix-free encoding. The writer
// complements them together with the value for descending parts.
//
// GoogleStandardSql sorts NULL before every non-null value; PostgreSql
// sorts NULL after. Swapping which of {0x00, 0x01} means "null" yields
// both orders from the same machinery.
const GOOGLE_NULL_TAG: u8 = 0x00;
const GOOGLE_PRESENT_TAG: u8 = 0x01;
const PG_PRESENT_TAG: u8 = 0x00;
const PG_NULL_TAG: u8 = 0x01;

// Unset sentinels are resolved against the direction up front and are
// never complemented: an omitted key column is the maximum value for
// the part's sort direction.
const UNSET_ASCENDING: u8 = 0xFF;
const UNSET_DESCENDING: u8 = 0x00;

const fn null_tag(dialect: Dialect) -> u8 {
    match dialect {
        Dialect::GoogleStandardSql => GOOGLE_NULL_TAG,
        Dialect::PostgreSql => PG_NULL_TAG,
    }
}

const fn present_tag(dialect: Dialect) -> u8 {
    match dialect {
        Dialect::GoogleStandardSql => GOOGLE_PRESENT_TAG,
        Dialect::PostgreSql => PG_PRESENT_TAG,
    }
}

/// Encode one key part: the null/presence tag followed by the value
/// bytes, or a direction-resolved sentinel when the mutation omitted
/// the column entirely.
pub(crate) fn encode_key_part(
    writer: &mut OrderedBytesWriter,
    column: &str,
    column_type: ColumnType,
    dialect: Dialect,
    value: Option<&Value>,
    descending: bool,
) -> Result<(), EncodeError> {
    match value {
        None | Some(Value::Unset) => {
            writer.append_raw_byte(if descending {
                UNSET_DESCENDING
            } else {
                UNSET_ASCENDING
            });
            Ok(())
        }
        Some(Value::Null) => {
            writer.append_tag(null_tag(dialect), descending);
            Ok(())
        }
        Some(value) => {
            writer.append_tag(present_tag(dialect), descending);
            encode_scalar(writer, column, column_type, value, descending)
        }
    }
}

// Dispatch a present scalar onto its writer primitive. A value outside
// the column's declared domain is a hard error; the mutation is dropped
// by the caller.
fn encode_scalar(
    writer: &mut OrderedBytesWriter,
    column: &str,
    column_type: ColumnType,
    value: &Value,
    descending: bool,
) -> Result<(), EncodeError> {
    match (column_type, value) {
        (ColumnType::Bool, Value::Bool(v)) => writer.append_bool(*v, descending),
        (ColumnType::Int64, Value::Int64(v)) => writer.append_int64(*v, descending),
        (ColumnType::Float64, Value::Float64(v)) => writer.append_float64(*v, descending),
        (ColumnType::String, Value::String(v)) => writer.append_terminated(v.as_bytes(), descending),
        (ColumnType::Bytes, Value::Bytes(v)) => writer.append_terminated(v, descending),
        (ColumnType::Date, Value::Date(v)) => writer.append_int32(v.epoch_days(), descending),
        (ColumnType::Timestamp, Value::Timestamp(v)) => {
            writer.append_int64(v.seconds(), descending);
            writer.append_int64(i64::from(v.nanos()), descending);
        }
        (ColumnType::Numeric | ColumnType::PgNumeric, Value::Numeric(v)) => {
            writer.append_decimal(*v, descending);
        }
        // Raw JSON text; no canonicalization.
        (ColumnType::Json, Value::Json(v)) => writer.append_terminated(v.as_bytes(), descending),
        (_, value) => {
            return Err(EncodeError::TypeMismatch {
                column: column.to_string(),
                column_type,
                value_kind: value.kind(),
            });
        }
    }

    Ok(())
}

///
/// TESTS
///
