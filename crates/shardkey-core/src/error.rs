use crate::schema::{ColumnType, Dialect};
use thiserror::Error as ThisError;

///
/// SchemaError
///
/// Build-time schema construction failures. Surfaced from
/// `SchemaBuilder::build`; a schema that builds is immutable and every
/// later lookup against it is infallible.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum SchemaError {
    #[error("table '{table}' declares key part '{column}' but no such column")]
    UnknownKeyColumn { table: String, column: String },

    #[error("table '{table}' declares column '{column}' more than once")]
    DuplicateColumn { table: String, column: String },

    #[error("unrecognized {dialect} type spelling '{spelling}' for column '{table}.{column}'")]
    UnknownTypeString {
        dialect: Dialect,
        table: String,
        column: String,
        spelling: String,
    },

    #[error("schema declares {count} tables, which exceeds the 32-bit table ordering space")]
    TooManyTables { count: usize },
}

///
/// EncodeError
///
/// Synchronous per-mutation encoding failures. Callers are expected to
/// drop the mutation and record a metric; nothing is retried. Unknown
/// tables are not errors — they take the fallback grouping path.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum EncodeError {
    #[error(
        "column '{column}' is declared {column_type} but the mutation carries a {value_kind} value"
    )]
    TypeMismatch {
        column: String,
        column_type: ColumnType,
        value_kind: &'static str,
    },

    #[error("delete on '{table}' carries {points} point keys; only single-point key sets are supported")]
    Unsupported { table: String, points: usize },
}
