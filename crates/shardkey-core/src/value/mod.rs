use crate::types::{Date, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

///
/// Value
///
/// Dynamically typed scalar carried by a mutation.
///
/// Null  → the column is present and holds SQL NULL.
/// Unset → the column was not provided by the mutation; it sorts as the
///         maximum for the key part's direction and is distinct from
///         Null in the encoded bytes.
///

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Bool(bool),
    Bytes(Vec<u8>),
    Date(Date),
    Float64(f64),
    Int64(i64),
    Json(String),
    Null,
    Numeric(Decimal),
    String(String),
    Timestamp(Timestamp),
    Unset,
}

impl Value {
    /// Build a JSON value from raw text. The text is never
    /// canonicalized; equal texts sort equal, semantically equal
    /// documents with different spellings do not.
    #[must_use]
    pub fn json(text: impl Into<String>) -> Self {
        Self::Json(text.into())
    }

    /// Stable human-readable value kind label for diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "Bool",
            Self::Bytes(_) => "Bytes",
            Self::Date(_) => "Date",
            Self::Float64(_) => "Float64",
            Self::Int64(_) => "Int64",
            Self::Json(_) => "Json",
            Self::Null => "Null",
            Self::Numeric(_) => "Numeric",
            Self::String(_) => "String",
            Self::Timestamp(_) => "Timestamp",
            Self::Unset => "Unset",
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }
}

macro_rules! impl_from_for {
    ( $( $type:ty => $variant:ident ),* $(,)? ) => {
        $(
            impl From<$type> for Value {
                fn from(v: $type) -> Self {
                    Self::$variant(v.into())
                }
            }
        )*
    };
}

impl_from_for! {
    bool       => Bool,
    i8         => Int64,
    i16        => Int64,
    i32        => Int64,
    i64        => Int64,
    f64        => Float64,
    &str       => String,
    String     => String,
    Vec<u8>    => Bytes,
    &[u8]      => Bytes,
    Date       => Date,
    Timestamp  => Timestamp,
    Decimal    => Numeric,
}

// Canonical rendering. This text participates in the unknown-table
// fallback key as a tiebreaker, so it must stay deterministic.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Bytes(v) => {
                for byte in v {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
            Self::Date(v) => write!(f, "{v}"),
            Self::Float64(v) => write!(f, "{v:?}"),
            Self::Int64(v) => write!(f, "{v}"),
            Self::Json(v) | Self::String(v) => f.write_str(v),
            Self::Null => f.write_str("NULL"),
            Self::Numeric(v) => write!(f, "{v}"),
            Self::Timestamp(v) => write!(f, "{v}"),
            Self::Unset => f.write_str("UNSET"),
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_impls_pick_the_declared_variant() {
        assert_eq!(Value::from(7i32), Value::Int64(7));
        assert_eq!(Value::from("a"), Value::String("a".to_string()));
        assert_eq!(Value::from(vec![1u8, 2u8]), Value::Bytes(vec![1, 2]));
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(
            Value::from(Decimal::new(100, 2)),
            Value::Numeric(Decimal::new(100, 2))
        );
    }

    #[test]
    fn kind_labels_are_stable() {
        assert_eq!(Value::Null.kind(), "Null");
        assert_eq!(Value::Unset.kind(), "Unset");
        assert_eq!(Value::json("{}").kind(), "Json");
        assert_eq!(Value::from(1.5f64).kind(), "Float64");
    }

    #[test]
    fn rendering_is_deterministic() {
        assert_eq!(Value::Int64(-3).to_string(), "-3");
        assert_eq!(Value::Bytes(vec![0x00, 0xAB]).to_string(), "00ab");
        assert_eq!(Value::Null.to_string(), "NULL");
        assert_eq!(Value::Unset.to_string(), "UNSET");
        assert_eq!(Value::Float64(1.0).to_string(), "1.0");
        assert_eq!(Value::Date(Date::new(1970, 1, 2)).to_string(), "1970-01-02");
    }
}
