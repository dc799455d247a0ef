mod build;

pub use build::SchemaBuilder;

use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

///
/// Dialect
///
/// Which SQL surface the schema speaks. Affects the recognized type
/// spellings and the null-ordering rule.
///

#[derive(Clone, Copy, Debug, Default, Display, Eq, PartialEq, Serialize, Deserialize)]
pub enum Dialect {
    #[default]
    #[display("GoogleStandardSql")]
    GoogleStandardSql,
    #[display("PostgreSql")]
    PostgreSql,
}

///
/// ColumnType
///
/// Logical column type after spelling resolution. Dialect-specific
/// spellings collapse onto this set; only `Numeric`/`PgNumeric` stay
/// split because the dialects draw them from different value domains.
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, Serialize, Deserialize)]
pub enum ColumnType {
    #[display("BOOL")]
    Bool,
    #[display("BYTES")]
    Bytes,
    #[display("DATE")]
    Date,
    #[display("FLOAT64")]
    Float64,
    #[display("INT64")]
    Int64,
    #[display("JSON")]
    Json,
    #[display("NUMERIC")]
    Numeric,
    #[display("PG_NUMERIC")]
    PgNumeric,
    #[display("STRING")]
    String,
    #[display("TIMESTAMP")]
    Timestamp,
}

impl ColumnType {
    /// Resolve a dialect type spelling, case-insensitively. Spellings
    /// with a length parameter (`STRING(MAX)`, `character varying(10)`)
    /// resolve to their base type. Unknown spellings return `None` and
    /// fail the schema build.
    #[must_use]
    pub(crate) fn parse(dialect: Dialect, spelling: &str) -> Option<Self> {
        let lowered = spelling.trim().to_ascii_lowercase();
        let base = lowered.split('(').next().unwrap_or_default().trim_end();

        let resolved = match dialect {
            Dialect::GoogleStandardSql => match base {
                "bool" => Self::Bool,
                "bytes" => Self::Bytes,
                "date" => Self::Date,
                "float64" => Self::Float64,
                "int64" => Self::Int64,
                "json" => Self::Json,
                "numeric" => Self::Numeric,
                "string" => Self::String,
                "timestamp" => Self::Timestamp,
                _ => return None,
            },
            Dialect::PostgreSql => match base {
                "boolean" => Self::Bool,
                "bytea" => Self::Bytes,
                "date" => Self::Date,
                "double precision" => Self::Float64,
                "bigint" => Self::Int64,
                "jsonb" => Self::Json,
                "numeric" => Self::PgNumeric,
                "character varying" | "text" => Self::String,
                "timestamp with time zone" => Self::Timestamp,
                _ => return None,
            },
        };

        Some(resolved)
    }
}

///
/// Column
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Column {
    name: String,
    column_type: ColumnType,
}

impl Column {
    pub(crate) const fn new(name: String, column_type: ColumnType) -> Self {
        Self { name, column_type }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn column_type(&self) -> ColumnType {
        self.column_type
    }
}

///
/// KeyPart
///
/// One column of a table's declared primary key, with its direction.
/// The column type is resolved once at build time so encoding never
/// performs a fallible column lookup.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct KeyPart {
    column: String,
    column_type: ColumnType,
    descending: bool,
}

impl KeyPart {
    pub(crate) const fn new(column: String, column_type: ColumnType, descending: bool) -> Self {
        Self {
            column,
            column_type,
            descending,
        }
    }

    #[must_use]
    pub fn column(&self) -> &str {
        &self.column
    }

    #[must_use]
    pub const fn column_type(&self) -> ColumnType {
        self.column_type
    }

    #[must_use]
    pub const fn descending(&self) -> bool {
        self.descending
    }
}

///
/// Table
///
/// Invariants (enforced by `SchemaBuilder::build`):
/// - every key part names a declared column
/// - `position` is the table's rank in the schema's name-sorted order
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Table {
    name: String,
    position: u32,
    columns: BTreeMap<String, Column>,
    key_parts: Vec<KeyPart>,
}

impl Table {
    pub(crate) const fn new(
        name: String,
        position: u32,
        columns: BTreeMap<String, Column>,
        key_parts: Vec<KeyPart>,
    ) -> Self {
        Self {
            name,
            position,
            columns,
            key_parts,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rank of this table in the schema's name-sorted table order; the
    /// 4-byte big-endian key prefix.
    #[must_use]
    pub const fn position(&self) -> u32 {
        self.position
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.values()
    }

    /// Declared primary-key parts, in key order.
    #[must_use]
    pub fn key_parts(&self) -> &[KeyPart] {
        &self.key_parts
    }
}

///
/// Schema
///
/// Immutable set of known tables, built once at pipeline configuration
/// and shared by reference across encoder instances and worker threads.
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    dialect: Dialect,
    tables: BTreeMap<String, Table>,
}

impl Schema {
    pub(crate) const fn new(dialect: Dialect, tables: BTreeMap<String, Table>) -> Self {
        Self { dialect, tables }
    }

    /// Start a builder for the given dialect.
    #[must_use]
    pub fn builder(dialect: Dialect) -> SchemaBuilder {
        SchemaBuilder::new(dialect)
    }

    #[must_use]
    pub const fn dialect(&self) -> Dialect {
        self.dialect
    }

    #[must_use]
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    /// Tables in name-sorted order, which is also position order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn google_spellings_resolve_case_insensitively() {
        let d = Dialect::GoogleStandardSql;
        assert_eq!(ColumnType::parse(d, "INT64"), Some(ColumnType::Int64));
        assert_eq!(ColumnType::parse(d, "int64"), Some(ColumnType::Int64));
        assert_eq!(ColumnType::parse(d, "STRING(MAX)"), Some(ColumnType::String));
        assert_eq!(ColumnType::parse(d, "BYTES(256)"), Some(ColumnType::Bytes));
        assert_eq!(ColumnType::parse(d, "NUMERIC"), Some(ColumnType::Numeric));
        assert_eq!(ColumnType::parse(d, "bigint"), None);
    }

    #[test]
    fn postgres_spellings_resolve_to_their_base_types() {
        let d = Dialect::PostgreSql;
        assert_eq!(ColumnType::parse(d, "bigint"), Some(ColumnType::Int64));
        assert_eq!(ColumnType::parse(d, "boolean"), Some(ColumnType::Bool));
        assert_eq!(
            ColumnType::parse(d, "double precision"),
            Some(ColumnType::Float64)
        );
        assert_eq!(
            ColumnType::parse(d, "character varying(10)"),
            Some(ColumnType::String)
        );
        assert_eq!(ColumnType::parse(d, "text"), Some(ColumnType::String));
        assert_eq!(ColumnType::parse(d, "bytea"), Some(ColumnType::Bytes));
        assert_eq!(
            ColumnType::parse(d, "timestamp with time zone"),
            Some(ColumnType::Timestamp)
        );
        assert_eq!(ColumnType::parse(d, "numeric"), Some(ColumnType::PgNumeric));
        assert_eq!(ColumnType::parse(d, "jsonb"), Some(ColumnType::Json));
        assert_eq!(ColumnType::parse(d, "INT64"), None);
    }
}
