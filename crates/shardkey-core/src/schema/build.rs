use super::{Column, ColumnType, Dialect, KeyPart, Schema, Table};
use crate::error::SchemaError;
use std::collections::BTreeMap;

///
/// SchemaBuilder
///
/// Accumulates raw table declarations and validates them into an
/// immutable `Schema`. Type spellings and key-part references are
/// resolved at build time so a stale declaration fails the pipeline
/// configuration step, never an encode call.
///

#[derive(Clone, Debug, Default)]
pub struct SchemaBuilder {
    dialect: Dialect,
    tables: BTreeMap<String, RawTable>,
}

#[derive(Clone, Debug, Default)]
struct RawTable {
    // Declaration order is kept so duplicate reporting is stable.
    columns: Vec<(String, String)>,
    key_parts: Vec<(String, bool)>,
}

impl SchemaBuilder {
    #[must_use]
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            tables: BTreeMap::new(),
        }
    }

    /// Declare a column with a dialect type spelling (e.g. `INT64`,
    /// `bigint`). The spelling is resolved in `build`.
    pub fn add_column(
        &mut self,
        table: impl Into<String>,
        column: impl Into<String>,
        spelling: impl Into<String>,
    ) -> &mut Self {
        self.tables
            .entry(table.into())
            .or_default()
            .columns
            .push((column.into(), spelling.into()));
        self
    }

    /// Declare the next primary-key part of a table. Parts accumulate
    /// in the database's declared key order.
    pub fn add_key_part(
        &mut self,
        table: impl Into<String>,
        column: impl Into<String>,
        descending: bool,
    ) -> &mut Self {
        self.tables
            .entry(table.into())
            .or_default()
            .key_parts
            .push((column.into(), descending));
        self
    }

    /// Validate the accumulated declarations into an immutable schema.
    ///
    /// Table positions are assigned from the Unicode-codepoint order of
    /// table names. The topmost position is reserved for the
    /// unknown-table group, so a schema touching the 32-bit ceiling is
    /// rejected.
    pub fn build(&self) -> Result<Schema, SchemaError> {
        if u32::try_from(self.tables.len()).is_err() {
            return Err(SchemaError::TooManyTables {
                count: self.tables.len(),
            });
        }

        let mut tables = BTreeMap::new();
        for (position, (name, raw)) in self.tables.iter().enumerate() {
            let table = self.build_table(name, position, raw)?;
            tables.insert(name.clone(), table);
        }

        Ok(Schema::new(self.dialect, tables))
    }

    fn build_table(
        &self,
        name: &str,
        position: usize,
        raw: &RawTable,
    ) -> Result<Table, SchemaError> {
        let mut columns = BTreeMap::new();
        for (column, spelling) in &raw.columns {
            let column_type = ColumnType::parse(self.dialect, spelling).ok_or_else(|| {
                SchemaError::UnknownTypeString {
                    dialect: self.dialect,
                    table: name.to_string(),
                    column: column.clone(),
                    spelling: spelling.clone(),
                }
            })?;

            let declared = Column::new(column.clone(), column_type);
            if columns.insert(column.clone(), declared).is_some() {
                return Err(SchemaError::DuplicateColumn {
                    table: name.to_string(),
                    column: column.clone(),
                });
            }
        }

        let mut key_parts = Vec::with_capacity(raw.key_parts.len());
        for (column, descending) in &raw.key_parts {
            let declared: &Column =
                columns
                    .get(column)
                    .ok_or_else(|| SchemaError::UnknownKeyColumn {
                        table: name.to_string(),
                        column: column.clone(),
                    })?;
            key_parts.push(KeyPart::new(
                column.clone(),
                declared.column_type(),
                *descending,
            ));
        }

        let position = u32::try_from(position).unwrap_or(u32::MAX);
        Ok(Table::new(name.to_string(), position, columns, key_parts))
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_follow_name_sorted_order() {
        let mut builder = SchemaBuilder::new(Dialect::GoogleStandardSql);
        builder.add_column("zeta", "key", "INT64");
        builder.add_key_part("zeta", "key", false);
        builder.add_column("alpha", "key", "INT64");
        builder.add_key_part("alpha", "key", false);
        builder.add_column("mid", "key", "INT64");
        builder.add_key_part("mid", "key", false);

        let schema = builder.build().unwrap();
        assert_eq!(schema.table("alpha").unwrap().position(), 0);
        assert_eq!(schema.table("mid").unwrap().position(), 1);
        assert_eq!(schema.table("zeta").unwrap().position(), 2);

        let names: Vec<_> = schema.tables().map(Table::name).collect();
        assert_eq!(names, ["alpha", "mid", "zeta"]);
    }

    #[test]
    fn key_parts_resolve_their_column_types() {
        let mut builder = SchemaBuilder::new(Dialect::PostgreSql);
        builder.add_column("t", "key", "bigint");
        builder.add_column("t", "name", "character varying");
        builder.add_key_part("t", "key", false);
        builder.add_key_part("t", "name", true);

        let schema = builder.build().unwrap();
        let parts = schema.table("t").unwrap().key_parts();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].column_type(), ColumnType::Int64);
        assert!(!parts[0].descending());
        assert_eq!(parts[1].column_type(), ColumnType::String);
        assert!(parts[1].descending());
    }

    #[test]
    fn unknown_key_column_fails_build() {
        let mut builder = SchemaBuilder::new(Dialect::GoogleStandardSql);
        builder.add_column("t", "key", "INT64");
        builder.add_key_part("t", "missing", false);

        assert_eq!(
            builder.build(),
            Err(SchemaError::UnknownKeyColumn {
                table: "t".to_string(),
                column: "missing".to_string(),
            })
        );
    }

    #[test]
    fn duplicate_column_fails_build() {
        let mut builder = SchemaBuilder::new(Dialect::GoogleStandardSql);
        builder.add_column("t", "key", "INT64");
        builder.add_column("t", "key", "STRING");

        assert_eq!(
            builder.build(),
            Err(SchemaError::DuplicateColumn {
                table: "t".to_string(),
                column: "key".to_string(),
            })
        );
    }

    #[test]
    fn unknown_type_spelling_fails_build() {
        let mut builder = SchemaBuilder::new(Dialect::GoogleStandardSql);
        builder.add_column("t", "key", "bigint");

        let err = builder.build().unwrap_err();
        assert!(matches!(err, SchemaError::UnknownTypeString { .. }));
    }

    #[test]
    fn key_part_may_be_declared_before_its_column() {
        let mut builder = SchemaBuilder::new(Dialect::GoogleStandardSql);
        builder.add_key_part("t", "key", false);
        builder.add_column("t", "key", "INT64");

        assert!(builder.build().is_ok());
    }
}
