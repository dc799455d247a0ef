use crate::{
    error::EncodeError,
    key::{OrderedBytesWriter, encode_key_part},
    mutation::{Delete, Key, KeySet, Mutation, Write},
    obs::warnings::{self, UnknownTableRegistry},
    schema::{Schema, Table},
};
use std::{collections::BTreeMap, sync::Arc};

/// Table-group prefix reserved for mutations whose table is missing
/// from the schema. `SchemaBuilder::build` bounds the table count so no
/// known table is ever assigned this position.
const UNKNOWN_TABLE_POSITION: u32 = u32::MAX;

///
/// MutationKeyEncoder
///
/// Stateless facade over an immutable `Schema`: converts one mutation
/// into the opaque byte string downstream stages group and sort by.
/// Encoding is pure CPU and deterministic; the only shared state is the
/// warnings registry, whose counters are atomic, so one encoder may be
/// used from any number of worker threads.
///

#[derive(Clone, Debug)]
pub struct MutationKeyEncoder {
    schema: Arc<Schema>,
    warnings: Arc<UnknownTableRegistry>,
}

impl MutationKeyEncoder {
    /// Encoder reporting unknown tables into the process-wide registry.
    #[must_use]
    pub fn new(schema: impl Into<Arc<Schema>>) -> Self {
        Self::with_registry(schema, warnings::global())
    }

    /// Encoder reporting unknown tables into a caller-owned registry.
    #[must_use]
    pub fn with_registry(
        schema: impl Into<Arc<Schema>>,
        warnings: Arc<UnknownTableRegistry>,
    ) -> Self {
        Self {
            schema: schema.into(),
            warnings,
        }
    }

    /// Encode the mutation's table-group prefix followed by its key
    /// columns.
    ///
    /// Unknown tables are not errors: they group after every known
    /// table, keyed by table name and a canonical rendering of the
    /// mutation, and bump the warnings registry.
    pub fn encode_table_name_and_key(&self, mutation: &Mutation) -> Result<Vec<u8>, EncodeError> {
        let mut writer = OrderedBytesWriter::new();

        let Some(table) = self.schema.table(mutation.table()) else {
            self.encode_unknown_table(&mut writer, mutation);
            return Ok(writer.into_bytes());
        };

        writer.append_table_position(table.position());
        match mutation {
            Mutation::Write(write) => self.encode_write_key(&mut writer, table, write)?,
            Mutation::Delete(delete) => self.encode_delete_key(&mut writer, table, delete)?,
        }

        Ok(writer.into_bytes())
    }

    /// Snapshot of the process-wide unknown-table warning counters,
    /// shared across every encoder built with `new`.
    #[must_use]
    pub fn unknown_tables_warnings_map() -> BTreeMap<String, u64> {
        warnings::global().snapshot()
    }

    fn encode_unknown_table(&self, writer: &mut OrderedBytesWriter, mutation: &Mutation) {
        self.warnings.increment_and_get(mutation.table());

        writer.append_table_position(UNKNOWN_TABLE_POSITION);
        writer.append_terminated(mutation.table().as_bytes(), false);
        // Canonical rendering as a tiebreaker so equal-table mutations
        // still order deterministically.
        writer.append_terminated(mutation.to_string().as_bytes(), false);
    }

    fn encode_write_key(
        &self,
        writer: &mut OrderedBytesWriter,
        table: &Table,
        write: &Write,
    ) -> Result<(), EncodeError> {
        for part in table.key_parts() {
            encode_key_part(
                writer,
                part.column(),
                part.column_type(),
                self.schema.dialect(),
                write.value_of(part.column()),
                part.descending(),
            )?;
        }

        Ok(())
    }

    // Non-point deletes stop at the table prefix: the shorter byte
    // string groups them strictly before every point delete and write
    // on the same table.
    fn encode_delete_key(
        &self,
        writer: &mut OrderedBytesWriter,
        table: &Table,
        delete: &Delete,
    ) -> Result<(), EncodeError> {
        match delete.key_set() {
            KeySet::All | KeySet::Ranges(_) => Ok(()),
            KeySet::Points(points) => match points.as_slice() {
                [key] => self.encode_point_key(writer, table, key),
                _ => Err(EncodeError::Unsupported {
                    table: table.name().to_string(),
                    points: points.len(),
                }),
            },
        }
    }

    fn encode_point_key(
        &self,
        writer: &mut OrderedBytesWriter,
        table: &Table,
        key: &Key,
    ) -> Result<(), EncodeError> {
        for (i, part) in table.key_parts().iter().enumerate() {
            encode_key_part(
                writer,
                part.column(),
                part.column_type(),
                self.schema.dialect(),
                key.parts().get(i),
                part.descending(),
            )?;
        }

        Ok(())
    }
}

///
/// TESTS
///
