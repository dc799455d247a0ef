use crate::value::Value;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};

///
/// WriteKind
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, Serialize, Deserialize)]
pub enum WriteKind {
    #[display("insert")]
    Insert,
    #[display("insert_or_update")]
    InsertOrUpdate,
    #[display("replace")]
    Replace,
    #[display("update")]
    Update,
}

///
/// Mutation
///
/// A row-level write intent or a delete referencing a key set.
///

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Mutation {
    Write(Write),
    Delete(Delete),
}

impl Mutation {
    #[must_use]
    pub fn insert(table: impl Into<String>) -> WriteBuilder {
        WriteBuilder::new(WriteKind::Insert, table.into())
    }

    #[must_use]
    pub fn insert_or_update(table: impl Into<String>) -> WriteBuilder {
        WriteBuilder::new(WriteKind::InsertOrUpdate, table.into())
    }

    #[must_use]
    pub fn replace(table: impl Into<String>) -> WriteBuilder {
        WriteBuilder::new(WriteKind::Replace, table.into())
    }

    #[must_use]
    pub fn update(table: impl Into<String>) -> WriteBuilder {
        WriteBuilder::new(WriteKind::Update, table.into())
    }

    #[must_use]
    pub fn delete(table: impl Into<String>, key_set: KeySet) -> Self {
        Self::Delete(Delete {
            table: table.into(),
            key_set,
        })
    }

    #[must_use]
    pub fn table(&self) -> &str {
        match self {
            Self::Write(write) => write.table(),
            Self::Delete(delete) => delete.table(),
        }
    }
}

// Canonical rendering. Deterministic by construction: write columns
// render in name order, key parts in key order. The unknown-table
// fallback encodes this text as a tiebreaker.
impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Write(write) => write.fmt(f),
            Self::Delete(delete) => delete.fmt(f),
        }
    }
}

///
/// Write
///
/// Row write intent. Key-column values are looked up by name; non-key
/// columns never influence the encoded key.
///

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Write {
    kind: WriteKind,
    table: String,
    columns: BTreeMap<String, Value>,
}

impl Write {
    #[must_use]
    pub const fn kind(&self) -> WriteKind {
        self.kind
    }

    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(|(name, value)| (name.as_str(), value))
    }

    #[must_use]
    pub fn value_of(&self, column: &str) -> Option<&Value> {
        self.columns.get(column)
    }
}

impl fmt::Display for Write {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}){{", self.kind, self.table)?;
        for (i, (name, value)) in self.columns.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{name}={value}")?;
        }
        f.write_str("}")
    }
}

///
/// WriteBuilder
///

#[derive(Clone, Debug)]
pub struct WriteBuilder {
    write: Write,
}

impl WriteBuilder {
    fn new(kind: WriteKind, table: String) -> Self {
        Self {
            write: Write {
                kind,
                table,
                columns: BTreeMap::new(),
            },
        }
    }

    /// Set a column value. Setting the same column twice keeps the
    /// latest value.
    #[must_use]
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.write.columns.insert(column.into(), value.into());
        self
    }

    #[must_use]
    pub fn build(self) -> Mutation {
        Mutation::Write(self.write)
    }
}

///
/// Delete
///

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Delete {
    table: String,
    key_set: KeySet,
}

impl Delete {
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    #[must_use]
    pub const fn key_set(&self) -> &KeySet {
        &self.key_set
    }
}

impl fmt::Display for Delete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "delete({}){{{}}}", self.table, self.key_set)
    }
}

///
/// Key
///
/// Ordered sequence of typed scalar values, positionally matched to a
/// table's declared key parts.
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Key {
    parts: Vec<Value>,
}

impl Key {
    #[must_use]
    pub const fn new() -> Self {
        Self { parts: Vec::new() }
    }

    /// Single-component key.
    #[must_use]
    pub fn of(value: impl Into<Value>) -> Self {
        Self::new().append(value)
    }

    /// Append one more key component.
    #[must_use]
    pub fn append(mut self, value: impl Into<Value>) -> Self {
        self.parts.push(value.into());
        self
    }

    #[must_use]
    pub fn parts(&self) -> &[Value] {
        &self.parts
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

impl From<Vec<Value>> for Key {
    fn from(parts: Vec<Value>) -> Self {
        Self { parts }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{part}")?;
        }
        f.write_str(")")
    }
}

///
/// KeyRange
///
/// Contiguous span of keys. The encoder treats every range delete as
/// non-point; the bounds exist for rendering and for the surrounding
/// pipeline.
///

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeyRange {
    start: Key,
    end: Key,
}

impl KeyRange {
    #[must_use]
    pub const fn between(start: Key, end: Key) -> Self {
        Self { start, end }
    }

    /// Range covering every key that begins with `prefix`.
    #[must_use]
    pub fn prefix(prefix: Key) -> Self {
        Self {
            start: prefix.clone(),
            end: prefix,
        }
    }

    #[must_use]
    pub const fn start(&self) -> &Key {
        &self.start
    }

    #[must_use]
    pub const fn end(&self) -> &Key {
        &self.end
    }
}

impl fmt::Display for KeyRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}..{}]", self.start, self.end)
    }
}

///
/// KeySet
///

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum KeySet {
    /// Every row in the table.
    All,
    /// Explicit point keys.
    Points(Vec<Key>),
    /// Key ranges.
    Ranges(Vec<KeyRange>),
}

impl KeySet {
    #[must_use]
    pub const fn all() -> Self {
        Self::All
    }

    #[must_use]
    pub fn point(key: Key) -> Self {
        Self::Points(vec![key])
    }

    #[must_use]
    pub const fn points(keys: Vec<Key>) -> Self {
        Self::Points(keys)
    }

    #[must_use]
    pub fn prefix_range(prefix: Key) -> Self {
        Self::Ranges(vec![KeyRange::prefix(prefix)])
    }

    #[must_use]
    pub const fn ranges(ranges: Vec<KeyRange>) -> Self {
        Self::Ranges(ranges)
    }
}

impl fmt::Display for KeySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Points(keys) => {
                f.write_str("points[")?;
                for (i, key) in keys.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{key}")?;
                }
                f.write_str("]")
            }
            Self::Ranges(ranges) => {
                f.write_str("ranges[")?;
                for (i, range) in ranges.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{range}")?;
                }
                f.write_str("]")
            }
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
    fn builder_collects_columns_by_name() {
        let mutation = Mutation::insert_or_update("test")
            .set("keydesc", 2i64)
            .set("key", 1i64)
            .build();

        let Mutation::Write(write) = &mutation else {
            panic!("expected a write mutation");
        };
        assert_eq!(write.kind(), WriteKind::InsertOrUpdate);
        assert_eq!(write.table(), "test");
        assert_eq!(write.value_of("key"), Some(&Value::Int64(1)));
        assert_eq!(write.value_of("keydesc"), Some(&Value::Int64(2)));
        assert_eq!(write.value_of("other"), None);
    }

    #[test]
    fn rendering_is_stable_and_name_ordered() {
        let mutation = Mutation::insert_or_update("test")
            .set("keydesc", Value::Null)
            .set("key", "a")
            .build();
        assert_eq!(mutation.to_string(), "insert_or_update(test){key=a,keydesc=NULL}");

        let delete = Mutation::delete("test", KeySet::point(Key::of(2i64)));
        assert_eq!(delete.to_string(), "delete(test){points[(2)]}");

        let all = Mutation::delete("test", KeySet::all());
        assert_eq!(all.to_string(), "delete(test){all}");

        let range = Mutation::delete("test", KeySet::prefix_range(Key::of(1i64)));
        assert_eq!(range.to_string(), "delete(test){ranges[[(1)..(1)]]}");
    }

    #[test]
    fn composite_keys_keep_component_order() {
        let key = Key::of(1i64).append("a").append(Value::Null);
        assert_eq!(key.len(), 3);
        assert_eq!(
            key.parts(),
            [
                Value::Int64(1),
                Value::String("a".to_string()),
                Value::Null
            ]
        );
        assert_eq!(key.to_string(), "(1,a,NULL)");
    }

    #[test]
    fn table_is_reachable_for_both_variants() {
        let write = Mutation::insert("t1").set("key", 1i64).build();
        let delete = Mutation::delete("t2", KeySet::all());
        assert_eq!(write.table(), "t1");
        assert_eq!(delete.table(), "t2");
    }
}
