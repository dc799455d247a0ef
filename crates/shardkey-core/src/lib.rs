//! Core runtime for shardkey: the schema model, ordered-bytes key
//! primitives, and the mutation key encoder exported via the `prelude`.
//!
//! The encoder converts row mutations into opaque byte strings whose
//! unsigned lexicographic order reproduces the logical sort order the
//! target database imposes on the same rows. Downstream bulk-write
//! stages group and sort mutations by those bytes so deliveries land in
//! roughly physical order.

pub mod encoder;
pub mod error;
pub mod key;
pub mod mutation;
pub mod obs;
pub mod schema;
pub mod types;
pub mod value;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, writers, or registries are re-exported here.
///

pub mod prelude {
    pub use crate::{
        encoder::MutationKeyEncoder,
        mutation::{Key, KeyRange, KeySet, Mutation, WriteKind},
        schema::{ColumnType, Dialect, Schema, SchemaBuilder},
        types::{Date, Timestamp},
        value::Value,
    };
}
