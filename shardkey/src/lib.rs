//! shardkey — order-preserving mutation keys for bulk-write partitioning.
//!
//! This is the public meta-crate. Downstream users depend on **shardkey**
//! only; it re-exports the stable API from `shardkey-core`.
//!
//! A `Schema` is built once at pipeline configuration; a
//! `MutationKeyEncoder` then turns each row mutation into an opaque byte
//! string whose unsigned lexicographic order matches the database's
//! logical row order, so grouped and sorted deliveries land in roughly
//! physical order.

pub use shardkey_core as core;

pub use shardkey_core::{
    encoder::MutationKeyEncoder,
    error::{EncodeError, SchemaError},
    key::OrderedBytesWriter,
    mutation::{Delete, Key, KeyRange, KeySet, Mutation, Write, WriteBuilder, WriteKind},
    obs::warnings::UnknownTableRegistry,
    schema::{Column, ColumnType, Dialect, KeyPart, Schema, SchemaBuilder, Table},
    types::{Date, Timestamp},
    value::Value,
};

pub mod prelude {
    pub use shardkey_core::prelude::*;
}
