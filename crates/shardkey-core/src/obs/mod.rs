//! Runtime observability. The encoder only increments counters here;
//! surfacing them (logs, metric sinks) belongs to the surrounding
//! pipeline.

pub mod warnings;
