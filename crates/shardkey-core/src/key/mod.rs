mod scalar;
mod writer;

pub(crate) use scalar::encode_key_part;
pub use writer::OrderedBytesWriter;
