//! Format definitions for the bit-packed matrix encoding
//!
//! Pure data definitions: the seven parallel integer streams, their names,
//! the matrix shape and the byte order of stored words. No I/O.

pub mod constants;
pub mod shape;
pub mod streams;
pub mod words;

pub use shape::MatrixShape;
pub use streams::{PackedStreams, StreamKind};
pub use words::{words_from_le_bytes, words_to_le_bytes};
