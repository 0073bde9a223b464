//! Bit-packed matrix reader and writer

pub mod reader;
pub mod writer;

pub use reader::PackedMatrix;
pub use writer::{PackedMatrixWriter, WriteSummary};
