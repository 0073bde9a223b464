//! Containers holding a complete packed encoding

pub mod dir;
pub mod memory;

pub use dir::{Manifest, PackedDir};
pub use memory::MemoryMatrix;
