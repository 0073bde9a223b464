//! Loader decorators that forward the column protocol unchanged

pub mod rename;

pub use rename::{Rename, RenameDims};
