//! Validation utilities for the packed matrix format
//!
//! Pure checks on lengths, column/block layout and labels. No I/O.

pub mod bounds;
pub mod labels;
pub mod layout;

pub use bounds::{validate_array_bounds, validate_u32_array_size};
pub use labels::{validate_label, validate_label_count};
pub use layout::{
    block_len, blocks_for_count, validate_block_streams, validate_column_span,
    validate_column_streams,
};
