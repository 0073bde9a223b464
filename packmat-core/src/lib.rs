#![cfg_attr(not(test), no_std)]

//! packmat-core - Bit-Packed Sparse Matrix Format Definitions
//!
//! This crate provides the fixed-block bit-packing codec, the seven-stream
//! format definitions and the traits every packed matrix reader, writer and
//! decorator is built against. It performs no I/O.

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod bitpack;
pub mod error;
pub mod format;
pub mod traits;
pub mod validation;

pub use bitpack::{BlockHeader, Baseline, BLOCK_SIZE, MAX_BIT_WIDTH};
pub use error::*;
pub use format::*;
pub use traits::*;
