//! Abstract interfaces for the packed matrix ecosystem
//!
//! Traits only: the stream contract the codec is built on, the column-streaming
//! matrix protocol every producer and consumer shares, and the interrupt hook.

pub mod element;
pub mod interrupt;
pub mod matrix;
pub mod stream;

pub use element::MatrixValue;
pub use interrupt::{InterruptCheck, NeverInterrupt};
pub use matrix::{validate_load_request, MatrixLoader, MatrixWriter};
pub use stream::{UIntReader, UIntWriter};
