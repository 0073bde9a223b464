//! Value types a matrix loader may carry

/// Trait for types that can be stored as matrix values
///
/// The packed codec itself stores `u32`; decorators and in-memory matrices
/// may carry any of these.
pub trait MatrixValue: Copy + PartialEq + core::fmt::Debug + Default + 'static {
    /// Short type name used in diagnostics and manifests
    const TYPE_NAME: &'static str;
}

macro_rules! impl_matrix_value {
    ($($type:ty),*) => {
        $(
            impl MatrixValue for $type {
                const TYPE_NAME: &'static str = stringify!($type);
            }
        )*
    };
}

impl_matrix_value!(u32, u64, i32, i64, f32, f64);
