//! Format constants for packed matrix storage

/// Format name recorded in on-disk manifests
pub const FORMAT_NAME: &str = "packmat";

/// Current format version
pub const FORMAT_VERSION: u32 = 1;

/// File name of the on-disk manifest
pub const MANIFEST_FILE: &str = "manifest.json";

/// Extension of on-disk stream files
pub const STREAM_FILE_EXTENSION: &str = "bin";

/// Bytes per stored integer
pub const WORD_BYTES: usize = 4;

/// Maximum label length in bytes
pub const MAX_LABEL_LEN: usize = 1024;
