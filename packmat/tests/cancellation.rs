//! Cooperative cancellation of writes

mod common;

use common::{random_matrix, staging_files};
use packmat::{
    read_columns, CancellationToken, CscMatrix, Deadline, Error, MatrixWriter, MemoryMatrix, NeverInterrupt, PackConfig,
    PackError, PackedDir, PackedMatrixWriter, PackedStreams, VecWriter,
};
use std::cell::Cell;
use std::time::Duration;

#[test]
fn test_cancel_after_first_column_fails() {
    let csc = CscMatrix::from_triplets(3, 2, &[(0, 0, 5u32), (2, 0, 9), (1, 1, 7)]).unwrap();
    let polls = Cell::new(0u32);
    let after_first_column = || {
        polls.set(polls.get() + 1);
        polls.get() >= 1
    };

    let mut writer = PackedMatrixWriter::new(PackedStreams::<VecWriter>::default());
    let result = writer.write(&mut csc.loader(), &after_first_column);
    assert_eq!(result, Err(PackError::Interrupted));
    assert!(writer.summary().is_none());
    assert_eq!(polls.get(), 1);

    // Only the completed first column is recorded, and nothing is finalized
    let streams = writer.into_streams();
    assert_eq!(streams.col_ptr.as_slice(), [0, 1]);
    assert_eq!(streams.row_count.as_slice(), [2]);
    assert!(!streams.row_count.is_finalized());
}

#[test]
fn test_token_cancels_memory_encode() {
    let csc = random_matrix(2, 1000, 10, 500);
    let token = CancellationToken::new();
    token.cancel();
    let err = MemoryMatrix::encode(&mut csc.loader(), &PackConfig::default(), &token).unwrap_err();
    assert!(err.is_interrupted());
}

#[test]
fn test_expired_deadline() {
    let csc = random_matrix(3, 1000, 10, 500);
    let err = MemoryMatrix::encode(&mut csc.loader(), &PackConfig::default(), &Deadline::after(Duration::ZERO))
        .unwrap_err();
    assert!(matches!(err, Error::Pack(PackError::Interrupted)));
}

#[test]
fn test_interrupted_overwrite_keeps_previous_matrix() {
    let tmp = tempfile::tempdir().unwrap();
    let csc = random_matrix(4, 1000, 10, 500);
    let replacement = random_matrix(8, 700, 6, 300);
    let config = PackConfig::default();

    PackedDir::write(tmp.path(), &mut csc.loader(), &config, &NeverInterrupt).unwrap();
    let expected = read_columns(&mut csc.loader()).unwrap();

    let stop = || true;
    let err = PackedDir::write(tmp.path(), &mut replacement.loader(), &config, &stop).unwrap_err();
    assert!(err.is_interrupted());
    assert!(staging_files(tmp.path()).is_empty());

    let stored = PackedDir::open(tmp.path(), &config).unwrap();
    assert_eq!(stored.shape(), csc.shape());
    assert_eq!(read_columns(&mut stored.reader().unwrap()).unwrap(), expected);
}

#[test]
fn test_interrupted_first_write_leaves_nothing_to_open() {
    let tmp = tempfile::tempdir().unwrap();
    let csc = random_matrix(6, 1000, 10, 500);
    let stop = || true;
    let err = PackedDir::write(tmp.path(), &mut csc.loader(), &PackConfig::default(), &stop).unwrap_err();
    assert!(err.is_interrupted());
    assert!(matches!(PackedDir::open(tmp.path(), &PackConfig::default()), Err(Error::Io(_))));
}

#[test]
fn test_never_interrupt_completes() {
    let csc = random_matrix(5, 1000, 10, 500);
    let token = CancellationToken::new();
    let encoded = MemoryMatrix::encode(&mut csc.loader(), &PackConfig::default(), &token).unwrap();
    assert_eq!(encoded.summary().entries as usize, csc.nnz());
}
