//! Decode errors on damaged streams

mod common;

use common::{encode, random_matrix};
use packmat::{
    read_columns, ErrorCategory, MatrixLoader, PackError, PackedMatrix, PackedStreams, SliceReader, StreamKind,
};
use std::sync::Arc;

/// Copy of a valid encoding with one stream rewritten
fn tampered(kind: StreamKind, edit: impl FnOnce(&mut Vec<u32>)) -> (PackedStreams<SliceReader>, u32) {
    let csc = random_matrix(17, 2000, 8, 400);
    let encoded = encode(&csc);
    let mut edit = Some(edit);
    let streams = encoded.streams().each_ref().map(|k, words: &Arc<[u32]>| {
        let mut words = words.to_vec();
        if k == kind {
            if let Some(edit) = edit.take() {
                edit(&mut words);
            }
        }
        SliceReader::from(words)
    });
    (streams, csc.shape().n_rows)
}

fn drain(reader: &mut PackedMatrix<SliceReader>) -> Result<(), PackError> {
    read_columns(reader).map(|_| ())
}

#[test]
fn test_truncated_payload() {
    let (streams, n_rows) = tampered(StreamKind::RowData, |w| {
        w.truncate(w.len() / 2);
    });
    let mut reader = PackedMatrix::new(streams, n_rows).unwrap();
    assert_eq!(drain(&mut reader), Err(PackError::UnexpectedEndOfStream));
}

#[test]
fn test_width_over_32() {
    let (streams, n_rows) = tampered(StreamKind::ValIdx, |w| w[0] = 33);
    let mut reader = PackedMatrix::new(streams, n_rows).unwrap();
    let err = drain(&mut reader).unwrap_err();
    assert_eq!(err, PackError::InvalidBitWidth);
    assert_eq!(err.category(), ErrorCategory::Decode);
}

#[test]
fn test_inflated_row_count() {
    let (streams, n_rows) = tampered(StreamKind::RowCount, |w| w[0] += 200);
    let mut reader = PackedMatrix::new(streams, n_rows).unwrap();
    assert_eq!(drain(&mut reader), Err(PackError::CorruptedData));
}

#[test]
fn test_col_ptr_past_block_count() {
    let (streams, n_rows) = tampered(StreamKind::ColPtr, |w| {
        let last = w.len() - 1;
        w[last] += 5;
    });
    let mut reader = PackedMatrix::new(streams, n_rows).unwrap();
    assert_eq!(drain(&mut reader), Err(PackError::CorruptedData));
}

#[test]
fn test_row_baseline_beyond_matrix() {
    let (streams, n_rows) = tampered(StreamKind::RowStarts, |w| w[0] = u32::MAX - 1);
    let mut reader = PackedMatrix::new(streams, n_rows).unwrap();
    let err = drain(&mut reader).unwrap_err();
    assert!(matches!(err, PackError::CorruptedData), "{err:?}");
}

#[test]
fn test_stream_length_mismatch_at_construction() {
    let (streams, n_rows) = tampered(StreamKind::RowIdx, |w| {
        w.pop();
    });
    assert_eq!(PackedMatrix::new(streams, n_rows).unwrap_err(), PackError::InvalidLayout);

    let (streams, n_rows) = tampered(StreamKind::RowCount, |w| w.push(0));
    assert_eq!(PackedMatrix::new(streams, n_rows).unwrap_err(), PackError::InvalidLayout);
}

#[test]
fn test_failure_is_sticky_until_restart() {
    let (streams, n_rows) = tampered(StreamKind::RowData, |w| w.clear());
    let mut reader = PackedMatrix::new(streams, n_rows).unwrap();
    let mut rows = [0u32; 128];
    let mut vals = [0u32; 128];

    let mut failure = None;
    while failure.is_none() && reader.next_col().unwrap() {
        if let Err(e) = reader.load(128, &mut rows, &mut vals) {
            failure = Some(e);
        }
    }
    assert_eq!(failure, Some(PackError::UnexpectedEndOfStream));
    assert_eq!(reader.load(128, &mut rows, &mut vals), Err(PackError::IteratorFailed));
    assert_eq!(reader.next_col(), Err(PackError::IteratorFailed));

    reader.restart().unwrap();
    assert!(reader.next_col().is_ok());
}
