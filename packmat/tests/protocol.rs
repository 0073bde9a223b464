//! Column-streaming behaviour of the packed reader

mod common;

use common::{encode, matrix_from_columns, normalized, random_matrix};
use packmat::{read_columns, CscMatrix, MatrixLoader, PackError, BLOCK_SIZE};

#[test]
fn test_three_by_two_scenario() {
    let csc = CscMatrix::from_triplets(3, 2, &[(0, 0, 5u32), (2, 0, 9), (1, 1, 7)]).unwrap();
    let encoded = encode(&csc);
    let streams = encoded.streams();
    assert_eq!(&streams.row_count[..], &[2, 1]);

    let mut reader = encoded.reader().unwrap();
    assert_eq!(reader.rows(), 3);
    assert_eq!(reader.cols(), 2);
    assert_eq!(
        normalized(read_columns(&mut reader).unwrap()),
        vec![vec![(0, 5), (2, 9)], vec![(1, 7)]]
    );
}

#[test]
fn test_column_of_129_entries_spans_two_blocks() {
    let column: Vec<(u32, u32)> = (0..129u32).map(|r| (r * 3, r * 7 + 1)).collect();
    let csc = matrix_from_columns(400, &vec![column.clone()]);
    let encoded = encode(&csc);
    assert_eq!(encoded.summary().blocks, 2);
    assert_eq!(&encoded.streams().col_ptr[..], &[0, 2]);

    let mut reader = encoded.reader().unwrap();
    assert!(reader.next_col().unwrap());
    let mut rows = vec![0u32; 200];
    let mut vals = vec![0u32; 200];
    assert_eq!(reader.load(200, &mut rows, &mut vals), Ok(129));
    let decoded: Vec<_> = rows[..129].iter().copied().zip(vals[..129].iter().copied()).collect();
    assert_eq!(decoded, column);
}

#[test]
fn test_partial_loads_match_whole_column_load() {
    let csc = random_matrix(7, 5000, 12, 700);
    let encoded = encode(&csc);

    for chunk in [1usize, 3, 127, 128, 129, 500] {
        let mut reader = encoded.reader().unwrap();
        let mut whole = encoded.reader().unwrap();
        let mut rows = vec![0u32; chunk];
        let mut vals = vec![0u32; chunk];

        while reader.next_col().unwrap() {
            assert!(whole.next_col().unwrap());
            let len = reader.current_len().unwrap() as usize;

            let mut piecewise = Vec::new();
            loop {
                let n = reader.load(chunk, &mut rows, &mut vals).unwrap();
                if n == 0 {
                    break;
                }
                assert!(n <= chunk);
                piecewise.extend(rows[..n].iter().copied().zip(vals[..n].iter().copied()));
            }

            let mut all_rows = vec![0u32; len];
            let mut all_vals = vec![0u32; len];
            assert_eq!(whole.load(len, &mut all_rows, &mut all_vals), Ok(len));
            let at_once: Vec<_> = all_rows.into_iter().zip(all_vals).collect();

            assert_eq!(piecewise, at_once, "chunk size {chunk}");
        }
        assert!(!whole.next_col().unwrap());
    }
}

#[test]
fn test_exhausted_column_keeps_returning_zero() {
    let csc = random_matrix(11, 300, 3, 200);
    let encoded = encode(&csc);
    let mut reader = encoded.reader().unwrap();
    let mut rows = vec![0u32; BLOCK_SIZE * 2];
    let mut vals = vec![0u32; BLOCK_SIZE * 2];

    while reader.next_col().unwrap() {
        while reader.load(64, &mut rows, &mut vals).unwrap() > 0 {}
        for _ in 0..3 {
            assert_eq!(reader.load(64, &mut rows, &mut vals), Ok(0));
        }
        assert_eq!(reader.current_idx(), reader.current_len().unwrap());
    }
}

#[test]
fn test_restart_reproduces_traversal() {
    let csc = random_matrix(3, 2000, 20, 400);
    let encoded = encode(&csc);
    let mut reader = encoded.reader().unwrap();

    let first = read_columns(&mut reader).unwrap();
    reader.restart().unwrap();
    assert_eq!(reader.current_col(), None);
    let second = read_columns(&mut reader).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_restart_mid_column() {
    let csc = random_matrix(5, 1000, 4, 500);
    let encoded = encode(&csc);
    let expected = read_columns(&mut encoded.reader().unwrap()).unwrap();

    let mut reader = encoded.reader().unwrap();
    reader.next_col().unwrap();
    reader.next_col().unwrap();
    let mut rows = [0u32; 5];
    let mut vals = [0u32; 5];
    reader.load(5, &mut rows, &mut vals).unwrap();

    assert_eq!(read_columns(&mut reader).unwrap(), expected);
}

#[test]
fn test_skipping_columns_without_loading() {
    let csc = random_matrix(9, 800, 10, 300);
    let encoded = encode(&csc);
    let expected = read_columns(&mut encoded.reader().unwrap()).unwrap();

    // Only read odd columns, leaving even ones untouched or half-read
    let mut reader = encoded.reader().unwrap();
    let mut rows = vec![0u32; 1000];
    let mut vals = vec![0u32; 1000];
    while reader.next_col().unwrap() {
        let col = reader.current_col().unwrap();
        if col % 2 == 0 {
            if col % 4 == 0 {
                reader.load(3, &mut rows, &mut vals).unwrap();
            }
            continue;
        }
        let n = reader.load(1000, &mut rows, &mut vals).unwrap();
        let got: Vec<_> = rows[..n].iter().copied().zip(vals[..n].iter().copied()).collect();
        assert_eq!(got, expected[col as usize]);
    }
}

#[test]
fn test_every_column_is_visited() {
    let columns = vec![vec![], vec![(2, 1)], vec![], vec![], vec![(0, 4), (1, 4)], vec![]];
    let encoded = encode(&matrix_from_columns(3, &columns));
    assert_eq!(&encoded.streams().row_count[..], &[0, 1, 0, 0, 2, 0]);

    let mut reader = encoded.reader().unwrap();
    let mut visited = Vec::new();
    while reader.next_col().unwrap() {
        visited.push(reader.current_col().unwrap());
    }
    assert_eq!(visited, [0, 1, 2, 3, 4, 5]);
    assert_eq!(reader.current_col(), None);
}

#[test]
fn test_load_requires_a_column() {
    let encoded = encode(&random_matrix(1, 10, 2, 5));
    let mut reader = encoded.reader().unwrap();
    let mut rows = [0u32; 4];
    let mut vals = [0u32; 4];
    assert_eq!(reader.load(4, &mut rows, &mut vals), Err(PackError::NoCurrentColumn));
    while reader.next_col().unwrap() {}
    assert_eq!(reader.load(4, &mut rows, &mut vals), Err(PackError::NoCurrentColumn));
}
