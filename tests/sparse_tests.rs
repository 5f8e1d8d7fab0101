use rusqlite::{params, Connection};
use vector_sql::{
    sparse::{decode, decode_binary, encode, encode_binary, SparseVector},
    VectorSQLError,
};

#[test]
fn test_from_dense_keeps_only_nonzero_elements() {
    let sparse = SparseVector::from_dense(&[0.0, 1.5, 0.0, 2.0, 0.0]);
    assert_eq!(sparse.dimensions(), 5);
    assert_eq!(sparse.nnz(), 2);
    assert_eq!(sparse.indices(), &[1, 3]);
    assert_eq!(sparse.values(), &[1.5, 2.0]);
    assert_eq!(
        sparse.to_dense().as_slice(),
        &[0.0, 1.5, 0.0, 2.0, 0.0]
    );
}

#[test]
fn test_from_pairs_sorts_and_drops_zeros() {
    let sparse = SparseVector::from_pairs(6, &[(4, 2.0), (1, 1.5), (3, 0.0)]).unwrap();
    assert_eq!(sparse.indices(), &[1, 4]);
    assert_eq!(sparse.values(), &[1.5, 2.0]);
    assert_eq!(sparse.dimensions(), 6);
}

#[test]
fn test_from_pairs_rejects_bad_indices() {
    let err = SparseVector::from_pairs(3, &[(3, 1.0)]).unwrap_err();
    assert!(matches!(err, VectorSQLError::FormatError(_)));

    let err = SparseVector::from_pairs(3, &[(1, 1.0), (1, 2.0)]).unwrap_err();
    assert!(matches!(err, VectorSQLError::FormatError(_)));
}

#[test]
fn test_encode_canonical_form() {
    // Text indices are 1-based
    let sparse = SparseVector::from_dense(&[0.0, 1.5, 0.0, 2.0, 0.0]);
    assert_eq!(encode(&sparse), "{2:1.5,4:2}/5");

    let empty = SparseVector::from_dense(&[0.0, 0.0, 0.0]);
    assert_eq!(encode(&empty), "{}/3");
}

#[test]
fn test_decode_basic() {
    let sparse = decode("{2:1.5,4:2}/5").unwrap();
    assert_eq!(sparse.dimensions(), 5);
    assert_eq!(sparse.indices(), &[1, 3]);
    assert_eq!(sparse.values(), &[1.5, 2.0]);

    let empty = decode("{}/3").unwrap();
    assert_eq!(empty.nnz(), 0);
    assert_eq!(empty.to_dense().as_slice(), &[0.0, 0.0, 0.0]);
}

#[test]
fn test_decode_tolerates_whitespace() {
    let sparse = decode(" { 2:1.5 , 4:2 } / 5 ").unwrap();
    assert_eq!(sparse.indices(), &[1, 3]);
    assert_eq!(sparse.dimensions(), 5);
}

#[test]
fn test_decode_rejects_malformed_input() {
    let cases = [
        "{1:1,2}/3",   // element without a value
        "{1:1}",       // missing dimension count
        "1:1/3",       // missing braces
        "{0:1}/3",     // text indices start at 1
        "{4:1}/3",     // index beyond dimensions
        "{2:1,1:2}/3", // out of order
        "{1:1,1:2}/3", // duplicate
        "{1:x}/3",     // unparsable value
        "{1:1}/x",     // unparsable dimension
        "",
    ];
    for case in cases {
        let err = decode(case).unwrap_err();
        assert!(
            matches!(err, VectorSQLError::FormatError(_)),
            "expected FormatError for '{}'",
            case
        );
    }
}

#[test]
fn test_round_trip() {
    let cases = [
        SparseVector::from_dense(&[0.0, 1.5, 0.0, 2.0, 0.0]),
        SparseVector::from_dense(&[0.25, -3.5, 1e-7]),
        SparseVector::from_dense(&[0.0, 0.0]),
        SparseVector::from_pairs(10_000, &[(0, 1.0), (9_999, -2.5)]).unwrap(),
    ];
    for sparse in cases {
        assert_eq!(decode(&encode(&sparse)).unwrap(), sparse);
        assert_eq!(decode_binary(&encode_binary(&sparse).unwrap()).unwrap(), sparse);
    }
}

#[test]
fn test_binary_layout() {
    let sparse = SparseVector::from_dense(&[0.0, 1.5, 0.0, 2.0, 0.0]);
    let bytes = encode_binary(&sparse).unwrap();

    // 12-byte header, then 4 bytes per index and per value
    assert_eq!(bytes.len(), 12 + 2 * 4 + 2 * 4);
    assert_eq!(&bytes[0..4], &[0, 0, 0, 5]); // dimensions
    assert_eq!(&bytes[4..8], &[0, 0, 0, 2]); // non-zero count
    assert_eq!(&bytes[8..12], &[0, 0, 0, 0]); // unused
    assert_eq!(&bytes[12..16], &[0, 0, 0, 1]); // wire indices are 0-based
}

#[test]
fn test_binary_rejects_malformed_payload() {
    let sparse = SparseVector::from_dense(&[0.0, 1.5, 0.0, 2.0, 0.0]);
    let bytes = encode_binary(&sparse).unwrap();

    // Too short to hold a header
    let err = decode_binary(&bytes[..8]).unwrap_err();
    assert!(matches!(err, VectorSQLError::FormatError(_)));

    // Non-zero unused header field
    let mut tampered = bytes.clone();
    tampered[11] = 1;
    let err = decode_binary(&tampered).unwrap_err();
    assert!(matches!(err, VectorSQLError::FormatError(_)));

    // Header element count disagrees with the payload
    let mut truncated = bytes.clone();
    truncated.pop();
    let err = decode_binary(&truncated).unwrap_err();
    assert!(matches!(err, VectorSQLError::FormatError(_)));

    // Wire index beyond the declared dimensions
    let mut out_of_range = bytes;
    out_of_range[15] = 9;
    let err = decode_binary(&out_of_range).unwrap_err();
    assert!(matches!(err, VectorSQLError::FormatError(_)));
}

#[test]
fn test_display_and_from_str() {
    let sparse = SparseVector::from_dense(&[0.0, 1.5, 0.0, 2.0, 0.0]);
    assert_eq!(sparse.to_string(), "{2:1.5,4:2}/5");

    let parsed: SparseVector = "{2:1.5,4:2}/5".parse().unwrap();
    assert_eq!(parsed, sparse);
}

#[test]
fn test_sqlite_round_trip_and_null() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute(
        "CREATE TABLE items (id INTEGER PRIMARY KEY, embedding sparsevec(5))",
        [],
    )
    .unwrap();

    let sparse = SparseVector::from_dense(&[0.0, 1.5, 0.0, 2.0, 0.0]);
    conn.execute(
        "INSERT INTO items (embedding) VALUES (?1)",
        params![&sparse],
    )
    .unwrap();
    conn.execute("INSERT INTO items (embedding) VALUES (NULL)", [])
        .unwrap();

    let mut stmt = conn
        .prepare("SELECT embedding FROM items ORDER BY id")
        .unwrap();
    let results: Vec<Option<SparseVector>> = stmt
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<rusqlite::Result<_>>()
        .unwrap();

    assert_eq!(results[0], Some(sparse));
    assert_eq!(results[1], None);
}
