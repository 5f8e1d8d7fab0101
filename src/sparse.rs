use crate::{Result, Vector, VectorSQLError};
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};
use std::str::FromStr;

// Binary wire layout: [dim: i32][nnz: i32][unused: i32, always 0]
// [index: i32 * nnz][value: f32 * nnz], all big-endian. Indices are 0-based
// on the wire and in memory; the text form is 1-based.
const HEADER_SIZE: usize = 12;

/// A sparse vector: a fixed dimension count plus the non-zero elements,
/// stored as ascending 0-based indices with their values.
///
/// Value semantics match `Vector`: buffers are owned and copied on
/// construction, and absence is `Option<SparseVector>` at the binding
/// boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    dimensions: usize,
    indices: Vec<usize>,
    values: Vec<f32>,
}

impl SparseVector {
    /// Builds a sparse vector from a dense slice, keeping only the non-zero
    /// elements.
    pub fn from_dense(dense: &[f32]) -> Self {
        let mut indices = Vec::new();
        let mut values = Vec::new();
        for (i, &value) in dense.iter().enumerate() {
            if value != 0.0 {
                indices.push(i);
                values.push(value);
            }
        }
        Self {
            dimensions: dense.len(),
            indices,
            values,
        }
    }

    /// Builds a sparse vector from `(index, value)` pairs with 0-based
    /// indices. Zero values are dropped, pairs are sorted by index, and an
    /// out-of-range or duplicate index is a `FormatError`.
    pub fn from_pairs(dimensions: usize, pairs: &[(usize, f32)]) -> Result<Self> {
        let mut elements: Vec<(usize, f32)> = pairs
            .iter()
            .copied()
            .filter(|(_, value)| *value != 0.0)
            .collect();
        elements.sort_by_key(|(index, _)| *index);

        let mut indices = Vec::with_capacity(elements.len());
        let mut values = Vec::with_capacity(elements.len());
        for (index, value) in elements {
            if index >= dimensions {
                return Err(VectorSQLError::FormatError(format!(
                    "sparse index {} out of range for {} dimensions",
                    index, dimensions
                )));
            }
            if indices.last() == Some(&index) {
                return Err(VectorSQLError::FormatError(format!(
                    "duplicate sparse index {}",
                    index
                )));
            }
            indices.push(index);
            values.push(value);
        }

        Ok(Self {
            dimensions,
            indices,
            values,
        })
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Number of non-zero elements.
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn to_dense(&self) -> Vector {
        let mut dense = vec![0.0; self.dimensions];
        for (&index, &value) in self.indices.iter().zip(&self.values) {
            dense[index] = value;
        }
        Vector::new(dense)
    }
}

/// Returns the canonical text form `{i1:v1,i2:v2,...}/dim` with 1-based
/// indices. A vector with no non-zero elements encodes as `{}/dim`.
pub fn encode(sparse: &SparseVector) -> String {
    let mut out = String::with_capacity(4 + sparse.nnz() * 12);
    out.push('{');
    for (i, (index, value)) in sparse.indices.iter().zip(&sparse.values).enumerate() {
        if i > 0 {
            out.push(',');
        }
        // writing to a String cannot fail
        let _ = write!(out, "{}:{}", index + 1, value);
    }
    out.push('}');
    let _ = write!(out, "/{}", sparse.dimensions);
    out
}

/// Parses the canonical text form back into a `SparseVector`.
///
/// The grammar is `"{" (index ":" float ("," index ":" float)*)? "}" "/" dim`
/// with 1-based indices. Whitespace around tokens is tolerated. Indices must
/// be ascending and within the declared dimension count; anything else is a
/// `FormatError`.
pub fn decode(input: &str) -> Result<SparseVector> {
    let format_error =
        || VectorSQLError::FormatError(format!("invalid sparse vector literal '{}'", input));

    let (elements_part, dim_part) = input.trim().rsplit_once('/').ok_or_else(format_error)?;
    let dimensions: usize = dim_part.trim().parse().map_err(|_| format_error())?;
    let inner = elements_part
        .trim()
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
        .ok_or_else(format_error)?;

    let mut indices = Vec::new();
    let mut values = Vec::new();
    if !inner.trim().is_empty() {
        for token in inner.split(',') {
            let (index_str, value_str) = token.split_once(':').ok_or_else(format_error)?;
            let index: usize = index_str.trim().parse().map_err(|_| format_error())?;
            if index == 0 || index > dimensions {
                return Err(VectorSQLError::FormatError(format!(
                    "sparse index {} out of range for {} dimensions in '{}'",
                    index, dimensions, input
                )));
            }
            let value: f32 = value_str.trim().parse().map_err(|_| format_error())?;
            if indices.last().map_or(false, |&last| last >= index - 1) {
                return Err(VectorSQLError::FormatError(format!(
                    "sparse indices out of order in '{}'",
                    input
                )));
            }
            indices.push(index - 1);
            values.push(value);
        }
    }

    Ok(SparseVector {
        dimensions,
        indices,
        values,
    })
}

/// Encodes a sparse vector into the store's binary wire form.
pub fn encode_binary(sparse: &SparseVector) -> Result<Vec<u8>> {
    if sparse.dimensions > i32::MAX as usize {
        return Err(VectorSQLError::FormatError(format!(
            "dimension {} exceeds the wire format limit of {}",
            sparse.dimensions,
            i32::MAX
        )));
    }

    let mut buf = Vec::with_capacity(HEADER_SIZE + sparse.nnz() * 8);
    let _ = buf.write_i32::<BigEndian>(sparse.dimensions as i32);
    let _ = buf.write_i32::<BigEndian>(sparse.nnz() as i32);
    let _ = buf.write_i32::<BigEndian>(0);
    for &index in &sparse.indices {
        let _ = buf.write_i32::<BigEndian>(index as i32);
    }
    for &value in &sparse.values {
        let _ = buf.write_f32::<BigEndian>(value);
    }
    Ok(buf)
}

/// Decodes the store's binary wire form.
pub fn decode_binary(bytes: &[u8]) -> Result<SparseVector> {
    if bytes.len() < HEADER_SIZE {
        return Err(VectorSQLError::FormatError(format!(
            "binary sparse vector payload too short: {} bytes",
            bytes.len()
        )));
    }

    let (mut header, body) = bytes.split_at(HEADER_SIZE);
    let read_error = |e: std::io::Error| VectorSQLError::FormatError(e.to_string());
    let dimensions = header.read_i32::<BigEndian>().map_err(read_error)?;
    let nnz = header.read_i32::<BigEndian>().map_err(read_error)?;
    let unused = header.read_i32::<BigEndian>().map_err(read_error)?;

    if dimensions < 0 || nnz < 0 {
        return Err(VectorSQLError::FormatError(format!(
            "binary sparse vector header holds negative counts ({}, {})",
            dimensions, nnz
        )));
    }
    if unused != 0 {
        return Err(VectorSQLError::FormatError(format!(
            "expected unused header field to be 0, got {}",
            unused
        )));
    }
    let dimensions = dimensions as usize;
    let nnz = nnz as usize;
    if body.len() != nnz * 8 {
        return Err(VectorSQLError::FormatError(format!(
            "binary sparse vector header says {} elements, payload holds {} bytes",
            nnz,
            body.len()
        )));
    }

    let (mut index_bytes, mut value_bytes) = body.split_at(nnz * 4);
    let mut indices = Vec::with_capacity(nnz);
    for _ in 0..nnz {
        let index = index_bytes.read_i32::<BigEndian>().map_err(read_error)?;
        if index < 0 || index as usize >= dimensions {
            return Err(VectorSQLError::FormatError(format!(
                "sparse index {} out of range for {} dimensions",
                index, dimensions
            )));
        }
        indices.push(index as usize);
    }
    let mut values = Vec::with_capacity(nnz);
    for _ in 0..nnz {
        values.push(value_bytes.read_f32::<BigEndian>().map_err(read_error)?);
    }

    Ok(SparseVector {
        dimensions,
        indices,
        values,
    })
}

impl fmt::Display for SparseVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode(self))
    }
}

impl FromStr for SparseVector {
    type Err = crate::VectorSQLError;

    fn from_str(s: &str) -> Result<Self> {
        decode(s)
    }
}
