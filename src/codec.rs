use crate::{Result, Vector, VectorSQLError};
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::fmt::Write;

// Binary wire layout: [dim: u16][flags: u16, always 0][f32 * dim], all
// big-endian (network order).
const HEADER_SIZE: usize = 4;

/// Returns the canonical text form `[v1,v2,...,vn]`.
///
/// Elements use Rust's default float formatting, which emits the shortest
/// decimal that parses back to the same f32, so `decode(encode(v))` is exact
/// for finite values. An empty vector encodes as `[]`.
pub fn encode(vector: &Vector) -> String {
    let mut out = String::with_capacity(2 + vector.dimension() * 8);
    out.push('[');
    for (i, value) in vector.as_slice().iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        // writing to a String cannot fail
        let _ = write!(out, "{}", value);
    }
    out.push(']');
    out
}

/// Parses the canonical text form back into a `Vector`.
///
/// The grammar is `"[" (float ("," float)*)? "]"`. Whitespace around the
/// brackets and between tokens is tolerated; anything else is a
/// `FormatError`. The result always has exactly as many elements as there
/// were tokens, never a truncated prefix.
pub fn decode(input: &str) -> Result<Vector> {
    let inner = input
        .trim()
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(|| {
            VectorSQLError::FormatError(format!(
                "expected a bracketed vector literal, got '{}'",
                input
            ))
        })?;

    if inner.trim().is_empty() {
        return Ok(Vector::new(Vec::new()));
    }

    let mut values = Vec::new();
    for token in inner.split(',') {
        let token = token.trim();
        if token.is_empty() {
            return Err(VectorSQLError::FormatError(format!(
                "empty element in vector literal '{}'",
                input
            )));
        }
        let value = token.parse::<f32>().map_err(|_| {
            VectorSQLError::FormatError(format!("invalid float '{}' in '{}'", token, input))
        })?;
        values.push(value);
    }

    Ok(Vector::new(values))
}

/// Encodes a vector into the store's binary wire form.
pub fn encode_binary(vector: &Vector) -> Result<Vec<u8>> {
    let dim = vector.dimension();
    if dim > u16::MAX as usize {
        return Err(VectorSQLError::FormatError(format!(
            "dimension {} exceeds the wire format limit of {}",
            dim,
            u16::MAX
        )));
    }

    let mut buf = Vec::with_capacity(HEADER_SIZE + dim * 4);
    let _ = buf.write_u16::<BigEndian>(dim as u16);
    let _ = buf.write_u16::<BigEndian>(0);
    for value in vector.as_slice() {
        let _ = buf.write_f32::<BigEndian>(*value);
    }
    Ok(buf)
}

/// Decodes the store's binary wire form.
pub fn decode_binary(bytes: &[u8]) -> Result<Vector> {
    if bytes.len() < HEADER_SIZE {
        return Err(VectorSQLError::FormatError(format!(
            "binary vector payload too short: {} bytes",
            bytes.len()
        )));
    }

    let (mut header, float_bytes) = bytes.split_at(HEADER_SIZE);
    let dim = header
        .read_u16::<BigEndian>()
        .map_err(|e| VectorSQLError::FormatError(e.to_string()))? as usize;

    if float_bytes.len() % 4 != 0 {
        return Err(VectorSQLError::FormatError(format!(
            "binary vector payload of {} bytes is not a whole number of floats",
            float_bytes.len()
        )));
    }
    if float_bytes.len() / 4 != dim {
        return Err(VectorSQLError::FormatError(format!(
            "binary vector header says {} dimensions, payload holds {}",
            dim,
            float_bytes.len() / 4
        )));
    }

    let mut values = Vec::with_capacity(dim);
    let mut reader = float_bytes;
    for _ in 0..dim {
        let value = reader
            .read_f32::<BigEndian>()
            .map_err(|e| VectorSQLError::FormatError(e.to_string()))?;
        values.push(value);
    }

    Ok(Vector::new(values))
}
