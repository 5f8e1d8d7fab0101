use crate::{Result, VectorSQLError};
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Binary wire layout: [length in bits: i32 BE][packed bytes, MSB first,
// trailing pad bits zero].
const HEADER_SIZE: usize = 4;

/// A fixed-length bit string, as stored in a bit column.
///
/// Bits are packed most-significant-bit first. Absence is
/// `Option<BitString>` at the binding boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BitString {
    length: usize,
    data: Vec<u8>,
}

impl BitString {
    pub fn from_bits(bits: &[bool]) -> Self {
        let mut data = vec![0u8; (bits.len() + 7) / 8];
        for (i, &bit) in bits.iter().enumerate() {
            if bit {
                data[i / 8] |= 1 << (7 - (i % 8));
            }
        }
        Self {
            length: bits.len(),
            data,
        }
    }

    /// Number of bits.
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// The packed representation, trailing pad bits zero.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn to_bits(&self) -> Vec<bool> {
        (0..self.length)
            .map(|i| (self.data[i / 8] >> (7 - (i % 8))) & 1 == 1)
            .collect()
    }
}

/// Returns the canonical text form, one `0` or `1` per bit.
pub fn encode(bit: &BitString) -> String {
    bit.to_bits().iter().map(|&b| if b { '1' } else { '0' }).collect()
}

/// Parses the text form back into a `BitString`.
///
/// Surrounding whitespace is tolerated; any character other than `0` or `1`
/// is a `FormatError`. The empty string is a zero-length bit string.
pub fn decode(input: &str) -> Result<BitString> {
    let trimmed = input.trim();
    let mut bits = Vec::with_capacity(trimmed.len());
    for c in trimmed.chars() {
        match c {
            '0' => bits.push(false),
            '1' => bits.push(true),
            _ => {
                return Err(VectorSQLError::FormatError(format!(
                    "invalid character '{}' in bit string '{}'",
                    c, input
                )))
            }
        }
    }
    Ok(BitString::from_bits(&bits))
}

/// Encodes a bit string into the store's binary wire form.
pub fn encode_binary(bit: &BitString) -> Result<Vec<u8>> {
    if bit.length > i32::MAX as usize {
        return Err(VectorSQLError::FormatError(format!(
            "length {} exceeds the wire format limit of {}",
            bit.length,
            i32::MAX
        )));
    }

    let mut buf = Vec::with_capacity(HEADER_SIZE + bit.data.len());
    let _ = buf.write_i32::<BigEndian>(bit.length as i32);
    buf.extend_from_slice(&bit.data);
    Ok(buf)
}

/// Decodes the store's binary wire form.
pub fn decode_binary(bytes: &[u8]) -> Result<BitString> {
    if bytes.len() < HEADER_SIZE {
        return Err(VectorSQLError::FormatError(format!(
            "binary bit string payload too short: {} bytes",
            bytes.len()
        )));
    }

    let (mut header, data) = bytes.split_at(HEADER_SIZE);
    let length = header
        .read_i32::<BigEndian>()
        .map_err(|e| VectorSQLError::FormatError(e.to_string()))?;
    if length < 0 {
        return Err(VectorSQLError::FormatError(format!(
            "binary bit string header holds negative length {}",
            length
        )));
    }
    let length = length as usize;
    if data.len() != (length + 7) / 8 {
        return Err(VectorSQLError::FormatError(format!(
            "binary bit string header says {} bits, payload holds {} bytes",
            length,
            data.len()
        )));
    }

    Ok(BitString {
        length,
        data: data.to_vec(),
    })
}

impl fmt::Display for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode(self))
    }
}

impl FromStr for BitString {
    type Err = crate::VectorSQLError;

    fn from_str(s: &str) -> Result<Self> {
        decode(s)
    }
}
