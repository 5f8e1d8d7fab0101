use crate::bit::{self, BitString};
use crate::sparse::{self, SparseVector};
use crate::{codec, Result, Vector, VectorSQLError};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, Null, ToSqlOutput, ValueRef};
use rusqlite::{Row, Statement, ToSql};

impl ToSql for Vector {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(codec::encode(self)))
    }
}

impl FromSql for Vector {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Text(bytes) => {
                let text = std::str::from_utf8(bytes)
                    .map_err(|e| FromSqlError::Other(Box::new(e)))?;
                codec::decode(text).map_err(|e| FromSqlError::Other(Box::new(e)))
            }
            ValueRef::Blob(bytes) => {
                codec::decode_binary(bytes).map_err(|e| FromSqlError::Other(Box::new(e)))
            }
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

impl ToSql for SparseVector {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(sparse::encode(self)))
    }
}

impl FromSql for SparseVector {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Text(bytes) => {
                let text = std::str::from_utf8(bytes)
                    .map_err(|e| FromSqlError::Other(Box::new(e)))?;
                sparse::decode(text).map_err(|e| FromSqlError::Other(Box::new(e)))
            }
            ValueRef::Blob(bytes) => {
                sparse::decode_binary(bytes).map_err(|e| FromSqlError::Other(Box::new(e)))
            }
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

impl ToSql for BitString {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(bit::encode(self)))
    }
}

impl FromSql for BitString {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Text(bytes) => {
                let text = std::str::from_utf8(bytes)
                    .map_err(|e| FromSqlError::Other(Box::new(e)))?;
                bit::decode(text).map_err(|e| FromSqlError::Other(Box::new(e)))
            }
            ValueRef::Blob(bytes) => {
                bit::decode_binary(bytes).map_err(|e| FromSqlError::Other(Box::new(e)))
            }
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

/// Binds a vector, or SQL NULL for `None`, into a 1-based parameter slot of
/// a prepared statement.
///
/// Absence always becomes the driver's NULL marker, never the text `[]`.
pub fn bind(stmt: &mut Statement<'_>, index: usize, vector: Option<&Vector>) -> Result<()> {
    match vector {
        Some(v) => stmt.raw_bind_parameter(index, codec::encode(v))?,
        None => stmt.raw_bind_parameter(index, Null)?,
    }
    Ok(())
}

/// Reads a vector column from a result row.
///
/// A NULL column yields `None`; TEXT decodes through the canonical text
/// form and BLOB through the binary wire form. Any other storage class is a
/// `FormatError`.
pub fn extract(row: &Row<'_>, column: usize) -> Result<Option<Vector>> {
    let value = row.get_ref(column)?;
    match value {
        ValueRef::Null => Ok(None),
        ValueRef::Text(bytes) => {
            let text = std::str::from_utf8(bytes)
                .map_err(|e| VectorSQLError::FormatError(e.to_string()))?;
            codec::decode(text).map(Some)
        }
        ValueRef::Blob(bytes) => codec::decode_binary(bytes).map(Some),
        other => Err(VectorSQLError::FormatError(format!(
            "vector column holds {}, expected TEXT, BLOB, or NULL",
            other.data_type()
        ))),
    }
}
