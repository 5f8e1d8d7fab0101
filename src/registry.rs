use crate::{codec, utils, Result, Vector, VectorSQLError};
use rusqlite::functions::{Context, FunctionFlags};
use rusqlite::types::ValueRef;
use rusqlite::Connection;

/// Name the store uses for the vector column type in DDL.
pub const VECTOR_TYPE_NAME: &str = "vector";

/// Installs the vector type's SQL surface on a connection.
///
/// Registers `vector_dims(v)`, `l2_distance(a, b)`, `cosine_distance(a, b)`,
/// and `inner_product(a, b)` as connection-scoped scalar functions, each
/// decoding TEXT or BLOB vector payloads through the codec and propagating
/// NULL. Must run once per connection before any statement that touches a
/// vector column; a repeat call on an already-registered connection is a
/// no-op. Other connections are unaffected.
pub fn register(conn: &Connection) -> Result<()> {
    if is_registered(conn)? {
        return Ok(());
    }

    let flags = || FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC;

    conn.create_scalar_function("vector_dims", 1, flags(), |ctx| {
        match vector_argument(ctx, 0)? {
            Some(v) => Ok(Some(v.dimension() as i64)),
            None => Ok(None),
        }
    })
    .map_err(registration_error)?;

    conn.create_scalar_function("l2_distance", 2, flags(), |ctx| {
        distance_arguments(ctx)
            .map(|pair| pair.map(|(a, b)| utils::euclidean_distance(a.as_slice(), b.as_slice()) as f64))
    })
    .map_err(registration_error)?;

    conn.create_scalar_function("cosine_distance", 2, flags(), |ctx| {
        distance_arguments(ctx)
            .map(|pair| pair.map(|(a, b)| 1.0 - utils::cosine_similarity(a.as_slice(), b.as_slice()) as f64))
    })
    .map_err(registration_error)?;

    conn.create_scalar_function("inner_product", 2, flags(), |ctx| {
        distance_arguments(ctx)
            .map(|pair| pair.map(|(a, b)| utils::inner_product(a.as_slice(), b.as_slice()) as f64))
    })
    .map_err(registration_error)?;

    Ok(())
}

/// Reports whether `register` has already run on this connection.
pub fn is_registered(conn: &Connection) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM pragma_function_list WHERE name = 'vector_dims'",
        [],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

fn registration_error(e: rusqlite::Error) -> VectorSQLError {
    VectorSQLError::RegistrationError(format!(
        "connection refused vector function registration: {}",
        e
    ))
}

fn vector_argument(ctx: &Context<'_>, index: usize) -> rusqlite::Result<Option<Vector>> {
    match ctx.get_raw(index) {
        ValueRef::Null => Ok(None),
        ValueRef::Text(bytes) => {
            let text = std::str::from_utf8(bytes)
                .map_err(|e| rusqlite::Error::UserFunctionError(Box::new(e)))?;
            codec::decode(text)
                .map(Some)
                .map_err(|e| rusqlite::Error::UserFunctionError(Box::new(e)))
        }
        ValueRef::Blob(bytes) => codec::decode_binary(bytes)
            .map(Some)
            .map_err(|e| rusqlite::Error::UserFunctionError(Box::new(e))),
        _ => Err(rusqlite::Error::InvalidFunctionParameterType(
            index,
            rusqlite::types::Type::Text,
        )),
    }
}

// NULL in either slot propagates; mismatched dimensions are the store's
// enforcement point and surface as a user-function error.
fn distance_arguments(ctx: &Context<'_>) -> rusqlite::Result<Option<(Vector, Vector)>> {
    let a = match vector_argument(ctx, 0)? {
        Some(v) => v,
        None => return Ok(None),
    };
    let b = match vector_argument(ctx, 1)? {
        Some(v) => v,
        None => return Ok(None),
    };
    if a.dimension() != b.dimension() {
        return Err(rusqlite::Error::UserFunctionError(Box::new(
            VectorSQLError::DimensionMismatch(a.dimension(), b.dimension()),
        )));
    }
    Ok(Some((a, b)))
}
