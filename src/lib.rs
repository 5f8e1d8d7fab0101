pub mod binding;
pub mod bit;
pub mod codec;
pub mod registry;
pub mod sparse;
pub mod utils;
pub mod vector;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VectorSQLError {
    #[error("Format Error: {0}")]
    FormatError(String),
    #[error("Registration Error: {0}")]
    RegistrationError(String),
    #[error("Dimension Mismatch: expected {0}, got {1}")]
    DimensionMismatch(usize, usize),
    #[error("Storage Error: {0}")]
    StorageError(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<rusqlite::Error> for VectorSQLError {
    fn from(e: rusqlite::Error) -> Self {
        VectorSQLError::StorageError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, VectorSQLError>;

// Re-export main types for convenience
pub use binding::{bind, extract};
pub use bit::BitString;
pub use codec::{decode, decode_binary, encode, encode_binary};
pub use registry::{is_registered, register, VECTOR_TYPE_NAME};
pub use sparse::SparseVector;
pub use utils::{cosine_similarity, euclidean_distance, inner_product};
pub use vector::Vector;
