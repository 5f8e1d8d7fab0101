use crate::{codec, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A fixed-dimension sequence of 32-bit floats, as stored in a vector column.
///
/// The backing buffer is owned and copied on construction, so a bound
/// parameter cannot be mutated out from under a prepared statement. Absence
/// (SQL NULL) is expressed as `Option<Vector>` at the binding boundary, never
/// as a sentinel value of this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    data: Vec<f32>,
}

impl Vector {
    pub fn new(data: Vec<f32>) -> Self {
        Self { data }
    }

    pub fn from_slice(data: &[f32]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }

    pub fn dimension(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    pub fn magnitude(&self) -> f32 {
        self.data.iter().map(|x| x * x).sum::<f32>().sqrt()
    }
}

impl From<Vec<f32>> for Vector {
    fn from(data: Vec<f32>) -> Self {
        Self::new(data)
    }
}

impl From<&[f32]> for Vector {
    fn from(data: &[f32]) -> Self {
        Self::from_slice(data)
    }
}

impl From<Array1<f32>> for Vector {
    fn from(data: Array1<f32>) -> Self {
        Self::new(data.to_vec())
    }
}

impl From<Vector> for Array1<f32> {
    fn from(vector: Vector) -> Self {
        Array1::from_vec(vector.data)
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&codec::encode(self))
    }
}

impl FromStr for Vector {
    type Err = crate::VectorSQLError;

    fn from_str(s: &str) -> Result<Self> {
        codec::decode(s)
    }
}
