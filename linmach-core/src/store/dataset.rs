//! Typed datasets held by a store

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{StoreError, StoreResult};
use crate::core::matrix::Matrix;

/// Element type of a dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    F64,
    I64,
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementType::F64 => f.write_str("f64"),
            ElementType::I64 => f.write_str("i64"),
        }
    }
}

/// Row-major element buffer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "dtype", content = "data", rename_all = "lowercase")]
pub enum Values {
    F64(#[serde(with = "f64_base64")] Vec<f64>),
    I64(Vec<i64>),
}

impl Values {
    pub fn len(&self) -> usize {
        match self {
            Values::F64(v) => v.len(),
            Values::I64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn element_type(&self) -> ElementType {
        match self {
            Values::F64(_) => ElementType::F64,
            Values::I64(_) => ElementType::I64,
        }
    }
}

/// Shaped, typed array. Rank 0 is a scalar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    shape: Vec<usize>,
    values: Values,
}

impl Dataset {
    /// Build a dataset, checking that `shape` covers exactly `values`
    pub fn new(shape: Vec<usize>, values: Values) -> StoreResult<Self> {
        let dataset = Self { shape, values };
        dataset.validate()?;
        Ok(dataset)
    }

    pub fn vector(values: Vec<f64>) -> Self {
        Self {
            shape: vec![values.len()],
            values: Values::F64(values),
        }
    }

    pub fn matrix(matrix: &Matrix) -> Self {
        let (rows, cols) = matrix.shape();
        Self {
            shape: vec![rows, cols],
            values: Values::F64(matrix.as_slice().to_vec()),
        }
    }

    pub fn scalar_i64(value: i64) -> Self {
        Self {
            shape: Vec::new(),
            values: Values::I64(vec![value]),
        }
    }

    pub(crate) fn validate(&self) -> StoreResult<()> {
        let expected = self
            .shape
            .iter()
            .try_fold(1usize, |acc, &extent| acc.checked_mul(extent))
            .ok_or_else(|| StoreError::Format(format!("shape {:?} overflows", self.shape)))?;
        if expected != self.values.len() {
            return Err(StoreError::Format(format!(
                "shape {:?} holds {} elements, found {}",
                self.shape,
                expected,
                self.values.len()
            )));
        }
        Ok(())
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    pub fn values(&self) -> &Values {
        &self.values
    }

    pub fn element_type(&self) -> ElementType {
        self.values.element_type()
    }

    /// Float elements, if this is a float dataset
    pub fn as_f64(&self) -> Option<&[f64]> {
        match &self.values {
            Values::F64(v) => Some(v),
            Values::I64(_) => None,
        }
    }

    pub fn into_f64(self) -> Option<Vec<f64>> {
        match self.values {
            Values::F64(v) => Some(v),
            Values::I64(_) => None,
        }
    }

    /// The value of a rank-0 integer dataset
    pub fn as_i64_scalar(&self) -> Option<i64> {
        match &self.values {
            Values::I64(v) if self.shape.is_empty() => v.first().copied(),
            _ => None,
        }
    }

    /// Short form such as `f64[3, 2]` or `i64 scalar`
    pub fn describe(&self) -> String {
        if self.shape.is_empty() {
            format!("{} scalar", self.element_type())
        } else {
            format!("{}{:?}", self.element_type(), self.shape)
        }
    }
}

/// Floats travel as base64 of their little-endian IEEE-754 bytes, so every
/// bit pattern survives a text round trip.
mod f64_base64 {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(values: &[f64], serializer: S) -> Result<S::Ok, S::Error> {
        let mut bytes = Vec::with_capacity(values.len() * 8);
        for v in values {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<f64>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        let bytes = STANDARD.decode(encoded.as_bytes()).map_err(D::Error::custom)?;
        if bytes.len() % 8 != 0 {
            return Err(D::Error::custom(format!(
                "float payload of {} bytes is not a multiple of 8",
                bytes.len()
            )));
        }
        Ok(bytes
            .chunks_exact(8)
            .map(|chunk| {
                let mut raw = [0u8; 8];
                raw.copy_from_slice(chunk);
                f64::from_le_bytes(raw)
            })
            .collect())
    }
}
