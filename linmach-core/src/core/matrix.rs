//! # Dense Matrix
//!
//! Owned, contiguous, row-major `f64` storage with explicit extents.
//! Extents never change implicitly; a matrix with a different shape is a
//! different value.

use crate::core::shape::element_count;
use crate::error::{MachineError, Result};

/// Row-major dense matrix
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
}

impl Matrix {
    /// Zero-filled matrix
    pub fn zeros(rows: usize, cols: usize) -> Result<Self> {
        Self::filled(rows, cols, 0.0)
    }

    /// Matrix with every element set to `value`
    pub fn filled(rows: usize, cols: usize, value: f64) -> Result<Self> {
        let len = element_count(rows, cols)?;
        Ok(Self {
            data: vec![value; len],
            rows,
            cols,
        })
    }

    /// Build from a row-major buffer
    pub fn from_shape_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != element_count(rows, cols)? {
            return Err(MachineError::InvalidShape {
                rows,
                cols,
                reason: format!("buffer holds {} elements", data.len()),
            });
        }
        Ok(Self { data, rows, cols })
    }

    /// Build from a slice of equally sized rows
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut data = Vec::with_capacity(element_count(n_rows, n_cols)?);
        for row in rows {
            let row = row.as_ref();
            if row.len() != n_cols {
                return Err(MachineError::InvalidShape {
                    rows: n_rows,
                    cols: n_cols,
                    reason: format!("ragged row of length {}", row.len()),
                });
            }
            data.extend_from_slice(row);
        }
        Self::from_shape_vec(n_rows, n_cols, data)
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Element at `(row, col)`; panics when out of bounds
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        assert!(row < self.rows && col < self.cols, "index ({}, {}) out of bounds", row, col);
        self.data[row * self.cols + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        assert!(row < self.rows && col < self.cols, "index ({}, {}) out of bounds", row, col);
        self.data[row * self.cols + col] = value;
    }

    /// One row as a slice
    #[inline]
    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    #[inline]
    pub fn row_mut(&mut self, row: usize) -> &mut [f64] {
        &mut self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Iterate over rows
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks_exact(self.cols)
    }

    /// Row-major view of all elements
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Copy of this matrix with new extents; the overlapping block is kept
    /// and new cells take `fill`.
    pub fn resized(&self, rows: usize, cols: usize, fill: f64) -> Result<Self> {
        let mut out = Self::filled(rows, cols, fill)?;
        let keep_cols = cols.min(self.cols);
        for r in 0..rows.min(self.rows) {
            out.row_mut(r)[..keep_cols].copy_from_slice(&self.row(r)[..keep_cols]);
        }
        Ok(out)
    }
}
