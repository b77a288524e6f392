//! # Shape Validation
//!
//! Pure dimensional checks run before any mutation or evaluation.

use crate::error::{MachineError, Result};

/// Both extents must be non-zero
pub fn check_dimensions(rows: usize, cols: usize) -> Result<()> {
    if rows == 0 || cols == 0 {
        return Err(MachineError::InvalidShape {
            rows,
            cols,
            reason: "dimensions must be positive".to_string(),
        });
    }
    Ok(())
}

/// Number of elements in a `rows x cols` matrix; both extents non-zero and
/// the product representable
pub fn element_count(rows: usize, cols: usize) -> Result<usize> {
    check_dimensions(rows, cols)?;
    rows.checked_mul(cols).ok_or_else(|| MachineError::InvalidShape {
        rows,
        cols,
        reason: "element count overflows".to_string(),
    })
}

/// A per-input vector must match the machine's input count
#[inline]
pub fn check_input_count(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(MachineError::InputCountMismatch { expected, actual });
    }
    Ok(())
}

/// A per-output vector must match the machine's output count
#[inline]
pub fn check_output_count(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(MachineError::OutputCountMismatch { expected, actual });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions() {
        assert!(check_dimensions(1, 1).is_ok());
        assert!(check_dimensions(0, 1).is_err());
        assert!(check_dimensions(1, 0).is_err());
    }

    #[test]
    fn test_element_count() {
        assert_eq!(element_count(3, 2).unwrap(), 6);
        assert!(matches!(element_count(0, 2), Err(MachineError::InvalidShape { .. })));
        assert!(matches!(
            element_count(usize::MAX, 2),
            Err(MachineError::InvalidShape { rows: usize::MAX, cols: 2, .. })
        ));
    }

    #[test]
    fn test_counts() {
        assert!(check_input_count(3, 3).is_ok());
        assert!(matches!(
            check_input_count(3, 5),
            Err(MachineError::InputCountMismatch { expected: 3, actual: 5 })
        ));
        assert!(matches!(
            check_output_count(2, 5),
            Err(MachineError::OutputCountMismatch { expected: 2, actual: 5 })
        ));
    }
}
