//! Parsing of numeric command-line arguments

use anyhow::{Context, Result, bail};
use linmach_core::Matrix;

/// `"1, 2.5,-3"` → `[1.0, 2.5, -3.0]`
pub fn parse_vector(text: &str) -> Result<Vec<f64>> {
    let values = text
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<f64>().with_context(|| format!("invalid number '{}'", s)))
        .collect::<Result<Vec<_>>>()?;
    if values.is_empty() {
        bail!("empty vector '{}'", text);
    }
    Ok(values)
}

/// Rows separated by `;`, columns by `,`: `"0.4,0.1;0.4,0.2"`
pub fn parse_matrix(text: &str) -> Result<Matrix> {
    let rows = text
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_vector)
        .collect::<Result<Vec<_>>>()?;
    Ok(Matrix::from_rows(rows.as_slice())?)
}
