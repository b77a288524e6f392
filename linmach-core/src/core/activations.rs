//! # Activation Functions
//!
//! Closed set of elementwise activations applied to the post-bias output of
//! a machine.
//!
//! ## Functions
//!
//! | Kind | Tag | f(x) | f⁻¹(y) |
//! |------|-----|------|--------|
//! | `Identity` | 0 | x | y |
//! | `Tanh` | 1 | tanh(x) | atanh(y) |
//! | `Logistic` | 2 | 1 / (1 + e^(-x)) | ln(y / (1 - y)) |
//!
//! The tag is the integer written to persisted records.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Activation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    /// Pass-through, also known as `linear`
    #[default]
    #[serde(alias = "linear")]
    Identity,
    /// Hyperbolic tangent
    Tanh,
    /// Logistic sigmoid
    #[serde(alias = "sigmoid")]
    Logistic,
}

impl Activation {
    /// All kinds, in tag order
    pub const ALL: [Activation; 3] = [Activation::Identity, Activation::Tanh, Activation::Logistic];

    /// Evaluate on a single value
    #[inline]
    pub fn eval(self, x: f64) -> f64 {
        match self {
            Activation::Identity => x,
            Activation::Tanh => x.tanh(),
            Activation::Logistic => logistic(x),
        }
    }

    /// Inverse function, defined on the image of `eval`
    #[inline]
    pub fn inverse(self, y: f64) -> f64 {
        match self {
            Activation::Identity => y,
            Activation::Tanh => y.atanh(),
            Activation::Logistic => (y / (1.0 - y)).ln(),
        }
    }

    /// Apply in place to every element
    pub fn apply(self, values: &mut [f64]) {
        match self {
            Activation::Identity => {}
            Activation::Tanh => values.iter_mut().for_each(|v| *v = v.tanh()),
            Activation::Logistic => values.iter_mut().for_each(|v| *v = logistic(*v)),
        }
    }

    /// Integer tag used in persisted records
    pub fn tag(self) -> i64 {
        match self {
            Activation::Identity => 0,
            Activation::Tanh => 1,
            Activation::Logistic => 2,
        }
    }

    /// Kind for a persisted tag
    pub fn from_tag(tag: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.tag() == tag)
    }

    pub fn name(self) -> &'static str {
        match self {
            Activation::Identity => "identity",
            Activation::Tanh => "tanh",
            Activation::Logistic => "logistic",
        }
    }
}

#[inline]
fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for unknown activation names
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown activation '{0}' (expected identity, tanh or logistic)")]
pub struct UnknownActivation(pub String);

impl FromStr for Activation {
    type Err = UnknownActivation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "identity" | "linear" | "none" => Ok(Activation::Identity),
            "tanh" => Ok(Activation::Tanh),
            "logistic" | "sigmoid" | "log" => Ok(Activation::Logistic),
            _ => Err(UnknownActivation(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_passthrough() {
        for x in [-3.5, 0.0, 1e300, -0.0] {
            assert_eq!(Activation::Identity.eval(x).to_bits(), x.to_bits());
        }
    }

    #[test]
    fn test_logistic() {
        assert!((Activation::Logistic.eval(0.0) - 0.5).abs() < 1e-15);
        assert!(Activation::Logistic.eval(40.0) > 0.999999);
        assert!(Activation::Logistic.eval(-40.0) < 1e-6);
    }

    #[test]
    fn test_inverse() {
        for kind in Activation::ALL {
            for x in [-1.5, -0.25, 0.0, 0.75, 2.0] {
                let back = kind.inverse(kind.eval(x));
                assert!((back - x).abs() < 1e-9, "{} inverse of {} was {}", kind, x, back);
            }
        }
    }

    #[test]
    fn test_apply_matches_eval() {
        let input = [-2.0, -0.5, 0.0, 0.3, 4.0];
        for kind in Activation::ALL {
            let mut values = input;
            kind.apply(&mut values);
            for (v, x) in values.iter().zip(input.iter()) {
                assert_eq!(v.to_bits(), kind.eval(*x).to_bits());
            }
        }
    }

    #[test]
    fn test_tags() {
        for kind in Activation::ALL {
            assert_eq!(Activation::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(Activation::from_tag(3), None);
        assert_eq!(Activation::from_tag(-1), None);
    }

    #[test]
    fn test_activation_by_name() {
        assert_eq!("linear".parse::<Activation>(), Ok(Activation::Identity));
        assert_eq!("TANH".parse::<Activation>(), Ok(Activation::Tanh));
        assert_eq!("sigmoid".parse::<Activation>(), Ok(Activation::Logistic));
        assert!("relu".parse::<Activation>().is_err());
        assert_eq!(Activation::default(), Activation::Identity);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Activation::Logistic).unwrap();
        assert_eq!(json, "\"logistic\"");
        let parsed: Activation = serde_json::from_str("\"linear\"").unwrap();
        assert_eq!(parsed, Activation::Identity);
    }
}
