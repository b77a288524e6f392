//! Environment configuration loading from .env files
//!
//! ## Environment Variables
//! - `LINMACH_STORE_PRETTY`: pretty-print file stores (default: false)
//! - `LINMACH_STORE_FLUSH_ON_DROP`: flush dirty file stores on drop (default: true)

use once_cell::sync::Lazy;
use std::env;

// Automatically load .env when config module is accessed
static DOTENV_INIT: Lazy<()> = Lazy::new(|| {
    let _ = dotenv::dotenv();
});

/// Ensure environment is loaded
#[inline]
fn ensure_loaded() {
    let _ = &*DOTENV_INIT;
}

/// File store settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    /// Indent the JSON document
    pub pretty: bool,
    /// Flush pending writes when a store is dropped
    pub flush_on_drop: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            pretty: false,
            flush_on_drop: true,
        }
    }
}

impl StoreConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        ensure_loaded();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Create config from an arbitrary key lookup; unset or unparsable
    /// values keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            pretty: lookup("LINMACH_STORE_PRETTY")
                .and_then(|v| parse_bool(&v))
                .unwrap_or(defaults.pretty),
            flush_on_drop: lookup("LINMACH_STORE_FLUSH_ON_DROP")
                .and_then(|v| parse_bool(&v))
                .unwrap_or(defaults.flush_on_drop),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
