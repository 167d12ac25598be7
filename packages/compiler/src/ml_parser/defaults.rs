//! Default Configuration
//!
//! Corresponds to packages/compiler/src/ml_parser/defaults.ts.

use once_cell::sync::Lazy;

/// Interpolation configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpolationConfig {
    pub start: String,
    pub end: String,
}

impl InterpolationConfig {
    pub fn new(start: String, end: String) -> Self {
        InterpolationConfig { start, end }
    }

    pub fn from_array(markers: Option<&[String]>) -> Result<Self, String> {
        match markers {
            None => Ok(default_interpolation_config()),
            Some(m) => {
                assert_interpolation_symbols(m)?;
                Ok(InterpolationConfig::new(m[0].clone(), m[1].clone()))
            }
        }
    }

    pub fn is_default(&self) -> bool {
        *self == *DEFAULT_INTERPOLATION_CONFIG
    }
}

/// Default interpolation markers `{{` and `}}`.
pub static DEFAULT_INTERPOLATION_CONFIG: Lazy<InterpolationConfig> =
    Lazy::new(|| InterpolationConfig::new("{{".to_string(), "}}".to_string()));

pub fn default_interpolation_config() -> InterpolationConfig {
    DEFAULT_INTERPOLATION_CONFIG.clone()
}

fn assert_interpolation_symbols(markers: &[String]) -> Result<(), String> {
    if markers.len() != 2 {
        return Err(format!(
            "expected exactly two interpolation markers but got {}",
            markers.len()
        ));
    }
    if markers[0].is_empty() || markers[1].is_empty() {
        return Err("interpolation markers must be non-empty".to_string());
    }
    Ok(())
}
