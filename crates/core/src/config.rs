//! Advisor runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into [`crate::LensAdvisor`].
//! Evaluations never read process-wide environment variables, so concurrent callers and test
//! harnesses see consistent behaviour.

use crate::{LensError, LensResult};

/// Advisor configuration resolved at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdvisorConfig {
    positional_axis_recovery: bool,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            positional_axis_recovery: true,
        }
    }
}

impl AdvisorConfig {
    /// Create a new `AdvisorConfig`.
    pub fn new(positional_axis_recovery: bool) -> Self {
        Self {
            positional_axis_recovery,
        }
    }

    /// Whether the parser may recover an axis from the third positional number after two
    /// decimals. Values recovered this way are flagged as ambiguous.
    pub fn positional_axis_recovery(&self) -> bool {
        self.positional_axis_recovery
    }
}

/// Parse the positional-axis-recovery switch from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default (`true`).
///
/// # Errors
///
/// Returns [`LensError::InvalidInput`] if the value is not a recognised boolean word.
pub fn positional_axis_recovery_from_env_value(value: Option<String>) -> LensResult<bool> {
    let value = value
        .map(|v| v.trim().to_ascii_lowercase())
        .filter(|v| !v.is_empty());

    match value.as_deref() {
        None => Ok(AdvisorConfig::default().positional_axis_recovery),
        Some("1" | "true" | "yes" | "on") => Ok(true),
        Some("0" | "false" | "no" | "off") => Ok(false),
        Some(other) => Err(LensError::InvalidInput(format!(
            "positional axis recovery must be a boolean, got '{other}'"
        ))),
    }
}
