//! Engine configuration management

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::import::ImportPolicy;
use crate::render::{DEFAULT_MAX_TEMPLATE_BYTES, FALLBACK_TEXT};

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Largest template body the interpreter will render, unlimited by default
    pub max_template_bytes: usize,

    /// Text returned when a preview cannot be rendered
    pub fallback_text: String,

    /// Conflict policy used when the caller does not choose one
    pub default_policy: ImportPolicy,
}

impl EngineConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            max_template_bytes: match lookup("NOTIFYTPL_MAX_TEMPLATE_BYTES") {
                Some(value) => value
                    .trim()
                    .parse()
                    .map_err(|_| invalid("NOTIFYTPL_MAX_TEMPLATE_BYTES", &value))?,
                None => defaults.max_template_bytes,
            },
            fallback_text: lookup("NOTIFYTPL_FALLBACK_TEXT").unwrap_or(defaults.fallback_text),
            default_policy: ImportPolicy {
                overwrite: parse_flag(&lookup, "NOTIFYTPL_OVERWRITE")?
                    .unwrap_or(defaults.default_policy.overwrite),
                generate_new_ids: parse_flag(&lookup, "NOTIFYTPL_GENERATE_NEW_IDS")?
                    .unwrap_or(defaults.default_policy.generate_new_ids),
            },
        })
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_template_bytes: DEFAULT_MAX_TEMPLATE_BYTES,
            fallback_text: FALLBACK_TEXT.to_string(),
            default_policy: ImportPolicy {
                overwrite: false,
                generate_new_ids: true,
            },
        }
    }
}

fn parse_flag<F>(lookup: &F, var: &str) -> Result<Option<bool>>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(None),
        Some(value) => match value.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(Some(true)),
            "false" | "0" | "no" => Ok(Some(false)),
            _ => Err(invalid(var, &value).into()),
        },
    }
}

fn invalid(var: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        var: var.to_string(),
        value: value.to_string(),
    }
}
