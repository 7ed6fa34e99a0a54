//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase", default)]` so a settings
//! file may be partial: missing fields take their compiled default.

mod autocomplete;

pub use autocomplete::*;

use serde::{Deserialize, Serialize};

/// Root settings type.
///
/// ```json
/// {
///   "logging": { "level": "info" },
///   "autocomplete": { "suggestEmoji": false }
/// }
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StrandSettings {
    /// Settings schema version.
    pub version: String,
    /// Logging configuration.
    pub logging: LoggingSettings,
    /// Composer autocomplete behaviour.
    pub autocomplete: AutocompleteSettings,
}

impl Default for StrandSettings {
    fn default() -> Self {
        Self {
            version: "0.1.0".to_string(),
            logging: LoggingSettings::default(),
            autocomplete: AutocompleteSettings::default(),
        }
    }
}

/// Logging configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Filter directive handed to the tracing subscriber.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}
