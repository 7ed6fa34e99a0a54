//! # strand-settings
//!
//! Layered configuration for strand.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`StrandSettings::default()`]
//! 2. **User file**: `~/.strand/settings.json` (deep-merged over defaults)
//! 3. **Environment variables**: `STRAND_*` overrides (highest priority)
//!
//! There is no global settings instance. Hosts load a [`StrandSettings`] once
//! and pass the relevant section to each operation that needs it.
//!
//! # Usage
//!
//! ```no_run
//! use strand_settings::load_settings;
//!
//! let settings = load_settings().unwrap_or_default();
//! println!("emoji suggestions: {}", settings.autocomplete.suggest_emoji);
//! ```

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, load_settings, load_settings_from_path, settings_path};
pub use types::*;
