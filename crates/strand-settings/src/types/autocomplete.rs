//! Composer autocomplete settings.

use serde::{Deserialize, Serialize};

/// Autocomplete behaviour for the message composer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AutocompleteSettings {
    /// Offer emoji completions while typing. When false the emoji
    /// provider returns nothing.
    pub suggest_emoji: bool,
    /// Maximum number of emoji completions returned per query.
    pub emoji_limit: usize,
}

impl Default for AutocompleteSettings {
    fn default() -> Self {
        Self {
            suggest_emoji: true,
            emoji_limit: 20,
        }
    }
}
