//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`StrandSettings::default()`]
//! 2. If `~/.strand/settings.json` exists, deep-merge user values over defaults
//! 3. Apply `STRAND_*` environment variable overrides (highest priority)
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::errors::Result;
use crate::types::StrandSettings;

/// Resolve the path to the settings file (`~/.strand/settings.json`).
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".strand").join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<StrandSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// If the file does not exist, returns defaults. If the file contains
/// invalid JSON, returns an error.
pub fn load_settings_from_path(path: &Path) -> Result<StrandSettings> {
    let mut settings = read_settings_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

fn read_settings_file(path: &Path) -> Result<StrandSettings> {
    let defaults = serde_json::to_value(StrandSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    Ok(serde_json::from_value(merged)?)
}

/// Recursive deep merge of two JSON values.
///
/// - Objects are merged recursively (source overrides target per-key)
/// - Arrays and primitives are replaced entirely by source
/// - Null values in source are skipped (preserving target)
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply `STRAND_*` environment variable overrides to loaded settings.
pub fn apply_env_overrides(settings: &mut StrandSettings) {
    apply_overrides(settings, |name| std::env::var(name).ok());
}

/// Apply overrides read through `lookup`.
///
/// Each variable has strict parsing rules:
/// - Integers must be valid and within the specified range
/// - Booleans accept: `true`/`1`/`yes`/`on` or `false`/`0`/`no`/`off`
/// - Invalid values are ignored with a warning (fall back to file/default)
pub fn apply_overrides<F>(settings: &mut StrandSettings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    // ── Logging ─────────────────────────────────────────────────────
    if let Some(v) = lookup("STRAND_LOG_LEVEL").filter(|v| !v.is_empty()) {
        settings.logging.level = v;
    }

    // ── Autocomplete ────────────────────────────────────────────────
    if let Some(v) = read_bool(&lookup, "STRAND_SUGGEST_EMOJI") {
        settings.autocomplete.suggest_emoji = v;
    }
    if let Some(v) = read_usize(&lookup, "STRAND_EMOJI_LIMIT", 1, 100) {
        settings.autocomplete.emoji_limit = v;
    }
}

// ── Pure parsing functions ──────────────────────────────────────────────────

/// Parse a string as a boolean.
///
/// Accepts (case-insensitive): `true`/`1`/`yes`/`on` or `false`/`0`/`no`/`off`.
pub fn parse_bool(val: &str) -> Option<bool> {
    match val.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse a string as a `usize` within an inclusive range.
pub fn parse_usize_range(val: &str, min: usize, max: usize) -> Option<usize> {
    let n: usize = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

fn read_bool<F>(lookup: &F, name: &str) -> Option<bool>
where
    F: Fn(&str) -> Option<String>,
{
    let val = lookup(name)?;
    let result = parse_bool(&val);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid boolean env var, ignoring");
    }
    result
}

fn read_usize<F>(lookup: &F, name: &str, min: usize, max: usize) -> Option<usize>
where
    F: Fn(&str) -> Option<String>,
{
    let val = lookup(name)?;
    let result = parse_usize_range(&val, min, max);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid usize env var, ignoring");
    }
    result
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
