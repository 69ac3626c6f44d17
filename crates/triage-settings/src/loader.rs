//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`TriageSettings::default()`]
//! 2. If the settings file exists, deep-merge its values over defaults
//! 3. Apply `TRIAGE_*` environment variable overrides (highest priority)
//! 4. Validate cross-field constraints
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::errors::{Result, SettingsError};
use crate::types::TriageSettings;

/// Resolve the default settings path (`~/.triage/settings.json`).
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".triage").join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<TriageSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// A missing file yields defaults. Invalid JSON or an invalid working
/// window is an error.
pub fn load_settings_from_path(path: &Path) -> Result<TriageSettings> {
    let mut settings = read_settings_file(path)?;
    apply_env_overrides(&mut settings);
    validate(&settings)?;
    Ok(settings)
}

/// Defaults merged with the file at `path`, without env overrides.
pub fn read_settings_file(path: &Path) -> Result<TriageSettings> {
    let defaults = serde_json::to_value(TriageSettings::default())?;

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

/// Reject settings no pipeline could run with.
pub fn validate(settings: &TriageSettings) -> Result<()> {
    let esc = &settings.escalation;
    if esc.work_start_hour >= esc.work_end_hour || esc.work_end_hour > 24 {
        return Err(SettingsError::InvalidValue(format!(
            "working window {}:00-{}:00 is empty or exceeds a day",
            esc.work_start_hour, esc.work_end_hour
        )));
    }
    if esc.utc_offset_minutes.abs() >= 24 * 60 {
        return Err(SettingsError::InvalidValue(format!(
            "utc offset of {} minutes is out of range",
            esc.utc_offset_minutes
        )));
    }
    if settings.pipeline.summary_max_chars == 0 {
        return Err(SettingsError::InvalidValue(
            "summary budget must be positive".to_string(),
        ));
    }
    Ok(())
}

/// Apply environment variable overrides to loaded settings.
///
/// Invalid values are ignored with a warning (fall back to file/default).
pub fn apply_env_overrides(settings: &mut TriageSettings) {
    apply_overrides(settings, |name| std::env::var(name).ok());
}

/// Apply overrides from an arbitrary variable source.
pub fn apply_overrides<F>(settings: &mut TriageSettings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let env = Env { lookup };

    // ── Server ──────────────────────────────────────────────────────
    if let Some(v) = env.string("TRIAGE_HOST") {
        settings.server.host = v;
    }
    if let Some(v) = env.parsed("TRIAGE_PORT", 1u16, 65535) {
        settings.server.port = v;
    }
    if let Some(v) = env.parsed("TRIAGE_REQUEST_TIMEOUT_SECS", 1u64, 3600) {
        settings.server.request_timeout_secs = v;
    }

    // ── Pipeline ────────────────────────────────────────────────────
    if let Some(v) = env.parsed("TRIAGE_SUMMARY_MAX_CHARS", 50usize, 100_000) {
        settings.pipeline.summary_max_chars = v;
    }

    // ── Escalation ──────────────────────────────────────────────────
    if let Some(v) = env.parsed("TRIAGE_UTC_OFFSET_MINUTES", -720i32, 840) {
        settings.escalation.utc_offset_minutes = v;
    }
    if let Some(v) = env.parsed("TRIAGE_WORK_START_HOUR", 0u32, 24) {
        settings.escalation.work_start_hour = v;
    }
    if let Some(v) = env.parsed("TRIAGE_WORK_END_HOUR", 0u32, 24) {
        settings.escalation.work_end_hour = v;
    }

    // ── Logging ─────────────────────────────────────────────────────
    if let Some(v) = env.string("TRIAGE_LOG_LEVEL") {
        settings.logging.level = v;
    }
    if let Some(v) = env.bool("TRIAGE_LOG_JSON") {
        settings.logging.json = v;
    }
}

// ── Pure parsing functions (testable without env vars) ──────────────────────

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

/// Parse a number within an inclusive range.
pub fn parse_range<T>(val: &str, min: T, max: T) -> Option<T>
where
    T: std::str::FromStr + PartialOrd,
{
    let n: T = val.trim().parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

// ── Variable readers (thin wrappers) ────────────────────────────────────────

struct Env<F> {
    lookup: F,
}

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn string(&self, name: &str) -> Option<String> {
        (self.lookup)(name).filter(|v| !v.is_empty())
    }

    fn bool(&self, name: &str) -> Option<bool> {
        let val = (self.lookup)(name)?;
        let result = parse_bool(&val);
        if result.is_none() {
            tracing::warn!(key = name, value = %val, "invalid boolean env var, ignoring");
        }
        result
    }

    fn parsed<T>(&self, name: &str, min: T, max: T) -> Option<T>
    where
        T: std::str::FromStr + PartialOrd,
    {
        let val = (self.lookup)(name)?;
        let result = parse_range(&val, min, max);
        if result.is_none() {
            tracing::warn!(key = name, value = %val, "invalid numeric env var, ignoring");
        }
        result
    }
}
