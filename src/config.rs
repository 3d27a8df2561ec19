// File: src/config.rs
use crate::error::{PreetiError, Result};
use crate::hooks::CleanupRules;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_PREFIX: &str = "PREETI_";

/// Settings for building a [`crate::Converter`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Emit Devanagari numerals for Preeti digit glyphs.
    pub convert_numbers: bool,
    /// JSON override file merged onto the built-in table.
    pub overrides: Option<PathBuf>,
    pub cleanup: CleanupRules,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            convert_numbers: true,
            overrides: None,
            cleanup: CleanupRules::default(),
        }
    }
}

impl ConverterConfig {
    /// `<config dir>/preeti-unicode/config.json`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir()?;
        path.push("preeti-unicode");
        path.push("config.json");
        Some(path)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let config = serde_json::from_str(&raw)?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Reads `path` if given, else the default location if it exists, else
    /// defaults. Environment variables are applied on top.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => match Self::default_path() {
                Some(default) if default.is_file() => Self::load_from_file(&default)?,
                _ => Self::default(),
            },
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Overlays `PREETI_CONVERT_NUMBERS` and `PREETI_OVERRIDES`.
    /// Takes a lookup function so tests need not touch the process environment.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(&format!("{ENV_PREFIX}CONVERT_NUMBERS")) {
            self.convert_numbers = parse_bool(&raw).ok_or_else(|| {
                PreetiError::Config(format!("{ENV_PREFIX}CONVERT_NUMBERS: not a boolean: {raw:?}"))
            })?;
        }
        if let Some(raw) = lookup(&format!("{ENV_PREFIX}OVERRIDES")) {
            self.overrides = if raw.is_empty() { None } else { Some(PathBuf::from(raw)) };
        }
        Ok(())
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "cleanup": { "trim_lines": true } }"#).unwrap();

        let config = ConverterConfig::load_from_file(&path).unwrap();
        assert!(config.convert_numbers);
        assert!(config.cleanup.trim_lines);
        assert!(!config.cleanup.remove_empty_lines);
        assert_eq!(config.overrides, None);
    }

    #[test]
    fn env_overrides_file_values() {
        let env: HashMap<&str, &str> = [
            ("PREETI_CONVERT_NUMBERS", "off"),
            ("PREETI_OVERRIDES", "/tmp/table.json"),
        ]
        .into_iter()
        .collect();

        let mut config = ConverterConfig::default();
        config
            .apply_env(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();
        assert!(!config.convert_numbers);
        assert_eq!(config.overrides, Some(PathBuf::from("/tmp/table.json")));
    }

    #[test]
    fn bad_env_boolean_is_a_config_error() {
        let mut config = ConverterConfig::default();
        let err = config
            .apply_env(|key| (key == "PREETI_CONVERT_NUMBERS").then(|| "maybe".to_string()))
            .unwrap_err();
        assert!(matches!(err, PreetiError::Config(_)));
    }

    #[test]
    fn malformed_file_is_a_json_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            ConverterConfig::load_from_file(&path),
            Err(PreetiError::Json(_))
        ));
    }
}
