//! SettingsStore: file-backed settings with defaults, env overrides and status.

use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::path::{Path, PathBuf};

use super::defaults::{DEFAULT_SETTINGS, required_keys};
use super::validation::validate_setting;
use super::{SettingInfo, SettingType, SettingsError, SettingsStatus};

/// Prefix for environment variables that override file values.
pub const ENV_PREFIX: &str = "FORUM_";

const MASK: &str = "********";

/// Flat key/value settings as read from the settings file.
#[derive(Debug, Clone, Default)]
pub struct SettingsStore {
    values: BTreeMap<String, String>,
    overridden: Vec<String>,
}

impl SettingsStore {
    /// Empty store; every lookup falls back to the defaults table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a `KEY=value` settings file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let store = Self::parse(&content)?;
        tracing::info!(
            path = %path.display(),
            count = store.values.len(),
            "Loaded forum settings"
        );
        Ok(store)
    }

    /// Parse settings from any reader in settings file format.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, SettingsError> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        Self::parse(&content)
    }

    /// Values are taken verbatim: a `$` that dotenvy would expand from the
    /// environment is rejected instead.
    fn parse(content: &str) -> Result<Self, SettingsError> {
        reject_expansion(content)?;

        let mut store = Self::new();
        for entry in dotenvy::from_read_iter(content.as_bytes()) {
            let (key, value) = entry.map_err(|e| match e {
                dotenvy::Error::Io(io) => SettingsError::Io(io),
                other => SettingsError::Parse(other),
            })?;
            if !DEFAULT_SETTINGS.contains_key(key.as_str()) {
                tracing::warn!(key = %key, "Unknown key in settings file");
            }
            store.values.insert(key, value);
        }
        Ok(store)
    }

    /// Get a setting value. Falls back to the default if not stored.
    pub fn get_setting(&self, key: &str) -> Result<String, SettingsError> {
        if let Some(val) = self.values.get(key) {
            return Ok(val.clone());
        }
        if let Some(def) = DEFAULT_SETTINGS.get(key) {
            return Ok(def.default.to_string());
        }
        Err(SettingsError::NotFound(key.to_string()))
    }

    /// Set a setting value with validation.
    pub fn set_setting(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        if !DEFAULT_SETTINGS.contains_key(key) {
            return Err(SettingsError::UnknownKey(key.to_string()));
        }
        validate_setting(key, value).map_err(|reason| SettingsError::Invalid {
            key: key.to_string(),
            reason,
        })?;
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    /// Overlay `FORUM_<KEY>` variables from the process environment.
    pub fn apply_env_overrides(&mut self) -> u32 {
        self.apply_overrides(std::env::vars())
    }

    /// Overlay `FORUM_<KEY>` pairs. Only known keys with non-empty values
    /// are taken. Returns the number of overridden settings.
    pub fn apply_overrides<I>(&mut self, vars: I) -> u32
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut applied = 0u32;
        let mut secret_seen = false;
        for (name, value) in vars {
            let Some(key) = name.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let Some(def) = DEFAULT_SETTINGS.get(key) else {
                continue;
            };
            if value.is_empty() {
                continue;
            }
            tracing::info!(key = %key, "Setting overridden from env");
            secret_seen |= def.secret;
            self.values.insert(key.to_string(), value);
            if !self.overridden.iter().any(|k| k == key) {
                self.overridden.push(key.to_string());
            }
            applied += 1;
        }
        if secret_seen {
            tracing::warn!(
                "Database password supplied via environment. \
                 Make sure the variable is not exposed to child processes."
            );
        }
        applied
    }

    /// Keys whose value came from the environment.
    pub fn overridden_keys(&self) -> &[String] {
        &self.overridden
    }

    /// Get all settings, filling in defaults for missing keys. Secret
    /// values are masked.
    pub fn get_all_settings(&self) -> HashMap<String, SettingInfo> {
        let mut result = HashMap::new();

        for (key, value) in &self.values {
            let def = DEFAULT_SETTINGS.get(key.as_str());
            let setting_type = match def {
                Some(d) if d.secret => SettingType::Secret,
                _ => SettingType::Normal,
            };
            result.insert(
                key.clone(),
                SettingInfo {
                    key: key.clone(),
                    value: display_value(value, setting_type),
                    setting_type,
                    required: def.is_some_and(|d| d.required),
                    description: def.map_or(String::new(), |d| d.description.to_string()),
                    has_value: !value.is_empty(),
                },
            );
        }

        for (key, def) in DEFAULT_SETTINGS.iter() {
            if result.contains_key(*key) {
                continue;
            }
            let setting_type = if def.secret {
                SettingType::Secret
            } else {
                SettingType::Normal
            };
            result.insert(
                key.to_string(),
                SettingInfo {
                    key: key.to_string(),
                    value: display_value(def.default, setting_type),
                    setting_type,
                    required: def.required,
                    description: def.description.to_string(),
                    has_value: !def.default.is_empty(),
                },
            );
        }

        result
    }

    /// Check which parts of the deployment are properly configured.
    pub fn check_status(&self) -> SettingsStatus {
        let g = |key: &str| self.get_setting(key).unwrap_or_default();
        let mut status = SettingsStatus::default();

        for key in required_keys() {
            if g(key).is_empty() {
                status.missing_settings.push(key.to_string());
            }
        }
        status.database_configured = !g("DB_NAME").is_empty();
        status.board_configured = !g("BOARDURL").is_empty();

        match g("MAINTENANCE").as_str() {
            "1" => {
                status.maintenance_active = true;
                status
                    .warnings
                    .push("MAINTENANCE is enabled - only administrators can log in".into());
            }
            "2" => {
                status.maintenance_active = true;
                status
                    .warnings
                    .push("MAINTENANCE is 2 - database lockout, forum is offline".into());
            }
            _ => {}
        }

        let accelerator = g("CACHE_ACCELERATOR");
        if g("CACHE_ENABLE") != "0"
            && matches!(accelerator.as_str(), "memcached" | "redis")
            && g("CACHE_MEMCACHED").is_empty()
        {
            status
                .warnings
                .push(format!("CACHE_ACCELERATOR is {accelerator} but CACHE_MEMCACHED is empty"));
        }
        if g("CACHE_ENABLE") != "0"
            && matches!(accelerator.as_str(), "" | "filebased")
            && g("CACHEDIR").is_empty()
        {
            status
                .warnings
                .push("File cache is enabled but CACHEDIR is empty, using <BOARDDIR>/cache".into());
        }

        for key in &self.overridden {
            if DEFAULT_SETTINGS.get(key.as_str()).is_some_and(|d| d.secret) {
                status
                    .warnings
                    .push(format!("{key} is supplied via environment variable {ENV_PREFIX}{key}"));
            }
        }

        for (key, value) in &self.values {
            if let Err(reason) = validate_setting(key, value) {
                status.warnings.push(format!("{key}: {reason}"));
            }
        }

        status
    }

    /// Write the store back in settings file format, keeping the previous
    /// file as `<name>.bak`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        if path.exists() {
            std::fs::copy(path, backup_path(path))?;
        }

        let mut out = String::from("# Forum settings\n");
        for (key, value) in &self.values {
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&escape_value(value));
            out.push_str("\"\n");
        }
        std::fs::write(path, out)?;

        tracing::info!(path = %path.display(), count = self.values.len(), "Saved forum settings");
        Ok(())
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Key,
    Value,
    SingleQuoted,
    DoubleQuoted,
    Comment,
}

/// Fail on any unescaped `$` outside single quotes.
fn reject_expansion(content: &str) -> Result<(), SettingsError> {
    let mut state = ScanState::Key;
    let mut key = String::new();
    let mut escaped = false;
    let mut after_space = true;

    for c in content.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        match state {
            ScanState::Key => match c {
                '=' => {
                    state = ScanState::Value;
                    after_space = true;
                }
                '\n' => key.clear(),
                '#' if key.trim().is_empty() => state = ScanState::Comment,
                _ => key.push(c),
            },
            ScanState::Comment => {
                if c == '\n' {
                    state = ScanState::Key;
                    key.clear();
                }
            }
            ScanState::Value => {
                match c {
                    '\n' => {
                        state = ScanState::Key;
                        key.clear();
                    }
                    '\'' => state = ScanState::SingleQuoted,
                    '"' => state = ScanState::DoubleQuoted,
                    '\\' => escaped = true,
                    '#' if after_space => state = ScanState::Comment,
                    '$' => return Err(expansion_error(&key)),
                    _ => {}
                }
                after_space = c.is_whitespace();
            }
            ScanState::SingleQuoted => {
                if c == '\'' {
                    state = ScanState::Value;
                }
            }
            ScanState::DoubleQuoted => match c {
                '"' => state = ScanState::Value,
                '\\' => escaped = true,
                '$' => return Err(expansion_error(&key)),
                _ => {}
            },
        }
    }
    Ok(())
}

fn expansion_error(key: &str) -> SettingsError {
    let key = key.trim();
    SettingsError::Invalid {
        key: key.strip_prefix("export ").unwrap_or(key).trim().to_string(),
        reason: "unescaped '$' would be expanded from the environment; \
                 single-quote the value or write \\$"
            .into(),
    }
}

fn display_value(value: &str, setting_type: SettingType) -> String {
    match setting_type {
        SettingType::Secret if !value.is_empty() => MASK.to_string(),
        _ => value.to_string(),
    }
}

fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".bak");
    path.with_file_name(name)
}

fn escape_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' | '"' | '\'' | '$' => {
                out.push('\\');
                out.push(c);
            }
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out
}
