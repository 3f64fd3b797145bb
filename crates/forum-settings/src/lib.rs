//! Forum runtime settings: definitions, validation, loading from the
//! settings file + environment overrides, and typed views.

pub mod defaults;
pub mod forum_config;
pub mod store;
pub mod validation;

pub use forum_config::{
    CacheAccelerator, CacheConfig, DatabaseConfig, ForumConfig, ForumInfo, MaintenanceConfig,
    MaintenanceMode, Paths, ThemeConfig, UrlFormat,
};
pub use store::SettingsStore;

use serde::{Deserialize, Serialize};

/// Setting type: normal or secret (masked when listed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingType {
    Normal,
    Secret,
}

/// A setting as listed for admin tooling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingInfo {
    pub key: String,
    pub value: String,
    #[serde(rename = "type")]
    pub setting_type: SettingType,
    pub required: bool,
    pub description: String,
    pub has_value: bool,
}

/// Deployment health as far as the settings can tell.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsStatus {
    pub database_configured: bool,
    pub board_configured: bool,
    pub maintenance_active: bool,
    pub missing_settings: Vec<String>,
    pub warnings: Vec<String>,
}

/// Settings error type.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings file parse error: {0}")]
    Parse(#[from] dotenvy::Error),

    #[error("Unknown setting key: {0}")]
    UnknownKey(String),

    #[error("Validation error for {key}: {reason}")]
    Invalid { key: String, reason: String },

    #[error("Setting not found: {0}")]
    NotFound(String),
}
