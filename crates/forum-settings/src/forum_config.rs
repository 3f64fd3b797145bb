//! Typed forum configuration built from a [`SettingsStore`].

use std::fmt;
use std::path::PathBuf;

use super::store::SettingsStore;

/// Maintenance level as stored in `MAINTENANCE`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MaintenanceMode {
    #[default]
    Off,
    /// Only administrators can log in.
    Maintenance,
    /// Database lockout: the forum does not touch the database at all.
    Lockout,
}

impl MaintenanceMode {
    fn from_level(level: u8) -> Self {
        match level {
            1 => Self::Maintenance,
            2 => Self::Lockout,
            _ => Self::Off,
        }
    }

    pub fn is_active(self) -> bool {
        self != Self::Off
    }
}

#[derive(Debug, Clone, Default)]
pub struct MaintenanceConfig {
    pub mode: MaintenanceMode,
    pub title: String,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct ForumInfo {
    pub name: String,
    pub language: String,
    pub board_url: String,
    pub webmaster_email: String,
    pub cookie_name: String,
}

/// Database connection parameters. `Debug` never prints passwords.
#[derive(Clone, Default)]
pub struct DatabaseConfig {
    pub db_type: String,
    pub server: String,
    pub port: Option<u16>,
    pub name: String,
    pub user: String,
    pub password: String,
    pub ssi_user: String,
    pub ssi_password: String,
    pub prefix: String,
    pub persist: bool,
    pub error_send: bool,
    pub character_set: String,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("db_type", &self.db_type)
            .field("server", &self.server)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &redacted(&self.password))
            .field("ssi_user", &self.ssi_user)
            .field("ssi_password", &redacted(&self.ssi_password))
            .field("prefix", &self.prefix)
            .field("persist", &self.persist)
            .field("error_send", &self.error_send)
            .field("character_set", &self.character_set)
            .finish()
    }
}

fn redacted(value: &str) -> &'static str {
    if value.is_empty() { "" } else { "<redacted>" }
}

/// Cache backend selected by `CACHE_ACCELERATOR`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CacheAccelerator {
    #[default]
    FileBased,
    Apcu,
    Memcached,
    Redis,
    Xcache,
}

impl CacheAccelerator {
    fn parse(value: &str) -> Self {
        match value {
            "apcu" => Self::Apcu,
            "memcached" => Self::Memcached,
            "redis" => Self::Redis,
            "xcache" => Self::Xcache,
            _ => Self::FileBased,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CacheConfig {
    pub accelerator: CacheAccelerator,
    /// 0 = off, 1-3 = increasingly aggressive caching.
    pub level: u8,
    pub servers: Vec<String>,
    pub dir: PathBuf,
}

impl CacheConfig {
    pub fn is_enabled(&self) -> bool {
        self.level > 0
    }
}

#[derive(Debug, Clone, Default)]
pub struct Paths {
    pub board_dir: PathBuf,
    pub source_dir: PathBuf,
    pub ext_dir: PathBuf,
    pub language_dir: PathBuf,
}

/// Theme locations used to build asset URLs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeConfig {
    pub theme_dir: PathBuf,
    pub images_url: String,
    pub default_images_url: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UrlFormat {
    #[default]
    Standard,
    Semantic,
}

/// Runtime configuration populated from the settings store.
#[derive(Debug, Clone, Default)]
pub struct ForumConfig {
    pub maintenance: MaintenanceConfig,
    pub forum: ForumInfo,
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    pub paths: Paths,
    pub theme: ThemeConfig,
    pub url_format: UrlFormat,
    pub install_time: Option<u64>,
}

impl ForumConfig {
    /// Build the typed view. Unparseable numbers fall back to defaults and
    /// empty paths/URLs are derived from `BOARDDIR` / `BOARDURL`.
    pub fn load(store: &SettingsStore) -> Self {
        let g = |key: &str| -> String { store.get_setting(key).unwrap_or_default() };

        let board_url = g("BOARDURL");
        let board_dir = PathBuf::from(g("BOARDDIR"));
        let source_dir = path_or(g("SOURCEDIR"), || board_dir.join("sources"));
        let ext_dir = path_or(g("EXTDIR"), || source_dir.join("ext"));
        let language_dir = path_or(g("LANGUAGEDIR"), || {
            source_dir.join("ElkArte").join("Languages")
        });

        let board_images = format!("{board_url}/themes/default/images");
        let default_images_url = non_empty_or(g("DEFAULT_IMAGES_URL"), || board_images.clone());
        let images_url = non_empty_or(g("IMAGES_URL"), || board_images);
        let theme_dir = path_or(g("THEME_DIR"), || board_dir.join("themes").join("default"));

        let cache = CacheConfig {
            accelerator: CacheAccelerator::parse(&g("CACHE_ACCELERATOR")),
            level: parse_or(&g("CACHE_ENABLE"), 0u8).min(3),
            servers: g("CACHE_MEMCACHED")
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
            dir: path_or(g("CACHEDIR"), || board_dir.join("cache")),
        };

        let config = Self {
            maintenance: MaintenanceConfig {
                mode: MaintenanceMode::from_level(parse_or(&g("MAINTENANCE"), 0)),
                title: g("MTITLE"),
                message: g("MMESSAGE"),
            },
            forum: ForumInfo {
                name: g("MBNAME"),
                language: g("LANGUAGE"),
                board_url,
                webmaster_email: g("WEBMASTER_EMAIL"),
                cookie_name: g("COOKIENAME"),
            },
            database: DatabaseConfig {
                db_type: g("DB_TYPE"),
                server: g("DB_SERVER"),
                port: g("DB_PORT").parse().ok(),
                name: g("DB_NAME"),
                user: g("DB_USER"),
                password: g("DB_PASSWD"),
                ssi_user: g("SSI_DB_USER"),
                ssi_password: g("SSI_DB_PASSWD"),
                prefix: g("DB_PREFIX"),
                persist: g("DB_PERSIST") == "1",
                error_send: g("DB_ERROR_SEND") == "1",
                character_set: g("DB_CHARACTER_SET"),
            },
            cache,
            paths: Paths {
                board_dir,
                source_dir,
                ext_dir,
                language_dir,
            },
            theme: ThemeConfig {
                theme_dir,
                images_url,
                default_images_url,
            },
            url_format: match g("URL_FORMAT").as_str() {
                "semantic" => UrlFormat::Semantic,
                _ => UrlFormat::Standard,
            },
            install_time: g("INSTALL_TIME").parse().ok(),
        };

        if config.maintenance.mode.is_active() {
            tracing::warn!(mode = ?config.maintenance.mode, "Forum is in maintenance mode");
        }
        tracing::debug!(
            board_url = %config.forum.board_url,
            cache_level = config.cache.level,
            "Forum config loaded"
        );
        config
    }

    /// Reload config from the settings store.
    pub fn reload(&mut self, store: &SettingsStore) {
        *self = Self::load(store);
    }
}

fn parse_or<T: std::str::FromStr>(s: &str, default: T) -> T {
    if s.is_empty() {
        return default;
    }
    s.parse().unwrap_or(default)
}

fn non_empty_or(value: String, fallback: impl FnOnce() -> String) -> String {
    if value.is_empty() { fallback() } else { value }
}

fn path_or(value: String, fallback: impl FnOnce() -> PathBuf) -> PathBuf {
    if value.is_empty() {
        fallback()
    } else {
        PathBuf::from(value)
    }
}
