//! All setting definitions with their default values.

use std::collections::HashMap;
use std::sync::LazyLock;

/// (key, default, secret, required, description)
type DefTuple = (&'static str, &'static str, bool, bool, &'static str);

const MAINTENANCE_DEFS: &[DefTuple] = &[
    ("MAINTENANCE", "0", false, false, "0 = off, 1 = maintenance mode, 2 = database lockout"),
    ("MTITLE", "Maintenance Mode", false, false, "Title shown while in maintenance mode"),
    (
        "MMESSAGE",
        "The forum is currently under maintenance. Please check back shortly.",
        false,
        false,
        "Message shown while in maintenance mode",
    ),
];

const FORUM_DEFS: &[DefTuple] = &[
    ("MBNAME", "My Community", false, false, "Forum name"),
    ("LANGUAGE", "english", false, false, "Default forum language"),
    ("BOARDURL", "", false, true, "Public URL of the forum, without trailing slash"),
    ("WEBMASTER_EMAIL", "noreply@localhost", false, false, "Administrator e-mail address"),
    ("COOKIENAME", "ForumCookie", false, false, "Name of the login cookie"),
];

const DATABASE_DEFS: &[DefTuple] = &[
    ("DB_TYPE", "mysqli", false, false, "Database driver (mysqli or postgresql)"),
    ("DB_SERVER", "localhost", false, false, "Database host"),
    ("DB_PORT", "", false, false, "Database port, empty for the driver default"),
    ("DB_NAME", "", false, true, "Database name"),
    ("DB_USER", "", false, false, "Database user"),
    ("DB_PASSWD", "", true, false, "Database password"),
    ("SSI_DB_USER", "", false, false, "Alternate database user for SSI pages"),
    ("SSI_DB_PASSWD", "", true, false, "Alternate database password for SSI pages"),
    ("DB_PREFIX", "forum_", false, false, "Table prefix"),
    ("DB_PERSIST", "0", false, false, "Use persistent connections (0/1)"),
    ("DB_ERROR_SEND", "0", false, false, "E-mail the webmaster on connection errors (0/1)"),
    ("DB_CHARACTER_SET", "utf8", false, false, "Connection character set"),
];

const CACHE_DEFS: &[DefTuple] = &[
    ("CACHE_ACCELERATOR", "", false, false, "Cache backend: filebased, apcu, memcached, redis, xcache"),
    ("CACHE_ENABLE", "0", false, false, "Cache level 0-3"),
    ("CACHE_MEMCACHED", "", false, false, "Comma separated memcached/redis servers (host:port)"),
    ("CACHEDIR", "", false, false, "File cache directory, empty for <BOARDDIR>/cache"),
];

const PATH_DEFS: &[DefTuple] = &[
    ("BOARDDIR", "", false, false, "Forum installation directory"),
    ("SOURCEDIR", "", false, false, "Sources directory, empty for <BOARDDIR>/sources"),
    ("EXTDIR", "", false, false, "Third party libraries, empty for <SOURCEDIR>/ext"),
    ("LANGUAGEDIR", "", false, false, "Language files, empty for <SOURCEDIR>/ElkArte/Languages"),
];

const MISC_DEFS: &[DefTuple] = &[
    ("INSTALL_TIME", "", false, false, "Unix timestamp of the installation"),
    ("URL_FORMAT", "standard", false, false, "URL style: standard or semantic"),
];

const THEME_DEFS: &[DefTuple] = &[
    ("THEME_DIR", "", false, false, "Active theme directory, empty for <BOARDDIR>/themes/default"),
    ("IMAGES_URL", "", false, false, "Active theme images URL, empty for <BOARDURL>/themes/default/images"),
    (
        "DEFAULT_IMAGES_URL",
        "",
        false,
        false,
        "Default theme images URL, empty for <BOARDURL>/themes/default/images",
    ),
];

const DEF_GROUPS: &[&[DefTuple]] = &[
    MAINTENANCE_DEFS,
    FORUM_DEFS,
    DATABASE_DEFS,
    CACHE_DEFS,
    PATH_DEFS,
    MISC_DEFS,
    THEME_DEFS,
];

/// A single setting definition.
#[derive(Debug, Clone)]
pub struct SettingDef {
    pub key: &'static str,
    pub default: &'static str,
    pub secret: bool,
    pub required: bool,
    pub description: &'static str,
}

/// Global setting definitions indexed by key.
pub static DEFAULT_SETTINGS: LazyLock<HashMap<&'static str, SettingDef>> = LazyLock::new(|| {
    DEF_GROUPS
        .iter()
        .flat_map(|defs| defs.iter())
        .map(|&(key, default, secret, required, description)| {
            (
                key,
                SettingDef {
                    key,
                    default,
                    secret,
                    required,
                    description,
                },
            )
        })
        .collect()
});

/// Get the default value for a setting key, or `None` if not defined.
pub fn get_default(key: &str) -> Option<&'static str> {
    DEFAULT_SETTINGS.get(key).map(|d| d.default)
}

/// Keys of all settings flagged as required.
pub fn required_keys() -> Vec<&'static str> {
    DEF_GROUPS
        .iter()
        .flat_map(|defs| defs.iter())
        .filter(|def| def.3)
        .map(|def| def.0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_unique() {
        let total: usize = DEF_GROUPS.iter().map(|defs| defs.len()).sum();
        assert_eq!(DEFAULT_SETTINGS.len(), total);
    }

    #[test]
    fn test_required_keys() {
        assert_eq!(required_keys(), vec!["BOARDURL", "DB_NAME"]);
    }

    #[test]
    fn test_secret_keys() {
        assert!(DEFAULT_SETTINGS["DB_PASSWD"].secret);
        assert!(DEFAULT_SETTINGS["SSI_DB_PASSWD"].secret);
        assert!(!DEFAULT_SETTINGS["DB_USER"].secret);
    }

    #[test]
    fn test_get_default() {
        assert_eq!(get_default("URL_FORMAT"), Some("standard"));
        assert_eq!(get_default("DB_PREFIX"), Some("forum_"));
        assert_eq!(get_default("NOT_A_SETTING"), None);
    }
}
