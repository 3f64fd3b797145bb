//! Setting value validation.

use regex::Regex;
use std::sync::LazyLock;

static RE_EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+$").expect("valid e-mail regex"));
static RE_IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("valid identifier regex"));
static RE_SERVER_LIST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9.\-]+(:\d{1,5})?(\s*,\s*[A-Za-z0-9.\-]+(:\d{1,5})?)*$")
        .expect("valid server list regex")
});

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        "MAINTENANCE" => validate_int_range(value, 0, 2)?,
        "CACHE_ENABLE" => validate_int_range(value, 0, 3)?,
        "DB_PORT" => {
            if !value.is_empty() {
                validate_int_range(value, 1, 65535)?;
            }
        }
        "DB_TYPE" => {
            if value != "mysqli" && value != "postgresql" {
                return Err("must be 'mysqli' or 'postgresql'".into());
            }
        }
        "CACHE_ACCELERATOR" => {
            if !["", "filebased", "apcu", "memcached", "redis", "xcache"].contains(&value) {
                return Err("must be one of filebased, apcu, memcached, redis, xcache".into());
            }
        }
        "CACHE_MEMCACHED" => {
            if !value.is_empty() && !RE_SERVER_LIST.is_match(value) {
                return Err("expected a comma separated list of host[:port]".into());
            }
        }
        "URL_FORMAT" => {
            if value != "standard" && value != "semantic" {
                return Err("must be 'standard' or 'semantic'".into());
            }
        }
        "WEBMASTER_EMAIL" => {
            if !RE_EMAIL.is_match(value) {
                return Err("invalid e-mail address".into());
            }
        }
        "COOKIENAME" => {
            if !RE_IDENTIFIER.is_match(value) {
                return Err("only letters, digits and underscores are allowed".into());
            }
        }
        "DB_PREFIX" => {
            if !value.is_empty() && !RE_IDENTIFIER.is_match(value) {
                return Err("only letters, digits and underscores are allowed".into());
            }
        }
        "BOARDURL" | "IMAGES_URL" | "DEFAULT_IMAGES_URL" => {
            if !value.is_empty() {
                validate_url(value)?;
            }
        }
        "INSTALL_TIME" => {
            if !value.is_empty() {
                value.parse::<u64>().map_err(|_| "must be a unix timestamp")?;
            }
        }
        // Boolean settings
        k if is_flag_setting(k) => {
            if value != "0" && value != "1" {
                return Err("must be '0' or '1'".into());
            }
        }
        _ => {}
    }
    Ok(())
}

fn validate_int_range(value: &str, min: i64, max: i64) -> Result<(), String> {
    let v: i64 = value.parse().map_err(|_| "must be an integer")?;
    if v < min || v > max {
        return Err(format!("must be between {min} and {max}"));
    }
    Ok(())
}

fn validate_url(value: &str) -> Result<(), String> {
    if !(value.starts_with("http://") || value.starts_with("https://")) {
        return Err("must start with http:// or https://".into());
    }
    if value.ends_with('/') {
        return Err("must not end with a slash".into());
    }
    Ok(())
}

fn is_flag_setting(key: &str) -> bool {
    matches!(key, "DB_PERSIST" | "DB_ERROR_SEND")
}
