//! Validation rules shared by monitor construction and config loaders.

use url::Url;

use super::types::ExpectedStatus;
use crate::error::ConfigError;

fn invalid_url(url: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidUrl { url: url.to_string(), reason: reason.into() }
}

/// Normalize a target: URLs with a scheme are kept as given, bare hostnames
/// get `https://` prepended.
pub fn normalize_url(target: &str) -> Result<String, ConfigError> {
    let target = target.trim();
    if target.is_empty() {
        return Err(invalid_url(target, "URL cannot be empty"));
    }

    let normalized =
        if target.contains("://") { target.to_string() } else { format!("https://{target}") };

    Url::parse(&normalized).map_err(|e| invalid_url(target, e.to_string()))?;
    Ok(normalized)
}

/// Normalize a target and check that it is an http(s) URL with a host
pub fn validate_url(target: &str) -> Result<String, ConfigError> {
    let normalized = normalize_url(target)?;
    let url = Url::parse(&normalized).map_err(|e| invalid_url(target, e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(ConfigError::UnsupportedScheme(format!("{other}:"))),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(invalid_url(target, "URL must have a valid host"));
    }

    Ok(normalized)
}

/// Host portion of a validated URL, used as the default display name
pub fn host_of(url: &str) -> Result<String, ConfigError> {
    Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_string))
        .ok_or_else(|| invalid_url(url, "URL must have a valid host"))
}

pub fn validate_interval(interval_secs: u64) -> Result<u64, ConfigError> {
    if interval_secs < 1 {
        return Err(ConfigError::InvalidInterval(interval_secs));
    }
    Ok(interval_secs)
}

pub fn validate_timeout(timeout_ms: u64) -> Result<u64, ConfigError> {
    if timeout_ms < 1 {
        return Err(ConfigError::InvalidTimeout(timeout_ms));
    }
    Ok(timeout_ms)
}

pub fn validate_status(expected: &ExpectedStatus) -> Result<(), ConfigError> {
    let codes = expected.codes();
    if codes.is_empty() {
        return Err(ConfigError::EmptyStatusSet);
    }

    match codes.iter().find(|code| !(100..=599).contains(*code)) {
        Some(code) => Err(ConfigError::InvalidStatus(*code)),
        None => Ok(()),
    }
}
