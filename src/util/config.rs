//! Configuration directories and the TOML settings file.
//!
//! Tripsea keeps its state under `~/.config/tripsea`: `settings.toml` for
//! user settings, `lists/` for persisted client context (recent searches,
//! last-used filters), and `logs/` for the tracing log file.

use std::env;
use std::path::PathBuf;

/// Resolve an XDG base directory from environment or default to `$HOME` + segments.
///
/// Inputs:
/// - `var`: Environment variable to check (e.g., `XDG_CONFIG_HOME`).
/// - `home_default`: Fallback path segments relative to `$HOME` if `var` is unset/empty.
///
/// Output: Resolved base directory path.
fn xdg_base_dir(var: &str, home_default: &[&str]) -> PathBuf {
    if let Ok(p) = env::var(var)
        && !p.trim().is_empty()
    {
        return PathBuf::from(p);
    }
    let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
    let mut base = PathBuf::from(home);
    for seg in home_default {
        base = base.join(seg);
    }
    base
}

/// XDG config directory for Tripsea (ensured to exist)
pub fn config_dir() -> PathBuf {
    let base = xdg_base_dir("XDG_CONFIG_HOME", &[".config"]);
    let dir = base.join("tripsea");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

/// Logs directory under config: `~/.config/tripsea/logs` (ensured to exist)
pub fn logs_dir() -> PathBuf {
    let dir = config_dir().join("logs");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

/// Lists directory under config: `~/.config/tripsea/lists` (ensured to exist)
pub fn lists_dir() -> PathBuf {
    let dir = config_dir().join("lists");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

/// User settings loaded from `settings.toml`.
///
/// Every field has a default so a missing or malformed file never blocks
/// startup; parse failures fall back to [`Settings::default`] with a warning.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the places backend, no trailing slash.
    pub api_base_url: String,
    /// Per-request HTTP timeout in seconds.
    pub http_timeout_secs: u64,
    /// Timeout for resolving the reference position on distance-relative
    /// list loads, in seconds.
    pub geolocation_timeout_secs: u64,
    /// Radius used for `--near` searches when `--km` is not given.
    pub default_radius_km: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000".to_string(),
            http_timeout_secs: 30,
            geolocation_timeout_secs: 10,
            default_radius_km: 10.0,
        }
    }
}

impl Settings {
    /// What: Load settings from `settings.toml` in the config dir.
    ///
    /// Inputs: none
    ///
    /// Output:
    /// - Parsed [`Settings`] on success; defaults when the file is absent or
    ///   malformed (malformed files are logged at warn level, never fatal).
    #[must_use]
    pub fn load() -> Self {
        let path = config_dir().join("settings.toml");
        match std::fs::read_to_string(&path) {
            Ok(body) => match toml::from_str::<Self>(&body) {
                Ok(s) => s,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "invalid settings file; using defaults");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// What: Defaults carry the documented fallback values
    ///
    /// - Input: `Settings::default()`
    /// - Output: localhost backend, 10s geolocation timeout, 10 km radius
    fn settings_defaults() {
        let s = Settings::default();
        assert_eq!(s.api_base_url, "http://localhost:5000");
        assert_eq!(s.geolocation_timeout_secs, 10);
        assert!((s.default_radius_km - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    /// What: Partial TOML files fill missing fields from defaults
    ///
    /// - Input: TOML with only `api_base_url`
    /// - Output: custom URL, default timeouts
    fn settings_partial_toml_uses_defaults() {
        let s: Settings =
            toml::from_str("api_base_url = \"https://places.example.org\"").expect("valid toml");
        assert_eq!(s.api_base_url, "https://places.example.org");
        assert_eq!(s.http_timeout_secs, 30);
    }
}
