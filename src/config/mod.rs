//! Route configuration loading.
//!
//! The config file (`seo.json` by convention) is a single JSON object:
//!
//! ```json
//! {
//!   "/":        { "title": "Home", "ogImage": "/images/og/og-home.webp" },
//!   "/about":   { "ogImage": "/images/og/og-about.webp" },
//!   "_global":  { "defaultImage": "/images/og/og-default.webp", "logo": "/images/logo.webp" }
//! }
//! ```
//!
//! Keys beginning with `/` are routes; the reserved `_global` key holds
//! site-wide defaults. Everything else (titles, descriptions, other
//! metadata) is ignored here. Route order is the file's insertion order -
//! `serde_json` is built with `preserve_order` for exactly this reason.
//!
//! The config is read once per invocation and never written back.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Reserved key for process-wide defaults.
const GLOBAL_KEY: &str = "_global";

// ============================================================================
// Errors
// ============================================================================

/// Configuration-related errors. All are fatal: nothing runs without a
/// readable route map.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to parse `{0}` as JSON")]
    Parse(PathBuf, #[source] serde_json::Error),
}

// ============================================================================
// Types
// ============================================================================

/// One route entry from the config.
#[derive(Debug, Clone)]
pub struct Route {
    /// Route path as configured, e.g. `/` or `/about`.
    pub path: String,
    /// Raw `ogImage` value, e.g. `/images/og/og-about.webp`.
    pub og_image: Option<String>,
}

/// Site-wide defaults from the `_global` entry.
///
/// Both images count as referenced for orphan detection even though no
/// route points at them.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct GlobalDefaults {
    #[serde(rename = "defaultImage")]
    pub default_image: Option<String>,
    pub logo: Option<String>,
}

/// The parsed route configuration: ordered routes plus global defaults.
#[derive(Debug, Clone)]
pub struct RoutesConfig {
    /// Path the config was loaded from (for error messages).
    pub path: PathBuf,
    /// Routes in file insertion order.
    pub routes: Vec<Route>,
    pub global: GlobalDefaults,
}

impl RoutesConfig {
    /// Load and parse the route config from `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let map: Map<String, Value> = serde_json::from_str(&raw)
            .map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        Ok(Self::from_map(path, map))
    }

    /// Build the typed config from the raw JSON object, preserving key order.
    fn from_map(path: &Path, map: Map<String, Value>) -> Self {
        let mut routes = Vec::new();
        let mut global = GlobalDefaults::default();

        for (key, value) in map {
            if key == GLOBAL_KEY {
                global = serde_json::from_value(value).unwrap_or_else(|e| {
                    crate::debug!("config"; "ignoring malformed `{GLOBAL_KEY}` entry: {e}");
                    GlobalDefaults::default()
                });
                continue;
            }

            // Routes are `/`-prefixed object entries; anything else is
            // unrelated metadata and stays untouched.
            if !key.starts_with('/') {
                continue;
            }
            let Some(entry) = value.as_object() else {
                continue;
            };

            let og_image = entry
                .get("ogImage")
                .and_then(Value::as_str)
                .map(str::to_owned);
            routes.push(Route {
                path: key,
                og_image,
            });
        }

        Self {
            path: path.to_path_buf(),
            routes,
            global,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> RoutesConfig {
        let map: Map<String, Value> = serde_json::from_str(json).unwrap();
        RoutesConfig::from_map(Path::new("seo.json"), map)
    }

    #[test]
    fn test_routes_in_insertion_order() {
        let config = parse(
            r#"{
                "/zebra": { "ogImage": "/images/og/og-zebra.webp" },
                "/": { "ogImage": "/images/og/og-home.webp" },
                "/about": { "ogImage": "/images/og/og-about.webp" }
            }"#,
        );
        let paths: Vec<_> = config.routes.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, ["/zebra", "/", "/about"]);
    }

    #[test]
    fn test_global_and_metadata_keys_are_not_routes() {
        let config = parse(
            r#"{
                "siteName": "Example",
                "/": { "title": "Home", "ogImage": "/images/og/og-home.webp" },
                "_global": { "defaultImage": "/images/og/og-default.webp", "logo": "/logo.webp" }
            }"#,
        );
        assert_eq!(config.routes.len(), 1);
        assert_eq!(
            config.global.default_image.as_deref(),
            Some("/images/og/og-default.webp")
        );
        assert_eq!(config.global.logo.as_deref(), Some("/logo.webp"));
    }

    #[test]
    fn test_route_without_og_image() {
        let config = parse(r#"{ "/plain": { "title": "No image here" } }"#);
        assert_eq!(config.routes.len(), 1);
        assert!(config.routes[0].og_image.is_none());
    }

    #[test]
    fn test_non_object_route_value_ignored() {
        let config = parse(r#"{ "/weird": "not an object", "/ok": {} }"#);
        let paths: Vec<_> = config.routes.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, ["/ok"]);
    }

    #[test]
    fn test_non_string_og_image_ignored() {
        let config = parse(r#"{ "/": { "ogImage": 42 } }"#);
        assert!(config.routes[0].og_image.is_none());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = RoutesConfig::load(Path::new("/definitely/not/here/seo.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(..)));
    }

    #[test]
    fn test_unparsable_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seo.json");
        fs::write(&path, "{ not json").unwrap();
        let err = RoutesConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(..)));
    }
}
