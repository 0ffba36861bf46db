//! Client configuration.
//!
//! A `Configuration` is built once, either from the defaults, from a map of
//! overrides merged over the defaults, or from a YAML file, and is never
//! mutated after it has been handed to a `Client`.

use dirs::config_dir;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use strum::{Display, EnumString};
use tracing::debug;

use crate::transport::ProxySettings;

pub const DEFAULT_APPLICATION_ID: &str = "contentful-management";
pub const DEFAULT_CONFIGURATION_FILE_NAME: &str = "config.yml";
pub const CONFIG_DIR_ENV_VAR: &str = "CONTENTFUL_MANAGEMENT_CONFIG_DIR";

pub const DEFAULT_API_URL: &str = "api.contentful.com";
pub const DEFAULT_API_VERSION: &str = "1";
pub const DEFAULT_LOCALE: &str = "en-US";

#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("failed to resolve the configuration directory")]
    FailedToFindConfigurationDirectory,
    #[error("failed to load configuration data, because of: {cause:?}")]
    FailedToLoadData {
        cause: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("invalid configuration override: {0}")]
    InvalidOverride(#[from] serde_json::Error),
}

/// Verbosity of the request/response log emitted when `logger` is enabled
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Host name of the Management API, without protocol
    pub api_url: String,
    pub api_version: String,
    /// Use `https` when true, `http` otherwise
    pub secure: bool,
    pub default_locale: String,
    /// Ask the server for gzip encoded responses
    pub gzip_encoded: bool,
    /// Emit a log record for every request and response
    pub logger: bool,
    pub log_level: LogLevel,
    /// Return API errors as `Err` instead of inside the `Response`
    pub raise_errors: bool,
    /// Space ids whose content types are loaded into the dynamic entry cache at construction
    pub dynamic_entries: Vec<String>,
    pub proxy_host: Option<String>,
    pub proxy_port: Option<u16>,
    pub proxy_username: Option<String>,
    pub proxy_password: Option<String>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            secure: true,
            default_locale: DEFAULT_LOCALE.to_string(),
            gzip_encoded: true,
            logger: false,
            log_level: LogLevel::Info,
            raise_errors: false,
            dynamic_entries: Vec::new(),
            proxy_host: None,
            proxy_port: None,
            proxy_username: None,
            proxy_password: None,
        }
    }
}

impl Configuration {
    /// Merge a map of overrides over the defaults.
    ///
    /// Keys that are not configuration options are ignored.
    pub fn merge(overrides: &Map<String, Value>) -> Result<Configuration, ConfigurationError> {
        Configuration::default().merged(overrides)
    }

    /// Merge a map of overrides over this configuration, producing a new one
    pub fn merged(&self, overrides: &Map<String, Value>) -> Result<Configuration, ConfigurationError> {
        let mut value = serde_json::to_value(self)?;
        if let Value::Object(fields) = &mut value {
            for (key, override_value) in overrides {
                fields.insert(key.clone(), override_value.clone());
            }
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn protocol(&self) -> &'static str {
        if self.secure {
            "https"
        } else {
            "http"
        }
    }

    /// The URL every relative request path is appended to
    pub fn base_url(&self) -> String {
        format!("{}://{}/spaces", self.protocol(), self.api_url)
    }

    /// The versioned media type sent as `Content-Type`
    pub fn media_type(&self) -> String {
        format!(
            "application/vnd.contentful.management.v{}+json",
            self.api_version
        )
    }

    pub fn proxy(&self) -> ProxySettings {
        ProxySettings {
            host: self.proxy_host.clone(),
            port: self.proxy_port,
            username: self.proxy_username.clone(),
            password: self.proxy_password.clone(),
        }
    }

    pub fn get_default_configuration_file_path() -> Result<PathBuf, ConfigurationError> {
        if let Ok(config_dir_str) = std::env::var(CONFIG_DIR_ENV_VAR) {
            let mut config_path = PathBuf::from(config_dir_str);
            config_path.push(DEFAULT_CONFIGURATION_FILE_NAME);
            return Ok(config_path);
        }

        match config_dir() {
            Some(mut path) => {
                path.push(DEFAULT_APPLICATION_ID);
                path.push(DEFAULT_CONFIGURATION_FILE_NAME);
                Ok(path)
            }
            None => Err(ConfigurationError::FailedToFindConfigurationDirectory),
        }
    }

    /// Load the configuration file from the default location, falling back to
    /// the defaults when no file exists there
    pub fn load_default() -> Result<Configuration, ConfigurationError> {
        let path = Configuration::get_default_configuration_file_path()?;
        if !path.exists() {
            debug!(
                "No configuration file at {}, using defaults",
                path.display()
            );
            return Ok(Configuration::default());
        }
        Configuration::load_from_file(&path)
    }

    pub fn load_from_file(path: &Path) -> Result<Configuration, ConfigurationError> {
        debug!("Loading configuration from {}...", path.display());
        let data = std::fs::read_to_string(path)
            .map_err(|e| ConfigurationError::FailedToLoadData { cause: Box::new(e) })?;
        Configuration::from_yaml(&data)
    }

    /// Parse YAML configuration; absent options keep their defaults
    pub fn from_yaml(data: &str) -> Result<Configuration, ConfigurationError> {
        serde_yaml::from_str(data)
            .map_err(|e| ConfigurationError::FailedToLoadData { cause: Box::new(e) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn overrides(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("overrides must be an object"),
        }
    }

    #[test]
    fn test_merge_empty_preserves_defaults() {
        let merged = Configuration::merge(&Map::new()).unwrap();
        assert_eq!(merged, Configuration::default());
    }

    #[test]
    fn test_merge_overwrites_each_recognized_key() {
        let cases = vec![
            ("api_url", json!("local.test")),
            ("api_version", json!("2")),
            ("secure", json!(false)),
            ("default_locale", json!("de-DE")),
            ("gzip_encoded", json!(false)),
            ("logger", json!(true)),
            ("log_level", json!("debug")),
            ("raise_errors", json!(true)),
            ("dynamic_entries", json!(["space1", "space2"])),
            ("proxy_host", json!("proxy.local")),
            ("proxy_port", json!(8080)),
            ("proxy_username", json!("user")),
            ("proxy_password", json!("secret")),
        ];

        let defaults = serde_json::to_value(Configuration::default()).unwrap();
        for (key, value) in cases {
            let mut single = Map::new();
            single.insert(key.to_string(), value.clone());
            let merged = Configuration::merge(&single).unwrap();
            let merged = serde_json::to_value(merged).unwrap();
            assert_eq!(merged[key], value, "{key} was not overridden");
            for (other, default_value) in defaults.as_object().unwrap() {
                if other.as_str() != key {
                    assert_eq!(&merged[other], default_value, "{other} changed when merging {key}");
                }
            }
        }
    }

    #[test]
    fn test_merge_ignores_unknown_keys() {
        let merged =
            Configuration::merge(&overrides(json!({"no_such_option": 1, "secure": false})))
                .unwrap();
        assert!(!merged.secure);
        assert_eq!(merged.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_merge_rejects_wrongly_typed_values() {
        let result = Configuration::merge(&overrides(json!({"secure": "yes"})));
        assert!(matches!(result, Err(ConfigurationError::InvalidOverride(_))));
    }

    #[test]
    fn test_base_url() {
        assert_eq!(
            Configuration::default().base_url(),
            "https://api.contentful.com/spaces"
        );

        let insecure =
            Configuration::merge(&overrides(json!({"secure": false, "api_url": "local.test"})))
                .unwrap();
        assert_eq!(insecure.base_url(), "http://local.test/spaces");
    }

    #[test]
    fn test_media_type() {
        assert_eq!(
            Configuration::default().media_type(),
            "application/vnd.contentful.management.v1+json"
        );
    }

    #[test]
    fn test_proxy_settings() {
        assert!(Configuration::default().proxy().is_empty());

        let configuration = Configuration {
            proxy_host: Some("proxy.local".to_string()),
            proxy_port: Some(3128),
            ..Configuration::default()
        };
        let proxy = configuration.proxy();
        assert_eq!(proxy.host.as_deref(), Some("proxy.local"));
        assert_eq!(proxy.port, Some(3128));
        assert!(proxy.username.is_none());
    }

    #[test]
    fn test_load_from_yaml_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "api_url: eu.contentful.test").unwrap();
        writeln!(file, "raise_errors: true").unwrap();
        writeln!(file, "dynamic_entries:").unwrap();
        writeln!(file, "  - space1").unwrap();

        let configuration = Configuration::load_from_file(file.path()).unwrap();
        assert_eq!(configuration.api_url, "eu.contentful.test");
        assert!(configuration.raise_errors);
        assert_eq!(configuration.dynamic_entries, vec!["space1".to_string()]);
        assert_eq!(configuration.default_locale, DEFAULT_LOCALE);
    }

    #[test]
    fn test_load_from_missing_file_fails() {
        let result = Configuration::load_from_file(Path::new("/definitely/not/here.yml"));
        assert!(matches!(
            result,
            Err(ConfigurationError::FailedToLoadData { .. })
        ));
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!("DEBUG".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::Warn.to_string(), "warn");
        assert_eq!(tracing::Level::from(LogLevel::Trace), tracing::Level::TRACE);
    }
}
