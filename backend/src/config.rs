//! Application configuration.
//!
//! Settings come from a TOML file, then environment variables override
//! individual fields. Every field has a default, so an empty file (or no file
//! at all) yields a working development setup.
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//! default_locale = "en"
//!
//! [fate]
//! local_time_policy = "reject"
//!
//! [ephemeris]
//! source = "table"
//! data_path = "ephe/sun.json"
//!
//! [submission]
//! kind = "http"
//! base_url = "http://localhost:3000"
//! timeout_secs = 10
//!
//! [chat]
//! endpoint = "http://localhost:8081/generate"
//!
//! [payment]
//! base_url = "https://destinypath.onrender.com"
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ephemeris::EphemerisSource;
use crate::fate::LocalTimePolicy;
use crate::models::Locale;
use crate::payment::DEFAULT_PAYMENT_BASE_URL;
use crate::submission::SinkKind;

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "DESTINYPATH_CONFIG";

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {reason}")]
    Io { path: PathBuf, reason: String },

    #[error("Failed to parse config file {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("No destinypath.toml found in standard locations")]
    NotFound,

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field,
            reason: reason.into(),
        }
    }
}

/// Complete configuration, one section per component.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub fate: FateSettings,
    #[serde(default)]
    pub ephemeris: EphemerisSettings,
    #[serde(default)]
    pub submission: SubmissionSettings,
    #[serde(default)]
    pub chat: ChatSettings,
    #[serde(default)]
    pub payment: PaymentSettings,
}

/// HTTP listener and UI defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_locale")]
    pub default_locale: String,
    /// Directory of `<locale>.toml` catalogs; the built-in catalog when unset.
    #[serde(default)]
    pub catalog_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FateSettings {
    #[serde(default = "default_local_time_policy")]
    pub local_time_policy: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EphemerisSettings {
    #[serde(default = "default_ephemeris_source")]
    pub source: String,
    #[serde(default)]
    pub data_path: Option<PathBuf>,
}

/// Where and how submissions are persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionSettings {
    #[serde(default = "default_sink_kind")]
    pub kind: String,
    #[serde(default = "default_submission_base_url")]
    pub base_url: String,
    #[serde(default = "default_submission_timeout")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub max_retries: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

/// Assistant endpoint. Chat is disabled while `endpoint` is unset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSettings {
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default = "default_chat_max_length")]
    pub max_length: u32,
    #[serde(default = "default_chat_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSettings {
    #[serde(default = "default_payment_base_url")]
    pub base_url: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_locale() -> String {
    "en".to_string()
}

fn default_local_time_policy() -> String {
    "reject".to_string()
}

fn default_ephemeris_source() -> String {
    "analytic".to_string()
}

fn default_sink_kind() -> String {
    "http".to_string()
}

fn default_submission_base_url() -> String {
    crate::submission::http::DEFAULT_BASE_URL.to_string()
}

fn default_submission_timeout() -> u64 {
    10
}

fn default_retry_delay_ms() -> u64 {
    250
}

fn default_chat_max_length() -> u32 {
    100
}

fn default_chat_timeout() -> u64 {
    30
}

fn default_payment_base_url() -> String {
    DEFAULT_PAYMENT_BASE_URL.to_string()
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            default_locale: default_locale(),
            catalog_dir: None,
        }
    }
}

impl Default for FateSettings {
    fn default() -> Self {
        Self {
            local_time_policy: default_local_time_policy(),
        }
    }
}

impl Default for EphemerisSettings {
    fn default() -> Self {
        Self {
            source: default_ephemeris_source(),
            data_path: None,
        }
    }
}

impl Default for SubmissionSettings {
    fn default() -> Self {
        Self {
            kind: default_sink_kind(),
            base_url: default_submission_base_url(),
            timeout_secs: default_submission_timeout(),
            max_retries: 0,
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_token: None,
            max_length: default_chat_max_length(),
            timeout_secs: default_chat_timeout(),
        }
    }
}

impl Default for PaymentSettings {
    fn default() -> Self {
        Self {
            base_url: default_payment_base_url(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Load configuration from the default location.
    ///
    /// Uses `$DESTINYPATH_CONFIG` when set, otherwise searches for
    /// `destinypath.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> Result<Self, ConfigError> {
        if let Ok(path) = env::var(CONFIG_PATH_ENV) {
            return Self::from_file(path);
        }

        let search_paths = [
            PathBuf::from("destinypath.toml"),
            PathBuf::from("backend/destinypath.toml"),
            PathBuf::from("../destinypath.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Err(ConfigError::NotFound)
    }

    /// File (or defaults when none is found), then environment overrides,
    /// then validation.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::from_default_location() {
            Ok(config) => config,
            Err(ConfigError::NotFound) => Self::default(),
            Err(e) => return Err(e),
        };
        config.apply_overrides(|key| env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Override fields from a variable lookup (the process environment in
    /// [`AppConfig::load`]).
    ///
    /// # Variables
    /// - `HOST`, `PORT`, `DEFAULT_LOCALE`
    /// - `SUBMISSION_KIND`, `SUBMISSION_BASE_URL`
    /// - `EPHEMERIS_SOURCE`, `EPHEMERIS_DATA_PATH`
    /// - `CHAT_ENDPOINT`
    /// - `LOCAL_TIME_POLICY`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid("server.port", format!("'{}' is not a port", port)))?;
        }
        if let Some(locale) = lookup("DEFAULT_LOCALE") {
            self.server.default_locale = locale;
        }
        if let Some(kind) = lookup("SUBMISSION_KIND") {
            self.submission.kind = kind;
        }
        if let Some(url) = lookup("SUBMISSION_BASE_URL") {
            self.submission.base_url = url;
        }
        if let Some(source) = lookup("EPHEMERIS_SOURCE") {
            self.ephemeris.source = source;
        }
        if let Some(path) = lookup("EPHEMERIS_DATA_PATH") {
            self.ephemeris.data_path = Some(PathBuf::from(path));
        }
        if let Some(endpoint) = lookup("CHAT_ENDPOINT") {
            self.chat.endpoint = Some(endpoint).filter(|e| !e.trim().is_empty());
        }
        if let Some(policy) = lookup("LOCAL_TIME_POLICY") {
            self.fate.local_time_policy = policy;
        }
        Ok(())
    }

    /// Check every string-typed field parses.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.default_locale()?;
        self.local_time_policy()?;
        self.sink_kind()?;
        let source = self.ephemeris_source()?;
        if source == EphemerisSource::Table && self.ephemeris.data_path.is_none() {
            return Err(ConfigError::invalid(
                "ephemeris.data_path",
                "required when ephemeris.source = \"table\"",
            ));
        }
        if self.submission.timeout_secs == 0 {
            return Err(ConfigError::invalid("submission.timeout_secs", "must be positive"));
        }
        if self.chat.timeout_secs == 0 {
            return Err(ConfigError::invalid("chat.timeout_secs", "must be positive"));
        }
        Ok(())
    }

    pub fn default_locale(&self) -> Result<Locale, ConfigError> {
        Locale::from_str(&self.server.default_locale)
            .map_err(|e| ConfigError::invalid("server.default_locale", e))
    }

    pub fn local_time_policy(&self) -> Result<LocalTimePolicy, ConfigError> {
        LocalTimePolicy::from_str(&self.fate.local_time_policy)
            .map_err(|e| ConfigError::invalid("fate.local_time_policy", e))
    }

    pub fn ephemeris_source(&self) -> Result<EphemerisSource, ConfigError> {
        EphemerisSource::from_str(&self.ephemeris.source)
            .map_err(|e| ConfigError::invalid("ephemeris.source", e))
    }

    pub fn sink_kind(&self) -> Result<SinkKind, ConfigError> {
        SinkKind::from_str(&self.submission.kind)
            .map_err(|e| ConfigError::invalid("submission.kind", e))
    }

    /// `host:port` for the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.submission.base_url, "http://localhost:3000");
        assert_eq!(config.submission.timeout_secs, 10);
        assert_eq!(config.submission.max_retries, 0);
        assert_eq!(config.payment.base_url, "https://destinypath.onrender.com");
        assert!(config.chat.endpoint.is_none());
        assert_eq!(config.local_time_policy().unwrap(), LocalTimePolicy::Reject);
        assert_eq!(config.ephemeris_source().unwrap(), EphemerisSource::Analytic);
        assert_eq!(config.sink_kind().unwrap(), SinkKind::Http);
        config.validate().unwrap();
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 9000
default_locale = "ja"

[fate]
local_time_policy = "earliest"

[ephemeris]
source = "table"
data_path = "ephe/sun.json"

[submission]
kind = "local"
max_retries = 2
retry_delay_ms = 50

[chat]
endpoint = "http://localhost:8081/generate"
max_length = 64
"#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        config.validate().unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:9000");
        assert_eq!(config.default_locale().unwrap(), Locale::Ja);
        assert_eq!(config.local_time_policy().unwrap(), LocalTimePolicy::Earliest);
        assert_eq!(config.sink_kind().unwrap(), SinkKind::Local);
        assert_eq!(config.submission.max_retries, 2);
        assert_eq!(config.chat.max_length, 64);
    }

    #[test]
    fn test_table_source_requires_data_path() {
        let config: AppConfig = toml::from_str("[ephemeris]\nsource = \"table\"\n").unwrap();
        match config.validate() {
            Err(ConfigError::InvalidValue { field, .. }) => assert_eq!(field, "ephemeris.data_path"),
            other => panic!("expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_value_names_field() {
        let config: AppConfig = toml::from_str("[submission]\nkind = \"mongo\"\n").unwrap();
        match config.validate() {
            Err(ConfigError::InvalidValue { field, .. }) => assert_eq!(field, "submission.kind"),
            other => panic!("expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_overrides() {
        let mut config = AppConfig::default();
        config
            .apply_overrides(lookup(&[
                ("PORT", "3001"),
                ("SUBMISSION_KIND", "memory"),
                ("CHAT_ENDPOINT", "http://chat"),
                ("LOCAL_TIME_POLICY", "earliest"),
                ("EPHEMERIS_DATA_PATH", "/data/sun.json"),
            ]))
            .unwrap();
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.sink_kind().unwrap(), SinkKind::Local);
        assert_eq!(config.chat.endpoint.as_deref(), Some("http://chat"));
        assert_eq!(config.local_time_policy().unwrap(), LocalTimePolicy::Earliest);
        assert_eq!(config.ephemeris.data_path, Some(PathBuf::from("/data/sun.json")));
    }

    #[test]
    fn test_blank_chat_endpoint_disables_chat() {
        let mut config = AppConfig::default();
        config.chat.endpoint = Some("http://chat".to_string());
        config.apply_overrides(lookup(&[("CHAT_ENDPOINT", " ")])).unwrap();
        assert!(config.chat.endpoint.is_none());
    }

    #[test]
    fn test_bad_port_override() {
        let mut config = AppConfig::default();
        let err = config.apply_overrides(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "server.port", .. }));
    }

    #[test]
    fn test_from_file_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("destinypath.toml");
        fs::write(&path, "[server\nport = 1").unwrap();
        assert!(matches!(AppConfig::from_file(&path), Err(ConfigError::Parse { .. })));
    }
}
