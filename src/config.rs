//! Client configuration.
//!
//! Settings come from an optional `tickbox.toml` in the configuration
//! directory, then `TICKBOX_*` environment variables override individual
//! values. Loading does not validate; call [`TickboxConfig::validate`] before
//! building clients so every problem surfaces at startup.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use serde::Deserialize;
use std::io;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// Name of the configuration file inside the configuration directory.
pub const CONFIG_FILE_NAME: &str = "tickbox.toml";

const DEFAULT_IDENTITY_URL: &str = "https://identitytoolkit.googleapis.com";
const DEFAULT_FIRESTORE_URL: &str = "https://firestore.googleapis.com";
const DEFAULT_COLLECTION: &str = "todos";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_LOG_FILTER: &str = "info";

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file exists but could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path of the unreadable file.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The configuration file is not valid TOML for this schema.
    #[error("failed to parse {path}: {source}")]
    Toml {
        /// Path of the malformed file.
        path: Utf8PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// A value is missing or out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),

    /// The HTTP client could not be built from the settings.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Top-level client configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TickboxConfig {
    /// Hosted backend settings.
    pub backend: BackendConfig,
    /// Log filter settings.
    pub logging: LoggingConfig,
}

/// Connection settings for the hosted identity provider and document store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Public project API key sent with identity requests.
    pub api_key: String,
    /// Project identifier used in document paths.
    pub project_id: String,
    /// Base URL of the identity REST API.
    pub identity_url: String,
    /// Base URL of the document store REST API.
    pub firestore_url: String,
    /// Collection holding task documents.
    pub collection: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            project_id: String::new(),
            identity_url: DEFAULT_IDENTITY_URL.to_owned(),
            firestore_url: DEFAULT_FIRESTORE_URL.to_owned(),
            collection: DEFAULT_COLLECTION.to_owned(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing-subscriber` filter directive, e.g. `info,tickbox=debug`.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_owned(),
        }
    }
}

impl TickboxConfig {
    /// Loads configuration from `dir` and the process environment.
    ///
    /// A missing directory or file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read and
    /// [`ConfigError::Toml`] when it cannot be parsed.
    pub fn load(dir: &Utf8Path) -> ConfigResult<Self> {
        let mut config = Self::load_file(dir)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn load_file(dir: &Utf8Path) -> ConfigResult<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        let io_error = |source: io::Error| ConfigError::Io {
            path: path.clone(),
            source,
        };

        let handle = match Dir::open_ambient_dir(dir, ambient_authority()) {
            Ok(handle) => handle,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => return Err(io_error(err)),
        };
        let contents = match handle.read_to_string(CONFIG_FILE_NAME) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => return Err(io_error(err)),
        };

        toml::from_str(&contents).map_err(|source| ConfigError::Toml {
            path: path.clone(),
            source,
        })
    }

    /// Applies `TICKBOX_*` overrides read through `lookup`.
    ///
    /// Recognised keys: `TICKBOX_API_KEY`, `TICKBOX_PROJECT_ID`,
    /// `TICKBOX_IDENTITY_URL`, `TICKBOX_FIRESTORE_URL`, `TICKBOX_COLLECTION`,
    /// `TICKBOX_TIMEOUT_SECS` and `TICKBOX_LOG`. Unparseable timeouts are
    /// ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let backend = &mut self.backend;
        let targets: [(&str, &mut String); 5] = [
            ("TICKBOX_API_KEY", &mut backend.api_key),
            ("TICKBOX_PROJECT_ID", &mut backend.project_id),
            ("TICKBOX_IDENTITY_URL", &mut backend.identity_url),
            ("TICKBOX_FIRESTORE_URL", &mut backend.firestore_url),
            ("TICKBOX_COLLECTION", &mut backend.collection),
        ];
        for (key, target) in targets {
            if let Some(value) = lookup(key) {
                *target = value;
            }
        }
        if let Some(secs) = lookup("TICKBOX_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            backend.timeout_secs = secs;
        }
        if let Some(filter) = lookup("TICKBOX_LOG") {
            self.logging.filter = filter;
        }
    }

    /// Checks that the configuration can drive the hosted backend.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending setting.
    pub fn validate(&self) -> ConfigResult<()> {
        self.backend.validate()
    }

    /// Logs a configuration summary. The API key is never logged.
    pub fn log_summary(&self) {
        info!(
            project_id = %self.backend.project_id,
            identity_url = %self.backend.identity_url,
            firestore_url = %self.backend.firestore_url,
            collection = %self.backend.collection,
            timeout_secs = self.backend.timeout_secs,
            log_filter = %self.logging.filter,
            "configuration loaded"
        );
    }
}

impl BackendConfig {
    fn validate(&self) -> ConfigResult<()> {
        let required = [
            ("backend.api_key", &self.api_key),
            ("backend.project_id", &self.project_id),
            ("backend.collection", &self.collection),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{name} must be set")));
            }
        }
        for (name, url) in [
            ("backend.identity_url", &self.identity_url),
            ("backend.firestore_url", &self.firestore_url),
        ] {
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be an http(s) URL, got '{url}'"
                )));
            }
        }
        if self.collection.contains('/') {
            return Err(ConfigError::Invalid(
                "backend.collection must not contain '/'".to_owned(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "backend.timeout_secs must be positive".to_owned(),
            ));
        }
        Ok(())
    }

    /// Returns the request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Builds the HTTP client shared by both REST adapters.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HttpClient`] when the TLS backend fails to
    /// initialise.
    pub fn http_client(&self) -> ConfigResult<reqwest::Client> {
        Ok(reqwest::Client::builder().timeout(self.timeout()).build()?)
    }

    /// Returns the document root URL for the configured project.
    #[must_use]
    pub fn documents_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/databases/(default)/documents",
            self.firestore_url.trim_end_matches('/'),
            self.project_id
        )
    }
}
