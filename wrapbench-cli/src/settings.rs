//! YAML settings document.
//!
//! Every key is optional. A missing file at the default location means
//! "all defaults"; a file that exists but cannot be read or parsed is fatal.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use wrapbench_persist::DEFAULT_LOG_DIR;
use wrapbench_persist::DEFAULT_TRACE_FILE;
use wrapbench_persist::JsonlTraceLogger;
use wrapbench_provider::ProviderConfig;
use wrapbench_provider::adapter::DEFAULT_MODEL;
use wrapbench_provider::adapter::DEFAULT_REFERER;
use wrapbench_provider::adapter::DEFAULT_TIMEOUT_SECS;
use wrapbench_provider::adapter::OPENROUTER_API_KEY_ENV;
use wrapbench_provider::adapter::OPENROUTER_BASE_URL;
use wrapbench_runtime::WrappersConfig;

pub const DEFAULT_CONFIG_PATH: &str = "config/config.yaml";
pub const CONFIG_PATH_ENV: &str = "WRAPBENCH_CONFIG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read settings {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid listen address {0}")]
    Address(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSettings {
    #[serde(default = "default_model")]
    pub name: String,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            name: default_model(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenRouterSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_referer")]
    pub referer: String,
}

impl Default for OpenRouterSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            referer: default_referer(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    #[serde(default = "default_trace_file")]
    pub trace_file: String,
}

impl LoggingSettings {
    pub fn trace_path(&self) -> PathBuf {
        self.log_dir.join(&self.trace_file)
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            trace_file: default_trace_file(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub model: ModelSettings,
    #[serde(default)]
    pub openrouter: OpenRouterSettings,
    #[serde(default)]
    pub wrappers: WrappersConfig,
    #[serde(default)]
    pub logging: LoggingSettings,
    #[serde(default)]
    pub server: ServerSettings,
}

impl Settings {
    pub fn from_yaml(path: &Path, text: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes as null.
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(path, &text)
    }

    /// Load `path` when given explicitly; otherwise load the default location
    /// if it exists, else use defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_PATH);
                if default.exists() {
                    Self::load(default)
                } else {
                    tracing::warn!(path = DEFAULT_CONFIG_PATH, "no settings file; using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn provider_config(&self) -> ProviderConfig {
        ProviderConfig {
            name: "OpenRouter".into(),
            base_url: self.openrouter.base_url.clone(),
            env_key: OPENROUTER_API_KEY_ENV.into(),
            model: self.model.name.clone(),
            timeout_secs: self.openrouter.timeout_secs,
            extra_headers: HashMap::from([(
                "HTTP-Referer".to_string(),
                self.openrouter.referer.clone(),
            )]),
        }
    }

    pub fn trace_logger(&self) -> JsonlTraceLogger {
        JsonlTraceLogger::new(&self.logging.log_dir, self.logging.trace_file.clone())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = format!("{}:{}", self.server.host, self.server.port);
        raw.parse().map_err(|_| ConfigError::Address(raw))
    }
}

/// The `.env` load error worth reporting, if any. A missing file is not one.
pub fn dotenv_problem<T>(result: dotenvy::Result<T>) -> Option<dotenvy::Error> {
    match result {
        Ok(_) => None,
        Err(err) if err.not_found() => None,
        Err(err) => Some(err),
    }
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_base_url() -> String {
    OPENROUTER_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_referer() -> String {
    DEFAULT_REFERER.to_string()
}

fn default_log_dir() -> PathBuf {
    PathBuf::from(DEFAULT_LOG_DIR)
}

fn default_trace_file() -> String {
    DEFAULT_TRACE_FILE.to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}
