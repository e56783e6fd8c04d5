//! Configuration management
//!
//! Loads server configuration from a YAML file (`config.yml` by default),
//! filling missing values with defaults and letting `REDACTION_*`
//! environment variables override file settings.

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Site configuration
    #[serde(default)]
    pub site: SiteConfig,
    /// API configuration
    #[serde(default)]
    pub api: ApiConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origin
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "http://localhost:3000".to_string()
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database path (or `:memory:`)
    #[serde(default = "default_database_url")]
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
        }
    }
}

fn default_database_url() -> String {
    "data/content.db".to_string()
}

/// Site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Domain used to build canonical content URLs
    #[serde(default = "default_domain")]
    pub domain: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            domain: default_domain(),
        }
    }
}

fn default_domain() -> String {
    "example.com".to_string()
}

/// API configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Bearer token required by restricted resources. When unset, restricted
    /// resources reject every request.
    #[serde(default)]
    pub token: Option<String>,
}

/// Error type for configuration parsing
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {message}")]
    ParseError { path: String, message: String },
}

impl Config {
    /// Load configuration from file.
    ///
    /// A missing or empty file yields the default configuration; a file with
    /// invalid YAML is an error.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from file with environment variable overrides.
    ///
    /// Recognized variables:
    /// - `REDACTION_SERVER_HOST`
    /// - `REDACTION_SERVER_PORT`
    /// - `REDACTION_SERVER_CORS_ORIGIN`
    /// - `REDACTION_DATABASE_URL`
    /// - `REDACTION_SITE_DOMAIN`
    /// - `REDACTION_API_TOKEN`
    pub fn load_with_env(path: &std::path::Path) -> anyhow::Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("REDACTION_SERVER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("REDACTION_SERVER_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                self.server.port = port;
            }
        }
        if let Ok(cors_origin) = std::env::var("REDACTION_SERVER_CORS_ORIGIN") {
            self.server.cors_origin = cors_origin;
        }
        if let Ok(url) = std::env::var("REDACTION_DATABASE_URL") {
            self.database.url = url;
        }
        if let Ok(domain) = std::env::var("REDACTION_SITE_DOMAIN") {
            self.site.domain = domain;
        }
        if let Ok(token) = std::env::var("REDACTION_API_TOKEN") {
            self.api.token = Some(token);
        }
    }
}
