//! Configuration module for formrelay.

use serde::Deserialize;
use std::path::Path;

use crate::{RelayError, Result};

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Mail relay configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    /// Relay account. Also used as the sender and recipient mailbox.
    #[serde(default)]
    pub user: String,
    /// Relay credential.
    #[serde(default)]
    pub pass: String,
    /// SMTP relay host.
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    /// SMTP relay port. 587 uses STARTTLS, anything else implicit TLS.
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

fn default_smtp_port() -> u16 {
    465
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            user: String::new(),
            pass: String::new(),
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
        }
    }
}

/// Upload staging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadsConfig {
    /// Directory where uploaded documents are staged.
    #[serde(default = "default_upload_dir")]
    pub dir: String,
    /// Maximum size of a single uploaded file in bytes.
    #[serde(default = "default_max_file_size")]
    pub max_file_size_bytes: u64,
    /// Remove staged files when sending the application fails.
    #[serde(default)]
    pub cleanup_on_failure: bool,
}

fn default_upload_dir() -> String {
    "uploads".to_string()
}

fn default_max_file_size() -> u64 {
    6 * 1024 * 1024
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            dir: default_upload_dir(),
            max_file_size_bytes: default_max_file_size(),
            cleanup_on_failure: false,
        }
    }
}

/// Web layer configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebConfig {
    /// CORS allowed origins. Empty allows any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Optional log file, written in addition to stdout.
    #[serde(default)]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Mail relay configuration.
    #[serde(default)]
    pub mail: MailConfig,
    /// Upload staging configuration.
    #[serde(default)]
    pub uploads: UploadsConfig,
    /// Web layer configuration.
    #[serde(default)]
    pub web: WebConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(RelayError::Io)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| RelayError::Validation(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `PORT`: listen port
    /// - `EMAIL_USER`: relay account and service mailbox
    /// - `EMAIL_PASS`: relay credential
    /// - `SMTP_HOST`, `SMTP_PORT`: relay endpoint
    /// - `UPLOAD_DIR`: staging directory
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup. Empty values are ignored.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(port) = get("PORT") {
            self.server.port = parse_port("PORT", &port)?;
        }
        if let Some(user) = get("EMAIL_USER") {
            self.mail.user = user;
        }
        if let Some(pass) = get("EMAIL_PASS") {
            self.mail.pass = pass;
        }
        if let Some(host) = get("SMTP_HOST") {
            self.mail.smtp_host = host;
        }
        if let Some(port) = get("SMTP_PORT") {
            self.mail.smtp_port = parse_port("SMTP_PORT", &port)?;
        }
        if let Some(dir) = get("UPLOAD_DIR") {
            self.uploads.dir = dir;
        }
        Ok(())
    }

    /// Validate the configuration.
    ///
    /// Missing mail credentials are not an error here: the relay rejects
    /// them on the first send and the handler reports a 500.
    pub fn validate(&self) -> Result<()> {
        if self.uploads.dir.trim().is_empty() {
            return Err(RelayError::Validation(
                "uploads.dir must not be empty".to_string(),
            ));
        }
        if self.uploads.max_file_size_bytes == 0 {
            return Err(RelayError::Validation(
                "uploads.max_file_size_bytes must be greater than zero".to_string(),
            ));
        }
        if self.mail.smtp_host.trim().is_empty() {
            return Err(RelayError::Validation(
                "mail.smtp_host must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_port(key: &str, value: &str) -> Result<u16> {
    value
        .trim()
        .parse()
        .map_err(|_| RelayError::Config(format!("{key} is not a valid port: {value}")))
}
