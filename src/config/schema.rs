//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the event collector.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Server configuration (bind address, TLS, shutdown).
    pub server: ServerConfig,

    /// Logging configuration.
    pub log: LogConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:5000").
    pub bind_host_port: String,

    /// Disable TLS and serve plaintext. TLS is on by default.
    pub no_tls: bool,

    /// Path to the server certificate file (PEM).
    pub tls_cert_file_path: Option<PathBuf>,

    /// Path to the server private key file (PEM).
    pub tls_key_file_path: Option<PathBuf>,

    /// Path to a trusted CA bundle (PEM). When set, client certificates
    /// are required and verified against this pool (mutual TLS).
    pub tls_trusted_certs_file_path: Option<PathBuf>,

    /// How long to wait for in-flight calls to drain on stop before
    /// forcing closure.
    pub graceful_stop_timeout_millis: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_host_port: "0.0.0.0:5000".to_string(),
            no_tls: false,
            tls_cert_file_path: None,
            tls_key_file_path: None,
            tls_trusted_certs_file_path: None,
            graceful_stop_timeout_millis: 5_000,
        }
    }
}

impl ServerConfig {
    /// Graceful stop window as a `Duration`.
    pub fn graceful_stop_timeout(&self) -> Duration {
        Duration::from_millis(self.graceful_stop_timeout_millis)
    }

    /// Whether mutual TLS is in effect: TLS enabled and a trusted CA
    /// bundle configured.
    pub fn mutual_tls(&self) -> bool {
        !self.no_tls && self.tls_trusted_certs_file_path.is_some()
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LogConfig {
    /// Log level filter (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON (one object per line).
    pub log_json: bool,

    /// Enable ANSI colors in the pretty format.
    pub log_color: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_json: false,
            log_color: false,
        }
    }
}
