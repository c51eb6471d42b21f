//! Configuration loading and merging.
//!
//! Sources in increasing precedence: built-in defaults, optional TOML file,
//! then CLI flag / environment overrides. The merged result is validated
//! before it is handed to the rest of the system.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Values supplied on the command line or via environment variables.
///
/// `None` means "not given"; the underlying file/default value is kept.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub bind_host_port: Option<String>,
    pub no_tls: Option<bool>,
    pub tls_cert_file_path: Option<PathBuf>,
    pub tls_key_file_path: Option<PathBuf>,
    pub tls_trusted_certs_file_path: Option<PathBuf>,
    pub graceful_stop_timeout_millis: Option<u64>,
    pub log_level: Option<String>,
    pub log_json: Option<bool>,
    pub log_color: Option<bool>,
}

/// Load, merge, and validate the full configuration.
///
/// `file` is the optional TOML config file; overrides win over its contents.
pub fn load_config(
    file: Option<&Path>,
    overrides: ConfigOverrides,
) -> Result<AppConfig, ConfigError> {
    let mut config = match file {
        Some(path) => parse_file(path)?,
        None => AppConfig::default(),
    };

    apply_overrides(&mut config, overrides);

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

fn parse_file(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    toml::from_str(&content).map_err(ConfigError::Parse)
}

fn apply_overrides(config: &mut AppConfig, overrides: ConfigOverrides) {
    if let Some(v) = overrides.bind_host_port {
        config.server.bind_host_port = v;
    }
    if let Some(v) = overrides.no_tls {
        config.server.no_tls = v;
    }
    if let Some(v) = overrides.tls_cert_file_path {
        config.server.tls_cert_file_path = Some(v);
    }
    if let Some(v) = overrides.tls_key_file_path {
        config.server.tls_key_file_path = Some(v);
    }
    if let Some(v) = overrides.tls_trusted_certs_file_path {
        config.server.tls_trusted_certs_file_path = Some(v);
    }
    if let Some(v) = overrides.graceful_stop_timeout_millis {
        config.server.graceful_stop_timeout_millis = v;
    }
    if let Some(v) = overrides.log_level {
        config.log.log_level = v;
    }
    if let Some(v) = overrides.log_json {
        config.log.log_json = v;
    }
    if let Some(v) = overrides.log_color {
        config.log.log_color = v;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_no_file() {
        let overrides = ConfigOverrides {
            no_tls: Some(true),
            ..Default::default()
        };
        let config = load_config(None, overrides).unwrap();
        assert_eq!(config.server.bind_host_port, "0.0.0.0:5000");
        assert_eq!(config.server.graceful_stop_timeout_millis, 5_000);
    }

    #[test]
    fn tls_defaults_require_certificate_material() {
        // TLS is on by default, so a bare config is incomplete.
        let err = load_config(None, ConfigOverrides::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn overrides_win_over_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[server]
bind_host_port = "127.0.0.1:7000"
no_tls = true
graceful_stop_timeout_millis = 250

[log]
log_level = "debug"
"#,
        )
        .unwrap();

        let overrides = ConfigOverrides {
            bind_host_port: Some("127.0.0.1:9000".into()),
            ..Default::default()
        };
        let config = load_config(Some(&path), overrides).unwrap();

        assert_eq!(config.server.bind_host_port, "127.0.0.1:9000");
        assert!(config.server.no_tls);
        assert_eq!(config.server.graceful_stop_timeout_millis, 250);
        assert_eq!(config.log.log_level, "debug");
    }

    #[test]
    fn invalid_merged_config_is_rejected() {
        let overrides = ConfigOverrides {
            bind_host_port: Some("not-an-address".into()),
            no_tls: Some(true),
            ..Default::default()
        };
        let err = load_config(None, overrides).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }
}
