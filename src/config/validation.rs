//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde/clap handle syntactic)
//! - Check TLS material is complete when TLS is enabled
//! - Validate value ranges (bind address parses, timeout > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::AppConfig;

/// A single semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Bind address does not parse as host:port.
    InvalidBindAddress(String),
    /// TLS is enabled but no certificate file was given.
    MissingTlsCertificate,
    /// TLS is enabled but no private key file was given.
    MissingTlsKey,
    /// A trusted CA bundle was given while TLS is disabled.
    TrustedCertsWithoutTls,
    /// The graceful stop window must be non-zero.
    ZeroGracefulStopTimeout,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::InvalidBindAddress(addr) => {
                write!(f, "invalid bind address '{}'", addr)
            }
            ValidationError::MissingTlsCertificate => {
                write!(f, "TLS is enabled but tls_cert_file_path is not set")
            }
            ValidationError::MissingTlsKey => {
                write!(f, "TLS is enabled but tls_key_file_path is not set")
            }
            ValidationError::TrustedCertsWithoutTls => {
                write!(f, "tls_trusted_certs_file_path is set but TLS is disabled")
            }
            ValidationError::ZeroGracefulStopTimeout => {
                write!(f, "graceful_stop_timeout_millis must be greater than zero")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate the merged configuration, collecting every error found.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let server = &config.server;

    if server.bind_host_port.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            server.bind_host_port.clone(),
        ));
    }

    if !server.no_tls {
        if server.tls_cert_file_path.is_none() {
            errors.push(ValidationError::MissingTlsCertificate);
        }
        if server.tls_key_file_path.is_none() {
            errors.push(ValidationError::MissingTlsKey);
        }
    } else if server.tls_trusted_certs_file_path.is_some() {
        errors.push(ValidationError::TrustedCertsWithoutTls);
    }

    if server.graceful_stop_timeout_millis == 0 {
        errors.push(ValidationError::ZeroGracefulStopTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::AppConfig;

    fn plaintext_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.server.no_tls = true;
        config
    }

    #[test]
    fn plaintext_defaults_are_valid() {
        assert!(validate_config(&plaintext_config()).is_ok());
    }

    #[test]
    fn tls_without_material_collects_both_errors() {
        let config = AppConfig::default();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::MissingTlsCertificate));
        assert!(errors.contains(&ValidationError::MissingTlsKey));
    }

    #[test]
    fn bad_address_and_zero_timeout_are_both_reported() {
        let mut config = plaintext_config();
        config.server.bind_host_port = "nope".into();
        config.server.graceful_stop_timeout_millis = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn trusted_bundle_without_tls_is_rejected() {
        let mut config = plaintext_config();
        config.server.tls_trusted_certs_file_path = Some("ca.pem".into());
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::TrustedCertsWithoutTls]);
    }
}
