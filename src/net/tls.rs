//! TLS configuration and certificate loading.
//!
//! # Responsibilities
//! - Load the server certificate / key pair from disk
//! - Load the optional trusted CA bundle and turn on mutual TLS
//! - Reject unreadable or malformed PEM material before the listener binds

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tonic::transport::{Certificate, Identity, ServerTlsConfig};

use crate::config::ServerConfig;

/// Error type for TLS materialization. All variants are fatal; none are
/// retried.
#[derive(Debug, Error)]
pub enum TlsError {
    #[error("TLS is enabled but no certificate file path is configured")]
    MissingCertificatePath,

    #[error("TLS is enabled but no private key file path is configured")]
    MissingKeyPath,

    #[error("failed to read certificate file {path:?}: {source}")]
    CertificateRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read private key file {path:?}: {source}")]
    KeyRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("certificate file {path:?} contains no PEM certificates")]
    InvalidCertificate { path: PathBuf },

    #[error("private key file {path:?} contains no PEM private key")]
    InvalidKey { path: PathBuf },

    #[error("failed to read trusted certificate file {path:?}: {source}")]
    TrustedCertsRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("trusted certificate file {path:?} contains no PEM certificates")]
    InvalidTrustedCerts { path: PathBuf },
}

/// Build the transport-security policy for the listener.
///
/// Returns `None` when TLS is disabled (plaintext). When a trusted CA bundle
/// is configured, the returned policy requires and verifies client
/// certificates against it (mutual TLS); otherwise it authenticates the
/// server only.
pub fn materialize(config: &ServerConfig) -> Result<Option<ServerTlsConfig>, TlsError> {
    if config.no_tls {
        tracing::warn!("Starting without TLS, use TLS in production");
        return Ok(None);
    }

    let cert_path = config
        .tls_cert_file_path
        .as_deref()
        .ok_or(TlsError::MissingCertificatePath)?;
    let key_path = config
        .tls_key_file_path
        .as_deref()
        .ok_or(TlsError::MissingKeyPath)?;

    let cert_pem = read_certificate(cert_path)?;
    let key_pem = read_private_key(key_path)?;

    let mut tls = ServerTlsConfig::new().identity(Identity::from_pem(&cert_pem, &key_pem));

    if let Some(trusted_path) = config.tls_trusted_certs_file_path.as_deref() {
        let trusted_pem = read_trusted_bundle(trusted_path)?;
        tls = tls.client_ca_root(Certificate::from_pem(trusted_pem));
        tracing::info!(
            trusted_certs_file = %trusted_path.display(),
            "Client certificate verification enabled"
        );
    }

    Ok(Some(tls))
}

/// Read the server certificate and check it parses as at least one PEM
/// certificate.
fn read_certificate(path: &Path) -> Result<Vec<u8>, TlsError> {
    let pem = fs::read(path).map_err(|source| TlsError::CertificateRead {
        path: path.to_path_buf(),
        source,
    })?;

    let parsed = rustls_pemfile::certs(&mut pem.as_slice())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| TlsError::InvalidCertificate {
            path: path.to_path_buf(),
        })?;
    if parsed.is_empty() {
        return Err(TlsError::InvalidCertificate {
            path: path.to_path_buf(),
        });
    }

    Ok(pem)
}

/// Read the server private key and check a PEM private key is present.
fn read_private_key(path: &Path) -> Result<Vec<u8>, TlsError> {
    let pem = fs::read(path).map_err(|source| TlsError::KeyRead {
        path: path.to_path_buf(),
        source,
    })?;

    let key = rustls_pemfile::private_key(&mut pem.as_slice()).map_err(|_| TlsError::InvalidKey {
        path: path.to_path_buf(),
    })?;
    if key.is_none() {
        return Err(TlsError::InvalidKey {
            path: path.to_path_buf(),
        });
    }

    Ok(pem)
}

/// Read the trusted CA bundle. An empty or malformed bundle is fatal: it
/// would silently reject every client.
fn read_trusted_bundle(path: &Path) -> Result<Vec<u8>, TlsError> {
    let pem = fs::read(path).map_err(|source| TlsError::TrustedCertsRead {
        path: path.to_path_buf(),
        source,
    })?;

    let parsed = rustls_pemfile::certs(&mut pem.as_slice())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| TlsError::InvalidTrustedCerts {
            path: path.to_path_buf(),
        })?;
    if parsed.is_empty() {
        return Err(TlsError::InvalidTrustedCerts {
            path: path.to_path_buf(),
        });
    }

    Ok(pem)
}
