//! Shared utilities for lifecycle and RPC integration tests.

use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use tempfile::TempDir;
use tonic::transport::{Certificate, Channel, ClientTlsConfig, Identity};

use event_collector::config::ServerConfig;
use event_collector::rpc::proto::event_service_client::EventServiceClient;
use event_collector::rpc::proto::{AdminEvent, Event, EventRequest};
use event_collector::rpc::sink::{EventSink, SinkError};

/// Config for a plaintext server with a short stop window, suitable for
/// fast tests.
pub fn plaintext_config(addr: &str) -> ServerConfig {
    ServerConfig {
        bind_host_port: addr.to_string(),
        no_tls: true,
        graceful_stop_timeout_millis: 200,
        ..ServerConfig::default()
    }
}

/// On-disk PKI for TLS tests: one CA that signs a "localhost" server
/// identity and one client identity.
#[allow(dead_code)]
pub struct TestPki {
    _dir: TempDir,
    pub ca_path: PathBuf,
    pub server_cert_path: PathBuf,
    pub server_key_path: PathBuf,
    pub ca_pem: String,
    pub client_cert_pem: String,
    pub client_key_pem: String,
}

#[allow(dead_code)]
pub fn generate_pki() -> TestPki {
    use rcgen::{BasicConstraints, CertificateParams, DistinguishedName, DnType, IsCa, KeyPair};

    let ca_key = KeyPair::generate().unwrap();
    let mut ca_params = CertificateParams::default();
    ca_params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    let mut dn = DistinguishedName::new();
    dn.push(DnType::CommonName, "event-collector test ca");
    ca_params.distinguished_name = dn;
    let ca_cert = ca_params.self_signed(&ca_key).unwrap();

    let server_key = KeyPair::generate().unwrap();
    let server_cert = CertificateParams::new(vec!["localhost".to_string()])
        .unwrap()
        .signed_by(&server_key, &ca_cert, &ca_key)
        .unwrap();

    let client_key = KeyPair::generate().unwrap();
    let client_cert = CertificateParams::new(vec!["event-client".to_string()])
        .unwrap()
        .signed_by(&client_key, &ca_cert, &ca_key)
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let ca_path = dir.path().join("ca.pem");
    let server_cert_path = dir.path().join("server.pem");
    let server_key_path = dir.path().join("server.key");
    std::fs::write(&ca_path, ca_cert.pem()).unwrap();
    std::fs::write(&server_cert_path, server_cert.pem()).unwrap();
    std::fs::write(&server_key_path, server_key.serialize_pem()).unwrap();

    TestPki {
        _dir: dir,
        ca_path,
        server_cert_path,
        server_key_path,
        ca_pem: ca_cert.pem(),
        client_cert_pem: client_cert.pem(),
        client_key_pem: client_key.serialize_pem(),
    }
}

impl TestPki {
    /// Server config using this PKI's server identity, without client
    /// verification.
    #[allow(dead_code)]
    pub fn server_config(&self, addr: &str) -> ServerConfig {
        ServerConfig {
            bind_host_port: addr.to_string(),
            no_tls: false,
            tls_cert_file_path: Some(self.server_cert_path.clone()),
            tls_key_file_path: Some(self.server_key_path.clone()),
            graceful_stop_timeout_millis: 200,
            ..ServerConfig::default()
        }
    }

    /// Server config that additionally requires client certificates signed
    /// by this PKI's CA (mutual TLS).
    #[allow(dead_code)]
    pub fn mutual_tls_config(&self, addr: &str) -> ServerConfig {
        let mut config = self.server_config(addr);
        config.tls_trusted_certs_file_path = Some(self.ca_path.clone());
        config
    }
}

/// Connect a plaintext client to a running server.
#[allow(dead_code)]
pub async fn plaintext_client(addr: &str) -> EventServiceClient<Channel> {
    EventServiceClient::connect(format!("http://{}", addr))
        .await
        .expect("plaintext connect failed")
}

/// Connect a TLS client, optionally presenting the PKI's client identity.
///
/// With client verification on the server and no identity here, the failure
/// may surface at connect time or on the first call, depending on when the
/// server's rejection alert lands.
#[allow(dead_code)]
pub async fn tls_client(
    addr: &str,
    pki: &TestPki,
    with_identity: bool,
) -> Result<EventServiceClient<Channel>, tonic::transport::Error> {
    let mut tls = ClientTlsConfig::new()
        .ca_certificate(Certificate::from_pem(&pki.ca_pem))
        .domain_name("localhost");
    if with_identity {
        tls = tls.identity(Identity::from_pem(&pki.client_cert_pem, &pki.client_key_pem));
    }

    let channel = Channel::from_shared(format!("https://{}", addr))
        .expect("invalid test uri")
        .tls_config(tls)?
        .connect()
        .await?;
    Ok(EventServiceClient::new(channel))
}

/// A minimal event request with the given id.
#[allow(dead_code)]
pub fn sample_event(id: &str) -> EventRequest {
    EventRequest {
        event: Some(Event {
            id: id.to_string(),
            event_type: "LOGIN".to_string(),
            realm_id: "test-realm".to_string(),
            ..Default::default()
        }),
    }
}

/// Sink that records every payload it receives.
#[derive(Debug, Default)]
#[allow(dead_code)]
pub struct RecordingSink {
    pub events: Mutex<Vec<Event>>,
    pub admin_events: Mutex<Vec<AdminEvent>>,
}

#[tonic::async_trait]
impl EventSink for RecordingSink {
    async fn publish_event(&self, event: Event) -> Result<(), SinkError> {
        self.events.lock().unwrap().push(event);
        Ok(())
    }

    async fn publish_admin_event(&self, event: AdminEvent) -> Result<(), SinkError> {
        self.admin_events.lock().unwrap().push(event);
        Ok(())
    }
}

/// Sink that holds every call for `delay`, to keep requests in flight.
#[derive(Debug)]
#[allow(dead_code)]
pub struct SlowSink {
    pub delay: Duration,
}

#[tonic::async_trait]
impl EventSink for SlowSink {
    async fn publish_event(&self, _event: Event) -> Result<(), SinkError> {
        tokio::time::sleep(self.delay).await;
        Ok(())
    }

    async fn publish_admin_event(&self, _event: AdminEvent) -> Result<(), SinkError> {
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}

/// Sink that rejects every payload.
#[derive(Debug, Default)]
#[allow(dead_code)]
pub struct FailingSink;

#[tonic::async_trait]
impl EventSink for FailingSink {
    async fn publish_event(&self, _event: Event) -> Result<(), SinkError> {
        Err(SinkError::new("sink offline"))
    }

    async fn publish_admin_event(&self, _event: AdminEvent) -> Result<(), SinkError> {
        Err(SinkError::new("sink offline"))
    }
}
