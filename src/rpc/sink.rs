//! Event sink collaborator.
//!
//! The sink consumes decoded event payloads without influencing RPC
//! response semantics. The deployment default logs each payload; tests and
//! future deployments swap in other implementations.

use thiserror::Error;

use crate::rpc::proto::{AdminEvent, Event};

/// Error a sink may report. The dispatcher logs and absorbs it; it never
/// reaches the RPC caller.
#[derive(Debug, Error)]
#[error("event sink rejected the payload: {reason}")]
pub struct SinkError {
    reason: String,
}

impl SinkError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Consumer of decoded event payloads.
///
/// Implementations must be safe to invoke concurrently; the RPC runtime
/// dispatches each call on its own task.
#[tonic::async_trait]
pub trait EventSink: Send + Sync {
    async fn publish_event(&self, event: Event) -> Result<(), SinkError>;

    async fn publish_admin_event(&self, event: AdminEvent) -> Result<(), SinkError>;
}

/// Sink that writes every payload to the structured log.
#[derive(Debug, Default)]
pub struct LoggingEventSink;

#[tonic::async_trait]
impl EventSink for LoggingEventSink {
    async fn publish_event(&self, event: Event) -> Result<(), SinkError> {
        tracing::info!(
            id = %event.id,
            event_type = %event.event_type,
            realm_id = %event.realm_id,
            client_id = %event.client_id,
            user_id = %event.user_id,
            ip_address = %event.ip_address,
            "OnEvent"
        );
        Ok(())
    }

    async fn publish_admin_event(&self, event: AdminEvent) -> Result<(), SinkError> {
        tracing::info!(
            id = %event.id,
            realm_id = %event.realm_id,
            operation_type = %event.operation_type,
            resource_type = %event.resource_type,
            resource_path = %event.resource_path,
            "OnAdminEvent"
        );
        Ok(())
    }
}
