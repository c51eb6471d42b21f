//! Handler adaptation shim.
//!
//! Translates each inbound RPC call into a sink invocation and immediately
//! acknowledges with an empty success response. Sink failures are logged
//! and absorbed here; they must not propagate as RPC errors.

use std::sync::Arc;

use tonic::{Request, Response, Status};

use crate::rpc::proto::event_service_server::EventService;
use crate::rpc::proto::{AdminEventRequest, Empty, EventRequest};
use crate::rpc::sink::EventSink;

/// The service implementation registered with the gRPC server.
pub struct EventDispatcher {
    sink: Arc<dyn EventSink>,
}

impl EventDispatcher {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self { sink }
    }
}

#[tonic::async_trait]
impl EventService for EventDispatcher {
    async fn on_event(
        &self,
        request: Request<EventRequest>,
    ) -> Result<Response<Empty>, Status> {
        let event = request.into_inner().event.unwrap_or_default();
        if let Err(err) = self.sink.publish_event(event).await {
            tracing::warn!(reason = %err, "Event sink rejected event, acknowledging anyway");
        }
        Ok(Response::new(Empty {}))
    }

    async fn on_admin_event(
        &self,
        request: Request<AdminEventRequest>,
    ) -> Result<Response<Empty>, Status> {
        let event = request.into_inner().admin_event.unwrap_or_default();
        if let Err(err) = self.sink.publish_admin_event(event).await {
            tracing::warn!(reason = %err, "Event sink rejected admin event, acknowledging anyway");
        }
        Ok(Response::new(Empty {}))
    }
}
