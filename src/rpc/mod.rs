//! RPC subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound unary call (OnEvent / OnAdminEvent)
//!     → generated service trait (proto bindings)
//!     → dispatcher.rs (adaptation shim)
//!     → sink.rs (event sink collaborator)
//!     → empty success response, unconditionally
//! ```
//!
//! # Design Decisions
//! - The wire schema is externally owned; bindings are generated, never
//!   edited
//! - The shim absorbs sink failures: callers always get an empty success
//! - No validation, retry, or backpressure at this boundary

pub mod dispatcher;
pub mod sink;

/// Generated bindings for the externally owned wire contract.
pub mod proto {
    tonic::include_proto!("eventcollector.v1");
}

pub use dispatcher::EventDispatcher;
