//! Event Collector
//!
//! A TLS-capable gRPC event listener built with Tokio and Tonic. Inbound
//! events are acknowledged unconditionally and handed to a sink
//! collaborator; the interesting part is the listener lifecycle.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │                EVENT COLLECTOR                │
//!                      │                                               │
//!    OnEvent /         │  ┌─────────┐   ┌───────────┐   ┌──────────┐  │
//!    OnAdminEvent ─────┼─▶│   net   │──▶│    rpc    │──▶│   rpc    │  │
//!                      │  │  (TLS)  │   │dispatcher │   │   sink   │  │
//!                      │  └─────────┘   └───────────┘   └──────────┘  │
//!                      │       ▲                                      │
//!                      │       │ owns bind / serve / drain            │
//!                      │  ┌────┴──────────────────────────────────┐   │
//!                      │  │              lifecycle                 │   │
//!                      │  │  Idle → Starting → Running → Stopping  │   │
//!                      │  │         → Stopped   (or → Failed)      │   │
//!                      │  │  signals: ready / failed / stopped     │   │
//!                      │  └───────────────────────────────────────┘   │
//!                      │                                               │
//!                      │  ┌───────────────────────────────────────┐   │
//!                      │  │         Cross-Cutting Concerns         │   │
//!                      │  │   ┌────────┐      ┌───────────────┐    │   │
//!                      │  │   │ config │      │ observability │    │   │
//!                      │  │   └────────┘      └───────────────┘    │   │
//!                      │  └───────────────────────────────────────┘   │
//!                      └──────────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod config;
pub mod lifecycle;
pub mod net;
pub mod rpc;

// Cross-cutting concerns
pub mod observability;
