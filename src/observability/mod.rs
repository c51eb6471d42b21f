//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!
//! Consumers:
//!     → stdout, pretty format for development
//!     → stdout, JSON for machine parsing in production
//! ```
//!
//! # Design Decisions
//! - The core emits events at every state transition; formatting and
//!   destination are owned here, not by the core
//! - Level filter comes from config, overridable via RUST_LOG

pub mod logging;
