//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! ServerConfig
//!     → tls.rs (load certificate / key / trust material)
//!     → Option<ServerTlsConfig> transport policy
//!     → installed on the gRPC server by the lifecycle
//! ```
//!
//! # Design Decisions
//! - TLS material is read exactly once, at start time
//! - PEM contents are preflight-parsed so bad files fail construction,
//!   not the first handshake
//! - A missing policy (plaintext) is explicit, and logged as unsafe

pub mod tls;
