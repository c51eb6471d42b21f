//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! CLI flags / environment / optional TOML file
//!     → loader.rs (parse & merge, precedence: flags > env > file > defaults)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → moved by value into the lifecycle constructor
//! ```
//!
//! # Design Decisions
//! - Config is built exactly once and passed by ownership; no global
//!   mutable state shared between the CLI layer and the server
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde/clap) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::AppConfig;
pub use schema::LogConfig;
pub use schema::ServerConfig;
