//! Event collector binary.
//!
//! Thin CLI shell around the library: parse flags and environment, merge
//! with the optional config file, initialize logging, then drive the
//! service lifecycle until a shutdown signal arrives.

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};

use event_collector::config::loader::{load_config, ConfigOverrides};
use event_collector::lifecycle::ServiceLifecycle;
use event_collector::observability::logging::init_logging;
use event_collector::rpc::sink::LoggingEventSink;

#[derive(Parser)]
#[command(name = "event-collector")]
#[command(about = "gRPC event listener service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Start(StartArgs),
}

#[derive(Args)]
struct StartArgs {
    /// Optional TOML config file; flags and environment win over its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Bind host port for the server
    #[arg(long, env = "BIND_HOST_PORT")]
    bind_host_port: Option<String>,

    /// When set, server does not use TLS
    #[arg(long, env = "NO_TLS")]
    no_tls: bool,

    /// TLS certificate file path
    #[arg(long, env = "TLS_CERT_FILE_PATH")]
    tls_cert_file_path: Option<PathBuf>,

    /// TLS key file path
    #[arg(long, env = "TLS_KEY_FILE_PATH")]
    tls_key_file_path: Option<PathBuf>,

    /// TLS trusted certificate file path; enables client verification
    #[arg(long, env = "TLS_TRUSTED_CERT_FILE_PATH")]
    tls_trusted_cert_file_path: Option<PathBuf>,

    /// How long to wait for graceful stop of the service
    #[arg(long, env = "TIMEOUT_GRACEFUL_STOP_MILLIS")]
    timeout_graceful_stop_millis: Option<u64>,

    /// Log level
    #[arg(long, env = "LOG_LEVEL")]
    log_level: Option<String>,

    /// Log output as JSON
    #[arg(long, env = "LOG_JSON")]
    log_json: bool,

    /// Log with colors enabled
    #[arg(long, env = "LOG_COLOR")]
    log_color: bool,
}

impl StartArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            bind_host_port: self.bind_host_port.clone(),
            no_tls: self.no_tls.then_some(true),
            tls_cert_file_path: self.tls_cert_file_path.clone(),
            tls_key_file_path: self.tls_key_file_path.clone(),
            tls_trusted_certs_file_path: self.tls_trusted_cert_file_path.clone(),
            graceful_stop_timeout_millis: self.timeout_graceful_stop_millis,
            log_level: self.log_level.clone(),
            log_json: self.log_json.then_some(true),
            log_color: self.log_color.then_some(true),
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    match cli.command {
        Commands::Start(args) => start(args).await,
    }
}

async fn start(args: StartArgs) {
    let config = match load_config(args.config.as_deref(), args.overrides()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Configuration error: {}", err);
            process::exit(1);
        }
    };

    init_logging(&config.log);
    tracing::info!("Starting server");

    let lifecycle = ServiceLifecycle::new(config.server, Arc::new(LoggingEventSink));
    lifecycle.start().await;

    tokio::select! {
        _ = lifecycle.ready().wait() => {}
        _ = lifecycle.failed().wait() => {
            if let Some(reason) = lifecycle.failure_reason() {
                tracing::error!(reason = %reason, "Server failed to start");
            }
            process::exit(1);
        }
    }

    tracing::info!("Server running");

    tokio::select! {
        _ = wait_for_stop() => {}
        _ = lifecycle.failed().wait() => {
            if let Some(reason) = lifecycle.failure_reason() {
                tracing::error!(reason = %reason, "Server failed while running");
            }
            process::exit(1);
        }
    }

    tracing::info!("Stopping server");
    lifecycle.stop().await;
    lifecycle.stopped().wait().await;

    tracing::info!("All done, bye");
}

/// Wait for a shutdown signal (Ctrl+C or SIGTERM).
async fn wait_for_stop() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    tracing::info!("Shutdown signal received");
}
