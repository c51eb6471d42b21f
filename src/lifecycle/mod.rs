//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! start():
//!     Idle → Starting
//!     → materialize TLS (net::tls)
//!     → bind TCP listener
//!     → spawn gRPC serve task
//!     → Starting → Running, `ready` fires
//!     any fatal error → Failed, `failed` fires with a captured reason
//!
//! stop():
//!     Running → Stopping
//!     → signal the serve task, wait for the in-flight drain
//!     → drain finished within the graceful window: clean close
//!     → window elapsed: forced abort
//!     → Stopping → Stopped, `stopped` fires (either way)
//! ```
//!
//! # Design Decisions
//! - `Running` is declared only once the socket is provably bound and the
//!   serve task launched; there is no startup grace timer to race against
//! - The state mutex covers transition bookkeeping only, never bind, TLS
//!   loading, or the drain wait
//! - Double start and stop-when-not-running are warn-level no-ops
//! - Signals are one-shot and multi-waiter safe (signal.rs)

pub mod signal;
pub mod state;

pub use signal::StateSignal;
pub use state::LifecycleState;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;

use crate::config::ServerConfig;
use crate::net::tls::{self, TlsError};
use crate::rpc::proto::event_service_server::EventServiceServer;
use crate::rpc::sink::EventSink;
use crate::rpc::EventDispatcher;

/// Fatal lifecycle errors. Each is reported exactly once via the `failed`
/// signal; none are retried.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("failed to bind TCP listener on {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    #[error(transparent)]
    Tls(#[from] TlsError),

    #[error("failed to install TLS context: {0}")]
    TlsContext(tonic::transport::Error),

    #[error("gRPC serve loop terminated: {0}")]
    Serve(tonic::transport::Error),
}

/// Handle to the spawned serve task, consumed by `stop`.
struct ServeHandle {
    shutdown_tx: oneshot::Sender<()>,
    join: JoinHandle<()>,
}

/// Owns the full state transition of the gRPC listener: bind, TLS setup,
/// service registration, accept loop, readiness signaling, and two-phase
/// shutdown.
pub struct ServiceLifecycle {
    inner: Arc<Inner>,
    serve: Mutex<Option<ServeHandle>>,
}

struct Inner {
    config: ServerConfig,
    sink: Arc<dyn EventSink>,
    state: Mutex<LifecycleState>,
    ready: StateSignal,
    failed: StateSignal,
    stopped: StateSignal,
    failure: OnceLock<LifecycleError>,
    stop_requested: AtomicBool,
}

impl ServiceLifecycle {
    /// Create an idle lifecycle. `config` is taken by value and never
    /// mutated; `sink` receives every decoded event payload.
    pub fn new(config: ServerConfig, sink: Arc<dyn EventSink>) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                sink,
                state: Mutex::new(LifecycleState::Idle),
                ready: StateSignal::new(),
                failed: StateSignal::new(),
                stopped: StateSignal::new(),
                failure: OnceLock::new(),
                stop_requested: AtomicBool::new(false),
            }),
            serve: Mutex::new(None),
        }
    }

    /// Start the server: bind, install TLS, register the service, and launch
    /// the accept loop.
    ///
    /// Returns once the server is `Running` or `Failed`; observe which via
    /// [`ready`](Self::ready) and [`failed`](Self::failed). Calling `start`
    /// in any state other than `Idle` is a logged no-op.
    pub async fn start(&self) {
        {
            let mut state = self.inner.state.lock().unwrap();
            if *state != LifecycleState::Idle {
                tracing::warn!(state = %state, "Server was already started, can't start twice");
                return;
            }
            *state = LifecycleState::Starting;
        }

        let config = &self.inner.config;
        tracing::info!(bind_host_port = %config.bind_host_port, "Starting server");

        let tls_policy = match tls::materialize(config) {
            Ok(policy) => policy,
            Err(err) => {
                self.inner.fail(LifecycleError::Tls(err));
                return;
            }
        };

        let listener = match TcpListener::bind(config.bind_host_port.as_str()).await {
            Ok(listener) => listener,
            Err(source) => {
                self.inner.fail(LifecycleError::Bind {
                    addr: config.bind_host_port.clone(),
                    source,
                });
                return;
            }
        };
        tracing::info!(bind_host_port = %config.bind_host_port, "TCP listener created");

        let mut server = Server::builder();
        if let Some(tls) = tls_policy {
            server = match server.tls_config(tls) {
                Ok(server) => server,
                Err(err) => {
                    self.inner.fail(LifecycleError::TlsContext(err));
                    return;
                }
            };
        }

        let dispatcher = EventDispatcher::new(Arc::clone(&self.inner.sink));
        let router = server.add_service(EventServiceServer::new(dispatcher));

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let incoming = TcpListenerStream::new(listener);
        let inner = Arc::clone(&self.inner);
        let join = tokio::spawn(async move {
            let served = router
                .serve_with_incoming_shutdown(incoming, async {
                    let _ = shutdown_rx.await;
                })
                .await;

            if let Err(err) = served {
                if inner.stop_requested.load(Ordering::SeqCst) {
                    tracing::debug!(reason = %err, "Serve loop error during deliberate stop");
                } else {
                    inner.fail(LifecycleError::Serve(err));
                }
            }
        });

        *self.serve.lock().unwrap() = Some(ServeHandle { shutdown_tx, join });

        // The serve task may have faulted between spawn and here; only
        // declare Running if nothing moved the state off Starting.
        let became_running = {
            let mut state = self.inner.state.lock().unwrap();
            if *state == LifecycleState::Starting {
                *state = LifecycleState::Running;
                true
            } else {
                false
            }
        };
        if became_running {
            tracing::info!("gRPC server running");
            self.inner.ready.fire();
        }
    }

    /// Stop the server: drain in-flight calls within the configured graceful
    /// window, then force closure if the window elapses.
    ///
    /// Blocks the calling task until the drain-or-force decision resolves
    /// and `stopped` has fired. Calling `stop` when the server is not
    /// `Running` is a logged no-op.
    pub async fn stop(&self) {
        {
            let mut state = self.inner.state.lock().unwrap();
            if *state != LifecycleState::Running {
                tracing::warn!(state = %state, "Server not running");
                return;
            }
            *state = LifecycleState::Stopping;
        }

        self.inner.stop_requested.store(true, Ordering::SeqCst);

        // Take the handle out before waiting so the lock is never held
        // across the drain.
        let handle = self.serve.lock().unwrap().take();
        if let Some(ServeHandle { shutdown_tx, mut join }) = handle {
            tracing::info!("Attempting graceful stop");
            let _ = shutdown_tx.send(());

            let window = self.inner.config.graceful_stop_timeout();
            match tokio::time::timeout(window, &mut join).await {
                Ok(Ok(())) => {
                    tracing::info!("Stopped gracefully");
                }
                Ok(Err(err)) => {
                    tracing::error!(reason = %err, "Serve task terminated abnormally");
                }
                Err(_) => {
                    tracing::warn!(
                        timeout_millis = self.inner.config.graceful_stop_timeout_millis,
                        "Failed to stop gracefully within timeout, forceful stop"
                    );
                    join.abort();
                    let _ = join.await;
                }
            }
        }

        {
            let mut state = self.inner.state.lock().unwrap();
            *state = LifecycleState::Stopped;
        }
        tracing::info!("Stopped");
        self.inner.stopped.fire();
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LifecycleState {
        *self.inner.state.lock().unwrap()
    }

    /// Signal that fires when the server is ready to serve client requests.
    pub fn ready(&self) -> &StateSignal {
        &self.inner.ready
    }

    /// Signal that fires when the server has failed.
    pub fn failed(&self) -> &StateSignal {
        &self.inner.failed
    }

    /// Signal that fires when the server has stopped.
    pub fn stopped(&self) -> &StateSignal {
        &self.inner.stopped
    }

    /// The error that moved the lifecycle to `Failed`, if any. Set before
    /// `failed` fires and immutable thereafter.
    pub fn failure_reason(&self) -> Option<&LifecycleError> {
        self.inner.failure.get()
    }
}

impl Inner {
    /// Record a fatal error and move to `Failed`. The reason is stored
    /// before the signal fires so observers always see it.
    fn fail(&self, err: LifecycleError) {
        let transitioned = {
            let mut state = self.state.lock().unwrap();
            match *state {
                LifecycleState::Starting | LifecycleState::Running => {
                    *state = LifecycleState::Failed;
                    true
                }
                _ => false,
            }
        };
        if !transitioned {
            tracing::debug!(reason = %err, "Ignoring failure in terminal state");
            return;
        }

        tracing::error!(reason = %err, "Server failed");
        let _ = self.failure.set(err);
        self.failed.fire();
    }
}
