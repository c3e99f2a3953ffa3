//! HTTP front end of the emulator.
//!
//! Exposes [`Route53Backend`] under the Route53 REST paths of API version
//! `2013-04-01`, plus two control endpoints:
//!
//! - `POST /_dnsmock/reset` drops all state,
//! - `GET /_dnsmock/state` returns a JSON snapshot.
//!
//! # Example
//!
//! ```no_run
//! use dnsmock::config::EmulatorConfig;
//! use dnsmock::server::EmulatorServer;
//!
//! # async fn example() -> std::io::Result<()> {
//! let handle = EmulatorServer::spawn(EmulatorConfig::ephemeral()).await?;
//! println!("Route53 emulator listening on {}", handle.base_url());
//! handle.shutdown().await;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod middleware;

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::backend::{BackendError, Route53Backend};
use crate::config::EmulatorConfig;
use crate::model::API_VERSION;

pub use error::ApiError;
pub use middleware::{RequestId, REQUEST_ID_HEADER};

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    backend: Arc<Mutex<Route53Backend>>,
}

impl AppState {
    /// Wraps a backend.
    pub fn new(backend: Route53Backend) -> Self {
        Self {
            backend: Arc::new(Mutex::new(backend)),
        }
    }

    /// Runs one backend operation under the lock.
    pub fn with_backend<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&mut Route53Backend) -> Result<T, BackendError>,
    {
        let mut backend = self
            .backend
            .lock()
            .map_err(|_| ApiError::Internal("backend lock poisoned".to_string()))?;
        Ok(f(&mut backend)?)
    }
}

/// Builds the router over the given state.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/hostedzone",
            post(handlers::create_hosted_zone).get(handlers::list_hosted_zones),
        )
        .route(
            "/hostedzone/:id",
            get(handlers::get_hosted_zone).delete(handlers::delete_hosted_zone),
        )
        .route(
            "/hostedzone/:id/rrset",
            post(handlers::change_resource_record_sets).get(handlers::list_resource_record_sets),
        )
        .route(
            "/hostedzone/:id/rrset/",
            post(handlers::change_resource_record_sets).get(handlers::list_resource_record_sets),
        )
        .route("/hostedzonesbyname", get(handlers::list_hosted_zones_by_name))
        .route("/hostedzonecount", get(handlers::get_hosted_zone_count))
        .route("/change/:id", get(handlers::get_change))
        .route(
            "/healthcheck",
            post(handlers::create_health_check).get(handlers::list_health_checks),
        )
        .route(
            "/healthcheck/:id",
            get(handlers::get_health_check).delete(handlers::delete_health_check),
        );

    Router::new()
        .nest(&format!("/{}", API_VERSION), api)
        .route("/_dnsmock/reset", post(handlers::reset))
        .route("/_dnsmock/state", get(handlers::snapshot))
        .fallback(handlers::unknown_operation)
        .with_state(state)
        .layer(axum::middleware::from_fn(middleware::request_id))
        .layer(TraceLayer::new_for_http())
}

/// The emulator server.
pub struct EmulatorServer {
    config: EmulatorConfig,
    state: AppState,
}

impl EmulatorServer {
    /// Creates a server with an empty backend.
    pub fn new(config: EmulatorConfig) -> Self {
        let state = AppState::new(Route53Backend::with_config(config.backend_config()));
        Self { config, state }
    }

    /// Returns the shared state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Builds the router.
    pub fn router(&self) -> Router {
        router(self.state.clone())
    }

    /// Runs the server until Ctrl-C or SIGTERM.
    pub async fn run(self) -> Result<(), std::io::Error> {
        self.run_until(shutdown_signal()).await
    }

    /// Runs the server until `shutdown` completes.
    pub async fn run_until<F>(self, shutdown: F) -> Result<(), std::io::Error>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.config.bind_address).await?;
        self.serve(listener, shutdown).await
    }

    async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let app = self.router();
        info!(address = %listener.local_addr()?, "Route53 emulator listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Route53 emulator shut down");
        Ok(())
    }

    /// Binds the configured address and serves in a background task.
    ///
    /// Meant for test harnesses: bind port 0 and read the address back from
    /// the handle.
    pub async fn spawn(config: EmulatorConfig) -> Result<EmulatorHandle, std::io::Error> {
        let server = Self::new(config);
        let listener = TcpListener::bind(server.config.bind_address).await?;
        let local_addr = listener.local_addr()?;
        let state = server.state.clone();

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(server.serve(listener, async {
            let _ = shutdown_rx.await;
        }));

        Ok(EmulatorHandle {
            local_addr,
            state,
            shutdown_tx: Some(shutdown_tx),
            task,
        })
    }
}

/// A running emulator started by [`EmulatorServer::spawn`].
///
/// Dropping the handle stops the server as well, without waiting for it.
pub struct EmulatorHandle {
    local_addr: SocketAddr,
    state: AppState,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<Result<(), std::io::Error>>,
}

impl EmulatorHandle {
    /// Address the server is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// `http://<address>`, the endpoint to point clients at.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.local_addr)
    }

    /// Shared state, for inspecting or resetting the backend directly.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Stops the server and waits for in-flight requests to finish.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        let _ = (&mut self.task).await;
    }
}

impl Drop for EmulatorHandle {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Completes on Ctrl-C or, on Unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl-C, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}
