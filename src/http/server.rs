//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the forward and health handlers
//! - Wire up middleware (request ID, tracing, optional timeout)
//! - Apply config updates to the running forwarder
//! - Serve until the shutdown signal fires

use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::validation::HEALTH_PATH;
use crate::config::ServiceConfig;
use crate::forward::{ForwardSettings, Forwarder, TransportError};
use crate::http::request::{make_request_span, propagate_request_id_layer, set_request_id_layer};
use crate::http::response::HealthStatus;
use crate::lifecycle::shutdown;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub forwarder: Arc<Forwarder>,
}

/// HTTP server exposing the forward endpoint.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
    forwarder: Arc<Forwarder>,
}

impl HttpServer {
    /// Create a server forwarding through the production reqwest transport.
    pub fn new(config: ServiceConfig) -> Result<Self, TransportError> {
        let forwarder = Arc::new(Forwarder::from_config(&config)?);
        Ok(Self::with_forwarder(config, forwarder))
    }

    /// Create a server around an existing forwarder.
    pub fn with_forwarder(config: ServiceConfig, forwarder: Arc<Forwarder>) -> Self {
        let state = AppState {
            forwarder: forwarder.clone(),
        };
        let router = Self::build_router(&config, state);
        Self {
            router,
            config,
            forwarder,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        let mut router = Router::new()
            .route(&config.endpoint.path, get(send_file_handler))
            .route(HEALTH_PATH, get(health_handler))
            .with_state(state);

        if let Some(secs) = config.timeouts.request_secs {
            router = router.layer(TimeoutLayer::new(Duration::from_secs(secs)));
        }

        router.layer(
            ServiceBuilder::new()
                .layer(set_request_id_layer())
                .layer(TraceLayer::new_for_http().make_span_with(make_request_span::<axum::body::Body>))
                .layer(propagate_request_id_layer()),
        )
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Config updates arriving on `config_updates` are applied to the
    /// forwarder until the channel closes or shutdown fires.
    pub async fn run(
        self,
        listener: TcpListener,
        config_updates: mpsc::UnboundedReceiver<ServiceConfig>,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            endpoint = %self.config.endpoint.path,
            upstream = %self.config.upstream.url,
            "HTTP server starting"
        );

        tokio::spawn(apply_config_updates(
            self.config.clone(),
            self.forwarder.clone(),
            config_updates,
            shutdown.resubscribe(),
        ));

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Router with all handlers and middleware, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

/// Forward the configured file and relay the upstream answer.
async fn send_file_handler(State(state): State<AppState>) -> impl IntoResponse {
    state.forwarder.forward().await
}

async fn health_handler() -> Json<HealthStatus> {
    Json(HealthStatus::ok())
}

async fn apply_config_updates(
    startup_config: ServiceConfig,
    forwarder: Arc<Forwarder>,
    mut config_updates: mpsc::UnboundedReceiver<ServiceConfig>,
    mut shutdown: broadcast::Receiver<()>,
) {
    loop {
        tokio::select! {
            update = config_updates.recv() => match update {
                Some(config) => {
                    warn_on_restart_only_changes(&startup_config, &config);
                    forwarder.reload(ForwardSettings::from_config(&config));
                }
                None => break,
            },
            _ = shutdown.recv() => break,
        }
    }
}

fn warn_on_restart_only_changes(current: &ServiceConfig, new: &ServiceConfig) {
    if current.listener != new.listener
        || current.endpoint != new.endpoint
        || current.timeouts != new.timeouts
        || current.observability != new.observability
        || current.upstream.timeout_secs != new.upstream.timeout_secs
    {
        tracing::warn!("Listener, endpoint, timeout and observability changes take effect after a restart");
    }
}
