//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Compile the resource registry into the application router
//! - Mount the route listing endpoint
//! - Wire up middleware (tracing, timeout, request ID)
//! - Serve on a listener until shutdown

use std::time::Duration;

use axum::{body::Body, http::Request, Router};
use tokio::net::TcpListener;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::http::introspection::routes_router;
use crate::http::request::{RequestIdExt, UuidRequestId};
use crate::lifecycle::ShutdownSignal;
use crate::lifecycle::signals;
use crate::resource::Resources;

/// HTTP server for a resource-routed application.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Compile `resources` with `state` and wrap it in the server middleware.
    pub fn new<S>(config: ServerConfig, resources: Resources<S>, state: S) -> Self
    where
        S: Clone + Send + Sync + 'static,
    {
        let routes = resources.routes();
        let mut app = resources.into_router().with_state(state);

        if config.introspection.enabled {
            app = app.merge(routes_router(&config.introspection.path, routes));
        }

        let router = Self::build_router(&config, app);
        Self { router, config }
    }

    /// Add middleware layers around the application router.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, app: Router) -> Router {
        app.layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request.request_id().unwrap_or("unknown"),
                )
            }))
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Serve on `listener` until Ctrl+C or `shutdown` fires.
    pub async fn run(self, listener: TcpListener, mut shutdown: ShutdownSignal) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = signals::ctrl_c() => {}
                    _ = shutdown.wait() => {}
                }
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
