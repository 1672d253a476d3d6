//! Router assembly and server lifecycle.

use crate::handlers;
use crate::store::TaskStore;
use anyhow::{Context, Result};
use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use log::{info, warn};
use std::future::Future;
use std::net::SocketAddr;
use std::time::Instant;
use taskboard_core::ServerConfig;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

/// Builds the application router over an injected store.
pub fn router(store: TaskStore) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::root))
        .route(
            "/api/tasks",
            get(handlers::list_tasks).post(handlers::create_task),
        )
        .route(
            "/api/tasks/{id}",
            get(handlers::get_task)
                .put(handlers::update_task)
                .delete(handlers::delete_task),
        )
        .layer(middleware::from_fn(log_requests))
        .layer(cors)
        .with_state(store)
}

/// Task store HTTP server.
pub struct TaskServer;

impl TaskServer {
    /// Opens the configured database, binds `0.0.0.0:<port>` and serves
    /// until Ctrl+C.
    pub async fn start(config: &ServerConfig) -> Result<()> {
        let store = TaskStore::open(&config.database)
            .with_context(|| format!("failed to open database `{}`", config.database))?;

        let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;

        Self::serve(listener, store, shutdown_signal()).await
    }

    /// Serves on an already bound listener until `shutdown` resolves.
    pub async fn serve(
        listener: TcpListener,
        store: TaskStore,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<()> {
        let addr = listener.local_addr()?;
        info!("event=server_start module=server status=ok addr={addr}");

        axum::serve(listener, router(store))
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("event=server_stop module=server status=ok addr={addr}");
        Ok(())
    }
}

async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started_at = Instant::now();

    let response = next.run(request).await;

    info!(
        "event=http_request module=server status={} method={} path={} duration_ms={}",
        response.status().as_u16(),
        method,
        path,
        started_at.elapsed().as_millis()
    );
    response
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("event=signal_listen module=server status=error error={err}");
        std::future::pending::<()>().await;
    }
}
