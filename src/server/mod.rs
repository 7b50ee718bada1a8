//! HTTP surface over a [`RemoteListStore`].
//!
//! `valuerank serve` exposes the document store so other clients (and
//! [`HttpListStore`](crate::remote::HttpListStore)) can save and load lists.

pub mod error;
pub mod routes;

use crate::remote::RemoteListStore;
use axum::Router;
use axum::routing::get;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RemoteListStore>,
}

/// Build the router with all routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(store: Arc<dyn RemoteListStore>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health))
        .route("/lists", get(routes::list_lists).post(routes::save_list))
        .route(
            "/lists/{list_id}",
            get(routes::get_list).delete(routes::delete_list),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(AppState { store })
}

pub async fn serve(store: Arc<dyn RemoteListStore>, port: u16) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    serve_on(store, listener).await
}

/// Serves on a pre-bound listener, so callers can bind port 0 and read the
/// actual port first.
pub async fn serve_on(
    store: Arc<dyn RemoteListStore>,
    listener: tokio::net::TcpListener,
) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app = build_router(store);

    tracing::info!("valuerank server listening on http://localhost:{actual_port}");

    axum::serve(listener, app).await?;
    Ok(())
}
