use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post, put};
use axum::Router;
use tracing::info;

use crate::server::constants::MAX_UPLOAD_BYTES;
use crate::server::routes;
use crate::server::state::AppState;

pub async fn serve(state: Arc<AppState>) -> anyhow::Result<()> {
    let addr = state.config.server.address.clone();
    let app = api_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("starting server on: {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn api_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/api/resources",
            post(routes::resources::create).get(routes::resources::list),
        )
        .route(
            "/api/resources/:id",
            get(routes::resources::get_one)
                .put(routes::resources::update)
                .delete(routes::resources::remove),
        )
        .route(
            "/api/categories",
            post(routes::categories::create).get(routes::categories::list),
        )
        .route(
            "/api/categories/:id",
            get(routes::categories::get_one)
                .put(routes::categories::update)
                .delete(routes::categories::remove),
        )
        .route(
            "/api/support",
            post(routes::support::create).get(routes::support::list),
        )
        .route(
            "/api/support/:id",
            get(routes::support::get_one).delete(routes::support::remove),
        )
        .route("/api/support/:id/close", put(routes::support::close))
        .route(
            "/api/leads",
            post(routes::leads::create).get(routes::leads::list),
        )
        .route("/api/leads/:id", delete(routes::leads::remove))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
