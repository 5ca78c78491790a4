mod auth;
mod handlers;
mod routes;

use std::sync::Arc;

use axum::{middleware, routing::get, Router};
use sqlx::{Pool, Sqlite};
use tokio::net::TcpListener;

use crate::config::Config;

pub use auth::AuthUser;

#[derive(Clone)]
pub struct AppState {
    pub db: Pool<Sqlite>,
    pub config: Arc<Config>,
}

pub fn app(pool: Pool<Sqlite>, config: Arc<Config>) -> Router {
    let state = AppState {
        db: pool,
        config,
    };

    let protected = routes::api_routes().route_layer(middleware::from_fn_with_state(
        state.clone(),
        auth::require_auth,
    ));

    Router::new()
        .route("/health", get(|| async { "Backend is running" }))
        .merge(routes::auth_routes())
        .merge(protected)
        .with_state(state)
}

pub async fn run_server(pool: Pool<Sqlite>, config: Arc<Config>) -> anyhow::Result<()> {
    let addr = config.bind_addr.clone();
    let router = app(pool, config);

    tracing::info!(%addr, "server listening");
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
