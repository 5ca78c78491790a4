use axum::{
    routing::{get, post},
    Router,
};

use crate::backend::{handlers, AppState};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login))
}

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/couples",
            post(handlers::couples::create_couple).get(handlers::couples::get_couple),
        )
        .route(
            "/api/expenses",
            post(handlers::expenses::create_expense).get(handlers::expenses::list_expenses),
        )
        .route(
            "/api/expenses/:id",
            get(handlers::expenses::get_expense)
                .put(handlers::expenses::update_expense)
                .delete(handlers::expenses::delete_expense),
        )
        .route(
            "/api/settlements/calculate",
            post(handlers::settlements::calculate),
        )
        .route(
            "/api/settlements/confirm",
            post(handlers::settlements::confirm),
        )
        .route("/api/settlements", get(handlers::settlements::list))
        .route("/api/settlements/:id", get(handlers::settlements::get_by_id))
}
