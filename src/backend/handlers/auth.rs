// src/backend/handlers/auth.rs
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::backend::{auth, AppState};
use crate::database::db::queries;
use crate::database::models::User;
use crate::error::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    if req.email.trim().is_empty() || !req.email.contains('@') {
        return Err(AppError::Validation("a valid email is required".into()));
    }
    if req.password.len() < 8 {
        return Err(AppError::Validation(
            "password must be at least 8 characters".into(),
        ));
    }
    if req.name.trim().is_empty() {
        return Err(AppError::Validation("name is required".into()));
    }

    if queries::find_user_by_email(&state.db, &req.email).await?.is_some() {
        return Err(AppError::Conflict("email already registered".into()));
    }

    let password_hash = auth::hash_password(&req.password)?;
    let user = queries::create_user(&state.db, &req.email, &req.name, &password_hash).await?;
    let token = auth::issue_token(&state.config.jwt_secret, user.user_id, &user.email)?;

    tracing::info!(user_id = user.user_id, "registered new user");
    Ok((StatusCode::CREATED, Json(AuthResponse { token, user })))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    // Same error for unknown email and wrong password.
    let user = queries::find_user_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| AppError::Auth("invalid credentials".into()))?;

    if !auth::verify_password(&req.password, &user.password_hash) {
        return Err(AppError::Auth("invalid credentials".into()));
    }

    let token = auth::issue_token(&state.config.jwt_secret, user.user_id, &user.email)?;
    Ok(Json(AuthResponse { token, user }))
}
