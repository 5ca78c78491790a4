// src/backend/handlers/couples.rs
use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::Deserialize;

use crate::backend::{AppState, AuthUser};
use crate::database::db::queries;
use crate::database::models::Couple;
use crate::error::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct CreateCoupleRequest {
    /// Email of the partner to pair up with. Both users must already exist
    /// and neither may already belong to a couple.
    pub partner_email: String,
}

pub async fn create_couple(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<CreateCoupleRequest>,
) -> AppResult<(StatusCode, Json<Couple>)> {
    let partner = queries::find_user_by_email(&state.db, &req.partner_email)
        .await?
        .ok_or_else(|| AppError::Validation("partner email not registered".into()))?;

    if partner.user_id == auth.user_id {
        return Err(AppError::Validation(
            "cannot form a couple with yourself".into(),
        ));
    }
    if queries::find_couple_by_user(&state.db, auth.user_id).await?.is_some() {
        return Err(AppError::Conflict("you already belong to a couple".into()));
    }
    if queries::find_couple_by_user(&state.db, partner.user_id).await?.is_some() {
        return Err(AppError::Conflict(
            "partner already belongs to a couple".into(),
        ));
    }

    let couple = queries::create_couple(&state.db, auth.user_id, partner.user_id).await?;
    tracing::info!(couple_id = couple.couple_id, "created couple");
    Ok((StatusCode::CREATED, Json(couple)))
}

pub async fn get_couple(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> AppResult<Json<Couple>> {
    let couple = require_couple(&state, auth.user_id).await?;
    Ok(Json(couple))
}

/// Resolves the caller's couple or fails with NotFound. Shared by every
/// handler that operates on couple-scoped data.
pub async fn require_couple(state: &AppState, user_id: i64) -> AppResult<Couple> {
    queries::find_couple_by_user(&state.db, user_id)
        .await?
        .ok_or(AppError::NotFound {
            entity: "Couple",
            id: user_id,
        })
}
