// src/backend/handlers/settlements.rs
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::backend::handlers::couples::require_couple;
use crate::backend::{AppState, AuthUser};
use crate::database::db::settlement_queries;
use crate::database::models::{Settlement, SettlementSummary};
use crate::error::{AppError, AppResult};
use crate::settlement::{calculate_proposal, SettlementProposal};

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_PAGE_SIZE: i64 = 10;
const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct CalculateRequest {
    pub period_start: NaiveDateTime,
    pub period_end: NaiveDateTime,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmRequest {
    pub period_start: NaiveDateTime,
    pub period_end: NaiveDateTime,
    pub expense_ids: Vec<i64>,
    pub details: Value,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub page: Option<i64>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub settlements: Vec<SettlementSummary>,
    pub total: i64,
}

fn check_period(start: NaiveDateTime, end: NaiveDateTime) -> AppResult<()> {
    if end < start {
        return Err(AppError::Validation(
            "period end must not precede period start".into(),
        ));
    }
    Ok(())
}

/// POST /api/settlements/calculate
///
/// Read-only: computes what a settlement over the period would look like.
/// Replayable; nothing is written.
pub async fn calculate(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<CalculateRequest>,
) -> AppResult<Json<SettlementProposal>> {
    check_period(req.period_start, req.period_end)?;
    let couple = require_couple(&state, auth.user_id).await?;

    let expenses = settlement_queries::get_unsettled_expenses_by_period(
        &state.db,
        couple.couple_id,
        req.period_start,
        req.period_end,
    )
    .await?;

    let (user1_id, user2_id) = couple.member_ids();
    let proposal = calculate_proposal(
        user1_id,
        user2_id,
        req.period_start,
        req.period_end,
        expenses,
    );

    Ok(Json(proposal))
}

/// POST /api/settlements/confirm
///
/// Commits a previously reviewed proposal. The expense id set is taken on
/// trust from the caller; atomicity and the no-double-settle invariant are
/// enforced in the store layer.
pub async fn confirm(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<ConfirmRequest>,
) -> AppResult<(StatusCode, Json<Settlement>)> {
    check_period(req.period_start, req.period_end)?;
    if req.expense_ids.is_empty() {
        return Err(AppError::Validation(
            "no expenses specified for settlement".into(),
        ));
    }
    let couple = require_couple(&state, auth.user_id).await?;

    let settlement = settlement_queries::confirm_settlement(
        &state.db,
        couple.couple_id,
        req.period_start,
        req.period_end,
        &req.expense_ids,
        &req.details,
    )
    .await?;

    tracing::info!(
        settlement_id = settlement.settlement_id,
        expense_count = req.expense_ids.len(),
        "settlement confirmed"
    );
    Ok((StatusCode::CREATED, Json(settlement)))
}

/// GET /api/settlements?page=1&pageSize=10
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<ListResponse>> {
    let couple = require_couple(&state, auth.user_id).await?;

    // Out-of-range paging falls back to defaults instead of erroring.
    let page = match params.page {
        Some(p) if p >= 1 => p,
        _ => DEFAULT_PAGE,
    };
    let page_size = match params.page_size {
        Some(ps) if (1..=MAX_PAGE_SIZE).contains(&ps) => ps,
        _ => DEFAULT_PAGE_SIZE,
    };
    let offset = (page - 1) * page_size;

    let (settlements, total) =
        settlement_queries::get_settlements_by_couple(&state.db, couple.couple_id, page_size, offset)
            .await?;

    Ok(Json(ListResponse { settlements, total }))
}

/// GET /api/settlements/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<Settlement>> {
    let couple = require_couple(&state, auth.user_id).await?;

    let settlement = settlement_queries::get_settlement_by_id(&state.db, id).await?;
    if settlement.couple_id != couple.couple_id {
        return Err(AppError::settlement_not_found(id));
    }
    Ok(Json(settlement))
}
