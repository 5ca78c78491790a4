// src/backend/handlers/expenses.rs
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::backend::handlers::couples::require_couple;
use crate::backend::{AppState, AuthUser};
use crate::database::db::queries;
use crate::database::models::{Couple, Expense};
use crate::error::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct ExpenseBody {
    pub amount: i64,
    pub category: String,
    pub description: Option<String>,
    pub date: NaiveDateTime,
    pub split_user1: i64,
    pub split_user2: i64,
}

fn validate_body(body: &ExpenseBody) -> AppResult<()> {
    if body.amount <= 0 {
        return Err(AppError::Validation("amount must be positive".into()));
    }
    if body.category.trim().is_empty() {
        return Err(AppError::Validation("category is required".into()));
    }
    if !(0..=100).contains(&body.split_user1)
        || !(0..=100).contains(&body.split_user2)
        || body.split_user1 + body.split_user2 != 100
    {
        return Err(AppError::Validation(
            "split percentages must be 0-100 and sum to 100".into(),
        ));
    }
    Ok(())
}

pub async fn create_expense(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<ExpenseBody>,
) -> AppResult<(StatusCode, Json<Expense>)> {
    let couple = require_couple(&state, auth.user_id).await?;
    validate_body(&body)?;

    let expense = queries::create_expense(
        &state.db,
        couple.couple_id,
        auth.user_id,
        body.amount,
        &body.category,
        body.description.as_deref(),
        body.date,
        body.split_user1,
        body.split_user2,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(expense)))
}

pub async fn list_expenses(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> AppResult<Json<Vec<Expense>>> {
    let couple = require_couple(&state, auth.user_id).await?;
    let expenses = queries::get_expenses_by_couple(&state.db, couple.couple_id).await?;
    Ok(Json(expenses))
}

pub async fn get_expense(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<Expense>> {
    let couple = require_couple(&state, auth.user_id).await?;
    let expense = owned_expense(&state, &couple, id).await?;
    Ok(Json(expense))
}

pub async fn update_expense(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(body): Json<ExpenseBody>,
) -> AppResult<Json<Expense>> {
    let couple = require_couple(&state, auth.user_id).await?;
    validate_body(&body)?;
    owned_expense(&state, &couple, id).await?;

    let expense = queries::update_expense(
        &state.db,
        id,
        body.amount,
        &body.category,
        body.description.as_deref(),
        body.date,
        body.split_user1,
        body.split_user2,
    )
    .await?;

    Ok(Json(expense))
}

pub async fn delete_expense(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    let couple = require_couple(&state, auth.user_id).await?;
    owned_expense(&state, &couple, id).await?;

    queries::delete_expense(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Fetches an expense and checks it belongs to the caller's couple.
/// Foreign expenses answer 404 rather than leaking their existence.
async fn owned_expense(state: &AppState, couple: &Couple, id: i64) -> AppResult<Expense> {
    let expense = queries::get_expense_by_id(&state.db, id).await?;
    if expense.couple_id != couple.couple_id {
        return Err(AppError::expense_not_found(id));
    }
    Ok(expense)
}
