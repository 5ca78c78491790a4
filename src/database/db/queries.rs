use chrono::{NaiveDateTime, Utc};
use sqlx::{Pool, Sqlite};

use crate::database::models::{Couple, Expense, User};
use crate::error::{AppError, AppResult};

/*
User, couple and expense CRUD. Settlement-specific queries live in
settlement_queries.rs because they need transactional discipline.
*/

/*========== User Queries ==========*/

pub async fn create_user(
    pool: &Pool<Sqlite>,
    email: &str,
    name: &str,
    password_hash: &str,
) -> AppResult<User> {
    let now = Utc::now().naive_utc();
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (email, name, password_hash, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(email)
    .bind(name)
    .bind(password_hash)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

pub async fn find_user_by_email(pool: &Pool<Sqlite>, email: &str) -> AppResult<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn get_user_by_id(pool: &Pool<Sqlite>, user_id: i64) -> AppResult<User> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound {
            entity: "User",
            id: user_id,
        })
}

/*========== Couple Queries ==========*/

pub async fn create_couple(
    pool: &Pool<Sqlite>,
    user1_id: i64,
    user2_id: i64,
) -> AppResult<Couple> {
    let now = Utc::now().naive_utc();
    let couple = sqlx::query_as::<_, Couple>(
        r#"
        INSERT INTO couples (user1_id, user2_id, created_at)
        VALUES (?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(user1_id)
    .bind(user2_id)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(couple)
}

/// Looks up the couple a user belongs to. Member identities for the
/// settlement calculation come from here, never from the expense rows.
pub async fn find_couple_by_user(pool: &Pool<Sqlite>, user_id: i64) -> AppResult<Option<Couple>> {
    let couple = sqlx::query_as::<_, Couple>(
        "SELECT * FROM couples WHERE user1_id = ? OR user2_id = ?",
    )
    .bind(user_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(couple)
}

/*========== Expense Queries ==========*/

#[allow(clippy::too_many_arguments)]
pub async fn create_expense(
    pool: &Pool<Sqlite>,
    couple_id: i64,
    paid_by_user_id: i64,
    amount: i64,
    category: &str,
    description: Option<&str>,
    date: NaiveDateTime,
    split_user1: i64,
    split_user2: i64,
) -> AppResult<Expense> {
    let now = Utc::now().naive_utc();
    let expense = sqlx::query_as::<_, Expense>(
        r#"
        INSERT INTO expenses (
            couple_id, paid_by_user_id, amount, category, description,
            date, split_user1, split_user2, is_settled, created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?)
        RETURNING *
        "#,
    )
    .bind(couple_id)
    .bind(paid_by_user_id)
    .bind(amount)
    .bind(category)
    .bind(description)
    .bind(date)
    .bind(split_user1)
    .bind(split_user2)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(expense)
}

pub async fn get_expense_by_id(pool: &Pool<Sqlite>, expense_id: i64) -> AppResult<Expense> {
    sqlx::query_as::<_, Expense>("SELECT * FROM expenses WHERE expense_id = ?")
        .bind(expense_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::expense_not_found(expense_id))
}

pub async fn get_expenses_by_couple(
    pool: &Pool<Sqlite>,
    couple_id: i64,
) -> AppResult<Vec<Expense>> {
    let expenses = sqlx::query_as::<_, Expense>(
        "SELECT * FROM expenses WHERE couple_id = ? ORDER BY date DESC",
    )
    .bind(couple_id)
    .fetch_all(pool)
    .await?;
    Ok(expenses)
}

#[allow(clippy::too_many_arguments)]
pub async fn update_expense(
    pool: &Pool<Sqlite>,
    expense_id: i64,
    amount: i64,
    category: &str,
    description: Option<&str>,
    date: NaiveDateTime,
    split_user1: i64,
    split_user2: i64,
) -> AppResult<Expense> {
    let now = Utc::now().naive_utc();
    // Settled expenses are frozen history; the settled flag only ever moves
    // false -> true, and only via a settlement commit.
    let updated = sqlx::query_as::<_, Expense>(
        r#"
        UPDATE expenses
        SET amount = ?, category = ?, description = ?, date = ?,
            split_user1 = ?, split_user2 = ?, updated_at = ?
        WHERE expense_id = ? AND is_settled = 0
        RETURNING *
        "#,
    )
    .bind(amount)
    .bind(category)
    .bind(description)
    .bind(date)
    .bind(split_user1)
    .bind(split_user2)
    .bind(now)
    .bind(expense_id)
    .fetch_optional(pool)
    .await?;

    match updated {
        Some(expense) => Ok(expense),
        None => {
            // Distinguish "gone" from "already settled" for the caller.
            let existing = get_expense_by_id(pool, expense_id).await?;
            debug_assert!(existing.is_settled);
            Err(AppError::Conflict(format!(
                "expense {expense_id} is already settled and cannot be edited"
            )))
        }
    }
}

pub async fn delete_expense(pool: &Pool<Sqlite>, expense_id: i64) -> AppResult<()> {
    let result = sqlx::query("DELETE FROM expenses WHERE expense_id = ? AND is_settled = 0")
        .bind(expense_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        let existing = get_expense_by_id(pool, expense_id).await?;
        debug_assert!(existing.is_settled);
        return Err(AppError::Conflict(format!(
            "expense {expense_id} is already settled and cannot be deleted"
        )));
    }
    Ok(())
}
