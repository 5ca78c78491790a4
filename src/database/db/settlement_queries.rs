use chrono::{NaiveDateTime, Utc};
use serde_json::Value;
use sqlx::{Pool, Row, Sqlite};

use crate::database::models::{Expense, Settlement, SettlementSummary};
use crate::error::{AppError, AppResult};

/*
Store side of the settlement engine. confirm_settlement is the one write
path that must be all-or-nothing; everything else here is read-only.
*/

/// Unsettled expenses for a couple with date inside the closed interval
/// [period_start, period_end].
pub async fn get_unsettled_expenses_by_period(
    pool: &Pool<Sqlite>,
    couple_id: i64,
    period_start: NaiveDateTime,
    period_end: NaiveDateTime,
) -> AppResult<Vec<Expense>> {
    let expenses = sqlx::query_as::<_, Expense>(
        r#"
        SELECT *
        FROM expenses
        WHERE couple_id = ? AND is_settled = 0 AND date >= ? AND date <= ?
        ORDER BY date DESC
        "#,
    )
    .bind(couple_id)
    .bind(period_start)
    .bind(period_end)
    .fetch_all(pool)
    .await?;

    Ok(expenses)
}

/// Commits a settlement: inserts the settlement row, one link row per
/// expense, and flips the settled flag on every named expense. Runs inside
/// a single transaction; any failure rolls the whole thing back.
///
/// Already-settled expense ids are rejected (Conflict), which also closes
/// the race between two concurrent confirms over the same expenses: the
/// conditional UPDATE counts only rows it actually flipped, and the
/// UNIQUE(expense_id) constraint on the link table backs that up at the
/// storage level.
pub async fn confirm_settlement(
    pool: &Pool<Sqlite>,
    couple_id: i64,
    period_start: NaiveDateTime,
    period_end: NaiveDateTime,
    expense_ids: &[i64],
    details: &Value,
) -> AppResult<Settlement> {
    if expense_ids.is_empty() {
        return Err(AppError::Validation(
            "no expenses specified for settlement".to_string(),
        ));
    }

    let now = Utc::now().naive_utc();
    let details_json = serde_json::to_string(details)?;

    let mut tx = pool.begin().await?;

    let row = sqlx::query(
        r#"
        INSERT INTO settlements (
            couple_id, settlement_date, period_start, period_end,
            details, created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING settlement_id
        "#,
    )
    .bind(couple_id)
    .bind(now)
    .bind(period_start)
    .bind(period_end)
    .bind(&details_json)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;
    let settlement_id: i64 = row.try_get("settlement_id")?;

    for expense_id in expense_ids {
        sqlx::query("INSERT INTO settlement_expenses (settlement_id, expense_id) VALUES (?, ?)")
            .bind(settlement_id)
            .bind(expense_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| match e {
                // UNIQUE(expense_id) violation: some other settlement got
                // there first.
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    AppError::Conflict(format!(
                        "expense {expense_id} is already linked to a settlement"
                    ))
                }
                other => AppError::Database(other),
            })?;
    }

    // Conditional flip: only rows that are still unsettled and actually
    // belong to this couple count. A shortfall means a stale or foreign id
    // slipped into the request, and the whole commit is abandoned.
    let placeholders = vec!["?"; expense_ids.len()].join(", ");
    let update_sql = format!(
        "UPDATE expenses SET is_settled = 1, updated_at = ? \
         WHERE expense_id IN ({placeholders}) AND couple_id = ? AND is_settled = 0"
    );
    let mut update = sqlx::query(&update_sql).bind(now);
    for expense_id in expense_ids {
        update = update.bind(expense_id);
    }
    let result = update.bind(couple_id).execute(&mut *tx).await?;

    if result.rows_affected() != expense_ids.len() as u64 {
        // tx is dropped without commit, rolling back the inserts above.
        return Err(AppError::Conflict(format!(
            "{} of {} expenses could not be settled (unknown, foreign or already settled)",
            expense_ids.len() as u64 - result.rows_affected(),
            expense_ids.len()
        )));
    }

    tx.commit().await?;

    Ok(Settlement {
        settlement_id,
        couple_id,
        settlement_date: now,
        period_start,
        period_end,
        details: details.clone(),
        created_at: now,
        updated_at: now,
    })
}

/// Settlement history, newest settlement date first, with the number of
/// expenses each settlement consumed. Returns the page plus the total row
/// count for the couple.
pub async fn get_settlements_by_couple(
    pool: &Pool<Sqlite>,
    couple_id: i64,
    limit: i64,
    offset: i64,
) -> AppResult<(Vec<SettlementSummary>, i64)> {
    let total: i64 = sqlx::query("SELECT COUNT(*) AS total FROM settlements WHERE couple_id = ?")
        .bind(couple_id)
        .fetch_one(pool)
        .await?
        .try_get("total")?;

    let rows = sqlx::query(
        r#"
        SELECT s.settlement_id, s.settlement_date, s.period_start, s.period_end,
               s.details, s.created_at,
               COUNT(se.expense_id) AS expense_count
        FROM settlements s
        LEFT JOIN settlement_expenses se ON s.settlement_id = se.settlement_id
        WHERE s.couple_id = ?
        GROUP BY s.settlement_id
        ORDER BY s.settlement_date DESC
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(couple_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let mut settlements = Vec::with_capacity(rows.len());
    for row in rows {
        let details_json: String = row.try_get("details")?;
        settlements.push(SettlementSummary {
            settlement_id: row.try_get("settlement_id")?,
            settlement_date: row.try_get("settlement_date")?,
            period_start: row.try_get("period_start")?,
            period_end: row.try_get("period_end")?,
            details: serde_json::from_str(&details_json)?,
            expense_count: row.try_get("expense_count")?,
            created_at: row.try_get("created_at")?,
        });
    }

    Ok((settlements, total))
}

pub async fn get_settlement_by_id(
    pool: &Pool<Sqlite>,
    settlement_id: i64,
) -> AppResult<Settlement> {
    let row = sqlx::query("SELECT * FROM settlements WHERE settlement_id = ?")
        .bind(settlement_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::settlement_not_found(settlement_id))?;

    let details_json: String = row.try_get("details")?;
    Ok(Settlement {
        settlement_id: row.try_get("settlement_id")?,
        couple_id: row.try_get("couple_id")?,
        settlement_date: row.try_get("settlement_date")?,
        period_start: row.try_get("period_start")?,
        period_end: row.try_get("period_end")?,
        details: serde_json::from_str(&details_json)?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
