use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;

/// A single shared expense. `amount` is in minor currency units; the split
/// percentages say what fraction of it each member owes, independent of who
/// actually paid.
#[derive(FromRow, Debug, Clone, Serialize)]
pub struct Expense {
    pub expense_id: i64,
    pub couple_id: i64,
    pub paid_by_user_id: i64,
    pub amount: i64,
    pub category: String,
    pub description: Option<String>,
    pub date: NaiveDateTime,
    pub split_user1: i64,
    pub split_user2: i64,
    /// false until consumed by a committed settlement; never reverted.
    pub is_settled: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
