use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::Value;

/// A committed settlement. Immutable once created; the audit trail of who
/// settled what and when.
#[derive(Debug, Clone, Serialize)]
pub struct Settlement {
    pub settlement_id: i64,
    pub couple_id: i64,
    pub settlement_date: NaiveDateTime,
    pub period_start: NaiveDateTime,
    pub period_end: NaiveDateTime,
    /// Caller-supplied payload captured at confirm time. May restate or
    /// override the calculated figures.
    pub details: Value,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Join row tying one expense to the settlement that consumed it.
#[derive(Debug, Clone, Serialize)]
pub struct SettlementExpense {
    pub settlement_id: i64,
    pub expense_id: i64,
}

/// One line of the settlement history listing.
#[derive(Debug, Clone, Serialize)]
pub struct SettlementSummary {
    pub settlement_id: i64,
    pub settlement_date: NaiveDateTime,
    pub period_start: NaiveDateTime,
    pub period_end: NaiveDateTime,
    pub details: Value,
    pub expense_count: i64,
    pub created_at: NaiveDateTime,
}
