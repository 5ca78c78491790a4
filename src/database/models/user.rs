use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;

#[derive(FromRow, Debug, Clone, Serialize)]
pub struct User {
    pub user_id: i64,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing)] // never leaks into responses
    pub password_hash: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
