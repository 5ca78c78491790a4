use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;

/// The two-member unit whose shared expenses are tracked and settled.
#[derive(FromRow, Debug, Clone, Serialize)]
pub struct Couple {
    pub couple_id: i64,
    pub user1_id: i64,
    pub user2_id: i64,
    pub created_at: NaiveDateTime,
}

impl Couple {
    /// Both member ids, independent of who appears in any expense set.
    pub fn member_ids(&self) -> (i64, i64) {
        (self.user1_id, self.user2_id)
    }

    pub fn has_member(&self, user_id: i64) -> bool {
        self.user1_id == user_id || self.user2_id == user_id
    }
}
