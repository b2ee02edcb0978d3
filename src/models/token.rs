use chrono::NaiveDateTime;
use sqlx::FromRow;

/// A single-use code row from one of the per-purpose token tables.
#[derive(Debug, Clone, FromRow)]
pub struct AccountToken {
    pub id: i32,
    pub code: String,
    pub user_id: i32,
    pub created_at: NaiveDateTime,
    pub expires_at: NaiveDateTime,
}
