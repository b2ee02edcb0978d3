use chrono::NaiveDateTime;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: i32,
    pub token: String,
    pub valid_until: NaiveDateTime,
    pub user_id: i32,
}
