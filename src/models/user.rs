use chrono::NaiveDateTime;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub guid: String,
    pub username: Option<String>,
    pub email: String,
    pub phone_number: Option<String>,
    pub password: String,
    pub verified: bool,
    pub created_at: NaiveDateTime,
}
