use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct Profile {
    pub user_id: i32,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub phone_number: Option<String>,
}
