use sqlx::{MySql, Pool};

use crate::email::Mailer;

pub mod email;
pub mod errors;
pub mod http;
pub mod models;
pub mod password;
pub mod session;
pub mod tokens;

/// Shared state handed to every HTTP handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: Pool<MySql>,
    pub mailer: Mailer,
}
