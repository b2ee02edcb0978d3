use dotenvy::dotenv;
use env_logger::Env;
use log::info;
use rusty_account_server::email::{Mailer, SmtpConfig};
use rusty_account_server::tokens::{self, TokenPurpose};
use rusty_account_server::{AppState, http};
use sqlx::mysql::MySqlPoolOptions;
use std::env;

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = MySqlPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await
        .expect("Could not build connection pool");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Could not run migrations");

    if env::args().nth(1).as_deref() == Some("sweep-tokens") {
        let mut deleted = 0;
        for purpose in [TokenPurpose::AccountVerification, TokenPurpose::PasswordReset] {
            deleted += tokens::sweep_expired(&pool, purpose)
                .await
                .expect("Could not sweep expired tokens");
        }
        info!("Deleted {deleted} expired tokens");
        return;
    }

    let mailer = Mailer::new(SmtpConfig::from_env());
    http::listen(AppState { pool, mailer }).await;
}
