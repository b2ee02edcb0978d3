use argon2::password_hash::rand_core::{OsRng, RngCore};
use base64::{Engine as _, engine::general_purpose::URL_SAFE};
use chrono::{Duration, Utc};
use sqlx::{MySql, Pool};

const CREDENTIAL_BYTES: usize = 88;
const SESSION_LIFETIME_HOURS: i64 = 24;

fn generate_credential() -> String {
    let mut bytes = [0u8; CREDENTIAL_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE.encode(bytes)
}

/// Issues an opaque session credential for a user and persists it.
pub async fn issue(pool: &Pool<MySql>, user_id: i32) -> Result<String, sqlx::Error> {
    let token = generate_credential();
    let valid_until = Utc::now().naive_utc() + Duration::hours(SESSION_LIFETIME_HOURS);

    sqlx::query("INSERT INTO sessions (token, valid_until, user_id) VALUES (?, ?, ?)")
        .bind(&token)
        .bind(valid_until)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_is_url_safe_base64() {
        let credential = generate_credential();
        assert_eq!(credential.len(), 120);
        assert!(
            credential
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '=')
        );
    }

    #[test]
    fn credentials_do_not_repeat() {
        assert_ne!(generate_credential(), generate_credential());
    }
}
