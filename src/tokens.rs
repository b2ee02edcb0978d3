use crate::errors::token_error::TokenError;
use crate::models::token::AccountToken;
use chrono::{Duration, NaiveDateTime, Utc};
use rand::Rng;
use sqlx::{MySql, Pool};

/// Length of every issued code.
pub const CODE_LENGTH: usize = 5;

/// Minutes a code stays valid after issuance.
pub const TOKEN_LIFETIME_MINUTES: i64 = 10;

const CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const MAX_GENERATION_ATTEMPTS: usize = 100;

/// Namespace separating account-verification codes from password-reset codes.
/// Each purpose has its own table, so the same code value may exist in both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenPurpose {
    AccountVerification,
    PasswordReset,
}

impl TokenPurpose {
    pub const fn table(self) -> &'static str {
        match self {
            TokenPurpose::AccountVerification => "verification_tokens",
            TokenPurpose::PasswordReset => "password_reset_tokens",
        }
    }
}

/// A freshly issued code together with its validity window.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub code: String,
    pub created_at: NaiveDateTime,
    pub expires_at: NaiveDateTime,
}

fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..CODE_LENGTH)
        .map(|_| CODE_CHARSET[rng.random_range(0..CODE_CHARSET.len())] as char)
        .collect()
}

fn validity_window(now: NaiveDateTime) -> (NaiveDateTime, NaiveDateTime) {
    (now, now + Duration::minutes(TOKEN_LIFETIME_MINUTES))
}

fn is_expired(expires_at: NaiveDateTime, now: NaiveDateTime) -> bool {
    now > expires_at
}

/// Issues a new code for a user, replacing any previous token of the same
/// purpose. The UNIQUE column on the code settles concurrent draws: an insert
/// losing that race retries with a fresh code instead of corrupting state.
pub async fn issue(
    pool: &Pool<MySql>,
    user_id: i32,
    purpose: TokenPurpose,
) -> Result<IssuedToken, TokenError> {
    for _ in 0..MAX_GENERATION_ATTEMPTS {
        let code = generate_code();
        if code.len() != CODE_LENGTH {
            return Err(TokenError::BadCodeLength(code.len()));
        }

        let taken = sqlx::query(&format!(
            "SELECT id FROM {} WHERE code = ? LIMIT 1",
            purpose.table()
        ))
        .bind(&code)
        .fetch_optional(pool)
        .await?;

        if taken.is_some() {
            continue;
        }

        let (created_at, expires_at) = validity_window(Utc::now().naive_utc());

        let mut tx = pool.begin().await?;

        sqlx::query(&format!("DELETE FROM {} WHERE user_id = ?", purpose.table()))
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        let inserted = sqlx::query(&format!(
            "INSERT INTO {} (code, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)",
            purpose.table()
        ))
        .bind(&code)
        .bind(user_id)
        .bind(created_at)
        .bind(expires_at)
        .execute(&mut *tx)
        .await;

        match inserted {
            Ok(_) => {
                tx.commit().await?;
                return Ok(IssuedToken {
                    code,
                    created_at,
                    expires_at,
                });
            }
            Err(sqlx::Error::Database(error)) if error.is_unique_violation() => {
                tx.rollback().await?;
                continue;
            }
            Err(error) => return Err(error.into()),
        }
    }

    Err(TokenError::CodeSpaceExhausted(MAX_GENERATION_ATTEMPTS))
}

/// Validates a code for a user and consumes it. Consumed and expired tokens
/// are deleted, never flagged, so a code can succeed at most once.
pub async fn validate_and_consume(
    pool: &Pool<MySql>,
    user_id: i32,
    purpose: TokenPurpose,
    code: &str,
) -> Result<(), TokenError> {
    let token = sqlx::query_as::<_, AccountToken>(&format!(
        "SELECT id, code, user_id, created_at, expires_at FROM {} WHERE user_id = ? AND code = ? LIMIT 1",
        purpose.table()
    ))
    .bind(user_id)
    .bind(code)
    .fetch_optional(pool)
    .await?;

    let Some(token) = token else {
        return Err(TokenError::Invalid);
    };

    let deleted = sqlx::query(&format!("DELETE FROM {} WHERE id = ?", purpose.table()))
        .bind(token.id)
        .execute(pool)
        .await?;

    if is_expired(token.expires_at, Utc::now().naive_utc()) {
        return Err(TokenError::Expired);
    }

    // Another request consumed the token between the lookup and the delete.
    if deleted.rows_affected() == 0 {
        return Err(TokenError::Invalid);
    }

    Ok(())
}

/// Deletes all expired tokens of a purpose and returns the number removed.
/// Idempotent; expired tokens are already rejected by `validate_and_consume`,
/// so this only reclaims rows.
pub async fn sweep_expired(pool: &Pool<MySql>, purpose: TokenPurpose) -> Result<u64, TokenError> {
    let result = sqlx::query(&format!(
        "DELETE FROM {} WHERE expires_at < ?",
        purpose.table()
    ))
    .bind(Utc::now().naive_utc())
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_codes_have_the_contract_length() {
        for _ in 0..50 {
            assert_eq!(generate_code().len(), CODE_LENGTH);
        }
    }

    #[test]
    fn generated_codes_stay_inside_the_charset() {
        for _ in 0..50 {
            let code = generate_code();
            assert!(
                code.bytes().all(|byte| CODE_CHARSET.contains(&byte)),
                "unexpected character in code {code}"
            );
        }
    }

    #[test]
    fn generated_codes_vary() {
        let codes: Vec<String> = (0..20).map(|_| generate_code()).collect();
        assert!(codes.iter().any(|code| code != &codes[0]));
    }

    #[test]
    fn validity_window_lasts_ten_minutes() {
        let now = Utc::now().naive_utc();
        let (created_at, expires_at) = validity_window(now);
        assert_eq!(created_at, now);
        assert_eq!(expires_at - created_at, Duration::minutes(10));
        assert!(expires_at > created_at);
    }

    #[test]
    fn token_is_valid_until_the_exact_expiry_instant() {
        let now = Utc::now().naive_utc();
        let (_, expires_at) = validity_window(now);
        assert!(!is_expired(expires_at, expires_at));
        assert!(is_expired(expires_at, expires_at + Duration::seconds(1)));
    }

    #[test]
    fn purposes_use_separate_tables() {
        assert_eq!(TokenPurpose::AccountVerification.table(), "verification_tokens");
        assert_eq!(TokenPurpose::PasswordReset.table(), "password_reset_tokens");
        assert_ne!(
            TokenPurpose::AccountVerification.table(),
            TokenPurpose::PasswordReset.table()
        );
    }
}
