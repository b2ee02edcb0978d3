use thiserror::Error;

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("No token matches the given code")]
    Invalid,
    #[error("Token has expired")]
    Expired,
    #[error("Generated code is {0} characters long")]
    BadCodeLength(usize),
    #[error("Could not find an unused code after {0} attempts")]
    CodeSpaceExhausted(usize),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
