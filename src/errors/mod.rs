pub mod email_error;
pub mod token_error;
