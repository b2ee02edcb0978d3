use crate::errors::email_error::EmailError;
use crate::tokens::TOKEN_LIFETIME_MINUTES;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::env;

const DEFAULT_SMTP_PORT: u16 = 587;

/// SMTP settings read from the environment at startup.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from_address: String,
}

impl SmtpConfig {
    pub fn from_env() -> Self {
        Self {
            host: env::var("SMTP_HOST").expect("SMTP_HOST not set"),
            port: env::var("SMTP_PORT")
                .ok()
                .and_then(|port| port.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            username: env::var("SMTP_USER").ok(),
            password: env::var("SMTP_PASSWORD").ok(),
            from_address: env::var("SMTP_FROM").expect("SMTP_FROM not set"),
        }
    }
}

/// Sends account emails over SMTP with plain-text and HTML bodies.
#[derive(Clone)]
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl Mailer {
    pub fn new(config: SmtpConfig) -> Self {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .expect("Could not create SMTP transport")
            .port(config.port);

        if let (Some(username), Some(password)) = (config.username, config.password) {
            builder = builder.credentials(Credentials::new(username, password));
        }

        Self {
            transport: builder.build(),
            from_address: config.from_address,
        }
    }

    pub async fn send(
        &self,
        to_address: &str,
        subject: &str,
        html_body: String,
        text_body: String,
    ) -> Result<(), EmailError> {
        let message = build_message(&self.from_address, to_address, subject, html_body, text_body)?;
        self.transport.send(message).await?;
        Ok(())
    }
}

fn build_message(
    from_address: &str,
    to_address: &str,
    subject: &str,
    html_body: String,
    text_body: String,
) -> Result<Message, EmailError> {
    Message::builder()
        .from(from_address.parse::<Mailbox>()?)
        .to(to_address.parse::<Mailbox>()?)
        .subject(subject)
        .multipart(MultiPart::alternative_plain_html(text_body, html_body))
        .map_err(|error| EmailError::Build(error.to_string()))
}

/// HTML and plain-text bodies for a verification or password-reset code.
pub fn code_email(code: &str) -> (String, String) {
    let html_body = format!(
        "<p>Your code is <strong>{code}</strong>. It expires in {TOKEN_LIFETIME_MINUTES} minutes.</p>"
    );
    let text_body = format!("Your code is {code}. It expires in {TOKEN_LIFETIME_MINUTES} minutes.");
    (html_body, text_body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_multipart_message_for_valid_addresses() {
        let message = build_message(
            "no-reply@example.com",
            "alice@example.com",
            "Account Verification",
            String::from("<p>hello</p>"),
            String::from("hello"),
        );
        assert!(message.is_ok());
    }

    #[test]
    fn rejects_malformed_recipient() {
        let message = build_message(
            "no-reply@example.com",
            "not an address",
            "Account Verification",
            String::from("<p>hello</p>"),
            String::from("hello"),
        );
        assert!(matches!(message, Err(EmailError::Address(_))));
    }

    #[test]
    fn code_email_includes_the_code_in_both_bodies() {
        let (html_body, text_body) = code_email("AB12C");
        assert!(html_body.contains("AB12C"));
        assert!(text_body.contains("AB12C"));
        assert!(!text_body.contains('<'));
    }
}
