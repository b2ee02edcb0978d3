use crate::AppState;
use axum::http::HeaderValue;
use axum::routing::{delete, get, post};
use axum::Router;
use log::{error, info};
use regex::Regex;
use std::env;
use tower_http::cors::CorsLayer;

mod change_email;
mod change_password;
mod delete_account;
mod login;
mod logout;
mod middleware;
mod password_reset;
mod profile;
mod register;
mod user;
mod verify_account;

pub(crate) fn valid_phone_number(phone_number: &str) -> bool {
    Regex::new(r"^[0-9]{7,11}$").map_or(false, |re| re.is_match(phone_number))
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    let authentication = axum::middleware::from_fn_with_state(
        state.clone(),
        middleware::authentication::authentication,
    );

    let account_routes = Router::new()
        .route("/", get(user::user))
        .route("/", delete(delete_account::delete_account))
        .route("/profile", get(profile::profile))
        .route("/profile", post(profile::update_profile))
        .route("/change-email", post(change_email::change_email))
        .route("/change-password", post(change_password::change_password))
        .route("/logout", post(logout::logout))
        .layer(authentication);

    let user_routes = Router::new()
        .route("/signup", post(register::register))
        .route("/verification", post(verify_account::verify_account))
        .route("/login", post(login::login))
        .route(
            "/password-reset-request",
            post(password_reset::password_reset_request),
        )
        .route("/password-reset", post(password_reset::password_reset_confirm))
        .nest("/me", account_routes);

    Router::new().nest("/users", user_routes).with_state(state)
}

/// Starts the HTTP server.
pub async fn listen(state: AppState) {
    let frontend_url = env::var("FRONTEND_URL").expect("FRONTEND_URL not set");
    let cors = CorsLayer::new().allow_origin(
        frontend_url
            .parse::<HeaderValue>()
            .expect("Could not convert FRONTEND_URL to header"),
    );

    let app = router(state).layer(cors);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000")
        .await
        .expect("Could not bind HTTP server");

    info!("HTTP server listening on port 3000");

    if let Err(err) = axum::serve(listener, app).await {
        error!("HTTP server error: {err:#}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_numbers_are_seven_to_eleven_digits() {
        assert!(valid_phone_number("1234567"));
        assert!(valid_phone_number("12345678901"));
        assert!(!valid_phone_number("123456"));
        assert!(!valid_phone_number("123456789012"));
        assert!(!valid_phone_number("12345abc"));
        assert!(!valid_phone_number("+12345678"));
    }
}
