use crate::AppState;
use crate::email;
use crate::http::valid_phone_number;
use crate::password;
use crate::tokens::{self, TokenPurpose};
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use email_address::EmailAddress;
use log::trace;
use serde::Deserialize;
use serde_json::json;

#[derive(Deserialize)]
pub struct CreateUser {
    username: String,
    email: String,
    phone_number: Option<String>,
    password: String,
    password_confirmation: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<CreateUser>,
) -> impl IntoResponse {
    if payload.password != payload.password_confirmation {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(String::from("Passwords don't match")),
        ));
    }

    if payload.password.len() < 8 {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(String::from("Password must be at least 8 characters long")),
        ));
    }

    if !EmailAddress::is_valid(payload.email.as_str()) {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(String::from("Invalid email address")),
        ));
    }

    if let Some(ref phone_number) = payload.phone_number {
        if !valid_phone_number(phone_number) {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(String::from("Invalid phone number")),
            ));
        }
    }

    if sqlx::query("SELECT id FROM users WHERE email = ? LIMIT 1")
        .bind(&payload.email)
        .fetch_optional(&state.pool)
        .await
        .or(Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(String::from("Could not register user")),
        )))?
        .is_some()
    {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(String::from("User already registered")),
        ));
    }

    let Ok(password_hash) = password::hash(&payload.password) else {
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(String::from("Could not hash password")),
        ));
    };

    let user_guid = guid_create::GUID::rand().to_string().to_lowercase();

    let created = sqlx::query(
        "INSERT INTO users (guid, username, email, phone_number, password, verified)
        VALUES (?, ?, ?, ?, ?, FALSE)",
    )
    .bind(&user_guid)
    .bind(&payload.username)
    .bind(&payload.email)
    .bind(&payload.phone_number)
    .bind(&password_hash)
    .execute(&state.pool)
    .await
    .or(Err((
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(String::from("Could not register user")),
    )))?;

    let user_id = created.last_insert_id() as i32;

    let Ok(token) = tokens::issue(&state.pool, user_id, TokenPurpose::AccountVerification).await
    else {
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(String::from("Could not create verification token")),
        ));
    };

    let (html_body, text_body) = email::code_email(&token.code);
    state
        .mailer
        .send(&payload.email, "Account Verification", html_body, text_body)
        .await
        .or(Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(String::from("Could not send verification email")),
        )))?;

    trace!("{} registered", payload.email);
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User created successfully. Verification token sent to email.",
            "user_id": user_guid
        })),
    ))
}
