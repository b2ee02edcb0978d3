use crate::AppState;
use crate::email;
use crate::errors::token_error::TokenError;
use crate::password;
use crate::tokens::{self, TokenPurpose};
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use email_address::EmailAddress;
use serde::Deserialize;
use serde_json::json;

#[derive(Deserialize)]
pub struct PasswordResetRequest {
    email: String,
}

pub async fn password_reset_request(
    State(state): State<AppState>,
    Json(payload): Json<PasswordResetRequest>,
) -> impl IntoResponse {
    if !EmailAddress::is_valid(payload.email.as_str()) {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(String::from("Invalid email address")),
        ));
    }

    let user = sqlx::query_as::<_, (i32, String)>(
        "SELECT id, guid FROM users WHERE email = ? LIMIT 1",
    )
    .bind(&payload.email)
    .fetch_optional(&state.pool)
    .await
    .or(Err((
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(String::from("Could not request password reset")),
    )))?;

    let Some((user_id, user_guid)) = user else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(String::from("User with this email does not exist")),
        ));
    };

    let Ok(token) = tokens::issue(&state.pool, user_id, TokenPurpose::PasswordReset).await else {
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(String::from("Could not create reset token")),
        ));
    };

    let (html_body, text_body) = email::code_email(&token.code);
    state
        .mailer
        .send(&payload.email, "Password Reset", html_body, text_body)
        .await
        .or(Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(String::from("Could not send password reset email")),
        )))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({"message": "Reset password token sent.", "user_id": user_guid})),
    ))
}

#[derive(Deserialize)]
pub struct PasswordResetConfirm {
    user_id: String,
    code: String,
    new_password: String,
}

pub async fn password_reset_confirm(
    State(state): State<AppState>,
    Json(payload): Json<PasswordResetConfirm>,
) -> impl IntoResponse {
    if payload.new_password.len() < 8 {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(String::from("New password must be at least 8 characters long")),
        ));
    }

    if payload.code.len() != tokens::CODE_LENGTH {
        return Err((StatusCode::BAD_REQUEST, Json(String::from("Invalid token"))));
    }

    let user = sqlx::query_as::<_, (i32,)>("SELECT id FROM users WHERE guid = ? LIMIT 1")
        .bind(&payload.user_id)
        .fetch_optional(&state.pool)
        .await
        .or(Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(String::from("Could not reset password")),
        )))?;

    let Some((user_id,)) = user else {
        return Err((StatusCode::BAD_REQUEST, Json(String::from("Invalid token"))));
    };

    match tokens::validate_and_consume(
        &state.pool,
        user_id,
        TokenPurpose::PasswordReset,
        &payload.code,
    )
    .await
    {
        Ok(()) => {}
        Err(TokenError::Expired) => {
            return Err((StatusCode::BAD_REQUEST, Json(String::from("Token expired"))));
        }
        Err(TokenError::Invalid) => {
            return Err((StatusCode::BAD_REQUEST, Json(String::from("Invalid token"))));
        }
        Err(_) => {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(String::from("Could not reset password")),
            ));
        }
    }

    let Ok(password_hash) = password::hash(&payload.new_password) else {
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(String::from("Could not hash password")),
        ));
    };

    sqlx::query("UPDATE users SET password = ? WHERE id = ?")
        .bind(&password_hash)
        .bind(user_id)
        .execute(&state.pool)
        .await
        .or(Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(String::from("Could not reset password")),
        )))?;

    // Revoke every open session so the old credential stops working.
    sqlx::query("DELETE FROM sessions WHERE user_id = ?")
        .bind(user_id)
        .execute(&state.pool)
        .await
        .or(Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(String::from("Could not reset password")),
        )))?;

    Ok((
        StatusCode::OK,
        Json(String::from("Password reset successfully")),
    ))
}
