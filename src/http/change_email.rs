use crate::AppState;
use crate::email;
use crate::password;
use crate::tokens::{self, TokenPurpose};
use axum::Json;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use email_address::EmailAddress;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct ChangeEmail {
    new_email: String,
    password: String,
}

pub async fn change_email(
    headers: HeaderMap,
    State(state): State<AppState>,
    Json(payload): Json<ChangeEmail>,
) -> impl IntoResponse {
    if !EmailAddress::is_valid(payload.new_email.as_str()) {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(String::from("Invalid email address")),
        ));
    }

    let token = headers
        .get(AUTHORIZATION)
        .ok_or((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(String::from("Could not get token")),
        ))?
        .to_str()
        .or(Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(String::from("Could not get token")),
        )))?
        .replace("Bearer ", "");

    let Ok((user_id, current_email, stored_password)) = sqlx::query_as::<_, (i32, String, String)>(
        "SELECT users.id, users.email, users.password FROM users INNER JOIN sessions ON sessions.user_id = users.id
        WHERE sessions.token = ? LIMIT 1",
    )
    .bind(&token)
    .fetch_one(&state.pool)
    .await
    else {
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(String::from("User not found")),
        ));
    };

    if payload.new_email == current_email {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(String::from(
                "New email can't be the same as the current email",
            )),
        ));
    }

    match password::verify(&payload.password, &stored_password) {
        Ok(true) => {}
        Ok(false) => {
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(String::from("Password incorrect")),
            ));
        }
        Err(_) => {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(String::from("Error hashing password")),
            ));
        }
    }

    if sqlx::query("SELECT id FROM users WHERE email = ? LIMIT 1")
        .bind(&payload.new_email)
        .fetch_optional(&state.pool)
        .await
        .or(Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(String::from("Could not change email")),
        )))?
        .is_some()
    {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(String::from("Email already in use")),
        ));
    }

    // The new address is unproven, so verification starts over.
    sqlx::query("UPDATE users SET email = ?, verified = FALSE WHERE id = ?")
        .bind(&payload.new_email)
        .bind(user_id)
        .execute(&state.pool)
        .await
        .or(Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(String::from("Could not change email")),
        )))?;

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
        .send(
            &payload.new_email,
            "Account Verification",
            html_body,
            text_body,
        )
        .await
        .or(Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(String::from("Could not send verification email")),
        )))?;

    Ok(Json(
        "Email changed successfully. Verification token sent to email.",
    ))
}
