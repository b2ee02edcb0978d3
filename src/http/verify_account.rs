use crate::AppState;
use crate::errors::token_error::TokenError;
use crate::tokens::{self, TokenPurpose};
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct VerifyAccount {
    user_id: String,
    code: String,
}

pub async fn verify_account(
    State(state): State<AppState>,
    Json(payload): Json<VerifyAccount>,
) -> impl IntoResponse {
    if payload.code.len() != tokens::CODE_LENGTH {
        return Err((StatusCode::BAD_REQUEST, Json(String::from("Invalid token"))));
    }

    let user = sqlx::query_as::<_, (i32,)>("SELECT id FROM users WHERE guid = ? LIMIT 1")
        .bind(&payload.user_id)
        .fetch_optional(&state.pool)
        .await
        .or(Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(String::from("Could not verify account")),
        )))?;

    let Some((user_id,)) = user else {
        return Err((StatusCode::BAD_REQUEST, Json(String::from("Invalid token"))));
    };

    match tokens::validate_and_consume(
        &state.pool,
        user_id,
        TokenPurpose::AccountVerification,
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
                Json(String::from("Could not verify account")),
            ));
        }
    }

    sqlx::query("UPDATE users SET verified = TRUE WHERE id = ?")
        .bind(user_id)
        .execute(&state.pool)
        .await
        .or(Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(String::from("Could not verify account")),
        )))?;

    Ok((
        StatusCode::OK,
        Json(String::from("Account verified successfully")),
    ))
}
