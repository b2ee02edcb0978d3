use crate::AppState;
use crate::password;
use axum::Json;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct DeleteAccount {
    password: String,
}

pub async fn delete_account(
    headers: HeaderMap,
    State(state): State<AppState>,
    Json(payload): Json<DeleteAccount>,
) -> impl IntoResponse {
    let token = headers
        .get(AUTHORIZATION)
        .ok_or(StatusCode::INTERNAL_SERVER_ERROR)?
        .to_str()
        .or(Err(StatusCode::INTERNAL_SERVER_ERROR))?
        .replace("Bearer ", "");

    let Ok((user_id, stored_password)) = sqlx::query_as::<_, (i32, String)>(
        "SELECT users.id, users.password FROM users INNER JOIN sessions ON sessions.user_id = users.id
        WHERE sessions.token = ? LIMIT 1",
    )
    .bind(&token)
    .fetch_one(&state.pool)
    .await
    else {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    };

    match password::verify(&payload.password, &stored_password) {
        Ok(true) => {}
        Ok(false) => return Err(StatusCode::UNAUTHORIZED),
        Err(_) => return Err(StatusCode::INTERNAL_SERVER_ERROR),
    }

    sqlx::query("DELETE FROM sessions WHERE user_id = ?")
        .bind(user_id)
        .execute(&state.pool)
        .await
        .or(Err(StatusCode::INTERNAL_SERVER_ERROR))?;

    sqlx::query("DELETE FROM verification_tokens WHERE user_id = ?")
        .bind(user_id)
        .execute(&state.pool)
        .await
        .or(Err(StatusCode::INTERNAL_SERVER_ERROR))?;

    sqlx::query("DELETE FROM password_reset_tokens WHERE user_id = ?")
        .bind(user_id)
        .execute(&state.pool)
        .await
        .or(Err(StatusCode::INTERNAL_SERVER_ERROR))?;

    sqlx::query("DELETE FROM profiles WHERE user_id = ?")
        .bind(user_id)
        .execute(&state.pool)
        .await
        .or(Err(StatusCode::INTERNAL_SERVER_ERROR))?;

    sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(user_id)
        .execute(&state.pool)
        .await
        .or(Err(StatusCode::INTERNAL_SERVER_ERROR))?;

    Ok(Json("User deleted successfully"))
}
