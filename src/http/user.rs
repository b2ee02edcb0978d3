use crate::AppState;
use axum::Json;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use serde::Serialize;
use sqlx::FromRow;

#[derive(Serialize)]
pub struct UserResponse {
    user_id: String,
    username: Option<String>,
    email: String,
    phone_number: Option<String>,
    verified: bool,
}

#[derive(FromRow)]
struct UserRow {
    guid: String,
    username: Option<String>,
    email: String,
    phone_number: Option<String>,
    verified: bool,
}

pub async fn user(headers: HeaderMap, State(state): State<AppState>) -> impl IntoResponse {
    let token = headers
        .get(AUTHORIZATION)
        .ok_or(StatusCode::INTERNAL_SERVER_ERROR)?
        .to_str()
        .or(Err(StatusCode::INTERNAL_SERVER_ERROR))?
        .replace("Bearer ", "");

    let Ok(user) = sqlx::query_as::<_, UserRow>(
        "SELECT users.guid, users.username, users.email, users.phone_number, users.verified
        FROM users INNER JOIN sessions ON sessions.user_id = users.id
        WHERE sessions.token = ? LIMIT 1",
    )
    .bind(&token)
    .fetch_one(&state.pool)
    .await
    else {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    };

    Ok(Json(UserResponse {
        user_id: user.guid,
        username: user.username,
        email: user.email,
        phone_number: user.phone_number,
        verified: user.verified,
    }))
}
