use crate::AppState;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};

pub async fn logout(
    headers: HeaderMap,
    State(state): State<AppState>,
) -> Result<StatusCode, StatusCode> {
    let token = headers
        .get(AUTHORIZATION)
        .ok_or(StatusCode::INTERNAL_SERVER_ERROR)?
        .to_str()
        .or(Err(StatusCode::INTERNAL_SERVER_ERROR))?
        .replace("Bearer ", "");

    sqlx::query("DELETE FROM sessions WHERE token = ?")
        .bind(&token)
        .execute(&state.pool)
        .await
        .or(Err(StatusCode::INTERNAL_SERVER_ERROR))?;

    Ok(StatusCode::OK)
}
