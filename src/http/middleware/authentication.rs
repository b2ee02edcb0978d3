use crate::AppState;
use crate::models::session::Session;
use axum::Json;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::IntoResponse;
use chrono::Utc;

pub async fn authentication(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> impl IntoResponse {
    let headers = request.headers();
    if let Some(authorization) = headers.get(AUTHORIZATION) {
        let token = authorization
            .to_str()
            .or(Err((
                StatusCode::UNAUTHORIZED,
                Json(String::from("User not logged in")),
            )))?
            .replace("Bearer ", "");

        let session = sqlx::query_as::<_, Session>(
            "SELECT id, token, valid_until, user_id FROM sessions WHERE token = ? LIMIT 1",
        )
        .bind(&token)
        .fetch_one(&state.pool)
        .await
        .or(Err((
            StatusCode::UNAUTHORIZED,
            Json(String::from("User not logged in")),
        )))?;

        if Utc::now().naive_utc() <= session.valid_until {
            Ok(next.run(request).await)
        } else {
            Err((
                StatusCode::UNAUTHORIZED,
                Json(String::from("User not logged in")),
            ))
        }
    } else {
        Err((
            StatusCode::UNAUTHORIZED,
            Json(String::from("User not logged in")),
        ))
    }
}
