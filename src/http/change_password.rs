use crate::AppState;
use crate::password;
use axum::Json;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct ChangePassword {
    current_password: String,
    new_password: String,
}

pub async fn change_password(
    headers: HeaderMap,
    State(state): State<AppState>,
    Json(payload): Json<ChangePassword>,
) -> impl IntoResponse {
    if payload.new_password.len() < 8 {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(String::from(
                "New password must be at least 8 characters long",
            )),
        ));
    }

    if payload.current_password == payload.new_password {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(String::from(
                "New password can't be the same as the current password",
            )),
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

    let Ok((user_id, stored_password)) = sqlx::query_as::<_, (i32, String)>(
        "SELECT users.id, users.password FROM users INNER JOIN sessions ON sessions.user_id = users.id
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

    match password::verify(&payload.current_password, &stored_password) {
        Ok(true) => {}
        Ok(false) => {
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(String::from("Current password incorrect")),
            ));
        }
        Err(_) => {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(String::from("Error hashing password")),
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
            Json(String::from("Could not change password")),
        )))?;

    // Log out
    sqlx::query("DELETE FROM sessions WHERE token = ?")
        .bind(&token)
        .execute(&state.pool)
        .await
        .or(Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(String::from("Could not log out")),
        )))?;

    Ok(Json("Password changed successfully"))
}
