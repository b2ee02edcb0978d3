use crate::AppState;
use crate::password;
use crate::session;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use email_address::EmailAddress;
use serde::Deserialize;
use serde_json::json;
use sqlx::FromRow;

#[derive(Deserialize)]
pub struct Login {
    email: String,
    password: String,
}

#[derive(FromRow)]
struct LoginUser {
    id: i32,
    guid: String,
    password: String,
    verified: bool,
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<Login>,
) -> impl IntoResponse {
    if !EmailAddress::is_valid(payload.email.as_str()) {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(String::from("Invalid email address")),
        ));
    }

    let user = sqlx::query_as::<_, LoginUser>(
        "SELECT id, guid, password, verified FROM users WHERE email = ? LIMIT 1",
    )
    .bind(&payload.email)
    .fetch_optional(&state.pool)
    .await
    .or(Err((
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(String::from("Could not log in")),
    )))?;

    let Some(user) = user else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(String::from("No user found with this email")),
        ));
    };

    match password::verify(&payload.password, &user.password) {
        Ok(true) => {}
        Ok(false) => {
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(String::from("Email or password incorrect")),
            ));
        }
        Err(_) => {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(String::from("Error hashing password")),
            ));
        }
    }

    if !user.verified {
        return Err((
            StatusCode::FORBIDDEN,
            Json(String::from("Account is not verified")),
        ));
    }

    let Ok(token) = session::issue(&state.pool, user.id).await else {
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(String::from("Error creating new token")),
        ));
    };

    Ok((
        StatusCode::OK,
        Json(json!({"token": token, "user_id": user.guid})),
    ))
}
