use crate::AppState;
use crate::http::valid_phone_number;
use crate::models::profile::Profile;
use axum::Json;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

const MAX_BIO_LENGTH: usize = 500;

#[derive(Serialize)]
pub struct ProfileResponse {
    name: Option<String>,
    bio: Option<String>,
    phone_number: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateProfile {
    name: Option<String>,
    bio: Option<String>,
    phone_number: Option<String>,
}

async fn session_user_id(
    headers: &HeaderMap,
    state: &AppState,
) -> Result<i32, (StatusCode, Json<String>)> {
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

    let Ok((user_id,)) = sqlx::query_as::<_, (i32,)>(
        "SELECT users.id FROM users INNER JOIN sessions ON sessions.user_id = users.id
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

    Ok(user_id)
}

pub async fn profile(headers: HeaderMap, State(state): State<AppState>) -> impl IntoResponse {
    let user_id = session_user_id(&headers, &state).await?;

    let row = sqlx::query_as::<_, Profile>(
        "SELECT user_id, name, bio, phone_number FROM profiles WHERE user_id = ? LIMIT 1",
    )
    .bind(user_id)
    .fetch_optional(&state.pool)
    .await
    .or(Err((
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(String::from("Could not get profile")),
    )))?;

    let Some(profile) = row else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(String::from("Profile not found")),
        ));
    };

    Ok(Json(ProfileResponse {
        name: profile.name,
        bio: profile.bio,
        phone_number: profile.phone_number,
    }))
}

pub async fn update_profile(
    headers: HeaderMap,
    State(state): State<AppState>,
    Json(payload): Json<UpdateProfile>,
) -> impl IntoResponse {
    if let Some(ref bio) = payload.bio {
        if bio.len() > MAX_BIO_LENGTH {
            return Err((StatusCode::BAD_REQUEST, Json(String::from("Bio is too long"))));
        }
    }

    if let Some(ref phone_number) = payload.phone_number {
        if !valid_phone_number(phone_number) {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(String::from("Invalid phone number")),
            ));
        }
    }

    let user_id = session_user_id(&headers, &state).await?;

    sqlx::query(
        "INSERT INTO profiles (user_id, name, bio, phone_number) VALUES (?, ?, ?, ?)
        ON DUPLICATE KEY UPDATE name = VALUES(name), bio = VALUES(bio), phone_number = VALUES(phone_number)",
    )
    .bind(user_id)
    .bind(&payload.name)
    .bind(&payload.bio)
    .bind(&payload.phone_number)
    .execute(&state.pool)
    .await
    .or(Err((
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(String::from("Could not update profile")),
    )))?;

    Ok(Json("Profile updated successfully"))
}
