use axum::{
    Json,
    extract::State,
    http::{StatusCode, header::SET_COOKIE},
    response::IntoResponse,
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::json;

use crate::auth::{self, CurrentUser};
use crate::domain::DomainError;
use crate::services::user_service::{self, UserSnapshot};

#[derive(Deserialize)]
pub struct CredentialsRequest {
    username: String,
    password: String,
}

pub async fn register(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, DomainError> {
    let user = user_service::register(&db, &payload.username, &payload.password).await?;
    tracing::info!("Registered new user: {}", user.username);

    let token = auth::create_session(&db, user.id).await?;

    Ok((
        StatusCode::CREATED,
        [(SET_COOKIE, auth::session_cookie(&token))],
        Json(UserSnapshot::from(&user)),
    ))
}

pub async fn login(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, DomainError> {
    tracing::info!("Login attempt for user: {}", payload.username);

    let user = match user_service::authenticate(&db, &payload.username, &payload.password).await? {
        Some(user) => user,
        None => {
            tracing::warn!("Login failed for user: {}", payload.username);
            return Ok((
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Invalid credentials" })),
            )
                .into_response());
        }
    };

    let token = auth::create_session(&db, user.id).await?;

    Ok((
        StatusCode::OK,
        [(SET_COOKIE, auth::session_cookie(&token))],
        Json(UserSnapshot::from(&user)),
    )
        .into_response())
}

pub async fn get_me(current: CurrentUser) -> Json<UserSnapshot> {
    Json(UserSnapshot::from(&current.user))
}

pub async fn logout(
    State(db): State<DatabaseConnection>,
    current: CurrentUser,
) -> Result<impl IntoResponse, DomainError> {
    auth::destroy_session(&db, &current.token).await?;

    Ok((
        StatusCode::OK,
        [(SET_COOKIE, auth::clear_session_cookie())],
        Json(json!({ "message": "Logged out successfully" })),
    ))
}
