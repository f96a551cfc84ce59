use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use serde_json::json;

use axum::{
    extract::{FromRef, FromRequestParts, Json},
    http::{StatusCode, header::COOKIE, request::Parts},
};

use crate::domain::DomainError;
use crate::models::{session, user};

pub const SESSION_COOKIE: &str = "habithero_session";
const SESSION_DAYS: i64 = 7;

pub fn hash_password(password: &str) -> Result<String, String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| e.to_string())?
        .to_string();
    Ok(password_hash)
}

pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, String> {
    let parsed_hash = PasswordHash::new(password_hash).map_err(|e| e.to_string())?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Creates a server-side session for the user and returns its token.
pub async fn create_session(db: &DatabaseConnection, user_id: i32) -> Result<String, DomainError> {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    let token = hex::encode(bytes);

    let now = Utc::now();
    let session = session::ActiveModel {
        token: Set(token.clone()),
        user_id: Set(user_id),
        created_at: Set(now.to_rfc3339()),
        expires_at: Set((now + Duration::days(SESSION_DAYS)).to_rfc3339()),
    };
    session.insert(db).await?;

    Ok(token)
}

pub async fn destroy_session(db: &DatabaseConnection, token: &str) -> Result<(), DomainError> {
    session::Entity::delete_by_id(token.to_owned())
        .exec(db)
        .await?;
    Ok(())
}

/// `Set-Cookie` value establishing the session cookie.
pub fn session_cookie(token: &str) -> String {
    format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        SESSION_COOKIE,
        token,
        SESSION_DAYS * 24 * 60 * 60
    )
}

/// `Set-Cookie` value clearing the session cookie.
pub fn clear_session_cookie() -> String {
    format!("{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0", SESSION_COOKIE)
}

fn session_token_from_headers(parts: &Parts) -> Option<String> {
    for header in parts.headers.get_all(COOKIE) {
        let value = header.to_str().ok()?;
        for pair in value.split(';') {
            let pair = pair.trim();
            if let Some(token) = pair.strip_prefix(SESSION_COOKIE) {
                if let Some(token) = token.strip_prefix('=') {
                    return Some(token.to_string());
                }
            }
        }
    }
    None
}

/// Extractor for the authenticated user of the current session cookie.
pub struct CurrentUser {
    pub token: String,
    pub user: user::Model,
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    DatabaseConnection: FromRef<S>,
{
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let unauthorized = || {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Not authenticated" })),
            )
        };

        let db = DatabaseConnection::from_ref(state);
        let token = session_token_from_headers(parts).ok_or_else(unauthorized)?;

        let session = session::Entity::find_by_id(token.clone())
            .one(&db)
            .await
            .map_err(|_| unauthorized())?
            .ok_or_else(unauthorized)?;

        let expired = DateTime::parse_from_rfc3339(&session.expires_at)
            .map(|exp| exp.with_timezone(&Utc) < Utc::now())
            .unwrap_or(true);
        if expired {
            let _ = destroy_session(&db, &session.token).await;
            return Err(unauthorized());
        }

        let user = user::Entity::find_by_id(session.user_id)
            .one(&db)
            .await
            .map_err(|_| unauthorized())?
            .ok_or_else(unauthorized)?;

        Ok(CurrentUser { token, user })
    }
}
