pub mod auth;
pub mod checkins;
pub mod habits;
pub mod health;
pub mod user;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use sea_orm::DatabaseConnection;
use serde_json::json;

use crate::domain::DomainError;

pub fn api_router(db: DatabaseConnection) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Auth (session cookie)
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/user", get(auth::get_me))
        // User snapshots
        .route("/user/:user_id", get(user::get_user))
        // Habits
        .route("/habits", post(habits::create_habit))
        .route("/habits/user/:user_id", get(habits::list_habits))
        .route("/habits/:id", delete(habits::delete_habit))
        // Check-ins
        .route("/checkins", post(checkins::create_check_in))
        .route("/checkins/user/:user_id", get(checkins::list_by_user))
        .route("/checkins/habit/:habit_id", get(checkins::list_by_habit))
        .with_state(db)
}

// HTTP mapping for business-level failures; handlers just use `?`.
impl IntoResponse for DomainError {
    fn into_response(self) -> Response {
        let status = match &self {
            DomainError::UserNotFound | DomainError::HabitNotFound => StatusCode::NOT_FOUND,
            DomainError::AlreadyCheckedIn | DomainError::Validation(_) => StatusCode::BAD_REQUEST,
            DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
            DomainError::Database(_) | DomainError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("request failed: {}", self);
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
