use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Local;
use sea_orm::DatabaseConnection;
use serde_json::json;

use crate::domain::DomainError;
use crate::models::check_in::CheckInDto;
use crate::services::checkin_service;

pub async fn create_check_in(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<CheckInDto>,
) -> Result<impl IntoResponse, DomainError> {
    let today = Local::now().date_naive();
    let outcome = checkin_service::record_check_in(&db, payload, today).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "checkIn": outcome.check_in,
            "user": {
                "points": outcome.user.points,
                "title": outcome.user.title,
                "nextTitle": outcome.next_title,
                "pointsToNextTitle": outcome.points_to_next_title,
            },
            "habit": outcome.habit,
        })),
    ))
}

pub async fn list_by_user(
    State(db): State<DatabaseConnection>,
    Path(user_id): Path<i32>,
) -> Result<impl IntoResponse, DomainError> {
    let check_ins = checkin_service::list_by_user(&db, user_id).await?;
    Ok(Json(check_ins))
}

pub async fn list_by_habit(
    State(db): State<DatabaseConnection>,
    Path(habit_id): Path<i32>,
) -> Result<impl IntoResponse, DomainError> {
    let check_ins = checkin_service::list_by_habit(&db, habit_id).await?;
    Ok(Json(check_ins))
}
