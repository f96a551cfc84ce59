use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Local;
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::json;

use crate::domain::DomainError;
use crate::models::habit::HabitDto;
use crate::services::habit_service;

pub async fn create_habit(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<HabitDto>,
) -> Result<impl IntoResponse, DomainError> {
    let habit = habit_service::create_habit(&db, payload).await?;
    Ok((StatusCode::CREATED, Json(habit)))
}

pub async fn list_habits(
    State(db): State<DatabaseConnection>,
    Path(user_id): Path<i32>,
) -> Result<impl IntoResponse, DomainError> {
    let today = Local::now().date_naive();
    let habits = habit_service::list_habits(&db, user_id, today).await?;
    Ok(Json(habits))
}

#[derive(Deserialize)]
pub struct DeleteHabitParams {
    #[serde(rename = "userId")]
    user_id: i32,
}

pub async fn delete_habit(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
    Query(params): Query<DeleteHabitParams>,
) -> Result<impl IntoResponse, DomainError> {
    let user = habit_service::delete_habit(&db, id, params.user_id).await?;

    Ok(Json(json!({
        "message": "Habit deleted successfully",
        "user": {
            "points": user.points,
            "title": user.title,
        }
    })))
}
