use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use sea_orm::DatabaseConnection;

use crate::domain::DomainError;
use crate::services::user_service::{self, UserSnapshot};

pub async fn get_user(
    State(db): State<DatabaseConnection>,
    Path(user_id): Path<i32>,
) -> Result<impl IntoResponse, DomainError> {
    let user = user_service::get_user(&db, user_id)
        .await?
        .ok_or(DomainError::UserNotFound)?;

    Ok(Json(UserSnapshot::from(&user)))
}
