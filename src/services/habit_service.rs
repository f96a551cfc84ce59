//! Habit lifecycle - creation, listing with today's status, and deletion
//! with its point penalty.

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter, Set,
    TransactionTrait,
};
use serde::Serialize;

use crate::domain::DomainError;
use crate::domain::progression::{DELETION_PENALTY, apply_points_delta};
use crate::models::habit::{self, Entity as Habit, HabitDto};
use crate::models::user::{self, Entity as User};
use crate::services::checkin_service;

const HABIT_TYPES: &[&str] = &["physical", "mental", "creative", "social"];
const FREQUENCIES: &[&str] = &["daily", "weekdays", "weekly"];

/// Habit annotated with whether it was completed today.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitWithStatus {
    #[serde(flatten)]
    pub habit: habit::Model,
    pub completed_today: bool,
}

fn validate(dto: &HabitDto) -> Result<(), DomainError> {
    if dto.name.trim().is_empty() {
        return Err(DomainError::Validation("name must not be empty".into()));
    }
    if !HABIT_TYPES.contains(&dto.habit_type.as_str()) {
        return Err(DomainError::Validation(format!(
            "type must be one of {:?}, got '{}'",
            HABIT_TYPES, dto.habit_type
        )));
    }
    if !FREQUENCIES.contains(&dto.frequency.as_str()) {
        return Err(DomainError::Validation(format!(
            "frequency must be one of {:?}, got '{}'",
            FREQUENCIES, dto.frequency
        )));
    }
    Ok(())
}

pub async fn create_habit(
    db: &DatabaseConnection,
    dto: HabitDto,
) -> Result<habit::Model, DomainError> {
    validate(&dto)?;

    User::find_by_id(dto.user_id)
        .one(db)
        .await?
        .ok_or(DomainError::UserNotFound)?;

    let now = Utc::now().to_rfc3339();
    let new_habit = habit::ActiveModel {
        name: Set(dto.name),
        habit_type: Set(dto.habit_type),
        user_id: Set(dto.user_id),
        streak: Set(0),
        total_days: Set(0),
        frequency: Set(dto.frequency),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };

    let habit = new_habit.insert(db).await?;
    Ok(habit)
}

/// Lists a user's habits, each annotated with `completedToday` for `today`.
pub async fn list_habits(
    db: &DatabaseConnection,
    user_id: i32,
    today: NaiveDate,
) -> Result<Vec<HabitWithStatus>, DomainError> {
    let habits = Habit::find()
        .filter(habit::Column::UserId.eq(user_id))
        .all(db)
        .await?;

    let mut result = Vec::with_capacity(habits.len());
    for habit in habits {
        let completed_today = checkin_service::completed_on(db, habit.id, today).await?;
        result.push(HabitWithStatus {
            habit,
            completed_today,
        });
    }
    Ok(result)
}

/// Deletes a habit after an ownership check and applies the flat point
/// penalty to its owner, both in one transaction. Returns the updated owner.
///
/// The penalty is deliberately flat regardless of the habit's streak or age.
pub async fn delete_habit(
    db: &DatabaseConnection,
    habit_id: i32,
    user_id: i32,
) -> Result<user::Model, DomainError> {
    let txn = db.begin().await?;

    let habit = Habit::find_by_id(habit_id)
        .one(&txn)
        .await?
        .ok_or(DomainError::HabitNotFound)?;

    if habit.user_id != user_id {
        return Err(DomainError::Forbidden(
            "Not authorized to delete this habit".into(),
        ));
    }

    let user = User::find_by_id(user_id)
        .one(&txn)
        .await?
        .ok_or(DomainError::UserNotFound)?;

    habit.delete(&txn).await?;

    let (points, title) = apply_points_delta(user.points, DELETION_PENALTY);
    let mut user_active: user::ActiveModel = user.into();
    user_active.points = Set(points);
    user_active.title = Set(title.to_string());
    user_active.updated_at = Set(Utc::now().to_rfc3339());
    let user = user_active.update(&txn).await?;

    txn.commit().await?;
    Ok(user)
}
