//! Check-in acceptance - the state transition that drives streaks and points.
//!
//! The whole accept path runs in one transaction so that a failure can never
//! leave a check-in recorded without its point/streak effects, or vice versa.

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

use crate::domain::DomainError;
use crate::domain::progression::{
    self, COMPLETION_POINTS, STREAK_BONUS_POINTS, apply_points_delta,
};
use crate::models::check_in::{self, CheckInDto, Entity as CheckIn};
use crate::models::habit::{self, Entity as Habit};
use crate::models::user::{self, Entity as User};

/// Result of an accepted check-in: the new record plus the updated habit and
/// user, annotated with the gap to the next title at the final point total.
#[derive(Debug)]
pub struct CheckInOutcome {
    pub check_in: check_in::Model,
    pub habit: habit::Model,
    pub user: user::Model,
    pub next_title: Option<&'static str>,
    pub points_to_next_title: i32,
}

/// Whether a completed check-in exists for the habit on the given day.
pub async fn completed_on<C: ConnectionTrait>(
    conn: &C,
    habit_id: i32,
    day: NaiveDate,
) -> Result<bool, DomainError> {
    let existing = CheckIn::find()
        .filter(check_in::Column::HabitId.eq(habit_id))
        .filter(check_in::Column::Date.eq(day.format("%Y-%m-%d").to_string()))
        .filter(check_in::Column::Completed.eq(true))
        .one(conn)
        .await?;
    Ok(existing.is_some())
}

/// Records a check-in for `day`.
///
/// Rejects with [`DomainError::AlreadyCheckedIn`] if a completed check-in for
/// this habit already exists on that day. On success the habit's streak and
/// total_days are incremented, the completion award is applied, and every
/// fifth streak additionally earns the milestone bonus.
pub async fn record_check_in(
    db: &DatabaseConnection,
    dto: CheckInDto,
    day: NaiveDate,
) -> Result<CheckInOutcome, DomainError> {
    let txn = db.begin().await?;

    let habit = Habit::find_by_id(dto.habit_id)
        .one(&txn)
        .await?
        .ok_or(DomainError::HabitNotFound)?;
    let user = User::find_by_id(dto.user_id)
        .one(&txn)
        .await?
        .ok_or(DomainError::UserNotFound)?;

    if completed_on(&txn, habit.id, day).await? {
        return Err(DomainError::AlreadyCheckedIn);
    }

    let new_check_in = check_in::ActiveModel {
        habit_id: Set(habit.id),
        user_id: Set(user.id),
        date: Set(day.format("%Y-%m-%d").to_string()),
        completed: Set(dto.completed),
        ..Default::default()
    };
    // The partial unique index on (habit_id, date) backs the guard above:
    // of two racing inserts exactly one survives.
    let saved = new_check_in
        .insert(&txn)
        .await
        .map_err(DomainError::from_insert_err)?;

    let (habit, user) = if dto.completed {
        let now = Utc::now().to_rfc3339();

        let new_streak = habit.streak + 1;
        let new_total_days = habit.total_days + 1;
        let mut habit_active: habit::ActiveModel = habit.into();
        habit_active.streak = Set(new_streak);
        habit_active.total_days = Set(new_total_days);
        habit_active.updated_at = Set(now.clone());
        let habit = habit_active.update(&txn).await?;

        let (mut points, mut title) = apply_points_delta(user.points, COMPLETION_POINTS);
        if progression::is_streak_milestone(new_streak) {
            (points, title) = apply_points_delta(points, STREAK_BONUS_POINTS);
        }

        let mut user_active: user::ActiveModel = user.into();
        user_active.points = Set(points);
        user_active.title = Set(title.to_string());
        user_active.updated_at = Set(now);
        let user = user_active.update(&txn).await?;

        (habit, user)
    } else {
        (habit, user)
    };

    txn.commit().await?;

    let (next_title, points_to_next_title) = progression::next_title(user.points);

    Ok(CheckInOutcome {
        check_in: saved,
        habit,
        user,
        next_title,
        points_to_next_title,
    })
}

pub async fn list_by_user(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<Vec<check_in::Model>, DomainError> {
    let check_ins = CheckIn::find()
        .filter(check_in::Column::UserId.eq(user_id))
        .order_by_asc(check_in::Column::Date)
        .all(db)
        .await?;
    Ok(check_ins)
}

pub async fn list_by_habit(
    db: &DatabaseConnection,
    habit_id: i32,
) -> Result<Vec<check_in::Model>, DomainError> {
    let check_ins = CheckIn::find()
        .filter(check_in::Column::HabitId.eq(habit_id))
        .order_by_asc(check_in::Column::Date)
        .all(db)
        .await?;
    Ok(check_ins)
}
