//! User accounts and progression snapshots.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::Serialize;

use crate::auth;
use crate::domain::DomainError;
use crate::domain::progression;
use crate::models::user::{self, Entity as User};

/// User as reported by the API: points plus the derived title and the gap to
/// the next one. Never carries the password hash.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSnapshot {
    pub id: i32,
    pub username: String,
    pub points: i32,
    pub title: String,
    pub next_title: Option<&'static str>,
    pub points_to_next_title: i32,
}

impl From<&user::Model> for UserSnapshot {
    fn from(user: &user::Model) -> Self {
        let (next_title, points_to_next_title) = progression::next_title(user.points);
        UserSnapshot {
            id: user.id,
            username: user.username.clone(),
            points: user.points,
            title: user.title.clone(),
            next_title,
            points_to_next_title,
        }
    }
}

pub async fn get_user(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Option<user::Model>, DomainError> {
    let user = User::find_by_id(id).one(db).await?;
    Ok(user)
}

pub async fn register(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
) -> Result<user::Model, DomainError> {
    if username.trim().is_empty() || password.is_empty() {
        return Err(DomainError::Validation(
            "username and password are required".into(),
        ));
    }

    let existing = User::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await?;
    if existing.is_some() {
        return Err(DomainError::Validation("Username already exists".into()));
    }

    let password_hash = auth::hash_password(password).map_err(DomainError::Internal)?;

    let now = Utc::now().to_rfc3339();
    let new_user = user::ActiveModel {
        username: Set(username.to_owned()),
        password_hash: Set(password_hash),
        points: Set(0),
        title: Set(progression::title_for_points(0).to_string()),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };

    let user = new_user.insert(db).await?;
    Ok(user)
}

/// Verifies credentials; `None` means unknown user or wrong password, and the
/// caller should not distinguish the two.
pub async fn authenticate(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
) -> Result<Option<user::Model>, DomainError> {
    let user = User::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await?;

    match user {
        Some(user) => match auth::verify_password(password, &user.password_hash) {
            Ok(true) => Ok(Some(user)),
            _ => Ok(None),
        },
        None => Ok(None),
    }
}
