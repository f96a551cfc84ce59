//! Domain error types
//!
//! These errors are framework-agnostic and represent business-level failures.
//! The HTTP mapping lives in the api layer.

use std::fmt;

#[derive(Debug)]
pub enum DomainError {
    /// User does not exist
    UserNotFound,
    /// Habit does not exist
    HabitNotFound,
    /// A completed check-in already exists for this habit today
    AlreadyCheckedIn,
    /// Validation error with field-level detail
    Validation(String),
    /// Ownership mismatch
    Forbidden(String),
    /// Database/persistence error
    Database(String),
    /// Generic internal error
    Internal(String),
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::UserNotFound => write!(f, "User not found"),
            DomainError::HabitNotFound => write!(f, "Habit not found"),
            DomainError::AlreadyCheckedIn => {
                write!(f, "Already checked in for this habit today")
            }
            DomainError::Validation(msg) => write!(f, "Validation error: {}", msg),
            DomainError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            DomainError::Database(msg) => write!(f, "Database error: {}", msg),
            DomainError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

// Conversion from SeaORM errors (used in the service layer)
impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        DomainError::Database(e.to_string())
    }
}

impl DomainError {
    /// A unique-index violation on (habit_id, date) means another writer got
    /// there first; surface it as the business error rather than a 500.
    pub fn from_insert_err(e: sea_orm::DbErr) -> Self {
        let msg = e.to_string();
        if msg.contains("UNIQUE constraint failed") {
            DomainError::AlreadyCheckedIn
        } else {
            DomainError::Database(msg)
        }
    }
}
