pub mod checkin_service;
pub mod habit_service;
pub mod user_service;
