pub mod check_in;
pub mod habit;
pub mod session;
pub mod user;
