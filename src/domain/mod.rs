pub mod errors;
pub mod progression;

pub use errors::DomainError;
