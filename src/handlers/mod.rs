// HTTP handlers for the relay API
pub mod calendar;
pub mod health;
pub mod search;
pub mod tutor;

pub use calendar::*;
pub use health::*;
pub use search::*;
pub use tutor::*;

// OAuth2 handlers live in src/auth/handlers.rs
