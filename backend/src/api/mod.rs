//! HTTP inbound adapter: handlers, error envelope, and the auth extractor.

pub mod auth;
pub mod error;
pub mod exchanges;
pub mod health;
pub mod skills;
pub mod state;
pub mod users;

pub use error::{ApiError, ApiResult};
pub use state::AppState;
