//! HTTP inbound adapter exposing REST endpoints.

pub mod error;
pub mod fallback;
pub mod health;
pub mod state;
pub mod users;
pub mod validation;

pub use error::ApiResult;
