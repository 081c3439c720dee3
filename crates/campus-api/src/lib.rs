//! Campus API crate - axum HTTP server and route handlers.
//!
//! Exposes conversations (start, send message, transcript, context, reset,
//! delete), direct catalog browsing and a health check as JSON over HTTP.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, start_server};
pub use state::AppState;
