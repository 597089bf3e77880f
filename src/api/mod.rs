//! HTTP API layer

mod routes;
mod handlers;

pub use handlers::{ApiError, ErrorResponse, HealthResponse};
pub use routes::{create_router, ApiDoc, AppState};
