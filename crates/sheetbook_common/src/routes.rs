// --- File: crates/sheetbook_common/src/routes.rs ---

use axum::{routing::get, Router};

use crate::handlers::health_handler;

/// Routes shared by every deployment. Mounted under `/api` by the backend.
pub fn routes() -> Router {
    Router::new().route("/health", get(health_handler))
}
