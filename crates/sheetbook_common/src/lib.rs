// --- File: crates/sheetbook_common/src/lib.rs ---

pub mod error; // Error handling
pub mod handlers; // Shared HTTP handlers (health)
pub mod http; // HTTP utilities
pub mod logging; // Logging utilities
pub mod routes; // Route definitions
pub mod services; // Service abstractions

// Re-export the routes function to be used by the main backend service
pub use routes::routes;

// Re-export error types and utilities for easier access
pub use error::{
    config_error, error_chain, external_service_error, forbidden, internal_error,
    validation_error, HttpStatusCode, SheetbookError,
};

// Re-export HTTP utilities for easier access
pub use http::{error_response, map_json_error, IntoHttpResponse};

pub use services::{
    BoxFuture, SheetsApiError, SpreadsheetConnector, SpreadsheetService, WorksheetProperties,
};
