// --- File: crates/sheetbook_sheets/src/routes.rs ---

use crate::handlers::{submit_booking_handler, BookingState};
use crate::service::GoogleSheetsConnector;
use axum::{routing::post, Router};
use sheetbook_common::SpreadsheetConnector;
use sheetbook_config::AppConfig;
use std::sync::Arc;

/// Creates a router containing the booking routes, backed by Google Sheets.
///
/// Credentials are loaded per request, so a bad key shows up as a 500 on
/// `/booking` rather than preventing startup.
pub fn routes(config: Arc<AppConfig>) -> Router {
    let connector = Arc::new(GoogleSheetsConnector::new(config.clone()));
    routes_with_connector(config, connector)
}

/// Same routes with an explicit spreadsheet connector.
pub fn routes_with_connector(
    config: Arc<AppConfig>,
    connector: Arc<dyn SpreadsheetConnector>,
) -> Router {
    let state = Arc::new(BookingState { config, connector });

    Router::new()
        .route("/booking", post(submit_booking_handler))
        .with_state(state)
}
