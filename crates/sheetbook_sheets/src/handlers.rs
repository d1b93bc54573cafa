// File: crates/sheetbook_sheets/src/handlers.rs
use crate::logic::{submit_booking, BookingError, BookingRequest, BookingResponse};
use axum::{
    extract::{rejection::JsonRejection, State},
    response::{Json, Response},
};
use sheetbook_common::{
    error_chain, map_json_error, HttpStatusCode, SheetbookError, SpreadsheetConnector,
};
use sheetbook_config::AppConfig;
use std::sync::Arc;
use tracing::{error, info};

// Shared state for the booking routes
#[derive(Clone)]
pub struct BookingState {
    pub config: Arc<AppConfig>,
    pub connector: Arc<dyn SpreadsheetConnector>,
}

fn log_booking_error(err: &BookingError) {
    if err.status_code() == 400 {
        info!("Booking request rejected: {}", err);
    } else {
        error!("Error submitting booking: {}", error_chain(err));
    }
}

/// Handler to submit a booking.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/booking", // Path relative to /api
    request_body = BookingRequest,
    responses(
        (status = 200, description = "Booking appended to the spreadsheet", body = BookingResponse),
        (status = 400, description = "Missing field or unreadable body"),
        (status = 403, description = "Sheets API disabled or spreadsheet not shared"),
        (status = 500, description = "Configuration or Google Sheets error")
    ),
    tag = "Booking"
))]
pub async fn submit_booking_handler(
    State(state): State<Arc<BookingState>>,
    payload: Result<Json<BookingRequest>, JsonRejection>,
) -> Result<Json<BookingResponse>, Response> {
    let result = match payload {
        Ok(Json(request)) => {
            submit_booking(&state.config, state.connector.as_ref(), request).await
        }
        Err(rejection) => Err(BookingError::InvalidBody(rejection.body_text())),
    };

    if let Err(err) = &result {
        log_booking_error(err);
    }

    map_json_error(result, SheetbookError::from)
}
