// File: crates/sheetbook_sheets/src/doc.rs

#![allow(dead_code)]
#![cfg(feature = "openapi")]
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

use crate::logic::{BookingRequest, BookingResponse};

/// Body of every failed request.
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "Missing required field: phone")]
    pub error: String,
}

#[utoipa::path(
    post,
    path = "/booking",
    request_body(content = BookingRequest, example = json!({
        "name": "Aiko Tanaka",
        "phone": "+81 90 1234 5678",
        "time": "2025-06-14 18:30",
        "location": "Sapporo"
    })),
    responses(
        (status = 200, description = "Booking appended to the spreadsheet", body = BookingResponse,
         example = json!({
             "success": true,
             "message": "Booking submitted successfully"
         })
        ),
        (status = 400, description = "Missing field or unreadable body", body = ErrorResponse,
         example = json!({ "error": "Missing required field: phone" })
        ),
        (status = 403, description = "Sheets API disabled or spreadsheet not shared with the service account",
         body = ErrorResponse
        ),
        (status = 500, description = "Server configuration or Google Sheets failure", body = ErrorResponse,
         example = json!({ "error": "Google Spreadsheet ID not configured" })
        )
    )
)]
fn doc_submit_booking_handler() {}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up",
         example = json!({ "status": "ok" })
        )
    )
)]
fn doc_health_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(doc_submit_booking_handler, doc_health_handler),
    components(schemas(BookingRequest, BookingResponse, ErrorResponse)),
    tags(
        (name = "booking", description = "Booking intake into Google Sheets")
    ),
    servers(
        (url = "/api", description = "Sheetbook API server")
    )
)]
pub struct SheetsApiDoc;
