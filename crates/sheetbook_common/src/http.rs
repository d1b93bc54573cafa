// --- File: crates/sheetbook_common/src/http.rs ---
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::{HttpStatusCode, SheetbookError};

/// Builds the `{ "error": "<message>" }` body used by every failing endpoint.
pub fn error_response(status_code: StatusCode, message: impl Into<String>) -> Response {
    let body = Json(json!({ "error": message.into() }));
    (status_code, body).into_response()
}

/// Extension trait for SheetbookError to convert it to an Axum HTTP response.
pub trait IntoHttpResponse {
    /// Converts the error into an Axum HTTP response.
    fn into_http_response(self) -> Response;
}

impl IntoHttpResponse for SheetbookError {
    fn into_http_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        error_response(status_code, self.to_string())
    }
}

/// Implement IntoResponse for SheetbookError to make it easier to use in Axum handlers.
impl IntoResponse for SheetbookError {
    fn into_response(self) -> Response {
        self.into_http_response()
    }
}

/// A utility function to convert a Result<T, E> to a Result<Json<T>, Response> using a custom error mapper.
pub fn map_json_error<T, E, F>(result: Result<T, E>, f: F) -> Result<Json<T>, Response>
where
    T: serde::Serialize,
    F: FnOnce(E) -> SheetbookError,
{
    result.map(Json).map_err(|err| f(err).into_response())
}
