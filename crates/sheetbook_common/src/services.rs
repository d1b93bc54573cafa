// --- File: crates/sheetbook_common/src/services.rs ---
//! Service abstractions for the spreadsheet provider.
//!
//! The booking logic talks to these traits only. The Google implementation lives in
//! `sheetbook-sheets`; tests plug in an in-memory implementation.

use sheetbook_config::ValueInputOption;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;

use crate::error::SheetbookError;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Errors reported by a spreadsheet provider.
///
/// `Api` keeps whatever structure the provider attached to the failure so callers can
/// classify it without parsing text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SheetsApiError {
    #[error("Worksheet not found: {0}")]
    WorksheetNotFound(String),

    #[error("{message}")]
    Api {
        /// HTTP status code returned by the provider
        status_code: Option<u16>,
        /// Provider status such as `PERMISSION_DENIED`
        status: Option<String>,
        /// Machine-readable reason such as `SERVICE_DISABLED`
        reason: Option<String>,
        message: String,
    },

    #[error("{0}")]
    Transport(String),

    #[error("Unexpected response: {0}")]
    InvalidResponse(String),
}

impl SheetsApiError {
    /// Short name of the variant, used when the message itself is empty.
    pub fn kind(&self) -> &'static str {
        match self {
            SheetsApiError::WorksheetNotFound(_) => "WorksheetNotFound",
            SheetsApiError::Api { .. } => "ApiError",
            SheetsApiError::Transport(_) => "TransportError",
            SheetsApiError::InvalidResponse(_) => "InvalidResponse",
        }
    }

    pub fn api(status_code: Option<u16>, message: impl Into<String>) -> Self {
        SheetsApiError::Api {
            status_code,
            status: None,
            reason: None,
            message: message.into(),
        }
    }
}

/// One worksheet (tab) of a spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorksheetProperties {
    pub sheet_id: i32,
    pub title: String,
    pub index: i32,
    pub row_count: u32,
    pub column_count: u32,
}

/// Operations the booking flow needs from a spreadsheet provider.
pub trait SpreadsheetService: Send + Sync {
    /// Email of the identity this client acts as, if known.
    fn service_account_email(&self) -> Option<&str>;

    /// Opens a spreadsheet and lists its worksheets in tab order.
    fn open_spreadsheet(
        &self,
        spreadsheet_id: &str,
    ) -> BoxFuture<'_, Vec<WorksheetProperties>, SheetsApiError>;

    /// Adds a worksheet with the given grid size.
    fn add_worksheet(
        &self,
        spreadsheet_id: &str,
        title: &str,
        rows: u32,
        columns: u32,
    ) -> BoxFuture<'_, WorksheetProperties, SheetsApiError>;

    /// Values of one row (1-based), trailing empty cells dropped.
    fn row_values(
        &self,
        spreadsheet_id: &str,
        worksheet_title: &str,
        row: u32,
    ) -> BoxFuture<'_, Vec<String>, SheetsApiError>;

    /// Overwrites an A1 range.
    fn update_range(
        &self,
        spreadsheet_id: &str,
        range: &str,
        values: Vec<Vec<String>>,
        value_input_option: ValueInputOption,
    ) -> BoxFuture<'_, (), SheetsApiError>;

    /// Appends a row after the last row with data.
    fn append_row(
        &self,
        spreadsheet_id: &str,
        worksheet_title: &str,
        values: Vec<String>,
        value_input_option: ValueInputOption,
    ) -> BoxFuture<'_, (), SheetsApiError>;
}

/// Produces an authenticated spreadsheet client. Called once per request.
pub trait SpreadsheetConnector: Send + Sync {
    fn connect(&self) -> BoxFuture<'_, Arc<dyn SpreadsheetService>, SheetbookError>;
}
