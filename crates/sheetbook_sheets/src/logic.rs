// --- File: crates/sheetbook_sheets/src/logic.rs ---
use serde::{Deserialize, Serialize};
use sheetbook_common::{
    external_service_error, forbidden, internal_error, validation_error, HttpStatusCode,
    SheetbookError, SheetsApiError, SpreadsheetConnector, SpreadsheetService, WorksheetProperties,
};
use sheetbook_config::{AppConfig, ValueInputOption};
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Row 1 of the bookings worksheet.
pub const HEADER_ROW: [&str; 4] = ["Name", "Phone Number", "When", "Where"];

/// Validated in this order; the first missing one is reported.
pub const REQUIRED_FIELDS: [&str; 4] = ["name", "phone", "time", "location"];

pub const NEW_WORKSHEET_ROWS: u32 = 1000;
pub const NEW_WORKSHEET_COLUMNS: u32 = 10;

pub const SHEETS_API_LIBRARY_URL: &str =
    "https://console.cloud.google.com/apis/library/sheets.googleapis.com";
pub const DRIVE_API_LIBRARY_URL: &str =
    "https://console.cloud.google.com/apis/library/drive.googleapis.com";

const NOT_ENABLED_MARKERS: [&str; 3] = [
    "API has not been used",
    "SERVICE_DISABLED",
    "sheets.googleapis.com",
];
const NOT_ENABLED_REASONS: [&str; 2] = ["SERVICE_DISABLED", "accessNotConfigured"];
const PERMISSION_MARKERS: [&str; 3] = ["Permission", "permission", "403"];

// --- Error Handling ---
#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Invalid request body: {0}")]
    InvalidBody(String),
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    /// The connector could not produce a client (credentials, TLS, ...)
    #[error(transparent)]
    Connect(SheetbookError),
    #[error("Google Spreadsheet ID not configured")]
    SpreadsheetIdNotConfigured,
    #[error("{}", api_not_enabled_message())]
    ApiNotEnabled {
        #[source]
        source: SheetsApiError,
    },
    #[error("{}", permission_denied_message(.service_account_email))]
    PermissionDenied {
        service_account_email: String,
        #[source]
        source: SheetsApiError,
    },
    #[error(transparent)]
    Sheets(#[from] SheetsApiError),
}

impl From<BookingError> for SheetbookError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::InvalidBody(_) | BookingError::MissingField(_) => {
                validation_error(err)
            }
            BookingError::Connect(inner) => inner,
            BookingError::SpreadsheetIdNotConfigured => SheetbookError::ConfigError(err.to_string()),
            BookingError::ApiNotEnabled { .. } | BookingError::PermissionDenied { .. } => {
                forbidden(err)
            }
            BookingError::Sheets(inner) => {
                let message = inner.to_string();
                if message.trim().is_empty() {
                    internal_error(format!("Unknown error: {}", inner.kind()))
                } else {
                    external_service_error("Google Sheets", message)
                }
            }
        }
    }
}

impl HttpStatusCode for BookingError {
    fn status_code(&self) -> u16 {
        match self {
            BookingError::InvalidBody(_) | BookingError::MissingField(_) => 400,
            BookingError::Connect(inner) => inner.status_code(),
            BookingError::ApiNotEnabled { .. } | BookingError::PermissionDenied { .. } => 403,
            BookingError::SpreadsheetIdNotConfigured | BookingError::Sheets(_) => 500,
        }
    }
}

pub fn api_not_enabled_message() -> String {
    format!(
        "Google Sheets API is not enabled. Please enable it:\n\n\
         1. Go to: {}\n\
         2. Select the project that owns your service account\n\
         3. Click \"Enable\"\n\
         4. Wait a few minutes for it to activate\n\
         5. Also enable Google Drive API: {}",
        SHEETS_API_LIBRARY_URL, DRIVE_API_LIBRARY_URL
    )
}

pub fn permission_denied_message(service_account_email: &str) -> String {
    format!(
        "Permission denied. Please share your Google Spreadsheet with this email: {email}\n\n\
         Steps:\n\
         1. Open your Google Spreadsheet\n\
         2. Click \"Share\" button\n\
         3. Add this email: {email}\n\
         4. Give it \"Editor\" access\n\
         5. Click \"Send\"",
        email = service_account_email
    )
}

// --- Data Structures ---
#[derive(Deserialize, Debug, Default, Clone)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BookingRequest {
    #[cfg_attr(feature = "openapi", schema(example = "Aiko Tanaka"))]
    #[serde(default)]
    pub name: Option<String>,
    #[cfg_attr(feature = "openapi", schema(example = "+81 90 1234 5678"))]
    #[serde(default)]
    pub phone: Option<String>,
    #[cfg_attr(feature = "openapi", schema(example = "2025-06-14 18:30"))]
    #[serde(default)]
    pub time: Option<String>,
    #[cfg_attr(feature = "openapi", schema(example = "Sapporo"))]
    #[serde(default)]
    pub location: Option<String>,
}

/// A booking that passed validation, in column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRow {
    pub name: String,
    pub phone: String,
    pub time: String,
    pub location: String,
}

impl BookingRow {
    pub fn into_values(self) -> Vec<String> {
        vec![self.name, self.phone, self.time, self.location]
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BookingResponse {
    pub success: bool,
    #[cfg_attr(feature = "openapi", schema(example = "Booking submitted successfully"))]
    pub message: String,
}

impl BookingResponse {
    pub fn submitted() -> Self {
        Self {
            success: true,
            message: "Booking submitted successfully".to_string(),
        }
    }
}

// --- Validation ---

fn required(value: Option<String>, field: &'static str) -> Result<String, BookingError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(BookingError::MissingField(field))
}

/// Checks the four required fields in order and stops at the first missing or empty one.
pub fn validate_booking(request: BookingRequest) -> Result<BookingRow, BookingError> {
    let [name_field, phone_field, time_field, location_field] = REQUIRED_FIELDS;
    Ok(BookingRow {
        name: required(request.name, name_field)?,
        phone: required(request.phone, phone_field)?,
        time: required(request.time, time_field)?,
        location: required(request.location, location_field)?,
    })
}

// --- A1 Notation ---

/// Quotes a worksheet title for use in an A1 range (`'O''Brien'`).
pub fn quote_worksheet_title(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

/// `'<title>'!<cells>`
pub fn a1_range(worksheet_title: &str, cells: &str) -> String {
    format!("{}!{}", quote_worksheet_title(worksheet_title), cells)
}

// --- Error Classification ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenFailure {
    ApiNotEnabled,
    PermissionDenied,
    Other,
}

/// Sorts a failure to open the spreadsheet into the three cases callers act on.
///
/// Structured fields from the provider are checked first, then the message text.
/// "Not enabled" wins over "permission denied" because Google reports a disabled API
/// as a 403.
pub fn classify_open_error(err: &SheetsApiError) -> OpenFailure {
    let (status_code, status, reason) = match err {
        SheetsApiError::Api {
            status_code,
            status,
            reason,
            ..
        } => (*status_code, status.as_deref(), reason.as_deref()),
        _ => (None, None, None),
    };
    let text = err.to_string();

    if reason.is_some_and(|r| NOT_ENABLED_REASONS.contains(&r))
        || NOT_ENABLED_MARKERS.iter().any(|m| text.contains(m))
    {
        return OpenFailure::ApiNotEnabled;
    }

    if status_code == Some(403)
        || status == Some("PERMISSION_DENIED")
        || PERMISSION_MARKERS.iter().any(|m| text.contains(m))
    {
        return OpenFailure::PermissionDenied;
    }

    OpenFailure::Other
}

// --- Worksheet Resolution ---

/// Picks the worksheet named `title`, else the first one, else creates `title`.
pub async fn resolve_worksheet(
    client: &dyn SpreadsheetService,
    spreadsheet_id: &str,
    worksheets: &[WorksheetProperties],
    title: &str,
) -> Result<WorksheetProperties, SheetsApiError> {
    if let Some(worksheet) = worksheets.iter().find(|w| w.title == title) {
        return Ok(worksheet.clone());
    }

    if let Some(first) = worksheets.first() {
        info!(
            "Worksheet '{}' not found, using first worksheet '{}'",
            title, first.title
        );
        return Ok(first.clone());
    }

    info!(
        "Spreadsheet has no worksheets, creating '{}' ({}x{})",
        title, NEW_WORKSHEET_ROWS, NEW_WORKSHEET_COLUMNS
    );
    client
        .add_worksheet(
            spreadsheet_id,
            title,
            NEW_WORKSHEET_ROWS,
            NEW_WORKSHEET_COLUMNS,
        )
        .await
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderStatus {
    /// Row 1 already starts with "Name"
    Present,
    /// Row 1 was empty and the header was appended
    Appended,
    /// Row 1 held something else and was overwritten
    Overwritten,
    /// Checking or writing failed; the booking still goes ahead
    Failed,
}

fn header_values() -> Vec<String> {
    HEADER_ROW.iter().map(|h| h.to_string()).collect()
}

/// Makes sure row 1 holds the header. Never fails: problems are logged and reported as
/// `HeaderStatus::Failed`.
pub async fn ensure_header_row(
    client: &dyn SpreadsheetService,
    spreadsheet_id: &str,
    worksheet_title: &str,
) -> HeaderStatus {
    let existing = match client.row_values(spreadsheet_id, worksheet_title, 1).await {
        Ok(existing) => existing,
        Err(e) => {
            warn!("Could not check/update headers: {}", e);
            // Try to add the header anyway
            if let Err(e) = client
                .append_row(
                    spreadsheet_id,
                    worksheet_title,
                    header_values(),
                    ValueInputOption::Raw,
                )
                .await
            {
                debug!("Fallback header append failed: {}", e);
            }
            return HeaderStatus::Failed;
        }
    };

    if existing.first().map(String::as_str) == Some(HEADER_ROW[0]) {
        return HeaderStatus::Present;
    }

    let result = if existing.is_empty() {
        client
            .append_row(
                spreadsheet_id,
                worksheet_title,
                header_values(),
                ValueInputOption::Raw,
            )
            .await
            .map(|_| HeaderStatus::Appended)
    } else {
        client
            .update_range(
                spreadsheet_id,
                &a1_range(worksheet_title, "A1:D1"),
                vec![header_values()],
                ValueInputOption::Raw,
            )
            .await
            .map(|_| HeaderStatus::Overwritten)
    };

    result.unwrap_or_else(|e| {
        warn!("Could not check/update headers: {}", e);
        HeaderStatus::Failed
    })
}

// --- Booking Submission ---

/// Validates the request and appends it to the configured spreadsheet.
pub async fn submit_booking(
    config: &AppConfig,
    connector: &dyn SpreadsheetConnector,
    request: BookingRequest,
) -> Result<BookingResponse, BookingError> {
    let row = validate_booking(request)?;

    let client = connector.connect().await.map_err(BookingError::Connect)?;

    let spreadsheet_id = config
        .sheets
        .spreadsheet_id()
        .ok_or(BookingError::SpreadsheetIdNotConfigured)?;

    let worksheets = client
        .open_spreadsheet(&spreadsheet_id)
        .await
        .map_err(|source| match classify_open_error(&source) {
            OpenFailure::ApiNotEnabled => BookingError::ApiNotEnabled { source },
            OpenFailure::PermissionDenied => BookingError::PermissionDenied {
                service_account_email: client
                    .service_account_email()
                    .unwrap_or(config.sheets.fallback_service_account_email.as_str())
                    .to_string(),
                source,
            },
            OpenFailure::Other => BookingError::Sheets(source),
        })?;

    let worksheet = resolve_worksheet(
        client.as_ref(),
        &spreadsheet_id,
        &worksheets,
        &config.sheets.worksheet_title,
    )
    .await?;

    let header = ensure_header_row(client.as_ref(), &spreadsheet_id, &worksheet.title).await;
    debug!("Header row status for '{}': {:?}", worksheet.title, header);

    let values = row.into_values();
    if let Err(e) = client
        .append_row(
            &spreadsheet_id,
            &worksheet.title,
            values.clone(),
            config.sheets.value_input_option,
        )
        .await
    {
        error!("Error appending row: {}", e);
        return Err(e.into());
    }
    info!(
        "Successfully appended row to worksheet '{}': {:?}",
        worksheet.title, values
    );

    Ok(BookingResponse::submitted())
}
