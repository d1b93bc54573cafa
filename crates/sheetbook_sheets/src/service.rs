// --- File: crates/sheetbook_sheets/src/service.rs ---
//! Google Sheets service implementation.
//!
//! This module provides the `SpreadsheetService` and `SpreadsheetConnector`
//! implementations backed by the Google Sheets v4 API.

use google_sheets4::api::{
    AddSheetRequest, BatchUpdateSpreadsheetRequest, GridProperties, Request as SheetRequest,
    SheetProperties, ValueRange,
};
use serde_json::Value;
use sheetbook_common::{
    BoxFuture, SheetbookError, SheetsApiError, SpreadsheetConnector, SpreadsheetService,
    WorksheetProperties,
};
use sheetbook_config::{AppConfig, ValueInputOption};
use std::sync::Arc;
use tracing::debug;

use crate::auth::{create_sheets_hub, load_service_account_key, HubType, SCOPES};
use crate::logic::a1_range;

/// Google Sheets service implementation.
pub struct GoogleSheetsService {
    hub: HubType,
    service_account_email: String,
}

impl GoogleSheetsService {
    /// Create a new Google Sheets service.
    pub fn new(hub: HubType, service_account_email: String) -> Self {
        Self {
            hub,
            service_account_email,
        }
    }
}

/// Converts a `google_sheets4` error into the provider-neutral error.
///
/// Google answers most failures with a JSON body of the form
/// `{"error": {"code": 403, "status": "PERMISSION_DENIED", "message": "...", "details": [...]}}`;
/// those fields are kept so the caller does not have to parse the message.
pub fn map_api_error(err: google_sheets4::Error) -> SheetsApiError {
    match err {
        google_sheets4::Error::BadRequest(body) => api_error_from_body(&body),
        google_sheets4::Error::Failure(response) => {
            api_error_from_status(response.status().as_u16())
        }
        other => SheetsApiError::Transport(other.to_string()),
    }
}

/// A failure that came back as a bare HTTP status, without a JSON error body.
pub fn api_error_from_status(status_code: u16) -> SheetsApiError {
    SheetsApiError::api(
        Some(status_code),
        format!("Request failed with status {}", status_code),
    )
}

pub fn api_error_from_body(body: &Value) -> SheetsApiError {
    let error = &body["error"];

    let status_code = error["code"].as_u64().and_then(|c| u16::try_from(c).ok());
    let status = error["status"].as_str().map(str::to_string);
    let reason = error["details"]
        .as_array()
        .and_then(|details| details.iter().find_map(|d| d["reason"].as_str()))
        .or_else(|| error["errors"][0]["reason"].as_str())
        .map(str::to_string);
    let message = error["message"]
        .as_str()
        .map(str::to_string)
        .unwrap_or_else(|| body.to_string());

    SheetsApiError::Api {
        status_code,
        status,
        reason,
        message,
    }
}

fn worksheet_from_properties(properties: SheetProperties) -> WorksheetProperties {
    let grid = properties.grid_properties.unwrap_or_default();
    WorksheetProperties {
        sheet_id: properties.sheet_id.unwrap_or_default(),
        title: properties.title.unwrap_or_default(),
        index: properties.index.unwrap_or_default(),
        row_count: grid.row_count.unwrap_or_default().max(0) as u32,
        column_count: grid.column_count.unwrap_or_default().max(0) as u32,
    }
}

fn cell_to_string(cell: Value) -> String {
    match cell {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn to_value_range(range: &str, rows: Vec<Vec<String>>) -> ValueRange {
    ValueRange {
        major_dimension: Some("ROWS".to_string()),
        range: Some(range.to_string()),
        values: Some(
            rows.into_iter()
                .map(|row| row.into_iter().map(Value::String).collect())
                .collect(),
        ),
    }
}

impl SpreadsheetService for GoogleSheetsService {
    fn service_account_email(&self) -> Option<&str> {
        Some(self.service_account_email.as_str())
    }

    fn open_spreadsheet(
        &self,
        spreadsheet_id: &str,
    ) -> BoxFuture<'_, Vec<WorksheetProperties>, SheetsApiError> {
        let spreadsheet_id = spreadsheet_id.to_string();

        Box::pin(async move {
            let (_, spreadsheet) = self
                .hub
                .spreadsheets()
                .get(&spreadsheet_id)
                .add_scopes(SCOPES)
                .doit()
                .await
                .map_err(map_api_error)?;

            let mut worksheets: Vec<WorksheetProperties> = spreadsheet
                .sheets
                .unwrap_or_default()
                .into_iter()
                .filter_map(|sheet| sheet.properties)
                .map(worksheet_from_properties)
                .collect();
            worksheets.sort_by_key(|w| w.index);

            debug!(
                "Opened spreadsheet {} with {} worksheet(s)",
                spreadsheet_id,
                worksheets.len()
            );
            Ok(worksheets)
        })
    }

    fn add_worksheet(
        &self,
        spreadsheet_id: &str,
        title: &str,
        rows: u32,
        columns: u32,
    ) -> BoxFuture<'_, WorksheetProperties, SheetsApiError> {
        let spreadsheet_id = spreadsheet_id.to_string();
        let title = title.to_string();

        Box::pin(async move {
            let request = BatchUpdateSpreadsheetRequest {
                requests: Some(vec![SheetRequest {
                    add_sheet: Some(AddSheetRequest {
                        properties: Some(SheetProperties {
                            title: Some(title.clone()),
                            grid_properties: Some(GridProperties {
                                row_count: Some(i32::try_from(rows).unwrap_or(i32::MAX)),
                                column_count: Some(i32::try_from(columns).unwrap_or(i32::MAX)),
                                ..Default::default()
                            }),
                            ..Default::default()
                        }),
                        ..Default::default()
                    }),
                    ..Default::default()
                }]),
                ..Default::default()
            };

            let (_, response) = self
                .hub
                .spreadsheets()
                .batch_update(request, &spreadsheet_id)
                .add_scopes(SCOPES)
                .doit()
                .await
                .map_err(map_api_error)?;

            response
                .replies
                .unwrap_or_default()
                .into_iter()
                .find_map(|reply| reply.add_sheet)
                .and_then(|added| added.properties)
                .map(worksheet_from_properties)
                .ok_or_else(|| {
                    SheetsApiError::InvalidResponse(format!(
                        "no addSheet reply for worksheet '{}'",
                        title
                    ))
                })
        })
    }

    fn row_values(
        &self,
        spreadsheet_id: &str,
        worksheet_title: &str,
        row: u32,
    ) -> BoxFuture<'_, Vec<String>, SheetsApiError> {
        let spreadsheet_id = spreadsheet_id.to_string();
        let range = a1_range(worksheet_title, &format!("{row}:{row}"));

        Box::pin(async move {
            let (_, value_range) = self
                .hub
                .spreadsheets()
                .values_get(&spreadsheet_id, &range)
                .add_scopes(SCOPES)
                .doit()
                .await
                .map_err(map_api_error)?;

            Ok(value_range
                .values
                .unwrap_or_default()
                .into_iter()
                .next()
                .unwrap_or_default()
                .into_iter()
                .map(cell_to_string)
                .collect())
        })
    }

    fn update_range(
        &self,
        spreadsheet_id: &str,
        range: &str,
        values: Vec<Vec<String>>,
        value_input_option: ValueInputOption,
    ) -> BoxFuture<'_, (), SheetsApiError> {
        let spreadsheet_id = spreadsheet_id.to_string();
        let range = range.to_string();

        Box::pin(async move {
            self.hub
                .spreadsheets()
                .values_update(to_value_range(&range, values), &spreadsheet_id, &range)
                .value_input_option(value_input_option.as_str())
                .add_scopes(SCOPES)
                .doit()
                .await
                .map(|_| ())
                .map_err(map_api_error)
        })
    }

    fn append_row(
        &self,
        spreadsheet_id: &str,
        worksheet_title: &str,
        values: Vec<String>,
        value_input_option: ValueInputOption,
    ) -> BoxFuture<'_, (), SheetsApiError> {
        let spreadsheet_id = spreadsheet_id.to_string();
        let range = a1_range(worksheet_title, "A1");

        Box::pin(async move {
            self.hub
                .spreadsheets()
                .values_append(to_value_range(&range, vec![values]), &spreadsheet_id, &range)
                .value_input_option(value_input_option.as_str())
                .add_scopes(SCOPES)
                .doit()
                .await
                .map(|_| ())
                .map_err(map_api_error)
        })
    }
}

/// Builds a fresh authenticated `GoogleSheetsService` for every request.
pub struct GoogleSheetsConnector {
    config: Arc<AppConfig>,
}

impl GoogleSheetsConnector {
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self { config }
    }
}

impl SpreadsheetConnector for GoogleSheetsConnector {
    fn connect(&self) -> BoxFuture<'_, Arc<dyn SpreadsheetService>, SheetbookError> {
        Box::pin(async move {
            let sa_key = load_service_account_key(&self.config.sheets).await?;
            let service_account_email = sa_key.client_email.clone();
            let hub = create_sheets_hub(sa_key).await?;

            let service: Arc<dyn SpreadsheetService> =
                Arc::new(GoogleSheetsService::new(hub, service_account_email));
            Ok(service)
        })
    }
}

/// In-memory spreadsheet used by the tests.
#[cfg(test)]
pub mod mock {
    use super::*;
    use crate::logic::HEADER_ROW;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn is_header(values: &[String]) -> bool {
        values.iter().map(String::as_str).eq(HEADER_ROW)
    }

    #[derive(Default)]
    struct MockState {
        worksheets: Vec<(WorksheetProperties, Vec<Vec<String>>)>,
        open_error: Option<SheetsApiError>,
        add_error: Option<SheetsApiError>,
        row_values_error: Option<SheetsApiError>,
        header_write_error: Option<SheetsApiError>,
        append_error: Option<SheetsApiError>,
        /// (worksheet, values, option) for every append, including header appends
        appends: Vec<(String, Vec<String>, ValueInputOption)>,
        /// (range, values, option) for every update
        updates: Vec<(String, Vec<Vec<String>>, ValueInputOption)>,
        opens: usize,
    }

    /// Mock spreadsheet service for testing.
    pub struct MockSpreadsheetService {
        service_account_email: Option<String>,
        state: Mutex<MockState>,
    }

    impl MockSpreadsheetService {
        pub fn new() -> Self {
            Self {
                service_account_email: Some(
                    "bookings@sheetbook-test.iam.gserviceaccount.com".to_string(),
                ),
                state: Mutex::new(MockState::default()),
            }
        }

        pub fn without_email(mut self) -> Self {
            self.service_account_email = None;
            self
        }

        pub fn with_worksheet(self, title: &str, rows: &[&[&str]]) -> Self {
            {
                let mut state = self.state.lock().unwrap();
                let index = state.worksheets.len() as i32;
                let properties = WorksheetProperties {
                    sheet_id: index * 100,
                    title: title.to_string(),
                    index,
                    row_count: 1000,
                    column_count: 26,
                };
                let rows = rows
                    .iter()
                    .map(|row| row.iter().map(|c| c.to_string()).collect())
                    .collect();
                state.worksheets.push((properties, rows));
            }
            self
        }

        pub fn fail_open(self, err: SheetsApiError) -> Self {
            self.state.lock().unwrap().open_error = Some(err);
            self
        }

        pub fn fail_add_worksheet(self, err: SheetsApiError) -> Self {
            self.state.lock().unwrap().add_error = Some(err);
            self
        }

        pub fn fail_row_values(self, err: SheetsApiError) -> Self {
            self.state.lock().unwrap().row_values_error = Some(err);
            self
        }

        /// Header writes are updates or appends whose payload is the header row.
        pub fn fail_header_writes(self, err: SheetsApiError) -> Self {
            self.state.lock().unwrap().header_write_error = Some(err);
            self
        }

        /// Data appends are appends of anything but the header row.
        pub fn fail_append(self, err: SheetsApiError) -> Self {
            self.state.lock().unwrap().append_error = Some(err);
            self
        }

        pub fn worksheet_titles(&self) -> Vec<String> {
            let state = self.state.lock().unwrap();
            state.worksheets.iter().map(|(p, _)| p.title.clone()).collect()
        }

        pub fn worksheet(&self, title: &str) -> Option<WorksheetProperties> {
            let state = self.state.lock().unwrap();
            state
                .worksheets
                .iter()
                .find(|(p, _)| p.title == title)
                .map(|(p, _)| p.clone())
        }

        pub fn rows(&self, title: &str) -> Option<Vec<Vec<String>>> {
            let state = self.state.lock().unwrap();
            state
                .worksheets
                .iter()
                .find(|(p, _)| p.title == title)
                .map(|(_, rows)| rows.clone())
        }

        pub fn appends(&self) -> Vec<(String, Vec<String>, ValueInputOption)> {
            self.state.lock().unwrap().appends.clone()
        }

        pub fn updates(&self) -> Vec<(String, Vec<Vec<String>>, ValueInputOption)> {
            self.state.lock().unwrap().updates.clone()
        }

        pub fn opens(&self) -> usize {
            self.state.lock().unwrap().opens
        }
    }

    /// Splits `'Title'!A1:D1` into the unquoted title and the 1-based start row.
    fn parse_range(range: &str) -> (String, usize) {
        let (title, cells) = range.rsplit_once('!').unwrap_or((range, "A1"));
        let title = title
            .strip_prefix('\'')
            .and_then(|t| t.strip_suffix('\''))
            .unwrap_or(title)
            .replace("''", "'");
        let start = cells.split(':').next().unwrap_or("A1");
        let row: usize = start
            .trim_start_matches(|c: char| c.is_ascii_alphabetic())
            .parse()
            .unwrap_or(1);
        (title, row.max(1))
    }

    impl SpreadsheetService for MockSpreadsheetService {
        fn service_account_email(&self) -> Option<&str> {
            self.service_account_email.as_deref()
        }

        fn open_spreadsheet(
            &self,
            _spreadsheet_id: &str,
        ) -> BoxFuture<'_, Vec<WorksheetProperties>, SheetsApiError> {
            Box::pin(async move {
                let mut state = self.state.lock().unwrap();
                state.opens += 1;
                if let Some(err) = state.open_error.clone() {
                    return Err(err);
                }
                Ok(state.worksheets.iter().map(|(p, _)| p.clone()).collect())
            })
        }

        fn add_worksheet(
            &self,
            _spreadsheet_id: &str,
            title: &str,
            rows: u32,
            columns: u32,
        ) -> BoxFuture<'_, WorksheetProperties, SheetsApiError> {
            let title = title.to_string();

            Box::pin(async move {
                let mut state = self.state.lock().unwrap();
                if let Some(err) = state.add_error.clone() {
                    return Err(err);
                }
                let index = state.worksheets.len() as i32;
                let properties = WorksheetProperties {
                    sheet_id: index * 100,
                    title,
                    index,
                    row_count: rows,
                    column_count: columns,
                };
                state.worksheets.push((properties.clone(), Vec::new()));
                Ok(properties)
            })
        }

        fn row_values(
            &self,
            _spreadsheet_id: &str,
            worksheet_title: &str,
            row: u32,
        ) -> BoxFuture<'_, Vec<String>, SheetsApiError> {
            let worksheet_title = worksheet_title.to_string();

            Box::pin(async move {
                let state = self.state.lock().unwrap();
                if let Some(err) = state.row_values_error.clone() {
                    return Err(err);
                }
                let (_, rows) = state
                    .worksheets
                    .iter()
                    .find(|(p, _)| p.title == worksheet_title)
                    .ok_or_else(|| SheetsApiError::WorksheetNotFound(worksheet_title.clone()))?;
                Ok(rows
                    .get(row.saturating_sub(1) as usize)
                    .cloned()
                    .unwrap_or_default())
            })
        }

        fn update_range(
            &self,
            _spreadsheet_id: &str,
            range: &str,
            values: Vec<Vec<String>>,
            value_input_option: ValueInputOption,
        ) -> BoxFuture<'_, (), SheetsApiError> {
            let range = range.to_string();

            Box::pin(async move {
                let mut state = self.state.lock().unwrap();
                if values.iter().any(|row| is_header(row)) {
                    if let Some(err) = state.header_write_error.clone() {
                        return Err(err);
                    }
                }
                state
                    .updates
                    .push((range.clone(), values.clone(), value_input_option));

                let (title, start_row) = parse_range(&range);
                let (_, rows) = state
                    .worksheets
                    .iter_mut()
                    .find(|(p, _)| p.title == title)
                    .ok_or_else(|| SheetsApiError::WorksheetNotFound(title.clone()))?;
                for (offset, new_row) in values.into_iter().enumerate() {
                    let target = start_row - 1 + offset;
                    if rows.len() <= target {
                        rows.resize(target + 1, Vec::new());
                    }
                    let row = &mut rows[target];
                    if row.len() < new_row.len() {
                        row.resize(new_row.len(), String::new());
                    }
                    for (i, cell) in new_row.into_iter().enumerate() {
                        row[i] = cell;
                    }
                }
                Ok(())
            })
        }

        fn append_row(
            &self,
            _spreadsheet_id: &str,
            worksheet_title: &str,
            values: Vec<String>,
            value_input_option: ValueInputOption,
        ) -> BoxFuture<'_, (), SheetsApiError> {
            let worksheet_title = worksheet_title.to_string();

            Box::pin(async move {
                let mut state = self.state.lock().unwrap();
                let injected = if is_header(&values) {
                    state.header_write_error.clone()
                } else {
                    state.append_error.clone()
                };
                if let Some(err) = injected {
                    return Err(err);
                }
                state
                    .appends
                    .push((worksheet_title.clone(), values.clone(), value_input_option));

                let (_, rows) = state
                    .worksheets
                    .iter_mut()
                    .find(|(p, _)| p.title == worksheet_title)
                    .ok_or_else(|| SheetsApiError::WorksheetNotFound(worksheet_title.clone()))?;
                rows.push(values);
                Ok(())
            })
        }
    }

    /// Hands out the same mock service on every connect and counts the calls.
    pub struct MockConnector {
        service: Arc<MockSpreadsheetService>,
        error: Option<SheetbookError>,
        connects: AtomicUsize,
    }

    impl MockConnector {
        pub fn new(service: Arc<MockSpreadsheetService>) -> Self {
            Self {
                service,
                error: None,
                connects: AtomicUsize::new(0),
            }
        }

        pub fn failing(error: SheetbookError) -> Self {
            Self {
                service: Arc::new(MockSpreadsheetService::new()),
                error: Some(error),
                connects: AtomicUsize::new(0),
            }
        }

        pub fn connects(&self) -> usize {
            self.connects.load(Ordering::SeqCst)
        }
    }

    impl SpreadsheetConnector for MockConnector {
        fn connect(&self) -> BoxFuture<'_, Arc<dyn SpreadsheetService>, SheetbookError> {
            Box::pin(async move {
                self.connects.fetch_add(1, Ordering::SeqCst);
                if let Some(err) = self.error.clone() {
                    return Err(err);
                }
                let service: Arc<dyn SpreadsheetService> = self.service.clone();
                Ok(service)
            })
        }
    }
}
