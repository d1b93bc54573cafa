// --- File: crates/sheetbook_config/src/models.rs ---

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_WORKSHEET_TITLE: &str = "Bookings";
pub const DEFAULT_SERVICE_ACCOUNT_EMAIL: &str = "your service account email";

// --- General Server Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Verbose logging and request tracing. Set through FLASK_DEBUG=true.
    #[serde(default)]
    pub debug: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            debug: false,
        }
    }
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

/// How the Sheets API interprets submitted cell values.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueInputOption {
    /// Values are stored exactly as sent.
    Raw,
    /// Values are parsed as if typed into the UI ("3/4" may become a date).
    #[default]
    UserEntered,
}

impl ValueInputOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueInputOption::Raw => "RAW",
            ValueInputOption::UserEntered => "USER_ENTERED",
        }
    }
}

impl fmt::Display for ValueInputOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the service-account key comes from. A file path wins over inline JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    File(PathBuf),
    Inline(String),
}

// --- Google Sheets Config ---
// Secrets (credentials_json) are loaded from env vars only.
#[derive(Deserialize, Serialize, Clone)]
pub struct SheetsConfig {
    #[serde(default)]
    pub credentials_path: Option<String>, // GOOGLE_CREDENTIALS_PATH
    #[serde(default, skip_serializing)]
    pub credentials_json: Option<String>, // GOOGLE_CREDENTIALS_JSON
    #[serde(default)]
    pub spreadsheet_id: Option<String>, // GOOGLE_SPREADSHEET_ID
    #[serde(default = "default_worksheet_title")]
    pub worksheet_title: String,
    #[serde(default)]
    pub value_input_option: ValueInputOption,
    #[serde(default = "default_service_account_email")]
    pub fallback_service_account_email: String,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            credentials_path: None,
            credentials_json: None,
            spreadsheet_id: None,
            worksheet_title: default_worksheet_title(),
            value_input_option: ValueInputOption::default(),
            fallback_service_account_email: default_service_account_email(),
        }
    }
}

// credentials_json holds a private key
impl fmt::Debug for SheetsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SheetsConfig")
            .field("credentials_path", &self.credentials_path)
            .field(
                "credentials_json",
                &self.credentials_json.as_ref().map(|_| "<redacted>"),
            )
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("worksheet_title", &self.worksheet_title)
            .field("value_input_option", &self.value_input_option)
            .field(
                "fallback_service_account_email",
                &self.fallback_service_account_email,
            )
            .finish()
    }
}

fn default_worksheet_title() -> String {
    DEFAULT_WORKSHEET_TITLE.to_string()
}

fn default_service_account_email() -> String {
    DEFAULT_SERVICE_ACCOUNT_EMAIL.to_string()
}

impl SheetsConfig {
    /// The configured spreadsheet ID with any `#gid=...` fragment and surrounding
    /// whitespace removed. `None` when unset or empty.
    pub fn spreadsheet_id(&self) -> Option<String> {
        self.spreadsheet_id
            .as_deref()
            .and_then(normalize_spreadsheet_id)
    }

    pub fn credential_source(&self) -> Option<CredentialSource> {
        if let Some(path) = self.credentials_path.as_deref().filter(|p| !p.is_empty()) {
            return Some(CredentialSource::File(PathBuf::from(path)));
        }
        self.credentials_json
            .as_deref()
            .filter(|json| !json.is_empty())
            .map(|json| CredentialSource::Inline(json.to_string()))
    }
}

/// Strips a trailing URL fragment and surrounding whitespace from a spreadsheet ID.
pub fn normalize_spreadsheet_id(raw: &str) -> Option<String> {
    let id = raw.split('#').next().unwrap_or_default().trim();
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}

// --- Unified App Configuration ---
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub sheets: SheetsConfig,
}

impl AppConfig {
    /// Everything that stops the server from starting. Empty when the config is usable.
    pub fn validation_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();

        match self.sheets.credential_source() {
            None => errors
                .push("Missing GOOGLE_CREDENTIALS_PATH or GOOGLE_CREDENTIALS_JSON".to_string()),
            Some(CredentialSource::File(path)) if !path.exists() => {
                errors.push(format!("Credentials file not found: {}", path.display()))
            }
            Some(_) => {}
        }

        if self.sheets.spreadsheet_id().is_none() {
            errors.push("Missing GOOGLE_SPREADSHEET_ID".to_string());
        }

        errors
    }
}
