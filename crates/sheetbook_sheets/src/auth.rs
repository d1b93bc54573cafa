// File: crates/sheetbook_sheets/src/auth.rs
use google_sheets4::{
    hyper_rustls::{self, HttpsConnectorBuilder},
    hyper_util::client::legacy::connect::HttpConnector,
    hyper_util::client::legacy::Client,
    yup_oauth2::{
        parse_service_account_key, read_service_account_key, ServiceAccountAuthenticator,
        ServiceAccountKey,
    },
    Sheets,
};
use sheetbook_common::{config_error, SheetbookError};
use sheetbook_config::{CredentialSource, SheetsConfig};
use thiserror::Error;
use tracing::debug;

/// Scopes requested for every Sheets call: spreadsheet read/write and Drive access.
pub const SCOPES: [&str; 2] = [
    "https://spreadsheets.google.com/feeds",
    "https://www.googleapis.com/auth/drive",
];

// Type aliases for clarity
type Connector = hyper_rustls::HttpsConnector<HttpConnector>;

pub type HubType = Sheets<Connector>;

#[derive(Error, Debug)]
pub enum CredentialsError {
    #[error(
        "Google credentials not found. Please set either GOOGLE_CREDENTIALS_PATH \
         (path to JSON file) or GOOGLE_CREDENTIALS_JSON (JSON string) in your .env file"
    )]
    Missing,
    #[error("Credentials file not found: {0}")]
    FileNotFound(String),
    #[error("Invalid service account key: {0}")]
    InvalidKey(#[source] std::io::Error),
    #[error("Failed to build service account authenticator: {0}")]
    Authenticator(#[source] std::io::Error),
    #[error("Failed to load TLS root certificates: {0}")]
    Tls(#[source] std::io::Error),
}

impl From<CredentialsError> for SheetbookError {
    fn from(err: CredentialsError) -> Self {
        config_error(err)
    }
}

/// Resolves the service-account key: the file path first, then inline JSON.
///
/// A configured path that does not exist fails here, before any network traffic.
pub async fn load_service_account_key(
    config: &SheetsConfig,
) -> Result<ServiceAccountKey, CredentialsError> {
    match config.credential_source() {
        Some(CredentialSource::File(path)) => {
            if !path.exists() {
                return Err(CredentialsError::FileNotFound(path.display().to_string()));
            }
            debug!("Reading service account key from {}", path.display());
            read_service_account_key(&path)
                .await
                .map_err(CredentialsError::InvalidKey)
        }
        Some(CredentialSource::Inline(json)) => {
            debug!("Parsing service account key from GOOGLE_CREDENTIALS_JSON");
            parse_service_account_key(json).map_err(CredentialsError::InvalidKey)
        }
        None => Err(CredentialsError::Missing),
    }
}

pub async fn create_sheets_hub(sa_key: ServiceAccountKey) -> Result<HubType, CredentialsError> {
    let auth = ServiceAccountAuthenticator::builder(sa_key)
        .build()
        .await
        .map_err(CredentialsError::Authenticator)?;

    let https = HttpsConnectorBuilder::new()
        .with_native_roots()
        .map_err(CredentialsError::Tls)?
        .https_or_http()
        .enable_http1()
        .build();

    // Create client without specifying body type
    let client = Client::builder(hyper_util::rt::TokioExecutor::new()).build(https);

    Ok(Sheets::new(client, auth))
}
