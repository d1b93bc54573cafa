//! Environment variable handling for Sheetbook.
//!
//! The deployment contract uses plain variable names (`GOOGLE_SPREADSHEET_ID`, `PORT`, ...).
//! Anything else can be set with the prefixed form `SHEETBOOK__<SECTION>__<KEY>`, which the
//! `config` crate maps onto the nested `AppConfig` structure.

use config::Map;

/// The prefix for structured configuration environment variables
pub const CONFIG_PREFIX: &str = "SHEETBOOK";

/// The separator for structured configuration environment variables
pub const CONFIG_SEPARATOR: &str = "__";

pub const GOOGLE_CREDENTIALS_PATH: &str = "GOOGLE_CREDENTIALS_PATH";
pub const GOOGLE_CREDENTIALS_JSON: &str = "GOOGLE_CREDENTIALS_JSON";
pub const GOOGLE_SPREADSHEET_ID: &str = "GOOGLE_SPREADSHEET_ID";
pub const PORT: &str = "PORT";
pub const HOST: &str = "HOST";
pub const FLASK_DEBUG: &str = "FLASK_DEBUG";

/// Plain variables and the config path they override.
pub const STRING_OVERRIDES: [(&str, &str); 5] = [
    (GOOGLE_CREDENTIALS_PATH, "sheets.credentials_path"),
    (GOOGLE_CREDENTIALS_JSON, "sheets.credentials_json"),
    (GOOGLE_SPREADSHEET_ID, "sheets.spreadsheet_id"),
    (PORT, "server.port"),
    (HOST, "server.host"),
];

/// Convert a configuration path to its prefixed environment variable name
///
/// # Arguments
///
/// * `path` - The configuration path (e.g., "sheets.worksheet_title")
///
/// # Returns
///
/// The environment variable name (e.g., "SHEETBOOK__SHEETS__WORKSHEET_TITLE")
pub fn config_path_to_env_var(path: &str) -> String {
    let path = path.replace('.', CONFIG_SEPARATOR);
    format!("{}{}{}", CONFIG_PREFIX, CONFIG_SEPARATOR, path).to_uppercase()
}

/// Look up a variable, treating an empty value as unset.
pub fn non_empty<'a>(vars: &'a Map<String, String>, name: &str) -> Option<&'a str> {
    vars.get(name).map(String::as_str).filter(|v| !v.is_empty())
}

/// `FLASK_DEBUG` enables debug mode only for the literal `true` (any case).
pub fn debug_flag(vars: &Map<String, String>) -> Option<bool> {
    non_empty(vars, FLASK_DEBUG).map(|v| v.eq_ignore_ascii_case("true"))
}
