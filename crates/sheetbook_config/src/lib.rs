use config::{Config, ConfigError, Environment, File, Map};
use once_cell::sync::OnceCell;
use std::env;
use std::path::Path;

pub mod env_vars;
pub mod models;
pub use models::*;

use env_vars::{CONFIG_PREFIX, CONFIG_SEPARATOR, STRING_OVERRIDES};

/// Loads the application configuration from `.env`, the optional `config/` files and the
/// process environment. Called once at startup; the result is shared behind an `Arc`.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let vars: Map<String, String> = env::vars().collect();

    load_config_from(vars, Some(Path::new("config")), &run_env)
}

/// Builds an `AppConfig` from an explicit variable map.
///
/// Precedence, lowest first: `config/default.*`, `config/<run_env>.*`,
/// `SHEETBOOK__<SECTION>__<KEY>` variables, then the plain deployment variables
/// (`GOOGLE_SPREADSHEET_ID`, `PORT`, `FLASK_DEBUG`, ...). Empty values count as unset.
pub fn load_config_from(
    vars: Map<String, String>,
    config_dir: Option<&Path>,
    run_env: &str,
) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    if let Some(dir) = config_dir {
        let default_path = dir.join("default");
        let env_path = dir.join(run_env);
        builder = builder
            .add_source(File::with_name(&default_path.to_string_lossy()).required(false))
            .add_source(File::with_name(&env_path.to_string_lossy()).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix(CONFIG_PREFIX)
            .separator(CONFIG_SEPARATOR)
            .source(Some(vars.clone())),
    );

    for (var, path) in STRING_OVERRIDES {
        builder = builder.set_override_option(path, env_vars::non_empty(&vars, var))?;
    }
    builder = builder.set_override_option("server.debug", env_vars::debug_flag(&vars))?;

    let config: AppConfig = builder.build()?.try_deserialize()?;
    tracing::debug!("Loaded configuration: {:?}", config);
    Ok(config)
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Loads the dotenv file into the process environment, once.
///
/// The path is taken from `DOTENV_OVERRIDE`, then from a first command line argument
/// starting with `.env`, and defaults to `.env`. A missing file is not an error.
/// Returns the path that was used.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path_override = env::var("DOTENV_OVERRIDE").ok();
    let dotenv_path_arg = env::args().nth(1).filter(|s| s.starts_with(".env"));

    let dotenv_path = dotenv_path_override
        .or(dotenv_path_arg)
        .unwrap_or_else(|| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        if dotenv::from_filename(&dotenv_path).is_err() {
            eprintln!(
                "Warning: {} not found. Configuration is read from the environment only.",
                dotenv_path
            );
        }
    });

    dotenv_path
}
