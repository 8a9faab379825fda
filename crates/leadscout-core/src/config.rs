use std::path::PathBuf;

use crate::app_config::AppConfig;
use crate::ConfigError;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-3-pro-preview";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/";
pub const DEFAULT_STORAGE_PATH: &str = "./data/resto_leads.json";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: &str| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason: reason.to_string(),
    };

    // An empty key in .env means "not configured", not "use the empty string".
    let gemini_api_key = lookup("GEMINI_API_KEY")
        .ok()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty());

    let gemini_model = or_default("LEADSCOUT_GEMINI_MODEL", DEFAULT_GEMINI_MODEL);
    if gemini_model.trim().is_empty() || gemini_model.contains('/') {
        return Err(invalid(
            "LEADSCOUT_GEMINI_MODEL",
            "expected a bare model name such as gemini-3-pro-preview",
        ));
    }

    let gemini_base_url = or_default("LEADSCOUT_GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL);
    if !(gemini_base_url.starts_with("http://") || gemini_base_url.starts_with("https://")) {
        return Err(invalid(
            "LEADSCOUT_GEMINI_BASE_URL",
            "expected an http:// or https:// URL",
        ));
    }

    let storage_path = PathBuf::from(or_default("LEADSCOUT_STORAGE_PATH", DEFAULT_STORAGE_PATH));
    if storage_path.as_os_str().is_empty() {
        return Err(invalid("LEADSCOUT_STORAGE_PATH", "path must not be empty"));
    }

    let export_dir = PathBuf::from(or_default("LEADSCOUT_EXPORT_DIR", "."));
    let log_level = or_default("LEADSCOUT_LOG_LEVEL", "warn");
    let user_agent = or_default("LEADSCOUT_USER_AGENT", "leadscout/0.1 (lead-generation)");

    Ok(AppConfig {
        gemini_api_key,
        gemini_model,
        gemini_base_url,
        storage_path,
        export_dir,
        log_level,
        user_agent,
    })
}
