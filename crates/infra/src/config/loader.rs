//! Configuration loader
//!
//! Loads the client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `OPENEDX_BASE_URL`: LMS base URL (required)
//! - `OPENEDX_CLIENT_ID`: OAuth2 client id (required)
//! - `OPENEDX_CLIENT_SECRET`: OAuth2 client secret (required)
//! - `OPENEDX_TOKEN_TYPE`: `bearer` or `jwt`
//! - `OPENEDX_OAUTH_URI`: path of the OAuth2 provider below the base URL
//! - `OPENEDX_REQUEST_TIMEOUT_SECS`: total request timeout in seconds
//! - `OPENEDX_CONNECT_TIMEOUT_MS`: connect timeout in milliseconds
//! - `OPENEDX_CLIENT_NAME`: application name for the User-Agent header
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./openedx.json` or `./openedx.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. `../../config.json` or `../../config.toml` (grandparent directory)
//! 5. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use openedx_domain::{ClientConfig, OpenedxError, Result, TokenType};

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `OpenedxError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing or invalid
pub fn load() -> Result<ClientConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `OpenedxError::Config` if a required variable is missing, an
/// optional one has an invalid value, or the result does not validate.
pub fn load_from_env() -> Result<ClientConfig> {
    let base_url = env_var("OPENEDX_BASE_URL")?;
    let client_id = env_var("OPENEDX_CLIENT_ID")?;
    let client_secret = env_var("OPENEDX_CLIENT_SECRET")?;

    let mut config = ClientConfig::new(base_url, client_id, client_secret);

    if let Some(token_type) = env_parse::<TokenType>("OPENEDX_TOKEN_TYPE")? {
        config.token_type = token_type;
    }
    if let Some(timeout) = env_parse::<u64>("OPENEDX_REQUEST_TIMEOUT_SECS")? {
        config.request_timeout_secs = timeout;
    }
    if let Some(timeout) = env_parse::<u64>("OPENEDX_CONNECT_TIMEOUT_MS")? {
        config.connect_timeout_ms = timeout;
    }
    config.oauth_uri = env_opt("OPENEDX_OAUTH_URI");
    config.client_name = env_opt("OPENEDX_CLIENT_NAME");

    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `OpenedxError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing or invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<ClientConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(OpenedxError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            OpenedxError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| OpenedxError::Config(format!("Failed to read config file: {}", e)))?;

    let mut config = parse_config(&contents, &config_path)?;
    config.base_url = config.normalized_base_url();
    config.validate()?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<ClientConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| OpenedxError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| OpenedxError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(OpenedxError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// Searches for config files in the following locations (in order):
/// 1. Current working directory (`./config.{json,toml}`,
///    `./openedx.{json,toml}`)
/// 2. Parent directories (up to 2 levels)
/// 3. Relative to executable location
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(candidates_in(&cwd));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(candidates_in(exe_dir));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn candidates_in(dir: &Path) -> Vec<PathBuf> {
    vec![
        dir.join("config.json"),
        dir.join("config.toml"),
        dir.join("openedx.json"),
        dir.join("openedx.toml"),
        dir.join("../config.json"),
        dir.join("../config.toml"),
        dir.join("../../config.json"),
        dir.join("../../config.toml"),
    ]
}

/// Get required environment variable
///
/// # Errors
/// Returns `OpenedxError::Config` if the variable is not set or blank.
fn env_var(key: &str) -> Result<String> {
    env_opt(key).ok_or_else(|| {
        OpenedxError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Optional environment variable; blank values count as unset
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Parse an optional environment variable
///
/// # Errors
/// Returns `OpenedxError::Config` if the variable is set but does not parse.
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_opt(key)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| OpenedxError::Config(format!("Invalid value for {key}: {e}")))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use once_cell::sync::Lazy;
    use tempfile::NamedTempFile;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const ALL_VARS: [&str; 8] = [
        "OPENEDX_BASE_URL",
        "OPENEDX_CLIENT_ID",
        "OPENEDX_CLIENT_SECRET",
        "OPENEDX_TOKEN_TYPE",
        "OPENEDX_OAUTH_URI",
        "OPENEDX_REQUEST_TIMEOUT_SECS",
        "OPENEDX_CONNECT_TIMEOUT_MS",
        "OPENEDX_CLIENT_NAME",
    ];

    fn clear_env() {
        for key in ALL_VARS {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_load_from_env_all_vars_set() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("OPENEDX_BASE_URL", "https://lms.example.com/");
        std::env::set_var("OPENEDX_CLIENT_ID", "client");
        std::env::set_var("OPENEDX_CLIENT_SECRET", "secret");
        std::env::set_var("OPENEDX_TOKEN_TYPE", "JWT");
        std::env::set_var("OPENEDX_OAUTH_URI", "/edx/oauth2");
        std::env::set_var("OPENEDX_REQUEST_TIMEOUT_SECS", "10");
        std::env::set_var("OPENEDX_CONNECT_TIMEOUT_MS", "500");
        std::env::set_var("OPENEDX_CLIENT_NAME", "course-sync");

        let result = load_from_env();
        assert!(result.is_ok(), "Should load config from env vars, error: {:?}", result.err());

        let config = result.unwrap();
        assert_eq!(config.base_url, "https://lms.example.com");
        assert_eq!(config.client_id, "client");
        assert_eq!(config.client_secret, "secret");
        assert_eq!(config.token_type, TokenType::Jwt);
        assert_eq!(config.oauth_uri.as_deref(), Some("/edx/oauth2"));
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.connect_timeout_ms, 500);
        assert_eq!(config.client_name.as_deref(), Some("course-sync"));

        clear_env();
    }

    #[test]
    fn test_load_from_env_missing_var() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("OPENEDX_BASE_URL", "https://lms.example.com");

        let result = load_from_env();
        assert!(matches!(result, Err(OpenedxError::Config(msg)) if msg.contains("OPENEDX_CLIENT_ID")));

        clear_env();
    }

    #[test]
    fn test_load_from_env_invalid_value() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("OPENEDX_BASE_URL", "https://lms.example.com");
        std::env::set_var("OPENEDX_CLIENT_ID", "client");
        std::env::set_var("OPENEDX_CLIENT_SECRET", "secret");
        std::env::set_var("OPENEDX_TOKEN_TYPE", "mac");

        let result = load_from_env();
        assert!(matches!(result, Err(OpenedxError::Config(_))), "Should reject token type");

        std::env::set_var("OPENEDX_TOKEN_TYPE", "bearer");
        std::env::set_var("OPENEDX_REQUEST_TIMEOUT_SECS", "soon");
        assert!(load_from_env().is_err(), "Should reject non-numeric timeout");

        clear_env();
    }

    #[test]
    fn test_load_from_file_toml() {
        let toml_content = r#"
base_url = "https://lms.example.com/"
client_id = "client"
client_secret = "secret"
token_type = "jwt"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        let path = temp_file.path().with_extension("toml");
        std::fs::copy(temp_file.path(), &path).unwrap();

        let result = load_from_file(Some(path.clone()));
        assert!(result.is_ok(), "Should load config from TOML file: {:?}", result.err());

        let config = result.unwrap();
        assert_eq!(config.base_url, "https://lms.example.com");
        assert_eq!(config.token_type, TokenType::Jwt);
        assert_eq!(config.request_timeout_secs, 30);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_not_found() {
        let result = load_from_file(Some(PathBuf::from("/nonexistent/config.json")));
        assert!(matches!(result, Err(OpenedxError::Config(_))), "Should be a Config error");
    }

    #[test]
    fn test_parse_config_json() {
        let json_content = r#"{
            "base_url": "https://lms.example.com",
            "client_id": "client",
            "client_secret": "secret",
            "oauth_uri": "/edx"
        }"#;

        let result = parse_config(json_content, &PathBuf::from("test.json"));
        assert_eq!(result.unwrap().oauth_uri.as_deref(), Some("/edx"));
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let result = parse_config("base_url: x", &PathBuf::from("test.yaml"));
        assert!(result.is_err(), "Should fail with unsupported format");
    }
}
