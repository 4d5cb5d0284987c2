use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_PLACES_BASE_URL: &str =
    "https://maps.googleapis.com/maps/api/place/textsearch/json";

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; LocalSEOAuditor/1.0)";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
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
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::{IpAddr, SocketAddr};

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    // Timeouts must be positive; a zero deadline fails every request.
    let parse_secs = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let secs = or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if secs == 0 {
            return Err(invalid(var, "must be greater than zero".to_string()));
        }
        Ok(secs)
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("LOCALSEO_ENV", "development"));

    let host = or_default("LOCALSEO_HOST", "0.0.0.0")
        .parse::<IpAddr>()
        .map_err(|e| invalid("LOCALSEO_HOST", e.to_string()))?;
    let port = or_default("LOCALSEO_PORT", "3000")
        .parse::<u16>()
        .map_err(|e| invalid("LOCALSEO_PORT", e.to_string()))?;
    let bind_addr = SocketAddr::new(host, port);

    let log_level = or_default("LOCALSEO_LOG_LEVEL", "info");

    // An empty key is treated the same as an absent one.
    let places_api_key = lookup("GOOGLE_PLACES_API_KEY")
        .ok()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty());
    let places_base_url = or_default("LOCALSEO_PLACES_BASE_URL", DEFAULT_PLACES_BASE_URL);
    let places_timeout_secs = parse_secs("LOCALSEO_PLACES_TIMEOUT_SECS", "10")?;

    let fetch_timeout_secs = parse_secs("LOCALSEO_FETCH_TIMEOUT_SECS", "15")?;
    let fetch_max_redirects = parse_usize("LOCALSEO_FETCH_MAX_REDIRECTS", "5")?;
    let user_agent = or_default("LOCALSEO_USER_AGENT", DEFAULT_USER_AGENT);
    let analysis_timeout_secs = parse_secs("LOCALSEO_ANALYSIS_TIMEOUT_SECS", "60")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        places_api_key,
        places_base_url,
        places_timeout_secs,
        fetch_timeout_secs,
        fetch_max_redirects,
        user_agent,
        analysis_timeout_secs,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}
