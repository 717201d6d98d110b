use crate::app_config::{AppConfig, Environment, ExtractStrategy};
use crate::ConfigError;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

const DEFAULT_IMAGE_URL_TEMPLATE: &str =
    "https://store.storeimages.cdn-apple.com/1/as-images.apple.com/is/{key}?wid=470&hei=556&fmt=png-alpha";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid.
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
/// Returns `ConfigError` if values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("PHONECAT_ENV", "development"))?;
    let bind_addr = parse_addr("PHONECAT_BIND_ADDR", "0.0.0.0:5000")?;
    let log_level = or_default("PHONECAT_LOG_LEVEL", "info");

    let base_url = or_default("PHONECAT_BASE_URL", "https://www.apple.com")
        .trim_end_matches('/')
        .to_string();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(invalid(
            "PHONECAT_BASE_URL",
            format!("\"{base_url}\" is not an http(s) URL"),
        ));
    }

    let user_agent = or_default("PHONECAT_USER_AGENT", DEFAULT_USER_AGENT);
    let request_timeout_secs = parse_u64("PHONECAT_REQUEST_TIMEOUT_SECS", "30")?;

    let model_slugs = parse_slug_list(&or_default(
        "PHONECAT_MODEL_SLUGS",
        "iphone-16-pro,iphone-16",
    ));
    if model_slugs.is_empty() {
        return Err(invalid(
            "PHONECAT_MODEL_SLUGS",
            "at least one model slug is required".to_string(),
        ));
    }

    let bootstrap_global = or_default("PHONECAT_BOOTSTRAP_GLOBAL", "PRODUCT_SELECTION_BOOTSTRAP");
    let extract_strategy =
        parse_extract_strategy(&or_default("PHONECAT_EXTRACT_STRATEGY", "marker"))?;

    let image_url_template =
        or_default("PHONECAT_IMAGE_URL_TEMPLATE", DEFAULT_IMAGE_URL_TEMPLATE);
    if !image_url_template.contains("{key}") {
        return Err(invalid(
            "PHONECAT_IMAGE_URL_TEMPLATE",
            "template must contain a {key} placeholder".to_string(),
        ));
    }

    let locale_directory_path =
        or_default("PHONECAT_LOCALE_DIRECTORY_PATH", "/choose-country-region/");
    let availability_flag = or_default("PHONECAT_AVAILABILITY_FLAG", "buyFlowEnabled");
    let availability_concurrency = parse_usize("PHONECAT_AVAILABILITY_CONCURRENCY", "8")?.max(1);
    let availability_cron = or_default("PHONECAT_AVAILABILITY_CRON", "0 0 */6 * * *");

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        base_url,
        user_agent,
        request_timeout_secs,
        model_slugs,
        bootstrap_global,
        extract_strategy,
        image_url_template,
        locale_directory_path,
        availability_flag,
        availability_concurrency,
        availability_cron,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "production" => Ok(Environment::Production),
        "test" => Ok(Environment::Test),
        other => Err(ConfigError::InvalidEnvVar {
            var: "PHONECAT_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

fn parse_extract_strategy(s: &str) -> Result<ExtractStrategy, ConfigError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "marker" => Ok(ExtractStrategy::MarkerScan),
        "pattern" => Ok(ExtractStrategy::PatternCapture),
        other => Err(ConfigError::InvalidEnvVar {
            var: "PHONECAT_EXTRACT_STRATEGY".to_string(),
            reason: format!("expected \"marker\" or \"pattern\", got \"{other}\""),
        }),
    }
}

/// Splits a comma-separated slug list, dropping blanks and duplicates while
/// keeping first-seen order.
fn parse_slug_list(raw: &str) -> Vec<String> {
    let mut slugs: Vec<String> = Vec::new();
    for slug in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if !slugs.iter().any(|s| s == slug) {
            slugs.push(slug.to_string());
        }
    }
    slugs
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
