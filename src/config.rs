use std::env;
use std::path::Path;
use std::time::Duration;

// Default configuration constants
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_API_BASE_URL: &str = "";
pub const DEFAULT_API_TOKEN: &str = "";
pub const DEFAULT_ANSWERS_FILE: &str = "quick_setup_answers.json";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_SESSION_IDLE_SECS: u64 = 1800;

pub fn load_env_file(env_file: Option<&str>) {
    if let Some(path) = env_file {
        dotenvy::from_path(Path::new(path)).ok();
    } else {
        dotenvy::dotenv().ok();
    }
}

pub fn get_api_base_url() -> String {
    sanitize_base_url(&env::var("API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string()))
}

pub fn get_api_token() -> String {
    env::var("API_TOKEN").unwrap_or_else(|_| DEFAULT_API_TOKEN.to_string())
}

/// Path of the JSON file the completed answer logs are written to.
pub fn get_answers_file() -> String {
    env::var("ANSWERS_FILE")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_ANSWERS_FILE.to_string())
}

pub fn get_http_timeout() -> Duration {
    let secs = env::var("HTTP_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.trim().parse::<u64>().ok())
        .filter(|s| *s > 0)
        .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);
    Duration::from_secs(secs)
}

/// How long a wizard session served over HTTP may sit untouched.
pub fn get_session_idle_timeout() -> Duration {
    let secs = env::var("SESSION_IDLE_SECS")
        .ok()
        .and_then(|s| s.trim().parse::<u64>().ok())
        .filter(|s| *s > 0)
        .unwrap_or(DEFAULT_SESSION_IDLE_SECS);
    Duration::from_secs(secs)
}

pub fn sanitize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        "http://localhost:8081".to_string()
    } else {
        trimmed.to_string()
    }
}
