use nmq::config;
use std::env;
use std::time::Duration;

#[test]
fn test_sanitize_base_url_removes_trailing_slash() {
    assert_eq!(
        config::sanitize_base_url("https://mesh.example.com/"),
        "https://mesh.example.com"
    );
}

#[test]
fn test_sanitize_base_url_no_trailing_slash() {
    assert_eq!(
        config::sanitize_base_url("https://mesh.example.com"),
        "https://mesh.example.com"
    );
}

#[test]
fn test_sanitize_base_url_multiple_trailing_slashes() {
    assert_eq!(
        config::sanitize_base_url("https://mesh.example.com/api///"),
        "https://mesh.example.com/api"
    );
}

#[test]
fn test_sanitize_base_url_with_whitespace() {
    assert_eq!(
        config::sanitize_base_url("  https://mesh.example.com/  "),
        "https://mesh.example.com"
    );
}

#[test]
fn test_sanitize_base_url_empty_string() {
    assert_eq!(config::sanitize_base_url(""), "http://localhost:8081");
}

#[test]
fn test_sanitize_base_url_whitespace_only() {
    assert_eq!(config::sanitize_base_url("   "), "http://localhost:8081");
}

// Tests sharing an environment variable live in one function; the harness
// runs test functions in parallel.
#[test]
fn test_get_api_base_url_from_env() {
    env::set_var("API_BASE_URL", "https://mesh.example.com/");
    assert_eq!(config::get_api_base_url(), "https://mesh.example.com");

    env::set_var("API_BASE_URL", "https://mesh.example.com");
    assert_eq!(config::get_api_base_url(), "https://mesh.example.com");

    // DEFAULT_API_BASE_URL is empty, so sanitize_base_url returns the localhost fallback
    env::remove_var("API_BASE_URL");
    assert_eq!(config::get_api_base_url(), "http://localhost:8081");
}

#[test]
fn test_get_answers_file() {
    env::set_var("ANSWERS_FILE", "  /var/lib/nmq/answers.json ");
    assert_eq!(config::get_answers_file(), "/var/lib/nmq/answers.json");

    env::set_var("ANSWERS_FILE", "   ");
    assert_eq!(config::get_answers_file(), config::DEFAULT_ANSWERS_FILE);

    env::remove_var("ANSWERS_FILE");
    assert_eq!(config::get_answers_file(), config::DEFAULT_ANSWERS_FILE);
}

#[test]
fn test_get_http_timeout() {
    env::set_var("HTTP_TIMEOUT_SECS", "5");
    assert_eq!(config::get_http_timeout(), Duration::from_secs(5));

    // Zero and garbage fall back to the default
    env::set_var("HTTP_TIMEOUT_SECS", "0");
    assert_eq!(config::get_http_timeout(), Duration::from_secs(config::DEFAULT_HTTP_TIMEOUT_SECS));
    env::set_var("HTTP_TIMEOUT_SECS", "soon");
    assert_eq!(config::get_http_timeout(), Duration::from_secs(config::DEFAULT_HTTP_TIMEOUT_SECS));

    env::remove_var("HTTP_TIMEOUT_SECS");
}

#[test]
fn test_get_session_idle_timeout() {
    env::set_var("SESSION_IDLE_SECS", "90");
    assert_eq!(config::get_session_idle_timeout(), Duration::from_secs(90));

    env::set_var("SESSION_IDLE_SECS", "0");
    assert_eq!(
        config::get_session_idle_timeout(),
        Duration::from_secs(config::DEFAULT_SESSION_IDLE_SECS)
    );

    env::remove_var("SESSION_IDLE_SECS");
    assert_eq!(
        config::get_session_idle_timeout(),
        Duration::from_secs(config::DEFAULT_SESSION_IDLE_SECS)
    );
}
