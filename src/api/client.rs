use serde_json::Value;
use yansi::Paint;
use std::sync::atomic::{AtomicBool, Ordering};

use super::error::ApiError;

static SILENT: AtomicBool = AtomicBool::new(false);

pub fn set_silent(silent: bool) {
    SILENT.store(silent, Ordering::Relaxed);
}

fn log_output(msg: String) {
    if !SILENT.load(Ordering::Relaxed) {
        eprintln!("{}", msg);
    }
}

/// Core HTTP client function for making API calls.
/// Handles authentication, request building, and error responses.
pub async fn api_call(
    client: &reqwest::Client,
    api_base_url: &str,
    api_token: &str,
    method: &str,
    endpoint: &str,
    body: Option<Value>,
    params: Option<Vec<(String, String)>>,
) -> Result<Value, ApiError> {
    // --- Curl Logging ---
    let mut url_for_log = format!("{}{}", api_base_url, endpoint);
    if let Some(ref p) = params {
        if !p.is_empty() {
             let query_string = p.iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<String>>()
                .join("&");
             url_for_log = format!("{}?{}", url_for_log, query_string);
        }
    }

    let mut parts = Vec::new();
    parts.push(Paint::new("curl").fg(yansi::Color::Green).bold().to_string());
    parts.push(format!("-X {}", Paint::new(method).fg(yansi::Color::Yellow).bold()));
    parts.push(format!("'{}'", Paint::new(&url_for_log).fg(yansi::Color::Cyan)));

    if !api_token.is_empty() {
        // Never echo the bearer token itself
        parts.push(format!("{} {}",
            Paint::new("-H").fg(yansi::Color::Magenta),
            Paint::new("'Authorization: Bearer ***'").fg(yansi::Color::Magenta)
        ));
    }
    if let Some(ref d) = body {
        let json_str = serde_json::to_string_pretty(d).unwrap_or_default();
        let escaped_json = json_str.replace('\'', "'\\''");
        parts.push(format!("{} {}",
            Paint::new("-H").fg(yansi::Color::Magenta),
            Paint::new("'Content-Type: application/json'").fg(yansi::Color::Magenta)
        ));
        parts.push(format!("{} {}",
            Paint::new("-d").fg(yansi::Color::Blue),
            Paint::new(format!("'{}'", escaped_json)).fg(yansi::Color::White)
        ));
    }
    log_output(format!("Request:\n{}", parts.join(" ")));
    // --------------------

    let url = format!("{}{}", api_base_url, endpoint);
    let mut req = match method {
        "GET" => client.get(&url),
        "POST" => client.post(&url),
        "PUT" => client.put(&url),
        "PATCH" => client.patch(&url),
        "DELETE" => client.delete(&url),
        _ => client.get(&url),
    };

    if !api_token.is_empty() {
        req = req.bearer_auth(api_token);
    }

    if let Some(ref p) = params {
        req = req.query(p);
    }

    if let Some(ref b) = body {
        req = req.json(b);
    }

    let resp = req.send().await.map_err(|e| {
        tracing::warn!(%e, method, endpoint, "API request failed");
        ApiError::Network(e.to_string())
    })?;
    let status = resp.status();
    let text = resp.text().await.map_err(|e| ApiError::Network(e.to_string()))?;

    // Grayed out color (dimmed/dark gray)
    log_output(format!("Response:\n{}", Paint::new(format!("HTTP {} {}", status.as_u16(), text)).rgb(100, 100, 100)));

    let payload = if text.trim().is_empty() {
        Value::Null
    } else {
        match serde_json::from_str::<Value>(&text) {
            Ok(v) => v,
            Err(_) if !status.is_success() => Value::String(text.trim().to_string()),
            Err(e) => return Err(ApiError::Decode(e.to_string())),
        }
    };

    if !status.is_success() {
        let message = extract_error_message(&payload)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());
        tracing::warn!(status = status.as_u16(), method, endpoint, %message, "API returned an error");
        return Err(ApiError::Status { status: status.as_u16(), message });
    }

    Ok(payload)
}

/// Pull a readable description out of an error body.
///
/// ```
/// use nmq::api::client::extract_error_message;
/// let body = serde_json::json!({"Code": 400, "Message": "node is already an ingress gateway"});
/// assert_eq!(extract_error_message(&body).as_deref(), Some("node is already an ingress gateway"));
/// ```
pub fn extract_error_message(payload: &Value) -> Option<String> {
    match payload {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(obj) => ["Message", "message", "error", "detail"]
            .iter()
            .find_map(|k| obj.get(*k).and_then(|v| v.as_str()))
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string()),
        _ => None,
    }
}

/// Decode an API payload into a typed value.
pub fn decode<T: serde::de::DeserializeOwned>(payload: Value) -> Result<T, ApiError> {
    serde_json::from_value(payload).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Percent-encode a single path segment.
pub fn segment(raw: &str) -> String {
    urlencoding::encode(raw).into_owned()
}
