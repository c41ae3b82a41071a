use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use rand::RngCore;
use serde_json::json;

use crate::api::ApiError;
use crate::wizard::WizardError;

pub fn random_session_id() -> String {
    let mut b = [0u8; 16];
    rand::rngs::OsRng.fill_bytes(&mut b);
    hex::encode(b)
}

pub fn error_json(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

pub fn wizard_error_status(e: &WizardError) -> StatusCode {
    match e {
        WizardError::Remote { .. } | WizardError::BatchFailed { .. } => StatusCode::BAD_GATEWAY,
        WizardError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

pub fn wizard_error_response(e: &WizardError) -> Response {
    error_json(wizard_error_status(e), e.to_string())
}

pub fn api_error_response(e: &ApiError) -> Response {
    tracing::error!(%e, "Failed to load resources from the management API");
    error_json(StatusCode::BAD_GATEWAY, e.user_message())
}

pub fn session_not_found() -> Response {
    error_json(StatusCode::NOT_FOUND, "Wizard session not found")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_ids_are_hex() {
        let id = random_session_id();
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn validation_errors_are_unprocessable() {
        assert_eq!(wizard_error_status(&WizardError::Unanswered), StatusCode::UNPROCESSABLE_ENTITY);
        let remote = WizardError::Remote {
            action: "create the egress gateway",
            source: ApiError::Network("timeout".into()),
        };
        assert_eq!(wizard_error_status(&remote), StatusCode::BAD_GATEWAY);
    }
}
