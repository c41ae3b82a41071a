use super::client::{api_call, decode};
use super::error::ApiError;
use crate::models::Network;

/// Load every network visible to the configured token
pub async fn load_networks(
    client: &reqwest::Client,
    api_base_url: &str,
    api_token: &str,
) -> Result<Vec<Network>, ApiError> {
    let payload = api_call(client, api_base_url, api_token, "GET", "/api/networks", None, None).await?;
    if payload.is_null() {
        return Ok(Vec::new());
    }
    decode(payload)
}
