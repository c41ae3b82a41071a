use super::client::{api_call, decode, segment};
use super::error::ApiError;
use crate::models::User;

/// Load all console users
pub async fn load_users(
    client: &reqwest::Client,
    api_base_url: &str,
    api_token: &str,
) -> Result<Vec<User>, ApiError> {
    let payload = api_call(client, api_base_url, api_token, "GET", "/api/users", None, None).await?;
    if payload.is_null() {
        return Ok(Vec::new());
    }
    decode(payload)
}

fn gateway_endpoint(user_name: &str, node_id: &str) -> String {
    format!("/api/users/{}/remote_access_gw/{}", segment(user_name), segment(node_id))
}

/// Give a user access through a remote-access gateway
pub async fn attach_user_to_ingress(
    client: &reqwest::Client,
    api_base_url: &str,
    api_token: &str,
    user_name: &str,
    node_id: &str,
) -> Result<(), ApiError> {
    let endpoint = gateway_endpoint(user_name, node_id);
    api_call(client, api_base_url, api_token, "POST", &endpoint, None, None).await?;
    Ok(())
}

/// Revoke a user's access through a remote-access gateway
pub async fn remove_user_from_ingress(
    client: &reqwest::Client,
    api_base_url: &str,
    api_token: &str,
    user_name: &str,
    node_id: &str,
) -> Result<(), ApiError> {
    let endpoint = gateway_endpoint(user_name, node_id);
    api_call(client, api_base_url, api_token, "DELETE", &endpoint, None, None).await?;
    Ok(())
}
