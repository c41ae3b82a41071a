use serde::{Deserialize, Serialize};

use super::client::{api_call, decode, segment};
use super::error::ApiError;

/// Body of the create-external-client call
#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct ExternalClientRequest {
    #[serde(rename = "clientid", skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(rename = "publickey", skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
    #[serde(rename = "extraallowedips", skip_serializing_if = "Option::is_none")]
    pub extra_allowed_ips: Option<Vec<String>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ExternalClient {
    #[serde(rename = "clientid", default)]
    pub client_id: String,
    #[serde(rename = "ingressgatewayid", default)]
    pub ingress_gateway_id: String,
    #[serde(default)]
    pub network: String,
}

/// Create a VPN (external) client behind an ingress gateway
pub async fn create_external_client(
    client: &reqwest::Client,
    api_base_url: &str,
    api_token: &str,
    network: &str,
    node_id: &str,
    body: &ExternalClientRequest,
) -> Result<ExternalClient, ApiError> {
    let endpoint = format!("/api/extclients/{}/{}", segment(network), segment(node_id));
    let json = serde_json::to_value(body).map_err(|e| ApiError::Decode(e.to_string()))?;
    let payload = api_call(client, api_base_url, api_token, "POST", &endpoint, Some(json), None).await?;
    if payload.is_null() {
        // Older servers answer 200 with an empty body
        return Ok(ExternalClient {
            client_id: body.client_id.clone().unwrap_or_default(),
            ingress_gateway_id: node_id.to_string(),
            network: network.to_string(),
        });
    }
    decode(payload)
}
