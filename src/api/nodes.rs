use serde::Serialize;
use serde_json::Value;

use super::client::{api_call, decode, segment};
use super::error::ApiError;
use crate::models::{IngressUsers, Node};

/// Body of the create-ingress call
#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct IngressRequest {
    #[serde(rename = "extclientdns")]
    pub dns: String,
    pub is_internet_gw: bool,
    pub metadata: String,
}

/// Body of the create-egress call
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct EgressRequest {
    #[serde(rename = "natenabled")]
    pub nat_enabled: String,
    pub ranges: Vec<String>,
}

/// Body of the create-internet-gateway call
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct InternetGatewayRequest {
    #[serde(rename = "inet_node_client_ids")]
    pub member_node_ids: Vec<String>,
}

fn node_endpoint(network: &str, node_id: &str, action: &str) -> String {
    format!("/api/nodes/{}/{}/{}", segment(network), segment(node_id), action)
}

fn to_json<T: Serialize>(body: &T) -> Result<Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Gateway calls answer with the updated node; some servers send nothing.
fn decode_node(payload: Value, node_id: &str) -> Result<Node, ApiError> {
    if payload.is_null() {
        return Ok(Node {
            id: node_id.to_string(),
            ..Default::default()
        });
    }
    decode(payload)
}

/// Load the nodes of a network
pub async fn load_nodes(
    client: &reqwest::Client,
    api_base_url: &str,
    api_token: &str,
    network: &str,
) -> Result<Vec<Node>, ApiError> {
    let endpoint = format!("/api/nodes/{}", segment(network));
    let payload = api_call(client, api_base_url, api_token, "GET", &endpoint, None, None).await?;
    if payload.is_null() {
        return Ok(Vec::new());
    }
    decode(payload)
}

/// Turn a node into a remote-access (ingress) gateway
pub async fn create_ingress(
    client: &reqwest::Client,
    api_base_url: &str,
    api_token: &str,
    network: &str,
    node_id: &str,
    body: &IngressRequest,
) -> Result<Node, ApiError> {
    let endpoint = node_endpoint(network, node_id, "createingress");
    let payload = api_call(client, api_base_url, api_token, "POST", &endpoint, Some(to_json(body)?), None).await?;
    decode_node(payload, node_id)
}

/// Remove the egress role from a node
pub async fn delete_egress(
    client: &reqwest::Client,
    api_base_url: &str,
    api_token: &str,
    network: &str,
    node_id: &str,
) -> Result<(), ApiError> {
    let endpoint = node_endpoint(network, node_id, "deletegateway");
    api_call(client, api_base_url, api_token, "DELETE", &endpoint, None, None).await?;
    Ok(())
}

/// Turn a node into an egress gateway for the given ranges
pub async fn create_egress(
    client: &reqwest::Client,
    api_base_url: &str,
    api_token: &str,
    network: &str,
    node_id: &str,
    body: &EgressRequest,
) -> Result<Node, ApiError> {
    let endpoint = node_endpoint(network, node_id, "creategateway");
    let payload = api_call(client, api_base_url, api_token, "POST", &endpoint, Some(to_json(body)?), None).await?;
    decode_node(payload, node_id)
}

/// Turn a node into an internet gateway for the member nodes
pub async fn create_internet_gateway(
    client: &reqwest::Client,
    api_base_url: &str,
    api_token: &str,
    network: &str,
    node_id: &str,
    body: &InternetGatewayRequest,
) -> Result<Node, ApiError> {
    let endpoint = node_endpoint(network, node_id, "inet_gw");
    let payload = api_call(client, api_base_url, api_token, "POST", &endpoint, Some(to_json(body)?), None).await?;
    decode_node(payload, node_id)
}

/// Users attached to a remote-access gateway
pub async fn load_ingress_users(
    client: &reqwest::Client,
    api_base_url: &str,
    api_token: &str,
    node_id: &str,
) -> Result<IngressUsers, ApiError> {
    let endpoint = format!("/api/nodes/{}/ingress/users", segment(node_id));
    let payload = api_call(client, api_base_url, api_token, "GET", &endpoint, None, None).await?;
    if payload.is_null() {
        return Ok(IngressUsers::default());
    }
    decode(payload)
}
