// Atomic API modules
pub mod client;
pub mod error;
pub mod ext_clients;
pub mod networks;
pub mod nodes;
pub mod users;

use std::future::Future;
use std::time::Duration;

// Re-export commonly used items
pub use client::{api_call, set_silent};
pub use error::ApiError;
pub use ext_clients::{ExternalClient, ExternalClientRequest};
pub use nodes::{EgressRequest, IngressRequest, InternetGatewayRequest};

use crate::models::{IngressUsers, Network, Node, ResourceSnapshot, User};

/// Remote operations the setup wizard depends on.
///
/// The wizard is generic over this trait so it can be driven against the real
/// management API or a recording double in tests.
pub trait NetworkApi: Send + Sync {
    fn list_networks(&self) -> impl Future<Output = Result<Vec<Network>, ApiError>> + Send;

    fn list_nodes(&self, network: &str) -> impl Future<Output = Result<Vec<Node>, ApiError>> + Send;

    fn list_users(&self) -> impl Future<Output = Result<Vec<User>, ApiError>> + Send;

    fn create_ingress_node(
        &self,
        node_id: &str,
        network: &str,
        body: &IngressRequest,
    ) -> impl Future<Output = Result<Node, ApiError>> + Send;

    fn delete_egress_node(&self, node_id: &str, network: &str) -> impl Future<Output = Result<(), ApiError>> + Send;

    fn create_egress_node(
        &self,
        node_id: &str,
        network: &str,
        body: &EgressRequest,
    ) -> impl Future<Output = Result<Node, ApiError>> + Send;

    fn create_internet_gateway(
        &self,
        node_id: &str,
        network: &str,
        body: &InternetGatewayRequest,
    ) -> impl Future<Output = Result<Node, ApiError>> + Send;

    fn create_external_client(
        &self,
        node_id: &str,
        network: &str,
        body: &ExternalClientRequest,
    ) -> impl Future<Output = Result<ExternalClient, ApiError>> + Send;

    fn attach_user_to_ingress(&self, user_name: &str, node_id: &str) -> impl Future<Output = Result<(), ApiError>> + Send;

    fn remove_user_from_ingress(&self, user_name: &str, node_id: &str) -> impl Future<Output = Result<(), ApiError>> + Send;

    fn get_ingress_users(&self, node_id: &str) -> impl Future<Output = Result<IngressUsers, ApiError>> + Send;
}

/// `NetworkApi` over HTTP, talking to the configured management server.
#[derive(Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    api_base_url: String,
    api_token: String,
}

impl HttpApi {
    pub fn new(api_base_url: String, api_token: String, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .user_agent(format!("nmq/{}", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(Self {
            client,
            api_base_url,
            api_token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.api_base_url
    }
}

impl NetworkApi for HttpApi {
    async fn list_networks(&self) -> Result<Vec<Network>, ApiError> {
        networks::load_networks(&self.client, &self.api_base_url, &self.api_token).await
    }

    async fn list_nodes(&self, network: &str) -> Result<Vec<Node>, ApiError> {
        nodes::load_nodes(&self.client, &self.api_base_url, &self.api_token, network).await
    }

    async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        users::load_users(&self.client, &self.api_base_url, &self.api_token).await
    }

    async fn create_ingress_node(&self, node_id: &str, network: &str, body: &IngressRequest) -> Result<Node, ApiError> {
        nodes::create_ingress(&self.client, &self.api_base_url, &self.api_token, network, node_id, body).await
    }

    async fn delete_egress_node(&self, node_id: &str, network: &str) -> Result<(), ApiError> {
        nodes::delete_egress(&self.client, &self.api_base_url, &self.api_token, network, node_id).await
    }

    async fn create_egress_node(&self, node_id: &str, network: &str, body: &EgressRequest) -> Result<Node, ApiError> {
        nodes::create_egress(&self.client, &self.api_base_url, &self.api_token, network, node_id, body).await
    }

    async fn create_internet_gateway(
        &self,
        node_id: &str,
        network: &str,
        body: &InternetGatewayRequest,
    ) -> Result<Node, ApiError> {
        nodes::create_internet_gateway(&self.client, &self.api_base_url, &self.api_token, network, node_id, body).await
    }

    async fn create_external_client(
        &self,
        node_id: &str,
        network: &str,
        body: &ExternalClientRequest,
    ) -> Result<ExternalClient, ApiError> {
        ext_clients::create_external_client(&self.client, &self.api_base_url, &self.api_token, network, node_id, body).await
    }

    async fn attach_user_to_ingress(&self, user_name: &str, node_id: &str) -> Result<(), ApiError> {
        users::attach_user_to_ingress(&self.client, &self.api_base_url, &self.api_token, user_name, node_id).await
    }

    async fn remove_user_from_ingress(&self, user_name: &str, node_id: &str) -> Result<(), ApiError> {
        users::remove_user_from_ingress(&self.client, &self.api_base_url, &self.api_token, user_name, node_id).await
    }

    async fn get_ingress_users(&self, node_id: &str) -> Result<IngressUsers, ApiError> {
        nodes::load_ingress_users(&self.client, &self.api_base_url, &self.api_token, node_id).await
    }
}

/// Fetch networks, every network's nodes, and users into a fresh snapshot.
pub async fn load_snapshot<A: NetworkApi>(api: &A) -> Result<ResourceSnapshot, ApiError> {
    let networks = api.list_networks().await?;
    let mut nodes = Vec::new();
    for network in &networks {
        nodes.extend(api.list_nodes(&network.net_id).await?);
    }
    let users = api.list_users().await?;
    tracing::debug!(networks = networks.len(), nodes = nodes.len(), users = users.len(), "Loaded resource snapshot");
    Ok(ResourceSnapshot { networks, nodes, users })
}
