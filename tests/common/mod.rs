//! Shared fixtures: a recording `NetworkApi` and a small mesh to run the wizard against.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use nmq::api::{
    ApiError, EgressRequest, ExternalClient, ExternalClientRequest, IngressRequest, InternetGatewayRequest, NetworkApi,
};
use nmq::models::{IngressUsers, Network, Node, ResourceSnapshot, User};
use nmq::wizard::{Catalog, WizardSession};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListNetworks,
    ListNodes(String),
    ListUsers,
    CreateIngress { node: String, network: String },
    DeleteEgress { node: String, network: String },
    CreateEgress { node: String, network: String, nat: String, ranges: Vec<String> },
    CreateInternetGateway { node: String, network: String, members: Vec<String> },
    CreateExternalClient { node: String, network: String, allowed: Vec<String> },
    AttachUser { user: String, node: String },
    RemoveUser { user: String, node: String },
    GetIngressUsers(String),
}

impl Call {
    /// Reads never change anything on the server.
    pub fn is_mutation(&self) -> bool {
        !matches!(
            self,
            Call::ListNetworks | Call::ListNodes(_) | Call::ListUsers | Call::GetIngressUsers(_)
        )
    }
}

#[derive(Default)]
struct MockState {
    calls: Vec<Call>,
    /// Calls that fail, matched by equality
    failures: Vec<Call>,
    ingress_users: HashMap<String, Vec<String>>,
}

#[derive(Clone)]
pub struct MockApi {
    snapshot: ResourceSnapshot,
    state: Arc<Mutex<MockState>>,
}

impl MockApi {
    pub fn new(snapshot: ResourceSnapshot) -> Self {
        Self {
            snapshot,
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    pub fn with_ingress_users(self, node: &str, users: &[&str]) -> Self {
        self.state
            .lock()
            .unwrap()
            .ingress_users
            .insert(node.to_string(), users.iter().map(|u| u.to_string()).collect());
        self
    }

    pub fn fail_on(&self, call: Call) {
        self.state.lock().unwrap().failures.push(call);
    }

    pub fn clear_failures(&self) {
        self.state.lock().unwrap().failures.clear();
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn mutations(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_mutation).collect()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    fn record(&self, call: Call) -> Result<(), ApiError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call.clone());
        if state.failures.contains(&call) {
            return Err(ApiError::Status {
                status: 500,
                message: "simulated failure".to_string(),
            });
        }
        Ok(())
    }

    fn node(&self, id: &str) -> Node {
        self.snapshot.node(id).cloned().unwrap_or_else(|| Node {
            id: id.to_string(),
            ..Default::default()
        })
    }
}

impl NetworkApi for MockApi {
    async fn list_networks(&self) -> Result<Vec<Network>, ApiError> {
        self.record(Call::ListNetworks)?;
        Ok(self.snapshot.networks.clone())
    }

    async fn list_nodes(&self, network: &str) -> Result<Vec<Node>, ApiError> {
        self.record(Call::ListNodes(network.to_string()))?;
        Ok(self.snapshot.nodes_in(network).cloned().collect())
    }

    async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        self.record(Call::ListUsers)?;
        Ok(self.snapshot.users.clone())
    }

    async fn create_ingress_node(&self, node_id: &str, network: &str, _body: &IngressRequest) -> Result<Node, ApiError> {
        self.record(Call::CreateIngress {
            node: node_id.to_string(),
            network: network.to_string(),
        })?;
        Ok(Node {
            is_ingress_gateway: true,
            ..self.node(node_id)
        })
    }

    async fn delete_egress_node(&self, node_id: &str, network: &str) -> Result<(), ApiError> {
        self.record(Call::DeleteEgress {
            node: node_id.to_string(),
            network: network.to_string(),
        })
    }

    async fn create_egress_node(&self, node_id: &str, network: &str, body: &EgressRequest) -> Result<Node, ApiError> {
        self.record(Call::CreateEgress {
            node: node_id.to_string(),
            network: network.to_string(),
            nat: body.nat_enabled.clone(),
            ranges: body.ranges.clone(),
        })?;
        Ok(Node {
            is_egress_gateway: true,
            egress_gateway_ranges: body.ranges.clone(),
            ..self.node(node_id)
        })
    }

    async fn create_internet_gateway(
        &self,
        node_id: &str,
        network: &str,
        body: &InternetGatewayRequest,
    ) -> Result<Node, ApiError> {
        self.record(Call::CreateInternetGateway {
            node: node_id.to_string(),
            network: network.to_string(),
            members: body.member_node_ids.clone(),
        })?;
        Ok(Node {
            is_internet_gateway: true,
            ..self.node(node_id)
        })
    }

    async fn create_external_client(
        &self,
        node_id: &str,
        network: &str,
        body: &ExternalClientRequest,
    ) -> Result<ExternalClient, ApiError> {
        self.record(Call::CreateExternalClient {
            node: node_id.to_string(),
            network: network.to_string(),
            allowed: body.extra_allowed_ips.clone().unwrap_or_default(),
        })?;
        Ok(ExternalClient {
            client_id: format!("router-{}", node_id),
            ingress_gateway_id: node_id.to_string(),
            network: network.to_string(),
        })
    }

    async fn attach_user_to_ingress(&self, user_name: &str, node_id: &str) -> Result<(), ApiError> {
        self.record(Call::AttachUser {
            user: user_name.to_string(),
            node: node_id.to_string(),
        })
    }

    async fn remove_user_from_ingress(&self, user_name: &str, node_id: &str) -> Result<(), ApiError> {
        self.record(Call::RemoveUser {
            user: user_name.to_string(),
            node: node_id.to_string(),
        })
    }

    async fn get_ingress_users(&self, node_id: &str) -> Result<IngressUsers, ApiError> {
        self.record(Call::GetIngressUsers(node_id.to_string()))?;
        let names = self
            .state
            .lock()
            .unwrap()
            .ingress_users
            .get(node_id)
            .cloned()
            .unwrap_or_default();
        Ok(IngressUsers {
            users: names
                .into_iter()
                .map(|user_name| User {
                    user_name,
                    ..Default::default()
                })
                .collect(),
        })
    }
}

/// Network `home` (10.101.0.0/16) with a plain node `n1`, an existing gateway
/// `gw1`, an existing egress `eg1`, and users alice, bob and carol.
pub fn mesh() -> ResourceSnapshot {
    ResourceSnapshot {
        networks: vec![Network {
            net_id: "home".into(),
            address_range: "10.101.0.0/16".into(),
            address_range6: String::new(),
        }],
        nodes: vec![
            Node {
                id: "n1".into(),
                name: "laptop".into(),
                network: "home".into(),
                ..Default::default()
            },
            Node {
                id: "n2".into(),
                name: "desktop".into(),
                network: "home".into(),
                ..Default::default()
            },
            Node {
                id: "gw1".into(),
                name: "edge".into(),
                network: "home".into(),
                is_ingress_gateway: true,
                ..Default::default()
            },
            Node {
                id: "eg1".into(),
                name: "office-router".into(),
                network: "home".into(),
                is_egress_gateway: true,
                egress_gateway_ranges: vec!["192.168.50.0/24".into()],
                ..Default::default()
            },
        ],
        users: ["alice", "bob", "carol"]
            .iter()
            .map(|u| User {
                user_name: u.to_string(),
                ..Default::default()
            })
            .collect(),
    }
}

pub fn session() -> WizardSession {
    WizardSession::new(Arc::new(Catalog::standard().unwrap()), mesh(), None)
}

pub fn session_for(network_id: &str) -> WizardSession {
    WizardSession::new(Arc::new(Catalog::standard().unwrap()), mesh(), Some(network_id.to_string()))
}
