use serde::{Deserialize, Serialize};

use super::{Network, Node, User};

/// Read-only view of the resources the console currently knows about.
///
/// Wizard sessions never fetch these themselves; the caller loads a snapshot,
/// hands it to the session and swaps in a fresh one between steps.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ResourceSnapshot {
    pub networks: Vec<Network>,
    pub nodes: Vec<Node>,
    pub users: Vec<User>,
}

impl ResourceSnapshot {
    pub fn network(&self, net_id: &str) -> Option<&Network> {
        self.networks.iter().find(|n| n.net_id == net_id)
    }

    pub fn node(&self, node_id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == node_id)
    }

    pub fn nodes_in<'a>(&'a self, net_id: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.nodes.iter().filter(move |n| n.network == net_id)
    }

    pub fn user(&self, user_name: &str) -> Option<&User> {
        self.users.iter().find(|u| u.user_name == user_name)
    }
}
