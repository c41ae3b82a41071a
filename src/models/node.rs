use serde::{Deserialize, Serialize};

/// A network-scoped node as returned by `GET /api/nodes/{network}`.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Node {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "hostid", default)]
    pub host_id: String,
    /// Display name. Not every API version sends it, so it falls back to the host id.
    #[serde(default, alias = "hostname")]
    pub name: String,
    #[serde(default)]
    pub network: String,
    #[serde(default)]
    pub address: String,
    #[serde(rename = "isingressgateway", default)]
    pub is_ingress_gateway: bool,
    #[serde(rename = "isegressgateway", default)]
    pub is_egress_gateway: bool,
    #[serde(rename = "egressgatewayranges", default)]
    pub egress_gateway_ranges: Vec<String>,
    #[serde(rename = "isinternetgateway", default)]
    pub is_internet_gateway: bool,
}

impl Node {
    pub fn display_name(&self) -> &str {
        if !self.name.is_empty() {
            &self.name
        } else if !self.host_id.is_empty() {
            &self.host_id
        } else {
            &self.id
        }
    }
}
