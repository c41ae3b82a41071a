use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Network {
    #[serde(rename = "netid")]
    pub net_id: String,
    #[serde(rename = "addressrange", default)]
    pub address_range: String,
    #[serde(rename = "addressrange6", default)]
    pub address_range6: String,
}

impl Network {
    /// Overlay address ranges owned by the network; egress ranges may not overlap these.
    pub fn reserved_ranges(&self) -> Vec<&str> {
        [self.address_range.as_str(), self.address_range6.as_str()]
            .into_iter()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .collect()
    }
}
