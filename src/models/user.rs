use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct User {
    #[serde(rename = "username")]
    pub user_name: String,
    #[serde(rename = "isadmin", default)]
    pub is_admin: bool,
    #[serde(rename = "issuperadmin", default)]
    pub is_super_admin: bool,
}

/// Body of `GET /api/nodes/{node}/ingress/users`.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct IngressUsers {
    #[serde(default)]
    pub users: Vec<User>,
}
