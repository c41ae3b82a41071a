pub mod app_state;
pub mod network;
pub mod node;
pub mod snapshot;
pub mod user;

pub use app_state::AppState;
pub use network::Network;
pub use node::Node;
pub use snapshot::ResourceSnapshot;
pub use user::{IngressUsers, User};
