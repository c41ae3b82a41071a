//! Quick-setup wizard engine.
//!
//! A [`WizardSession`] walks the operator through a branching list of
//! questions. Answers to pivot questions pick the path ([`paths`]); moving
//! past certain questions creates gateways or attaches users through the
//! [`crate::api::NetworkApi`] ([`effects`]); the final step saves the answer
//! log through an [`crate::services::answer_store::AnswerStore`].

pub mod catalog;
pub mod effects;
pub mod error;
pub mod models;
pub mod paths;
pub mod review;
pub mod session;

// Re-export commonly used items
pub use catalog::Catalog;
pub use error::{CatalogError, WizardError};
pub use models::*;
pub use paths::PathId;
pub use session::{AdvanceOutcome, WizardSession};
