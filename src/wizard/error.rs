/// Error types for the setup wizard
use thiserror::Error;

use super::models::QuestionKey;
use super::paths::PathId;
use crate::api::ApiError;
use crate::services::answer_store::StoreError;
use crate::utils::cidr::CidrError;

/// Problems with the question catalog or path tables, found at startup
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Path {path:?} references {key} which is not in the catalog")]
    MissingQuestion { path: PathId, key: QuestionKey },

    #[error("Path {path:?} lists {key} more than once")]
    DuplicateKey { path: PathId, key: QuestionKey },

    #[error("Path {0:?} has no questions")]
    EmptyPath(PathId),

    #[error("Catalog defines {0} more than once")]
    DuplicateQuestion(QuestionKey),

    /// Switching paths on this pivot would move the current question
    #[error("Pivot {key} sits at a different position in {from:?} and {to:?}")]
    MisalignedPivot { key: QuestionKey, from: PathId, to: PathId },
}

/// Errors surfaced to the operator while driving the wizard
#[derive(Debug, Error)]
pub enum WizardError {
    #[error("Please select an answer")]
    Unanswered,

    #[error("Please enter at least one range")]
    NoRanges,

    #[error("Invalid range: {0}")]
    InvalidRange(#[from] CidrError),

    #[error("Range {range} overlaps the network's own address range {reserved}")]
    RangeOverlapsNetwork { range: String, reserved: String },

    #[error("Network '{0}' was not found")]
    UnknownNetwork(String),

    #[error("A gateway cannot be one of its own clients")]
    GatewayInOwnMembers,

    #[error("No network has been selected yet")]
    MissingNetwork,

    #[error("Answer the {0} question first")]
    MissingSelection(QuestionKey),

    #[error("Failed to {action}: {}", .source.user_message())]
    Remote {
        action: &'static str,
        #[source]
        source: ApiError,
    },

    /// One call of the gateway-users batch failed; earlier calls stay applied
    #[error("Failed to {operation} user '{user_name}': {}", .source.user_message())]
    BatchFailed {
        operation: &'static str,
        user_name: String,
        #[source]
        source: ApiError,
    },

    #[error("Failed to save answers: {0}")]
    Store(#[from] StoreError),
}

impl WizardError {
    /// Local validation problems, as opposed to remote or storage failures.
    pub fn is_validation(&self) -> bool {
        !matches!(
            self,
            WizardError::Remote { .. } | WizardError::BatchFailed { .. } | WizardError::Store(_)
        )
    }

    pub(crate) fn remote(action: &'static str) -> impl FnOnce(ApiError) -> WizardError {
        move |source| WizardError::Remote { action, source }
    }
}
