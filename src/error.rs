//! Error types for provider operations

use crate::client::PolicyApiError;
use thiserror::Error;

/// Provider operation result type
pub type Result<T> = std::result::Result<T, ProviderError>;

/// Errors surfaced to the resource provider host
#[derive(Error, Debug)]
pub enum ProviderError {
    /// A template value could not be coerced into its declared type
    #[error("invalid value for field {field}: {reason}")]
    Parse { field: &'static str, reason: String },

    /// The account has no customized password policy
    #[error("{type_name} [{identifier}] not found")]
    NotFound {
        type_name: &'static str,
        identifier: String,
    },

    /// A remote write or delete failed; never retried locally
    #[error("internal failure: {0}")]
    InternalFailure(String),

    /// A remote read failed for a reason other than "not found".
    /// Passed through unchanged so the host can apply its own retry policy.
    #[error(transparent)]
    Service(#[from] PolicyApiError),
}
