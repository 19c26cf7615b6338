//! Error types surfaced to callers.
//!
//! Translation never fails from the caller's point of view; these are the
//! few failures that do escape: binding construction and provider setup.

use thiserror::Error;

/// Failure to create an accessor for a contract.
#[derive(Debug, Error)]
pub enum BindError {
    /// Every binding context refused the contract. `source` is the first
    /// refusal.
    #[error("no binding context could bind contract `{contract}` ({attempts} tried)")]
    Unbindable {
        contract: String,
        attempts: usize,
        #[source]
        source: Box<BindError>,
    },

    #[error("contract `{contract}` declares operation `{operation}` more than once")]
    DuplicateOperation { contract: String, operation: String },

    #[error("contract `{contract}` declares an operation with an empty name")]
    EmptyOperationName { contract: String },

    #[error("operation `{operation}` of contract `{contract}` declares an empty alias")]
    EmptyAlias { contract: String, operation: String },

    #[error("binding context `{context}` does not accept contract `{contract}`")]
    Rejected { context: String, contract: String },
}

/// Failure to construct or load a data provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("a compound provider needs at least one delegate")]
    EmptyCompound,

    #[error("compound provider delegate {index} is missing")]
    MissingDelegate { index: usize },

    #[error("malformed properties at line {line}: {message}")]
    Properties { line: usize, message: String },

    #[error("malformed TOML source: {0}")]
    Toml(#[from] toml::de::Error),
}
