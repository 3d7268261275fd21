use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or saving the favorites file.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] serde_json::Error),

    /// `save` was called before `initialize` bound the store to a host.
    #[error("configuration store is not initialized")]
    NotInitialized,

    #[error("configuration store is already initialized")]
    AlreadyInitialized,
}

/// Errors reported by a teleport dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// Player not logged in, or the host cannot be queried right now.
    #[error("no current character")]
    NoCurrentCharacter,

    #[error("teleport service unavailable: {0}")]
    Unavailable(String),

    #[error("wait a moment before teleporting again")]
    CoolingDown,

    #[error("teleport rejected: {0}")]
    Rejected(String),
}

/// Errors from low-level housing queries. Never escape the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    #[error("housing instance unavailable")]
    InstanceUnavailable,

    #[error("housing query failed: {0}")]
    Query(String),
}
