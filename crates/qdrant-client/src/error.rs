//! Error types for the vector-search client.

use thiserror::Error;

use qdrant_types::DataError;

/// Errors that can occur when using the client.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Failed to connect to the service
    #[error("Connection failed: {0}")]
    Connection(#[from] tonic::transport::Error),

    /// RPC call failed (network fault, deadline, cancellation or rejection)
    #[error("RPC failed: {0}")]
    Rpc(#[from] tonic::Status),

    /// Invalid endpoint URL
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Request rejected locally before it was sent
    #[error(transparent)]
    Data(#[from] DataError),
}

impl ClientError {
    /// The gRPC status of a failed call, if the failure came from the call.
    pub fn status(&self) -> Option<&tonic::Status> {
        match self {
            ClientError::Rpc(status) => Some(status),
            _ => None,
        }
    }
}
