//! Records provider error types.

use thiserror::Error;

use crate::responses::ExceptionResponse;

/// Result type alias using ProviderError.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors that can occur in records provider operations.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Missing or invalid provider setting.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The upstream service could not be reached.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The upstream service answered with an error status.
    #[error("Query error: {0}")]
    Query(String),

    /// Malformed caller input, or the upstream rejected the query.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Identifier lookup returned nothing.
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// Search returned no usable records.
    #[error("No data: {0}")]
    NoData(String),
}

impl ProviderError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            ProviderError::Configuration(_) => 500,
            ProviderError::Connection(_) => 502,
            ProviderError::Query(_) => 502,
            ProviderError::InvalidQuery(_) => 400,
            ProviderError::ItemNotFound(_) => 404,
            ProviderError::NoData(_) => 404,
        }
    }

    /// Convert to an ExceptionResponse.
    pub fn to_exception(&self) -> ExceptionResponse {
        match self {
            ProviderError::InvalidQuery(msg) => ExceptionResponse::bad_request(msg),
            ProviderError::ItemNotFound(msg) => ExceptionResponse::not_found(msg),
            ProviderError::NoData(msg) => ExceptionResponse::no_data(msg),
            ProviderError::Connection(msg) | ProviderError::Query(msg) => {
                ExceptionResponse::bad_gateway(msg)
            }
            ProviderError::Configuration(msg) => ExceptionResponse::internal_error(msg),
        }
    }
}
