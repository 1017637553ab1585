//! HTTP access to the geoCore API.

use async_trait::async_trait;
use records_protocol::{ProviderError, ProviderResult};
use reqwest::{header, Client};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument};

/// Raw answer of one GET request.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// Final request URL, query string included.
    pub url: String,
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failures below the HTTP status level.
#[derive(Debug, Error)]
pub enum TransportError {
    /// DNS failure, refused connection, timeout.
    #[error("failed to connect to {url}: {message}")]
    Connection { url: String, message: String },

    /// The connection dropped while reading the body.
    #[error("failed to read response from {url}: {message}")]
    Body { url: String, message: String },
}

impl TransportError {
    pub fn url(&self) -> &str {
        match self {
            TransportError::Connection { url, .. } | TransportError::Body { url, .. } => url,
        }
    }
}

/// Performs the single GET a provider call needs.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(
        &self,
        url: &str,
        params: &[(String, String)],
    ) -> Result<TransportResponse, TransportError>;
}

/// [`Transport`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Option<Duration>) -> ProviderResult<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static(records_protocol::media_types::JSON),
        );

        let mut builder = Client::builder()
            .default_headers(headers)
            .user_agent(concat!("geocore-records/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(|e| {
            ProviderError::Configuration(format!("failed to create HTTP client: {}", e))
        })?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, params), fields(params = params.len()))]
    async fn get(
        &self,
        url: &str,
        params: &[(String, String)],
    ) -> Result<TransportResponse, TransportError> {
        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| TransportError::Connection {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let final_url = response.url().to_string();
        let status = response.status().as_u16();
        debug!(url = %final_url, status, "geoCore responded");

        let body = response.text().await.map_err(|e| TransportError::Body {
            url: final_url.clone(),
            message: e.to_string(),
        })?;

        Ok(TransportResponse {
            url: final_url,
            status,
            body,
        })
    }
}
