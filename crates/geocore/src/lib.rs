//! geoCore provider for OGC API - Records.
//!
//! Translates records-server searches into geoCore API calls and reshapes
//! geoCore's answers into GeoJSON record features:
//!
//! - **repair**: undo geoCore's doubly-escaped embedded JSON
//! - **response**: parse and validate a response body
//! - **transform**: build features with dates, geometry, extent and links
//! - **provider**: map query parameters and run `query`/`get`
//!
//! # Example
//!
//! ```rust,no_run
//! use geocore::{GeoCoreConfig, GeoCoreProvider, Locale, QueryRequest};
//!
//! # async fn run() -> records_protocol::ProviderResult<()> {
//! let provider = GeoCoreProvider::new(GeoCoreConfig::new("https://geocore.api.geo.ca"))?;
//! let request = QueryRequest {
//!     q: Some("lakes".to_string()),
//!     locale: Locale::parse("fr"),
//!     ..Default::default()
//! };
//! let response = provider.query(&request).await?;
//! println!("{}", serde_json::to_string_pretty(&response).unwrap_or_default());
//! # Ok(())
//! # }
//! ```

pub mod associations;
pub mod config;
pub mod geometry;
pub mod locale;
pub mod normalize;
pub mod provider;
pub mod repair;
pub mod response;
pub mod transform;
pub mod transport;

pub use config::{ConfigError, Endpoints, GeoCoreConfig};
pub use locale::{DefaultTranslator, Locale, Translator};
pub use provider::{query_params, GeoCoreProvider, QueryRequest, UpstreamParams};
pub use repair::RepairStrategy;
pub use response::{parse_response, GeoCoreResponse};
pub use transform::{FeaturePage, RecordOutcome, RecordTransformer, SkipReason};
pub use transport::{HttpTransport, Transport, TransportError, TransportResponse};
