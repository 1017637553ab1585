//! Exception documents returned to records API clients.

use serde::{Deserialize, Serialize};

/// Exception response for errors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExceptionResponse {
    /// Exception type identifier.
    #[serde(rename = "type")]
    pub type_: String,

    /// Human-readable title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// HTTP status code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    /// Detailed error message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// URI of the request that caused the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

const EXCEPTION_BASE: &str = "http://www.opengis.net/def/exceptions/ogcapi-records-1/1.0";

impl ExceptionResponse {
    /// Create a new exception response.
    pub fn new(type_: impl Into<String>, status: u16, detail: impl Into<String>) -> Self {
        Self {
            type_: type_.into(),
            title: None,
            status: Some(status),
            detail: Some(detail.into()),
            instance: None,
        }
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the instance URI.
    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    /// Create a 404 Not Found exception.
    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(format!("{}/not-found", EXCEPTION_BASE), 404, detail).with_title("Not Found")
    }

    /// Create a 404 exception for searches without usable records.
    pub fn no_data(detail: impl Into<String>) -> Self {
        Self::new(format!("{}/no-data", EXCEPTION_BASE), 404, detail).with_title("No Data")
    }

    /// Create a 400 Bad Request exception.
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(
            format!("{}/invalid-parameter-value", EXCEPTION_BASE),
            400,
            detail,
        )
        .with_title("Bad Request")
    }

    /// Create a 502 Bad Gateway exception for upstream failures.
    pub fn bad_gateway(detail: impl Into<String>) -> Self {
        Self::new(format!("{}/upstream-error", EXCEPTION_BASE), 502, detail)
            .with_title("Bad Gateway")
    }

    /// Create a 500 Internal Server Error exception.
    pub fn internal_error(detail: impl Into<String>) -> Self {
        Self::new(format!("{}/server-error", EXCEPTION_BASE), 500, detail)
            .with_title("Internal Server Error")
    }
}
