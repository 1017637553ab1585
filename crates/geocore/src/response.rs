//! Parsing of geoCore response bodies.

use records_protocol::{ProviderError, ProviderResult};
use serde_json::Value;
use tracing::{debug, error};

use crate::repair::RepairStrategy;

/// Top-level geoCore answer, reduced to the records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoCoreResponse {
    pub items: Vec<Value>,
}

impl GeoCoreResponse {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Repair and parse a response body.
///
/// An empty body, or one that is still not JSON after repair, yields an
/// empty response. A parsed body without `Items` is an upstream rejection
/// and is reported with its `errorMessage`.
pub fn parse_response(body: &str, strategy: RepairStrategy) -> ProviderResult<GeoCoreResponse> {
    if body.trim().is_empty() {
        debug!("empty response body");
        return Ok(GeoCoreResponse::default());
    }

    let repaired = strategy.repair(body);
    let value: Value = match serde_json::from_str(&repaired) {
        Ok(value) => value,
        Err(e) => {
            error!(error = %e, strategy = ?strategy, "failed to parse geoCore response");
            return Ok(GeoCoreResponse::default());
        }
    };

    let Value::Object(mut root) = value else {
        return Err(ProviderError::InvalidQuery(
            "unexpected response shape".to_string(),
        ));
    };

    match root.remove("Items") {
        Some(Value::Array(items)) => Ok(GeoCoreResponse { items }),
        Some(Value::Null) => Ok(GeoCoreResponse::default()),
        Some(_) => Err(ProviderError::InvalidQuery(
            "Items is not a list".to_string(),
        )),
        None => {
            let message = match root.get("errorMessage") {
                Some(Value::String(msg)) if !msg.is_empty() => msg.clone(),
                Some(other) if !other.is_null() => other.to_string(),
                _ => "missing Items object".to_string(),
            };
            Err(ProviderError::InvalidQuery(message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_items() {
        let body = r#"{"Items":[{"id":"a"},{"id":"b"}]}"#;
        let response = parse_response(body, RepairStrategy::Scan).unwrap();
        assert_eq!(response.items.len(), 2);
        assert_eq!(response.items[1]["id"], "b");
    }

    #[test]
    fn test_empty_body_is_empty_response() {
        assert!(parse_response("", RepairStrategy::Scan).unwrap().is_empty());
        assert!(parse_response("  \n", RepairStrategy::Scan).unwrap().is_empty());
    }

    #[test]
    fn test_unparseable_body_is_empty_response() {
        let response = parse_response("<html>502 Bad Gateway</html>", RepairStrategy::Scan);
        assert!(response.unwrap().is_empty());
    }

    #[test]
    fn test_missing_items_uses_error_message() {
        let body = r#"{"errorMessage":"keyword is required"}"#;
        let err = parse_response(body, RepairStrategy::Scan).unwrap_err();
        match err {
            ProviderError::InvalidQuery(msg) => assert_eq!(msg, "keyword is required"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_missing_items_without_message() {
        let err = parse_response(r#"{"Count":0}"#, RepairStrategy::Scan).unwrap_err();
        match err {
            ProviderError::InvalidQuery(msg) => assert_eq!(msg, "missing Items object"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_null_items_is_empty() {
        let response = parse_response(r#"{"Items":null}"#, RepairStrategy::Scan).unwrap();
        assert!(response.is_empty());
    }

    #[test]
    fn test_non_object_root_is_invalid() {
        let err = parse_response("[1,2]", RepairStrategy::Scan).unwrap_err();
        assert!(matches!(err, ProviderError::InvalidQuery(_)));

        let err = parse_response(r#"{"Items":"none"}"#, RepairStrategy::Scan).unwrap_err();
        assert!(matches!(err, ProviderError::InvalidQuery(_)));
    }

    #[test]
    fn test_repairs_before_parsing() {
        let body = r#"{"Items":[{"id":"a","options":"\"\"[{\"\"url\"\":\"\"https://a\"\"}]\"\""}]}"#;
        let response = parse_response(body, RepairStrategy::Scan).unwrap();
        assert_eq!(response.items[0]["options"][0]["url"], "https://a");
    }
}
