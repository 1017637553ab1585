//! End-to-end tests for the geoCore provider.
//!
//! The provider runs against a mock transport serving captured geoCore
//! bodies, so no network access is needed.

use async_trait::async_trait;
use geocore::{
    GeoCoreConfig, GeoCoreProvider, Locale, QueryRequest, RepairStrategy, Transport,
    TransportError, TransportResponse,
};
use records_protocol::{ProviderError, RecordGeometry};
use std::sync::{Arc, Mutex};
use test_utils::{assert_approx_eq, fixtures, geocore_body, record_page, Encoding, RecordBuilder};

const BASE_URL: &str = "https://geocore.example.com";

type Call = (String, Vec<(String, String)>);

enum Reply {
    Body(u16, String),
    Refused,
}

struct MockTransport {
    reply: Reply,
    calls: Mutex<Vec<Call>>,
}

impl MockTransport {
    fn ok(body: &str) -> Arc<Self> {
        Self::status(200, body)
    }

    fn status(status: u16, body: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Reply::Body(status, body.to_string()),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn refused() -> Arc<Self> {
        Arc::new(Self {
            reply: Reply::Refused,
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn last_param(&self, name: &str) -> Option<String> {
        let calls = self.calls();
        let (_, params) = calls.last()?;
        params
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(
        &self,
        url: &str,
        params: &[(String, String)],
    ) -> Result<TransportResponse, TransportError> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), params.to_vec()));

        match &self.reply {
            Reply::Body(status, body) => {
                let query: Vec<String> = params.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
                Ok(TransportResponse {
                    url: format!("{}?{}", url, query.join("&")),
                    status: *status,
                    body: body.clone(),
                })
            }
            Reply::Refused => Err(TransportError::Connection {
                url: url.to_string(),
                message: "connection refused".to_string(),
            }),
        }
    }
}

fn provider(transport: Arc<MockTransport>) -> GeoCoreProvider {
    provider_with(GeoCoreConfig::new(BASE_URL), transport)
}

fn provider_with(config: GeoCoreConfig, transport: Arc<MockTransport>) -> GeoCoreProvider {
    GeoCoreProvider::with_transport(config, transport).unwrap()
}

// ============================================================================
// query
// ============================================================================

#[tokio::test]
async fn test_query_builds_collection() {
    let transport = MockTransport::ok(fixtures::CLEAN_RESPONSE);
    let provider = provider(transport.clone());

    let response = provider.query(&QueryRequest::default()).await.unwrap();
    let collection = response.as_collection().unwrap();

    // the record without an id is dropped
    assert_eq!(collection.number_returned, 2);
    assert_eq!(collection.number_matched, Some(fixtures::CAPTURED_TOTAL));
    assert_eq!(collection.features[0].id, fixtures::ids::LAKES);
    assert_eq!(collection.features[1].id, fixtures::ids::ROADS);

    let calls = transport.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "https://geocore.example.com/geo");
}

#[tokio::test]
async fn test_query_transforms_records() {
    let provider = provider(MockTransport::ok(fixtures::CLEAN_RESPONSE));
    let request = QueryRequest {
        locale: Locale::parse("fr"),
        ..Default::default()
    };

    let response = provider.query(&request).await.unwrap();
    let lakes = &response.as_collection().unwrap().features[0];
    let props = &lakes.properties;

    assert_eq!(props.external_id, fixtures::ids::LAKES);
    assert_eq!(props.record_created.as_deref(), Some("2019-03-04T00:00:00Z"));
    assert_eq!(props.record_updated.as_deref(), Some("2020-05-12T10:15:00Z"));
    assert_eq!(props.keywords, vec!["lakes", "hydrology", "water"]);
    assert_eq!(props.thumbnail_url.as_deref(), Some("https://example.com/lakes.png"));

    let RecordGeometry::Polygon { coordinates } = lakes.geometry.as_ref().unwrap();
    assert_eq!(coordinates[0].len(), 5);

    let bbox = props.extent.as_ref().unwrap().spatial.bbox[0][0];
    for (actual, expected) in bbox.iter().zip(fixtures::bbox::CANADA) {
        assert_approx_eq!(*actual, expected, 1e-9);
    }

    let links = props.associations.as_ref().unwrap();
    assert_eq!(links.len(), 2);
    assert_eq!(links[0].rel, "service");
    assert_eq!(links[0].type_.as_deref(), Some("OGC:WMS"));
    assert_eq!(links[0].hreflang.as_deref(), Some("fra"));
    assert_eq!(links[0].title.as_deref(), Some("Carte"));
    assert_eq!(links[1].rel, "item");
    assert_eq!(links[1].type_.as_deref(), Some("application/zip"));
    assert_eq!(links[1].hreflang.as_deref(), Some("fr"));

    let roads = &response.as_collection().unwrap().features[1];
    assert!(roads.geometry.is_none());
    assert!(roads.properties.created.is_none());
    assert!(roads.properties.associations.is_none());
    assert!(roads.properties.keywords.is_empty());
}

#[tokio::test]
async fn test_query_maps_parameters() {
    let transport = MockTransport::ok(fixtures::CLEAN_RESPONSE);
    let provider = provider(transport.clone());
    let request = QueryRequest {
        startindex: 20,
        limit: 10,
        bbox: Some(fixtures::bbox::OTTAWA),
        properties: vec![("org".to_string(), "nrcan".to_string())],
        q: Some("lakes".to_string()),
        ..Default::default()
    };

    provider.query(&request).await.unwrap();

    assert_eq!(transport.last_param("east").as_deref(), Some("-76"));
    assert_eq!(transport.last_param("west").as_deref(), Some("-75.5"));
    assert_eq!(transport.last_param("north").as_deref(), Some("45.6"));
    assert_eq!(transport.last_param("south").as_deref(), Some("45.2"));
    assert_eq!(transport.last_param("min").as_deref(), Some("21"));
    assert_eq!(transport.last_param("max").as_deref(), Some("30"));
    assert_eq!(transport.last_param("org").as_deref(), Some("nrcan"));
    assert_eq!(transport.last_param("keyword").as_deref(), Some("lakes"));
    assert!(transport.last_param("keyword_only").is_none());
    assert!(transport.last_param("lang").is_none());
}

#[tokio::test]
async fn test_query_adds_language() {
    let transport = MockTransport::ok(fixtures::CLEAN_RESPONSE);
    let provider = provider(transport.clone());
    let request = QueryRequest {
        locale: Locale::parse("fr-CA"),
        ..Default::default()
    };

    provider.query(&request).await.unwrap();
    assert_eq!(transport.last_param("lang").as_deref(), Some("fr"));
    assert_eq!(transport.last_param("keyword_only").as_deref(), Some("true"));
}

#[tokio::test]
async fn test_query_keeps_caller_language() {
    let transport = MockTransport::ok(fixtures::CLEAN_RESPONSE);
    let provider = provider(transport.clone());
    let request = QueryRequest {
        locale: Locale::parse("fr"),
        properties: vec![("lang".to_string(), "en".to_string())],
        ..Default::default()
    };

    provider.query(&request).await.unwrap();
    assert_eq!(transport.last_param("lang").as_deref(), Some("en"));
}

#[tokio::test]
async fn test_query_limit_one_returns_feature() {
    let provider = provider(MockTransport::ok(fixtures::CLEAN_RESPONSE));
    let request = QueryRequest {
        limit: 1,
        ..Default::default()
    };

    let response = provider.query(&request).await.unwrap();
    let feature = response.as_feature().unwrap();
    assert_eq!(feature.id, fixtures::ids::LAKES);

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["type"], "Feature");
}

#[tokio::test]
async fn test_query_skip_geometry() {
    let provider = provider(MockTransport::ok(fixtures::CLEAN_RESPONSE));
    let request = QueryRequest {
        skip_geometry: true,
        ..Default::default()
    };

    let response = provider.query(&request).await.unwrap();
    let lakes = &response.as_collection().unwrap().features[0];
    assert!(lakes.geometry.is_none());
    assert!(lakes.properties.extent.is_some());
}

#[tokio::test]
async fn test_query_without_records_is_no_data() {
    let provider = provider(MockTransport::ok(fixtures::EMPTY_RESPONSE));
    let err = provider.query(&QueryRequest::default()).await.unwrap_err();
    assert!(matches!(err, ProviderError::NoData(_)));

    let body = geocore_body(&[RecordBuilder::anonymous().title("orphan").build()], Encoding::Clean);
    let provider = provider_with(GeoCoreConfig::new(BASE_URL), MockTransport::ok(&body));
    let err = provider.query(&QueryRequest::default()).await.unwrap_err();
    assert!(matches!(err, ProviderError::NoData(_)));
}

#[tokio::test]
async fn test_query_empty_body_is_no_data() {
    let provider = provider(MockTransport::ok(""));
    let err = provider.query(&QueryRequest::default()).await.unwrap_err();
    assert!(matches!(err, ProviderError::NoData(_)));
}

#[tokio::test]
async fn test_query_reports_upstream_error_message() {
    let provider = provider(MockTransport::ok(fixtures::ERROR_RESPONSE));
    let err = provider.query(&QueryRequest::default()).await.unwrap_err();

    match err {
        ProviderError::InvalidQuery(msg) => assert_eq!(msg, "Invalid keyword parameter"),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_query_http_error() {
    let provider = provider(MockTransport::status(500, "Internal Server Error"));
    let err = provider.query(&QueryRequest::default()).await.unwrap_err();

    match err {
        ProviderError::Query(msg) => {
            assert!(msg.starts_with("failed to query https://geocore.example.com/geo?"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_query_connection_error() {
    let provider = provider(MockTransport::refused());
    let err = provider.query(&QueryRequest::default()).await.unwrap_err();

    match err {
        ProviderError::Connection(msg) => {
            assert_eq!(msg, "failed to connect to https://geocore.example.com/geo");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_query_number_matched_follows_upstream_total() {
    let body = geocore_body(&record_page(3, 250), Encoding::Clean);
    let provider = provider(MockTransport::ok(&body));

    let response = provider.query(&QueryRequest::default()).await.unwrap();
    let collection = response.as_collection().unwrap();
    assert_eq!(collection.number_returned, 3);
    assert_eq!(collection.number_matched, Some(250));
}

#[tokio::test]
async fn test_query_omits_zero_total() {
    let body = geocore_body(&record_page(2, 0), Encoding::Clean);
    let provider = provider(MockTransport::ok(&body));

    let response = provider.query(&QueryRequest::default()).await.unwrap();
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["numberReturned"], 2);
    assert!(json.get("numberMatched").is_none());
}

// ============================================================================
// repair strategies
// ============================================================================

async fn lakes_links(body: &str, repair: RepairStrategy) -> usize {
    let config = GeoCoreConfig {
        repair,
        ..GeoCoreConfig::new(BASE_URL)
    };
    let provider = provider_with(config, MockTransport::ok(body));
    let response = provider.query(&QueryRequest::default()).await.unwrap();
    let lakes = &response.as_collection().unwrap().features[0];
    lakes
        .properties
        .associations
        .as_ref()
        .map(Vec::len)
        .unwrap_or(0)
}

#[tokio::test]
async fn test_scan_repairs_every_captured_encoding() {
    for body in [
        fixtures::CLEAN_RESPONSE,
        fixtures::POSIX_RESPONSE,
        fixtures::WINDOWS_RESPONSE,
    ] {
        assert_eq!(lakes_links(body, RepairStrategy::Scan).await, 2);
    }
}

#[tokio::test]
async fn test_pattern_strategies_repair_their_encoding() {
    assert_eq!(lakes_links(fixtures::POSIX_RESPONSE, RepairStrategy::Posix).await, 2);
    assert_eq!(lakes_links(fixtures::WINDOWS_RESPONSE, RepairStrategy::Windows).await, 2);
    assert_eq!(lakes_links(fixtures::CLEAN_RESPONSE, RepairStrategy::Posix).await, 2);
}

#[tokio::test]
async fn test_wrong_pattern_strategy_yields_no_data() {
    let config = GeoCoreConfig {
        repair: RepairStrategy::Posix,
        ..GeoCoreConfig::new(BASE_URL)
    };
    let provider = provider_with(config, MockTransport::ok(fixtures::WINDOWS_RESPONSE));
    let err = provider.query(&QueryRequest::default()).await.unwrap_err();
    assert!(matches!(err, ProviderError::NoData(_)));
}

#[tokio::test]
async fn test_generated_encodings_agree() {
    let items = vec![
        RecordBuilder::new(fixtures::ids::LAKES)
            .title("Lakes")
            .square(-80.0, 40.0, 5.0)
            .option("https://a.example.com/wms", "OGC:WMS", "service;OGC:WMS;eng")
            .option("https://b.example.com/data.csv", "text/csv", "Table")
            .total(2)
            .build(),
        RecordBuilder::new(fixtures::ids::ROADS)
            .option("https://c.example.com", "text/html", "Home page")
            .total(2)
            .build(),
    ];

    let mut responses = Vec::new();
    for encoding in [Encoding::Clean, Encoding::Posix, Encoding::Windows] {
        let body = geocore_body(&items, encoding);
        let provider = provider(MockTransport::ok(&body));
        responses.push(provider.query(&QueryRequest::default()).await.unwrap());
    }

    assert_eq!(responses[0], responses[1]);
    assert_eq!(responses[0], responses[2]);
}

#[tokio::test]
async fn test_generated_record_extent() {
    let items = vec![RecordBuilder::new(fixtures::ids::ROADS)
        .square(-76.0, 45.2, 0.5)
        .temporal_extent("2018-01-01", "2018-12-31")
        .total(1)
        .build()];
    let provider = provider(MockTransport::ok(&geocore_body(&items, Encoding::Clean)));
    let request = QueryRequest {
        limit: 1,
        ..Default::default()
    };

    let response = provider.query(&request).await.unwrap();
    let feature = response.as_feature().unwrap();
    let extent = feature.properties.extent.as_ref().unwrap();
    assert_eq!(
        extent.temporal.interval,
        [
            Some("2018-01-01T00:00:00Z".to_string()),
            Some("2018-12-31T00:00:00Z".to_string())
        ]
    );
    assert!(!feature.properties.extra.contains_key("temporalExtent"));

    let bbox = extent.spatial.bbox[0][0];
    for (actual, expected) in bbox.iter().zip([-76.0, 45.2, -75.5, 45.7]) {
        assert_approx_eq!(*actual, expected, 1e-9);
    }
}

#[tokio::test]
async fn test_embedded_empty_strings_survive_repair() {
    let items = vec![RecordBuilder::new(fixtures::ids::LAKES)
        .square(-80.0, 40.0, 5.0)
        .option("https://a.example.com/wms", "OGC:WMS", "")
        .option("https://b.example.com/data.csv", "text/csv", "Table")
        .total(1)
        .build()];

    for encoding in [Encoding::Posix, Encoding::Windows] {
        let body = geocore_body(&items, encoding);
        let provider = provider(MockTransport::ok(&body));
        let request = QueryRequest {
            limit: 1,
            ..Default::default()
        };

        let response = provider.query(&request).await.unwrap();
        let feature = response.as_feature().unwrap();
        assert_eq!(feature.id, fixtures::ids::LAKES);
        assert_eq!(feature.properties.associations.as_ref().map(Vec::len), Some(2));
    }
}

// ============================================================================
// get
// ============================================================================

#[tokio::test]
async fn test_get_returns_feature() {
    let transport = MockTransport::ok(fixtures::GET_RESPONSE);
    let provider = provider(transport.clone());
    let locale = Locale::parse("en");

    let feature = provider
        .get(fixtures::ids::LAKES, locale.as_ref())
        .await
        .unwrap();

    assert_eq!(feature.id, fixtures::ids::LAKES);
    assert!(feature.geometry.is_some());
    assert_eq!(
        feature.properties.extent.as_ref().unwrap().temporal.interval,
        [Some("2015-01-01T00:00:00Z".to_string()), None]
    );

    let calls = transport.calls();
    let (url, params) = &calls[0];
    assert_eq!(url, "https://geocore.example.com/id");
    assert_eq!(transport.last_param("id").as_deref(), Some(fixtures::ids::LAKES));
    assert_eq!(transport.last_param("lang").as_deref(), Some("en"));
    assert_eq!(params.len(), 2);
}

#[tokio::test]
async fn test_get_uses_mapped_endpoint() {
    let transport = MockTransport::ok(fixtures::GET_RESPONSE);
    let config = GeoCoreConfig::from_yaml_str(
        "base_url: https://geocore.example.com/\nmapping:\n  query: geo\n  get: record\n",
    )
    .unwrap();
    let provider = provider_with(config, transport.clone());

    provider.get(fixtures::ids::LAKES, None).await.unwrap();
    assert_eq!(transport.calls()[0].0, "https://geocore.example.com/record");
}

#[tokio::test]
async fn test_get_invalid_id_makes_no_request() {
    let transport = MockTransport::ok(fixtures::GET_RESPONSE);
    let provider = provider(transport.clone());

    let err = provider.get(fixtures::ids::INVALID, None).await.unwrap_err();
    assert!(matches!(err, ProviderError::InvalidQuery(_)));
    assert_eq!(err.status_code(), 400);
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn test_get_unknown_id_is_not_found() {
    let provider = provider(MockTransport::ok(fixtures::EMPTY_RESPONSE));
    let err = provider.get(fixtures::ids::UNKNOWN, None).await.unwrap_err();

    match err {
        ProviderError::ItemNotFound(msg) => {
            assert_eq!(msg, format!("record id {} not found", fixtures::ids::UNKNOWN));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_get_empty_body_is_not_found() {
    let provider = provider(MockTransport::ok(""));
    let err = provider.get(fixtures::ids::UNKNOWN, None).await.unwrap_err();
    assert!(matches!(err, ProviderError::ItemNotFound(_)));
}

#[tokio::test]
async fn test_get_connection_error() {
    let provider = provider(MockTransport::refused());
    let err = provider.get(fixtures::ids::LAKES, None).await.unwrap_err();
    assert!(matches!(err, ProviderError::Connection(_)));
    assert_eq!(err.to_exception().status, Some(502));
}
