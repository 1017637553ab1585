//! The geoCore records provider.

use records_protocol::{
    ProviderError, ProviderResult, Queryables, RecordFeature, RecordsResponse,
};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use crate::config::{Endpoints, GeoCoreConfig};
use crate::locale::{DefaultTranslator, Locale, Translator};
use crate::repair::RepairStrategy;
use crate::response::{parse_response, GeoCoreResponse};
use crate::transform::{is_valid_id, FeaturePage, RecordTransformer};
use crate::transport::{HttpTransport, Transport, TransportError};

/// Search parameters as handed over by the records server.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    /// Zero-based index of the first record.
    pub startindex: u64,
    pub limit: u64,
    /// Only `results` is supported.
    pub resulttype: String,
    /// `[minx, miny, maxx, maxy]`
    pub bbox: Option<[f64; 4]>,
    pub datetime: Option<String>,
    /// Queryable name/value pairs, forwarded verbatim.
    pub properties: Vec<(String, String)>,
    pub sortby: Vec<String>,
    pub select_properties: Vec<String>,
    pub skip_geometry: bool,
    /// Free-text search.
    pub q: Option<String>,
    pub locale: Option<Locale>,
}

impl Default for QueryRequest {
    fn default() -> Self {
        Self {
            startindex: 0,
            limit: 10,
            resulttype: "results".to_string(),
            bbox: None,
            datetime: None,
            properties: Vec::new(),
            sortby: Vec::new(),
            select_properties: Vec::new(),
            skip_geometry: false,
            q: None,
            locale: None,
        }
    }
}

/// Ordered geoCore query parameters; setting an existing name replaces it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpstreamParams(Vec<(String, String)>);

impl UpstreamParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl ToString) {
        let name = name.into();
        let value = value.to_string();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some(existing) => existing.1 = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn as_slice(&self) -> &[(String, String)] {
        &self.0
    }
}

/// Translate a search into geoCore's query vocabulary.
///
/// geoCore names its bbox sides unusually: `east` carries the minimum x and
/// `west` the maximum. Without a bbox the search is keyword only. Record
/// indices are 1-based and inclusive.
pub fn query_params(request: &QueryRequest, queryables: &Queryables) -> UpstreamParams {
    let mut params = UpstreamParams::new();

    if request.resulttype != "results" {
        warn!(
            resulttype = %request.resulttype,
            "unsupported resulttype, defaulting to \"results\""
        );
    }

    match request.bbox {
        Some([minx, miny, maxx, maxy]) => {
            debug!("processing bbox parameter");
            params.set("east", minx);
            params.set("west", maxx);
            params.set("north", maxy);
            params.set("south", miny);
        }
        None => {
            debug!("set keyword_only search");
            params.set("keyword_only", "true");
        }
    }

    params.set("min", request.startindex.saturating_add(1));
    params.set("max", request.startindex.saturating_add(request.limit));

    for (name, value) in &request.properties {
        match queryables.get(name) {
            Some(queryable) if !queryable.accepts(value) => {
                warn!(field = %name, value = %value, "value not in queryable enumeration");
            }
            None if !queryables.is_empty() => {
                warn!(field = %name, "unknown queryable");
            }
            _ => {}
        }
        params.set(name.as_str(), value);
    }

    if let Some(q) = request.q.as_deref().filter(|q| !q.is_empty()) {
        debug!(q = %q, "adding free-text search");
        params.set("keyword", q);
    }

    if request.datetime.is_some()
        || !request.sortby.is_empty()
        || !request.select_properties.is_empty()
    {
        debug!(
            datetime = ?request.datetime,
            sortby = ?request.sortby,
            select_properties = ?request.select_properties,
            "ignoring parameters geoCore cannot handle"
        );
    }

    params
}

/// OGC API - Records provider backed by geoCore.
pub struct GeoCoreProvider {
    endpoints: Endpoints,
    queryables: Queryables,
    repair: RepairStrategy,
    transport: Arc<dyn Transport>,
    translator: Arc<dyn Translator>,
}

impl GeoCoreProvider {
    /// Create a provider talking HTTP to the configured geoCore API.
    pub fn new(config: GeoCoreConfig) -> ProviderResult<Self> {
        let transport = HttpTransport::new(config.timeout())?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Create a provider using a custom transport.
    pub fn with_transport(
        config: GeoCoreConfig,
        transport: Arc<dyn Transport>,
    ) -> ProviderResult<Self> {
        let endpoints = config.endpoints()?;
        info!(
            query_url = %endpoints.query_url,
            get_url = %endpoints.get_url,
            queryables = config.queryables.len(),
            repair = ?config.repair,
            "geoCore provider configured"
        );

        Ok(Self {
            endpoints,
            queryables: config.queryables,
            repair: config.repair,
            transport,
            translator: Arc::new(DefaultTranslator),
        })
    }

    pub fn with_translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = translator;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.endpoints.base_url
    }

    pub fn query_url(&self) -> &str {
        &self.endpoints.query_url
    }

    pub fn get_url(&self) -> &str {
        &self.endpoints.get_url
    }

    /// Configured queryables.
    pub fn fields(&self) -> &Queryables {
        &self.queryables
    }

    /// Search geoCore.
    ///
    /// Returns a bare feature when `limit` is 1, a collection otherwise.
    #[instrument(skip(self, request), fields(startindex = request.startindex, limit = request.limit))]
    pub async fn query(&self, request: &QueryRequest) -> ProviderResult<RecordsResponse> {
        let params = query_params(request, &self.queryables);

        debug!(url = %self.endpoints.query_url, "querying geoCore");
        let response = self
            .request_json(&self.endpoints.query_url, params, request.locale.as_ref())
            .await?;

        let page = self.to_page(&response, request.locale.as_ref(), request.skip_geometry);
        page.into_response(request.limit == 1)
    }

    /// Fetch one record by identifier.
    #[instrument(skip(self, locale))]
    pub async fn get(
        &self,
        identifier: &str,
        locale: Option<&Locale>,
    ) -> ProviderResult<RecordFeature> {
        if !is_valid_id(identifier) {
            return Err(ProviderError::InvalidQuery(format!(
                "invalid record id {}",
                identifier
            )));
        }

        let mut params = UpstreamParams::new();
        params.set("id", identifier);

        debug!(url = %self.endpoints.get_url, "querying geoCore");
        let response = self
            .request_json(&self.endpoints.get_url, params, locale)
            .await?;

        if response.is_empty() {
            return Err(ProviderError::ItemNotFound(format!(
                "record id {} not found",
                identifier
            )));
        }

        self.to_page(&response, locale, false).into_single()
    }

    fn to_page(
        &self,
        response: &GeoCoreResponse,
        locale: Option<&Locale>,
        skip_geometry: bool,
    ) -> FeaturePage {
        let transformer =
            RecordTransformer::new(locale, self.translator.as_ref()).skip_geometry(skip_geometry);
        FeaturePage::collect(response.items.iter().map(|item| transformer.transform(item)))
    }

    /// Perform the GET and parse the body.
    async fn request_json(
        &self,
        url: &str,
        mut params: UpstreamParams,
        locale: Option<&Locale>,
    ) -> ProviderResult<GeoCoreResponse> {
        if let Some(locale) = locale {
            if !params.contains("lang") {
                debug!(lang = %locale.language(), "requesting geoCore response language");
                params.set("lang", locale.language());
            }
        }

        let response = match self.transport.get(url, params.as_slice()).await {
            Ok(response) => response,
            Err(err @ TransportError::Connection { .. }) => {
                error!(error = %err, "geoCore connection failed");
                return Err(ProviderError::Connection(format!(
                    "failed to connect to {}",
                    err.url()
                )));
            }
            Err(err @ TransportError::Body { .. }) => {
                error!(error = %err, "geoCore response could not be read");
                return Err(ProviderError::Query(format!("failed to query {}", err.url())));
            }
        };

        if !response.is_success() {
            error!(url = %response.url, status = response.status, "geoCore query failed");
            return Err(ProviderError::Query(format!(
                "failed to query {}",
                response.url
            )));
        }

        parse_response(&response.body, self.repair)
    }
}

impl fmt::Debug for GeoCoreProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeoCoreProvider")
            .field("endpoints", &self.endpoints)
            .field("queryables", &self.queryables)
            .field("repair", &self.repair)
            .finish_non_exhaustive()
    }
}
