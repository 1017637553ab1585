//! geoCore record to GeoJSON feature transformation.
//!
//! Each upstream item is read through an immutable view and turned into a
//! [`RecordOutcome`]: either a feature or the reason it was skipped. A
//! [`FeaturePage`] aggregates the outcomes of one response.

use records_protocol::{
    ProviderError, ProviderResult, RecordFeature, RecordFeatureCollection, RecordProperties,
    RecordsResponse,
};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::associations::derive_associations;
use crate::geometry::{extent, parse_coordinates, polygon};
use crate::locale::{Locale, Translator};
use crate::normalize::{value_as_iso_date, value_as_list};

/// Upstream fields consumed by the transformation.
const CONSUMED_FIELDS: &[&str] = &[
    "id",
    "total",
    "created",
    "published",
    "keywords",
    "coordinates",
    "options",
    "graphicOverview",
];

/// Property names produced by the transformation; upstream fields with the
/// same name are replaced.
const DERIVED_FIELDS: &[&str] = &[
    "externalId",
    "record-created",
    "record-updated",
    "updated",
    "extent",
    "associations",
    "thumbnailUrl",
];

/// Why a record was left out of the result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("record is not an object")]
    NotAnObject,

    #[error("record without ID")]
    MissingId,

    #[error("invalid record ID: {0}")]
    InvalidId(String),
}

/// Result of transforming one upstream record.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutcome {
    Feature {
        feature: Box<RecordFeature>,
        /// Upstream total match count carried by the record.
        total: Option<u64>,
    },
    Skipped(SkipReason),
}

/// Check that `id` is a UUID (hyphenated, simple, braced or URN form).
pub fn is_valid_id(id: &str) -> bool {
    Uuid::parse_str(id.trim()).is_ok()
}

/// Turns geoCore records into GeoJSON features for one locale.
pub struct RecordTransformer<'a> {
    locale: Option<&'a Locale>,
    translator: &'a dyn Translator,
    skip_geometry: bool,
}

impl<'a> RecordTransformer<'a> {
    pub fn new(locale: Option<&'a Locale>, translator: &'a dyn Translator) -> Self {
        Self {
            locale,
            translator,
            skip_geometry: false,
        }
    }

    /// Leave feature geometry empty; the extent is still derived.
    pub fn skip_geometry(mut self, skip: bool) -> Self {
        self.skip_geometry = skip;
        self
    }

    pub fn transform(&self, item: &Value) -> RecordOutcome {
        let Some(record) = item.as_object() else {
            return RecordOutcome::Skipped(SkipReason::NotAnObject);
        };

        let id = match record.get("id") {
            None | Some(Value::Null) => return RecordOutcome::Skipped(SkipReason::MissingId),
            Some(Value::String(id)) => id.clone(),
            Some(other) => other.to_string(),
        };
        if !is_valid_id(&id) {
            return RecordOutcome::Skipped(SkipReason::InvalidId(id));
        }

        let total = record.get("total").and_then(parse_total);

        let mut properties = RecordProperties::new(id.clone());

        let created = value_as_iso_date(record.get("created"));
        let updated = value_as_iso_date(record.get("published"));
        properties.record_created = created.clone();
        properties.created = created;
        properties.record_updated = updated.clone();
        properties.updated = updated;

        properties.keywords = value_as_list(record.get("keywords"));

        let rings = parse_coordinates(record.get("coordinates"));
        let has_coordinates = !rings.is_empty();
        let mut geometry = None;
        if has_coordinates {
            properties.extent = Some(extent(&rings, record.get("temporalExtent")));
            if self.skip_geometry {
                debug!(id = %id, "skipped geometry");
            } else {
                geometry = Some(polygon(rings));
            }
        } else {
            debug!(id = %id, "record has no coordinates: cannot set geometry and extent");
        }

        for link in derive_associations(record.get("options"), self.locale, self.translator) {
            properties.push_association(link);
        }

        properties.thumbnail_url = thumbnail_url(record.get("graphicOverview"));
        properties.extra = remaining_fields(record, has_coordinates);

        let mut feature = RecordFeature::new(id, properties);
        feature.geometry = geometry;

        RecordOutcome::Feature {
            feature: Box::new(feature),
            total,
        }
    }
}

/// `total` arrives as a number or a numeric string.
fn parse_total(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// The first overview's file name.
fn thumbnail_url(overviews: Option<&Value>) -> Option<String> {
    let first = overviews
        .and_then(Value::as_array)
        .and_then(|list| list.first())
        .and_then(|overview| overview.get("overviewfilename"));

    match first {
        Some(Value::String(url)) => Some(url.clone()),
        _ => {
            warn!("could not find overview thumbnail");
            None
        }
    }
}

fn remaining_fields(record: &Map<String, Value>, has_coordinates: bool) -> Map<String, Value> {
    record
        .iter()
        .filter(|(key, _)| {
            let key = key.as_str();
            !CONSUMED_FIELDS.contains(&key)
                && !DERIVED_FIELDS.contains(&key)
                && !(has_coordinates && key == "temporalExtent")
        })
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Features that survived transformation, plus the upstream match count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeaturePage {
    pub features: Vec<RecordFeature>,
    /// Total reported by the last surviving record.
    pub number_matched: Option<u64>,
}

impl FeaturePage {
    /// Aggregate outcomes, logging every skipped record.
    pub fn collect<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = RecordOutcome>,
    {
        let mut page = FeaturePage::default();
        for outcome in outcomes {
            match outcome {
                RecordOutcome::Feature { feature, total } => {
                    page.features.push(*feature);
                    page.number_matched = total;
                }
                RecordOutcome::Skipped(reason) => warn!(reason = %reason, "skipped record"),
            }
        }
        debug!(
            features = page.features.len(),
            matched = ?page.number_matched,
            "provider reported matches"
        );
        page
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// A bare feature when `single` is set, else a collection.
    pub fn into_response(self, single: bool) -> ProviderResult<RecordsResponse> {
        if self.is_empty() {
            return Err(ProviderError::NoData("no records found".to_string()));
        }

        if single {
            debug!("returning single feature");
            return self.into_single().map(RecordsResponse::from);
        }

        debug!("returning feature collection");
        let collection =
            RecordFeatureCollection::new(self.features).with_number_matched(self.number_matched);
        Ok(collection.into())
    }

    /// The first feature of the page.
    pub fn into_single(self) -> ProviderResult<RecordFeature> {
        self.features
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::NoData("no records found".to_string()))
    }
}
