//! GeoJSON record types for query responses.
//!
//! A records provider answers either with a single `Feature` (identifier
//! lookups, or searches limited to one record) or a `FeatureCollection`.
//! Both shapes are wrapped by [`RecordsResponse`] so callers can serialize
//! the result without knowing which one they got.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::{Link, RecordExtent};

/// A GeoJSON FeatureCollection of records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecordFeatureCollection {
    /// Type identifier (always "FeatureCollection").
    #[serde(rename = "type")]
    pub type_: String,

    /// Array of features.
    pub features: Vec<RecordFeature>,

    /// Number of features in this page.
    #[serde(rename = "numberReturned")]
    pub number_returned: usize,

    /// Total number of matches reported by the upstream catalogue.
    #[serde(rename = "numberMatched", skip_serializing_if = "Option::is_none")]
    pub number_matched: Option<u64>,
}

impl RecordFeatureCollection {
    /// Create a collection from a page of features.
    pub fn new(features: Vec<RecordFeature>) -> Self {
        Self {
            type_: "FeatureCollection".to_string(),
            number_returned: features.len(),
            features,
            number_matched: None,
        }
    }

    /// Set the total match count. Zero is treated as unknown.
    pub fn with_number_matched(mut self, matched: Option<u64>) -> Self {
        self.number_matched = matched.filter(|n| *n > 0);
        self
    }
}

impl Default for RecordFeatureCollection {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// A GeoJSON Feature describing one metadata record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecordFeature {
    /// Type identifier (always "Feature").
    #[serde(rename = "type")]
    pub type_: String,

    /// Record identifier.
    pub id: String,

    /// Footprint of the record, `null` when the record has no coordinates
    /// or geometry was skipped.
    pub geometry: Option<RecordGeometry>,

    pub properties: RecordProperties,
}

impl RecordFeature {
    /// Create a new feature without geometry.
    pub fn new(id: impl Into<String>, properties: RecordProperties) -> Self {
        Self {
            type_: "Feature".to_string(),
            id: id.into(),
            geometry: None,
            properties,
        }
    }

    /// Set the geometry.
    pub fn with_geometry(mut self, geometry: RecordGeometry) -> Self {
        self.geometry = Some(geometry);
        self
    }
}

/// GeoJSON geometry types produced for records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum RecordGeometry {
    /// A polygon geometry.
    Polygon {
        /// Array of linear rings (first is exterior, rest are holes).
        /// Each ring is an array of [x, y] coordinate pairs.
        coordinates: Vec<Vec<[f64; 2]>>,
    },
}

impl RecordGeometry {
    /// Create a polygon geometry.
    pub fn polygon(coordinates: Vec<Vec<[f64; 2]>>) -> Self {
        RecordGeometry::Polygon { coordinates }
    }
}

/// Properties of a record feature.
///
/// The derived fields are typed; everything else the upstream sent along
/// with the record is kept verbatim in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RecordProperties {
    /// Identifier of the record in the upstream catalogue.
    #[serde(rename = "externalId")]
    pub external_id: String,

    #[serde(rename = "record-created")]
    pub record_created: Option<String>,

    #[serde(rename = "record-updated")]
    pub record_updated: Option<String>,

    /// Mirror of `record-created`.
    pub created: Option<String>,

    /// Mirror of `record-updated`.
    pub updated: Option<String>,

    #[serde(default)]
    pub keywords: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extent: Option<RecordExtent>,

    /// Links to related resources, only present when at least one survived.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub associations: Option<Vec<Link>>,

    #[serde(rename = "thumbnailUrl", skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,

    /// Remaining upstream fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RecordProperties {
    /// Create properties for the given upstream identifier.
    pub fn new(external_id: impl Into<String>) -> Self {
        Self {
            external_id: external_id.into(),
            ..Default::default()
        }
    }

    /// Add an association, creating the list on first use.
    pub fn push_association(&mut self, link: Link) {
        self.associations.get_or_insert_with(Vec::new).push(link);
    }
}

/// Result of a records query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RecordsResponse {
    /// A single record.
    Feature(Box<RecordFeature>),
    /// A page of records.
    Collection(RecordFeatureCollection),
}

impl RecordsResponse {
    /// Returns the single feature, if this is one.
    pub fn as_feature(&self) -> Option<&RecordFeature> {
        match self {
            RecordsResponse::Feature(feature) => Some(feature.as_ref()),
            RecordsResponse::Collection(_) => None,
        }
    }

    /// Returns the collection, if this is one.
    pub fn as_collection(&self) -> Option<&RecordFeatureCollection> {
        match self {
            RecordsResponse::Feature(_) => None,
            RecordsResponse::Collection(collection) => Some(collection),
        }
    }
}

impl From<RecordFeature> for RecordsResponse {
    fn from(feature: RecordFeature) -> Self {
        RecordsResponse::Feature(Box::new(feature))
    }
}

impl From<RecordFeatureCollection> for RecordsResponse {
    fn from(collection: RecordFeatureCollection) -> Self {
        RecordsResponse::Collection(collection)
    }
}
