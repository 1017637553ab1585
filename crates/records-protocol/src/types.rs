//! Core record types shared by features and collections.

use serde::{Deserialize, Serialize};

use crate::reference_systems;

/// A hyperlink to a related resource.
///
/// Records carry their related resources (downloads, web services,
/// documentation) as a list of links under `associations`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Link {
    /// The URI of the linked resource.
    pub href: String,

    /// The relationship type (e.g., "item", "download", "service").
    pub rel: String,

    /// The media type or protocol of the linked resource.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,

    /// A human-readable title for the link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// The language of the linked resource.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hreflang: Option<String>,
}

impl Link {
    /// Create a new link with required fields.
    pub fn new(href: impl Into<String>, rel: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            rel: rel.into(),
            type_: None,
            title: None,
            hreflang: None,
        }
    }

    /// Set the media type.
    pub fn with_type(mut self, type_: impl Into<String>) -> Self {
        self.type_ = Some(type_.into());
        self
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the language.
    pub fn with_hreflang(mut self, hreflang: impl Into<String>) -> Self {
        self.hreflang = Some(hreflang.into());
        self
    }
}

/// The spatial and temporal extent of a single record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecordExtent {
    /// The spatial extent of the record.
    pub spatial: SpatialExtent,

    /// The temporal extent of the record.
    pub temporal: TemporalExtent,
}

impl RecordExtent {
    /// Create an extent from a bounding box and a `[begin, end]` interval.
    pub fn new(bbox: [f64; 4], interval: [Option<String>; 2]) -> Self {
        Self {
            spatial: SpatialExtent::new(bbox),
            temporal: TemporalExtent::new(interval[0].clone(), interval[1].clone()),
        }
    }
}

/// Spatial extent with bounding box.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpatialExtent {
    /// Bounding boxes as `[minx, miny, maxx, maxy]`, grouped per polygon so
    /// that multi-polygon records fit the same shape.
    pub bbox: Vec<Vec<[f64; 4]>>,

    /// Coordinate reference system (always CRS84).
    #[serde(default = "default_crs")]
    pub crs: String,
}

impl SpatialExtent {
    /// Wrap a single bounding box.
    pub fn new(bbox: [f64; 4]) -> Self {
        Self {
            bbox: vec![vec![bbox]],
            crs: default_crs(),
        }
    }
}

fn default_crs() -> String {
    reference_systems::CRS84.to_string()
}

/// Temporal extent as a single `[begin, end]` interval.
///
/// Either side is `None` when the upstream value was missing or unparseable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TemporalExtent {
    pub interval: [Option<String>; 2],

    /// Temporal reference system (always Gregorian).
    #[serde(default = "default_trs")]
    pub trs: String,
}

fn default_trs() -> String {
    reference_systems::GREGORIAN.to_string()
}

impl TemporalExtent {
    /// Create a temporal extent from begin and end timestamps.
    pub fn new(begin: Option<String>, end: Option<String>) -> Self {
        Self {
            interval: [begin, end],
            trs: default_trs(),
        }
    }
}
