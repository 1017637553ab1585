//! OGC API - Records Protocol
//!
//! This crate provides the types a records provider produces for an
//! OGC API - Records server: GeoJSON record features and collections,
//! record extents, association links, queryable registries and the
//! provider error taxonomy.
//!
//! # Example
//!
//! ```rust
//! use records_protocol::{Link, RecordFeature, RecordProperties};
//!
//! let mut properties = RecordProperties::new("3d9f2c8e-1b4a-4c55-9a3e-0d6b7f1e2a10");
//! properties.associations = Some(vec![
//!     Link::new("https://example.com/data.zip", "item").with_type("application/zip"),
//! ]);
//!
//! let feature = RecordFeature::new("3d9f2c8e-1b4a-4c55-9a3e-0d6b7f1e2a10", properties);
//! assert!(feature.geometry.is_none());
//! ```

pub mod types;
pub mod geojson;
pub mod queryables;
pub mod responses;
pub mod errors;

// Re-export commonly used types
pub use types::{Link, RecordExtent, SpatialExtent, TemporalExtent};
pub use geojson::{RecordFeature, RecordFeatureCollection, RecordGeometry, RecordProperties, RecordsResponse};
pub use queryables::{Queryable, Queryables};
pub use responses::ExceptionResponse;
pub use errors::{ProviderError, ProviderResult};

/// Reference system identifiers used in record extents.
pub mod reference_systems {
    /// WGS84 longitude/latitude.
    pub const CRS84: &str = "http://www.opengis.net/def/crs/OGC/1.3/CRS84";
    /// Gregorian calendar, ISO 8601 notation.
    pub const GREGORIAN: &str = "http://www.opengis.net/def/uom/ISO-8601/0/Gregorian";
}

/// Media types used in records responses
pub mod media_types {
    /// JSON media type
    pub const JSON: &str = "application/json";
}
