//! Common test fixtures for geoCore provider tests.
//!
//! The response bodies below mirror what geoCore deployments actually send,
//! in the three encodings seen in the wild for the `options` field.

/// Record identifiers used across fixtures.
pub mod ids {
    /// Record with coordinates, options and a thumbnail.
    pub const LAKES: &str = "a3f0c1de-5b7e-4f1a-9d2c-6e8b0a4f7c31";

    /// Record without coordinates.
    pub const ROADS: &str = "0e6b7f1e-2a10-4c55-9a3e-3d9f2c8e1b4a";

    /// Well-formed but unknown to the catalogue.
    pub const UNKNOWN: &str = "5c2d9e7a-8b41-4f03-a6e5-1d7c3b9f0e28";

    /// Not a UUID.
    pub const INVALID: &str = "lakes-of-canada";
}

/// Common bounding boxes as `[minx, miny, maxx, maxy]`.
pub mod bbox {
    /// Footprint of the [`LAKES`](super::ids::LAKES) record.
    pub const CANADA: [f64; 4] = [-141.0, 41.7, -52.6, 83.1];

    /// Small area around Ottawa.
    pub const OTTAWA: [f64; 4] = [-76.0, 45.2, -75.5, 45.6];
}

/// Total match count reported in the captured bodies.
pub const CAPTURED_TOTAL: u64 = 57;

/// Search response with `options` already decoded.
///
/// Three items: a complete record, a record without `id` and a record
/// without coordinates.
pub const CLEAN_RESPONSE: &str = r#"{"Items":[{"id":"a3f0c1de-5b7e-4f1a-9d2c-6e8b0a4f7c31","title":{"en":"Lakes of Canada","fr":"Lacs du Canada"},"created":"2019-03-04","published":"2020-05-12 10:15:00","keywords":"lakes, hydrology, water","coordinates":"[[[-141.0,41.7],[-52.6,41.7],[-52.6,83.1],[-141.0,83.1],[-141.0,41.7]]]","temporalExtent":"{begin=2015-01-01, end=2019-12-31}","options":[{"url":"https://maps.example.com/wms","protocol":"OGC:WMS","name":{"en":"Map","fr":"Carte"},"description":{"en":"service;OGC:WMS;eng","fr":"service;OGC:WMS;fra"}},{"url":"https://data.example.com/lakes.zip","protocol":"application/zip","name":{"en":"Download","fr":"Telecharger"},"description":{"en":"Dataset","fr":"Jeu de donnees"}}],"graphicOverview":[{"overviewfilename":"https://example.com/lakes.png"}],"total":"57"},{"title":{"en":"Orphan","fr":"Orphelin"},"total":"57"},{"id":"0e6b7f1e-2a10-4c55-9a3e-3d9f2c8e1b4a","title":{"en":"Roads","fr":"Routes"},"created":"0001-01-01","keywords":"","options":[],"graphicOverview":[],"total":"57"}]}"#;

/// [`CLEAN_RESPONSE`] as sent by deployments that backslash-escape the
/// doubled quotes of embedded JSON.
pub const POSIX_RESPONSE: &str = r#"{"Items":[{"id":"a3f0c1de-5b7e-4f1a-9d2c-6e8b0a4f7c31","title":{"en":"Lakes of Canada","fr":"Lacs du Canada"},"created":"2019-03-04","published":"2020-05-12 10:15:00","keywords":"lakes, hydrology, water","coordinates":"[[[-141.0,41.7],[-52.6,41.7],[-52.6,83.1],[-141.0,83.1],[-141.0,41.7]]]","temporalExtent":"{begin=2015-01-01, end=2019-12-31}","options":"\"\"[{\"\"url\"\":\"\"https://maps.example.com/wms\"\",\"\"protocol\"\":\"\"OGC:WMS\"\",\"\"name\"\":{\"\"en\"\":\"\"Map\"\",\"\"fr\"\":\"\"Carte\"\"},\"\"description\"\":{\"\"en\"\":\"\"service;OGC:WMS;eng\"\",\"\"fr\"\":\"\"service;OGC:WMS;fra\"\"}},{\"\"url\"\":\"\"https://data.example.com/lakes.zip\"\",\"\"protocol\"\":\"\"application/zip\"\",\"\"name\"\":{\"\"en\"\":\"\"Download\"\",\"\"fr\"\":\"\"Telecharger\"\"},\"\"description\"\":{\"\"en\"\":\"\"Dataset\"\",\"\"fr\"\":\"\"Jeu de donnees\"\"}}]\"\"","graphicOverview":[{"overviewfilename":"https://example.com/lakes.png"}],"total":"57"},{"title":{"en":"Orphan","fr":"Orphelin"},"total":"57"},{"id":"0e6b7f1e-2a10-4c55-9a3e-3d9f2c8e1b4a","title":{"en":"Roads","fr":"Routes"},"created":"0001-01-01","keywords":"","options":[],"graphicOverview":[],"total":"57"}]}"#;

/// [`CLEAN_RESPONSE`] as sent by deployments that leave the doubled quotes
/// bare. Not valid JSON before repair.
pub const WINDOWS_RESPONSE: &str = r#"{"Items":[{"id":"a3f0c1de-5b7e-4f1a-9d2c-6e8b0a4f7c31","title":{"en":"Lakes of Canada","fr":"Lacs du Canada"},"created":"2019-03-04","published":"2020-05-12 10:15:00","keywords":"lakes, hydrology, water","coordinates":"[[[-141.0,41.7],[-52.6,41.7],[-52.6,83.1],[-141.0,83.1],[-141.0,41.7]]]","temporalExtent":"{begin=2015-01-01, end=2019-12-31}","options":"""[{""url"":""https://maps.example.com/wms"",""protocol"":""OGC:WMS"",""name"":{""en"":""Map"",""fr"":""Carte""},""description"":{""en"":""service;OGC:WMS;eng"",""fr"":""service;OGC:WMS;fra""}},{""url"":""https://data.example.com/lakes.zip"",""protocol"":""application/zip"",""name"":{""en"":""Download"",""fr"":""Telecharger""},""description"":{""en"":""Dataset"",""fr"":""Jeu de donnees""}}]""","graphicOverview":[{"overviewfilename":"https://example.com/lakes.png"}],"total":"57"},{"title":{"en":"Orphan","fr":"Orphelin"},"total":"57"},{"id":"0e6b7f1e-2a10-4c55-9a3e-3d9f2c8e1b4a","title":{"en":"Roads","fr":"Routes"},"created":"0001-01-01","keywords":"","options":[],"graphicOverview":[],"total":"57"}]}"#;

/// Identifier lookup answer for [`ids::LAKES`].
pub const GET_RESPONSE: &str = r#"{"Items":[{"id":"a3f0c1de-5b7e-4f1a-9d2c-6e8b0a4f7c31","title":{"en":"Lakes of Canada","fr":"Lacs du Canada"},"created":"2019-03-04","published":"2020-05-12","coordinates":[[[-141.0,41.7],[-52.6,41.7],[-52.6,83.1],[-141.0,83.1],[-141.0,41.7]]],"temporalExtent":"{begin=2015-01-01, end=}","options":[{"url":"https://maps.example.com/wms","protocol":"OGC:WMS","name":{"en":"Map","fr":"Carte"},"description":{"en":"service;OGC:WMS;eng","fr":"service;OGC:WMS;fra"}}],"graphicOverview":[{"overviewfilename":"https://example.com/lakes.png"}]}]}"#;

/// Answer without matches.
pub const EMPTY_RESPONSE: &str = r#"{"Items":[],"Count":0}"#;

/// Upstream rejection of a query.
pub const ERROR_RESPONSE: &str = r#"{"errorMessage":"Invalid keyword parameter"}"#;
