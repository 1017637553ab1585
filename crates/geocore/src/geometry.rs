//! Footprint geometry and extent derivation.

use records_protocol::{RecordExtent, RecordGeometry};
use serde_json::Value;
use tracing::warn;

use crate::normalize::{as_dict, as_iso_date};

/// One polygon ring of `[x, y]` pairs.
pub type Ring = Vec<[f64; 2]>;

/// Read the `coordinates` field of a record.
///
/// geoCore sends either a list of rings or the same list as JSON text. An
/// undecodable value is logged and treated as "no coordinates".
pub fn parse_coordinates(value: Option<&Value>) -> Vec<Ring> {
    let decoded;
    let value = match value {
        None | Some(Value::Null) => return Vec::new(),
        Some(Value::String(text)) if text.trim().is_empty() => return Vec::new(),
        Some(Value::String(text)) => match serde_json::from_str::<Value>(text) {
            Ok(v) => {
                decoded = v;
                &decoded
            }
            Err(e) => {
                warn!(error = %e, "failed to parse coords");
                return Vec::new();
            }
        },
        Some(v) => v,
    };

    match rings_from_value(value) {
        Ok(rings) => rings,
        Err(reason) => {
            warn!(reason = %reason, "failed to parse coords");
            Vec::new()
        }
    }
}

fn rings_from_value(value: &Value) -> Result<Vec<Ring>, String> {
    let rings = value.as_array().ok_or("coordinates are not a list")?;
    rings
        .iter()
        .map(|ring| -> Result<Ring, String> {
            let points = ring.as_array().ok_or("ring is not a list")?;
            points.iter().map(point_from_value).collect()
        })
        .collect()
}

fn point_from_value(point: &Value) -> Result<[f64; 2], String> {
    match point.as_array().map(Vec::as_slice) {
        Some([x, y, ..]) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => Ok([x, y]),
            _ => Err(format!("non-numeric point {}", point)),
        },
        _ => Err(format!("invalid point {}", point)),
    }
}

/// Bounding box `[minx, miny, maxx, maxy]` over every point of every ring.
///
/// The running min/max start at NaN, so rings without points yield an
/// all-NaN box.
pub fn bbox(rings: &[Ring]) -> [f64; 4] {
    let mut minx = f64::NAN;
    let mut miny = f64::NAN;
    let mut maxx = f64::NAN;
    let mut maxy = f64::NAN;

    for [x, y] in rings.iter().flatten() {
        // f64::min/max return the non-NaN operand
        minx = x.min(minx);
        miny = y.min(miny);
        maxx = x.max(maxx);
        maxy = y.max(maxy);
    }

    [minx, miny, maxx, maxy]
}

/// `[begin, end]` from a `{begin=<date>, end=<date>}` string.
pub fn time_range(temporal: Option<&Value>) -> [Option<String>; 2] {
    let Some(text) = temporal.and_then(Value::as_str) else {
        return [None, None];
    };

    let extent = as_dict(text, ',', '=');
    let begin = extent.get("begin").and_then(|v| as_iso_date(v));
    let end = extent.get("end").and_then(|v| as_iso_date(v));
    [begin, end]
}

/// Spatial and temporal extent of a record.
pub fn extent(rings: &[Ring], temporal: Option<&Value>) -> RecordExtent {
    RecordExtent::new(bbox(rings), time_range(temporal))
}

/// Polygon footprint built straight from the rings.
pub fn polygon(rings: Vec<Ring>) -> RecordGeometry {
    RecordGeometry::polygon(rings)
}
