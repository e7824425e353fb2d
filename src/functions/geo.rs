//! Geography functions (`geo::`).
//!
//! Points are either GeoJSON (`{"type": "Point", "coordinates": [lng, lat]}`)
//! or stored geopoints (`{"_type": "geopoint", "lat": .., "lng": ..}`).

use super::{Call, Dispatch};
use crate::value::{Map, Value};

pub(super) const FUNCTIONS: &[&str] = &["distance", "latLng"];

/// Mean Earth radius in metres.
const EARTH_RADIUS: f64 = 6_371_008.8;

const GEOJSON_TYPES: [&str; 6] = [
    "Point",
    "LineString",
    "Polygon",
    "MultiPoint",
    "MultiLineString",
    "MultiPolygon",
];

/// Call a geo function. Returns None if function not found.
pub(super) fn call(name: &str, call: &Call<'_>) -> Dispatch {
    let result = match name {
        "latLng" => {
            if call.len() != 2 {
                return Ok(Some(Value::Null));
            }
            match (call.arg(0)?, call.arg(1)?) {
                (Value::Number(lat), Value::Number(lng)) => lat_lng(lat, lng),
                _ => Value::Null,
            }
        }

        "distance" => {
            if call.len() != 2 {
                return Ok(Some(Value::Null));
            }
            match (point(&call.arg(0)?), point(&call.arg(1)?)) {
                (Some(a), Some(b)) => Value::Number(haversine(a, b)),
                _ => Value::Null,
            }
        }

        _ => return Ok(None),
    };

    Ok(Some(result))
}

/// Is this a GeoJSON geometry or a geopoint?
pub(super) fn is_geo(value: &Value) -> bool {
    if value.get("_type").and_then(Value::as_str) == Some("geopoint") {
        return point(value).is_some();
    }
    let geo_type = value.get("type").and_then(Value::as_str);
    geo_type.is_some_and(|t| GEOJSON_TYPES.contains(&t))
        && value.get("coordinates").and_then(Value::as_array).is_some()
}

fn lat_lng(lat: f64, lng: f64) -> Value {
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return Value::Null;
    }
    let mut point = Map::new();
    point.insert("type".to_string(), Value::from("Point"));
    point.insert(
        "coordinates".to_string(),
        Value::Array(vec![Value::Number(lng), Value::Number(lat)]),
    );
    Value::Object(point)
}

/// `(lat, lng)` of a point value.
fn point(value: &Value) -> Option<(f64, f64)> {
    if value.get("_type").and_then(Value::as_str) == Some("geopoint") {
        let lat = value.get("lat")?.as_f64()?;
        let lng = value.get("lng")?.as_f64()?;
        return Some((lat, lng));
    }
    if value.get("type").and_then(Value::as_str) != Some("Point") {
        return None;
    }
    match value.get("coordinates")?.as_array()? {
        [lng, lat] => Some((lat.as_f64()?, lng.as_f64()?)),
        _ => None,
    }
}

/// Great-circle distance in metres.
fn haversine((lat1, lng1): (f64, f64), (lat2, lng2): (f64, f64)) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lng2 - lng1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS * a.sqrt().asin()
}
