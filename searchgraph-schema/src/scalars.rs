//! Value-level handling for the custom scalar types.
//!
//! Two directions per scalar: normalization of backend-stored values into
//! the canonical output shape, and parsing of caller input with
//! validation. Geo shapes need neither; they are GeoJSON already and pass
//! through untouched.

use std::net::IpAddr;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{Result, SchemaError};

const MIN_LATITUDE: f64 = -90.0;
const MAX_LATITUDE: f64 = 90.0;
const MIN_LONGITUDE: f64 = -180.0;
const MAX_LONGITUDE: f64 = 180.0;

/// Canonical geographic point: latitude and longitude in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPointValue {
    pub lat: f64,
    pub lon: f64,
}

fn invalid(scalar: &'static str, reason: impl Into<String>) -> SchemaError {
    SchemaError::InvalidScalar {
        scalar,
        reason: reason.into(),
    }
}

fn coordinate(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Normalize a stored geo point into the `{lat, lon}` object form.
///
/// Backends accept several storage formats: an object with `lat`/`lon`
/// (or spelled-out `latitude`/`longitude`), an array in GeoJSON
/// `[lon, lat]` order, and a `"lat,lon"` string. Values in none of these
/// shapes are returned unchanged rather than rejected; normalization is
/// an output path and should not fail on exotic stored data.
pub fn normalize_geo_point(value: &Value) -> Value {
    match value {
        Value::Null => Value::Null,
        Value::Object(map) => {
            let pair = match (map.get("lat"), map.get("lon")) {
                (Some(lat), Some(lon)) => Some((lat, lon)),
                _ => match (map.get("latitude"), map.get("longitude")) {
                    (Some(lat), Some(lon)) => Some((lat, lon)),
                    _ => None,
                },
            };
            match pair.and_then(|(lat, lon)| Some((coordinate(lat)?, coordinate(lon)?))) {
                Some((lat, lon)) => json!({"lat": lat, "lon": lon}),
                None => value.clone(),
            }
        }
        Value::Array(items) if items.len() == 2 => {
            // GeoJSON convention: longitude first.
            match (coordinate(&items[1]), coordinate(&items[0])) {
                (Some(lat), Some(lon)) => json!({"lat": lat, "lon": lon}),
                _ => value.clone(),
            }
        }
        Value::String(s) => {
            let parts: Vec<&str> = s.split(',').collect();
            if parts.len() == 2 {
                let lat = parts[0].trim().parse::<f64>();
                let lon = parts[1].trim().parse::<f64>();
                if let (Ok(lat), Ok(lon)) = (lat, lon) {
                    return json!({"lat": lat, "lon": lon});
                }
            }
            value.clone()
        }
        _ => value.clone(),
    }
}

/// Parse caller input into a validated geo point.
///
/// Input must be an object with numeric `lat` and `lon` within the
/// standard coordinate ranges.
pub fn parse_geo_point(value: &Value) -> Result<GeoPointValue> {
    let map = value
        .as_object()
        .ok_or_else(|| invalid("GeoPoint", "must be an object with lat and lon fields"))?;

    let (lat_raw, lon_raw) = match (map.get("lat"), map.get("lon")) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => return Err(invalid("GeoPoint", "must have both 'lat' and 'lon' fields")),
    };

    let lat = coordinate(lat_raw).ok_or_else(|| invalid("GeoPoint", "lat must be numeric"))?;
    let lon = coordinate(lon_raw).ok_or_else(|| invalid("GeoPoint", "lon must be numeric"))?;

    if !(MIN_LATITUDE..=MAX_LATITUDE).contains(&lat) {
        return Err(invalid(
            "GeoPoint",
            format!("latitude must be between {MIN_LATITUDE} and {MAX_LATITUDE}, got {lat}"),
        ));
    }
    if !(MIN_LONGITUDE..=MAX_LONGITUDE).contains(&lon) {
        return Err(invalid(
            "GeoPoint",
            format!("longitude must be between {MIN_LONGITUDE} and {MAX_LONGITUDE}, got {lon}"),
        ));
    }

    Ok(GeoPointValue { lat, lon })
}

/// Parse and validate an IP address, v4 or v6.
pub fn parse_ip(value: &Value) -> Result<IpAddr> {
    let text = value
        .as_str()
        .ok_or_else(|| invalid("IP", "must be a string"))?
        .trim();
    if text.is_empty() {
        return Err(invalid("IP", "address cannot be empty"));
    }
    text.parse()
        .map_err(|_| invalid("IP", format!("invalid address format: {text}")))
}

/// Parse a token count: a non-negative integer, given as a number or a
/// numeric string.
pub fn parse_token_count(value: &Value) -> Result<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| invalid("TokenCount", "must be a non-negative integer")),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| invalid("TokenCount", format!("not an integer: {s}"))),
        _ => Err(invalid("TokenCount", "must be an integer")),
    }
}

/// Normalize a completion suggestion to its string form.
///
/// Stored completion values can be a bare string or an input-list/object
/// envelope; anything non-string is rendered as its JSON text.
pub fn normalize_completion(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Parse a date-time value: an RFC 3339 string or epoch milliseconds,
/// the two formats backends emit by default.
pub fn parse_datetime(value: &Value) -> Result<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|err| invalid("DateTime", format!("invalid timestamp '{s}': {err}"))),
        Value::Number(n) => {
            let millis = n
                .as_i64()
                .ok_or_else(|| invalid("DateTime", "epoch milliseconds out of range"))?;
            Utc.timestamp_millis_opt(millis)
                .single()
                .ok_or_else(|| invalid("DateTime", "epoch milliseconds out of range"))
        }
        _ => Err(invalid(
            "DateTime",
            "must be an RFC 3339 string or epoch milliseconds",
        )),
    }
}
