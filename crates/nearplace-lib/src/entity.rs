//! Entities and transit-tagged coordinate decoding.
//!
//! An entity is an opaque, order-preserving mapping of caller-supplied
//! fields. The pipeline only ever inspects `lat` and `lon`; every other
//! field passes through untouched.

use serde_json::Value;

use crate::error::{Error, Result};

/// An entity as submitted by the caller.
pub type Entity = serde_json::Map<String, Value>;

/// Entity field holding the latitude.
pub const LAT_FIELD: &str = "lat";

/// Entity field holding the longitude.
pub const LON_FIELD: &str = "lon";

/// Transit type tag for float-encoded coordinate strings.
const FLOAT_TAG: &str = "~f";

/// Transit type tag for decimal-encoded coordinate strings.
const DECIMAL_TAG: &str = "~d";

/// Normalize a raw coordinate field into decimal degrees.
///
/// Numbers pass through as-is. Strings must carry a `~f` or `~d` type tag
/// followed by a float literal; anything else is a
/// [`Error::MalformedCoordinate`].
pub fn decode_coordinate(raw: &Value) -> Result<f64> {
    match raw {
        Value::Number(number) => number.as_f64().ok_or_else(|| malformed(raw)),
        Value::String(text) => {
            let literal = text
                .strip_prefix(FLOAT_TAG)
                .or_else(|| text.strip_prefix(DECIMAL_TAG))
                .ok_or_else(|| malformed(raw))?;
            literal.parse::<f64>().map_err(|_| malformed(raw))
        }
        _ => Err(malformed(raw)),
    }
}

fn malformed(raw: &Value) -> Error {
    Error::MalformedCoordinate {
        value: raw.to_string(),
    }
}
