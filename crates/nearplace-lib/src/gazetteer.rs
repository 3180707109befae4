//! Gazetteer loading and admission filtering.
//!
//! The gazetteer is a JSON array of place objects with string fields `POSTNR`
//! and `POSTSTAD` and string-or-numeric fields `LAT` and `LON`. Places with a
//! reserved postal prefix or a decommission marker in their name are dropped
//! at load time and never reach the spatial index.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Postal codes with this prefix are reserved and never admitted.
const RESERVED_POSTAL_PREFIX: &str = "00";

/// Case-insensitive marker on the names of decommissioned places.
const DECOMMISSIONED_MARKER: &str = "ikkje i bruk";

/// Raw place row as it appears in the gazetteer file.
#[derive(Debug, Clone, Deserialize)]
struct RawPlace {
    #[serde(rename = "POSTNR")]
    postal_code: String,
    #[serde(rename = "POSTSTAD")]
    name: String,
    #[serde(rename = "LAT")]
    lat: RawCoordinate,
    #[serde(rename = "LON")]
    lon: RawCoordinate,
}

/// Gazetteer coordinates arrive either as numbers or as numeric strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawCoordinate {
    Number(f64),
    Text(String),
}

impl RawCoordinate {
    fn into_degrees(self, postal_code: &str) -> Result<f64> {
        match self {
            RawCoordinate::Number(value) => Ok(value),
            RawCoordinate::Text(text) => {
                text.trim()
                    .parse::<f64>()
                    .map_err(|_| Error::InvalidPlaceCoordinate {
                        postal_code: postal_code.to_string(),
                        value: text,
                    })
            }
        }
    }
}

/// An admitted place.
///
/// Identity is the (postal_code, name) pair; duplicates are permitted and
/// indexed independently.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceRecord {
    pub postal_code: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

/// Whether a place passes the fixed admission filter.
pub fn is_admitted(postal_code: &str, name: &str) -> bool {
    !postal_code.starts_with(RESERVED_POSTAL_PREFIX)
        && !name.to_lowercase().contains(DECOMMISSIONED_MARKER)
}

/// Load the gazetteer and return the admitted places in file order.
///
/// A missing or unparseable file is an error; callers treat this as fatal at
/// startup. Logs the admitted count.
pub fn load_gazetteer(path: &Path) -> Result<Vec<PlaceRecord>> {
    if !path.exists() {
        return Err(Error::GazetteerNotFound {
            path: path.to_path_buf(),
        });
    }

    let file = File::open(path)?;
    let raw: Vec<RawPlace> =
        serde_json::from_reader(BufReader::new(file)).map_err(|e| Error::GazetteerParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let total = raw.len();
    let mut places = Vec::with_capacity(total);
    for place in raw {
        if !is_admitted(&place.postal_code, &place.name) {
            debug!(
                postal_code = %place.postal_code,
                name = %place.name,
                "skipping filtered place"
            );
            continue;
        }

        let lat = place.lat.into_degrees(&place.postal_code)?;
        let lon = place.lon.into_degrees(&place.postal_code)?;
        places.push(PlaceRecord {
            postal_code: place.postal_code,
            name: place.name,
            lat,
            lon,
        });
    }

    info!(
        admitted = places.len(),
        skipped = total - places.len(),
        "loaded gazetteer"
    );

    Ok(places)
}
