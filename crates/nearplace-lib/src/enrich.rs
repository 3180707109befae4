//! Per-entity enrichment: decode, nearest-place lookup, geodesy, attach.

use serde_json::Value;
use tracing::debug;

use crate::entity::{decode_coordinate, Entity, LAT_FIELD, LON_FIELD};
use crate::error::Result;
use crate::geodesy::{compass_direction, distance, initial_bearing};
use crate::spatial::SpatialIndex;

/// Key under which the enrichment result is attached to an entity.
pub const NEAREST_PLACE_FIELD: &str = "nearest_place";

/// The nearest-place block attached to an enriched entity.
///
/// Bearing and distance are measured from the matched place towards the
/// entity's position.
#[derive(Debug, Clone, PartialEq)]
pub struct NearestPlace {
    pub postal_code: String,
    pub name: String,
    pub bearing: f64,
    pub direction: &'static str,
    pub distance: f64,
    pub lat: f64,
    pub lon: f64,
}

impl NearestPlace {
    fn into_value(self) -> Value {
        serde_json::json!({
            "postal_code": self.postal_code,
            "name": self.name,
            "bearing": self.bearing,
            "direction": self.direction,
            "distance": self.distance,
            "lat": self.lat,
            "lon": self.lon,
        })
    }
}

/// What [`enrich_entity`] did with the entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrichmentOutcome {
    /// Coordinates were present and a `nearest_place` block was attached.
    Enriched,
    /// The entity carried no coordinates and was left untouched.
    Skipped,
}

/// Enrich a single entity with its nearest place.
///
/// Entities missing `lat` or `lon` are left untouched. On error the entity is
/// also left untouched, so callers can pass it through and keep the batch
/// going; failures here never concern more than this one entity, except for
/// [`crate::Error::EmptyIndex`] which no entity with coordinates can avoid.
pub fn enrich_entity(index: &SpatialIndex, entity: &mut Entity) -> Result<EnrichmentOutcome> {
    let (Some(raw_lat), Some(raw_lon)) = (entity.get(LAT_FIELD), entity.get(LON_FIELD)) else {
        return Ok(EnrichmentOutcome::Skipped);
    };

    let entity_lat = decode_coordinate(raw_lat)?;
    let entity_lon = decode_coordinate(raw_lon)?;

    let (place, _) = index.nearest(entity_lat, entity_lon)?;

    let bearing = initial_bearing(place.lat, place.lon, entity_lat, entity_lon);
    let nearest = NearestPlace {
        postal_code: place.postal_code.clone(),
        name: place.name.clone(),
        bearing,
        direction: compass_direction(bearing),
        distance: distance(place.lat, place.lon, entity_lat, entity_lon),
        lat: place.lat,
        lon: place.lon,
    };

    debug!(
        postal_code = %nearest.postal_code,
        distance = nearest.distance,
        "matched nearest place"
    );

    entity.insert(NEAREST_PLACE_FIELD.to_string(), nearest.into_value());
    Ok(EnrichmentOutcome::Enriched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gazetteer::PlaceRecord;
    use serde_json::json;

    fn oslo_index() -> SpatialIndex {
        SpatialIndex::build(vec![PlaceRecord {
            postal_code: "1000".to_string(),
            name: "OSLO".to_string(),
            lat: 59.91,
            lon: 10.74,
        }])
    }

    fn entity_from(value: Value) -> Entity {
        value.as_object().expect("test entity is an object").clone()
    }

    #[test]
    fn entity_without_coordinates_is_untouched() {
        let index = oslo_index();
        let mut entity = entity_from(json!({"mmsi": 257_012_345u64, "name": "MS Test"}));
        let before = entity.clone();

        let outcome = enrich_entity(&index, &mut entity).unwrap();

        assert_eq!(outcome, EnrichmentOutcome::Skipped);
        assert_eq!(entity, before);
    }

    #[test]
    fn entity_with_one_coordinate_is_untouched() {
        let index = oslo_index();
        let mut entity = entity_from(json!({"lat": 59.9}));
        let before = entity.clone();

        assert_eq!(
            enrich_entity(&index, &mut entity).unwrap(),
            EnrichmentOutcome::Skipped
        );
        assert_eq!(entity, before);
    }

    #[test]
    fn enrichment_attaches_the_nearest_place_block() {
        let index = oslo_index();
        let mut entity = entity_from(json!({"lat": 60.0, "lon": 10.8, "callsign": "LFAB"}));

        let outcome = enrich_entity(&index, &mut entity).unwrap();
        assert_eq!(outcome, EnrichmentOutcome::Enriched);

        // Unrelated fields survive unchanged.
        assert_eq!(entity.get("callsign"), Some(&json!("LFAB")));

        let nearest = entity
            .get(NEAREST_PLACE_FIELD)
            .and_then(Value::as_object)
            .expect("nearest_place attached");
        assert_eq!(nearest.get("postal_code"), Some(&json!("1000")));
        assert_eq!(nearest.get("name"), Some(&json!("OSLO")));
        assert_eq!(nearest.get("lat"), Some(&json!(59.91)));
        assert_eq!(nearest.get("lon"), Some(&json!(10.74)));
        assert!(nearest.get("distance").unwrap().as_f64().unwrap() > 0.0);

        let bearing = nearest.get("bearing").unwrap().as_f64().unwrap();
        assert!((0.0..360.0).contains(&bearing));
        assert!(nearest.get("direction").unwrap().is_string());
    }

    #[test]
    fn tagged_string_coordinates_enrich_like_numbers() {
        let index = oslo_index();

        let mut tagged = entity_from(json!({"lat": "~f60.0", "lon": "~d10.8"}));
        let mut numeric = entity_from(json!({"lat": 60.0, "lon": 10.8}));

        enrich_entity(&index, &mut tagged).unwrap();
        enrich_entity(&index, &mut numeric).unwrap();

        assert_eq!(
            tagged.get(NEAREST_PLACE_FIELD),
            numeric.get(NEAREST_PLACE_FIELD)
        );
    }

    #[test]
    fn malformed_coordinates_leave_the_entity_untouched() {
        let index = oslo_index();
        let mut entity = entity_from(json!({"lat": "sixty", "lon": 10.8, "id": 7}));
        let before = entity.clone();

        let err = enrich_entity(&index, &mut entity).unwrap_err();
        assert!(matches!(err, crate::Error::MalformedCoordinate { .. }));
        assert_eq!(entity, before);
    }

    #[test]
    fn empty_index_is_reported() {
        let index = SpatialIndex::build(Vec::new());
        let mut entity = entity_from(json!({"lat": 60.0, "lon": 10.8}));

        let err = enrich_entity(&index, &mut entity).unwrap_err();
        assert!(matches!(err, crate::Error::EmptyIndex));
        assert!(!entity.contains_key(NEAREST_PLACE_FIELD));
    }

    #[test]
    fn coincident_entity_and_place_do_not_blow_up() {
        let index = oslo_index();
        let mut entity = entity_from(json!({"lat": 59.91, "lon": 10.74}));

        enrich_entity(&index, &mut entity).unwrap();

        let nearest = entity
            .get(NEAREST_PLACE_FIELD)
            .and_then(Value::as_object)
            .unwrap();
        assert_eq!(nearest.get("distance"), Some(&json!(0.0)));
        assert_eq!(nearest.get("bearing"), Some(&json!(0.0)));
        assert_eq!(nearest.get("direction"), Some(&json!("N")));
    }
}
