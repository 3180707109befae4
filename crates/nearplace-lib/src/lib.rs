//! Nearest-place enrichment library entry points.
//!
//! This crate exposes helpers to load a place gazetteer, build a spatial
//! index over it, and enrich coordinate-carrying entities with their nearest
//! place, bearing, compass direction, and geodesic distance. Higher-level
//! consumers (the HTTP services) should only depend on the functions exported
//! here instead of reimplementing behavior.

#![deny(warnings)]

pub mod entity;
pub mod enrich;
pub mod error;
pub mod gazetteer;
pub mod geodesy;
pub mod spatial;

pub use entity::{decode_coordinate, Entity};
pub use enrich::{enrich_entity, EnrichmentOutcome, NearestPlace, NEAREST_PLACE_FIELD};
pub use error::{Error, Result};
pub use gazetteer::{load_gazetteer, PlaceRecord};
pub use spatial::SpatialIndex;
