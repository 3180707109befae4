//! KD-tree nearest-place index over the admitted gazetteer.
//!
//! The index is built once at startup and is read-only afterwards, so a
//! single instance can be shared by any number of concurrent readers. The
//! tree's distance metric is squared Euclidean over (lat, lon) degrees; it
//! selects the candidate only, and must never be reported to clients as a
//! real-world distance (see [`crate::geodesy`] for that).

use kiddo::float::kdtree::KdTree;
use kiddo::SquaredEuclidean;
use tracing::info;

use crate::error::{Error, Result};
use crate::gazetteer::PlaceRecord;

/// KD-tree bucket size (kiddo default).
const BUCKET_SIZE: usize = 32;

/// Nearest-neighbour index over admitted places.
pub struct SpatialIndex {
    /// KD-tree for spatial queries. Items are indices into the places vec.
    tree: KdTree<f64, usize, 2, BUCKET_SIZE, u32>,
    /// Backing storage owning every admitted place.
    places: Vec<PlaceRecord>,
}

impl SpatialIndex {
    /// Build an index from the admitted place records.
    pub fn build(places: Vec<PlaceRecord>) -> Self {
        let mut tree: KdTree<f64, usize, 2, BUCKET_SIZE, u32> = KdTree::new();
        for (index, place) in places.iter().enumerate() {
            tree.add(&[place.lat, place.lon], index);
        }

        info!(place_count = places.len(), "built spatial index");

        Self { tree, places }
    }

    /// Number of indexed places.
    pub fn len(&self) -> usize {
        self.places.len()
    }

    /// Returns true if the index holds no places.
    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    /// The indexed places, in admission order.
    pub fn places(&self) -> &[PlaceRecord] {
        &self.places
    }

    /// Find the single nearest place to a point.
    ///
    /// Returns the place and the raw tree distance (Euclidean, in degrees).
    /// Ties are broken by traversal order; exact floating-point ties do not
    /// occur in practice. Fails with [`Error::EmptyIndex`] when no places
    /// are indexed.
    pub fn nearest(&self, lat: f64, lon: f64) -> Result<(&PlaceRecord, f64)> {
        if self.places.is_empty() {
            return Err(Error::EmptyIndex);
        }

        let neighbours = self.tree.nearest_n::<SquaredEuclidean>(&[lat, lon], 1);
        let neighbour = neighbours.into_iter().next().ok_or(Error::EmptyIndex)?;

        let place = &self.places[neighbour.item];
        Ok((place, neighbour.distance.sqrt()))
    }
}

impl std::fmt::Debug for SpatialIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpatialIndex")
            .field("place_count", &self.places.len())
            .finish()
    }
}
