//! Test utilities for microservice handler testing.
//!
//! Provides a shared [`AppState`] built from the minimal gazetteer fixture.

use std::path::PathBuf;
use std::sync::OnceLock;

use crate::state::AppState;

/// Path to the minimal gazetteer fixture.
pub const TEST_FIXTURE_PATH: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../../docs/fixtures/minimal/places.json"
);

/// Lazily-initialized test state using the fixture gazetteer.
static TEST_STATE: OnceLock<AppState> = OnceLock::new();

/// Get a shared test AppState loaded from the fixture gazetteer.
///
/// The state is cached after the first load.
///
/// # Panics
///
/// Panics if the fixture cannot be loaded; that indicates a test
/// configuration issue.
pub fn test_state() -> AppState {
    TEST_STATE
        .get_or_init(|| {
            let path = PathBuf::from(TEST_FIXTURE_PATH);
            AppState::load(&path)
                .unwrap_or_else(|e| panic!("failed to load test fixture from {:?}: {}", path, e))
        })
        .clone()
}

/// Get the absolute path to the fixture gazetteer.
pub fn fixture_places_path() -> PathBuf {
    PathBuf::from(TEST_FIXTURE_PATH)
}

/// Known fixture places for use in tests.
pub mod fixture_places {
    /// Admitted: postal code 1000, OSLO.
    pub const OSLO: (&str, f64, f64) = ("1000", 59.9133, 10.7389);

    /// Admitted: postal code 5003, BERGEN.
    pub const BERGEN: (&str, f64, f64) = ("5003", 60.3930, 5.3242);

    /// Admitted: postal code 4006, STAVANGER.
    pub const STAVANGER: (&str, f64, f64) = ("4006", 58.9690, 5.7331);

    /// Filtered out by the reserved "00" prefix; sits right next to OSLO.
    pub const RESERVED_OSLO: (&str, f64, f64) = ("0025", 59.9140, 10.7400);

    /// Filtered out by the decommission marker in its name.
    pub const DECOMMISSIONED_KRISTIANSAND: (&str, f64, f64) = ("4601", 58.1467, 7.9956);

    /// Number of admitted places in the fixture.
    pub const ADMITTED_COUNT: usize = 5;
}
