//! Application state for HTTP microservices.
//!
//! The state is loaded once before the server starts accepting requests and
//! is thereafter read-only: handlers share the spatial index through an
//! `Arc`, and no writer ever touches it again.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use nearplace_lib::{load_gazetteer, Error as LibError, SpatialIndex};

/// Error during application state initialization.
#[derive(Debug)]
pub enum AppStateError {
    /// Gazetteer file not found.
    GazetteerNotFound(String),

    /// Failed to load or parse the gazetteer.
    GazetteerLoad(LibError),
}

impl std::fmt::Display for AppStateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GazetteerNotFound(path) => write!(f, "gazetteer not found: {}", path),
            Self::GazetteerLoad(e) => write!(f, "failed to load gazetteer: {}", e),
        }
    }
}

impl std::error::Error for AppStateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::GazetteerLoad(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LibError> for AppStateError {
    fn from(err: LibError) -> Self {
        Self::GazetteerLoad(err)
    }
}

/// Shared application state for all axum handlers.
///
/// Cheaply cloneable (`Arc` internally); share it via axum's `State`
/// extractor.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    index: SpatialIndex,
    source: Option<PathBuf>,
}

impl AppState {
    /// Load application state from a gazetteer file.
    ///
    /// Reads and filters the place dataset, then builds the spatial index.
    /// Any failure here is fatal: the service must not start serving without
    /// its index.
    pub fn load(places_path: impl AsRef<Path>) -> Result<Self, AppStateError> {
        let path = places_path.as_ref();

        if !path.exists() {
            return Err(AppStateError::GazetteerNotFound(
                path.display().to_string(),
            ));
        }

        tracing::info!(path = %path.display(), "loading gazetteer");
        let places = load_gazetteer(path)?;

        let index = SpatialIndex::build(places);
        tracing::info!(places_indexed = index.len(), "spatial index ready");

        Ok(Self {
            inner: Arc::new(AppStateInner {
                index,
                source: Some(path.to_path_buf()),
            }),
        })
    }

    /// Create application state from a pre-built index.
    ///
    /// Useful for tests and for embedding.
    pub fn from_index(index: SpatialIndex) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                index,
                source: None,
            }),
        }
    }

    /// Access the spatial index.
    pub fn index(&self) -> &SpatialIndex {
        &self.inner.index
    }

    /// Path the gazetteer was loaded from, when loaded from disk.
    pub fn source(&self) -> Option<&Path> {
        self.inner.source.as_deref()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("places_indexed", &self.inner.index.len())
            .field("source", &self.inner.source)
            .finish()
    }
}
