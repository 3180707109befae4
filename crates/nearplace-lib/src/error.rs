use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for the nearplace library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Gazetteer file could not be located at the given path.
    #[error("gazetteer not found at {path}")]
    GazetteerNotFound { path: PathBuf },

    /// Gazetteer file exists but is not a valid place dataset.
    #[error("failed to parse gazetteer {path}: {message}")]
    GazetteerParse { path: PathBuf, message: String },

    /// A gazetteer coordinate was neither numeric nor a numeric string.
    #[error("invalid coordinate {value} for place {postal_code}")]
    InvalidPlaceCoordinate { postal_code: String, value: String },

    /// Raised when querying an index that holds no admitted places.
    #[error("spatial index contains no places")]
    EmptyIndex,

    /// An entity coordinate was neither numeric nor a recognized tagged string.
    #[error("malformed coordinate value: {value}")]
    MalformedCoordinate { value: String },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
