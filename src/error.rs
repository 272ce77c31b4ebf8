//! Error types for the fencing pose analysis library.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Technique identifier not recognised
    #[error("Unknown technique: {0}")]
    UnknownTechnique(String),

    /// Weapon identifier not recognised
    #[error("Unknown weapon: {0}")]
    UnknownWeapon(String),

    /// Landmark name not recognised
    #[error("Unknown landmark: {0}")]
    UnknownLandmark(String),

    /// The external pose detector failed for a frame
    #[error("Pose detector error: {0}")]
    Detector(String),

    /// Filter initialization or processing error
    #[error("Filter error: {0}")]
    FilterError(String),

    /// Template catalog could not be parsed or is inconsistent
    #[error("Template error: {0}")]
    TemplateError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
