//! Crate-wide error taxonomy.
//!
//! Configuration problems are recoverable: the caller keeps its last good
//! world. Generation errors indicate a broken internal invariant and are
//! not expected for any configuration that passed validation.

/// Type alias used by every fallible operation in the core.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Rejected configuration. Raised synchronously from `World::init` /
    /// `Terrain::partition` before any state is replaced.
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// Internal invariant violated during height-field synthesis.
    #[error("generation error: {message}")]
    Generation { message: String },

    /// Sprite/image asset could not be loaded or decoded.
    #[error("asset error ({path}): {message}")]
    Asset { path: String, message: String },

    /// Settings file could not be read or parsed.
    #[error("settings error: {message}")]
    Settings { message: String },
}

impl Error {
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    pub fn generation(message: impl Into<String>) -> Self {
        Error::Generation {
            message: message.into(),
        }
    }

    pub fn settings(message: impl Into<String>) -> Self {
        Error::Settings {
            message: message.into(),
        }
    }
}
