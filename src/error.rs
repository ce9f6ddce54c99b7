//! Error types for loading, saving and configuring the editor.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced to the user by editor operations.
///
/// None of these are fatal: the editor keeps its last valid state and the
/// shell reports the error as a notice.
#[derive(Error, Debug)]
pub enum EditorError {
    /// The file is not a readable or supported image
    #[error("Could not decode image {path:?}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The image could not be encoded in the format implied by the path
    #[error("Could not encode image {path:?}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Writing the encoded image failed
    #[error("IO error writing {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The operation needs a loaded image
    #[error("No image loaded")]
    NoImage,
}

impl EditorError {
    /// Short title for the notice window.
    pub fn title(&self) -> &'static str {
        match self {
            EditorError::Decode { .. } => "Cannot open image",
            EditorError::Encode { .. } | EditorError::Io { .. } => "Cannot save image",
            EditorError::NoImage => "No image",
        }
    }
}

/// Errors reading the configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid config {path:?}: {message}")]
    Invalid { path: PathBuf, message: String },
}
