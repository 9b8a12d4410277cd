use ark_serialize::SerializationError;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failures at the artifact boundary: ceremony files, evaluation files and key files.
#[derive(Error, Debug)]
pub enum ArtifactError {
    /// Open / create / read / write failure reported by the OS.
    #[error("Stream error on {path}: {source}")]
    Stream {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Malformed or truncated payload for a header, point or key.
    #[error("Decode error in {what}: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: SerializationError,
    },

    /// Declared and actual shapes disagree.
    #[error("Validation error: {0}")]
    Validation(String),
}

impl ArtifactError {
    pub fn stream(path: &Path, source: io::Error) -> Self {
        ArtifactError::Stream { path: path.to_path_buf(), source }
    }

    pub fn decode(what: &'static str, source: SerializationError) -> Self {
        ArtifactError::Decode { what, source }
    }
}

pub type Result<T> = std::result::Result<T, ArtifactError>;
