use std::{io, path::PathBuf};

use thiserror::Error;

use crate::wav::error::HeaderError;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Failed to open WAV file: {}", path.display())]
    OpenWav { path: PathBuf, source: io::Error },

    #[error("Invalid or unsupported WAV file format: {}", path.display())]
    Format { path: PathBuf, source: HeaderError },

    #[error(
        "WAV file {} declares {expected} bytes of audio but holds only {actual}",
        path.display()
    )]
    ShortPayload {
        path: PathBuf,
        expected: u64,
        actual: u64,
    },

    #[error("I/O error on {}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("image exceeds the addressable frame count at {}", path.display())]
    TooLong { path: PathBuf },

    #[error("no WAV files to convert")]
    NoInputs,
}

impl ImageError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| ImageError::Io { path, source }
    }

    /// Header failures are format errors unless the read itself failed.
    pub(crate) fn from_header(path: impl Into<PathBuf>, err: HeaderError) -> Self {
        match err {
            HeaderError::Io(source) => ImageError::Io {
                path: path.into(),
                source,
            },
            source => ImageError::Format {
                path: path.into(),
                source,
            },
        }
    }
}
