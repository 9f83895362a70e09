use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HeaderError {
    #[error("missing RIFF signature (found \"{}\")", .0.escape_ascii())]
    NotRiff([u8; 4]),

    #[error("RIFF form is not WAVE (found \"{}\")", .0.escape_ascii())]
    NotWave([u8; 4]),

    #[error("audio format {0} is not PCM")]
    UnsupportedFormat(u16),

    #[error("data chunk appears before the fmt chunk")]
    MissingFmt,

    #[error("no data chunk found")]
    MissingData,

    #[error("fmt chunk is too short ({0} bytes)")]
    ShortFmt(u32),

    #[error("header is truncated")]
    Truncated,

    #[error("read error: {0}")]
    Io(io::Error),
}

impl From<io::Error> for HeaderError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::UnexpectedEof => HeaderError::Truncated,
            _ => HeaderError::Io(err),
        }
    }
}
