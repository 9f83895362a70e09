//! BIN/CUE image writing

use serde::Deserialize;

use crate::wav::HeaderMode;

pub mod bin;
pub mod cue;
pub mod error;
pub mod inputs;
pub mod output;

/// What to do when a WAV file holds fewer payload bytes than its header declares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShortPayload {
    /// Declared size wins: the missing bytes become silence
    #[default]
    Pad,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageOptions {
    pub header_mode: HeaderMode,
    pub short_payload: ShortPayload,
    /// Write outputs to a temporary file and rename on success
    pub atomic: bool,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            header_mode: HeaderMode::default(),
            short_payload: ShortPayload::default(),
            atomic: true,
        }
    }
}
