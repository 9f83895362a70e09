//! Cue sheet output

use std::{
    fmt::{self, Display, Formatter},
    io::Write,
    path::Path,
};

use crate::{
    domain::track::TrackInfo,
    image::{
        ImageOptions,
        error::ImageError,
        output::{OutputFile, StagedOutput},
    },
};

/// A cue sheet with one audio track per entry, each with a single `INDEX 01`.
///
/// `bin_file_name` is written verbatim inside the quotes.
pub struct CueSheet<'a> {
    pub bin_file_name: &'a str,
    pub tracks: &'a [TrackInfo],
}

impl Display for CueSheet<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "FILE \"{}\" BINARY", self.bin_file_name)?;
        for (i, track) in self.tracks.iter().enumerate() {
            writeln!(f, "  TRACK {:02} AUDIO", i + 1)?;
            writeln!(f, "    TITLE \"{}\"", track.title)?;
            writeln!(f, "    INDEX 01 {}", track.start())?;
        }
        Ok(())
    }
}

pub fn render(bin_file_name: &str, tracks: &[TrackInfo]) -> String {
    CueSheet {
        bin_file_name,
        tracks,
    }
    .to_string()
}

/// Writes the cue sheet for `cue_path`; it is in place once the returned output is persisted.
pub fn emit(
    cue_path: &Path,
    bin_file_name: &str,
    tracks: &[TrackInfo],
    options: &ImageOptions,
) -> Result<StagedOutput, ImageError> {
    let mut cue = OutputFile::create(cue_path, options.atomic)?;
    write!(
        cue,
        "{}",
        CueSheet {
            bin_file_name,
            tracks,
        }
    )
    .map_err(ImageError::io(cue_path))?;
    log::info!("cue sheet with {} track(s) for {}", tracks.len(), cue_path.display());
    cue.finish()
}
