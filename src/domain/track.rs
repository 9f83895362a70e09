use std::path::Path;

use crate::domain::cdtime::CdTime;

/// One audio track inside the BIN image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackInfo {
    pub title: String,
    /// Start of the track within the image, in CD frames (sectors)
    pub offset_frames: u32,
}

impl TrackInfo {
    pub fn new(title: impl Into<String>, offset_frames: u32) -> Self {
        Self {
            title: title.into(),
            offset_frames,
        }
    }

    /// Title of a track read from `path`: the file name without directory or extension.
    pub fn title_from_path(path: &Path) -> String {
        path.file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn start(&self) -> CdTime {
        CdTime::from_frames(self.offset_frames)
    }
}
