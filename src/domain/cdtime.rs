use std::fmt::{Display, Formatter};

/// A minutes:seconds:frames address, as written in cue sheets.
///
/// One frame is 1/75 of a second, which is exactly one 2352-byte sector of
/// CD-DA audio. Minutes are not capped at 99.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CdTime {
    pub minutes: u32,
    pub seconds: u8,
    pub frames: u8,
}

impl CdTime {
    pub const SECONDS_PER_MINUTE: u8 = 60;
    pub const FRAMES_PER_SECOND: u8 = 75;

    pub fn from_frames(frames: u32) -> Self {
        let fps = u32::from(Self::FRAMES_PER_SECOND);
        let spm = u32::from(Self::SECONDS_PER_MINUTE);

        let minutes = frames / (fps * spm);
        let seconds = (frames / fps) % spm;
        let frames = frames % fps;

        Self {
            minutes,
            seconds: seconds as u8,
            frames: frames as u8,
        }
    }
}

impl Display for CdTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.minutes, self.seconds, self.frames)
    }
}

#[cfg(test)]
mod tests {
    use super::CdTime;

    #[test]
    fn formats_known_offsets() {
        assert_eq!(CdTime::from_frames(0).to_string(), "00:00:00");
        assert_eq!(CdTime::from_frames(75).to_string(), "00:01:00");
        assert_eq!(CdTime::from_frames(80).to_string(), "00:01:05");
        assert_eq!(CdTime::from_frames(4500).to_string(), "01:00:00");
    }

    #[test]
    fn last_frame_of_a_minute() {
        let time = CdTime::from_frames(4499);
        assert_eq!(
            time,
            CdTime {
                minutes: 0,
                seconds: 59,
                frames: 74
            }
        );
        assert_eq!(time.to_string(), "00:59:74");
    }

    #[test]
    fn long_images_are_not_capped() {
        let time = CdTime::from_frames(100 * 4500 + 75 + 1);
        assert_eq!(time.to_string(), "100:01:01");
    }

}
