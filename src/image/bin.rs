//! Concatenates WAV payloads into a sector-aligned BIN image

use std::{
    fs::File,
    io::{self, BufReader, Read, Write},
    path::Path,
};

use crate::{
    domain::{SECTOR_SIZE, sector_align, track::TrackInfo},
    image::{
        ImageOptions, ShortPayload,
        error::ImageError,
        output::{OutputFile, StagedOutput},
    },
    wav::{HeaderMode, WavHeader},
};

const COPY_BUFFER_LEN: usize = 64 * 1024;

/// Writes the BIN image and keeps track of where each track starts
pub struct BinAssembler {
    options: ImageOptions,
}

impl BinAssembler {
    pub fn new(options: ImageOptions) -> Self {
        Self { options }
    }

    /// Creates `bin_path` and appends every WAV payload to it in order.
    ///
    /// The image is complete once the returned output is persisted. Any
    /// failure aborts the whole run. In atomic mode nothing is left at
    /// `bin_path`, otherwise the tracks written so far stay on disk.
    pub fn assemble<P: AsRef<Path>>(
        &self,
        wav_paths: &[P],
        bin_path: &Path,
    ) -> Result<(Vec<TrackInfo>, StagedOutput), ImageError> {
        let mut bin = OutputFile::create(bin_path, self.options.atomic)?;
        let tracks = self.write_tracks(wav_paths, &mut bin, bin_path)?;
        Ok((tracks, bin.finish()?))
    }

    /// Appends the tracks to any writer. `out_path` only names the writer in errors.
    pub fn write_tracks<P: AsRef<Path>, W: Write>(
        &self,
        wav_paths: &[P],
        out: &mut W,
        out_path: &Path,
    ) -> Result<Vec<TrackInfo>, ImageError> {
        let mut tracks = Vec::with_capacity(wav_paths.len());
        let mut offset_frames: u32 = 0;

        for wav_path in wav_paths {
            let wav_path = wav_path.as_ref();
            let aligned = self.append_track(wav_path, out, out_path)?;

            let track = TrackInfo::new(TrackInfo::title_from_path(wav_path), offset_frames);
            log::info!(
                "track {:02} \"{}\" at {} ({} sectors)",
                tracks.len() + 1,
                track.title,
                track.start(),
                aligned / SECTOR_SIZE
            );
            tracks.push(track);

            offset_frames = u32::try_from(aligned / SECTOR_SIZE)
                .ok()
                .and_then(|sectors| offset_frames.checked_add(sectors))
                .ok_or_else(|| ImageError::TooLong {
                    path: wav_path.to_path_buf(),
                })?;
        }

        out.flush().map_err(ImageError::io(out_path))?;
        Ok(tracks)
    }

    /// Copies one WAV payload plus its zero padding. Returns the aligned length.
    fn append_track<W: Write>(
        &self,
        wav_path: &Path,
        out: &mut W,
        out_path: &Path,
    ) -> Result<u64, ImageError> {
        let file = File::open(wav_path).map_err(|source| ImageError::OpenWav {
            path: wav_path.to_path_buf(),
            source,
        })?;
        let mut reader = BufReader::new(file);

        let header = WavHeader::read(&mut reader, self.options.header_mode)
            .map_err(|e| ImageError::from_header(wav_path, e))?;

        log::debug!(
            "{}: RIFF size {}, {} ch, {} Hz, {}-bit, {} B/s, align {}, {} bytes of audio",
            wav_path.display(),
            header.chunk_size,
            header.num_channels,
            header.sample_rate,
            header.bits_per_sample,
            header.byte_rate,
            header.block_align,
            header.subchunk2_size
        );
        if self.options.header_mode == HeaderMode::Canonical && !header.is_canonical() {
            log::warn!(
                "{} does not have a canonical 44-byte header, its payload may be misread",
                wav_path.display()
            );
        }
        if !header.is_cd_audio() {
            log::warn!(
                "{} is not 16-bit stereo 44.1 kHz audio, copying it unchanged",
                wav_path.display()
            );
        }

        let raw = u64::from(header.subchunk2_size);
        let aligned = sector_align(raw);

        let copied = copy_payload(&mut reader, raw, out, wav_path, out_path)?;
        if copied < raw {
            match self.options.short_payload {
                ShortPayload::Pad => log::warn!(
                    "{} ends after {copied} of {raw} declared bytes, padding with silence",
                    wav_path.display()
                ),
                ShortPayload::Error => {
                    return Err(ImageError::ShortPayload {
                        path: wav_path.to_path_buf(),
                        expected: raw,
                        actual: copied,
                    });
                }
            }
        }

        io::copy(&mut io::repeat(0).take(aligned - copied), out)
            .map_err(ImageError::io(out_path))?;

        Ok(aligned)
    }
}

/// Copies up to `len` bytes; stops early at end of input.
fn copy_payload<R: Read, W: Write>(
    reader: &mut R,
    len: u64,
    out: &mut W,
    in_path: &Path,
    out_path: &Path,
) -> Result<u64, ImageError> {
    let mut buf = vec![0; COPY_BUFFER_LEN];
    let mut copied = 0u64;

    while copied < len {
        let want = (len - copied).min(buf.len() as u64) as usize;
        let n = match reader.read(&mut buf[..want]) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(ImageError::io(in_path)(e)),
        };
        out.write_all(&buf[..n]).map_err(ImageError::io(out_path))?;
        copied += n as u64;
    }

    Ok(copied)
}
