//! WAV header decoding and validation

use std::io::{self, Read};

use byteorder::{LittleEndian, ReadBytesExt};
use serde::Deserialize;

pub mod error;

use error::HeaderError;

pub const RIFF_ID: [u8; 4] = *b"RIFF";
pub const WAVE_ID: [u8; 4] = *b"WAVE";
pub const FMT_ID: [u8; 4] = *b"fmt ";
pub const DATA_ID: [u8; 4] = *b"data";

pub const FORMAT_PCM: u16 = 1;

/// How the header in front of the PCM payload is located
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderMode {
    /// Fixed 44-byte layout, `data` assumed to follow `fmt ` immediately
    Canonical,
    /// Walk sub-chunks by id and size until `data` is found
    #[default]
    Chunked,
}

/// Header fields of a PCM WAV file, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WavHeader {
    pub chunk_id: [u8; 4],
    pub chunk_size: u32,
    pub format: [u8; 4],
    pub subchunk1_id: [u8; 4],
    pub subchunk1_size: u32,
    pub audio_format: u16,
    pub num_channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
    pub subchunk2_id: [u8; 4],
    /// Length in bytes of the PCM payload that follows the header
    pub subchunk2_size: u32,
}

/// Fields of the `fmt ` chunk body that PCM uses
struct FmtBody {
    audio_format: u16,
    num_channels: u16,
    sample_rate: u32,
    byte_rate: u32,
    block_align: u16,
    bits_per_sample: u16,
}

impl WavHeader {
    /// Reads a header and leaves `reader` at the first byte of the PCM payload.
    pub fn read<R: Read>(reader: &mut R, mode: HeaderMode) -> Result<Self, HeaderError> {
        let header = match mode {
            HeaderMode::Canonical => Self::read_canonical(reader)?,
            HeaderMode::Chunked => Self::read_chunked(reader)?,
        };
        header.validate()?;
        Ok(header)
    }

    pub fn validate(&self) -> Result<(), HeaderError> {
        if self.chunk_id != RIFF_ID {
            return Err(HeaderError::NotRiff(self.chunk_id));
        }
        if self.format != WAVE_ID {
            return Err(HeaderError::NotWave(self.format));
        }
        if self.audio_format != FORMAT_PCM {
            return Err(HeaderError::UnsupportedFormat(self.audio_format));
        }
        Ok(())
    }

    /// Red Book audio: stereo, 44.1 kHz, 16-bit
    pub fn is_cd_audio(&self) -> bool {
        self.num_channels == 2 && self.sample_rate == 44_100 && self.bits_per_sample == 16
    }

    /// `fmt ` with a plain 16-byte PCM body, directly followed by `data`
    pub fn is_canonical(&self) -> bool {
        self.subchunk1_id == FMT_ID && self.subchunk1_size == 16 && self.subchunk2_id == DATA_ID
    }

    fn read_canonical<R: Read>(reader: &mut R) -> Result<Self, HeaderError> {
        let chunk_id = read_fourcc(reader)?;
        let chunk_size = reader.read_u32::<LittleEndian>()?;
        let format = read_fourcc(reader)?;
        let subchunk1_id = read_fourcc(reader)?;
        let subchunk1_size = reader.read_u32::<LittleEndian>()?;
        let fmt = FmtBody::read(reader)?;
        let subchunk2_id = read_fourcc(reader)?;
        let subchunk2_size = reader.read_u32::<LittleEndian>()?;

        Ok(Self::assemble(
            (chunk_id, chunk_size, format),
            (subchunk1_id, subchunk1_size, fmt),
            (subchunk2_id, subchunk2_size),
        ))
    }

    fn read_chunked<R: Read>(reader: &mut R) -> Result<Self, HeaderError> {
        let chunk_id = read_fourcc(reader)?;
        if chunk_id != RIFF_ID {
            return Err(HeaderError::NotRiff(chunk_id));
        }
        let chunk_size = reader.read_u32::<LittleEndian>()?;
        let format = read_fourcc(reader)?;
        if format != WAVE_ID {
            return Err(HeaderError::NotWave(format));
        }

        let mut fmt: Option<(u32, FmtBody)> = None;
        loop {
            let id = match read_fourcc(reader) {
                Ok(id) => id,
                Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => {
                    return Err(HeaderError::MissingData);
                }
                Err(err) => return Err(err.into()),
            };
            let size = reader.read_u32::<LittleEndian>()?;

            match id {
                DATA_ID => {
                    let (fmt_size, body) = fmt.ok_or(HeaderError::MissingFmt)?;
                    return Ok(Self::assemble(
                        (chunk_id, chunk_size, format),
                        (FMT_ID, fmt_size, body),
                        (DATA_ID, size),
                    ));
                }
                FMT_ID => {
                    if size < 16 {
                        return Err(HeaderError::ShortFmt(size));
                    }
                    let body = FmtBody::read(reader)?;
                    skip(reader, padded(size) - 16)?;
                    log::trace!("fmt chunk: {size} bytes");
                    fmt = Some((size, body));
                }
                other => {
                    log::debug!(
                        "skipping \"{}\" chunk ({size} bytes)",
                        other.escape_ascii()
                    );
                    skip(reader, padded(size))?;
                }
            }
        }
    }

    fn assemble(
        (chunk_id, chunk_size, format): ([u8; 4], u32, [u8; 4]),
        (subchunk1_id, subchunk1_size, fmt): ([u8; 4], u32, FmtBody),
        (subchunk2_id, subchunk2_size): ([u8; 4], u32),
    ) -> Self {
        Self {
            chunk_id,
            chunk_size,
            format,
            subchunk1_id,
            subchunk1_size,
            audio_format: fmt.audio_format,
            num_channels: fmt.num_channels,
            sample_rate: fmt.sample_rate,
            byte_rate: fmt.byte_rate,
            block_align: fmt.block_align,
            bits_per_sample: fmt.bits_per_sample,
            subchunk2_id,
            subchunk2_size,
        }
    }
}

impl FmtBody {
    fn read<R: Read>(reader: &mut R) -> io::Result<Self> {
        Ok(Self {
            audio_format: reader.read_u16::<LittleEndian>()?,
            num_channels: reader.read_u16::<LittleEndian>()?,
            sample_rate: reader.read_u32::<LittleEndian>()?,
            byte_rate: reader.read_u32::<LittleEndian>()?,
            block_align: reader.read_u16::<LittleEndian>()?,
            bits_per_sample: reader.read_u16::<LittleEndian>()?,
        })
    }
}

fn read_fourcc<R: Read>(reader: &mut R) -> io::Result<[u8; 4]> {
    let mut id = [0; 4];
    reader.read_exact(&mut id)?;
    Ok(id)
}

/// RIFF chunks are word aligned; odd sizes carry one pad byte.
fn padded(size: u32) -> u64 {
    u64::from(size) + u64::from(size % 2)
}

fn skip<R: Read>(reader: &mut R, len: u64) -> Result<(), HeaderError> {
    let skipped = io::copy(&mut reader.by_ref().take(len), &mut io::sink())?;
    if skipped < len {
        return Err(HeaderError::Truncated);
    }
    Ok(())
}
