//! WAV container collaborator: decodes 16-bit PCM WAV into the mono float
//! sample buffer the pipeline expects, and opportunistically recovers
//! artist/title/album metadata from an optional RIFF LIST/INFO chunk.
//!
//! Only 44100 Hz, 1- or 2-channel, 16-bit integer PCM is supported; anything
//! else is rejected as input-unsupported rather than guessed at.

use std::io::Cursor;
use std::path::Path;

use crate::error::{Result, SonoglyphError};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WavMetadata {
    pub artist: Option<String>,
    pub title: Option<String>,
    pub album: Option<String>,
}

pub struct DecodedWav {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub metadata: WavMetadata,
}

/// Expected native sample rate of the input WAV, before any resampling.
pub const INPUT_SAMPLE_RATE: u32 = 44100;

fn unsupported(msg: impl Into<String>) -> SonoglyphError {
    SonoglyphError::InputUnsupported(msg.into())
}

fn malformed(msg: impl Into<String>) -> SonoglyphError {
    SonoglyphError::InputMalformed(msg.into())
}

pub fn load(path: &Path) -> Result<DecodedWav> {
    let bytes = std::fs::read(path).map_err(|source| SonoglyphError::InputAbsent {
        path: path.display().to_string(),
        source,
    })?;
    decode(&bytes)
}

pub fn decode(bytes: &[u8]) -> Result<DecodedWav> {
    let metadata = parse_riff_info(bytes);

    let mut reader = hound::WavReader::new(Cursor::new(bytes))
        .map_err(|e| malformed(format!("not a recognizable WAV file: {e}")))?;
    let spec = reader.spec();

    if spec.sample_rate != INPUT_SAMPLE_RATE {
        return Err(unsupported(format!(
            "sample rate {} Hz is not supported (expected {} Hz)",
            spec.sample_rate, INPUT_SAMPLE_RATE
        )));
    }
    if spec.sample_format != hound::SampleFormat::Int || spec.bits_per_sample != 16 {
        return Err(unsupported(format!(
            "only 16-bit integer PCM is supported (got {:?} at {} bits)",
            spec.sample_format, spec.bits_per_sample
        )));
    }
    if spec.channels != 1 && spec.channels != 2 {
        return Err(unsupported(format!(
            "unsupported channel count {}",
            spec.channels
        )));
    }

    let raw: std::result::Result<Vec<i16>, _> = reader.samples::<i16>().collect();
    let raw = raw.map_err(|e| malformed(format!("truncated PCM data: {e}")))?;

    let samples = if spec.channels == 2 {
        raw.chunks_exact(2)
            .map(|pair| (pair[0] as f32 + pair[1] as f32) / 2.0 / (i16::MAX as f32 + 1.0))
            .collect()
    } else {
        raw.iter()
            .map(|&s| s as f32 / (i16::MAX as f32 + 1.0))
            .collect()
    };

    Ok(DecodedWav {
        samples,
        sample_rate: spec.sample_rate,
        metadata,
    })
}

/// Walks the RIFF chunk list looking for a `LIST` chunk of type `INFO`,
/// pulling `IART`/`INAM`/`IPRD` sub-chunks into artist/title/album. Any
/// missing or malformed chunk simply leaves the corresponding field `None`;
/// this is never an error, since most WAV files don't carry this metadata.
fn parse_riff_info(bytes: &[u8]) -> WavMetadata {
    let mut metadata = WavMetadata::default();

    if bytes.len() < 12 || &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
        return metadata;
    }

    let mut pos = 12;
    while pos + 8 <= bytes.len() {
        let chunk_id = &bytes[pos..pos + 4];
        let chunk_size = match read_u32_le(bytes, pos + 4) {
            Some(n) => n as usize,
            None => break,
        };
        let data_start = pos + 8;
        let data_end = match data_start.checked_add(chunk_size) {
            Some(end) if end <= bytes.len() => end,
            _ => break,
        };

        if chunk_id == b"LIST" && chunk_size >= 4 && &bytes[data_start..data_start + 4] == b"INFO"
        {
            parse_info_subchunks(&bytes[data_start + 4..data_end], &mut metadata);
        }

        // Chunks are padded to an even number of bytes.
        pos = data_end + (chunk_size % 2);
    }

    metadata
}

fn parse_info_subchunks(mut data: &[u8], metadata: &mut WavMetadata) {
    while data.len() >= 8 {
        let id = &data[0..4];
        let size = match read_u32_le(data, 4) {
            Some(n) => n as usize,
            None => break,
        };
        let value_start = 8;
        let value_end = match value_start.checked_add(size) {
            Some(end) if end <= data.len() => end,
            _ => break,
        };

        let text = nul_terminated_utf8(&data[value_start..value_end]);
        match id {
            b"IART" => metadata.artist = text,
            b"INAM" => metadata.title = text,
            b"IPRD" => metadata.album = text,
            _ => {}
        }

        let advance = value_end + (size % 2);
        if advance == 0 || advance > data.len() {
            break;
        }
        data = &data[advance..];
    }
}

fn read_u32_le(bytes: &[u8], pos: usize) -> Option<u32> {
    let slice: [u8; 4] = bytes.get(pos..pos + 4)?.try_into().ok()?;
    Some(u32::from_le_bytes(slice))
}

fn nul_terminated_utf8(bytes: &[u8]) -> Option<String> {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    let s = std::str::from_utf8(&bytes[..end]).ok()?.to_string();
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}
