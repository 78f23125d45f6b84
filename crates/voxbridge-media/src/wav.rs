//! WAV container construction and inspection.
//!
//! The bridge promises every download resolves to player-loadable bytes.
//! When reconstruction yields nothing usable, callers substitute the
//! 44-byte silent clip produced by [`empty_wav`].

use bytes::Bytes;
use chrono::{DateTime, Utc};
use tracing::debug;

use voxbridge_shared::constants::{WAV_BITS_PER_SAMPLE, WAV_CHANNELS, WAV_SAMPLE_RATE};

const RIFF_HEADER_LEN: usize = 44;

/// Wrap raw PCM sample bytes in a WAV container (mono, 16-bit, 44.1 kHz).
pub fn pcm_wav(samples: &[u8]) -> Bytes {
    let data_len = samples.len() as u32;
    let byte_rate = WAV_SAMPLE_RATE * u32::from(WAV_CHANNELS) * u32::from(WAV_BITS_PER_SAMPLE) / 8;
    let block_align = WAV_CHANNELS * WAV_BITS_PER_SAMPLE / 8;

    let mut out = Vec::with_capacity(RIFF_HEADER_LEN + samples.len());
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM
    out.extend_from_slice(&WAV_CHANNELS.to_le_bytes());
    out.extend_from_slice(&WAV_SAMPLE_RATE.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&WAV_BITS_PER_SAMPLE.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    out.extend_from_slice(samples);
    Bytes::from(out)
}

/// The minimal valid empty clip: a 44-byte WAV header with zero data bytes.
pub fn empty_wav() -> Bytes {
    pcm_wav(&[])
}

/// Estimate the play duration of a WAV buffer in seconds.
///
/// Duration is cosmetic, so any parse failure reports `0.0` instead of an
/// error.
pub fn estimate_duration_secs(bytes: &[u8]) -> f64 {
    match parse_duration(bytes) {
        Some(secs) => secs,
        None => {
            debug!(len = bytes.len(), "Not a parseable WAV buffer, reporting zero duration");
            0.0
        }
    }
}

fn parse_duration(bytes: &[u8]) -> Option<f64> {
    if bytes.len() < 12 || &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
        return None;
    }

    let mut offset = 12usize;
    let mut byte_rate: Option<u32> = None;
    let mut data_len: Option<u32> = None;
    while offset + 8 <= bytes.len() {
        let id = &bytes[offset..offset + 4];
        let size = u32::from_le_bytes(bytes[offset + 4..offset + 8].try_into().ok()?) as usize;
        let body = offset + 8;
        match id {
            b"fmt " => {
                if body + 12 > bytes.len() {
                    return None;
                }
                byte_rate = Some(u32::from_le_bytes(bytes[body + 8..body + 12].try_into().ok()?));
            }
            b"data" => data_len = Some(size as u32),
            _ => {}
        }
        // Chunks are word aligned
        offset = body + size + (size & 1);
    }

    let rate = byte_rate?;
    if rate == 0 {
        return None;
    }
    Some(f64::from(data_len?) / f64::from(rate))
}

/// File name for a fresh recording, keyed by capture time.
pub fn recording_file_name(at: DateTime<Utc>) -> String {
    format!("voice_{}.wav", at.timestamp_millis())
}
