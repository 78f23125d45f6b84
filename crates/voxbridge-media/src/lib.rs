//! # voxbridge-media
//!
//! Audio byte handling for voice clips: data-URL transport encoding, WAV
//! container analysis and the silent fallback clip served when a download
//! cannot be reconstructed.
//!
//! Everything in this crate is pure and fail-soft. A malformed payload
//! degrades to an empty buffer or a zero duration, never an error, because
//! one corrupt recording must not take down a whole list view.

pub mod codec;
pub mod wav;

pub use codec::{decode_data_url, encode_data_url};
pub use wav::{empty_wav, estimate_duration_secs, pcm_wav, recording_file_name};
