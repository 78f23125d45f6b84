/// Size of one upload chunk sent to the storage bucket (256 KiB)
pub const UPLOAD_CHUNK_SIZE: usize = 256 * 1024;

/// Maximum accepted voice payload size in bytes (20 MiB)
pub const MAX_VOICE_FILE_SIZE: usize = 20 * 1024 * 1024;

/// Items per listing page when the caller does not specify a count
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Wallet session lifetime in hours
pub const SESSION_TTL_HOURS: i64 = 24;

/// Upper bound on chunks accepted for one file during reconstruction
pub const MAX_FILE_CHUNKS: usize = 4096;

/// MIME type recorded for uploaded voice clips
pub const VOICE_CONTENT_TYPE: &str = "audio/wav";

/// Data-URL prefix for browser-playable audio payloads
pub const AUDIO_DATA_URL_PREFIX: &str = "data:audio/wav;base64,";

/// PCM parameters of the silent fallback WAV buffer
pub const WAV_SAMPLE_RATE: u32 = 44_100;
pub const WAV_CHANNELS: u16 = 1;
pub const WAV_BITS_PER_SAMPLE: u16 = 16;
