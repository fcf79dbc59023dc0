// Pluggable audio duration decoding
//
// The timeline only needs one number per clip: its duration in seconds.
// Decoders turn the raw bytes of an audio file into that number:
// - Wav: reads the RIFF/WAVE header in-process (hound)
// - Ffprobe: hands the bytes to an external ffprobe binary
//
// To add a decoder, implement DurationDecoder and extend DecoderKind and
// the factory below.

pub mod commands;
pub mod ffprobe;
pub mod wav;

use async_trait::async_trait;

pub use commands::*;
pub use ffprobe::FfprobeDecoder;
pub use wav::WavDecoder;

use crate::config::{AudioConfig, DecoderKind};
use crate::error::{ClipSrtError, Result};

/// Measures the duration of an encoded audio clip
#[async_trait]
pub trait DurationDecoder: Send + Sync {
    /// Duration in seconds. Errors when the bytes cannot be decoded.
    async fn decode_duration(&self, bytes: &[u8]) -> Result<f64>;

    /// Check that the decoder can run in this environment
    fn check_availability(&self) -> Result<()>;

    /// Short name used in logs
    fn name(&self) -> &'static str;
}

/// Reject durations that are negative or not finite
pub fn validate_duration(seconds: f64) -> Result<f64> {
    if seconds.is_finite() && seconds >= 0.0 {
        Ok(seconds)
    } else {
        Err(ClipSrtError::UnsupportedFormat(format!(
            "Decoder returned an invalid duration: {}",
            seconds
        )))
    }
}

/// Factory for creating duration decoder instances
pub struct DecoderFactory;

impl DecoderFactory {
    /// Create the decoder selected in the configuration
    pub fn create_decoder(config: &AudioConfig) -> Box<dyn DurationDecoder> {
        match config.decoder {
            DecoderKind::Wav => Box::new(WavDecoder::new()),
            DecoderKind::Ffprobe => Box::new(FfprobeDecoder::new(&config.ffprobe_path)),
        }
    }
}
