use async_trait::async_trait;
use std::io::Cursor;
use tracing::debug;

use super::{validate_duration, DurationDecoder};
use crate::error::{ClipSrtError, Result};

/// Reads durations straight from the WAVE header
#[derive(Debug, Default, Clone)]
pub struct WavDecoder;

impl WavDecoder {
    pub fn new() -> Self {
        Self
    }

    /// Duration in seconds of an in-memory WAV file
    pub fn duration_of(bytes: &[u8]) -> Result<f64> {
        let reader = hound::WavReader::new(Cursor::new(bytes))
            .map_err(|e| ClipSrtError::UnsupportedFormat(format!("Not a readable WAV file: {}", e)))?;
        let spec = reader.spec();
        if spec.sample_rate == 0 {
            return Err(ClipSrtError::UnsupportedFormat("WAV header has a sample rate of 0".to_string()));
        }

        // duration() counts samples per channel
        let frames = reader.duration();
        debug!(
            "WAV: {} Hz, {} channels, {} bits, {} frames",
            spec.sample_rate, spec.channels, spec.bits_per_sample, frames
        );
        validate_duration(frames as f64 / spec.sample_rate as f64)
    }
}

#[async_trait]
impl DurationDecoder for WavDecoder {
    async fn decode_duration(&self, bytes: &[u8]) -> Result<f64> {
        Self::duration_of(bytes)
    }

    fn check_availability(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "wav"
    }
}
