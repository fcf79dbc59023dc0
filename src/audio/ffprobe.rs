use async_trait::async_trait;
use std::io::Write;
use tracing::{debug, info};

use super::{validate_duration, DurationDecoder, ProbeCommandBuilder};
use crate::error::{ClipSrtError, Result};

/// Measures durations with an external ffprobe binary
pub struct FfprobeDecoder {
    command_builder: ProbeCommandBuilder,
}

impl FfprobeDecoder {
    pub fn new<S: Into<String>>(binary_path: S) -> Self {
        Self {
            command_builder: ProbeCommandBuilder::new(binary_path),
        }
    }

    /// Parse the bare `format=duration` value ffprobe prints
    pub fn parse_duration(stdout: &str) -> Result<f64> {
        let value = stdout.lines().map(str::trim).find(|line| !line.is_empty()).unwrap_or("");
        let seconds = value
            .parse::<f64>()
            .map_err(|_| ClipSrtError::UnsupportedFormat(format!("ffprobe reported no usable duration: '{}'", value)))?;
        validate_duration(seconds)
    }
}

#[async_trait]
impl DurationDecoder for FfprobeDecoder {
    async fn decode_duration(&self, bytes: &[u8]) -> Result<f64> {
        // ffprobe needs a seekable file to read the full header
        let mut temp_file = tempfile::Builder::new().prefix("clipsrt-").suffix(".wav").tempfile()?;
        temp_file.write_all(bytes)?;
        temp_file.flush()?;

        let stdout = self.command_builder.duration(temp_file.path()).output().await?;
        debug!("ffprobe output: {}", stdout.trim());
        Self::parse_duration(&stdout)
    }

    fn check_availability(&self) -> Result<()> {
        self.command_builder
            .version_check()
            .output_blocking()
            .map_err(|e| ClipSrtError::UnsupportedFormat(format!("Audio decoder not available: {}", e)))?;

        info!("ffprobe is available");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "ffprobe"
    }
}
