use serde::{Deserialize, Serialize};
use std::path::Path;
use crate::error::{Result, ClipSrtError};
use crate::timeline::{FrameRate, QuantizationPolicy, TimingPolicy};

/// Common video frame rates, shown by `clipsrt frame-rates`
pub const FRAME_RATE_PRESETS: &[(&str, f64)] = &[
    ("23.976", 24000.0 / 1001.0),
    ("24", 24.0),
    ("25", 25.0),
    ("29.97", 30000.0 / 1001.0),
    ("30", 30.0),
    ("50", 50.0),
    ("59.94", 60000.0 / 1001.0),
    ("60", 60.0),
];

fn default_output_file_name() -> String {
    "output.srt".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub timing: TimingConfig,
    pub frame: FrameConfig,
    pub audio: AudioConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Manual or Auto
    pub mode: TimingMode,
    /// Seconds added to every clip in Manual mode (may be negative)
    pub manual_offset: f64,
    /// Desired total runtime in Auto mode, in seconds
    pub target_total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TimingMode {
    /// Manual: Add the configured offset to every clip
    Manual,
    /// Auto: Solve the offset so the clips add up to the target total
    Auto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameConfig {
    /// Snap cue boundaries to whole frames
    pub enabled: bool,
    /// Frames per second, must be greater than 0 when enabled
    pub frame_rate: f64,
    /// Drop partial frames instead of rounding; clips may vanish
    pub trim_overflow: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Which decoder measures clip durations
    pub decoder: DecoderKind,
    /// Path to ffprobe binary, used by the Ffprobe decoder
    pub ffprobe_path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DecoderKind {
    /// Wav: Read the RIFF header directly
    Wav,
    /// Ffprobe: Ask ffprobe for the container duration
    Ffprobe,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// File name used when no output path is given
    #[serde(default = "default_output_file_name")]
    pub file_name: String,
    /// Optional path for a JSON run report
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timing: TimingConfig {
                mode: TimingMode::Manual,
                manual_offset: 0.0,
                target_total: 0.0,
            },
            frame: FrameConfig {
                enabled: false,
                frame_rate: 24.0,
                trim_overflow: false,
            },
            audio: AudioConfig {
                decoder: DecoderKind::Wav,
                ffprobe_path: "ffprobe".to_string(),
            },
            output: OutputConfig {
                file_name: default_output_file_name(),
                report: None,
            },
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ClipSrtError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| ClipSrtError::Config(format!("Failed to parse config file: {}", e)))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ClipSrtError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| ClipSrtError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Validated timing policy for the configured mode
    pub fn timing_policy(&self) -> Result<TimingPolicy> {
        let policy = match self.timing.mode {
            TimingMode::Manual => TimingPolicy::Manual {
                offset_seconds: self.timing.manual_offset,
            },
            TimingMode::Auto => TimingPolicy::Auto {
                target_total_seconds: self.timing.target_total,
            },
        };
        policy.validate()?;
        Ok(policy)
    }

    /// Validated quantization policy; the frame rate is only checked when frame locking is on
    pub fn quantization_policy(&self) -> Result<QuantizationPolicy> {
        if !self.frame.enabled {
            return Ok(QuantizationPolicy::None);
        }
        let rate = FrameRate::new(self.frame.frame_rate)?;
        Ok(QuantizationPolicy::from_options(Some(rate), self.frame.trim_overflow))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_round_trips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clipsrt.toml");
        Config::default().save_to_file(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.timing.mode, TimingMode::Manual);
        assert_eq!(loaded.audio.decoder, DecoderKind::Wav);
        assert_eq!(loaded.output.file_name, "output.srt");
        assert!(!loaded.frame.enabled);
    }

    #[test]
    fn test_from_file_reads_partial_output_section() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clipsrt.toml");
        std::fs::write(
            &path,
            r#"
[timing]
mode = "Auto"
manual_offset = 0.0
target_total = 90.5

[frame]
enabled = true
frame_rate = 29.97
trim_overflow = true

[audio]
decoder = "Ffprobe"
ffprobe_path = "/usr/bin/ffprobe"

[output]
"#,
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.output.file_name, "output.srt");
        assert_eq!(
            config.timing_policy().unwrap(),
            TimingPolicy::Auto { target_total_seconds: 90.5 }
        );
        assert!(config.quantization_policy().unwrap().trims_overflow());
        assert_eq!(config.audio.decoder, DecoderKind::Ffprobe);
    }

    #[test]
    fn test_from_file_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "timing = 3").unwrap();
        assert!(matches!(Config::from_file(&path), Err(ClipSrtError::Config(_))));
    }

    #[test]
    fn test_frame_rate_validated_only_when_enabled() {
        let mut config = Config::default();
        config.frame.frame_rate = 0.0;
        assert_eq!(config.quantization_policy().unwrap(), QuantizationPolicy::None);

        config.frame.enabled = true;
        assert!(matches!(config.quantization_policy(), Err(ClipSrtError::Validation(_))));

        config.frame.frame_rate = 25.0;
        assert!(matches!(
            config.quantization_policy().unwrap(),
            QuantizationPolicy::RoundMinimumOneFrame(_)
        ));
    }

    #[test]
    fn test_presets_are_valid_frame_rates() {
        for (label, fps) in FRAME_RATE_PRESETS {
            assert!(FrameRate::new(*fps).is_ok(), "{}", label);
        }
    }
}
