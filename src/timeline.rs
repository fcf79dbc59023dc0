//! Timeline construction for paired clips.
//!
//! Clips are laid end to end in the order they are given. Every clip gets the
//! same offset (a manual one, or one solved from a target total) and the
//! resulting durations are optionally snapped to whole frames. Rounding error
//! is carried forward cue by cue and reported as drift against the
//! unquantized timeline.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ClipSrtError, Result};

/// Lower bound applied to every adjusted clip duration.
pub const MIN_ADJUSTED_DURATION: f64 = 0.0;

/// Added before flooring so exact frame multiples survive float error.
const TRIM_EPSILON: f64 = 1e-9;

/// Largest frame count a frame-locked timeline may reach (2^53, exact in f64).
pub const MAX_TOTAL_FRAMES: f64 = 9_007_199_254_740_992.0;

/// One matched audio/text unit with its measured duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    pub base_name: String,
    pub dialogue: String,
    /// Seconds, as reported by the decoder
    pub duration: f64,
}

impl Clip {
    pub fn new<N: Into<String>, D: Into<String>>(base_name: N, dialogue: D, duration: f64) -> Self {
        Self {
            base_name: base_name.into(),
            dialogue: dialogue.into(),
            duration,
        }
    }
}

/// How the per-clip offset is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TimingPolicy {
    /// Add the same signed offset to every clip
    Manual { offset_seconds: f64 },
    /// Spread the difference to the target total evenly over all clips
    Auto { target_total_seconds: f64 },
}

impl TimingPolicy {
    pub fn validate(&self) -> Result<()> {
        match *self {
            TimingPolicy::Manual { offset_seconds } if !offset_seconds.is_finite() => Err(
                ClipSrtError::Validation(format!("Manual offset must be a finite number, got {}", offset_seconds)),
            ),
            TimingPolicy::Auto { target_total_seconds } if !target_total_seconds.is_finite() => Err(
                ClipSrtError::Validation(format!(
                    "Target total time must be a finite number, got {}",
                    target_total_seconds
                )),
            ),
            _ => Ok(()),
        }
    }

    /// Resolve the per-clip offset for `count` clips totalling `original_total` seconds.
    pub fn resolve_offset(&self, original_total: f64, count: usize) -> Result<f64> {
        self.validate()?;
        match *self {
            TimingPolicy::Manual { offset_seconds } => Ok(offset_seconds),
            TimingPolicy::Auto { target_total_seconds } => {
                if count == 0 {
                    return Err(ClipSrtError::NoClips);
                }
                Ok((target_total_seconds - original_total) / count as f64)
            }
        }
    }

    pub fn target_total(&self) -> Option<f64> {
        match *self {
            TimingPolicy::Manual { .. } => None,
            TimingPolicy::Auto { target_total_seconds } => Some(target_total_seconds),
        }
    }
}

/// A frame rate known to be finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameRate(f64);

impl FrameRate {
    pub fn new(fps: f64) -> Result<Self> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(ClipSrtError::Validation(format!(
                "Frame rate must be a number greater than 0, got {}",
                fps
            )));
        }
        Ok(Self(fps))
    }

    pub fn fps(&self) -> f64 {
        self.0
    }

    pub fn frame_to_seconds(&self, frame: u64) -> f64 {
        frame as f64 / self.0
    }
}

/// How adjusted durations are snapped to the frame grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QuantizationPolicy {
    /// Use adjusted durations as they are
    None,
    /// Round to the nearest frame; a positive duration always keeps one frame
    RoundMinimumOneFrame(FrameRate),
    /// Drop the partial frame; short clips may collapse to zero frames
    FloorTrimOverflow(FrameRate),
}

impl QuantizationPolicy {
    pub fn from_options(frame_rate: Option<FrameRate>, trim_overflow: bool) -> Self {
        match (frame_rate, trim_overflow) {
            (None, _) => QuantizationPolicy::None,
            (Some(rate), false) => QuantizationPolicy::RoundMinimumOneFrame(rate),
            (Some(rate), true) => QuantizationPolicy::FloorTrimOverflow(rate),
        }
    }

    pub fn frame_rate(&self) -> Option<FrameRate> {
        match *self {
            QuantizationPolicy::None => None,
            QuantizationPolicy::RoundMinimumOneFrame(rate) | QuantizationPolicy::FloorTrimOverflow(rate) => Some(rate),
        }
    }

    pub fn trims_overflow(&self) -> bool {
        matches!(self, QuantizationPolicy::FloorTrimOverflow(_))
    }

    /// Number of frames an adjusted duration occupies, or `None` when not frame-locked.
    pub fn frames_for(&self, adjusted_duration: f64) -> Option<u64> {
        match *self {
            QuantizationPolicy::None => None,
            QuantizationPolicy::RoundMinimumOneFrame(rate) => {
                let rounded = (adjusted_duration * rate.fps()).round().max(0.0) as u64;
                let min_frames = if adjusted_duration > 0.0 { 1 } else { 0 };
                Some(rounded.max(min_frames))
            }
            QuantizationPolicy::FloorTrimOverflow(rate) => {
                let floored = (adjusted_duration * rate.fps() + TRIM_EPSILON).floor();
                Some(floored.max(0.0) as u64)
            }
        }
    }
}

/// One subtitle entry plus the numbers that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cue {
    /// 1-based position in the output
    pub index: usize,
    pub start: f64,
    pub end: f64,
    pub dialogue: String,
    pub base_name: String,
    pub source_duration: f64,
    pub adjusted_duration: f64,
    /// Frames occupied, when frame-locked
    pub frames: Option<u64>,
    /// Output duration minus adjusted duration
    pub drift: f64,
}

impl Cue {
    pub fn output_duration(&self) -> f64 {
        self.end - self.start
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameInfo {
    pub frame_rate: f64,
    pub trim_overflow: bool,
    pub total_frames: u64,
    /// Quantized end of the last cue
    pub aligned_total: f64,
    /// Quantized timeline minus raw timeline
    pub drift: f64,
}

/// Result of a timeline walk.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timeline {
    pub cues: Vec<Cue>,
    pub original_total: f64,
    /// Offset applied to each clip
    pub adjustment: f64,
    pub target_total: Option<f64>,
    /// End of the emitted timeline
    pub final_total: f64,
    /// Sum of adjusted durations, ignoring quantization
    pub raw_total: f64,
    pub frame_info: Option<FrameInfo>,
}

impl Timeline {
    pub fn clip_count(&self) -> usize {
        self.cues.len()
    }

    /// Seconds gained or lost to frame rounding; zero when not frame-locked.
    pub fn drift(&self) -> f64 {
        self.frame_info.as_ref().map(|info| info.drift).unwrap_or(0.0)
    }
}

pub fn adjusted_duration(duration: f64, offset: f64) -> f64 {
    (duration + offset).max(MIN_ADJUSTED_DURATION)
}

/// Reject policies whose longest possible frame-locked timeline cannot be
/// counted exactly.
fn check_frame_budget(
    original_total: f64,
    offset: f64,
    count: usize,
    quantization: &QuantizationPolicy,
) -> Result<()> {
    let Some(rate) = quantization.frame_rate() else {
        return Ok(());
    };

    // Each clip may gain one frame from the minimum or from rounding up
    let worst_case = (original_total + count as f64 * offset.max(0.0)) * rate.fps() + count as f64;
    if !worst_case.is_finite() || worst_case > MAX_TOTAL_FRAMES {
        return Err(ClipSrtError::Validation(format!(
            "Timeline of {} clips with offset {}s is too long to frame-lock at {} fps",
            count,
            offset,
            rate.fps()
        )));
    }
    Ok(())
}

/// Lay `clips` end to end and produce cues.
///
/// Clip durations and policy inputs are validated before the walk starts.
pub fn build_timeline(
    clips: &[Clip],
    timing: &TimingPolicy,
    quantization: &QuantizationPolicy,
) -> Result<Timeline> {
    if let Some(clip) = clips.iter().find(|clip| !clip.duration.is_finite() || clip.duration < 0.0) {
        return Err(ClipSrtError::Validation(format!(
            "{}: duration must be a non-negative finite number, got {}",
            clip.base_name, clip.duration
        )));
    }

    let original_total: f64 = clips.iter().map(|clip| clip.duration).sum();
    if !original_total.is_finite() {
        return Err(ClipSrtError::Validation(format!(
            "Total clip duration is out of range: {}",
            original_total
        )));
    }
    let offset = timing.resolve_offset(original_total, clips.len())?;
    check_frame_budget(original_total, offset, clips.len(), quantization)?;

    debug!(
        "Building timeline: {} clips, original total {:.3}s, offset {:.4}s, {:?}",
        clips.len(),
        original_total,
        offset,
        quantization
    );

    let frame_rate = quantization.frame_rate();
    let mut raw_timeline = 0.0;
    let mut quantized_timeline = 0.0;
    let mut current_frame: u64 = 0;
    let mut cues = Vec::with_capacity(clips.len());

    for (i, clip) in clips.iter().enumerate() {
        let adjusted = adjusted_duration(clip.duration, offset);
        let frames = quantization.frames_for(adjusted);

        let (start, end) = match (frame_rate, frames) {
            (Some(rate), Some(frames)) => {
                let start_frame = current_frame;
                let end_frame = start_frame.checked_add(frames).ok_or_else(|| {
                    ClipSrtError::Validation(format!("{}: frame count overflows the timeline", clip.base_name))
                })?;
                current_frame = end_frame;
                (rate.frame_to_seconds(start_frame), rate.frame_to_seconds(end_frame))
            }
            _ => (quantized_timeline, quantized_timeline + adjusted),
        };

        quantized_timeline = end;
        raw_timeline += adjusted;

        cues.push(Cue {
            index: i + 1,
            start,
            end,
            dialogue: clip.dialogue.clone(),
            base_name: clip.base_name.clone(),
            source_duration: clip.duration,
            adjusted_duration: adjusted,
            frames,
            drift: (end - start) - adjusted,
        });
    }

    let frame_info = frame_rate.map(|rate| FrameInfo {
        frame_rate: rate.fps(),
        trim_overflow: quantization.trims_overflow(),
        total_frames: current_frame,
        aligned_total: quantized_timeline,
        drift: quantized_timeline - raw_timeline,
    });

    Ok(Timeline {
        cues,
        original_total,
        adjustment: offset,
        target_total: timing.target_total(),
        final_total: quantized_timeline,
        raw_total: raw_timeline,
        frame_info,
    })
}
