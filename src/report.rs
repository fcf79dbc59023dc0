//! Human-readable and JSON summaries of a generated timeline.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use tokio::fs;
use tracing::info;

use crate::error::Result;
use crate::timeline::{Cue, FrameInfo, Timeline};

/// Format a value with an explicit sign, e.g. `+0.0125` or `-0.0083`
///
/// Values that round to zero are shown as positive.
pub fn format_signed(value: f64, decimals: usize) -> String {
    let scale = 10f64.powi(decimals as i32);
    let rounded = (value * scale).round() / scale;
    if rounded >= 0.0 {
        format!("+{:.*}", decimals, rounded.abs())
    } else {
        format!("{:.*}", decimals, rounded)
    }
}

/// One line per cue describing how its duration was derived
pub fn clip_log_lines(timeline: &Timeline) -> Vec<String> {
    let mut raw_timeline = 0.0;
    let mut lines = Vec::with_capacity(timeline.cues.len());

    for cue in &timeline.cues {
        raw_timeline += cue.adjusted_duration;

        let mut parts = vec![format!("source {:.3}s", cue.source_duration)];
        if (cue.source_duration - cue.adjusted_duration).abs() > 1e-6 {
            parts.push(format!("adjusted {:.3}s", cue.adjusted_duration));
        }
        parts.push(format!("output {:.3}s", cue.output_duration()));

        let mut line = format!("{}. {}.wav ({}", cue.index, cue.base_name, parts.join(", "));
        if let Some(frames) = cue.frames {
            line.push_str(&format!(
                " | {} frames | Δ={}s | cumulative={}s",
                frames,
                format_signed(cue.drift, 4),
                format_signed(cue.end - raw_timeline, 4)
            ));
        }
        line.push(')');
        lines.push(line);
    }

    lines
}

/// Headline numbers for a run
pub fn summary_lines(timeline: &Timeline) -> Vec<String> {
    let dash = || "-".to_string();
    let frame = timeline.frame_info.as_ref();

    vec![
        format!("Clips: {}", timeline.clip_count()),
        format!("Original total: {:.2} s", timeline.original_total),
        format!("Adjustment per clip: {:.4} s", timeline.adjustment),
        format!(
            "Target total: {}",
            timeline.target_total.map(|t| format!("{:.2} s", t)).unwrap_or_else(dash)
        ),
        format!(
            "Frame rate: {}",
            frame.map(|f| format!("{:.3} fps", f.frame_rate)).unwrap_or_else(dash)
        ),
        format!(
            "Frame-aligned total: {}",
            frame.map(|f| format!("{:.3} s", f.aligned_total)).unwrap_or_else(dash)
        ),
        format!(
            "Drift: {}",
            frame.map(|f| format!("{} s", format_signed(f.drift, 4))).unwrap_or_else(dash)
        ),
    ]
}

/// Full run log: per-clip lines, frame-lock footer and warnings
pub fn render_log(timeline: &Timeline, warnings: &[String]) -> String {
    let mut lines = clip_log_lines(timeline);

    if let Some(frame) = &timeline.frame_info {
        lines.push(String::new());
        lines.push(format!("Frame lock: {:.3} fps", frame.frame_rate));
        lines.push(format!("Output total: {:.3} s", frame.aligned_total));
        lines.push(format!("Cumulative drift: {} s", format_signed(frame.drift, 6)));
        if frame.trim_overflow {
            lines.push("(time overflowing the last whole frame is trimmed)".to_string());
        }
    }

    if !warnings.is_empty() {
        lines.push(String::new());
        lines.push("Warnings:".to_string());
        lines.extend(warnings.iter().map(|w| format!("- {}", w)));
    }

    lines.join("\n")
}

/// Machine-readable record of a run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub generated_at: DateTime<Utc>,
    pub clip_count: usize,
    pub original_total: f64,
    pub adjustment: f64,
    pub target_total: Option<f64>,
    pub final_total: f64,
    pub frame: Option<FrameInfo>,
    pub cues: Vec<Cue>,
    pub warnings: Vec<String>,
}

impl RunReport {
    pub fn new(timeline: &Timeline, warnings: &[String]) -> Self {
        Self {
            generated_at: Utc::now(),
            clip_count: timeline.clip_count(),
            original_total: timeline.original_total,
            adjustment: timeline.adjustment,
            target_total: timeline.target_total,
            final_total: timeline.final_total,
            frame: timeline.frame_info.clone(),
            cues: timeline.cues.clone(),
            warnings: warnings.to_vec(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub async fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?).await?;
        info!("Run report written to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::{build_timeline, Clip, FrameRate, QuantizationPolicy, TimingPolicy};

    fn framed_timeline() -> Timeline {
        let clips = vec![Clip::new("intro", "Hi", 0.3), Clip::new("outro", "Bye", 1.0)];
        build_timeline(
            &clips,
            &TimingPolicy::Manual { offset_seconds: 0.0 },
            &QuantizationPolicy::RoundMinimumOneFrame(FrameRate::new(24.0).unwrap()),
        )
        .unwrap()
    }

    #[test]
    fn test_format_signed() {
        assert_eq!(format_signed(0.0125, 4), "+0.0125");
        assert_eq!(format_signed(-0.00833, 4), "-0.0083");
        assert_eq!(format_signed(0.0, 6), "+0.000000");
        assert_eq!(format_signed(-0.0, 2), "+0.00");
    }

    #[test]
    fn test_clip_log_lines_with_frames() {
        let lines = clip_log_lines(&framed_timeline());
        assert_eq!(
            lines[0],
            "1. intro.wav (source 0.300s, output 0.292s | 7 frames | Δ=-0.0083s | cumulative=-0.0083s)"
        );
        assert_eq!(
            lines[1],
            "2. outro.wav (source 1.000s, output 1.000s | 24 frames | Δ=+0.0000s | cumulative=-0.0083s)"
        );
    }

    #[test]
    fn test_clip_log_lines_show_adjusted_duration() {
        let clips = vec![Clip::new("a", "", 2.0)];
        let timeline = build_timeline(
            &clips,
            &TimingPolicy::Manual { offset_seconds: 0.5 },
            &QuantizationPolicy::None,
        )
        .unwrap();
        assert_eq!(clip_log_lines(&timeline), vec!["1. a.wav (source 2.000s, adjusted 2.500s, output 2.500s)"]);
    }

    #[test]
    fn test_summary_lines_without_frame_lock() {
        let clips = vec![Clip::new("a", "", 2.0), Clip::new("b", "", 3.0)];
        let timeline = build_timeline(
            &clips,
            &TimingPolicy::Auto { target_total_seconds: 10.0 },
            &QuantizationPolicy::None,
        )
        .unwrap();
        assert_eq!(
            summary_lines(&timeline),
            vec![
                "Clips: 2",
                "Original total: 5.00 s",
                "Adjustment per clip: 2.5000 s",
                "Target total: 10.00 s",
                "Frame rate: -",
                "Frame-aligned total: -",
                "Drift: -",
            ]
        );
    }

    #[test]
    fn test_render_log_includes_footer_and_warnings() {
        let log = render_log(&framed_timeline(), &["x: audio has no matching .txt text".to_string()]);
        assert!(log.contains("Frame lock: 24.000 fps"));
        assert!(log.contains("Output total: 1.292 s"));
        assert!(log.contains("Cumulative drift: -0.008333 s"));
        assert!(log.ends_with("Warnings:\n- x: audio has no matching .txt text"));
    }

    #[test]
    fn test_report_serializes_to_json() {
        let report = RunReport::new(&framed_timeline(), &[]);
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["clip_count"], 2);
        assert_eq!(json["cues"][0]["frames"], 7);
        assert_eq!(json["frame"]["total_frames"], 31);
        assert!(json["target_total"].is_null());
    }
}
