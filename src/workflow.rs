use futures_util::future::try_join_all;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use crate::audio::{validate_duration, DecoderFactory, DurationDecoder};
use crate::config::Config;
use crate::error::{ClipSrtError, Result};
use crate::pairing::{pair_sources, ClipSeed};
use crate::session::Session;
use crate::sources::SourceFile;
use crate::subtitle::render_srt;
use crate::timeline::{build_timeline, Clip, QuantizationPolicy, Timeline, TimingPolicy};

/// A successful generate action
#[derive(Debug, Clone)]
pub struct RunResult {
    pub timeline: Timeline,
    pub srt: String,
    pub warnings: Vec<String>,
}

/// Outcome of a generate action that did not fail
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Generated(RunResult),
    /// Nothing matched; no output is produced
    NoPairs { warnings: Vec<String> },
}

pub struct Workflow {
    config: Config,
    decoder: Box<dyn DurationDecoder>,
    show_progress: bool,
}

impl Workflow {
    pub fn new(config: Config) -> Result<Self> {
        let decoder = DecoderFactory::create_decoder(&config.audio);

        // Check dependencies
        decoder.check_availability()?;

        Ok(Self {
            config,
            decoder,
            show_progress: true,
        })
    }

    /// Build a workflow around an already constructed decoder
    pub fn with_decoder(config: Config, decoder: Box<dyn DurationDecoder>) -> Self {
        Self {
            config,
            decoder,
            show_progress: false,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Pair, decode and lay out the session's sources, then issue the SRT as
    /// the session's new artifact.
    pub async fn generate(&self, session: &mut Session) -> Result<RunOutcome> {
        // Reject bad numbers before any decoding work
        let timing = self.config.timing_policy()?;
        let quantization = self.config.quantization_policy()?;

        let pairing = pair_sources(session.sources());
        if pairing.is_empty() {
            warn!("No matching .wav/.txt pairs found among {} files", session.sources().len());
            session.release_artifact()?;
            return Ok(RunOutcome::NoPairs {
                warnings: pairing.warnings,
            });
        }

        let clips = self.extract_clips(&pairing.pairs).await?;
        let result = self.build(&clips, &timing, &quantization, pairing.warnings)?;

        let artifact = session.issue_artifact(&result.srt)?;
        info!(
            "Generated {} cues ({} bytes) in {}",
            result.timeline.clip_count(),
            artifact.byte_len(),
            artifact.path().display()
        );

        Ok(RunOutcome::Generated(result))
    }

    /// Lay out already extracted clips and render them
    pub fn build(
        &self,
        clips: &[Clip],
        timing: &TimingPolicy,
        quantization: &QuantizationPolicy,
        warnings: Vec<String>,
    ) -> Result<RunResult> {
        let timeline = build_timeline(clips, timing, quantization)?;
        let srt = render_srt(&timeline.cues);

        info!(
            "Timeline: original {:.3}s, adjustment {:.4}s/clip, final {:.3}s",
            timeline.original_total, timeline.adjustment, timeline.final_total
        );
        if let Some(frame) = &timeline.frame_info {
            info!(
                "Frame lock at {:.3} fps: {} frames, drift {:+.6}s",
                frame.frame_rate, frame.total_frames, frame.drift
            );
        }

        Ok(RunResult {
            timeline,
            srt,
            warnings,
        })
    }

    /// Read text and decode audio for every pair concurrently.
    ///
    /// Fails as a whole if any clip cannot be decoded.
    pub async fn extract_clips(&self, seeds: &[ClipSeed]) -> Result<Vec<Clip>> {
        info!("Decoding {} clips with the {} decoder", seeds.len(), self.decoder.name());

        let progress = if self.show_progress {
            let bar = ProgressBar::new(seeds.len() as u64);
            bar.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                    .map_err(|e| ClipSrtError::Config(format!("Invalid progress template: {}", e)))?
                    .progress_chars("#>-"),
            );
            bar
        } else {
            ProgressBar::hidden()
        };

        let clips = try_join_all(seeds.iter().map(|seed| {
            let progress = &progress;
            async move {
                let (dialogue, duration) = tokio::try_join!(read_dialogue(&seed.text), self.decode_audio(seed))?;
                progress.inc(1);
                progress.set_message(seed.base_name.clone());
                Ok::<Clip, ClipSrtError>(Clip::new(seed.base_name.clone(), dialogue, duration))
            }
        }))
        .await;

        progress.finish_and_clear();
        clips
    }

    async fn decode_audio(&self, seed: &ClipSeed) -> Result<f64> {
        let bytes = seed
            .audio
            .read()
            .await
            .map_err(|e| ClipSrtError::decode(&seed.audio.name, e))?;
        let duration = self
            .decoder
            .decode_duration(&bytes)
            .await
            .and_then(validate_duration)
            .map_err(|e| ClipSrtError::decode(&seed.audio.name, e))?;

        debug!("{}: {:.3}s", seed.audio.name, duration);
        Ok(duration)
    }
}

/// Read a transcript, trimming surrounding whitespace only
pub async fn read_dialogue(source: &SourceFile) -> Result<String> {
    let bytes = source.read().await?;
    Ok(String::from_utf8_lossy(&bytes).trim().to_string())
}
