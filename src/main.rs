//! clipsrt - Subtitle timelines from paired audio and transcript clips
//!
//! Entry point for the command-line tool: pairs `.wav`/`.txt` files, measures
//! the audio and writes an SRT file with optional frame locking.

use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tracing_appender::{non_blocking, rolling};

use clipsrt::cli::{Args, Commands};
use clipsrt::config::{Config, DecoderKind, TimingMode, FRAME_RATE_PRESETS};
use clipsrt::error::ClipSrtError;
use clipsrt::pairing::{natural_cmp, pair_sources};
use clipsrt::report::{render_log, summary_lines, RunReport};
use clipsrt::session::Session;
use clipsrt::sources::{discover_sources, SelectionSummary};
use clipsrt::workflow::{RunOutcome, Workflow};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Setup logging to both console and file
    setup_logging(args.verbose)?;

    info!("Starting clipsrt");

    // Load configuration
    let mut config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            if Path::new("clipsrt.toml").exists() {
                info!("Found clipsrt.toml in current directory, loading...");
                Config::from_file("clipsrt.toml")?
            } else {
                Config::default()
            }
        }
    };

    match args.command {
        Commands::Generate {
            inputs,
            output,
            offset,
            target,
            fps,
            trim_overflow,
            no_frame_lock,
            decoder,
            report,
            preview,
        } => {
            if let Some(offset) = offset {
                config.timing.mode = TimingMode::Manual;
                config.timing.manual_offset = offset;
            }
            if let Some(target) = target {
                config.timing.mode = TimingMode::Auto;
                config.timing.target_total = target;
            }
            if let Some(fps) = fps {
                config.frame.enabled = true;
                config.frame.frame_rate = fps;
            }
            if trim_overflow {
                config.frame.trim_overflow = true;
            }
            if no_frame_lock {
                config.frame.enabled = false;
            }
            if let Some(decoder) = decoder {
                config.audio.decoder = parse_decoder_kind(&decoder)?;
            }

            // Surface numeric errors before touching any files
            config.timing_policy()?;
            config.quantization_policy()?;

            let output_path = output.unwrap_or_else(|| PathBuf::from(&config.output.file_name));
            let report_path = report.or_else(|| config.output.report.as_ref().map(PathBuf::from));

            let sources = discover_sources(&inputs)?;
            let mut session = Session::new();
            session.set_sources(sources)?;

            let workflow = Workflow::new(config)?;
            match workflow.generate(&mut session).await? {
                RunOutcome::NoPairs { warnings } => {
                    println!("No matching .wav/.txt pairs were found. Nothing was written.");
                    for warning in &warnings {
                        println!("- {}", warning);
                    }
                }
                RunOutcome::Generated(result) => {
                    let artifact = session
                        .artifact()
                        .ok_or_else(|| ClipSrtError::Output("No output was issued".to_string()))?;
                    artifact.save_to(&output_path)?;

                    if let Some(report_path) = report_path {
                        RunReport::new(&result.timeline, &result.warnings)
                            .save(&report_path)
                            .await?;
                    }

                    println!("\n{}", summary_lines(&result.timeline).join("\n"));
                    println!("\n{}", render_log(&result.timeline, &result.warnings));
                    println!("\nWrote {}", output_path.display());

                    if preview {
                        println!("\n{}", result.srt);
                    }
                }
            }

            session.release_artifact()?;
        }
        Commands::Pairs { inputs } => {
            let sources = discover_sources(&inputs)?;
            let selection = SelectionSummary::from_sources(&sources);

            println!("Read {} files", selection.total);
            println!(
                "Audio {} / Text {} / Pair candidates {}",
                selection.audio,
                selection.text,
                selection.pair_candidates()
            );

            let pairing = pair_sources(&sources);
            println!(
                "\nPairs: {} / text only: {} / audio only: {}",
                pairing.pairs.len(),
                pairing.missing_audio.len(),
                pairing.missing_text.len()
            );

            let mut lines: Vec<(String, String)> = Vec::new();
            for seed in &pairing.pairs {
                lines.push((seed.base_name.clone(), format!("✅ {}: txt & wav", seed.base_name)));
            }
            for name in &pairing.missing_audio {
                lines.push((name.clone(), format!("⚠️ {}: wav not found", name)));
            }
            for name in &pairing.missing_text {
                lines.push((name.clone(), format!("⚠️ {}: txt not found", name)));
            }
            lines.sort_by(|a, b| natural_cmp(&a.0, &b.0));

            if !lines.is_empty() {
                println!();
            }
            for (_, line) in lines {
                println!("{}", line);
            }

            if pairing.is_empty() {
                warn!("No matching .wav/.txt pairs found");
            }
        }
        Commands::Config { output, force } => {
            if output.exists() && !force {
                return Err(ClipSrtError::Config(format!(
                    "{} already exists (use --force to overwrite)",
                    output.display()
                ))
                .into());
            }
            Config::default().save_to_file(&output)?;
            println!("Wrote default configuration to {}", output.display());
        }
        Commands::FrameRates => {
            println!("{:<10} {:<20}", "Preset", "Frames per second");
            println!("{}", "-".repeat(30));
            for (label, fps) in FRAME_RATE_PRESETS {
                println!("{:<10} {:<20.6}", label, fps);
            }
        }
    }

    info!("clipsrt finished");
    Ok(())
}

/// Setup logging to both console and file
fn setup_logging(verbose: bool) -> Result<()> {
    // Create log directory
    let log_dir = std::env::current_dir()?.join(".clipsrt").join("log");
    std::fs::create_dir_all(&log_dir)?;

    // Set up file appender with daily rotation
    let file_appender = rolling::daily(&log_dir, "clipsrt.log");
    let (non_blocking_file, guard) = non_blocking(file_appender);
    // Keep the guard alive for the duration of the program
    std::mem::forget(guard);

    // Determine log level
    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    // Console output goes to stderr so `--preview` output stays clean
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_file(verbose)
        .with_line_number(verbose);

    // Create file layer
    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false); // No ANSI colors in file

    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer);

    subscriber
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!(
        "Logging initialized - console: {}, file: {}",
        log_level,
        log_dir.join("clipsrt.log").display()
    );

    Ok(())
}

/// Parse decoder kind from string
fn parse_decoder_kind(kind: &str) -> Result<DecoderKind> {
    match kind.to_lowercase().as_str() {
        "wav" => Ok(DecoderKind::Wav),
        "ffprobe" => Ok(DecoderKind::Ffprobe),
        _ => Err(ClipSrtError::Config(format!(
            "Invalid decoder '{}'. Valid decoders: wav, ffprobe",
            kind
        ))
        .into()),
    }
}
