//! clipsrt - Subtitle timelines from paired audio and transcript clips
//!
//! Matches `.wav` and `.txt` files by name, measures each clip, and lays the
//! transcripts end to end as SRT cues, with optional offset or target-total
//! adjustment and frame locking.

pub mod cli;
pub mod config;
pub mod workflow;
pub mod sources;
pub mod pairing;
pub mod audio;
pub mod timeline;
pub mod subtitle;
pub mod report;
pub mod session;
pub mod error;
