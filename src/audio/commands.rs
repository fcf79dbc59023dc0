use std::path::Path;
use std::process::Output;
use tokio::process::Command;
use tracing::debug;

use crate::error::{ClipSrtError, Result};

/// External probe command representation
#[derive(Debug, Clone)]
pub struct ProbeCommand {
    pub binary_path: String,
    pub args: Vec<String>,
    pub description: String,
}

impl ProbeCommand {
    /// Create a new probe command
    pub fn new<S1: Into<String>, S2: Into<String>>(binary_path: S1, description: S2) -> Self {
        Self {
            binary_path: binary_path.into(),
            args: Vec::new(),
            description: description.into(),
        }
    }

    /// Add an argument
    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Only report errors on stderr
    pub fn quiet(self) -> Self {
        self.arg("-v").arg("error")
    }

    /// Select the entries ffprobe prints
    pub fn show_entries<S: Into<String>>(self, entries: S) -> Self {
        self.arg("-show_entries").arg(entries)
    }

    /// Print bare values, one per line
    pub fn bare_values(self) -> Self {
        self.arg("-of").arg("default=noprint_wrappers=1:nokey=1")
    }

    /// Add input file
    pub fn input<P: AsRef<Path>>(self, path: P) -> Self {
        self.arg(path.as_ref().to_string_lossy().to_string())
    }

    /// Run the command and return its stdout
    pub async fn output(&self) -> Result<String> {
        debug!("Executing probe command: {} {:?}", self.binary_path, self.args);

        let output = Command::new(&self.binary_path)
            .args(&self.args)
            .output()
            .await
            .map_err(|e| self.spawn_error(e))?;
        self.collect(output)
    }

    /// Run the command on the current thread and return its stdout
    pub fn output_blocking(&self) -> Result<String> {
        debug!("Executing probe command: {} {:?}", self.binary_path, self.args);

        let output = std::process::Command::new(&self.binary_path)
            .args(&self.args)
            .output()
            .map_err(|e| self.spawn_error(e))?;
        self.collect(output)
    }

    fn spawn_error(&self, e: std::io::Error) -> ClipSrtError {
        ClipSrtError::UnsupportedFormat(format!("Failed to execute {}: {}", self.binary_path, e))
    }

    fn collect(&self, output: Output) -> Result<String> {
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ClipSrtError::UnsupportedFormat(format!(
                "{} failed: {}",
                self.description,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Builder for the ffprobe invocations the decoder needs
pub struct ProbeCommandBuilder {
    binary_path: String,
}

impl ProbeCommandBuilder {
    pub fn new<S: Into<String>>(binary_path: S) -> Self {
        Self {
            binary_path: binary_path.into(),
        }
    }

    /// Build container duration query
    pub fn duration<P: AsRef<Path>>(&self, audio_path: P) -> ProbeCommand {
        ProbeCommand::new(&self.binary_path, "Duration probe")
            .quiet()
            .show_entries("format=duration")
            .bare_values()
            .input(audio_path)
    }

    /// Build version check command
    pub fn version_check(&self) -> ProbeCommand {
        ProbeCommand::new(&self.binary_path, "Version check").arg("-version")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_command_args() {
        let command = ProbeCommandBuilder::new("ffprobe").duration("/tmp/clip.wav");
        assert_eq!(command.binary_path, "ffprobe");
        assert_eq!(
            command.args,
            vec![
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
                "/tmp/clip.wav",
            ]
        );
    }

    #[test]
    fn test_version_check_args() {
        let command = ProbeCommandBuilder::new("ffprobe").version_check();
        assert_eq!(command.args, vec!["-version"]);
    }

    #[tokio::test]
    async fn test_missing_binary_is_an_error() {
        let command = ProbeCommandBuilder::new("/nonexistent/clipsrt-probe").version_check();
        assert!(matches!(command.output().await, Err(ClipSrtError::UnsupportedFormat(_))));
        assert!(matches!(command.output_blocking(), Err(ClipSrtError::UnsupportedFormat(_))));
    }
}
