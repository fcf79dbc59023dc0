use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{ClipSrtError, Result};
use crate::sources::SourceFile;

/// A generated SRT file held in a temporary location until it is saved
#[derive(Debug)]
pub struct OutputArtifact {
    file: NamedTempFile,
    len: usize,
}

impl OutputArtifact {
    fn create(content: &str) -> Result<Self> {
        let mut file = tempfile::Builder::new().prefix("clipsrt-").suffix(".srt").tempfile()?;
        file.write_all(content.as_bytes())?;
        file.flush()?;

        Ok(Self {
            file,
            len: content.len(),
        })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Size of the rendered output in bytes
    pub fn byte_len(&self) -> usize {
        self.len
    }

    pub fn read_to_string(&self) -> Result<String> {
        Ok(std::fs::read_to_string(self.path())?)
    }

    /// Copy the artifact to `destination`, replacing it atomically
    pub fn save_to<P: AsRef<Path>>(&self, destination: P) -> Result<PathBuf> {
        let destination = destination.as_ref();
        let parent = match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent)?;

        let mut staged = NamedTempFile::new_in(&parent)?;
        staged.write_all(self.read_to_string()?.as_bytes())?;
        staged.flush()?;
        staged
            .persist(destination)
            .map_err(|e| ClipSrtError::Output(format!("Failed to write {}: {}", destination.display(), e)))?;

        info!("SRT file saved: {}", destination.display());
        Ok(destination.to_path_buf())
    }

    fn release(self) -> Result<()> {
        let path = self.path().to_path_buf();
        self.file.close()?;
        debug!("Released output artifact {}", path.display());
        Ok(())
    }
}

/// State owned by the caller across generate actions: the current input
/// selection and the most recently issued output.
#[derive(Debug, Default)]
pub struct Session {
    sources: Vec<SourceFile>,
    artifact: Option<OutputArtifact>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sources(sources: Vec<SourceFile>) -> Self {
        Self {
            sources,
            artifact: None,
        }
    }

    pub fn sources(&self) -> &[SourceFile] {
        &self.sources
    }

    /// Replace the input selection. Any previous output no longer matches it
    /// and is released.
    pub fn set_sources(&mut self, sources: Vec<SourceFile>) -> Result<()> {
        self.release_artifact()?;
        self.sources = sources;
        Ok(())
    }

    pub fn artifact(&self) -> Option<&OutputArtifact> {
        self.artifact.as_ref()
    }

    /// Release the previous artifact, then issue a new one holding `content`
    pub fn issue_artifact(&mut self, content: &str) -> Result<&OutputArtifact> {
        self.release_artifact()?;
        let artifact = OutputArtifact::create(content)?;
        debug!("Issued output artifact {} ({} bytes)", artifact.path().display(), artifact.byte_len());
        Ok(self.artifact.insert(artifact))
    }

    pub fn release_artifact(&mut self) -> Result<()> {
        match self.artifact.take() {
            Some(artifact) => artifact.release(),
            None => Ok(()),
        }
    }
}
