use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::{ClipSrtError, Result};
use crate::pairing::natural_cmp;

/// Recognized input file types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Text,
    Audio,
}

/// A named input file. `name` may be path-qualified (`scene1/clip2.wav`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    pub path: PathBuf,
}

impl SourceFile {
    pub fn new<N: Into<String>, P: Into<PathBuf>>(name: N, path: P) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Final component of the name
    pub fn file_name(&self) -> &str {
        self.name.rsplit(['/', '\\']).next().unwrap_or(&self.name)
    }

    /// Lowercased text after the last dot, if any
    pub fn extension(&self) -> Option<String> {
        let file_name = self.file_name();
        file_name.rfind('.').map(|i| file_name[i + 1..].to_lowercase())
    }

    /// File name with only the final extension removed
    /// File name without its final extension, surrounding whitespace trimmed
    pub fn base_name(&self) -> &str {
        let file_name = self.file_name();
        match file_name.rfind('.') {
            Some(i) => file_name[..i].trim(),
            None => file_name.trim(),
        }
    }

    pub fn kind(&self) -> Option<SourceKind> {
        match self.extension().as_deref() {
            Some("txt") => Some(SourceKind::Text),
            Some("wav") => Some(SourceKind::Audio),
            _ => None,
        }
    }

    pub async fn read(&self) -> Result<Vec<u8>> {
        fs::read(&self.path).await.map_err(ClipSrtError::Io)
    }
}

/// Flatten files and directories into a list of sources.
///
/// Directories are walked recursively and their files named relative to the
/// directory given on the command line.
pub fn discover_sources<P: AsRef<Path>>(inputs: &[P]) -> Result<Vec<SourceFile>> {
    let mut sources = Vec::new();

    for input in inputs {
        let input = input.as_ref();
        if !input.exists() {
            return Err(ClipSrtError::FileNotFound(input.display().to_string()));
        }

        if input.is_dir() {
            debug!("Walking directory: {}", input.display());
            for entry in WalkDir::new(input).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
                if !entry.file_type().is_file() {
                    continue;
                }
                let path = entry.path();
                let relative = pathdiff::diff_paths(path, input).unwrap_or_else(|| path.to_path_buf());
                let name = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect::<Vec<_>>()
                    .join("/");
                sources.push(SourceFile::new(name, path));
            }
        } else {
            let name = input
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .ok_or_else(|| ClipSrtError::Config(format!("Invalid file name: {}", input.display())))?;
            sources.push(SourceFile::new(name, input));
        }
    }

    info!("Discovered {} input files", sources.len());
    Ok(sources)
}

/// Counts shown after a selection, before any decoding.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionSummary {
    pub total: usize,
    pub audio: usize,
    pub text: usize,
    pub names: Vec<String>,
}

impl SelectionSummary {
    pub fn from_sources(sources: &[SourceFile]) -> Self {
        let audio = sources.iter().filter(|s| s.kind() == Some(SourceKind::Audio)).count();
        let text = sources.iter().filter(|s| s.kind() == Some(SourceKind::Text)).count();
        let mut names: Vec<String> = sources.iter().map(|s| s.name.clone()).collect();
        names.sort_by(|a, b| natural_cmp(a, b));

        Self {
            total: sources.len(),
            audio,
            text,
            names,
        }
    }

    /// Upper bound on the number of pairs this selection can yield
    pub fn pair_candidates(&self) -> usize {
        self.audio.min(self.text)
    }
}
