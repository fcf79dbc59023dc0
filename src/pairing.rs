//! Matching of transcript and audio files by base name.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::sources::{SourceFile, SourceKind};

/// A matched text/audio pair, before any decoding.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipSeed {
    pub base_name: String,
    pub text: SourceFile,
    pub audio: SourceFile,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PairingResult {
    /// Naturally sorted by base name
    pub pairs: Vec<ClipSeed>,
    pub warnings: Vec<String>,
    /// Base names that only have a transcript
    pub missing_audio: Vec<String>,
    /// Base names that only have audio
    pub missing_text: Vec<String>,
}

impl PairingResult {
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Group sources into text/audio pairs keyed by base name.
///
/// Files of other types are ignored. When two files of the same kind share a
/// base name (e.g. in different sub-directories) the one whose name sorts
/// first is used and a warning is recorded.
pub fn pair_sources(sources: &[SourceFile]) -> PairingResult {
    let mut text_files: BTreeMap<String, &SourceFile> = BTreeMap::new();
    let mut audio_files: BTreeMap<String, &SourceFile> = BTreeMap::new();
    let mut duplicates: Vec<String> = Vec::new();

    for source in sources {
        let files = match source.kind() {
            Some(SourceKind::Text) => &mut text_files,
            Some(SourceKind::Audio) => &mut audio_files,
            None => {
                debug!("Ignoring unrecognized file: {}", source.name);
                continue;
            }
        };

        let base_name = source.base_name().to_string();
        match files.get(&base_name).copied() {
            Some(existing) => {
                let (kept, dropped) = if natural_cmp(&source.name, &existing.name) == Ordering::Less {
                    (source, existing)
                } else {
                    (existing, source)
                };
                duplicates.push(format!("{}: duplicate file {} ignored, using {}", base_name, dropped.name, kept.name));
                files.insert(base_name, kept);
            }
            None => {
                files.insert(base_name, source);
            }
        }
    }

    let mut pairs: Vec<ClipSeed> = text_files
        .iter()
        .filter_map(|(base_name, text)| {
            audio_files.get(base_name).map(|audio| ClipSeed {
                base_name: base_name.clone(),
                text: (*text).clone(),
                audio: (*audio).clone(),
            })
        })
        .collect();
    pairs.sort_by(|a, b| natural_cmp(&a.base_name, &b.base_name));

    let mut missing_audio: Vec<String> = text_files
        .keys()
        .filter(|name| !audio_files.contains_key(*name))
        .cloned()
        .collect();
    missing_audio.sort_by(|a, b| natural_cmp(a, b));

    let mut missing_text: Vec<String> = audio_files
        .keys()
        .filter(|name| !text_files.contains_key(*name))
        .cloned()
        .collect();
    missing_text.sort_by(|a, b| natural_cmp(a, b));

    duplicates.sort_by(|a, b| natural_cmp(a, b));

    let mut warnings = Vec::new();
    warnings.extend(missing_audio.iter().map(|name| format!("{}: text has no matching .wav audio", name)));
    warnings.extend(missing_text.iter().map(|name| format!("{}: audio has no matching .txt text", name)));
    warnings.extend(duplicates);

    for warning in &warnings {
        warn!("{}", warning);
    }
    info!(
        "Paired {} clips ({} text only, {} audio only)",
        pairs.len(),
        missing_audio.len(),
        missing_text.len()
    );

    PairingResult {
        pairs,
        warnings,
        missing_audio,
        missing_text,
    }
}

enum Chunk<'a> {
    Digits(&'a str),
    Text(&'a str),
}

fn chunks(s: &str) -> Vec<Chunk<'_>> {
    let mut result = Vec::new();
    let mut start = 0;
    let mut in_digits: Option<bool> = None;

    for (i, c) in s.char_indices() {
        let is_digit = c.is_ascii_digit();
        match in_digits {
            Some(current) if current != is_digit => {
                result.push(make_chunk(&s[start..i], current));
                start = i;
            }
            _ => {}
        }
        in_digits = Some(is_digit);
    }
    if let Some(current) = in_digits {
        result.push(make_chunk(&s[start..], current));
    }
    result
}

fn make_chunk(s: &str, digits: bool) -> Chunk<'_> {
    if digits { Chunk::Digits(s) } else { Chunk::Text(s) }
}

fn compare_digits(a: &str, b: &str) -> Ordering {
    let a_trimmed = a.trim_start_matches('0');
    let b_trimmed = b.trim_start_matches('0');
    a_trimmed
        .len()
        .cmp(&b_trimmed.len())
        .then_with(|| a_trimmed.cmp(b_trimmed))
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

/// Natural ordering: runs of ASCII digits compare by magnitude, other runs
/// case-insensitively. Ties fall back to a plain byte comparison so the
/// ordering is total.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let a_chunks = chunks(a);
    let b_chunks = chunks(b);

    for (x, y) in a_chunks.iter().zip(b_chunks.iter()) {
        let ordering = match (x, y) {
            (Chunk::Digits(x), Chunk::Digits(y)) => compare_digits(x, y),
            (Chunk::Text(x), Chunk::Text(y))
            | (Chunk::Digits(x), Chunk::Text(y))
            | (Chunk::Text(x), Chunk::Digits(y)) => compare_text(x, y),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }

    a_chunks.len().cmp(&b_chunks.len()).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files(names: &[&str]) -> Vec<SourceFile> {
        names.iter().map(|n| SourceFile::new(*n, format!("/in/{}", n))).collect()
    }

    fn pair_names(result: &PairingResult) -> Vec<&str> {
        result.pairs.iter().map(|p| p.base_name.as_str()).collect()
    }

    #[test]
    fn test_natural_cmp_orders_numbers_by_magnitude() {
        let mut names = vec!["clip10", "clip2", "clip1", "Clip3", "clip02b", "intro"];
        names.sort_by(|a, b| natural_cmp(a, b));
        assert_eq!(names, vec!["clip1", "clip2", "clip02b", "Clip3", "clip10", "intro"]);
    }

    #[test]
    fn test_natural_cmp_is_total() {
        assert_eq!(natural_cmp("a01", "a1"), "a01".cmp("a1"));
        assert_eq!(natural_cmp("A", "a"), "A".cmp("a"));
        assert_eq!(natural_cmp("same", "same"), Ordering::Equal);
        assert_eq!(natural_cmp("", "a"), Ordering::Less);
    }

    #[test]
    fn test_pairs_matching_base_names() {
        let result = pair_sources(&files(&["b.txt", "b.wav", "a.TXT", "a.WAV"]));
        assert_eq!(pair_names(&result), vec!["a", "b"]);
        assert!(result.warnings.is_empty());
        assert_eq!(result.pairs[0].text.name, "a.TXT");
        assert_eq!(result.pairs[0].audio.name, "a.WAV");
    }

    #[test]
    fn test_text_without_audio_is_warned() {
        let result = pair_sources(&files(&["clip1.txt", "clip2.txt", "clip2.wav"]));
        assert_eq!(pair_names(&result), vec!["clip2"]);
        assert_eq!(result.missing_audio, vec!["clip1"]);
        assert!(result.warnings.iter().any(|w| w.contains("clip1") && w.contains(".wav")));
    }

    #[test]
    fn test_padded_names_pair_with_trimmed_names() {
        let result = pair_sources(&files(&["clip1.txt", "clip1 .wav", " clip2.txt", "clip2.wav"]));
        assert_eq!(pair_names(&result), vec!["clip1", "clip2"]);
        assert!(result.warnings.is_empty());
        assert_eq!(result.pairs[0].audio.name, "clip1 .wav");
    }

    #[test]
    fn test_audio_without_text_is_warned() {
        let result = pair_sources(&files(&["solo.wav"]));
        assert!(result.is_empty());
        assert_eq!(result.missing_text, vec!["solo"]);
        assert_eq!(result.warnings, vec!["solo: audio has no matching .txt text"]);
    }

    #[test]
    fn test_other_files_are_ignored_silently() {
        let result = pair_sources(&files(&["x.txt", "x.wav", "x.mp3", "cover.jpg", "README"]));
        assert_eq!(pair_names(&result), vec!["x"]);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_embedded_dots_are_part_of_base_name() {
        let result = pair_sources(&files(&["take.1.txt", "take.1.wav", "take.txt"]));
        assert_eq!(pair_names(&result), vec!["take.1"]);
        assert_eq!(result.missing_audio, vec!["take"]);
    }

    #[test]
    fn test_order_ignores_submission_order() {
        let names = ["clip10.txt", "clip10.wav", "clip2.wav", "clip1.txt", "clip2.txt", "clip1.wav", "extra.txt"];
        let forward = pair_sources(&files(&names));
        let mut reversed_names = names.to_vec();
        reversed_names.reverse();
        let backward = pair_sources(&files(&reversed_names));

        assert_eq!(pair_names(&forward), vec!["clip1", "clip2", "clip10"]);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_names_partition_into_paired_and_missing() {
        let result = pair_sources(&files(&["a.txt", "a.wav", "b.txt", "c.wav", "d.txt", "d.wav"]));
        let mut all: Vec<String> = result.pairs.iter().map(|p| p.base_name.clone()).collect();
        all.extend(result.missing_audio.iter().cloned());
        all.extend(result.missing_text.iter().cloned());
        all.sort();
        assert_eq!(all, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_duplicate_base_names_pick_first_sorted() {
        let result = pair_sources(&files(&["disc2/clip.wav", "clip.txt", "disc1/clip.wav"]));
        assert_eq!(result.pairs.len(), 1);
        assert_eq!(result.pairs[0].audio.name, "disc1/clip.wav");
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("disc2/clip.wav"));
    }
}
