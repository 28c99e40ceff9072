//! Batch classification of local audio files

use crate::classifier::Classifier;
use crate::inference::{InferencePipeline, Prediction};
use crate::request::PredictionResponse;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File extensions picked up when walking a directory
const AUDIO_EXTENSIONS: &[&str] = &[
    "wav", "mp3", "flac", "ogg", "oga", "m4a", "aac", "aif", "aiff", "mka", "webm",
];

/// Expand the given paths into a sorted list of audio files.
///
/// Files are taken as-is regardless of extension; directories are walked
/// recursively and filtered by extension.
pub fn collect_inputs(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path).follow_links(true) {
                match entry {
                    Ok(entry) if entry.file_type().is_file() && has_audio_extension(entry.path()) => {
                        files.push(entry.into_path());
                    }
                    Ok(_) => {}
                    Err(e) => log::warn!("Skipping unreadable entry under {:?}: {}", path, e),
                }
            }
        } else {
            files.push(path.clone());
        }
    }

    files.sort();
    files.dedup();
    files
}

fn has_audio_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| AUDIO_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Classify every file in parallel, preserving input order.
///
/// Unreadable files get the unknown fallback like any other bad input.
pub fn classify_files<C: Classifier>(
    pipeline: &InferencePipeline<C>,
    files: &[PathBuf],
) -> Vec<PredictionResponse> {
    files
        .par_iter()
        .map(|path| {
            log::debug!("Classifying {:?}", path);
            let prediction = match std::fs::read(path) {
                Ok(bytes) => pipeline.infer_bytes(&bytes),
                Err(e) => {
                    log::warn!("Failed to read {:?}: {}", path, e);
                    Prediction::unknown()
                }
            };
            PredictionResponse::new(prediction, Some(path.display().to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::StubClassifier;
    use crate::inference::InferenceConfig;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_collect_filters_directories_by_extension() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("a.wav"), b"x").unwrap();
        fs::write(dir.path().join("nested/b.MP3"), b"x").unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();

        let files = collect_inputs(&[dir.path().to_path_buf()]);
        assert_eq!(
            files,
            vec![dir.path().join("a.wav"), dir.path().join("nested/b.MP3")]
        );
    }

    #[test]
    fn test_collect_keeps_explicit_files() {
        let files = collect_inputs(&[PathBuf::from("/tmp/clip.bin"), PathBuf::from("/tmp/clip.bin")]);
        assert_eq!(files, vec![PathBuf::from("/tmp/clip.bin")]);
    }

    #[test]
    fn test_classify_missing_and_bogus_files() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let bogus = dir.path().join("bogus.wav");
        fs::write(&bogus, b"definitely not a wav file").unwrap();
        let missing = dir.path().join("missing.wav");

        let pipeline = InferencePipeline::new(InferenceConfig::default(), StubClassifier::new(40));
        let responses = classify_files(&pipeline, &[bogus.clone(), missing.clone()]);

        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0].source.as_deref(), Some(bogus.display().to_string().as_str()));
        assert_eq!(responses[1].source.as_deref(), Some(missing.display().to_string().as_str()));
        for response in &responses {
            assert_eq!(response.classification, crate::inference::Label::Unknown);
            assert_eq!(response.confidence, 0.0);
        }
    }
}
