use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::language_utils;
use crate::subtitle_processor::SubtitleFormat;

// @module: File and directory utilities

/// A subtitle file named `<title>.<language>.<ext>`
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedSubtitle {
    pub path: PathBuf,
    pub title: String,
    pub language: String,
    pub format: SubtitleFormat,
}

/// Source and target subtitle files of one movie
#[derive(Debug, Clone, PartialEq)]
pub struct MoviePair {
    pub title: String,
    /// Folder of the movie relative to the scanned directory
    pub folder: PathBuf,
    pub source: PathBuf,
    pub target: PathBuf,
}

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
        }
        Ok(())
    }

    /// Read a whole file into memory
    pub fn read_bytes<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
        fs::read(&path).with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))
    }

    // @generates: Report path `<output_dir>/<folder>/<title>.alignment.json`
    pub fn generate_report_path<P: AsRef<Path>>(output_dir: P, folder: &Path, title: &str) -> PathBuf {
        output_dir
            .as_ref()
            .join(folder)
            .join(format!("{}.alignment.json", title))
    }

    /// Split `movie.en.srt` into title, language tag and format
    pub fn parse_tagged_name<P: AsRef<Path>>(path: P) -> Option<TaggedSubtitle> {
        let path = path.as_ref();
        let format = SubtitleFormat::from_path(path).ok()?;
        let stem = path.file_stem()?.to_string_lossy().to_string();
        let (title, language) = stem.rsplit_once('.')?;

        if title.is_empty() || language_utils::normalize_to_part2t(language).is_err() {
            return None;
        }

        Some(TaggedSubtitle {
            path: path.to_path_buf(),
            title: title.to_string(),
            language: language.to_lowercase(),
            format,
        })
    }

    /// Find subtitle files in a supported format under a directory
    pub fn find_subtitle_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() && SubtitleFormat::from_path(path).is_ok() {
                result.push(path.to_path_buf());
            }
        }

        result.sort();
        Ok(result)
    }

    /// Group language-tagged subtitles by movie and pick the source and
    /// target file of each. Movies missing either language are skipped.
    pub fn find_movie_pairs<P: AsRef<Path>>(
        dir: P,
        source_language: &str,
        target_language: &str,
    ) -> Result<Vec<MoviePair>> {
        let dir = dir.as_ref();
        let mut movies: BTreeMap<PathBuf, (Option<PathBuf>, Option<PathBuf>)> = BTreeMap::new();

        for path in Self::find_subtitle_files(dir)? {
            let Some(tagged) = Self::parse_tagged_name(&path) else {
                continue;
            };
            // Keyed by folder relative to `dir` plus title
            let key = path
                .strip_prefix(dir)
                .unwrap_or(&path)
                .parent()
                .unwrap_or(Path::new(""))
                .join(&tagged.title);
            let slot = movies.entry(key).or_default();

            if language_utils::language_codes_match(&tagged.language, source_language) {
                slot.0.get_or_insert(tagged.path);
            } else if language_utils::language_codes_match(&tagged.language, target_language) {
                slot.1.get_or_insert(tagged.path);
            }
        }

        Ok(movies
            .into_iter()
            .filter_map(|(key, files)| match files {
                (Some(source), Some(target)) => Some(MoviePair {
                    title: key
                        .file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_default(),
                    folder: key.parent().map(Path::to_path_buf).unwrap_or_default(),
                    source,
                    target,
                }),
                _ => None,
            })
            .collect())
    }
}
