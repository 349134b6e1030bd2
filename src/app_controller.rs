use anyhow::{anyhow, Context, Result};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::errors::AppError;
use crate::file_utils::{FileManager, MoviePair};
use crate::pipeline::{AlignmentPipeline, IngestOutcome, TrackInput};
use crate::subtitle_processor::{SubtitleFormat, SubtitleTrack};
use crate::validation::{self, AlignmentQuality, CueReport};

// @module: Application controller for subtitle alignment

/// Result of one movie in a batch run
#[derive(Debug, Clone, Serialize)]
pub struct MovieResult {
    pub title: String,
    pub source: PathBuf,
    pub target: PathBuf,
    #[serde(flatten)]
    pub status: MovieStatus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum MovieStatus {
    Aligned {
        pairs: usize,
        alignment_rate: f64,
        quality: AlignmentQuality,
        acceptable: bool,
        report: Option<PathBuf>,
    },
    Failed {
        error: String,
    },
}

/// Totals for a batch run
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchSummary {
    pub results: Vec<MovieResult>,
    pub aligned: usize,
    pub acceptable: usize,
    pub failed: usize,
}

impl BatchSummary {
    fn from_results(mut results: Vec<MovieResult>) -> Self {
        results.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.source.cmp(&b.source)));

        let mut summary = BatchSummary::default();
        for result in &results {
            match &result.status {
                MovieStatus::Aligned { acceptable, .. } => {
                    summary.aligned += 1;
                    if *acceptable {
                        summary.acceptable += 1;
                    }
                }
                MovieStatus::Failed { .. } => summary.failed += 1,
            }
        }
        summary.results = results;
        summary
    }
}

/// Main application controller for subtitle alignment
#[derive(Debug, Clone)]
pub struct Controller {
    // @field: App configuration
    config: Config,

    pipeline: AlignmentPipeline,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Invalid configuration")?;

        let pipeline = AlignmentPipeline::new(config.alignment.clone(), config.validation.clone());
        Ok(Self { config, pipeline })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Parse one file and check its cues
    pub fn validate_file<P: AsRef<Path>>(&self, path: P, language: &str) -> Result<(SubtitleTrack, CueReport), AppError> {
        let path = path.as_ref();
        let format = SubtitleFormat::from_path(path)?;
        let bytes = Self::read_subtitle(path)?;

        let track = SubtitleTrack::parse(&bytes, format, self.config.encoding, language)?;
        let report = validation::validate_cues(&track.cues);

        debug!("Validated {} ({} cues, valid: {})", path.display(), report.count, report.valid);
        Ok((track, report))
    }

    /// Run the full pipeline for one source/target file pair
    pub fn align_files<P: AsRef<Path>, Q: AsRef<Path>>(&self, source: P, target: Q) -> Result<IngestOutcome, AppError> {
        let (source, target) = (source.as_ref(), target.as_ref());
        let source_format = SubtitleFormat::from_path(source)?;
        let target_format = SubtitleFormat::from_path(target)?;
        let source_bytes = Self::read_subtitle(source)?;
        let target_bytes = Self::read_subtitle(target)?;

        let source_input = TrackInput::new(&source_bytes, source_format, &self.config.source_language)
            .with_encoding(self.config.encoding);
        let target_input = TrackInput::new(&target_bytes, target_format, &self.config.target_language)
            .with_encoding(self.config.encoding);

        Ok(self.pipeline.run(source_input, target_input)?)
    }

    fn read_subtitle(path: &Path) -> Result<Vec<u8>, AppError> {
        FileManager::read_bytes(path).map_err(|e| AppError::File(format!("{:#}", e)))
    }

    /// Align every movie found under a directory. Movies run in parallel up
    /// to the configured concurrency; one failing movie does not stop the run.
    pub async fn run_folder(&self, input_dir: PathBuf, output_dir: Option<PathBuf>) -> Result<BatchSummary> {
        let start_time = std::time::Instant::now();

        if !input_dir.is_dir() {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let movies = FileManager::find_movie_pairs(
            &input_dir,
            &self.config.source_language,
            &self.config.target_language,
        )?;

        if movies.is_empty() {
            warn!(
                "No {}/{} subtitle pairs found in {:?}",
                self.config.source_language, self.config.target_language, input_dir
            );
            return Ok(BatchSummary::default());
        }

        if let Some(dir) = &output_dir {
            FileManager::ensure_dir(dir)?;
        }

        info!("Aligning {} movies from {:?}", movies.len(), input_dir);

        let progress_bar = ProgressBar::new(movies.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} movies ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("=>-"));
        progress_bar.set_message("Aligning");

        let concurrency = self.config.batch.concurrency.max(1);
        let results: Vec<MovieResult> = stream::iter(movies)
            .map(|movie| {
                let controller = self.clone();
                let output_dir = output_dir.clone();
                let progress_bar = progress_bar.clone();
                async move {
                    let result = controller.process_movie(movie, output_dir).await;
                    progress_bar.inc(1);
                    result
                }
            })
            .buffer_unordered(concurrency)
            .collect()
            .await;

        progress_bar.finish_with_message("Alignment complete");

        let summary = BatchSummary::from_results(results);
        info!(
            "Folder processing completed: {} aligned ({} acceptable), {} failed in {}",
            summary.aligned,
            summary.acceptable,
            summary.failed,
            Self::format_duration(start_time.elapsed())
        );

        Ok(summary)
    }

    async fn process_movie(&self, movie: MoviePair, output_dir: Option<PathBuf>) -> MovieResult {
        let MoviePair { title, folder, source, target } = movie;

        let controller = self.clone();
        let (source_path, target_path) = (source.clone(), target.clone());
        let outcome = tokio::task::spawn_blocking(move || controller.align_files(&source_path, &target_path))
            .await
            .map_err(|e| AppError::Unknown(format!("Alignment task failed: {}", e)))
            .and_then(|result| result);

        let status = match outcome {
            Ok(outcome) => {
                let report_path = output_dir.map(|dir| FileManager::generate_report_path(dir, &folder, &title));
                self.record_outcome(&title, &outcome, report_path.as_deref())
            }
            Err(e) => {
                error!("Error processing movie {}: {}", title, e);
                MovieStatus::Failed { error: e.to_string() }
            }
        };

        MovieResult { title, source, target, status }
    }

    fn record_outcome(&self, title: &str, outcome: &IngestOutcome, report_path: Option<&Path>) -> MovieStatus {
        let acceptable = outcome.is_acceptable();
        let report = &outcome.alignment_report;

        if acceptable {
            info!(
                "{}: {} pairs, rate {:.3} ({})",
                title, report.total_pairs, report.alignment_rate, report.quality
            );
        } else {
            for message in outcome.source_report.messages().iter().chain(outcome.target_report.messages().iter()) {
                warn!("{}: {}", title, message);
            }
            if let Some(error) = &report.error {
                warn!("{}: {}", title, error);
            } else {
                warn!(
                    "{}: alignment rate {:.3} is below threshold ({})",
                    title, report.alignment_rate, report.quality
                );
            }
        }

        let report_path = match report_path {
            Some(path) if acceptable || !self.config.batch.skip_invalid => {
                match Self::write_outcome(path, outcome) {
                    Ok(()) => Some(path.to_path_buf()),
                    Err(e) => {
                        warn!("Failed to write report for {}: {:#}", title, e);
                        None
                    }
                }
            }
            _ => None,
        };

        MovieStatus::Aligned {
            pairs: report.total_pairs,
            alignment_rate: report.alignment_rate,
            quality: report.quality,
            acceptable,
            report: report_path,
        }
    }

    fn write_outcome(path: &Path, outcome: &IngestOutcome) -> Result<()> {
        let json = serde_json::to_string_pretty(outcome).context("Failed to serialize alignment outcome")?;
        FileManager::write_to_file(path, &json)
    }

    /// Format a duration as `1h 2m 3s`, `2m 3s` or `3.4s`
    fn format_duration(duration: std::time::Duration) -> String {
        let total_secs = duration.as_secs();
        let hours = total_secs / 3600;
        let minutes = (total_secs % 3600) / 60;
        let seconds = total_secs % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{:.1}s", duration.as_secs_f64())
        }
    }
}
