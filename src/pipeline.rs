/*!
 * One-movie ingestion pipeline.
 *
 * Parses both language tracks, validates each, aligns them and validates the
 * alignment. The outcome carries every report; whether a weak alignment blocks
 * storage is left to the caller.
 */

use serde::Serialize;

use crate::aligner::{AlignedPair, Aligner, AlignmentConfig};
use crate::errors::ParseError;
use crate::subtitle_processor::{SubtitleFormat, SubtitleTrack, TextEncoding};
use crate::validation::{self, AlignmentReport, AlignmentValidator, CueReport, ValidationConfig};

/// Raw input for one language track
#[derive(Debug, Clone)]
pub struct TrackInput<'a> {
    pub bytes: &'a [u8],
    pub format: SubtitleFormat,
    pub encoding: TextEncoding,
    pub language: &'a str,
}

impl<'a> TrackInput<'a> {
    pub fn new(bytes: &'a [u8], format: SubtitleFormat, language: &'a str) -> Self {
        Self {
            bytes,
            format,
            encoding: TextEncoding::default(),
            language,
        }
    }

    pub fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }
}

/// Everything produced for one movie
#[derive(Debug, Clone, Serialize)]
pub struct IngestOutcome {
    pub source: SubtitleTrack,
    pub target: SubtitleTrack,
    pub source_report: CueReport,
    pub target_report: CueReport,
    pub pairs: Vec<AlignedPair>,
    pub alignment_report: AlignmentReport,
}

impl IngestOutcome {
    /// Both tracks and the alignment validated
    pub fn is_acceptable(&self) -> bool {
        self.source_report.valid && self.target_report.valid && self.alignment_report.valid
    }
}

/// Parse, validate and align two tracks
#[derive(Debug, Clone, Default)]
pub struct AlignmentPipeline {
    aligner: Aligner,
    alignment_validator: AlignmentValidator,
}

impl AlignmentPipeline {
    pub fn new(alignment: AlignmentConfig, validation: ValidationConfig) -> Self {
        Self {
            aligner: Aligner::new(alignment),
            alignment_validator: AlignmentValidator::with_config(validation),
        }
    }

    /// Run the pipeline. A parse error in either track aborts this movie
    /// only; validation problems are returned inside the outcome.
    pub fn run(&self, source: TrackInput<'_>, target: TrackInput<'_>) -> Result<IngestOutcome, ParseError> {
        let source = SubtitleTrack::parse(source.bytes, source.format, source.encoding, source.language)?;
        let target = SubtitleTrack::parse(target.bytes, target.format, target.encoding, target.language)?;
        Ok(self.run_tracks(source, target))
    }

    /// Validate and align already-parsed tracks
    pub fn run_tracks(&self, source: SubtitleTrack, target: SubtitleTrack) -> IngestOutcome {
        let source_report = validation::validate_cues(&source.cues);
        let target_report = validation::validate_cues(&target.cues);

        // Alignment only runs on tracks that passed validation
        let pairs = if source_report.valid && target_report.valid {
            self.aligner.align(&source.cues, &target.cues)
        } else {
            Vec::new()
        };
        let alignment_report = self.alignment_validator.validate(&pairs);

        IngestOutcome {
            source,
            target,
            source_report,
            target_report,
            pairs,
            alignment_report,
        }
    }
}
