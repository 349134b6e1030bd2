/*!
 * Structural validation of a single track's cues.
 *
 * Checks, all collected without short-circuiting:
 * - Timing consistency (start < end)
 * - Overlap with the immediately preceding cue
 * - Empty text
 */

use serde::Serialize;

use crate::subtitle_processor::{Cue, Timecode};

/// Types of cue issues. Cue numbers are 1-based positions in the list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CueIssue {
    /// Start time is at or after end time
    InvalidTiming {
        cue: usize,
        start: Timecode,
        end: Timecode,
    },
    /// Starts before the preceding cue ends
    Overlap {
        cue: usize,
        overlap_ms: u64,
    },
    /// Cues whose trimmed text is empty
    EmptyText {
        cues: Vec<usize>,
    },
}

impl std::fmt::Display for CueIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CueIssue::InvalidTiming { cue, .. } => write!(f, "Cue {}: Start time >= end time", cue),
            CueIssue::Overlap { cue, .. } => write!(f, "Cue {}: Overlaps with previous cue", cue),
            CueIssue::EmptyText { cues } => write!(f, "Empty text in cues: {:?}", cues),
        }
    }
}

/// Result of validating one track
#[derive(Debug, Clone, Serialize)]
pub struct CueReport {
    /// True iff no issues were found
    pub valid: bool,
    /// Set when validation could not run at all
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub issues: Vec<CueIssue>,
    /// Number of cues
    pub count: usize,
    /// Last cue's end minus first cue's start, in milliseconds
    pub duration_ms: i64,
    /// Same span in seconds
    pub duration: f64,
}

impl CueReport {
    fn empty() -> Self {
        Self {
            valid: false,
            error: Some("No subtitle cues found".to_string()),
            issues: Vec::new(),
            count: 0,
            duration_ms: 0,
            duration: 0.0,
        }
    }

    /// Human-readable issue lines
    pub fn messages(&self) -> Vec<String> {
        self.error
            .iter()
            .cloned()
            .chain(self.issues.iter().map(|i| i.to_string()))
            .collect()
    }
}

/// Validate a track's cues
pub fn validate_cues(cues: &[Cue]) -> CueReport {
    let (Some(first), Some(last)) = (cues.first(), cues.last()) else {
        return CueReport::empty();
    };

    let mut issues = Vec::new();

    for (i, cue) in cues.iter().enumerate() {
        if cue.start_time() >= cue.end_time() {
            issues.push(CueIssue::InvalidTiming {
                cue: i + 1,
                start: cue.start_time(),
                end: cue.end_time(),
            });
        }

        if i > 0 {
            let previous_end = cues[i - 1].end_time();
            if cue.start_time() < previous_end {
                issues.push(CueIssue::Overlap {
                    cue: i + 1,
                    overlap_ms: previous_end.abs_diff(cue.start_time()),
                });
            }
        }
    }

    let empty: Vec<usize> = cues
        .iter()
        .enumerate()
        .filter(|(_, cue)| cue.raw_text().trim().is_empty())
        .map(|(i, _)| i + 1)
        .collect();
    if !empty.is_empty() {
        issues.push(CueIssue::EmptyText { cues: empty });
    }

    let duration_ms = first.start_time().span_to(last.end_time());

    CueReport {
        valid: issues.is_empty(),
        error: None,
        issues,
        count: cues.len(),
        duration_ms,
        duration: duration_ms as f64 / 1000.0,
    }
}
