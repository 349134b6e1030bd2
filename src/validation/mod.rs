/*!
 * Validation of parsed tracks and alignment results.
 *
 * Validation never fails as an error: every check returns a report whose
 * `valid` flag the caller interprets.
 *
 * - `cues`: structural checks on one track (timing, overlaps, empty text)
 * - `alignment`: score statistics and quality label for aligned pairs
 */

pub mod alignment;
pub mod cues;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

pub use alignment::{validate_alignment, AlignmentQuality, AlignmentReport, AlignmentValidator};
pub use cues::{validate_cues, CueIssue, CueReport};

/// Thresholds for alignment validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Pairs scoring above this are high confidence
    #[serde(default = "default_high_confidence")]
    pub high_confidence: f64,

    /// Pairs scoring at or above this (up to high) are medium confidence
    #[serde(default = "default_medium_confidence")]
    pub medium_confidence: f64,

    /// An alignment is valid when its mean score exceeds this
    #[serde(default = "default_min_alignment_rate")]
    pub min_alignment_rate: f64,

    #[serde(default = "default_excellent_threshold")]
    pub excellent_threshold: f64,

    #[serde(default = "default_good_threshold")]
    pub good_threshold: f64,

    #[serde(default = "default_fair_threshold")]
    pub fair_threshold: f64,
}

fn default_high_confidence() -> f64 {
    0.8
}

fn default_medium_confidence() -> f64 {
    0.6
}

fn default_min_alignment_rate() -> f64 {
    0.6
}

fn default_excellent_threshold() -> f64 {
    0.9
}

fn default_good_threshold() -> f64 {
    0.7
}

fn default_fair_threshold() -> f64 {
    0.5
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            high_confidence: default_high_confidence(),
            medium_confidence: default_medium_confidence(),
            min_alignment_rate: default_min_alignment_rate(),
            excellent_threshold: default_excellent_threshold(),
            good_threshold: default_good_threshold(),
            fair_threshold: default_fair_threshold(),
        }
    }
}

impl ValidationConfig {
    /// Thresholds must lie in [0, 1] and be ordered
    pub fn validate(&self) -> Result<()> {
        let all = [
            ("high_confidence", self.high_confidence),
            ("medium_confidence", self.medium_confidence),
            ("min_alignment_rate", self.min_alignment_rate),
            ("excellent_threshold", self.excellent_threshold),
            ("good_threshold", self.good_threshold),
            ("fair_threshold", self.fair_threshold),
        ];
        if let Some((name, value)) = all.iter().find(|(_, v)| !v.is_finite() || !(0.0..=1.0).contains(v)) {
            return Err(anyhow!("{} must be within [0, 1], got {}", name, value));
        }
        if self.medium_confidence > self.high_confidence {
            return Err(anyhow!("medium_confidence must not exceed high_confidence"));
        }
        if !(self.fair_threshold <= self.good_threshold && self.good_threshold <= self.excellent_threshold) {
            return Err(anyhow!("Quality thresholds must be ordered fair <= good <= excellent"));
        }
        Ok(())
    }
}
