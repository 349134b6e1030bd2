/*!
 * Quality validation of an alignment result.
 */

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use super::ValidationConfig;
use crate::aligner::AlignedPair;

/// Categorical alignment quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignmentQuality {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl fmt::Display for AlignmentQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        };
        write!(f, "{}", label)
    }
}

/// Result of validating an alignment
#[derive(Debug, Clone, Serialize)]
pub struct AlignmentReport {
    /// True iff the mean score clears the validity threshold
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Mean combined score
    pub alignment_rate: f64,
    pub total_pairs: usize,
    pub high_confidence: usize,
    pub medium_confidence: usize,
    pub low_confidence: usize,
    pub quality: AlignmentQuality,
    /// Target cues claimed by more than one pair
    pub shared_targets: usize,
}

impl AlignmentReport {
    fn empty() -> Self {
        Self {
            valid: false,
            error: Some("No aligned pairs found".to_string()),
            alignment_rate: 0.0,
            total_pairs: 0,
            high_confidence: 0,
            medium_confidence: 0,
            low_confidence: 0,
            quality: AlignmentQuality::Poor,
            shared_targets: 0,
        }
    }
}

/// Alignment validator with configurable thresholds
#[derive(Debug, Clone, Default)]
pub struct AlignmentValidator {
    config: ValidationConfig,
}

impl AlignmentValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Map a mean score to its quality label
    pub fn quality_for(&self, rate: f64) -> AlignmentQuality {
        if rate > self.config.excellent_threshold {
            AlignmentQuality::Excellent
        } else if rate > self.config.good_threshold {
            AlignmentQuality::Good
        } else if rate > self.config.fair_threshold {
            AlignmentQuality::Fair
        } else {
            AlignmentQuality::Poor
        }
    }

    pub fn validate(&self, pairs: &[AlignedPair]) -> AlignmentReport {
        if pairs.is_empty() {
            return AlignmentReport::empty();
        }

        let high = self.config.high_confidence;
        let medium = self.config.medium_confidence;

        let high_confidence = pairs.iter().filter(|p| p.score > high).count();
        let medium_confidence = pairs
            .iter()
            .filter(|p| p.score >= medium && p.score <= high)
            .count();
        let low_confidence = pairs.iter().filter(|p| p.score < medium).count();

        let alignment_rate = pairs.iter().map(|p| p.score).sum::<f64>() / pairs.len() as f64;

        let mut claims: HashMap<usize, usize> = HashMap::new();
        for pair in pairs {
            *claims.entry(pair.target_position).or_default() += 1;
        }
        let shared_targets = claims.values().filter(|&&n| n > 1).count();

        AlignmentReport {
            valid: alignment_rate > self.config.min_alignment_rate,
            error: None,
            alignment_rate,
            total_pairs: pairs.len(),
            high_confidence,
            medium_confidence,
            low_confidence,
            quality: self.quality_for(alignment_rate),
            shared_targets,
        }
    }
}

/// Validate an alignment with the default thresholds
pub fn validate_alignment(pairs: &[AlignedPair]) -> AlignmentReport {
    AlignmentValidator::new().validate(pairs)
}
