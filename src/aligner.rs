/*!
 * Cross-lingual cue alignment.
 *
 * For every source cue, target cues whose start time lies within the
 * alignment tolerance are scored by a blend of timestamp proximity and
 * normalized-text similarity. The best candidate is kept when its score
 * clears the confidence threshold.
 *
 * The default policy is greedy per source cue and does not enforce a
 * one-to-one matching: one target cue may be claimed by several source cues.
 * `MatchPolicy::OneToOne` is an explicit opt-in alternative.
 */

use std::collections::HashMap;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::subtitle_processor::Cue;

/// How candidates are turned into pairs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// Best target per source cue; targets may be shared
    #[default]
    Greedy,
    /// Highest scores first, each target used at most once
    OneToOne,
}

/// Alignment parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignmentConfig {
    /// Maximum start-time difference for a candidate, in milliseconds
    #[serde(default = "default_tolerance_ms")]
    pub tolerance_ms: u64,

    /// Weight of the timestamp proximity score
    #[serde(default = "default_time_weight")]
    pub time_weight: f64,

    /// Weight of the text similarity score
    #[serde(default = "default_text_weight")]
    pub text_weight: f64,

    /// Pairs are emitted only above this combined score
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,

    #[serde(default)]
    pub policy: MatchPolicy,
}

fn default_tolerance_ms() -> u64 {
    50
}

fn default_time_weight() -> f64 {
    0.7
}

fn default_text_weight() -> f64 {
    0.3
}

fn default_min_confidence() -> f64 {
    0.5
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            tolerance_ms: default_tolerance_ms(),
            time_weight: default_time_weight(),
            text_weight: default_text_weight(),
            min_confidence: default_min_confidence(),
            policy: MatchPolicy::default(),
        }
    }
}

impl AlignmentConfig {
    /// Check the parameters for consistency
    pub fn validate(&self) -> Result<()> {
        if self.tolerance_ms == 0 {
            return Err(anyhow!("Alignment tolerance must be greater than zero"));
        }
        if !self.time_weight.is_finite() || !self.text_weight.is_finite() {
            return Err(anyhow!(
                "Score weights must be finite numbers (time: {}, text: {})",
                self.time_weight, self.text_weight
            ));
        }
        if self.time_weight < 0.0 || self.text_weight < 0.0 {
            return Err(anyhow!(
                "Score weights must be non-negative (time: {}, text: {})",
                self.time_weight, self.text_weight
            ));
        }
        if ((self.time_weight + self.text_weight) - 1.0).abs() > 1e-6 {
            return Err(anyhow!(
                "Score weights must sum to 1.0 (time: {}, text: {})",
                self.time_weight, self.text_weight
            ));
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(anyhow!(
                "Minimum confidence must be within [0, 1], got {}",
                self.min_confidence
            ));
        }
        Ok(())
    }
}

/// Two cues judged to carry the same spoken line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignedPair {
    pub source: Cue,
    pub target: Cue,
    /// Position of the source cue in the source input
    pub source_position: usize,
    /// Position of the target cue in the target input
    pub target_position: usize,
    /// Combined score in [0, 1]
    pub score: f64,
    pub time_score: f64,
    pub text_score: f64,
}

/// Similarity of two normalized strings from their character edit distance.
///
/// Two empty strings are identical (1.0); one empty string scores 0.0.
pub fn text_similarity(a: &str, b: &str) -> f64 {
    let len_a = a.chars().count();
    let len_b = b.chars().count();
    if len_a == 0 && len_b == 0 {
        return 1.0;
    }
    if len_a == 0 || len_b == 0 {
        return 0.0;
    }

    let distance = strsim::levenshtein(a, b);
    let max_len = len_a.max(len_b);
    (1.0 - distance as f64 / max_len as f64).max(0.0)
}

/// Target cue positions bucketed by start time, bucket width = tolerance
struct TargetIndex {
    width: u64,
    buckets: HashMap<u64, Vec<usize>>,
}

impl TargetIndex {
    fn build(target: &[Cue], width: u64) -> Self {
        let mut buckets: HashMap<u64, Vec<usize>> = HashMap::new();
        for (position, cue) in target.iter().enumerate() {
            buckets
                .entry(cue.start_time().as_millis() / width)
                .or_default()
                .push(position);
        }
        Self { width, buckets }
    }

    /// Positions that may fall within one bucket width of `start_ms`, in
    /// target order
    fn candidates(&self, start_ms: u64) -> Vec<usize> {
        let bucket = start_ms / self.width;
        let mut positions: Vec<usize> = [bucket.checked_sub(1), Some(bucket), bucket.checked_add(1)]
            .into_iter()
            .flatten()
            .filter_map(|b| self.buckets.get(&b))
            .flatten()
            .copied()
            .collect();
        positions.sort_unstable();
        positions
    }
}

/// Scored candidate before it becomes a pair
#[derive(Debug, Clone, Copy)]
struct Candidate {
    source_position: usize,
    target_position: usize,
    score: f64,
    time_score: f64,
    text_score: f64,
}

/// Aligns two cue sequences
#[derive(Debug, Clone, Default)]
pub struct Aligner {
    config: AlignmentConfig,
}

impl Aligner {
    pub fn new(config: AlignmentConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AlignmentConfig {
        &self.config
    }

    /// Score one source/target combination, `None` when outside tolerance
    fn score(&self, source: &Cue, target: &Cue) -> Option<(f64, f64, f64)> {
        let tolerance = self.config.tolerance_ms.max(1);
        let diff = source.start_time().abs_diff(target.start_time());
        if diff > tolerance {
            return None;
        }

        let time_score = 1.0 - diff as f64 / tolerance as f64;
        let text_score = text_similarity(source.normalized_text(), target.normalized_text());
        let combined = self.config.time_weight * time_score + self.config.text_weight * text_score;
        Some((combined, time_score, text_score))
    }

    /// Every in-tolerance candidate of one source cue, in target order
    fn candidates_for(&self, index: &TargetIndex, source_position: usize, source: &Cue, target: &[Cue]) -> Vec<Candidate> {
        index
            .candidates(source.start_time().as_millis())
            .into_iter()
            .filter_map(|target_position| {
                self.score(source, &target[target_position]).map(|(score, time_score, text_score)| Candidate {
                    source_position,
                    target_position,
                    score,
                    time_score,
                    text_score,
                })
            })
            .collect()
    }

    /// Align `source` cues against `target` cues
    pub fn align(&self, source: &[Cue], target: &[Cue]) -> Vec<AlignedPair> {
        if source.is_empty() || target.is_empty() {
            return Vec::new();
        }

        let index = TargetIndex::build(target, self.config.tolerance_ms.max(1));
        let selected = match self.config.policy {
            MatchPolicy::Greedy => self.select_greedy(&index, source, target),
            MatchPolicy::OneToOne => self.select_one_to_one(&index, source, target),
        };

        selected
            .into_iter()
            .map(|c| AlignedPair {
                source: source[c.source_position].clone(),
                target: target[c.target_position].clone(),
                source_position: c.source_position,
                target_position: c.target_position,
                score: c.score,
                time_score: c.time_score,
                text_score: c.text_score,
            })
            .collect()
    }

    fn select_greedy(&self, index: &TargetIndex, source: &[Cue], target: &[Cue]) -> Vec<Candidate> {
        source
            .iter()
            .enumerate()
            .filter_map(|(position, cue)| {
                // Strictly greater wins, so ties keep the earliest target
                let mut best: Option<Candidate> = None;
                for candidate in self.candidates_for(index, position, cue, target) {
                    if best.is_none_or(|b| candidate.score > b.score) {
                        best = Some(candidate);
                    }
                }
                best.filter(|b| b.score > self.config.min_confidence)
            })
            .collect()
    }

    fn select_one_to_one(&self, index: &TargetIndex, source: &[Cue], target: &[Cue]) -> Vec<Candidate> {
        let mut all: Vec<Candidate> = source
            .iter()
            .enumerate()
            .flat_map(|(position, cue)| self.candidates_for(index, position, cue, target))
            .filter(|c| c.score > self.config.min_confidence)
            .collect();

        all.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then(a.source_position.cmp(&b.source_position))
                .then(a.target_position.cmp(&b.target_position))
        });

        let mut used_sources = vec![false; source.len()];
        let mut used_targets = vec![false; target.len()];
        let mut chosen = Vec::new();
        for candidate in all {
            if used_sources[candidate.source_position] || used_targets[candidate.target_position] {
                continue;
            }
            used_sources[candidate.source_position] = true;
            used_targets[candidate.target_position] = true;
            chosen.push(candidate);
        }

        chosen.sort_by_key(|c| c.source_position);
        chosen
    }
}

/// Align with the default configuration
pub fn align(source: &[Cue], target: &[Cue]) -> Vec<AlignedPair> {
    Aligner::default().align(source, target)
}
