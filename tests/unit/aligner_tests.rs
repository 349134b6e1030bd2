/*!
 * Tests for cross-language cue alignment
 */

use cinefluent::aligner::text_similarity;
use cinefluent::{align, validate_alignment, Aligner, AlignmentConfig, MatchPolicy};
use cinefluent::validation::AlignmentQuality;
use crate::common;

/// Identical timestamps on both sides give high-scoring pairs
#[test]
fn test_align_withIdenticalTimestamps_shouldPairEveryCue() {
    let source = common::cues(&[(1_000, 3_000, "Hello"), (4_000, 6_000, "World")]);
    let target = common::cues(&[(1_000, 3_000, "Hallo"), (4_000, 6_000, "Welt")]);

    let pairs = align(&source, &target);

    assert_eq!(pairs.len(), 2);
    assert!(pairs.iter().all(|p| p.score > 0.7));
    assert_eq!(pairs[0].target.raw_text(), "Hallo");
    assert_eq!(pairs[1].target_position, 1);

    let report = validate_alignment(&pairs);
    assert!(matches!(report.quality, AlignmentQuality::Excellent | AlignmentQuality::Good));
}

#[test]
fn test_align_withOffsetBeyondTolerance_shouldProduceNoPairs() {
    let source = common::cues(&[(1_000, 2_000, "same"), (5_000, 6_000, "same")]);
    let target = common::cues(&[(1_051, 2_000, "same"), (4_900, 6_000, "same")]);

    assert!(align(&source, &target).is_empty());
}

#[test]
fn test_align_atExactTolerance_shouldRequireTextToClearThreshold() {
    // Time score is zero at the edge, so only identical text reaches 0.3
    let source = common::cues(&[(1_000, 2_000, "same")]);
    let target = common::cues(&[(1_050, 2_000, "same")]);

    assert!(align(&source, &target).is_empty());
}

#[test]
fn test_align_withCloserCandidate_shouldPickBestScore() {
    let source = common::cues(&[(1_000, 2_000, "good morning")]);
    let target = common::cues(&[(970, 2_000, "good morning"), (1_005, 2_000, "guten morgen")]);

    let pairs = align(&source, &target);

    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].target_position, 1);
    assert!((pairs[0].time_score - 0.9).abs() < 1e-9);
}

#[test]
fn test_align_withEqualScores_shouldKeepFirstTarget() {
    let source = common::cues(&[(1_000, 2_000, "x")]);
    let target = common::cues(&[(990, 2_000, "x"), (1_010, 2_000, "x")]);

    let pairs = align(&source, &target);

    assert_eq!(pairs[0].target_position, 0);
}

#[test]
fn test_align_greedy_shouldAllowSharedTargets() {
    let source = common::cues(&[(1_000, 1_500, "a"), (1_040, 2_000, "a")]);
    let target = common::cues(&[(1_020, 2_000, "a")]);

    let pairs = align(&source, &target);
    let report = validate_alignment(&pairs);

    assert_eq!(pairs.len(), 2);
    assert!(pairs.iter().all(|p| p.target_position == 0));
    assert_eq!(report.shared_targets, 1);
}

#[test]
fn test_align_oneToOne_shouldNeverReuseTarget() {
    let source = common::cues(&[(1_000, 1_500, "a"), (1_030, 2_000, "a")]);
    let target = common::cues(&[(1_020, 2_000, "a")]);
    let aligner = Aligner::new(AlignmentConfig {
        policy: MatchPolicy::OneToOne,
        ..AlignmentConfig::default()
    });

    let pairs = aligner.align(&source, &target);

    assert_eq!(pairs.len(), 1);
    // 10 ms beats 20 ms
    assert_eq!(pairs[0].source_position, 1);
}

#[test]
fn test_align_withEmptySide_shouldReturnNothing() {
    let cues = common::cues(&[(0, 1_000, "a")]);

    assert!(align(&cues, &[]).is_empty());
    assert!(align(&[], &cues).is_empty());
}

#[test]
fn test_align_withLongTracks_shouldPairInOrder() {
    let source = common::synthetic_track(200, 0, "line");
    let target = common::synthetic_track(200, 15, "line");

    let pairs = align(&source, &target);

    assert_eq!(pairs.len(), 200);
    assert!(pairs.iter().enumerate().all(|(i, p)| p.source_position == i && p.target_position == i));
}

#[test]
fn test_textSimilarity_shouldUseCharacterCounts() {
    assert_eq!(text_similarity("", ""), 1.0);
    assert_eq!(text_similarity("", "a"), 0.0);
    // One substitution over four characters, not eight bytes
    assert!((text_similarity("grüß", "gruß") - 0.75).abs() < 1e-9);
}

#[test]
fn test_alignmentConfig_withBadWeights_shouldFailValidation() {
    let config = AlignmentConfig {
        time_weight: 0.9,
        ..AlignmentConfig::default()
    };
    assert!(config.validate().is_err());
    assert!(AlignmentConfig::default().validate().is_ok());
}
