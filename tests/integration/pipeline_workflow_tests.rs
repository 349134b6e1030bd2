/*!
 * Integration tests for the parse, validate and align workflow
 */

use anyhow::Result;

use cinefluent::validation::AlignmentQuality;
use cinefluent::{
    AlignmentConfig, AlignmentPipeline, AppError, Config, Controller, MatchPolicy, ParseError,
    SubtitleFormat, TrackInput,
};
use cinefluent::validation::ValidationConfig;
use crate::common;

fn controller() -> Result<Controller> {
    Controller::with_config(Config::default())
}

/// The German track aligns the same way whatever format it comes in
#[test]
fn test_alignFiles_withEveryTargetFormat_shouldProduceGoodAlignment() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    let source = common::create_test_file(dir, "movie.en.srt", common::ENGLISH_SRT)?;
    let targets = [
        common::create_test_file(dir, "movie.de.srt", common::GERMAN_SRT)?,
        common::create_test_file(dir, "movie.de.vtt", common::GERMAN_VTT)?,
        common::create_test_file(dir, "movie.de.ass", common::GERMAN_ASS)?,
    ];
    let controller = controller()?;

    for target in &targets {
        let outcome = controller.align_files(&source, target)?;

        assert!(outcome.is_acceptable(), "not acceptable for {:?}", target);
        assert_eq!(outcome.pairs.len(), 3);
        assert_eq!(outcome.alignment_report.quality, AlignmentQuality::Good);
        assert_eq!(outcome.alignment_report.shared_targets, 0);
        assert_eq!(outcome.source.language, "en");
        assert_eq!(outcome.target.language, "de");
    }
    Ok(())
}

#[test]
fn test_alignFiles_outcome_shouldSerializeSecondsAndReports() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_file(temp_dir.path(), "m.en.srt", common::ENGLISH_SRT)?;
    let target = common::create_test_file(temp_dir.path(), "m.de.srt", common::GERMAN_SRT)?;

    let outcome = controller()?.align_files(&source, &target)?;
    let json: serde_json::Value = serde_json::to_value(&outcome)?;

    assert_eq!(json["pairs"][0]["source"]["start_time"], serde_json::json!(1.0));
    assert_eq!(json["pairs"][1]["target"]["start_time"], serde_json::json!(4.02));
    assert_eq!(json["alignment_report"]["quality"], "good");
    assert_eq!(json["source_report"]["valid"], true);
    assert!(json["alignment_report"].get("error").is_none());
    Ok(())
}

#[test]
fn test_alignFiles_withEmptyTarget_shouldReportInsteadOfFailing() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_file(temp_dir.path(), "m.en.srt", common::ENGLISH_SRT)?;
    let target = common::create_test_file(temp_dir.path(), "m.de.srt", "")?;

    let outcome = controller()?.align_files(&source, &target)?;

    assert!(!outcome.is_acceptable());
    assert_eq!(outcome.target_report.error.as_deref(), Some("No subtitle cues found"));
    assert!(outcome.pairs.is_empty());
    assert!(!outcome.alignment_report.valid);
    Ok(())
}

#[test]
fn test_alignFiles_withOverlappingSource_shouldSkipAlignment() -> Result<()> {
    let overlapping = "1\n00:00:01,000 --> 00:00:03,000\nHello\n\n2\n00:00:02,500 --> 00:00:06,000\nWorld\n";
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_file(temp_dir.path(), "m.en.srt", overlapping)?;
    let target = common::create_test_file(temp_dir.path(), "m.de.srt", common::GERMAN_SRT)?;

    let outcome = controller()?.align_files(&source, &target)?;

    assert!(!outcome.source_report.valid);
    assert_eq!(outcome.source_report.messages(), vec!["Cue 2: Overlaps with previous cue".to_string()]);
    assert!(outcome.pairs.is_empty());
    Ok(())
}

#[test]
fn test_alignFiles_withMalformedSource_shouldReturnParseError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_file(temp_dir.path(), "m.en.vtt", "00:01.000 --> 00:02.000\nno header\n")?;
    let target = common::create_test_file(temp_dir.path(), "m.de.srt", common::GERMAN_SRT)?;

    let result = controller()?.align_files(&source, &target);

    assert!(matches!(result, Err(AppError::Parse(ParseError::MissingHeader))));
    Ok(())
}

#[test]
fn test_alignFiles_withMissingFile_shouldReturnFileError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let target = common::create_test_file(temp_dir.path(), "m.de.srt", common::GERMAN_SRT)?;

    let result = controller()?.align_files(temp_dir.path().join("missing.en.srt"), &target);

    assert!(matches!(result, Err(AppError::File(_))));
    Ok(())
}

#[test]
fn test_validateFile_shouldReturnTrackAndReport() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "m.de.ass", common::GERMAN_ASS)?;

    let (track, report) = controller()?.validate_file(&path, "deu")?;

    assert_eq!(track.format, SubtitleFormat::Ass);
    assert_eq!(track.language, "de");
    assert!(report.valid);
    assert_eq!(report.count, 3);
    assert_eq!(report.duration_ms, 8_500);
    Ok(())
}

#[test]
fn test_pipeline_withOneToOnePolicy_shouldMatchGreedyOnCleanTracks() -> Result<()> {
    let greedy = AlignmentPipeline::default();
    let exclusive = AlignmentPipeline::new(
        AlignmentConfig {
            policy: MatchPolicy::OneToOne,
            ..AlignmentConfig::default()
        },
        ValidationConfig::default(),
    );
    let run = |pipeline: &AlignmentPipeline| {
        pipeline.run(
            TrackInput::new(common::ENGLISH_SRT.as_bytes(), SubtitleFormat::Srt, "en"),
            TrackInput::new(common::GERMAN_VTT.as_bytes(), SubtitleFormat::WebVtt, "de"),
        )
    };

    let a = run(&greedy)?;
    let b = run(&exclusive)?;

    assert_eq!(a.pairs, b.pairs);
    Ok(())
}
