/*!
 * Integration tests for directory batch runs
 */

use anyhow::Result;

use cinefluent::app_controller::MovieStatus;
use cinefluent::{Config, Controller};
use crate::common;

fn populate(dir: &std::path::Path) -> Result<()> {
    common::create_test_file(dir, "Heat.en.srt", common::ENGLISH_SRT)?;
    common::create_test_file(dir, "Heat.de.srt", common::GERMAN_SRT)?;
    common::create_test_file(dir, "nested/Alien.eng.srt", common::ENGLISH_SRT)?;
    common::create_test_file(dir, "nested/Alien.ger.vtt", common::GERMAN_VTT)?;
    common::create_test_file(dir, "Broken.en.srt", "this is not\na subtitle file\n")?;
    common::create_test_file(dir, "Broken.de.srt", common::GERMAN_SRT)?;
    Ok(())
}

#[tokio::test]
async fn test_runFolder_withOneBrokenMovie_shouldAlignTheOthers() -> Result<()> {
    common::init_test_logger();
    let input = common::create_temp_dir()?;
    let output = common::create_temp_dir()?;
    populate(input.path())?;
    let mut config = Config::default();
    config.batch.concurrency = 2;
    let controller = Controller::with_config(config)?;

    let summary = controller
        .run_folder(input.path().to_path_buf(), Some(output.path().to_path_buf()))
        .await?;

    assert_eq!((summary.aligned, summary.acceptable, summary.failed), (2, 2, 1));
    let titles: Vec<&str> = summary.results.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Alien", "Broken", "Heat"]);

    match &summary.results[1].status {
        MovieStatus::Failed { error } => assert!(error.contains("numeric cue index"), "{}", error),
        other => panic!("expected failure, got {:?}", other),
    }

    assert!(output.path().join("Heat.alignment.json").exists());
    assert!(output.path().join("nested/Alien.alignment.json").exists());
    assert!(!output.path().join("Broken.alignment.json").exists());

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(output.path().join("Heat.alignment.json"))?)?;
    assert_eq!(report["pairs"].as_array().map(|p| p.len()), Some(3));
    Ok(())
}

#[tokio::test]
async fn test_runFolder_withSameTitleInTwoFolders_shouldWriteSeparateReports() -> Result<()> {
    let input = common::create_temp_dir()?;
    let output = common::create_temp_dir()?;
    for folder in ["a", "b"] {
        common::create_test_file(input.path(), &format!("{}/Heat.en.srt", folder), common::ENGLISH_SRT)?;
        common::create_test_file(input.path(), &format!("{}/Heat.de.srt", folder), common::GERMAN_SRT)?;
    }
    let controller = Controller::with_config(Config::default())?;

    let summary = controller
        .run_folder(input.path().to_path_buf(), Some(output.path().to_path_buf()))
        .await?;

    assert_eq!(summary.aligned, 2);
    let reports: Vec<std::path::PathBuf> = summary
        .results
        .iter()
        .filter_map(|r| match &r.status {
            MovieStatus::Aligned { report, .. } => report.clone(),
            MovieStatus::Failed { .. } => None,
        })
        .collect();
    assert_eq!(reports.len(), 2);
    assert_ne!(reports[0], reports[1]);
    assert!(output.path().join("a/Heat.alignment.json").exists());
    assert!(output.path().join("b/Heat.alignment.json").exists());
    Ok(())
}

#[tokio::test]
async fn test_runFolder_withSkipInvalid_shouldOnlyWriteAcceptableReports() -> Result<()> {
    let input = common::create_temp_dir()?;
    let output = common::create_temp_dir()?;
    common::create_test_file(input.path(), "Good.en.srt", common::ENGLISH_SRT)?;
    common::create_test_file(input.path(), "Good.de.srt", common::GERMAN_SRT)?;
    common::create_test_file(input.path(), "Empty.en.srt", common::ENGLISH_SRT)?;
    common::create_test_file(input.path(), "Empty.de.srt", "")?;
    let mut config = Config::default();
    config.batch.skip_invalid = true;
    let controller = Controller::with_config(config)?;

    let summary = controller
        .run_folder(input.path().to_path_buf(), Some(output.path().to_path_buf()))
        .await?;

    assert_eq!((summary.aligned, summary.acceptable, summary.failed), (2, 1, 0));
    assert!(output.path().join("Good.alignment.json").exists());
    assert!(!output.path().join("Empty.alignment.json").exists());
    Ok(())
}

#[tokio::test]
async fn test_runFolder_withOtherLanguagePair_shouldIgnoreUnrelatedFiles() -> Result<()> {
    let input = common::create_temp_dir()?;
    populate(input.path())?;
    let config = Config {
        source_language: "en".to_string(),
        target_language: "fr".to_string(),
        ..Config::default()
    };
    let controller = Controller::with_config(config)?;

    let summary = controller.run_folder(input.path().to_path_buf(), None).await?;

    assert!(summary.results.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_runFolder_withMissingDirectory_shouldFail() -> Result<()> {
    let input = common::create_temp_dir()?;
    let controller = Controller::with_config(Config::default())?;

    let result = controller.run_folder(input.path().join("nope"), None).await;

    assert!(result.is_err());
    Ok(())
}
