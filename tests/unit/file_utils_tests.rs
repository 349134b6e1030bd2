/*!
 * Tests for file utilities and movie discovery
 */

use anyhow::Result;

use cinefluent::file_utils::FileManager;
use crate::common;

#[test]
fn test_findSubtitleFiles_shouldRecurseAndFilterExtensions() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    common::create_test_file(dir, "a.en.srt", common::ENGLISH_SRT)?;
    common::create_test_file(dir, "nested/b.de.vtt", common::GERMAN_VTT)?;
    common::create_test_file(dir, "notes.txt", "not a subtitle")?;

    let files = FileManager::find_subtitle_files(dir)?;

    assert_eq!(files.len(), 2);
    assert!(files.iter().any(|f| f.ends_with("nested/b.de.vtt")));
    Ok(())
}

#[test]
fn test_findMoviePairs_shouldMatchLanguagesAcrossCodeForms() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    common::create_test_file(dir, "Heat.eng.srt", common::ENGLISH_SRT)?;
    common::create_test_file(dir, "Heat.ger.ass", common::GERMAN_ASS)?;
    common::create_test_file(dir, "Alien.en.srt", common::ENGLISH_SRT)?;
    common::create_test_file(dir, "Alien.de.vtt", common::GERMAN_VTT)?;
    common::create_test_file(dir, "Alien.fr.srt", common::ENGLISH_SRT)?;
    // Source only, no target
    common::create_test_file(dir, "Lonely.en.srt", common::ENGLISH_SRT)?;

    let pairs = FileManager::find_movie_pairs(dir, "en", "de")?;

    let titles: Vec<&str> = pairs.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Alien", "Heat"]);
    assert!(pairs[1].source.ends_with("Heat.eng.srt"));
    assert!(pairs[1].target.ends_with("Heat.ger.ass"));
    Ok(())
}

#[test]
fn test_findMoviePairs_withSameTitleInDifferentFolders_shouldKeepBoth() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    for folder in ["season1", "season2"] {
        common::create_test_file(dir, &format!("{}/pilot.en.srt", folder), common::ENGLISH_SRT)?;
        common::create_test_file(dir, &format!("{}/pilot.de.srt", folder), common::GERMAN_SRT)?;
    }

    let pairs = FileManager::find_movie_pairs(dir, "en", "de")?;

    assert_eq!(pairs.len(), 2);
    assert_ne!(pairs[0].source.parent(), pairs[1].source.parent());
    assert_eq!(pairs[0].folder, std::path::PathBuf::from("season1"));
    assert_eq!(pairs[1].folder, std::path::PathBuf::from("season2"));
    Ok(())
}

#[test]
fn test_writeToFile_shouldCreateParentDirectories() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("deep/er/report.json");

    FileManager::write_to_file(&path, "{}")?;

    assert!(FileManager::file_exists(&path));
    assert_eq!(std::fs::read_to_string(&path)?, "{}");
    Ok(())
}
