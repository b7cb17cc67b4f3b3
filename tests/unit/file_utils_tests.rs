/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use std::fs;
use std::path::PathBuf;
use xliff_translator::file_utils::FileManager;

use crate::common;

/// Test generating output paths
#[test]
fn test_generate_output_path_withValidInputs_shouldCreateCorrectPath() {
    let input = PathBuf::from("/locale/messages.xlf");
    let output_dir = PathBuf::from("/output");

    let result = FileManager::generate_output_path(&input, &output_dir, "de");

    assert_eq!(result, PathBuf::from("/output/messages.de.xlf"));
}

#[test]
fn test_generate_output_path_xliffExtension_shouldNormalizeToXlf() {
    let result = FileManager::generate_output_path("app.xliff", "out", "pt-BR");

    assert_eq!(result, PathBuf::from("out/app.pt-BR.xlf"));
}

#[test]
fn test_is_xliff_file_shouldMatchKnownExtensions() {
    assert!(FileManager::is_xliff_file("a.xlf"));
    assert!(FileManager::is_xliff_file("a.XLIFF"));
    assert!(!FileManager::is_xliff_file("a.xml"));
    assert!(!FileManager::is_xliff_file("xlf"));
}

#[test]
fn test_is_translation_output_shouldMatchLanguageSuffix() {
    assert!(FileManager::is_translation_output("messages.de.xlf", "de"));
    assert!(!FileManager::is_translation_output("messages.de.xlf", "fr"));
    assert!(!FileManager::is_translation_output("messages.xlf", "de"));
    assert!(!FileManager::is_translation_output("messages.de.txt", "de"));
}

/// Test finding XLIFF files recursively
#[test]
fn test_find_xliff_files_shouldReturnSortedMatches() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::create_test_file(root, "b.xlf", common::HELLO_XLIFF)?;
    common::create_test_file(root, "a.xliff", common::HELLO_XLIFF)?;
    common::create_test_file(root, "notes.txt", "not xliff")?;
    common::create_test_file(root, "nested/c.xlf", common::HELLO_XLIFF)?;

    let files = FileManager::find_xliff_files(root)?;

    assert_eq!(files, vec![root.join("a.xliff"), root.join("b.xlf"), root.join("nested/c.xlf")]);
    Ok(())
}

#[test]
fn test_write_to_file_shouldCreateParentDirectories() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("deep/er/out.xlf");

    FileManager::write_to_file(&path, "content")?;

    assert!(FileManager::file_exists(&path));
    assert!(FileManager::dir_exists(temp_dir.path().join("deep/er")));
    assert_eq!(fs::read_to_string(&path)?, "content");
    Ok(())
}

#[test]
fn test_append_to_log_file_shouldAppendTimestampedLines() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("run.log");

    FileManager::append_to_log_file(&path, "first")?;
    FileManager::append_to_log_file(&path, "second")?;

    let content = fs::read_to_string(&path)?;
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with('[') && lines[0].ends_with("] first"));
    assert!(lines[1].ends_with("] second"));
    Ok(())
}
