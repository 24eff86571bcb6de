/*!
 * Tests for file and directory utilities
 */

use std::fs;
use std::path::PathBuf;

use episcribe::file_utils::FileManager;

use crate::common;

/// Test directory creation is idempotent
#[test]
fn test_ensure_dir_calledTwice_shouldSucceed() {
    let temp_dir = common::create_temp_dir().unwrap();
    let nested = temp_dir.path().join("season1").join("extra");

    FileManager::ensure_dir(&nested).unwrap();
    FileManager::ensure_dir(&nested).unwrap();

    assert!(FileManager::dir_exists(&nested));
}

/// Test placeholder creation happens once and keeps existing content
#[test]
fn test_ensure_placeholder_shouldCreateOnlyWhenAbsent() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = temp_dir.path().join("05.The_Pilot_Episode.pdf");

    let created = FileManager::ensure_placeholder(&path, "Empty PDF").unwrap();
    assert!(created);
    assert_eq!(fs::read_to_string(&path).unwrap(), "Empty PDF");

    let created_again = FileManager::ensure_placeholder(&path, "other content").unwrap();
    assert!(!created_again);
    assert_eq!(fs::read_to_string(&path).unwrap(), "Empty PDF");
}

/// Test the season-scoped output path layout
#[test]
fn test_episode_output_path_shouldFollowSeasonLayout() {
    let path = FileManager::episode_output_path(
        "/data/scripts",
        "2",
        "11",
        "The_Middle_One",
        "pdf",
    );
    assert_eq!(
        path,
        PathBuf::from("/data/scripts/season2/11.The_Middle_One.pdf")
    );
}

/// Test existence checks distinguish files from directories
#[test]
fn test_existence_checks_shouldDistinguishFilesAndDirs() {
    let temp_dir = common::create_temp_dir().unwrap();
    let file_path = temp_dir.path().join("a.txt");
    fs::write(&file_path, "x").unwrap();

    assert!(FileManager::file_exists(&file_path));
    assert!(!FileManager::dir_exists(&file_path));
    assert!(FileManager::dir_exists(temp_dir.path()));
    assert!(!FileManager::file_exists(temp_dir.path()));
}
