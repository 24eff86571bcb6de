/*!
 * Tests for app configuration functionality
 */

use episcribe::app_config::{Config, LogLevel};

use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_shouldCarryListingAndOutputDefaults() {
    let config = Config::default();

    assert_eq!(config.listing.forum_id, 177);
    assert_eq!(config.listing.page_count, 1);
    assert_eq!(config.listing.topics_per_page, 25);
    assert_eq!(config.output.base_dir, "pdf");
    assert_eq!(config.output.extension, "pdf");
    assert_eq!(config.max_in_flight, None);
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

/// Test that an empty JSON object deserializes to the defaults
#[test]
fn test_config_fromEmptyJson_shouldUseDefaults() {
    let config: Config = serde_json::from_str("{}").unwrap();
    assert_eq!(config.listing.topics_per_page, 25);
    assert_eq!(config.fetch.timeout_secs, 30);
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test JSON round trip through a file
#[test]
fn test_config_roundTripThroughFile_shouldPreserveValues() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = temp_dir.path().join("episcribe.json");

    let mut config = Config::default();
    config.listing.page_count = 4;
    config.output.base_dir = "out/scripts".to_string();
    config.max_in_flight = Some(8);
    config.write_to_file(&path).unwrap();

    let loaded = Config::from_file(&path).unwrap();
    assert_eq!(loaded.listing.page_count, 4);
    assert_eq!(loaded.output.base_dir, "out/scripts");
    assert_eq!(loaded.max_in_flight, Some(8));
}

/// Test validation failures for inconsistent values
#[test]
fn test_validate_withInvalidValues_shouldFail() {
    let mut config = Config::default();
    config.listing.page_count = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.output.base_dir = "  ".to_string();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.max_in_flight = Some(0);
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.listing.base_url = String::new();
    assert!(config.validate().is_err());
}

/// Test log level serde spelling
#[test]
fn test_log_level_shouldSerializeLowercase() {
    let json = serde_json::to_string(&LogLevel::Debug).unwrap();
    assert_eq!(json, "\"debug\"");

    let parsed: LogLevel = serde_json::from_str("\"trace\"").unwrap();
    assert_eq!(parsed, LogLevel::Trace);
}
