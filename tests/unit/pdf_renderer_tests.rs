/*!
 * Tests for document rendering and episode identity parsing
 */

use std::fs;

use episcribe::errors::{AppError, RenderError};
use episcribe::pdf_renderer::{EpisodeIdentity, PdfRenderer};
use episcribe::script_processor::ScriptEntry;

use crate::common;

fn sample_script() -> Vec<ScriptEntry> {
    vec![
        ScriptEntry::SceneCue {
            text: "Night. A diner.".to_string(),
        },
        ScriptEntry::Dialogue {
            character: "JOHN".to_string(),
            line: "Hello there".to_string(),
        },
        ScriptEntry::SceneCue {
            text: "[END]".to_string(),
        },
    ]
}

/// Test identity parsing from a well-formed raw title
#[test]
fn test_identity_parse_withValidTitle_shouldDeriveAllComponents() {
    let identity = EpisodeIdentity::parse("1x05 - The Pilot Episode").unwrap();
    assert_eq!(identity.season, "1");
    assert_eq!(identity.episode_number, "05");
    assert_eq!(identity.normalized_name, "The_Pilot_Episode");
}

/// Test that titles without the separator are rejected
#[test]
fn test_identity_parse_withoutSeparator_shouldRejectAsNonEpisode() {
    let result = EpisodeIdentity::parse("Season 1 Specials");
    assert!(matches!(result, Err(RenderError::NotAnEpisode(title)) if title == "Season 1 Specials"));
}

/// Test that titles missing the name delimiter are rejected
#[test]
fn test_identity_parse_withoutNameDelimiter_shouldRejectAsMalformed() {
    let result = EpisodeIdentity::parse("1x05 The Pilot Episode");
    assert!(matches!(result, Err(RenderError::MalformedTitle(_))));
}

/// Test that rendering a non-episode title fails without touching storage
#[test]
fn test_render_withNonEpisodeTitle_shouldFailWithoutWrites() {
    let temp_dir = common::create_temp_dir().unwrap();
    let renderer = PdfRenderer::new(temp_dir.path(), "pdf");

    let failure = renderer
        .render("Season 1 Specials", &sample_script())
        .unwrap_err();

    assert!(failure.context.contains("Season 1 Specials"));
    assert!(matches!(
        failure.cause,
        AppError::Render(RenderError::NotAnEpisode(_))
    ));

    // No directory or file may be provisioned for a rejected title
    let leftovers: Vec<_> = fs::read_dir(temp_dir.path()).unwrap().collect();
    assert!(leftovers.is_empty());
}

/// Test rendering a valid episode end to end
#[test]
fn test_render_withValidEpisode_shouldPersistPdfUnderSeasonDir() {
    let temp_dir = common::create_temp_dir().unwrap();
    let renderer = PdfRenderer::new(temp_dir.path(), "pdf");

    let path = renderer
        .render("1x05 - The Pilot Episode", &sample_script())
        .unwrap();

    assert_eq!(
        path,
        temp_dir
            .path()
            .join("season1")
            .join("05.The_Pilot_Episode.pdf")
    );
    let bytes = fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
    assert!(bytes.len() > "Empty PDF".len());
}

/// Test that rendering with an empty script still produces a document
#[test]
fn test_render_withEmptyScript_shouldStillProduceDocument() {
    let temp_dir = common::create_temp_dir().unwrap();
    let renderer = PdfRenderer::new(temp_dir.path(), "pdf");

    let path = renderer.render("2x01 - Quiet Episode", &[]).unwrap();
    let bytes = fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

/// Test that provisioning is idempotent over existing directories and files
#[test]
fn test_render_twice_shouldReuseSeasonDirAndOverwriteFile() {
    let temp_dir = common::create_temp_dir().unwrap();
    let renderer = PdfRenderer::new(temp_dir.path(), "pdf");

    let first = renderer
        .render("1x05 - The Pilot Episode", &sample_script())
        .unwrap();
    let second = renderer
        .render("1x05 - The Pilot Episode", &sample_script())
        .unwrap();

    assert_eq!(first, second);
    let bytes = fs::read(&second).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

/// Test a long dialogue line survives wrapping and pagination
#[test]
fn test_render_withLongScript_shouldPaginateWithoutError() {
    let temp_dir = common::create_temp_dir().unwrap();
    let renderer = PdfRenderer::new(temp_dir.path(), "pdf");

    let long_line = "and another thing ".repeat(40);
    let script: Vec<ScriptEntry> = (0..120)
        .map(|i| ScriptEntry::Dialogue {
            character: format!("SPEAKER{}", i),
            line: long_line.trim().to_string(),
        })
        .collect();

    let path = renderer.render("3x07 - The Long One", &script).unwrap();
    let bytes = fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}
