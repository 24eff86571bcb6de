use std::fmt;

use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

use crate::episode_locator::EpisodeRef;
use crate::errors::{Failure, FetchError, Outcome};
use crate::fetcher::MarkupFetcher;

// @module: Transcript classification into typed script entries

// @const: Markup tag stripper
static TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

// Transcript bodies live inside the forum post's content element
static CONTENT_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse(".content").unwrap());

// Paragraph boundary within a transcript body
const PARAGRAPH_BREAK: &str = "<br>";

// Opening tag of the styled speaker form some transcripts use
const STRONG_OPEN: &str = "<strong class=\"text-strong\">";
const STRONG_CLOSE_COLON: &str = "</strong>:";

/// One typed entry of a transcript script
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptEntry {
    /// One speaker turn
    Dialogue {
        /// Speaker name, markup stripped
        character: String,
        /// Spoken line, markup stripped
        line: String,
    },

    /// A stage direction, scene marker, or bracketed annotation
    SceneCue {
        /// Cue text; bracket markers are kept verbatim
        text: String,
    },
}

impl fmt::Display for ScriptEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ScriptEntry::Dialogue { character, line } => write!(f, "{}: {}", character, line),
            ScriptEntry::SceneCue { text } => write!(f, "{}", text),
        }
    }
}

/// Ordered sequence of entries for one episode; may be empty
pub type Script = Vec<ScriptEntry>;

/// Remove all markup tags from a fragment
fn strip_tags(fragment: &str) -> String {
    TAG_REGEX.replace_all(fragment, "").to_string()
}

/// Strip one layer of leading `(` / trailing `)` around a cue
fn strip_outer_parens(text: &str) -> &str {
    let text = text.strip_prefix('(').unwrap_or(text);
    text.strip_suffix(')').unwrap_or(text)
}

/// Classify a single trimmed paragraph, first matching rule wins.
/// Paragraphs matching no rule produce no entry.
fn classify_paragraph(paragraph: &str) -> Option<ScriptEntry> {
    // Scene cues in emphasis tags or parentheses
    if paragraph.starts_with("<em") || paragraph.starts_with('(') {
        let stripped = strip_tags(paragraph);
        let text = strip_outer_parens(stripped.trim()).trim().to_string();
        return Some(ScriptEntry::SceneCue { text });
    }

    // Bracketed markers such as [END] are kept verbatim
    if paragraph.starts_with('[') && paragraph.ends_with(']') {
        return Some(ScriptEntry::SceneCue {
            text: paragraph.to_string(),
        });
    }

    // Character dialogue, split on the first colon
    if paragraph.contains(':') {
        let (character, line) = paragraph.split_once(':')?;
        let character = strip_tags(character).trim().to_string();
        let line = strip_tags(line).trim().to_string();
        if character.is_empty() || line.is_empty() {
            debug!("Dropping colon paragraph with empty side: {}", preview(paragraph));
            return None;
        }
        return Some(ScriptEntry::Dialogue { character, line });
    }

    // Styled speaker form: <strong class="text-strong">NAME</strong>: line
    if paragraph.starts_with(STRONG_OPEN) && paragraph.contains(STRONG_CLOSE_COLON) {
        let (character, line) = paragraph.split_once(STRONG_CLOSE_COLON)?;
        let character = strip_tags(character).trim().to_string();
        let line = strip_tags(line).trim().to_string();
        if character.is_empty() || line.is_empty() {
            debug!("Dropping styled paragraph with empty side: {}", preview(paragraph));
            return None;
        }
        return Some(ScriptEntry::Dialogue { character, line });
    }

    debug!("Dropping unclassified paragraph: {}", preview(paragraph));
    None
}

/// Shortened paragraph preview for drop traces
fn preview(paragraph: &str) -> String {
    const MAX: usize = 60;
    if paragraph.chars().count() <= MAX {
        paragraph.to_string()
    } else {
        let head: String = paragraph.chars().take(MAX).collect();
        format!("{}…", head)
    }
}

/// Classify a transcript body into an ordered script.
///
/// Paragraphs are split on the literal `<br>` marker and examined
/// independently; entries keep source paragraph order. The heuristic
/// itself never fails; unmatched paragraphs are dropped, by design.
pub fn classify(content_html: &str) -> Script {
    content_html
        .split(PARAGRAPH_BREAK)
        .map(str::trim)
        .filter(|paragraph| !paragraph.is_empty())
        .filter_map(classify_paragraph)
        .collect()
}

/// Isolate the transcript body from a full page document.
/// Returns the inner HTML of the content region.
pub fn isolate_content(page_body: &str, url: &str) -> Result<String, FetchError> {
    let document = Html::parse_document(page_body);
    document
        .select(&CONTENT_SELECTOR)
        .next()
        .map(|element| element.inner_html())
        .ok_or_else(|| FetchError::MissingContent {
            url: url.to_string(),
        })
}

/// Fetch one episode's transcript and classify it into a script.
/// Fetch and query failures propagate as per-episode outcomes; the
/// classification step itself cannot fail.
pub async fn fetch_script<F: MarkupFetcher>(
    fetcher: &F,
    episode: &EpisodeRef,
) -> Outcome<Script> {
    let context = || format!("classify script for \"{}\"", episode.title);

    let page_body = fetcher
        .fetch_markup(&episode.url)
        .await
        .map_err(|e| Failure::new(context(), e))?;

    let content = isolate_content(&page_body, &episode.url)
        .map_err(|e| Failure::new(context(), e))?;

    let script = classify(&content);
    info!("Script ready: {} ({} entries)", episode.title, script.len());
    Ok(script)
}
