use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use log::{debug, info};
use printpdf::{
    BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
};

use crate::errors::{Failure, Outcome, RenderError};
use crate::file_utils::FileManager;
use crate::script_processor::ScriptEntry;

// @module: Paginated document rendering and storage provisioning

// A4 geometry; margins given in points
const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const PT_TO_MM: f32 = 0.352_778;
const MARGIN_TOP_MM: f32 = 50.0 * PT_TO_MM;
const MARGIN_BOTTOM_MM: f32 = 50.0 * PT_TO_MM;
const MARGIN_LEFT_MM: f32 = 60.0 * PT_TO_MM;
const MARGIN_RIGHT_MM: f32 = 60.0 * PT_TO_MM;

// Type sizes in points
const BODY_SIZE_PT: f32 = 10.0;
const TITLE_SIZE_PT: f32 = 14.0;
const LINE_GAP_PT: f32 = 6.0;

// Average glyph advance of the built-in Helvetica faces, as a fraction
// of the type size. The built-in fonts carry no metrics, so line
// wrapping and centering work from this estimate.
const AVG_GLYPH_WIDTH_EM: f32 = 0.5;

// Non-empty placeholder written before streaming begins
const PLACEHOLDER_CONTENT: &str = "Empty PDF";

/// Identity of one episode, derived from a raw listing title of the
/// form `"<season>x<episode> - <name>"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeIdentity {
    /// Season component, left of the `x` separator
    pub season: String,

    /// Episode number, between the separator and the name delimiter
    pub episode_number: String,

    /// Episode name with spaces replaced by underscores
    pub normalized_name: String,
}

impl EpisodeIdentity {
    /// Parse a raw title into an episode identity.
    ///
    /// Titles without the literal `x` separator are not episodes
    /// (season headings, specials) and are rejected before any
    /// rendering side effect.
    pub fn parse(raw_title: &str) -> Result<Self, RenderError> {
        let Some((season, rest)) = raw_title.split_once('x') else {
            return Err(RenderError::NotAnEpisode(raw_title.to_string()));
        };
        let Some((episode_number, name)) = rest.split_once(" - ") else {
            return Err(RenderError::MalformedTitle(raw_title.to_string()));
        };
        Ok(EpisodeIdentity {
            season: season.to_string(),
            episode_number: episode_number.to_string(),
            normalized_name: name.replace(' ', "_"),
        })
    }
}

/// Two-event completion barrier.
///
/// A render is complete only when the document has been finalized AND
/// the write stream has flushed to storage; either signal alone is
/// insufficient to report success.
#[derive(Debug)]
pub struct CompletionJoin {
    pending: usize,
}

impl CompletionJoin {
    /// Create a barrier over the given number of completion events
    pub fn new(steps: usize) -> Self {
        CompletionJoin { pending: steps }
    }

    /// Record one completed event; returns true once all events arrived
    pub fn complete_step(&mut self) -> bool {
        self.pending = self.pending.saturating_sub(1);
        self.pending == 0
    }

    /// Whether every event has arrived
    pub fn is_complete(&self) -> bool {
        self.pending == 0
    }
}

/// Renders classified scripts into paginated PDF documents under a
/// season-scoped directory layout.
pub struct PdfRenderer {
    // @field: Root directory for generated documents
    base_dir: PathBuf,

    // @field: Output file extension
    extension: String,
}

impl PdfRenderer {
    /// Create a renderer writing below the given base directory
    pub fn new<P: Into<PathBuf>>(base_dir: P, extension: &str) -> Self {
        PdfRenderer {
            base_dir: base_dir.into(),
            extension: extension.to_string(),
        }
    }

    /// Render one episode into a persisted paginated document.
    ///
    /// Returns the persisted path on success; every failure carries the
    /// episode title as context so the batch summary can report it.
    pub fn render(&self, raw_title: &str, script: &[ScriptEntry]) -> Outcome<PathBuf> {
        self.render_inner(raw_title, script)
            .map_err(|e| Failure::new(format!("render episode \"{}\"", raw_title), e))
    }

    fn render_inner(
        &self,
        raw_title: &str,
        script: &[ScriptEntry],
    ) -> Result<PathBuf, RenderError> {
        // Title validation precedes every filesystem side effect
        let identity = EpisodeIdentity::parse(raw_title)?;

        // Storage provisioning, idempotent under concurrent renders
        let season_dir = FileManager::season_dir(&self.base_dir, &identity.season);
        if !FileManager::dir_exists(&season_dir) {
            FileManager::ensure_dir(&season_dir)?;
            info!("Created directory: {}", season_dir.display());
        }
        let target = FileManager::episode_output_path(
            &self.base_dir,
            &identity.season,
            &identity.episode_number,
            &identity.normalized_name,
            &self.extension,
        );
        if FileManager::ensure_placeholder(&target, PLACEHOLDER_CONTENT)? {
            info!("Created file: {}", target.display());
        }

        // Stream the document; success requires both completion events
        let mut join = CompletionJoin::new(2);
        let file = File::create(&target)?;
        let mut stream = BufWriter::new(file);

        let mut writer = DocumentWriter::new(raw_title)?;
        writer.write_title(raw_title);
        for entry in script {
            match entry {
                ScriptEntry::Dialogue { character, line } => {
                    writer.write_dialogue(character, line);
                }
                ScriptEntry::SceneCue { text } => {
                    writer.write_scene_cue(text);
                }
            }
        }

        writer.finish(&mut stream)?;
        join.complete_step();

        stream.flush()?;
        stream.get_ref().sync_all()?;
        join.complete_step();

        if !join.is_complete() {
            return Err(RenderError::Document(
                "completion barrier not satisfied".to_string(),
            ));
        }

        info!(
            "Render done: season{}/{}.{}.{}",
            identity.season, identity.episode_number, identity.normalized_name, self.extension
        );
        Ok(target)
    }
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    oblique: IndirectFontRef,
}

/// Streaming layout engine over the document collaborator.
///
/// Tracks a baseline cursor down the page and inserts page breaks when
/// a line would cross the bottom margin; byte-level encoding is the
/// collaborator's concern.
struct DocumentWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    fonts: Fonts,
    // Distance from the page bottom to the current baseline
    cursor_mm: f32,
}

impl DocumentWriter {
    fn new(document_title: &str) -> Result<Self, RenderError> {
        let (doc, page, layer) = PdfDocument::new(
            document_title,
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            "Layer 1",
        );
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(document_error)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(document_error)?;
        let oblique = doc
            .add_builtin_font(BuiltinFont::HelveticaOblique)
            .map_err(document_error)?;
        let layer = doc.get_page(page).get_layer(layer);

        Ok(DocumentWriter {
            doc,
            layer,
            fonts: Fonts {
                regular,
                bold,
                oblique,
            },
            cursor_mm: PAGE_HEIGHT_MM - MARGIN_TOP_MM,
        })
    }

    fn line_height_mm() -> f32 {
        (BODY_SIZE_PT + LINE_GAP_PT) * PT_TO_MM
    }

    fn usable_width_mm() -> f32 {
        PAGE_WIDTH_MM - MARGIN_LEFT_MM - MARGIN_RIGHT_MM
    }

    fn glyph_width_mm(size_pt: f32) -> f32 {
        size_pt * AVG_GLYPH_WIDTH_EM * PT_TO_MM
    }

    fn max_chars(width_mm: f32, size_pt: f32) -> usize {
        (width_mm / Self::glyph_width_mm(size_pt)).floor() as usize
    }

    fn break_page(&mut self) {
        let (page, layer) = self
            .doc
            .add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.cursor_mm = PAGE_HEIGHT_MM - MARGIN_TOP_MM;
        debug!("Page break inserted");
    }

    fn ensure_room(&mut self) {
        if self.cursor_mm < MARGIN_BOTTOM_MM {
            self.break_page();
        }
    }

    fn advance_line(&mut self) {
        self.cursor_mm -= Self::line_height_mm();
    }

    /// Centered bold title line at the larger type size
    fn write_title(&mut self, title: &str) {
        let width_mm = title.chars().count() as f32 * Self::glyph_width_mm(TITLE_SIZE_PT);
        let x_mm = ((PAGE_WIDTH_MM - width_mm) / 2.0).max(MARGIN_LEFT_MM);
        self.layer
            .use_text(title, TITLE_SIZE_PT, Mm(x_mm), Mm(self.cursor_mm), &self.fonts.bold);
        self.cursor_mm -= (TITLE_SIZE_PT + LINE_GAP_PT) * PT_TO_MM;
        // Blank body line between the title and the first block
        self.advance_line();
    }

    /// One speaker turn: bold name continued by the regular-weight line,
    /// preceded by a blank line
    fn write_dialogue(&mut self, character: &str, line: &str) {
        self.advance_line();

        let label = format!("{}: ", character);
        let label_width_mm = label.chars().count() as f32 * Self::glyph_width_mm(BODY_SIZE_PT);
        let first_budget = Self::max_chars(Self::usable_width_mm() - label_width_mm, BODY_SIZE_PT);
        let rest_budget = Self::max_chars(Self::usable_width_mm(), BODY_SIZE_PT);
        let chunks = wrap_with_first_budget(line, first_budget, rest_budget);

        self.ensure_room();
        self.layer.use_text(
            label.as_str(),
            BODY_SIZE_PT,
            Mm(MARGIN_LEFT_MM),
            Mm(self.cursor_mm),
            &self.fonts.bold,
        );
        if let Some(first) = chunks.first() {
            self.layer.use_text(
                first.as_str(),
                BODY_SIZE_PT,
                Mm(MARGIN_LEFT_MM + label_width_mm),
                Mm(self.cursor_mm),
                &self.fonts.regular,
            );
        }
        self.advance_line();

        for chunk in chunks.iter().skip(1) {
            self.ensure_room();
            self.layer.use_text(
                chunk.as_str(),
                BODY_SIZE_PT,
                Mm(MARGIN_LEFT_MM),
                Mm(self.cursor_mm),
                &self.fonts.regular,
            );
            self.advance_line();
        }
    }

    /// Oblique scene cue, parenthesized for display unless already a
    /// bracket marker, followed by a half-line gap
    fn write_scene_cue(&mut self, text: &str) {
        let display = if text.starts_with('[') && text.ends_with(']') {
            text.to_string()
        } else {
            format!("({})", text)
        };

        let budget = Self::max_chars(Self::usable_width_mm(), BODY_SIZE_PT);
        for chunk in wrap_text(&display, budget) {
            self.ensure_room();
            self.layer.use_text(
                chunk.as_str(),
                BODY_SIZE_PT,
                Mm(MARGIN_LEFT_MM),
                Mm(self.cursor_mm),
                &self.fonts.oblique,
            );
            self.advance_line();
        }
        self.cursor_mm -= Self::line_height_mm() * 0.5;
    }

    /// Finalize the document into the write stream
    fn finish<W: Write>(self, stream: &mut BufWriter<W>) -> Result<(), RenderError> {
        self.doc.save(stream).map_err(document_error)
    }
}

fn document_error(err: impl std::fmt::Display) -> RenderError {
    RenderError::Document(err.to_string())
}

/// Greedy word wrap; a word longer than the budget gets its own
/// overlong line rather than being split mid-word
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    wrap_with_first_budget(text, max_chars, max_chars)
}

/// Word wrap where the first line has its own budget (the remainder of
/// the visual line after a dialogue label)
fn wrap_with_first_budget(text: &str, first_max: usize, rest_max: usize) -> Vec<String> {
    let first_max = first_max.max(1);
    let rest_max = rest_max.max(1);

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut budget = first_max;

    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if !current.is_empty() && needed > budget {
            lines.push(std::mem::take(&mut current));
            budget = rest_max;
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
