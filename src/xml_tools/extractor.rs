/*!
 * Extraction pass.
 *
 * Pulls the payload text of every entry in one language section out of a
 * sanitized document. With color-code separation enabled, payloads wrapped in
 * `{start}text{end}` codes are reduced to their inner texts joined by a padded
 * delimiter. The position of every kept text is recorded so the substitution
 * pass can splice the translated pieces back into the untouched payload.
 */

use std::ops::Range;

use log::{debug, info, warn};

use crate::app_config::{ColorCodeConfig, Config};

use super::patterns;
use super::sanitizer::{LineSpan, LogicalLine, SanitizedDocument};

/// Color codes stripped from one payload. The lists always have the same
/// length; text ranges are ascending byte ranges into the payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorCodeRun {
    start_colors: Vec<String>,
    texts: Vec<String>,
    end_colors: Vec<String>,
    text_ranges: Vec<Range<usize>>,
}

impl ColorCodeRun {
    pub fn push(&mut self, found: &patterns::ColorCodeMatch<'_>) {
        self.start_colors.push(found.start_color.to_string());
        self.texts.push(found.text.to_string());
        self.end_colors.push(found.end_color.to_string());
        self.text_ranges.push(found.text_range.clone());
    }

    pub fn start_colors(&self) -> &[String] {
        &self.start_colors
    }

    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    pub fn end_colors(&self) -> &[String] {
        &self.end_colors
    }

    /// Where each kept text sits in the payload it was taken from
    pub fn text_ranges(&self) -> &[Range<usize>] {
        &self.text_ranges
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}

/// One entry found inside the extracted language section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedEntry {
    /// Entry id; empty when the open tag had no parsable id
    pub id: String,
    /// Translator-facing text
    pub text: String,
    /// The sanitized logical line holding the entry
    pub line: String,
    /// Index of `line` in the sanitized document
    pub line_index: usize,
    /// Physical lines of the entry in the original file
    pub span: LineSpan,
    /// Color codes stripped from the payload, if any were kept
    pub color_codes: Option<ColorCodeRun>,
}

/// Result of one extraction pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    language_tag: String,
    entries: Vec<ExtractedEntry>,
}

impl Extraction {
    pub fn language_tag(&self) -> &str {
        &self.language_tag
    }

    pub fn entries(&self) -> &[ExtractedEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Extracted texts in document order, empty payloads included
    pub fn texts(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.text.as_str()).collect()
    }

    /// Matched logical lines in document order
    pub fn lines(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.line.as_str()).collect()
    }

    /// Number of entries that consume a translated line
    pub fn translatable_count(&self) -> usize {
        self.entries.iter().filter(|entry| !entry.text.is_empty()).count()
    }

    /// The text handed to a translator: one line per non-empty entry
    pub fn translation_source(&self) -> String {
        self.entries
            .iter()
            .filter(|entry| !entry.text.is_empty())
            .map(|entry| entry.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Splits a translator's answer into lines, dropping empty ones
pub fn split_translation_text(translation: &str) -> Vec<String> {
    translation
        .lines()
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// The extraction pass
pub struct Extractor {
    color_codes: ColorCodeConfig,
}

impl Extractor {
    pub fn new(config: &Config) -> Self {
        Self {
            color_codes: config.color_codes.clone(),
        }
    }

    /// Extract every entry of the first section tagged `language_tag`.
    ///
    /// Scanning stops at the first `</language>` after the section opens.
    /// Lines without a well-formed payload are skipped.
    pub fn extract(&self, document: &SanitizedDocument, language_tag: &str) -> Extraction {
        let mut extraction = Extraction {
            language_tag: language_tag.to_string(),
            entries: Vec::new(),
        };

        let Some(section) = patterns::find_section(&document.texts(), language_tag) else {
            warn!("No <language id=\"{}\"> section found", language_tag);
            return extraction;
        };

        for line_index in section {
            if let Some(line) = document.get(line_index) {
                if let Some(entry) = self.extract_entry(line, line_index) {
                    extraction.entries.push(entry);
                }
            }
        }

        if extraction.is_empty() {
            warn!("Section '{}' holds no entries", language_tag);
        } else {
            info!(
                "Extracted {} entries from '{}' ({} to translate)",
                extraction.len(),
                language_tag,
                extraction.translatable_count()
            );
        }
        extraction
    }

    fn extract_entry(&self, line: &LogicalLine, line_index: usize) -> Option<ExtractedEntry> {
        let payload = patterns::cdata_payload(&line.text)?.as_str();

        let id = patterns::entry_id(&line.text).unwrap_or_default();
        if id.is_empty() {
            debug!("Line {}: entry without a parsable id", line.span);
        }

        let mut text = payload.to_string();
        let mut color_codes = None;
        if self.color_codes.enabled {
            if let Some(run) = self.separate_color_codes(payload) {
                text = run.texts().join(&self.color_codes.padded_delimiter());
                color_codes = Some(run);
            }
        }

        Some(ExtractedEntry {
            id: id.to_string(),
            text,
            line: line.text.clone(),
            line_index,
            span: line.span,
            color_codes,
        })
    }

    /// A single run is always kept. With several runs, short texts stay
    /// behind untranslated; they are left in place in the payload.
    fn separate_color_codes(&self, payload: &str) -> Option<ColorCodeRun> {
        let matches = patterns::color_code_runs(payload);
        let single = matches.len() == 1;

        let mut run = ColorCodeRun::default();
        for found in &matches {
            if single || found.text.chars().count() >= self.color_codes.min_length {
                run.push(found);
            }
        }

        (!run.is_empty()).then_some(run)
    }
}
