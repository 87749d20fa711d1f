/*!
 * Substitution pass.
 *
 * Rebuilds the document with the target language section replaced by the
 * extracted entries, each carrying its translated text. Translations are
 * consumed strictly in order, one per entry whose extracted text was not
 * empty.
 */

use std::slice::Iter;

use log::{debug, error, info, warn};

use crate::app_config::{ColorCodeConfig, Config};
use crate::errors::XmlError;

use super::events::{category, error_trace, EventSink, XmlEvent};
use super::extractor::{ColorCodeRun, ExtractedEntry, Extraction};
use super::patterns;
use super::sanitizer::{LineSpan, SanitizedDocument};

/// An entry whose translation did not split into as many pieces as it had
/// color-code runs. The entry is still substituted on a best-effort basis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedTranslation {
    pub id: String,
    pub span: LineSpan,
}

impl FailedTranslation {
    pub fn describe(&self) -> String {
        format!("Line {}: {}", self.span, self.id)
    }
}

/// Output of the substitution pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewDocument {
    lines: Vec<String>,
    failed_translations: Vec<FailedTranslation>,
}

impl PreviewDocument {
    pub fn new(lines: Vec<String>, failed_translations: Vec<FailedTranslation>) -> Self {
        Self {
            lines,
            failed_translations,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn failed_translations(&self) -> &[FailedTranslation] {
        &self.failed_translations
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The preview as file content, every line newline-terminated
    pub fn to_xml_string(&self) -> String {
        let mut xml = String::with_capacity(self.lines.iter().map(|line| line.len() + 1).sum());
        for line in &self.lines {
            xml.push_str(line);
            xml.push('\n');
        }
        xml
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Outside the target section, or before it
    Copying,
    /// Inside the target section after the tracked entries were written
    Skipping,
    /// The target section has been replaced; everything else is copied
    Done,
}

/// Ordered supply of translated lines
struct Translations<'a> {
    lines: Iter<'a, String>,
    consumed: usize,
}

impl<'a> Translations<'a> {
    fn new(lines: &'a [String]) -> Self {
        Self {
            lines: lines.iter(),
            consumed: 0,
        }
    }

    fn next_for(&mut self, entry: &ExtractedEntry) -> Result<&'a str, XmlError> {
        match self.lines.next() {
            Some(line) => {
                self.consumed += 1;
                Ok(line.as_str())
            }
            None => Err(XmlError::TranslationsExhausted {
                entry_id: entry.id.clone(),
                consumed: self.consumed,
            }),
        }
    }

    fn remaining(&self) -> usize {
        self.lines.len()
    }
}

/// The substitution pass
pub struct Substituter {
    color_codes: ColorCodeConfig,
}

impl Substituter {
    pub fn new(config: &Config) -> Self {
        Self {
            color_codes: config.color_codes.clone(),
        }
    }

    /// Substitute `translations` into the first section tagged `target_tag`.
    ///
    /// `document` must be the document `extraction` was taken from. Returns
    /// `None` when the pass aborted; the cause has been logged and reported to
    /// `sink`. No partial preview is ever returned.
    pub fn substitute(
        &self,
        target_tag: &str,
        document: &SanitizedDocument,
        extraction: &Extraction,
        translations: &[String],
        sink: &mut dyn EventSink,
    ) -> Option<PreviewDocument> {
        match self.build_preview(target_tag, document, extraction, translations) {
            Ok(preview) => Some(preview),
            Err(e @ XmlError::TranslationsExhausted { .. }) => {
                let message = e.to_string();
                error!("Critical: {}", message);
                sink.emit(XmlEvent::ProcessException {
                    category: category::CRITICAL,
                    message,
                    trace: String::new(),
                });
                None
            }
            Err(e) => {
                let message = "An unexpected exception occurred while translating XML".to_string();
                let trace = error_trace(e);
                error!("{}\n{}", message, trace);
                sink.emit(XmlEvent::ProcessException {
                    category: category::PE_SUBSTITUTE,
                    message,
                    trace,
                });
                None
            }
        }
    }

    fn build_preview(
        &self,
        target_tag: &str,
        document: &SanitizedDocument,
        extraction: &Extraction,
        translations: &[String],
    ) -> Result<PreviewDocument, XmlError> {
        let mut supply = Translations::new(translations);
        let mut lines = Vec::with_capacity(document.len());
        let mut failed = Vec::new();
        let mut state = ScanState::Copying;

        for line in document.lines() {
            match state {
                ScanState::Copying if patterns::language_tag(&line.text) == Some(target_tag) => {
                    lines.push(line.text.clone());
                    for entry in extraction.entries() {
                        lines.push(self.render_entry(document, entry, &mut supply, &mut failed)?);
                    }
                    state = ScanState::Skipping;
                }
                ScanState::Skipping => {
                    if patterns::is_language_exit(&line.text) {
                        lines.push(line.text.clone());
                        state = ScanState::Done;
                    } else if patterns::is_language_start(&line.text) {
                        warn!(
                            "Line {}: section '{}' is not closed before the next section",
                            line.span, target_tag
                        );
                        lines.push(line.text.clone());
                        state = ScanState::Done;
                    }
                }
                ScanState::Copying | ScanState::Done => lines.push(line.text.clone()),
            }
        }

        match state {
            ScanState::Copying => {
                warn!("No <language id=\"{}\"> section to substitute into", target_tag);
            }
            ScanState::Skipping => {
                warn!("Section '{}' is not closed before the end of the document", target_tag);
            }
            ScanState::Done => {}
        }

        let leftover = supply.remaining();
        if leftover > 0 {
            warn!("{} translated lines were left unused", leftover);
        }

        info!(
            "Substituted {} entries into '{}' ({} translated lines used, {} failed)",
            extraction.len(),
            target_tag,
            supply.consumed,
            failed.len()
        );
        Ok(PreviewDocument::new(lines, failed))
    }

    fn render_entry(
        &self,
        document: &SanitizedDocument,
        entry: &ExtractedEntry,
        supply: &mut Translations<'_>,
        failed: &mut Vec<FailedTranslation>,
    ) -> Result<String, XmlError> {
        let line = document
            .get(entry.line_index)
            .filter(|line| line.text == entry.line)
            .ok_or_else(|| XmlError::MisalignedEntry {
                entry_id: entry.id.clone(),
                line_index: entry.line_index,
            })?;

        let translated = if entry.text.is_empty() {
            ""
        } else {
            supply.next_for(entry)?
        };

        let payload = patterns::cdata_payload(&line.text)
            .ok_or(XmlError::MissingPayload { span: line.span })?;
        let text = match &entry.color_codes {
            Some(run) => self.reattach_color_codes(entry, run, payload.as_str(), translated, failed),
            None => translated.to_string(),
        };

        Ok(format!(
            "{}{}{}",
            &line.text[..payload.start()],
            text,
            &line.text[payload.end()..]
        ))
    }

    /// Splices the translated pieces over the kept texts of `payload`.
    /// Color codes, text between runs and runs that were not extracted are
    /// left as they are.
    fn reattach_color_codes(
        &self,
        entry: &ExtractedEntry,
        run: &ColorCodeRun,
        payload: &str,
        translated: &str,
        failed: &mut Vec<FailedTranslation>,
    ) -> String {
        let delimiter = self.color_codes.padded_delimiter();
        let pieces: Vec<&str> = translated.split(delimiter.as_str()).collect();

        if pieces.len() != run.len() {
            debug!(
                "Line {}: entry '{}' has {} color-coded texts but the translation has {}",
                entry.span,
                entry.id,
                run.len(),
                pieces.len()
            );
            failed.push(FailedTranslation {
                id: entry.id.clone(),
                span: entry.span,
            });
        }

        let mut rebuilt = String::with_capacity(payload.len() + translated.len());
        let mut cursor = 0;
        for (index, range) in run.text_ranges().iter().enumerate() {
            rebuilt.push_str(&payload[cursor..range.start]);
            rebuilt.push_str(pieces.get(index).copied().unwrap_or_default());
            cursor = range.end;
        }
        rebuilt.push_str(&payload[cursor..]);

        // Surplus pieces have no color code to go into
        if pieces.len() > run.len() {
            for piece in &pieces[run.len()..] {
                rebuilt.push(' ');
                rebuilt.push_str(piece);
            }
        }
        rebuilt
    }
}
