/*!
 * Sanitization pass.
 *
 * Turns the physical lines of a localization file into logical lines: one
 * line per entry no matter how many physical lines it spanned, one line per
 * structural marker when several were crowded on one physical line. Broken
 * payload markers are repaired where possible. Every logical line remembers
 * the physical lines it came from so later diagnostics can point at them.
 */

use std::fmt;
use std::fs;
use std::path::Path;

use log::{debug, error, info, warn};

use crate::app_config::Config;
use crate::errors::XmlError;
use crate::file_utils::FileManager;

use super::events::{category, entry_noun, error_trace, format_list_for_display, EventSink, XmlEvent};
use super::patterns;

/// Name of the debug dump written next to the configured debug directory
pub const DEBUG_DUMP_FILE: &str = "SANIT.xml";

/// 1-based, inclusive range of physical lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineSpan {
    pub start: usize,
    pub end: usize,
}

impl LineSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn single(line: usize) -> Self {
        Self { start: line, end: line }
    }

    pub fn is_single(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for LineSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single() {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// One line of the sanitized document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalLine {
    pub text: String,
    pub span: LineSpan,
}

impl LogicalLine {
    pub fn new(text: impl Into<String>, span: LineSpan) -> Self {
        Self { text: text.into(), span }
    }
}

/// Output of the sanitize pass, shared read-only by extraction and substitution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SanitizedDocument {
    lines: Vec<LogicalLine>,
}

impl SanitizedDocument {
    pub fn from_lines(lines: Vec<LogicalLine>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[LogicalLine] {
        &self.lines
    }

    pub fn get(&self, index: usize) -> Option<&LogicalLine> {
        self.lines.get(index)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Line texts without their spans
    pub fn texts(&self) -> Vec<&str> {
        self.lines.iter().map(|line| line.text.as_str()).collect()
    }

    /// The document as text, one logical line per physical line
    pub fn to_xml_string(&self) -> String {
        self.texts().join("\n")
    }
}

/// An entry whose payload markup was broken
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedEntry {
    /// Entry id, empty when the open tag had none
    pub id: String,
    pub span: LineSpan,
    /// The logical line as it was before any repair
    pub line: String,
}

impl MalformedEntry {
    pub fn describe(&self) -> String {
        format!("Line {}: {}", self.span, self.id)
    }
}

/// Malformed entries found by the last sanitize pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MalformedEntryLog {
    /// Repaired heuristically
    pub fixed: Vec<MalformedEntry>,
    /// Left unchanged
    pub failed: Vec<MalformedEntry>,
}

impl MalformedEntryLog {
    pub fn is_empty(&self) -> bool {
        self.fixed.is_empty() && self.failed.is_empty()
    }
}

/// The sanitize pass
pub struct Sanitizer {
    config: Config,
    malformed: MalformedEntryLog,
}

impl Sanitizer {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            malformed: MalformedEntryLog::default(),
        }
    }

    /// Malformed entries recorded by the last pass
    pub fn malformed_entries(&self) -> &MalformedEntryLog {
        &self.malformed
    }

    /// Sanitize the file at `path`.
    ///
    /// Returns `None` when the file cannot be read; the failure is logged and
    /// reported to `sink` as a process exception.
    pub fn sanitize_file<P: AsRef<Path>>(&mut self, path: P, sink: &mut dyn EventSink) -> Option<SanitizedDocument> {
        let path = path.as_ref();
        self.malformed = MalformedEntryLog::default();

        match read_source(path) {
            Ok(content) => {
                let source_name = path
                    .file_name()
                    .map(|name| name.to_string_lossy().to_string())
                    .unwrap_or_else(|| path.display().to_string());
                Some(self.sanitize_str(&content, &source_name, sink))
            }
            Err(e) => {
                let message = "An unexpected exception occurred while sanitizing XML".to_string();
                let trace = error_trace(e);
                error!("{}\n{}", message, trace);
                sink.emit(XmlEvent::ProcessException {
                    category: category::PE_SANITIZE,
                    message,
                    trace,
                });
                None
            }
        }
    }

    /// Sanitize in-memory content. `source_name` only appears in diagnostics.
    pub fn sanitize_str(&mut self, content: &str, source_name: &str, sink: &mut dyn EventSink) -> SanitizedDocument {
        self.malformed = MalformedEntryLog::default();

        let document = SanitizedDocument::from_lines(self.collapse(content));
        debug!(
            "Sanitized '{}': {} logical lines",
            source_name,
            document.len()
        );

        if self.config.debug.dump_sanitized {
            let dump_path = self.config.debug.directory.join(DEBUG_DUMP_FILE);
            if let Err(e) = FileManager::write_to_file(&dump_path, &document.to_xml_string()) {
                warn!("Failed to write sanitized debug dump: {:#}", e);
            }
        }

        self.report_malformed(source_name, sink);
        document
    }

    fn collapse(&mut self, content: &str) -> Vec<LogicalLine> {
        let mut sanitized = Vec::new();
        let mut pending: Vec<&str> = Vec::new();
        let mut pending_start = 0;

        for (index, raw_line) in content.lines().enumerate() {
            let line_number = index + 1;
            if raw_line.trim().is_empty() {
                continue;
            }

            for segment in patterns::split_structural(raw_line) {
                let opens = patterns::has_entry_start(segment);
                let closes = patterns::has_entry_exit(segment);

                if pending.is_empty() && !opens {
                    if closes {
                        warn!("Line {}: closing entry tag without an open entry", line_number);
                    }
                    sanitized.push(LogicalLine::new(segment, LineSpan::single(line_number)));
                    continue;
                }

                if pending.is_empty() {
                    pending_start = line_number;
                }
                pending.push(segment);

                if closes {
                    let span = LineSpan::new(pending_start, line_number);
                    let completed = join_fragments(&pending);
                    pending.clear();
                    let line = self.ensure_wellformed(completed, span);
                    sanitized.push(LogicalLine::new(line, span));
                }
            }
        }

        if !pending.is_empty() {
            let span = LineSpan::new(pending_start, content.lines().count());
            let line = join_fragments(&pending);
            warn!("Line {}: entry is never closed", span);
            self.malformed.failed.push(MalformedEntry {
                id: patterns::entry_id(&line).unwrap_or_default().to_string(),
                span,
                line: line.clone(),
            });
            sanitized.push(LogicalLine::new(line, span));
        }

        sanitized
    }

    fn ensure_wellformed(&mut self, line: String, span: LineSpan) -> String {
        if patterns::cdata_payload(&line).is_some() {
            return line;
        }

        let id = patterns::entry_id(&line).unwrap_or_default().to_string();
        match patterns::repair_payload(&line) {
            Some(repaired) => {
                debug!("Line {}: repaired payload of entry '{}'", span, id);
                self.malformed.fixed.push(MalformedEntry { id, span, line });
                repaired
            }
            None => {
                debug!("Line {}: could not repair payload of entry '{}'", span, id);
                self.malformed.failed.push(MalformedEntry { id, span, line: line.clone() });
                line
            }
        }
    }

    fn report_malformed(&self, source_name: &str, sink: &mut dyn EventSink) {
        let message_size = self.config.message_size;

        if !self.malformed.fixed.is_empty() {
            let count = self.malformed.fixed.len();
            let message = format!("Fixed {} malformed {} in '{}'", count, entry_noun(count), source_name);
            let content: Vec<String> = self.malformed.fixed.iter().map(MalformedEntry::describe).collect();
            info!("{}:\n  {}", message, format_list_for_display(&content, message_size, "\n  "));
            sink.emit(XmlEvent::ValidationError {
                category: category::MALFORMED_FIXED,
                message,
                details: format_list_for_display(&content, message_size, ", "),
            });
        }

        if !self.malformed.failed.is_empty() {
            let count = self.malformed.failed.len();
            let message = format!("Failed to fix {} malformed {} in '{}'", count, entry_noun(count), source_name);
            let content: Vec<String> = self.malformed.failed.iter().map(MalformedEntry::describe).collect();
            warn!("{}:\n  {}", message, format_list_for_display(&content, message_size, "\n  "));
            sink.emit(XmlEvent::ValidationError {
                category: category::MALFORMED_FAILED,
                message,
                details: format_list_for_display(&content, message_size, ", "),
            });
        }
    }
}

/// First fragment verbatim, continuation fragments trimmed
fn join_fragments(fragments: &[&str]) -> String {
    fragments
        .iter()
        .enumerate()
        .map(|(i, fragment)| if i == 0 { *fragment } else { fragment.trim() })
        .collect()
}

fn read_source(path: &Path) -> Result<String, XmlError> {
    let bytes = fs::read(path).map_err(|source| XmlError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let content = String::from_utf8(bytes).map_err(|source| XmlError::Encoding {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(match content.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => content,
    })
}
