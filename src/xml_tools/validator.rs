/*!
 * Validation pass.
 *
 * Compares the entry ids of the source and target sections of a preview and
 * reports entries the target lost, together with the translations the
 * substitution pass could only apply on a best-effort basis.
 */

use log::{info, warn};

use crate::app_config::Config;

use super::events::{category, entry_noun, format_list_for_display, EventSink, XmlEvent};
use super::patterns;
use super::substituter::{FailedTranslation, PreviewDocument};

/// Outcome of validating one preview
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub is_valid: bool,
    /// Whether the problems found warrant showing detailed errors
    pub show_errors: bool,
    /// Source ids absent from the target section, in source order
    pub missing_ids: Vec<String>,
    pub failed_translations: Vec<FailedTranslation>,
}

/// Entry ids of the first section tagged `language_tag`, in document order.
/// Lines without a parsable id are skipped.
pub fn entry_ids<S: AsRef<str>>(lines: &[S], language_tag: &str) -> Vec<String> {
    let Some(section) = patterns::find_section(lines, language_tag) else {
        return Vec::new();
    };

    lines[section]
        .iter()
        .filter_map(|line| patterns::entry_id(line.as_ref()))
        .map(str::to_string)
        .collect()
}

/// Items of `source` that are not in `target`, keeping source order
pub fn difference(source: &[String], target: &[String]) -> Vec<String> {
    source
        .iter()
        .filter(|id| !target.contains(id))
        .cloned()
        .collect()
}

/// Headline of a broken-translation report. Marks the count as source
/// entries when both tags name the same section.
fn missing_entries_message(count: usize, source_tag: &str, target_tag: &str) -> String {
    let source_marker = if source_tag == target_tag { "(source) " } else { "" };
    format!("Missing {} {} {}{}", count, target_tag, source_marker, entry_noun(count))
}

/// The validation pass
pub struct Validator {
    message_size: usize,
}

impl Validator {
    pub fn new(config: &Config) -> Self {
        Self {
            message_size: config.message_size,
        }
    }

    /// Validate a preview produced by the substitution pass
    pub fn validate_preview(
        &self,
        preview: &PreviewDocument,
        source_tag: &str,
        target_tag: &str,
        sink: &mut dyn EventSink,
    ) -> ValidationReport {
        self.validate_lines(preview.lines(), preview.failed_translations(), source_tag, target_tag, sink)
    }

    /// Validate arbitrary document lines, e.g. a file that was saved earlier
    pub fn validate_lines<S: AsRef<str>>(
        &self,
        lines: &[S],
        failed_translations: &[FailedTranslation],
        source_tag: &str,
        target_tag: &str,
        sink: &mut dyn EventSink,
    ) -> ValidationReport {
        let mut report = ValidationReport {
            is_valid: true,
            ..Default::default()
        };

        let source_ids = entry_ids(lines, source_tag);
        let target_ids = entry_ids(lines, target_tag);

        if source_ids.is_empty() || target_ids.is_empty() {
            warn!(
                "Nothing to compare: '{}' has {} entries, '{}' has {}",
                source_tag,
                source_ids.len(),
                target_tag,
                target_ids.len()
            );
            report.is_valid = false;
        }

        report.missing_ids = difference(&source_ids, &target_ids);
        if !report.missing_ids.is_empty() {
            report.is_valid = false;
            report.show_errors = true;

            let message = missing_entries_message(report.missing_ids.len(), source_tag, target_tag);
            warn!(
                "{}:\n  {}",
                message,
                format_list_for_display(&report.missing_ids, self.message_size, "\n  ")
            );
            sink.emit(XmlEvent::ValidationError {
                category: category::BROKEN_TRANSLATION,
                message,
                details: format_list_for_display(&report.missing_ids, self.message_size, ", "),
            });
        }

        if !failed_translations.is_empty() {
            report.is_valid = false;
            report.show_errors = true;
            report.failed_translations = failed_translations.to_vec();

            let count = failed_translations.len();
            let message = format!("Failed to translate {} {}", count, entry_noun(count));
            let content: Vec<String> = failed_translations.iter().map(FailedTranslation::describe).collect();
            warn!("{}:\n  {}", message, format_list_for_display(&content, self.message_size, "\n  "));
            sink.emit(XmlEvent::ValidationError {
                category: category::FAILED_TRANSLATION,
                message,
                details: format_list_for_display(&content, self.message_size, ", "),
            });
        }

        if report.is_valid {
            info!(
                "Preview is valid: {} '{}' entries present in '{}'",
                source_ids.len(),
                source_tag,
                target_tag
            );
        }

        sink.emit(XmlEvent::PreviewValidityChanged {
            is_valid: report.is_valid,
            show_errors: report.show_errors,
        });
        report
    }
}
