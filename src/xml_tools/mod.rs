/*!
 * Round-trip engine for the localization XML dialect.
 *
 * Passes run in this order, each reading the output of the previous one:
 * sanitize, extract, substitute (with externally supplied translations),
 * validate. The sanitized document is shared read-only by extraction and
 * substitution so that line indices stay aligned.
 *
 * # Architecture
 *
 * - `patterns`: Text matchers shared by every pass
 * - `sanitizer`: Collapses multi-line entries and repairs payload markers
 * - `extractor`: Pulls entry texts out of one language section
 * - `substituter`: Writes translated texts into a language section
 * - `validator`: Cross-checks entry ids of the source and target sections
 * - `events`: Typed events and the sink they are delivered to
 */

pub mod events;
pub mod extractor;
pub mod patterns;
pub mod sanitizer;
pub mod substituter;
pub mod validator;

// Re-export main types
pub use events::{EventSink, LogSink, XmlEvent};
pub use extractor::{split_translation_text, ColorCodeRun, ExtractedEntry, Extraction, Extractor};
pub use sanitizer::{LineSpan, LogicalLine, MalformedEntry, MalformedEntryLog, SanitizedDocument, Sanitizer};
pub use substituter::{FailedTranslation, PreviewDocument, Substituter};
pub use validator::{ValidationReport, Validator};
