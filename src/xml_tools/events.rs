/*!
 * Notification boundary between the XML passes and their caller.
 *
 * Passes never hand errors back to the caller. Everything worth reporting is
 * logged where it happens and delivered as an [`XmlEvent`] through the
 * [`EventSink`] the caller injects.
 */

use std::fmt;

use log::debug;

/// Event categories, shared with whatever presents the events to a user
pub mod category {
    pub const PE_SANITIZE: &str = "PE_Sanitize";
    pub const PE_SUBSTITUTE: &str = "PE_Substitute";
    pub const CRITICAL: &str = "Critical error";
    pub const MALFORMED_FIXED: &str = "MALFIX_Sanitize";
    pub const MALFORMED_FAILED: &str = "MAL_Sanitize";
    pub const BROKEN_TRANSLATION: &str = "VE_E1_BrokenTranslation";
    pub const FAILED_TRANSLATION: &str = "VE_W1_FailTranslation";
}

/// Something a pass reports to its caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlEvent {
    /// A pass aborted; whatever it produced must be discarded
    ProcessException {
        category: &'static str,
        message: String,
        trace: String,
    },
    /// A problem with the document that the user should look at
    ValidationError {
        category: &'static str,
        message: String,
        details: String,
    },
    /// Outcome of validating a preview
    PreviewValidityChanged {
        is_valid: bool,
        /// Whether previously shown detail errors should stay visible
        show_errors: bool,
    },
}

impl XmlEvent {
    pub fn category(&self) -> Option<&'static str> {
        match self {
            Self::ProcessException { category: kind, .. }
            | Self::ValidationError { category: kind, .. } => Some(*kind),
            Self::PreviewValidityChanged { .. } => None,
        }
    }

    /// Whether the event reports something that blocks a usable result.
    /// Repaired markup is cosmetic; everything else that went wrong is not.
    pub fn is_blocking(&self) -> bool {
        match self {
            Self::ProcessException { .. } => true,
            Self::ValidationError { category: kind, .. } => *kind != category::MALFORMED_FIXED,
            Self::PreviewValidityChanged { is_valid, .. } => !is_valid,
        }
    }
}

impl fmt::Display for XmlEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProcessException { category, message, trace } => {
                write!(f, "[{}] {}", category, message)?;
                if !trace.is_empty() {
                    write!(f, "\n  {}", trace.replace('\n', "\n  "))?;
                }
                Ok(())
            }
            Self::ValidationError { category, message, details } => {
                write!(f, "[{}] {}", category, message)?;
                if !details.is_empty() {
                    write!(f, ": {}", details)?;
                }
                Ok(())
            }
            Self::PreviewValidityChanged { is_valid, show_errors } => {
                write!(
                    f,
                    "Preview is {} (show errors: {})",
                    if *is_valid { "valid" } else { "invalid" },
                    show_errors
                )
            }
        }
    }
}

/// Receiver of pass events
pub trait EventSink {
    fn emit(&mut self, event: XmlEvent);
}

impl EventSink for Vec<XmlEvent> {
    fn emit(&mut self, event: XmlEvent) {
        self.push(event);
    }
}

/// Sink for callers that only rely on the log output
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&mut self, event: XmlEvent) {
        debug!("Dropped event: {}", event);
    }
}

/// Joins `items` with `separator` and cuts the result to at most `max_chars`
/// characters, marking the cut with `...`
pub fn format_list_for_display<S: AsRef<str>>(items: &[S], max_chars: usize, separator: &str) -> String {
    let joined = items
        .iter()
        .map(|item| item.as_ref())
        .collect::<Vec<_>>()
        .join(separator);

    if joined.chars().count() <= max_chars {
        return joined;
    }

    let mut truncated: String = joined.chars().take(max_chars).collect();
    truncated.push_str("...");
    truncated
}

/// Renders an error together with its chain of causes
pub fn error_trace<E>(error: E) -> String
where
    E: std::error::Error + Send + Sync + 'static,
{
    format!("{:?}", anyhow::Error::new(error))
}

/// "entry" or "entries"
pub(crate) fn entry_noun(count: usize) -> &'static str {
    if count == 1 { "entry" } else { "entries" }
}
