/*!
 * Tests for pass events and sinks
 */

use ddloc::xml_tools::events::{category, format_list_for_display};
use ddloc::xml_tools::{EventSink, LogSink, XmlEvent};

#[test]
fn test_display_withProcessException_shouldIndentTrace() {
    let event = XmlEvent::ProcessException {
        category: category::PE_SUBSTITUTE,
        message: "An unexpected exception occurred while translating XML".to_string(),
        trace: "first\nCaused by: second".to_string(),
    };
    assert_eq!(
        event.to_string(),
        "[PE_Substitute] An unexpected exception occurred while translating XML\n  first\n  Caused by: second"
    );
}

#[test]
fn test_display_withEmptyDetails_shouldOmitSeparator() {
    let event = XmlEvent::ValidationError {
        category: category::FAILED_TRANSLATION,
        message: "Failed to translate 1 entry".to_string(),
        details: String::new(),
    };
    assert_eq!(event.to_string(), "[VE_W1_FailTranslation] Failed to translate 1 entry");
}

#[test]
fn test_is_blocking_withValidityEvents_shouldFollowValidity() {
    let valid = XmlEvent::PreviewValidityChanged { is_valid: true, show_errors: false };
    let invalid = XmlEvent::PreviewValidityChanged { is_valid: false, show_errors: true };
    assert!(!valid.is_blocking());
    assert!(invalid.is_blocking());
    assert_eq!(valid.category(), None);
}

#[test]
fn test_is_blocking_withProcessException_shouldAlwaysBlock() {
    let event = XmlEvent::ProcessException {
        category: category::CRITICAL,
        message: "ran out".to_string(),
        trace: String::new(),
    };
    assert!(event.is_blocking());
    assert_eq!(event.category(), Some(category::CRITICAL));
}

#[test]
fn test_log_sink_shouldAcceptEvents() {
    let mut sink = LogSink;
    sink.emit(XmlEvent::PreviewValidityChanged { is_valid: true, show_errors: false });
}

#[test]
fn test_dyn_sink_withVec_shouldCollectInOrder() {
    let mut events: Vec<XmlEvent> = Vec::new();
    {
        let sink: &mut dyn EventSink = &mut events;
        sink.emit(XmlEvent::PreviewValidityChanged { is_valid: false, show_errors: true });
        sink.emit(XmlEvent::PreviewValidityChanged { is_valid: true, show_errors: false });
    }
    assert_eq!(events.len(), 2);
    assert_eq!(events[1], XmlEvent::PreviewValidityChanged { is_valid: true, show_errors: false });
}

#[test]
fn test_format_list_for_display_withExactLimit_shouldNotTruncate() {
    let items = ["ab", "cd"];
    assert_eq!(format_list_for_display(&items, 6, ", "), "ab, cd");
    assert_eq!(format_list_for_display(&items, 5, ", "), "ab, c...");
}
