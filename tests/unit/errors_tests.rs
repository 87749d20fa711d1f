/*!
 * Tests for error types and conversions
 */

use std::error::Error;
use std::path::PathBuf;
use ddloc::errors::{AppError, XmlError};
use ddloc::xml_tools::LineSpan;

#[test]
fn test_xmlError_translationsExhausted_shouldNameEntryAndCount() {
    let error = XmlError::TranslationsExhausted {
        entry_id: "ui_title".to_string(),
        consumed: 3,
    };
    assert_eq!(
        error.to_string(),
        "translated text ran out of lines at entry 'ui_title' (3 used)"
    );
}

#[test]
fn test_xmlError_read_shouldExposeSource() {
    let error = XmlError::Read {
        path: PathBuf::from("strings.xml"),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
    };
    assert!(error.to_string().contains("strings.xml"));
    assert_eq!(error.source().map(|e| e.to_string()), Some("not found".to_string()));
}

#[test]
fn test_xmlError_missingPayload_shouldDisplaySpan() {
    let error = XmlError::MissingPayload { span: LineSpan::new(4, 6) };
    assert!(error.to_string().contains("line 4-6"));
}

#[test]
fn test_appError_fromXmlError_shouldWrap() {
    let error: AppError = XmlError::MisalignedEntry {
        entry_id: "a".to_string(),
        line_index: 7,
    }
    .into();
    let display = error.to_string();
    assert!(display.starts_with("XML error:"));
    assert!(display.contains("line 7"));
}

#[test]
fn test_appError_fromIoError_shouldBeFileError() {
    let error: AppError = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into();
    assert!(matches!(error, AppError::File(ref message) if message == "denied"));
}

#[test]
fn test_appError_fromJsonError_shouldBeConfigError() {
    let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let error: AppError = json_error.into();
    assert!(matches!(error, AppError::Config(_)));
}

#[test]
fn test_appError_emptyPreview_shouldDisplayCorrectly() {
    assert_eq!(
        AppError::EmptyPreview.to_string(),
        "Nothing to save: no preview has been generated"
    );
}
