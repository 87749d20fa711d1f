/*!
 * Integration tests for the sanitize, extract, substitute, validate sequence
 */

use ddloc::app_config::Config;
use ddloc::xml_tools::events::category;
use ddloc::xml_tools::{
    split_translation_text, Extractor, Sanitizer, Substituter, Validator, XmlEvent,
};
use crate::common;

/// Test the single-line document from extraction to a valid preview
#[test]
fn test_roundtrip_withSingleLineDocument_shouldProduceValidPreview() {
    common::init_logging();
    let config = Config::default();
    let mut events: Vec<XmlEvent> = Vec::new();

    let document = Sanitizer::new(config.clone()).sanitize_str(common::SINGLE_LINE_DOCUMENT, "single.xml", &mut events);
    let extraction = Extractor::new(&config).extract(&document, "schinese");
    assert_eq!(extraction.texts(), vec!["你好"]);

    let translations = vec!["hello".to_string()];
    let preview = Substituter::new(&config)
        .substitute("english", &document, &extraction, &translations, &mut events)
        .expect("substitution should produce a preview");

    let english_line = preview
        .lines()
        .iter()
        .skip_while(|line| !line.contains(r#"<language id="english">"#))
        .nth(1)
        .expect("english entry line");
    assert_eq!(english_line, r#"<entry id="e1">[CDATA[hello]]</entry>"#);

    let report = Validator::new(&config).validate_preview(&preview, "schinese", "english", &mut events);
    assert!(report.is_valid);
    assert_eq!(events, vec![XmlEvent::PreviewValidityChanged { is_valid: true, show_errors: false }]);
}

/// Test that the sample document round-trips with color codes restored
#[test]
fn test_roundtrip_withSampleDocument_shouldRestoreColorCodes() {
    common::init_logging();
    let config = Config::default();
    let mut events: Vec<XmlEvent> = Vec::new();

    let document = Sanitizer::new(config.clone()).sanitize_str(common::SAMPLE_DOCUMENT, "sample.xml", &mut events);
    assert_eq!(document.len(), 13);

    let extraction = Extractor::new(&config).extract(&document, "schinese");
    assert_eq!(extraction.len(), 5);
    assert_eq!(
        extraction.translation_source(),
        "标题\n很长的文本\n坏了\n检测到 ### 程序错误"
    );

    let translations = split_translation_text(common::SAMPLE_TRANSLATION);
    let preview = Substituter::new(&config)
        .substitute("english", &document, &extraction, &translations, &mut events)
        .expect("substitution should produce a preview");

    assert_eq!(preview.lines().len(), 17);
    assert_eq!(
        &preview.lines()[9..16],
        &[
            r#"  <language id="english">"#,
            r#"    <entry id="ui_title">[CDATA[Title]]</entry>"#,
            r#"    <entry id="ui_empty">[CDATA[]]</entry>"#,
            r#"    <entry id="ui_long">[CDATA[Very long text]]</entry>"#,
            r#"    <entry id="ui_broken">[CDATA[Broken]]</entry>"#,
            r#"    <entry id="ui_color">[CDATA[{colour_start|red}Detected{colour_end}{colour_start|blue}program error{colour_end}]]</entry>"#,
            r#"  </language>"#,
        ]
    );

    // The source section is untouched
    assert_eq!(&preview.lines()[..9], &document.texts()[..9]);

    let report = Validator::new(&config).validate_preview(&preview, "schinese", "english", &mut events);
    assert!(report.is_valid);
    assert!(report.missing_ids.is_empty());
}

/// Test that substituting a section's own texts back reproduces it
#[test]
fn test_roundtrip_withOwnTexts_shouldBeIdempotent() {
    let config = Config::default();
    let mut events: Vec<XmlEvent> = Vec::new();

    let document = Sanitizer::new(config.clone()).sanitize_str(common::SAMPLE_DOCUMENT, "sample.xml", &mut events);
    let extraction = Extractor::new(&config).extract(&document, "schinese");
    let translations = split_translation_text(&extraction.translation_source());

    let preview = Substituter::new(&config)
        .substitute("schinese", &document, &extraction, &translations, &mut events)
        .expect("substitution should produce a preview");

    assert_eq!(preview.lines(), document.texts().as_slice());
    assert!(preview.failed_translations().is_empty());

    let report = Validator::new(&config).validate_preview(&preview, "schinese", "schinese", &mut events);
    assert!(report.is_valid);
}

/// Test that payload text outside the extracted color runs survives a round trip
#[test]
fn test_roundtrip_withTextOutsideColorRuns_shouldBeIdempotent() {
    let content = r#"<language id="english">
<entry id="hint">[CDATA[Press {colour_start|key}E{colour_end} to open]]</entry>
<entry id="count">[CDATA[Found {0} of {1} items]]</entry>
<entry id="mixed">[CDATA[{c1}Hello{e}{c2}x{e}{c3}World{e}]]</entry>
</language>"#;
    let config = Config::default();
    let mut events: Vec<XmlEvent> = Vec::new();

    let document = Sanitizer::new(config.clone()).sanitize_str(content, "hints.xml", &mut events);
    let extraction = Extractor::new(&config).extract(&document, "english");
    assert_eq!(extraction.texts(), vec!["E", " of ", "Hello ### World"]);
    let translations = split_translation_text(&extraction.translation_source());

    let preview = Substituter::new(&config)
        .substitute("english", &document, &extraction, &translations, &mut events)
        .expect("substitution should produce a preview");

    assert_eq!(preview.lines(), document.texts().as_slice());
    let report = Validator::new(&config).validate_preview(&preview, "english", "english", &mut events);
    assert!(report.is_valid);
}

/// Test that a short translation aborts the run without a preview
#[test]
fn test_roundtrip_withShortTranslation_shouldReportCriticalError() {
    let config = Config::default();
    let mut events: Vec<XmlEvent> = Vec::new();

    let document = Sanitizer::new(config.clone()).sanitize_str(common::SAMPLE_DOCUMENT, "sample.xml", &mut events);
    let extraction = Extractor::new(&config).extract(&document, "schinese");
    events.clear();

    let translations = split_translation_text("Title\nVery long text");
    let preview = Substituter::new(&config).substitute("english", &document, &extraction, &translations, &mut events);

    assert!(preview.is_none());
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].category(), Some(category::CRITICAL));
    assert!(events[0].is_blocking());
}

/// Test that a translator dropping a delimiter is flagged by validation
#[test]
fn test_roundtrip_withMangledDelimiter_shouldFailValidation() {
    let config = Config::default();
    let mut events: Vec<XmlEvent> = Vec::new();

    let document = Sanitizer::new(config.clone()).sanitize_str(common::SAMPLE_DOCUMENT, "sample.xml", &mut events);
    let extraction = Extractor::new(&config).extract(&document, "schinese");
    events.clear();

    let translations = split_translation_text("Title\nVery long text\nBroken\nDetected # program error");
    let preview = Substituter::new(&config)
        .substitute("english", &document, &extraction, &translations, &mut events)
        .expect("a mismatch still produces a preview");
    assert_eq!(preview.failed_translations().len(), 1);
    assert_eq!(preview.failed_translations()[0].id, "ui_color");

    let report = Validator::new(&config).validate_preview(&preview, "schinese", "english", &mut events);
    assert!(!report.is_valid);
    assert!(report.show_errors);
    match &events[0] {
        XmlEvent::ValidationError { category: kind, message, details } => {
            assert_eq!(*kind, category::FAILED_TRANSLATION);
            assert_eq!(message, "Failed to translate 1 entry");
            assert_eq!(details, "Line 10: ui_color");
        }
        other => panic!("unexpected event {:?}", other),
    }
}

/// Test extraction without color-code separation keeps the codes in the text
#[test]
fn test_roundtrip_withColorCodesDisabled_shouldTranslateRawPayload() {
    let mut config = Config::default();
    config.color_codes.enabled = false;
    let mut events: Vec<XmlEvent> = Vec::new();

    let document = Sanitizer::new(config.clone()).sanitize_str(common::SAMPLE_DOCUMENT, "sample.xml", &mut events);
    let extraction = Extractor::new(&config).extract(&document, "schinese");

    assert_eq!(
        extraction.texts()[4],
        "{colour_start|red}检测到{colour_end}{colour_start|blue}程序错误{colour_end}"
    );
    assert!(extraction.entries().iter().all(|entry| entry.color_codes.is_none()));
}
