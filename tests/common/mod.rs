/*!
 * Common test utilities for the ddloc test suite
 */

use std::fs;
use std::path::{Path, PathBuf};
use anyhow::Result;
use tempfile::TempDir;

/// Single-line document with one entry in each of two sections
pub const SINGLE_LINE_DOCUMENT: &str = r#"<language id="schinese"><entry id="e1">[CDATA[你好]]</entry></language><language id="english"><entry id="e1">[CDATA[]]</entry></language>"#;

/// Multi-line document with an empty payload, a multi-line entry,
/// a malformed payload and color codes
pub const SAMPLE_DOCUMENT: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<root>
  <language id="schinese">
    <entry id="ui_title">[CDATA[标题]]</entry>
    <entry id="ui_empty">[CDATA[]]</entry>
    <entry id="ui_long">
      [CDATA[很长的文本]]
    </entry>
    <entry id="ui_broken">CDATA坏了</entry>
    <entry id="ui_color">[CDATA[{colour_start|red}检测到{colour_end}{colour_start|blue}程序错误{colour_end}]]</entry>
  </language>

  <language id="english">
    <entry id="ui_title">[CDATA[Title]]</entry>
  </language>
</root>
"#;

/// Translation of the non-empty source texts of SAMPLE_DOCUMENT
pub const SAMPLE_TRANSLATION: &str = "Title\nVery long text\nBroken\nDetected ### program error\n";

/// Initializes test logging once; later calls are no-ops
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates the sample localization file for testing
pub fn create_sample_xml(dir: &Path, filename: &str) -> Result<PathBuf> {
    create_test_file(dir, filename, SAMPLE_DOCUMENT)
}
