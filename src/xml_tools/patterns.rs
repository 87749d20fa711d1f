/*!
 * Text matchers for the localization XML dialect.
 *
 * The dialect is not well-formed XML: payloads are wrapped in `[CDATA[...]]`
 * (or `<![CDATA[...]]>`) markers that are frequently broken, and entries may
 * span several physical lines. Every pass shares the matchers defined here so
 * that "what a tag looks like" has exactly one definition.
 *
 * The `regex` crate has no look-around, so each matcher anchors on the
 * closing markup explicitly instead.
 */

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::{Match, Regex};

/// Language section open tag, e.g. `<language id="english">`. Captures the id.
pub static LANGUAGE_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<language\s+id\s*=\s*"([^"]*)"[^>]*>"#).expect("Invalid language start regex")
});

/// Language section close tag.
pub static LANGUAGE_EXIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"</language\s*>").expect("Invalid language exit regex")
});

/// Entry open tag.
pub static ENTRY_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<entry\b").expect("Invalid entry start regex")
});

/// Entry close tag.
pub static ENTRY_EXIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"</entry\s*>").expect("Invalid entry exit regex")
});

/// A complete entry, open and close tag on the same line.
pub static ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<entry\b.*?</entry\s*>").expect("Invalid entry regex")
});

/// The `id` attribute of an entry open tag. Captures the id.
pub static ENTRY_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<entry\s[^>]*?\bid\s*=\s*"([^"]*)""#).expect("Invalid entry id regex")
});

/// Well-formed payload directly before `</entry>`.
///
/// INPUT: `<entry id="name"><![CDATA[text[that may look]] like this]]></entry>`
/// Finds: `text[that may look]] like this`
pub static CDATA: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:<!)?\[CDATA\[(.*)\]\]>?\s*</entry\s*>").expect("Invalid CDATA regex")
});

/// Payload with any of its delimiters missing.
///
/// Works on: `CDATAtext that may look</entry>`
/// Finds:    `text that may look`
pub static MALFORMED_CDATA: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:<!)?\[?CDATA\[?(.*?)\]{0,2}>?\s*</entry\s*>").expect("Invalid malformed CDATA regex")
});

/// Everything between the entry open tag and `</entry>`.
pub static CDATA_REGION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(<entry\b[^>]*>)(.*)(</entry\s*>)").expect("Invalid CDATA region regex")
});

/// Text wrapped in color codes. Matches every pair in the input.
///
/// INPUT: `{colour_start|huixiang}检测到程序错误！{colour_end}`
/// start_color: `{colour_start|huixiang}`, text: `检测到程序错误！`, end_color: `{colour_end}`
pub static COLOR_CODES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?P<start_color>\{.*?\})(?P<text>.*?)(?P<end_color>\{.*?\})")
        .expect("Invalid color code regex")
});

/// Any structural boundary: language open/close, entry open/close.
static STRUCTURE_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<language\b[^>]*>|</language\s*>|<entry\b|</entry\s*>")
        .expect("Invalid structure marker regex")
});

/// One `(prefix, text, suffix)` color-code triple found in a payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorCodeMatch<'a> {
    pub start_color: &'a str,
    pub text: &'a str,
    pub end_color: &'a str,
    /// Byte range of `text` in the searched string
    pub text_range: Range<usize>,
}

/// Returns the id of a language open tag on this line, if any
pub fn language_tag(line: &str) -> Option<&str> {
    LANGUAGE_START
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

pub fn is_language_start(line: &str) -> bool {
    LANGUAGE_START.is_match(line)
}

pub fn is_language_exit(line: &str) -> bool {
    LANGUAGE_EXIT.is_match(line)
}

pub fn has_entry_start(line: &str) -> bool {
    ENTRY_START.is_match(line)
}

pub fn has_entry_exit(line: &str) -> bool {
    ENTRY_EXIT.is_match(line)
}

/// Whether the line holds a complete single-line entry
pub fn is_complete_entry(line: &str) -> bool {
    ENTRY.is_match(line)
}

/// Returns the entry id, or `None` when the open tag carries no parsable id
pub fn entry_id(line: &str) -> Option<&str> {
    ENTRY_ID
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Returns the well-formed payload text together with its byte range in `line`
pub fn cdata_payload(line: &str) -> Option<Match<'_>> {
    CDATA.captures(line).and_then(|caps| caps.get(1))
}

/// Returns the text recovered from a payload with broken delimiters
pub fn malformed_payload(line: &str) -> Option<&str> {
    MALFORMED_CDATA
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Rewrites a malformed payload as well-formed markup.
///
/// The `<![CDATA[...]]>` flavour is kept when the broken region started with
/// `<!`; otherwise the bare `[CDATA[...]]` form is written. Returns `None`
/// when the payload cannot be recovered.
pub fn repair_payload(line: &str) -> Option<String> {
    let text = malformed_payload(line)?;
    let caps = CDATA_REGION.captures(line)?;
    let whole = caps.get(0)?;
    let open_tag = caps.get(1)?.as_str();
    let region = caps.get(2)?.as_str();
    let close_tag = caps.get(3)?.as_str();

    let wrapped = if region.trim_start().starts_with("<!") {
        format!("<![CDATA[{}]]>", text)
    } else {
        format!("[CDATA[{}]]", text)
    };

    Some(format!(
        "{}{}{}{}{}",
        &line[..whole.start()],
        open_tag,
        wrapped,
        close_tag,
        &line[whole.end()..]
    ))
}

/// Every color-code triple in `text`, in order
pub fn color_code_runs(text: &str) -> Vec<ColorCodeMatch<'_>> {
    COLOR_CODES
        .captures_iter(text)
        .filter_map(|caps| {
            let text = caps.name("text")?;
            Some(ColorCodeMatch {
                start_color: caps.name("start_color")?.as_str(),
                text: text.as_str(),
                end_color: caps.name("end_color")?.as_str(),
                text_range: text.range(),
            })
        })
        .collect()
}

/// Splits a physical line that carries more than one structural marker.
///
/// Cuts are made before `<language ...>`, `</language>` and `<entry`, and
/// after `<language ...>`, `</language>` and `</entry>`. Indentation is kept
/// on the segment it precedes and trailing whitespace is dropped. A line with
/// at most one marker is returned as is.
pub fn split_structural(line: &str) -> Vec<&str> {
    let markers: Vec<Match<'_>> = STRUCTURE_MARKER.find_iter(line).collect();
    if markers.len() < 2 {
        return vec![line];
    }

    let mut cuts = Vec::with_capacity(markers.len() * 2);
    for marker in &markers {
        let text = marker.as_str();
        if text.starts_with("</entry") {
            cuts.push(marker.end());
        } else if text.starts_with("<entry") {
            cuts.push(marker.start());
        } else {
            cuts.push(marker.start());
            cuts.push(marker.end());
        }
    }
    cuts.retain(|&cut| cut > 0 && cut < line.len());
    cuts.sort_unstable();
    cuts.dedup();

    let mut segments = Vec::with_capacity(cuts.len() + 1);
    let mut start = 0;
    for cut in cuts.into_iter().chain(std::iter::once(line.len())) {
        let segment = &line[start..cut];
        // Leading whitespace stays with the segment that follows it
        if segment.trim().is_empty() {
            continue;
        }
        segments.push(segment);
        start = cut;
    }
    segments
}

/// Body of the first section tagged `tag`: the lines strictly between its open
/// tag and the next close tag (or the end of input when it is never closed).
pub fn find_section<S: AsRef<str>>(lines: &[S], tag: &str) -> Option<Range<usize>> {
    let open = lines
        .iter()
        .position(|line| language_tag(line.as_ref()) == Some(tag))?;
    let body_start = open + 1;
    let body_end = lines[body_start..]
        .iter()
        .position(|line| is_language_exit(line.as_ref()))
        .map_or(lines.len(), |offset| body_start + offset);
    Some(body_start..body_end)
}
