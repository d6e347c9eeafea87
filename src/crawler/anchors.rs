//! Anchor extraction from registry HTML
//!
//! Registry index and package pages are machine-generated lists of
//! `<a href="...">name</a>` entries, so a compiled pattern scan is used
//! instead of a full HTML parse. The scan is deliberately best-effort:
//! nested tags, reordered attributes, single-quoted attributes, and
//! malformed markup either yield no match or a plausible-but-wrong pair.

use once_cell::sync::Lazy;
use regex::bytes::Regex;

static ANCHOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<a href="([^"]*)".*>([^<]*)</a>"#).expect("anchor pattern is valid"));

/// A single hyperlink lifted from an HTML document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorTag {
    /// The anchor's href attribute, verbatim
    pub href: String,

    /// The anchor's link text
    pub text: String,
}

/// Scans raw HTML bytes for anchor tags, in document order.
///
/// Pure and idempotent; input with no well-formed anchors yields an empty
/// vector. Captured bytes are converted lossily, so invalid UTF-8 inside an
/// anchor cannot fail extraction.
pub fn extract_anchors(body: &[u8]) -> Vec<AnchorTag> {
    ANCHOR_RE
        .captures_iter(body)
        .map(|caps| AnchorTag {
            href: String::from_utf8_lossy(&caps[1]).into_owned(),
            text: String::from_utf8_lossy(&caps[2]).into_owned(),
        })
        .collect()
}
