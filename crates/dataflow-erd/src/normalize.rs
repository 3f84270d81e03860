//! Cleanup of raw text returned by the generation service.
//!
//! Models wrap their output in Markdown code fences even when told not to.
//! [`normalize`] strips the fences and surrounding whitespace; [`classify`]
//! tells callers what kind of payload is left.

use crate::consts::ROOT_KEYWORD;

/// Fence openers removed before the bare delimiter.
const FENCE_OPENERS: [&str; 2] = ["```json", "```mermaid"];

/// Bare fence delimiter.
const FENCE: &str = "```";

/// Byte order mark some responses start with.
const BOM: char = '\u{feff}';

/// Kind of payload in normalized text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// Starts with `{`.
    Json,
    /// Starts with the `erDiagram` keyword.
    Diagram,
    /// Anything else; callers substitute their own fallback payload.
    Other,
}

/// Strip code fences and surrounding whitespace from raw model output.
///
/// Absence of fences is a no-op apart from trimming. The result is stable:
/// `normalize(&normalize(x)) == normalize(x)`.
#[must_use]
pub fn normalize(raw: &str) -> String {
    let mut text = raw.to_owned();
    for opener in FENCE_OPENERS {
        if text.contains(opener) {
            text = text.replace(opener, "");
        }
    }
    // Every run of backticks ends up shorter than a fence here, so a second
    // pass finds nothing to remove.
    if text.contains(FENCE) {
        text = text.replace(FENCE, "");
    }
    text.trim_matches(|c: char| c.is_whitespace() || c == BOM)
        .to_owned()
}

/// Classify normalized text by its prefix.
#[must_use]
pub fn classify(text: &str) -> ResponseShape {
    if text.starts_with('{') {
        ResponseShape::Json
    } else if text.starts_with(ROOT_KEYWORD) {
        ResponseShape::Diagram
    } else {
        ResponseShape::Other
    }
}
