//! Prompt context assembly.

use crate::models::ScoredSegment;

/// Join the ranked segments into one context string, blank line between
/// segments, ranked order (most relevant first) preserved.
pub fn assemble_context(ranked: &[ScoredSegment]) -> String {
    ranked
        .iter()
        .map(|segment| segment.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}
