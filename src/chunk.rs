//! Sentence-boundary text chunker.
//!
//! Splits extracted document text into segments that respect a
//! configurable character limit. Splitting occurs only at sentence
//! boundaries (`.`, `!`, `?` followed by whitespace), so no segment ever
//! cuts a sentence in half. A single sentence longer than the limit is
//! emitted verbatim as its own over-length segment — the escape valve for
//! degenerate input, not a bug.

/// Split text into sentence-aligned segments of at most `max_chars`
/// characters. Greedy: sentences accumulate into a buffer that is flushed
/// whenever the next sentence would push it past the limit. Pure and
/// deterministic; empty or whitespace-only input yields no segments.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut buf = String::new();

    for sentence in split_sentences(text) {
        let would_be = if buf.is_empty() {
            sentence.len()
        } else {
            buf.len() + 1 + sentence.len() // +1 for the joining space
        };

        if would_be > max_chars && !buf.is_empty() {
            chunks.push(std::mem::take(&mut buf));
        }

        if !buf.is_empty() {
            buf.push(' ');
        }
        buf.push_str(sentence);
    }

    if !buf.is_empty() {
        chunks.push(buf);
    }

    chunks
}

/// Split on sentence-terminal punctuation followed by whitespace. The
/// terminator stays with its sentence. Abbreviations like "Mr." split
/// too — a coarse heuristic, accepted.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut prev_terminal = false;

    for (i, ch) in text.char_indices() {
        if prev_terminal && ch.is_whitespace() {
            let sentence = text[start..i].trim();
            if !sentence.is_empty() {
                sentences.push(sentence);
            }
            start = i;
        }
        prev_terminal = matches!(ch, '.' | '!' | '?');
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }

    sentences
}
