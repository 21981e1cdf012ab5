//! Text normalization and sentence chunking

/// Normalize input for tokenization: trim, collapse whitespace runs to
/// single spaces, case-fold to lowercase.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Split text on sentence-terminal punctuation (`.`, `!`, `?`), discard
/// blank segments, and re-append a terminal period to each chunk before
/// individual synthesis.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    for c in text.chars() {
        if matches!(c, '.' | '!' | '?') {
            push_chunk(&mut chunks, &current);
            current.clear();
        } else {
            current.push(c);
        }
    }
    push_chunk(&mut chunks, &current);
    chunks
}

fn push_chunk(chunks: &mut Vec<String>, segment: &str) {
    let trimmed = segment.trim();
    if !trimmed.is_empty() {
        chunks.push(format!("{trimmed}."));
    }
}
