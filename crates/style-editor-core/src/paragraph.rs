//! Paragraph splitting.
//!
//! A paragraph is a maximal run of non-blank lines. Runs of blank (or
//! whitespace-only) lines separate paragraphs. Each paragraph is trimmed
//! of surrounding whitespace; internal line breaks and indentation are
//! kept exactly as written.
//!
//! ```rust
//! use style_editor_core::paragraph::split_paragraphs;
//!
//! let paras = split_paragraphs("First.\n\n\n  Second\nline two.  \n");
//! assert_eq!(paras, vec!["First.", "Second\nline two."]);
//! ```

/// Split `text` into trimmed paragraphs, in document order.
///
/// Returns an empty vector for empty or whitespace-only input.
pub fn split_paragraphs(text: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.split('\n') {
        if line.trim().is_empty() {
            flush(&mut current, &mut paragraphs);
        } else {
            current.push(line);
        }
    }
    flush(&mut current, &mut paragraphs);

    paragraphs
}

fn flush(lines: &mut Vec<&str>, out: &mut Vec<String>) {
    if lines.is_empty() {
        return;
    }
    let joined = lines.join("\n");
    let trimmed = joined.trim();
    if !trimmed.is_empty() {
        out.push(trimmed.to_string());
    }
    lines.clear();
}
