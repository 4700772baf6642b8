//! Paragraph-level alignment between two document revisions.
//!
//! [`align`] splits both documents into paragraphs, aligns the paragraph
//! sequences with [`crate::sequence::opcodes`], and turns every non-equal
//! run into one or more [`EditRecord`]s:
//!
//! | Run | Records | `paragraph_index` |
//! |-----|---------|-------------------|
//! | `Replace` (k old, m new) | `max(k, m)`, paired by position, missing side `""` | `old_start + offset` |
//! | `Delete` | one per removed paragraph | `old_start + offset` |
//! | `Insert` | one per added paragraph | `old_start + offset` |
//!
//! Insert runs are anchored on the original side, so an inserted paragraph
//! reports the index of the original paragraph it was inserted before. When
//! inserts follow deletions or land at the end of the document this index
//! may not name any existing paragraph; it is a traceability hint, not an
//! address.
//!
//! Only replace pairs get a real line-level diff in `diff_summary`; deleted
//! and inserted paragraphs carry fixed sentinels.
//!
//! ```rust
//! use style_editor_core::align::align;
//!
//! let edits = align("Keep.\n\nDrop.\n\nKeep2.", "Keep.\n\nKeep2.");
//! assert_eq!(edits.len(), 1);
//! assert_eq!(edits[0].original_text, "Drop.");
//! assert_eq!(edits[0].edited_text, "");
//! assert_eq!(edits[0].paragraph_index, 1);
//! ```

use serde::{Deserialize, Serialize};

use crate::models::Category;
use crate::paragraph::split_paragraphs;
use crate::sequence::{grouped_opcodes, opcodes, OpTag};

/// `diff_summary` of a record whose paragraph was removed.
pub const DELETED_SUMMARY: &str = "- [DELETED paragraph]";

/// `diff_summary` of a record whose paragraph was added.
pub const INSERTED_SUMMARY: &str = "+ [INSERTED paragraph]";

/// Lines of unchanged context around each hunk in a diff summary.
const DIFF_CONTEXT_LINES: usize = 3;

/// One detected change between an original and an edited paragraph.
///
/// At least one of `original_text` / `edited_text` is non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditRecord {
    /// Original paragraph, or `""` for a pure insertion.
    pub original_text: String,
    /// Edited paragraph, or `""` for a pure deletion.
    pub edited_text: String,
    /// Position in the original paragraph sequence this edit is anchored to.
    pub paragraph_index: usize,
    /// Unified-diff style line delta, or a sentinel for inserts/deletes.
    pub diff_summary: String,
    /// Filled in after classification; `None` straight out of [`align`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<Category>,
}

impl EditRecord {
    fn new(original: &str, edited: &str, paragraph_index: usize, diff_summary: String) -> Self {
        Self {
            original_text: original.to_string(),
            edited_text: edited.to_string(),
            paragraph_index,
            diff_summary,
            classification: None,
        }
    }

    /// True when the paragraph only exists in the edited document.
    pub fn is_insertion(&self) -> bool {
        self.original_text.is_empty()
    }

    /// True when the paragraph only exists in the original document.
    pub fn is_deletion(&self) -> bool {
        self.edited_text.is_empty()
    }
}

/// Align two full documents and return the changed paragraphs.
///
/// Records are ordered by their position in the original document.
/// Identical documents (including two empty ones) produce no records.
pub fn align(original: &str, edited: &str) -> Vec<EditRecord> {
    let original = split_paragraphs(original);
    let edited = split_paragraphs(edited);
    align_paragraphs(&original, &edited)
}

/// Align two already-split paragraph sequences.
pub fn align_paragraphs<S: AsRef<str> + PartialEq>(original: &[S], edited: &[S]) -> Vec<EditRecord> {
    let mut records = Vec::new();

    for op in opcodes(original, edited) {
        match op.tag {
            OpTag::Equal => {}
            OpTag::Replace => {
                let old_run = &original[op.old_start..op.old_end];
                let new_run = &edited[op.new_start..op.new_end];
                for k in 0..old_run.len().max(new_run.len()) {
                    let o = old_run.get(k).map(AsRef::as_ref).unwrap_or("");
                    let e = new_run.get(k).map(AsRef::as_ref).unwrap_or("");
                    records.push(EditRecord::new(o, e, op.old_start + k, diff_summary(o, e)));
                }
            }
            OpTag::Delete => {
                for (k, para) in original[op.old_start..op.old_end].iter().enumerate() {
                    records.push(EditRecord::new(
                        para.as_ref(),
                        "",
                        op.old_start + k,
                        DELETED_SUMMARY.to_string(),
                    ));
                }
            }
            OpTag::Insert => {
                for (k, para) in edited[op.new_start..op.new_end].iter().enumerate() {
                    records.push(EditRecord::new(
                        "",
                        para.as_ref(),
                        op.old_start + k,
                        INSERTED_SUMMARY.to_string(),
                    ));
                }
            }
        }
    }

    records
}

/// Render a unified-diff style summary of two paragraphs.
///
/// The `---`/`+++` file headers are omitted; hunk headers (`@@ -a,b +c,d @@`)
/// and ` `/`-`/`+` prefixed lines are kept, each with trailing whitespace
/// removed, joined by `\n`. Identical inputs produce an empty string.
///
/// Lines are compared without their terminators, so appending a line to
/// `"one\ntwo"` yields ` one`, ` two`, `+three` rather than the
/// `-two`/`+two` pair a terminator-preserving diff would report.
pub fn diff_summary(original: &str, edited: &str) -> String {
    let old_lines: Vec<&str> = original.lines().collect();
    let new_lines: Vec<&str> = edited.lines().collect();

    let mut out: Vec<String> = Vec::new();
    for group in grouped_opcodes(&old_lines, &new_lines, DIFF_CONTEXT_LINES) {
        let (Some(first), Some(last)) = (group.first(), group.last()) else {
            continue;
        };
        out.push(format!(
            "@@ -{} +{} @@",
            format_range(first.old_start, last.old_end),
            format_range(first.new_start, last.new_end)
        ));
        for op in &group {
            if op.tag == OpTag::Equal {
                for line in &old_lines[op.old_start..op.old_end] {
                    out.push(format!(" {}", line).trim_end().to_string());
                }
                continue;
            }
            if matches!(op.tag, OpTag::Replace | OpTag::Delete) {
                for line in &old_lines[op.old_start..op.old_end] {
                    out.push(format!("-{}", line).trim_end().to_string());
                }
            }
            if matches!(op.tag, OpTag::Replace | OpTag::Insert) {
                for line in &new_lines[op.new_start..op.new_end] {
                    out.push(format!("+{}", line).trim_end().to_string());
                }
            }
        }
    }
    out.join("\n")
}

/// Hunk range in unified-diff notation: `start` for one line, `start,len`
/// otherwise, and `start-1,0` for an empty range.
fn format_range(start: usize, stop: usize) -> String {
    let len = stop - start;
    match len {
        1 => format!("{}", start + 1),
        0 => format!("{},0", start),
        _ => format!("{},{}", start + 1, len),
    }
}
