//! Generic sequence alignment.
//!
//! Computes a longest-common-subsequence alignment between two sequences
//! of any `PartialEq` element type and expresses it as a list of
//! [`Opcode`]s: runs of `Equal`, `Replace`, `Delete` and `Insert` covering
//! both sequences from start to end without gaps.
//!
//! Adjacent deletions and insertions that fall between the same pair of
//! matched runs are reported as a single `Replace`, so the opcode stream
//! alternates between `Equal` and one non-equal run.
//!
//! # Example
//!
//! ```rust
//! use style_editor_core::sequence::{opcodes, OpTag};
//!
//! let a = ["keep", "drop", "keep2"];
//! let b = ["keep", "keep2"];
//! let ops = opcodes(&a, &b);
//! let tags: Vec<OpTag> = ops.iter().map(|op| op.tag).collect();
//! assert_eq!(tags, vec![OpTag::Equal, OpTag::Delete, OpTag::Equal]);
//! ```

/// Kind of alignment run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpTag {
    /// `a[old_start..old_end] == b[new_start..new_end]`
    Equal,
    /// `a[old_start..old_end]` was replaced by `b[new_start..new_end]`
    Replace,
    /// `a[old_start..old_end]` was removed; the new range is empty
    Delete,
    /// `b[new_start..new_end]` was added; the old range is empty
    Insert,
}

/// One alignment run over half-open ranges of both sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    pub tag: OpTag,
    pub old_start: usize,
    pub old_end: usize,
    pub new_start: usize,
    pub new_end: usize,
}

impl Opcode {
    fn new(tag: OpTag, old_start: usize, old_end: usize, new_start: usize, new_end: usize) -> Self {
        Self {
            tag,
            old_start,
            old_end,
            new_start,
            new_end,
        }
    }

    /// Length of the run on the original side.
    pub fn old_len(&self) -> usize {
        self.old_end - self.old_start
    }

    /// Length of the run on the edited side.
    pub fn new_len(&self) -> usize {
        self.new_end - self.new_start
    }
}

/// A maximal run of matching elements: `a[old..old+len] == b[new..new+len]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchingBlock {
    pub old: usize,
    pub new: usize,
    pub len: usize,
}

/// Compute the matching blocks of an LCS alignment between `a` and `b`.
///
/// Blocks are ordered and non-overlapping on both sides. Common prefix and
/// suffix are matched directly before the quadratic LCS table is built for
/// the remaining middle section.
pub fn matching_blocks<T: PartialEq>(a: &[T], b: &[T]) -> Vec<MatchingBlock> {
    let prefix = a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count();
    let suffix = a[prefix..]
        .iter()
        .rev()
        .zip(b[prefix..].iter().rev())
        .take_while(|(x, y)| x == y)
        .count();

    let mid_a = &a[prefix..a.len() - suffix];
    let mid_b = &b[prefix..b.len() - suffix];

    let mut pairs: Vec<(usize, usize)> = (0..prefix).map(|i| (i, i)).collect();
    pairs.extend(
        longest_common_subsequence(mid_a, mid_b)
            .into_iter()
            .map(|(i, j)| (i + prefix, j + prefix)),
    );
    pairs.extend((0..suffix).map(|k| (a.len() - suffix + k, b.len() - suffix + k)));

    let mut blocks: Vec<MatchingBlock> = Vec::new();
    for (i, j) in pairs {
        match blocks.last_mut() {
            Some(last) if last.old + last.len == i && last.new + last.len == j => last.len += 1,
            _ => blocks.push(MatchingBlock {
                old: i,
                new: j,
                len: 1,
            }),
        }
    }
    blocks
}

/// Align `a` and `b` and describe the result as contiguous opcodes.
///
/// Two empty sequences produce no opcodes. Identical sequences produce a
/// single `Equal` run.
pub fn opcodes<T: PartialEq>(a: &[T], b: &[T]) -> Vec<Opcode> {
    let mut blocks = matching_blocks(a, b);
    blocks.push(MatchingBlock {
        old: a.len(),
        new: b.len(),
        len: 0,
    });

    let mut ops = Vec::new();
    let (mut i, mut j) = (0, 0);

    for block in blocks {
        let tag = match (i < block.old, j < block.new) {
            (true, true) => Some(OpTag::Replace),
            (true, false) => Some(OpTag::Delete),
            (false, true) => Some(OpTag::Insert),
            (false, false) => None,
        };
        if let Some(tag) = tag {
            ops.push(Opcode::new(tag, i, block.old, j, block.new));
        }
        i = block.old + block.len;
        j = block.new + block.len;
        if block.len > 0 {
            ops.push(Opcode::new(OpTag::Equal, block.old, i, block.new, j));
        }
    }
    ops
}

/// Group opcodes into hunks with up to `context` equal elements on each side.
///
/// Long equal runs between changes are split so that each hunk carries at
/// most `context` unchanged elements of lead-in and lead-out. Returns no
/// groups when the sequences are identical.
pub fn grouped_opcodes<T: PartialEq>(a: &[T], b: &[T], context: usize) -> Vec<Vec<Opcode>> {
    let mut codes = opcodes(a, b);
    if codes.is_empty() {
        codes.push(Opcode::new(OpTag::Equal, 0, 1, 0, 1));
    }

    if let Some(first) = codes.first_mut() {
        if first.tag == OpTag::Equal {
            first.old_start = first.old_start.max(first.old_end.saturating_sub(context));
            first.new_start = first.new_start.max(first.new_end.saturating_sub(context));
        }
    }
    if let Some(last) = codes.last_mut() {
        if last.tag == OpTag::Equal {
            last.old_end = last.old_end.min(last.old_start + context);
            last.new_end = last.new_end.min(last.new_start + context);
        }
    }

    let span = context * 2;
    let mut groups = Vec::new();
    let mut group: Vec<Opcode> = Vec::new();

    for mut op in codes {
        if op.tag == OpTag::Equal && op.old_len() > span {
            group.push(Opcode::new(
                OpTag::Equal,
                op.old_start,
                op.old_end.min(op.old_start + context),
                op.new_start,
                op.new_end.min(op.new_start + context),
            ));
            groups.push(std::mem::take(&mut group));
            op.old_start = op.old_start.max(op.old_end.saturating_sub(context));
            op.new_start = op.new_start.max(op.new_end.saturating_sub(context));
        }
        group.push(op);
    }

    let only_equal = group.len() == 1 && group[0].tag == OpTag::Equal;
    if !group.is_empty() && !only_equal {
        groups.push(group);
    }
    groups
}

fn longest_common_subsequence<T: PartialEq>(a: &[T], b: &[T]) -> Vec<(usize, usize)> {
    let n = a.len();
    let m = b.len();
    if n == 0 || m == 0 {
        return Vec::new();
    }

    // dp[i][j] = LCS length of a[..i] and b[..j]
    let mut dp = vec![vec![0usize; m + 1]; n + 1];
    for i in 1..=n {
        for j in 1..=m {
            dp[i][j] = if a[i - 1] == b[j - 1] {
                dp[i - 1][j - 1] + 1
            } else {
                dp[i - 1][j].max(dp[i][j - 1])
            };
        }
    }

    let mut lcs = Vec::with_capacity(dp[n][m]);
    let (mut i, mut j) = (n, m);
    while i > 0 && j > 0 {
        if a[i - 1] == b[j - 1] {
            lcs.push((i - 1, j - 1));
            i -= 1;
            j -= 1;
        } else if dp[i - 1][j] >= dp[i][j - 1] {
            i -= 1;
        } else {
            j -= 1;
        }
    }
    lcs.reverse();
    lcs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(ops: &[Opcode]) -> Vec<OpTag> {
        ops.iter().map(|op| op.tag).collect()
    }

    #[test]
    fn test_both_empty() {
        let empty: [&str; 0] = [];
        assert!(opcodes(&empty, &empty).is_empty());
        assert!(grouped_opcodes(&empty, &empty, 3).is_empty());
    }

    #[test]
    fn test_identical_single_equal() {
        let a = ["x", "y", "z"];
        let ops = opcodes(&a, &a);
        assert_eq!(ops, vec![Opcode::new(OpTag::Equal, 0, 3, 0, 3)]);
    }

    #[test]
    fn test_pure_insert_and_delete() {
        let a = ["first", "third"];
        let b = ["first", "second", "third"];
        let ops = opcodes(&a, &b);
        assert_eq!(tags(&ops), vec![OpTag::Equal, OpTag::Insert, OpTag::Equal]);
        assert_eq!(ops[1], Opcode::new(OpTag::Insert, 1, 1, 1, 2));

        let back = opcodes(&b, &a);
        assert_eq!(back[1], Opcode::new(OpTag::Delete, 1, 2, 1, 1));
    }

    #[test]
    fn test_adjacent_changes_become_replace() {
        let a = ["a", "b", "c"];
        let b = ["a", "x", "y", "c"];
        let ops = opcodes(&a, &b);
        assert_eq!(tags(&ops), vec![OpTag::Equal, OpTag::Replace, OpTag::Equal]);
        assert_eq!(ops[1], Opcode::new(OpTag::Replace, 1, 2, 1, 3));
    }

    #[test]
    fn test_one_side_empty() {
        let a = ["a", "b"];
        let empty: [&str; 0] = [];
        assert_eq!(opcodes(&a, &empty), vec![Opcode::new(OpTag::Delete, 0, 2, 0, 0)]);
        assert_eq!(opcodes(&empty, &a), vec![Opcode::new(OpTag::Insert, 0, 0, 0, 2)]);
    }

    #[test]
    fn test_opcodes_cover_both_sequences() {
        let a: Vec<char> = "the quick brown fox jumps".chars().collect();
        let b: Vec<char> = "a quick red fox leaps high".chars().collect();
        let ops = opcodes(&a, &b);

        let (mut i, mut j) = (0, 0);
        for op in &ops {
            assert_eq!(op.old_start, i);
            assert_eq!(op.new_start, j);
            if op.tag == OpTag::Equal {
                assert_eq!(&a[op.old_start..op.old_end], &b[op.new_start..op.new_end]);
            }
            i = op.old_end;
            j = op.new_end;
        }
        assert_eq!((i, j), (a.len(), b.len()));
    }

    #[test]
    fn test_lcs_is_longest() {
        let a = ["a", "b", "c", "d", "e"];
        let b = ["b", "x", "d", "e", "a"];
        let matched: usize = matching_blocks(&a, &b).iter().map(|m| m.len).sum();
        assert_eq!(matched, 3); // b, d, e
    }

    #[test]
    fn test_grouped_trims_context() {
        let a: Vec<u32> = (0..20).collect();
        let mut b = a.clone();
        b[10] = 99;
        let groups = grouped_opcodes(&a, &b, 3);
        assert_eq!(groups.len(), 1);
        let group = &groups[0];
        assert_eq!(group.first().map(|op| op.old_start), Some(7));
        assert_eq!(group.last().map(|op| op.old_end), Some(14));
    }

    #[test]
    fn test_grouped_splits_distant_changes() {
        let a: Vec<u32> = (0..30).collect();
        let mut b = a.clone();
        b[2] = 100;
        b[25] = 200;
        let groups = grouped_opcodes(&a, &b, 3);
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn test_grouped_identical_is_empty() {
        let a = ["same", "lines"];
        assert!(grouped_opcodes(&a, &a, 3).is_empty());
    }
}
