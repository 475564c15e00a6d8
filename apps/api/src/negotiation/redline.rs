//! Word-level redline between an original clause and its revision.
//!
//! Tokens are whitespace-separated words, aligned with a longest-common-subsequence
//! table. Adjacent tokens of the same kind are merged into one segment.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Equal,
    Removed,
    Added,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedlineSegment {
    pub kind: SegmentKind,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Redline {
    pub segments: Vec<RedlineSegment>,
    original_tokens: usize,
    revised_tokens: usize,
    equal_tokens: usize,
}

impl Redline {
    /// `[-removed-]` and `{+added+}` markers around changed words.
    pub fn to_marked_text(&self) -> String {
        self.segments
            .iter()
            .map(|s| match s.kind {
                SegmentKind::Equal => s.text.clone(),
                SegmentKind::Removed => format!("[-{}-]", s.text),
                SegmentKind::Added => format!("{{+{}+}}", s.text),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Share of unchanged words (1.0 = identical, 0.0 = nothing in common).
    pub fn similarity(&self) -> f64 {
        let total = self.original_tokens.max(self.revised_tokens);
        if total == 0 {
            return 1.0;
        }
        self.equal_tokens as f64 / total as f64
    }

    pub fn has_changes(&self) -> bool {
        self.segments.iter().any(|s| s.kind != SegmentKind::Equal)
    }
}

pub fn redline(original: &str, revised: &str) -> Redline {
    let left: Vec<&str> = original.split_whitespace().collect();
    let right: Vec<&str> = revised.split_whitespace().collect();

    let mut segments: Vec<RedlineSegment> = Vec::new();
    let mut equal_tokens = 0;

    for (kind, token) in align(&left, &right) {
        if kind == SegmentKind::Equal {
            equal_tokens += 1;
        }
        match segments.last_mut() {
            Some(last) if last.kind == kind => {
                last.text.push(' ');
                last.text.push_str(token);
            }
            _ => segments.push(RedlineSegment {
                kind,
                text: token.to_string(),
            }),
        }
    }

    Redline {
        segments,
        original_tokens: left.len(),
        revised_tokens: right.len(),
        equal_tokens,
    }
}

/// LCS alignment. Within a changed run, removals are emitted before additions.
/// The shared prefix and suffix are matched directly; only the middle gets a table.
fn align<'a>(left: &[&'a str], right: &[&'a str]) -> Vec<(SegmentKind, &'a str)> {
    let prefix = left
        .iter()
        .zip(right)
        .take_while(|(l, r)| l == r)
        .count();
    let suffix = left[prefix..]
        .iter()
        .rev()
        .zip(right[prefix..].iter().rev())
        .take_while(|(l, r)| l == r)
        .count();

    let mut ops = Vec::with_capacity(left.len() + right.len());
    ops.extend(left[..prefix].iter().map(|t| (SegmentKind::Equal, *t)));
    align_middle(
        &left[prefix..left.len() - suffix],
        &right[prefix..right.len() - suffix],
        &mut ops,
    );
    ops.extend(left[left.len() - suffix..].iter().map(|t| (SegmentKind::Equal, *t)));
    ops
}

fn align_middle<'a>(left: &[&'a str], right: &[&'a str], ops: &mut Vec<(SegmentKind, &'a str)>) {
    let n = left.len();
    let m = right.len();

    // dp[i][j] = LCS length of left[i..] and right[j..]
    let mut dp = vec![vec![0usize; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            dp[i][j] = if left[i] == right[j] {
                dp[i + 1][j + 1] + 1
            } else {
                dp[i + 1][j].max(dp[i][j + 1])
            };
        }
    }

    let (mut i, mut j) = (0, 0);
    while i < n || j < m {
        if i < n && j < m && left[i] == right[j] {
            ops.push((SegmentKind::Equal, left[i]));
            i += 1;
            j += 1;
        } else if i < n && (j == m || dp[i + 1][j] >= dp[i][j + 1]) {
            ops.push((SegmentKind::Removed, left[i]));
            i += 1;
        } else {
            ops.push((SegmentKind::Added, right[j]));
            j += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_texts_have_no_changes() {
        let r = redline("Supplier shall deliver", "Supplier  shall\ndeliver");
        assert!(!r.has_changes());
        assert_eq!(r.similarity(), 1.0);
        assert_eq!(r.to_marked_text(), "Supplier shall deliver");
    }

    #[test]
    fn test_replaced_word_is_marked() {
        let r = redline(
            "Supplier shall deliver within 60 days",
            "Supplier shall deliver within 30 days",
        );
        assert_eq!(
            r.to_marked_text(),
            "Supplier shall deliver within [-60-] {+30+} days"
        );
        assert!((r.similarity() - 5.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_appended_words_are_merged() {
        let r = redline("Fees are due", "Fees are due within thirty days");
        assert_eq!(r.segments.len(), 2);
        assert_eq!(r.segments[1].kind, SegmentKind::Added);
        assert_eq!(r.segments[1].text, "within thirty days");
    }

    #[test]
    fn test_removed_words() {
        let r = redline("Liability is uncapped for all claims", "Liability is capped");
        assert!(r.has_changes());
        assert!(r
            .segments
            .iter()
            .any(|s| s.kind == SegmentKind::Removed && s.text.contains("uncapped")));
        assert!(r.similarity() >= 0.0 && r.similarity() <= 1.0);
    }

    #[test]
    fn test_long_shared_context_around_small_edit() {
        let head = "word ".repeat(20_000);
        let tail = " end".repeat(20_000);
        let original = format!("{head}sixty{tail}");
        let revised = format!("{head}thirty{tail}");

        let r = redline(&original, &revised);
        assert_eq!(r.segments.len(), 4);
        assert_eq!(r.segments[1].text, "sixty");
        assert_eq!(r.segments[1].kind, SegmentKind::Removed);
        assert_eq!(r.segments[2].text, "thirty");
        assert_eq!(r.segments[2].kind, SegmentKind::Added);
    }

    #[test]
    fn test_overlapping_prefix_and_suffix() {
        let r = redline("a b a", "a b a b a");
        assert_eq!(r.to_marked_text(), "a b a {+b a+}");
        assert!((r.similarity() - 3.0 / 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_inputs() {
        let r = redline("", "");
        assert!(r.segments.is_empty());
        assert_eq!(r.similarity(), 1.0);

        let r = redline("", "New clause");
        assert_eq!(r.to_marked_text(), "{+New clause+}");
        assert_eq!(r.similarity(), 0.0);
    }
}
