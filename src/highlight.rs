//! Highlight engine
//!
//! Given the ordered textual snapshots of one expression (symbolic, substituted,
//! resolved), computes which character positions of each snapshot changed
//! relative to the one before it. The final snapshot is always highlighted in
//! full: it marks the result rather than a change.
//!
//! [`pairwise_diff`] is a two-cursor walk, not a general LCS. It assumes one
//! substituted region per token and resynchronizes on the first character of
//! `pre` that follows the replaced token. Its output on ambiguous inputs is
//! pinned by the tests below and must not be "improved".

use tracing::trace;

/// Sorted character positions within a snapshot
pub type Highlight = Vec<usize>;

/// Positions in `cur` that replaced a token of `pre`
pub fn pairwise_diff(pre: &str, cur: &str) -> Highlight {
    let pre: Vec<char> = pre.chars().collect();
    let cur: Vec<char> = cur.chars().collect();
    let mut highlight = Vec::new();
    let (mut p, mut c) = (0, 0);

    while c < cur.len() || p < pre.len() {
        if p + 1 < pre.len() && c < cur.len() && pre[p] != cur[c] {
            // Skip the replaced anchor and collect until both sides agree again
            p += 1;
            while c < cur.len() && pre[p] != cur[c] {
                highlight.push(c);
                c += 1;
            }
        } else {
            if p < pre.len() {
                p += 1;
            }
            if c < cur.len() {
                c += 1;
            }
        }
    }

    highlight
}

/// One highlight per snapshot; the last one covers the whole snapshot
pub fn diff_sequence<S: AsRef<str>>(snapshots: &[S]) -> Vec<Highlight> {
    let Some((last, earlier)) = snapshots.split_last() else {
        return Vec::new();
    };

    let mut highlights = Vec::with_capacity(snapshots.len());
    let mut pre = snapshots[0].as_ref();
    for cur in earlier {
        let cur = cur.as_ref();
        let highlight = pairwise_diff(pre, cur);
        trace!(pre, cur, ?highlight, "pairwise diff");
        highlights.push(highlight);
        pre = cur;
    }
    highlights.push((0..last.as_ref().chars().count()).collect());

    highlights
}

/// The characters of `text` selected by `highlight`, in order
pub fn render(text: &str, highlight: &[usize]) -> String {
    text.chars()
        .enumerate()
        .filter(|(i, _)| highlight.contains(i))
        .map(|(_, ch)| ch)
        .collect()
}

/// Split `text` into runs of plain and highlighted characters
pub fn segments(text: &str, highlight: &[usize]) -> Vec<(String, bool)> {
    let mut segments: Vec<(String, bool)> = Vec::new();
    for (i, ch) in text.chars().enumerate() {
        let marked = highlight.contains(&i);
        match segments.last_mut() {
            Some((run, run_marked)) if *run_marked == marked => run.push(ch),
            _ => segments.push((ch.to_string(), marked)),
        }
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_to_literal() {
        assert_eq!(pairwise_diff("a + b", "10 + 20"), vec![0, 1]);
    }

    #[test]
    fn test_expression_to_result() {
        assert_eq!(pairwise_diff("10 + 20", "30"), vec![0]);
    }

    #[test]
    fn test_identical_snapshots() {
        assert_eq!(pairwise_diff("1 + 2", "1 + 2"), Vec::<usize>::new());
        assert_eq!(pairwise_diff("", ""), Vec::<usize>::new());
    }

    #[test]
    fn test_last_token_is_never_highlighted() {
        // No character follows `y` in `pre`, so there is nothing to resync on
        assert_eq!(pairwise_diff("x * y", "5 * 5"), vec![0]);
        assert_eq!(pairwise_diff("a", "42"), Vec::<usize>::new());
    }

    #[test]
    fn test_substitution_containing_anchor_character() {
        // The tuple value contains a space, which is also the resync anchor
        assert_eq!(pairwise_diff("t + 1", "(1, 2) + 1"), vec![0, 1, 2, 4, 5]);
    }

    #[test]
    fn test_diff_sequence_three_stages() {
        assert_eq!(
            diff_sequence(&["a + b", "10 + 20", "30"]),
            vec![vec![], vec![0, 1], vec![0, 1]]
        );
    }

    #[test]
    fn test_diff_sequence_two_stages() {
        assert_eq!(diff_sequence(&["1 + 2", "3"]), vec![vec![], vec![0]]);
    }

    #[test]
    fn test_diff_sequence_single_snapshot_is_fully_highlighted() {
        assert_eq!(diff_sequence(&["2.5"]), vec![vec![0, 1, 2]]);
        assert_eq!(diff_sequence::<&str>(&[]), Vec::<Highlight>::new());
    }

    #[test]
    fn test_render() {
        assert_eq!(render("10 + 20", &[0, 1]), "10");
        assert_eq!(render("(1, 2) + 1", &[0, 1, 2, 4, 5]), "(1,2)");
        assert_eq!(render("abc", &[]), "");
    }

    #[test]
    fn test_segments() {
        assert_eq!(
            segments("10 + 20", &[0, 1]),
            vec![("10".to_string(), true), (" + 20".to_string(), false)]
        );
    }
}
