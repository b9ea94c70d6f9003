//! Fuzzy string similarity.
//!
//! Implements the Ratcliff/Obershelp "gestalt pattern matching" ratio: find
//! the longest common block, recurse on the unmatched pieces to its left and
//! right, and score `2 * matched / total_len`. Block search follows the
//! classic `difflib` procedure, including its popular-element heuristic for
//! long second operands.

use std::collections::HashMap;

/// Second-operand length from which popular characters stop seeding matches.
const POPULAR_MIN_LEN: usize = 200;

/// Similarity ratio between two strings in `[0.0, 1.0]`.
///
/// Operates on Unicode scalar values. Two empty strings are identical (1.0);
/// strings sharing no character score 0.0.
///
/// # Example
/// ```
/// use autodiag_search::similarity_ratio;
///
/// assert_eq!(similarity_ratio("abcd", "bcde"), 0.75);
/// assert_eq!(similarity_ratio("moteur", "moteur"), 1.0);
/// ```
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    let matched = BlockMatcher::new(&a, &b).matched_len();
    2.0 * matched as f64 / total as f64
}

/// Matching-block search over two character sequences.
struct BlockMatcher<'a> {
    a: &'a [char],
    b: &'a [char],
    /// Positions of each character of `b`, popular characters excluded.
    b2j: HashMap<char, Vec<usize>>,
}

impl<'a> BlockMatcher<'a> {
    fn new(a: &'a [char], b: &'a [char]) -> Self {
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, &ch) in b.iter().enumerate() {
            b2j.entry(ch).or_default().push(j);
        }

        if b.len() >= POPULAR_MIN_LEN {
            let limit = b.len() / 100 + 1;
            b2j.retain(|_, positions| positions.len() <= limit);
        }

        Self { a, b, b2j }
    }

    /// Total number of characters covered by matching blocks.
    fn matched_len(&self) -> usize {
        let mut matched = 0;
        let mut pending = vec![(0, self.a.len(), 0, self.b.len())];

        while let Some((alo, ahi, blo, bhi)) = pending.pop() {
            let (i, j, size) = self.longest_match(alo, ahi, blo, bhi);
            if size == 0 {
                continue;
            }
            matched += size;
            if alo < i && blo < j {
                pending.push((alo, i, blo, j));
            }
            if i + size < ahi && j + size < bhi {
                pending.push((i + size, ahi, j + size, bhi));
            }
        }

        matched
    }

    /// Longest block `a[i..i+size] == b[j..j+size]` inside the given windows.
    ///
    /// Ties go to the block starting earliest in `a`, then earliest in `b`.
    fn longest_match(
        &self,
        alo: usize,
        ahi: usize,
        blo: usize,
        bhi: usize,
    ) -> (usize, usize, usize) {
        let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
        let mut run_at: HashMap<usize, usize> = HashMap::new();

        for i in alo..ahi {
            let mut next_run_at = HashMap::new();
            if let Some(positions) = self.b2j.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| run_at.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next_run_at.insert(j, k);
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            run_at = next_run_at;
        }

        // Popular characters never seed a block but may extend one.
        while best_i > alo && best_j > blo && self.a[best_i - 1] == self.b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_size += 1;
        }
        while best_i + best_size < ahi
            && best_j + best_size < bhi
            && self.a[best_i + best_size] == self.b[best_j + best_size]
        {
            best_size += 1;
        }

        (best_i, best_j, best_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_identical() {
        assert_eq!(similarity_ratio("voyant moteur", "voyant moteur"), 1.0);
    }

    #[test]
    fn test_both_empty() {
        assert_eq!(similarity_ratio("", ""), 1.0);
    }

    #[test]
    fn test_one_empty() {
        assert_eq!(similarity_ratio("abc", ""), 0.0);
        assert_eq!(similarity_ratio("", "abc"), 0.0);
    }

    #[test]
    fn test_disjoint() {
        assert_eq!(similarity_ratio("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_known_values() {
        assert!(approx(similarity_ratio("abcd", "bcde"), 0.75));
        // difflib: SequenceMatcher(None, "abxcd", "abcd").ratio()
        assert!(approx(similarity_ratio("abxcd", "abcd"), 8.0 / 9.0));
        // One block "ab" then nothing matches on the right window.
        assert!(approx(similarity_ratio("ab", "abab"), 4.0 / 6.0));
    }

    #[test]
    fn test_recurses_both_sides() {
        // Longest block "cd", then "ab" on the left and "ef" on the right.
        assert!(approx(similarity_ratio("abXcdYef", "abZcdWef"), 12.0 / 16.0));
    }

    #[test]
    fn test_multibyte_chars() {
        assert!(approx(similarity_ratio("été", "ete"), 2.0 / 6.0));
    }

    #[test]
    fn test_long_operand_with_popular_chars() {
        let b = "a".repeat(250);
        let a = "a".repeat(10);
        // "a" is popular in b and cannot seed a block; the empty block at the
        // window start is still extended over the shared prefix.
        assert!(approx(similarity_ratio(&a, &b), 20.0 / 260.0));

        let b = format!("x{}", "a".repeat(250));
        let a = format!("x{}", "a".repeat(10));
        // "x" seeds the block and the popular "a"s extend it.
        assert!(approx(similarity_ratio(&a, &b), 22.0 / 262.0));
    }

    proptest! {
        #[test]
        fn prop_bounded(a in "[a-e ]{0,30}", b in "[a-e ]{0,30}") {
            let r = similarity_ratio(&a, &b);
            prop_assert!((0.0..=1.0).contains(&r));
        }

        #[test]
        fn prop_self_is_one(a in "[a-z ]{0,40}") {
            prop_assert_eq!(similarity_ratio(&a, &a), 1.0);
        }
    }
}
