//! Fuzzy string similarity scores on a 0-100 scale
//!
//! Both scores are case-sensitive and compare Unicode scalar values; callers
//! that want case folding must fold before calling.

mod matcher;

pub use matcher::{MatchingBlock, SequenceMatcher};

/// Ratios above this are reported as a perfect score
const PERFECT_RATIO: f64 = 0.995;

/// Whole-string similarity
///
/// Identical strings score 100, otherwise an empty string scores 0.
pub fn ratio(s1: &str, s2: &str) -> u8 {
    if s1 == s2 {
        return 100;
    }
    if s1.is_empty() || s2.is_empty() {
        return 0;
    }

    let a: Vec<char> = s1.chars().collect();
    let b: Vec<char> = s2.chars().collect();
    to_score(SequenceMatcher::new(&a, &b).ratio())
}

/// Best similarity between the shorter string and any equally long window
/// of the longer one
///
/// A query that is a substring of a much longer candidate (or the reverse)
/// scores 100. Windows are anchored on the matching blocks between the two
/// strings rather than slid over every offset.
pub fn partial_ratio(s1: &str, s2: &str) -> u8 {
    if s1 == s2 {
        return 100;
    }
    if s1.is_empty() || s2.is_empty() {
        return 0;
    }

    let a: Vec<char> = s1.chars().collect();
    let b: Vec<char> = s2.chars().collect();
    let (shorter, longer) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };

    let mut best = 0.0_f64;
    for block in SequenceMatcher::new(shorter, longer).matching_blocks() {
        let start = block.b.saturating_sub(block.a);
        let end = (start + shorter.len()).min(longer.len());
        let window = &longer[start..end];

        let window_ratio = SequenceMatcher::new(shorter, window).ratio();
        if window_ratio > PERFECT_RATIO {
            return 100;
        }
        best = best.max(window_ratio);
    }

    to_score(best)
}

/// Scale to 0-100, rounding halves to even
fn to_score(ratio: f64) -> u8 {
    (100.0 * ratio).round_ties_even().clamp(0.0, 100.0) as u8
}
