//! Longest-matching-block alignment between two character sequences
//!
//! Ratcliff/Obershelp style: find the longest common contiguous block, then
//! recurse on the pieces to its left and right. When the second sequence has
//! at least 200 elements, elements occurring in more than 1% of it (plus one)
//! are "popular" and never seed a match, although they may still extend one.
//! Scores computed on top of these blocks depend on this exact behaviour, so
//! tie-breaking follows the first-found, lowest-index rule throughout.

use std::collections::HashMap;

/// Sequences shorter than this never have popular elements
const POPULAR_MIN_LEN: usize = 200;

/// A run of `size` equal elements at `a[a..a + size]` and `b[b..b + size]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MatchingBlock {
    pub a: usize,
    pub b: usize,
    pub size: usize,
}

impl MatchingBlock {
    fn new(a: usize, b: usize, size: usize) -> Self {
        Self { a, b, size }
    }
}

/// Aligns `a` against `b`
#[derive(Debug)]
pub struct SequenceMatcher<'s> {
    a: &'s [char],
    b: &'s [char],
    /// Positions of each non-popular element of `b`, ascending
    b2j: HashMap<char, Vec<usize>>,
}

impl<'s> SequenceMatcher<'s> {
    pub fn new(a: &'s [char], b: &'s [char]) -> Self {
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, &c) in b.iter().enumerate() {
            b2j.entry(c).or_default().push(j);
        }

        if b.len() >= POPULAR_MIN_LEN {
            let limit = b.len() / 100 + 1;
            b2j.retain(|_, positions| positions.len() <= limit);
        }

        Self { a, b, b2j }
    }

    /// Longest block of `a[alo..ahi]` matching `b[blo..bhi]`
    ///
    /// Among equally long blocks the one starting earliest in `a` wins, then
    /// earliest in `b`. Returns a zero-sized block at `(alo, blo)` when
    /// nothing matches.
    pub fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> MatchingBlock {
        let (a, b) = (self.a, self.b);
        let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);

        // j2len[j] = length of the match ending at a[i - 1] and b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for (offset, c) in a[alo..ahi].iter().enumerate() {
            let i = alo + offset;
            let mut next_j2len = HashMap::new();
            if let Some(positions) = self.b2j.get(c) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next_j2len.insert(j, k);
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            j2len = next_j2len;
        }

        // Popular elements were left out of b2j; grow the block through them.
        while best_i > alo && best_j > blo && a[best_i - 1] == b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_size += 1;
        }
        while best_i + best_size < ahi
            && best_j + best_size < bhi
            && a[best_i + best_size] == b[best_j + best_size]
        {
            best_size += 1;
        }

        MatchingBlock::new(best_i, best_j, best_size)
    }

    /// All matching blocks in ascending order, adjacent blocks merged
    ///
    /// The last entry is always the zero-sized sentinel `(len(a), len(b), 0)`.
    pub fn matching_blocks(&self) -> Vec<MatchingBlock> {
        let (la, lb) = (self.a.len(), self.b.len());

        let mut pending = vec![(0, la, 0, lb)];
        let mut blocks = Vec::new();
        while let Some((alo, ahi, blo, bhi)) = pending.pop() {
            let block = self.find_longest_match(alo, ahi, blo, bhi);
            if block.size == 0 {
                continue;
            }
            blocks.push(block);
            if alo < block.a && blo < block.b {
                pending.push((alo, block.a, blo, block.b));
            }
            if block.a + block.size < ahi && block.b + block.size < bhi {
                pending.push((block.a + block.size, ahi, block.b + block.size, bhi));
            }
        }
        blocks.sort();

        let mut merged: Vec<MatchingBlock> = Vec::with_capacity(blocks.len() + 1);
        for block in blocks {
            if let Some(last) = merged.last_mut() {
                if last.a + last.size == block.a && last.b + last.size == block.b {
                    last.size += block.size;
                    continue;
                }
            }
            merged.push(block);
        }
        merged.push(MatchingBlock::new(la, lb, 0));
        merged
    }

    /// Similarity in `[0, 1]`: twice the matched elements over the total length
    pub fn ratio(&self) -> f64 {
        let total = self.a.len() + self.b.len();
        if total == 0 {
            return 1.0;
        }
        let matches: usize = self.matching_blocks().iter().map(|block| block.size).sum();
        2.0 * matches as f64 / total as f64
    }
}
