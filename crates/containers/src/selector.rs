//! Top-K selection over (identifier, score) pairs.
//!
//! Every "most rated" / "highest average" / "most credited" query funnels
//! through here: build one [`RankPair`] per candidate, then [`top_k`] sorts
//! the pairs descending by score and returns the leading identifiers.
//!
//! Ordering is deterministic: equal scores tie-break on ascending
//! identifier, so repeated queries over the same data agree.

use std::cmp::Ordering;

/// An identifier paired with the score it is ranked by.
///
/// Lives only for the duration of one ranking query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankPair<K> {
    pub id: K,
    pub score: f64,
}

impl<K> RankPair<K> {
    pub fn new(id: K, score: f64) -> Self {
        Self { id, score }
    }
}

/// Sorts `pairs` descending by score and returns the first
/// `min(n, pairs.len())` identifiers.
///
/// The clamp is part of the contract: asking for more results than exist
/// yields everything, never an out-of-bounds access.
pub fn top_k<K: Copy + Ord>(mut pairs: Vec<RankPair<K>>, n: usize) -> Vec<K> {
    if pairs.len() > 1 {
        let high = pairs.len() - 1;
        quick_sort(&mut pairs, 0, high);
    }
    let take = n.min(pairs.len());
    pairs[..take].iter().map(|pair| pair.id).collect()
}

/// `Less` means `a` ranks ahead of `b`: higher score first, ties broken by
/// ascending identifier. Scores are never NaN in practice; a NaN compares
/// as equal and falls through to the identifier.
fn rank_order<K: Ord>(a: &RankPair<K>, b: &RankPair<K>) -> Ordering {
    b.score
        .partial_cmp(&a.score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.id.cmp(&b.id))
}

fn quick_sort<K: Copy + Ord>(pairs: &mut [RankPair<K>], low: usize, high: usize) {
    if low < high {
        let pivot = partition(pairs, low, high);
        if pivot > low {
            quick_sort(pairs, low, pivot - 1);
        }
        quick_sort(pairs, pivot + 1, high);
    }
}

/// Lomuto partition with a median-of-three pivot: elements ranking no later
/// than the pivot move to the front, the pivot lands at the boundary.
fn partition<K: Copy + Ord>(pairs: &mut [RankPair<K>], low: usize, high: usize) -> usize {
    median_into_high(pairs, low, high);
    let mut boundary = low;
    for j in low..high {
        let ahead = {
            let pivot = pairs[high];
            rank_order(&pairs[j], &pivot) != Ordering::Greater
        };
        if ahead {
            pairs.swap(boundary, j);
            boundary += 1;
        }
    }
    pairs.swap(boundary, high);
    boundary
}

/// Places the median of `pairs[low]`, the middle element and `pairs[high]`
/// at `high`, where the partition expects its pivot.
fn median_into_high<K: Copy + Ord>(pairs: &mut [RankPair<K>], low: usize, high: usize) {
    let mid = low + (high - low) / 2;
    if rank_order(&pairs[mid], &pairs[low]) == Ordering::Less {
        pairs.swap(mid, low);
    }
    if rank_order(&pairs[high], &pairs[low]) == Ordering::Less {
        pairs.swap(high, low);
    }
    if rank_order(&pairs[high], &pairs[mid]) == Ordering::Less {
        pairs.swap(high, mid);
    }
    pairs.swap(mid, high);
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn pairs_of(items: &[(i32, f64)]) -> Vec<RankPair<i32>> {
        items.iter().map(|(id, score)| RankPair::new(*id, *score)).collect()
    }

    #[test]
    fn test_top_k_descending() {
        let pairs = pairs_of(&[(1, 2.0), (2, 9.0), (3, 5.0), (4, 7.0)]);
        assert_eq!(top_k(pairs, 3), vec![2, 4, 3]);
    }

    #[test]
    fn test_request_clamped_to_available() {
        let pairs = pairs_of(&[(1, 1.0), (2, 2.0)]);
        assert_eq!(top_k(pairs, 10), vec![2, 1]);
        assert_eq!(top_k::<i32>(Vec::new(), 5), Vec::<i32>::new());
    }

    #[test]
    fn test_zero_requested() {
        let pairs = pairs_of(&[(1, 1.0)]);
        assert_eq!(top_k(pairs, 0), Vec::<i32>::new());
    }

    #[test]
    fn test_equal_scores_tie_break_by_id() {
        let pairs = pairs_of(&[(9, 3.0), (1, 3.0), (5, 3.0), (3, 8.0)]);
        assert_eq!(top_k(pairs, 4), vec![3, 1, 5, 9]);
    }

    #[test]
    fn test_already_sorted_input() {
        // adversarial case for a last-element pivot; median-of-three keeps
        // the recursion shallow
        let pairs: Vec<RankPair<i32>> = (0..500).map(|i| RankPair::new(i, i as f64)).collect();
        let ranked = top_k(pairs, 5);
        assert_eq!(ranked, vec![499, 498, 497, 496, 495]);
    }

    proptest! {
        #[test]
        fn prop_matches_stable_sort(scores in proptest::collection::vec(0u8..50, 0..120), n in 0usize..150) {
            let pairs: Vec<RankPair<i32>> = scores
                .iter()
                .enumerate()
                .map(|(id, s)| RankPair::new(id as i32, *s as f64))
                .collect();

            let mut expected: Vec<RankPair<i32>> = pairs.clone();
            expected.sort_by(rank_order);
            let expected: Vec<i32> = expected.iter().take(n.min(pairs.len())).map(|p| p.id).collect();

            prop_assert_eq!(top_k(pairs, n), expected);
        }
    }
}
