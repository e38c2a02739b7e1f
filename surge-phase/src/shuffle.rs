//! Input shuffling between phases
//!
//! Uses the thread-local RNG; runs are not reproducible.

use rand::seq::SliceRandom;

/// In-place Fisher-Yates shuffle
pub fn shuffle<T>(items: &mut [T]) {
    items.shuffle(&mut rand::rng());
}

/// Shuffle when `enabled`, otherwise hand the input back untouched
pub fn shuffled<T>(mut items: Vec<T>, enabled: bool) -> Vec<T> {
    if enabled {
        shuffle(&mut items);
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut items: Vec<u32>) -> Vec<u32> {
        items.sort_unstable();
        items
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let original: Vec<u32> = (0..500).chain([7, 7, 7]).collect();
        for enabled in [true, false] {
            let result = shuffled(original.clone(), enabled);
            assert_eq!(result.len(), original.len());
            assert_eq!(sorted(result), sorted(original.clone()));
        }
    }

    #[test]
    fn test_disabled_keeps_order() {
        let original = vec!["a", "b", "c"];
        assert_eq!(shuffled(original.clone(), false), original);
    }

    #[test]
    fn test_trivial_inputs() {
        let mut empty: Vec<u8> = vec![];
        shuffle(&mut empty);
        assert!(empty.is_empty());

        assert_eq!(shuffled(vec![1], true), vec![1]);
    }
}
