#![allow(dead_code)]
//! Fisher-Yates shuffle over a copy of the input

use rand::prelude::*;

/// Return a uniformly random permutation of `items` as a new vector.
/// The input slice is never modified.
pub fn shuffle<T: Clone>(items: &[T]) -> Vec<T> {
    shuffle_with_rng(items, &mut rand::rng())
}

/// Shuffle using a specific RNG (for testing/seeding).
///
/// Fisher-Yates: walk `i` from the last index down to 1, pick `j`
/// uniformly in `[0, i]`, swap.
pub fn shuffle_with_rng<T: Clone, R: Rng>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut shuffled = items.to_vec();
    for i in (1..shuffled.len()).rev() {
        let j = rng.random_range(0..=i);
        shuffled.swap(i, j);
    }
    shuffled
}
