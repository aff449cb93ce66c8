//! Unbiased shuffling.

use rand::Rng;

/// Return a uniformly random permutation of `items` (backward Fisher–Yates).
///
/// The input is left untouched; the result is a freshly allocated buffer.
pub fn shuffled<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut out = items.to_vec();
    shuffle_in_place(&mut out, rng);
    out
}

/// Fisher–Yates over an owned buffer.
pub fn shuffle_in_place<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}
