//! Source of randomness for reviewer selection.

use rand::Rng;

/// Caller-driven shuffle primitive.
///
/// Implementations permute an index space of size `n` by calling `swap(i, j)`.
/// The caller owns the data and performs the actual swaps.
pub trait Randomizer: Send + Sync {
    fn shuffle(&self, n: usize, swap: &mut dyn FnMut(usize, usize));
}

/// Fisher-Yates shuffle backed by the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandomizer;

impl Randomizer for ThreadRandomizer {
    fn shuffle(&self, n: usize, swap: &mut dyn FnMut(usize, usize)) {
        let mut rng = rand::rng();
        for i in (1..n).rev() {
            let j = rng.random_range(0..=i);
            swap(i, j);
        }
    }
}
