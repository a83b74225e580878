use rand::Rng;

/// Source of randomness for name suffixes and zone picks.
pub trait Entropy {
    /// A uniformly random integer in `0..bound`. `bound` must be non-zero.
    fn below(&mut self, bound: usize) -> usize;
}

/// Thread-local RNG from `rand`.
pub struct ThreadEntropy;

impl Entropy for ThreadEntropy {
    fn below(&mut self, bound: usize) -> usize {
        rand::thread_rng().gen_range(0..bound)
    }
}
