use rand::rngs::{StdRng, ThreadRng};
use rand::seq::IteratorRandom;

/// A source of uniform random choices.
///
/// Every random decision the bag makes goes through this trait, so a seeded generator (or a
/// scripted one in tests) makes the game reproducible. Sampling without replacement is done by
/// the caller removing each picked element before picking again.
pub trait RandomSource {
    /// Returns an index in `0..len`, chosen uniformly.
    ///
    /// `len` is never zero when called by this crate.
    fn pick_index(&mut self, len: usize) -> usize;

    /// Returns a uniformly chosen element of `items`, or `None` if it is empty.
    fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T>
    where
        Self: Sized,
    {
        if items.is_empty() {
            None
        } else {
            items.get(self.pick_index(items.len()))
        }
    }
}

impl RandomSource for StdRng {
    fn pick_index(&mut self, len: usize) -> usize {
        (0..len).choose(self).unwrap_or(0)
    }
}

impl RandomSource for ThreadRng {
    fn pick_index(&mut self, len: usize) -> usize {
        (0..len).choose(self).unwrap_or(0)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn pick_index(&mut self, len: usize) -> usize {
        (**self).pick_index(len)
    }
}
