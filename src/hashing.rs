//! Stable hashing for natural capabilities and the per-rule hash aggregate.
//!
//! Everything that produces a hash code goes through this module, so the
//! backing algorithm can be swapped in one place.

use std::hash::{Hash, Hasher};

use twox_hash::XxHash64;

/// Seed fixed at zero so hash codes are identical across runs and processes.
const SEED: u64 = 0;

pub(crate) struct StableHasher(XxHash64);

impl Default for StableHasher {
    fn default() -> Self {
        Self(XxHash64::with_seed(SEED))
    }
}

impl Hasher for StableHasher {
    fn write(&mut self, bytes: &[u8]) {
        self.0.write(bytes);
    }

    fn finish(&self) -> u64 {
        self.0.finish()
    }
}

/// Hash any `Hash` value with the crate's stable hasher.
///
/// This is what [`Natural`](crate::Natural) uses; custom capabilities can
/// call it to stay consistent with the built-in ones.
#[must_use]
pub fn stable_hash<V: Hash + ?Sized>(value: &V) -> u64 {
    let mut hasher = StableHasher::default();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Fold the contribution of the rule at `index` into the running aggregate.
///
/// Contribution `i` is rotated left by `i` bits (modulo the word width)
/// before being XORed in, so transposed member values rarely collide.
pub(crate) fn fold(acc: u64, index: usize, contribution: u64) -> u64 {
    let places = (index % u64::BITS as usize) as u32;
    acc ^ contribution.rotate_left(places)
}
