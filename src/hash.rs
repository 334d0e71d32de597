//! Hash builders for keys.
//!
//! The table reduces every hash with `hash % capacity`, so any
//! [`BuildHasher`] works. Two are provided next to the std `RandomState`:
//! an identity hasher that makes placement predictable for integer keys and
//! a seeded xxh3 hasher for reproducible runs over arbitrary keys.

use std::hash::{BuildHasher, BuildHasherDefault, Hasher};

use xxhash_rust::xxh3::Xxh3;

/// Passes a single integer key through unchanged: `hash(k) == k`.
///
/// Every write is folded into the running state as `state * 31 + word`, so a
/// fresh hasher fed one integer returns that integer, while strings and
/// compound keys depend on all of their parts.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityHasher {
    state: u64,
}

impl IdentityHasher {
    const FOLD_MULTIPLIER: u64 = 31;

    #[inline]
    fn fold(&mut self, word: u64) {
        self.state = self.state.wrapping_mul(Self::FOLD_MULTIPLIER).wrapping_add(word);
    }
}

impl Hasher for IdentityHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.fold(b as u64);
        }
    }

    #[inline]
    fn write_u8(&mut self, i: u8) {
        self.fold(i as u64);
    }

    #[inline]
    fn write_u16(&mut self, i: u16) {
        self.fold(i as u64);
    }

    #[inline]
    fn write_u32(&mut self, i: u32) {
        self.fold(i as u64);
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.fold(i);
    }

    #[inline]
    fn write_usize(&mut self, i: usize) {
        self.fold(i as u64);
    }

    #[inline]
    fn write_i32(&mut self, i: i32) {
        self.fold(i as u32 as u64);
    }

    #[inline]
    fn write_i64(&mut self, i: i64) {
        self.fold(i as u64);
    }
}

pub type BuildIdentityHasher = BuildHasherDefault<IdentityHasher>;

/// Seeded xxh3. Unlike `RandomState`, two tables built with the same seed
/// place the same keys in the same slots.
#[derive(Debug, Default, Clone, Copy)]
pub struct Xxh3State {
    seed: u64,
}

impl Xxh3State {
    pub fn with_seed(seed: u64) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl BuildHasher for Xxh3State {
    type Hasher = Xxh3;

    fn build_hasher(&self) -> Xxh3 {
        Xxh3::with_seed(self.seed)
    }
}
