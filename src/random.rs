//! Deterministic seeded randomness
//!
//! Everything random in the generator flows through [`SeededRandom`]: a
//! mulberry32 stream seeded from a string or numeric seed. Identical seeds
//! produce identical sequences on every platform - no wall clock, no ambient
//! global RNG. Child streams are split off with [`SeededRandom::derive`].

use rand::RngCore;

/// 32-bit polynomial hash for string seeds (`h = h * 31 + unit` over UTF-16
/// code units, truncated to i32, absolute value).
fn hash_seed(s: &str) -> u32 {
    let mut hash: i32 = 0;
    for unit in s.encode_utf16() {
        hash = hash
            .wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(unit as i32);
    }
    hash.unsigned_abs()
}

/// Deterministic PRNG with derivable child streams
#[derive(Debug, Clone)]
pub struct SeededRandom {
    state: u32,
}

impl SeededRandom {
    /// Seed from a string (hashed to 32 bits)
    pub fn new(seed: &str) -> Self {
        Self::from_seed(hash_seed(seed))
    }

    /// Seed directly from a 32-bit value
    pub fn from_seed(seed: u32) -> Self {
        Self { state: seed }
    }

    /// One raw mulberry32 step
    fn step(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// Uniform float in [0, 1)
    pub fn next(&mut self) -> f64 {
        self.step() as f64 / 4_294_967_296.0
    }

    /// Uniform integer in [min, max] inclusive
    pub fn next_int(&mut self, min: i32, max: i32) -> i32 {
        debug_assert!(min <= max);
        (self.next() * (max - min + 1) as f64) as i32 + min
    }

    /// Uniform float in [min, max)
    pub fn next_float(&mut self, min: f64, max: f64) -> f64 {
        self.next() * (max - min) + min
    }

    /// Pick a random element. Callers guarantee a non-empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        debug_assert!(!items.is_empty());
        let idx = (self.next() * items.len() as f64) as usize;
        &items[idx.min(items.len() - 1)]
    }

    /// Fisher-Yates shuffle, in place
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = (self.next() * (i + 1) as f64) as usize;
            items.swap(i, j.min(i));
        }
    }

    /// Split off an independent child stream.
    ///
    /// The child seed is the next raw draw concatenated with the suffix and
    /// re-hashed, so two children derived with different suffixes from the
    /// same parent state do not co-vary.
    pub fn derive(&mut self, suffix: impl std::fmt::Display) -> SeededRandom {
        let base = (self.next() * 4_294_967_295.0).floor() as u64;
        SeededRandom::new(&format!("{base}{suffix}"))
    }
}

/// `rand` ecosystem integration: a derived stream can drive anything that
/// takes an `RngCore`.
impl RngCore for SeededRandom {
    fn next_u32(&mut self) -> u32 {
        self.step()
    }

    fn next_u64(&mut self) -> u64 {
        ((self.step() as u64) << 32) | self.step() as u64
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.step().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}
