//! Deterministic pseudo-random permutations used by the MinHash signer.
//!
//! Bit-for-bit reproducibility across indexing and querying runs (and
//! ideally across implementations) depends on not delegating to a
//! language-provided PRNG that might change behavior across versions. We
//! embed a portable 32-bit linear congruential generator (the Numerical
//! Recipes constants) seeded with a fixed, permanently committed value.

use std::sync::OnceLock;

use crate::config::{
    N_PERMUTATIONS, PERMUTATION_LENGTH, PERMUTATION_SEED, RAW_FINGERPRINT_BITS,
};

/// Portable linear congruential generator: `state = state * 1664525 +
/// 1013904223 (mod 2^32)`, the constants used by Numerical Recipes' minimal
/// standard generator. Chosen specifically so the sequence never depends on
/// a platform or library `rand()` implementation.
struct Lcg {
    state: u32,
}

impl Lcg {
    fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    fn next_u32(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(1_664_525)
            .wrapping_add(1_013_904_223);
        self.state
    }

    /// Returns a value in `[0, bound)`. `bound` must be nonzero.
    fn next_bounded(&mut self, bound: u32) -> u32 {
        self.next_u32() % bound
    }
}

pub type Permutation = [u16; PERMUTATION_LENGTH];

fn shuffle(data: &mut [u16; RAW_FINGERPRINT_BITS], lcg: &mut Lcg) {
    for i in 0..(RAW_FINGERPRINT_BITS as u32 - 2) {
        let remaining = RAW_FINGERPRINT_BITS as u32 - i;
        let j = i + lcg.next_bounded(remaining);
        data.swap(i as usize, j as usize);
    }
}

fn build_permutations() -> Vec<Permutation> {
    let mut lcg = Lcg::new(PERMUTATION_SEED);
    let mut permutations = Vec::with_capacity(N_PERMUTATIONS);

    for _ in 0..N_PERMUTATIONS {
        let mut indices = [0u16; RAW_FINGERPRINT_BITS];
        for (i, slot) in indices.iter_mut().enumerate() {
            *slot = i as u16;
        }
        shuffle(&mut indices, &mut lcg);

        let mut permutation = [0u16; PERMUTATION_LENGTH];
        permutation.copy_from_slice(&indices[..PERMUTATION_LENGTH]);
        permutations.push(permutation);
    }

    permutations
}

fn permutation_table() -> &'static Vec<Permutation> {
    static TABLE: OnceLock<Vec<Permutation>> = OnceLock::new();
    TABLE.get_or_init(build_permutations)
}

/// Forces eager initialization of the permutation table.
pub fn init() {
    permutation_table();
}

/// Returns permutation `n` (0-indexed, `n < N_PERMUTATIONS`).
pub fn get(n: usize) -> &'static Permutation {
    &permutation_table()[n]
}
