//! SeededRng - the deterministic draw stream behind every universe
//!
//! The stream is seeded by folding the seed string through FNV-1a over its
//! UTF-16 code units, then each draw runs a xorshift/multiply avalanche on a
//! single 32-bit state. All integer math wraps at 32 bits, so the sequence is
//! bit-identical on every platform and matches the browser renderers that
//! share the same seeds.

/// FNV-1a offset basis (32-bit)
const FNV_OFFSET: u32 = 0x811c_9dc5;
/// FNV-1a prime (32-bit)
const FNV_PRIME: u32 = 0x0100_0193;
/// 2^32, the divisor that maps a raw draw into [0, 1)
const TWO_POW_32: f64 = 4_294_967_296.0;

/// Fold a seed string into the initial 32-bit state.
pub fn fold_seed(seed: &str) -> u32 {
    seed.encode_utf16().fold(FNV_OFFSET, |h, unit| {
        (h ^ u32::from(unit)).wrapping_mul(FNV_PRIME)
    })
}

/// Deterministic pseudo-random stream seeded from an arbitrary string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededRng {
    state: u32,
    draws: u64,
}

impl SeededRng {
    /// Create a stream from a seed string. Any string, including the empty
    /// one, is a valid seed.
    pub fn new(seed: &str) -> Self {
        Self::from_state(fold_seed(seed))
    }

    /// Resume a stream from a raw 32-bit state
    pub fn from_state(state: u32) -> Self {
        Self { state, draws: 0 }
    }

    /// Current internal state
    pub fn state(&self) -> u32 {
        self.state
    }

    /// Number of draws taken so far
    pub fn draws(&self) -> u64 {
        self.draws
    }

    /// Advance one step and return the raw 32-bit output.
    ///
    /// The final `^ >> 14` whitening is applied to the output only; the
    /// persisted state stops after the second mixing step.
    pub fn next_u32(&mut self) -> u32 {
        let mut h = self.state;
        h = (h ^ (h >> 15)).wrapping_mul(h | 1);
        h ^= h.wrapping_add((h ^ (h >> 7)).wrapping_mul(h | 61));
        self.state = h;
        self.draws += 1;
        h ^ (h >> 14)
    }

    /// Advance one step and return a float in [0, 1)
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / TWO_POW_32
    }

    /// `min + draw * (max - min)`, one draw
    pub fn range(&mut self, min: f64, max: f64) -> f64 {
        self.spread(min, max - min)
    }

    /// `base + draw * width`, one draw. Prefer this over `range` when the
    /// width is the published constant, so no subtraction rounding creeps in.
    pub fn spread(&mut self, base: f64, width: f64) -> f64 {
        base + self.next_f64() * width
    }

    /// `floor(draw * n)`, one draw. Always `< n` for `n > 0`.
    pub fn index(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64).floor() as usize
    }

    /// `draw > threshold`, one draw
    pub fn chance(&mut self, threshold: f64) -> bool {
        self.next_f64() > threshold
    }

    /// Pick one element of a fixed, ordered candidate list, one draw.
    ///
    /// `candidates` must be non-empty.
    pub fn pick<'a, T>(&mut self, candidates: &'a [T]) -> &'a T {
        let i = self.index(candidates.len());
        &candidates[i.min(candidates.len() - 1)]
    }
}

impl Iterator for SeededRng {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        Some(self.next_f64())
    }
}
