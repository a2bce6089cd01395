//! Seeded randomness for layout sampling and move tie-breaks. Not cryptographic.

use std::time::{SystemTime, UNIX_EPOCH};

pub trait DeterministicRng {
    fn next_u64(&mut self) -> u64;

    /// Uniform index in `0..len` (rejection sampling, no modulo bias).
    fn gen_index(&mut self, len: usize) -> usize {
        assert!(len > 0, "empty range");
        let span = len as u64;
        let threshold = u64::MAX - (u64::MAX % span);
        loop {
            let x = self.next_u64();
            if x < threshold {
                return (x % span) as usize;
            }
        }
    }
}

/// SplitMix64: good seeding RNG and small deterministic generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn step(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E3779B97F4A7C15);
        mix64(self.state)
    }
}

impl DeterministicRng for SplitMix64 {
    fn next_u64(&mut self) -> u64 {
        self.step()
    }
}

/// Pick one element uniformly, or `None` for an empty slice.
pub fn choose<'a, T, R>(rng: &mut R, items: &'a [T]) -> Option<&'a T>
where
    R: DeterministicRng + ?Sized,
{
    if items.is_empty() {
        return None;
    }
    items.get(rng.gen_index(items.len()))
}

/// Move a uniform random `count`-subset of `items` to the front (partial Fisher-Yates) and
/// return it. Returns `None` when there are fewer than `count` items.
pub fn sample_prefix<'a, T, R>(rng: &mut R, items: &'a mut [T], count: usize) -> Option<&'a [T]>
where
    R: DeterministicRng + ?Sized,
{
    if items.len() < count {
        return None;
    }
    for i in 0..count {
        let j = i + rng.gen_index(items.len() - i);
        items.swap(i, j);
    }
    Some(&items[..count])
}

pub fn mix64(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xBF58476D1CE4E5B9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94D049BB133111EB);
    x ^ (x >> 31)
}

/// Independent seed for the `stream`-th episode of a run seeded with `global_seed`.
pub fn derive_seed(global_seed: u64, stream: u64) -> u64 {
    mix64(global_seed ^ mix64(stream.wrapping_add(0x9E3779B97F4A7C15)))
}

/// Seed for runs that did not ask for reproducibility.
pub fn entropy_seed() -> u64 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    mix64(nanos ^ u64::from(std::process::id()))
}
