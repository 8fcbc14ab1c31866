//! Seeded random stream for procedural generation and encounter rolls.
//!
//! Every random decision of a run (room count, door walls, obstacle
//! candidates, wave composition, elite rolls) draws from a [`RunRng`].
//! Given the same seed, a run produces the same dungeon and the same waves,
//! which is what makes generation tests and replays reproducible.
//!
//! [`RunRng`] implements [`rand::RngCore`] and [`rand::SeedableRng`], so the
//! usual [`rand::Rng`] helpers (`gen_range`, `gen_bool`, `choose`, `shuffle`)
//! work on it directly.

use rand::{RngCore, SeedableRng};

/// PCG random number generator (Permuted Congruential Generator).
///
/// PCG is a family of simple, fast, space-efficient RNGs with excellent
/// statistical quality. This implementation uses PCG-XSH-RR, which produces
/// 32-bit output from 64-bit state.
///
/// # Properties
///
/// - **Deterministic**: Same seed always produces the same stream
/// - **Fast**: Single multiply + xorshift + rotate
/// - **Small state**: Only 64 bits
///
/// # References
///
/// - PCG paper: <https://www.pcg-random.org/>
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunRng {
    state: u64,
}

impl RunRng {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// PCG increment constant.
    const INCREMENT: u64 = 1442695040888963407;

    /// Creates a stream from a 64-bit seed.
    pub fn new(seed: u64) -> Self {
        let mut rng = Self { state: 0 };
        rng.state = Self::pcg_step(rng.state);
        rng.state = rng.state.wrapping_add(seed);
        rng.state = Self::pcg_step(rng.state);
        rng
    }

    /// Creates an independent stream for one purpose of a run.
    ///
    /// The dungeon layout and the encounter rolls use different streams so
    /// that spawning an extra enemy never changes the map of a seeded run.
    pub fn derive(run_seed: u64, stream: RngStream, index: u32) -> Self {
        Self::new(compute_seed(run_seed, stream as u32, index))
    }

    /// Advance the PCG state by one step.
    ///
    /// Uses LCG (Linear Congruential Generator) formula:
    /// `state' = (state × multiplier + increment) mod 2^64`
    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// PCG output function using XSH-RR (xorshift high, random rotate).
    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngCore for RunRng {
    fn next_u32(&mut self) -> u32 {
        let old = self.state;
        self.state = Self::pcg_step(old);
        Self::pcg_output(old)
    }

    fn next_u64(&mut self) -> u64 {
        let hi = u64::from(self.next_u32());
        let lo = u64::from(self.next_u32());
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for RunRng {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u64::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        Self::new(state)
    }
}

/// Purpose tags for [`RunRng::derive`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum RngStream {
    /// Room graph, doors, obstacles and teleport pads.
    Dungeon = 0,
    /// Wave composition, spawn points and elite rolls.
    Encounter = 1,
    /// Upgrade offers and shrine deals.
    Rewards = 2,
}

/// Compute a deterministic seed from run components.
///
/// Combines the run seed with a stream tag and an index (room id, wave
/// number) so every consumer gets an uncorrelated stream.
pub fn compute_seed(run_seed: u64, stream: u32, index: u32) -> u64 {
    // SplitMix64 / FxHash style multipliers
    let mut hash = run_seed;
    hash ^= u64::from(stream).wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= u64::from(index).wrapping_mul(0x517cc1b727220a95);

    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}
