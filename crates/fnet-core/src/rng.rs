//! Seeded draws for synthetic exposure networks.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seeded source of exposure weights and link decisions.
///
/// Every synthetic network in tests and benches is reproducible from a
/// `u64` seed. The propagation itself never draws random numbers.
#[derive(Debug, Clone)]
pub struct RngHandle {
    rng: StdRng,
}

impl RngHandle {
    /// Creates a handle from a master seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draws an exposure weight uniformly from `[low, high)`.
    ///
    /// Callers validate the range; an empty or non-finite range panics.
    pub fn exposure_weight(&mut self, low: f64, high: f64) -> f64 {
        self.rng.gen_range(low..high)
    }

    /// Decides whether a link exists, with probability `density` in `[0, 1]`.
    pub fn link_present(&mut self, density: f64) -> bool {
        self.rng.gen_bool(density)
    }
}
