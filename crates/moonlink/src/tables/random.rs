//! Pseudo-random source behind `Math.random`.

use std::sync::{Mutex, PoisonError};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Uniform `f64` generator in `[0, 1)`.
///
/// Seeded from OS entropy unless a seed is given, in which case the
/// sequence is reproducible. Shared by reference from a table binding, so
/// the generator state sits behind a mutex.
#[derive(Debug)]
pub struct RandomSource {
    rng: Mutex<ChaCha8Rng>,
}

impl RandomSource {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            rng: Mutex::new(rng),
        }
    }

    /// Next value in `[0, 1)`.
    pub fn next_f64(&self) -> f64 {
        // Generator state stays valid even if a previous holder panicked.
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.gen::<f64>()
    }
}
