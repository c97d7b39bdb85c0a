//! Injectable randomness for the fallback paths.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::sync::Mutex;

/// A random source shared by one service across calls.
pub struct SharedRng(Mutex<Box<dyn RngCore + Send>>);

impl SharedRng {
    pub fn new(rng: impl RngCore + Send + 'static) -> Self {
        Self(Mutex::new(Box::new(rng)))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Deterministic source, for tests and reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Run `f` with exclusive access to the generator.
    pub fn with<T>(&self, f: impl FnOnce(&mut dyn RngCore) -> T) -> T {
        // A panic mid-draw leaves the generator usable.
        let mut guard = self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut **guard)
    }
}

impl Default for SharedRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}
