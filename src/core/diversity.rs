use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::sync::{Mutex, PoisonError};

/// Upper bound (exclusive) of the diversity term added to every score
pub const MAX_DIVERSITY: f64 = 0.1;

/// Source of the small random perturbation that shuffles near-ties
/// between repeated requests.
pub trait DiversitySource: Send + Sync + fmt::Debug {
    /// Next perturbation, in `[0, MAX_DIVERSITY)`
    fn sample(&self) -> f64;
}

/// Random perturbation drawn from a seedable RNG
pub struct SeededDiversity {
    rng: Mutex<StdRng>,
}

impl SeededDiversity {
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl fmt::Debug for SeededDiversity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeededDiversity").finish_non_exhaustive()
    }
}

impl DiversitySource for SeededDiversity {
    fn sample(&self) -> f64 {
        // A panic while holding the lock leaves the RNG state intact.
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.gen_range(0.0..MAX_DIVERSITY)
    }
}

/// Constant perturbation, for reproducible rankings
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedDiversity(f64);

impl FixedDiversity {
    pub fn new(value: f64) -> Self {
        Self(value.clamp(0.0, MAX_DIVERSITY - f64::EPSILON))
    }
}

impl DiversitySource for FixedDiversity {
    fn sample(&self) -> f64 {
        self.0
    }
}
