use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Beta, Distribution, Normal};

/// Create the generator owned by a bandit: seeded when `seed` is given,
/// otherwise from OS entropy.
pub(crate) fn make_rng(seed: Option<u64>) -> StdRng {
    seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64)
}

/// Draw from `Beta(alpha, beta)`, falling back to the mean for invalid shapes.
#[inline]
pub(crate) fn sample_beta(rng: &mut StdRng, alpha: f64, beta: f64) -> f64 {
    Beta::new(alpha, beta).map_or(alpha / (alpha + beta), |d| d.sample(rng))
}

/// Draw from `Normal(mean, std_dev)`, falling back to the mean for an invalid spread.
#[inline]
pub(crate) fn sample_normal(rng: &mut StdRng, mean: f64, std_dev: f64) -> f64 {
    Normal::new(mean, std_dev).map_or(mean, |d| d.sample(rng))
}
