//! Regret accounting against known arm means.

use crate::error::{Error, Result};

/// Tracks instantaneous and cumulative regret of a sequence of arm choices.
///
/// Regret of a choice is `mu* - mu[arm]`, where `mu*` is the largest true
/// mean.
///
/// # Examples
///
/// ```
/// use zooming::RegretTracker;
///
/// let mut tracker = RegretTracker::new(vec![0.2, 0.9, 0.5]).unwrap();
/// tracker.update(0).unwrap();
/// tracker.update(1).unwrap();
/// assert!((tracker.cumulative_regret() - 0.7).abs() < 1e-12);
/// ```
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegretTracker {
    true_means: Vec<f64>,
    mu_star: f64,
    instantaneous: Vec<f64>,
    cumulative: f64,
}

impl RegretTracker {
    /// Creates a tracker for arms with the given true means.
    ///
    /// # Errors
    ///
    /// Returns `Error::EmptyArms` if `true_means` is empty.
    pub fn new(true_means: Vec<f64>) -> Result<Self> {
        let mu_star = true_means
            .iter()
            .copied()
            .max_by(f64::total_cmp)
            .ok_or(Error::EmptyArms)?;
        Ok(Self {
            true_means,
            mu_star,
            instantaneous: Vec::new(),
            cumulative: 0.0,
        })
    }

    /// Records a choice of `arm` and returns its regret.
    ///
    /// # Errors
    ///
    /// Returns `Error::ArmOutOfRange` if `arm` is not a known arm.
    pub fn update(&mut self, arm: usize) -> Result<f64> {
        let mean = *self.true_means.get(arm).ok_or(Error::ArmOutOfRange {
            index: arm,
            n_arms: self.true_means.len(),
        })?;
        let regret = self.mu_star - mean;
        self.instantaneous.push(regret);
        self.cumulative += regret;
        Ok(regret)
    }

    /// Sum of all recorded regrets.
    #[must_use]
    pub fn cumulative_regret(&self) -> f64 {
        self.cumulative
    }

    /// Regret of every recorded choice, in order.
    #[must_use]
    pub fn instantaneous_regrets(&self) -> &[f64] {
        &self.instantaneous
    }

    /// The best true mean.
    #[must_use]
    pub fn mu_star(&self) -> f64 {
        self.mu_star
    }

    /// The true means the tracker was built with.
    #[must_use]
    pub fn true_means(&self) -> &[f64] {
        &self.true_means
    }

    /// Forgets every recorded choice.
    pub fn reset(&mut self) {
        self.instantaneous.clear();
        self.cumulative = 0.0;
    }
}
