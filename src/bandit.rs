//! The driver-facing interface of a finite-armed bandit.

use crate::discrete::DiscreteZooming;
use crate::error::Result;
use crate::regret::RegretTracker;

/// A bandit over a finite set of indexed arms.
///
/// Every [`select_arm`](Bandit::select_arm) must be followed by exactly one
/// [`update`](Bandit::update) before the next selection.
pub trait Bandit {
    /// Number of arms.
    fn n_arms(&self) -> usize;

    /// Chooses the arm to play at round `time`.
    ///
    /// # Errors
    ///
    /// Returns an error if the bandit cannot propose an arm.
    fn select_arm(&mut self, time: u64) -> Result<usize>;

    /// Feeds back the reward observed for `arm`.
    ///
    /// # Errors
    ///
    /// Returns an error if no selection is pending or `arm` is unknown.
    fn update(&mut self, arm: usize, reward: f64) -> Result<()>;
}

impl Bandit for DiscreteZooming {
    fn n_arms(&self) -> usize {
        DiscreteZooming::n_arms(self)
    }

    fn select_arm(&mut self, time: u64) -> Result<usize> {
        DiscreteZooming::select_arm(self, time)?;
        self.selected_index()
    }

    fn update(&mut self, arm: usize, reward: f64) -> Result<()> {
        DiscreteZooming::update(self, arm, reward).map(|_| ())
    }
}

/// Plays `bandit` for `rounds` rounds, drawing rewards from `reward` and
/// recording every choice in `tracker`.
///
/// # Errors
///
/// Propagates the first error from the bandit or the tracker.
pub fn run<B, F>(
    bandit: &mut B,
    rounds: u64,
    mut reward: F,
    tracker: &mut RegretTracker,
) -> Result<()>
where
    B: Bandit + ?Sized,
    F: FnMut(usize) -> f64,
{
    for t in 0..rounds {
        let arm = bandit.select_arm(t)?;
        tracker.update(arm)?;
        bandit.update(arm, reward(arm))?;
    }
    Ok(())
}
