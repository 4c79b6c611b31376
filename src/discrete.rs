//! Zooming over a finite set of arms.
//!
//! [`DiscreteZooming`] runs the continuous [`Zooming`] core and resolves every
//! proposal to the nearest arm through a [`KdTree`] built once at
//! construction. The depth-1 active points sit at cell centers. Points
//! created by a refinement are seeded from the arm set instead: each new
//! child takes the arm inside it with the highest value under the
//! evaluation function, and falls back to its center when it holds no arm.

use core::fmt;

use crate::error::{Error, Result};
use crate::kdtree::KdTree;
use crate::partition::SplitRule;
use crate::types::{Bounds, RewardModel, ScoringMethod};
use crate::zooming::{ArmSeeder, ZoomEvent, Zooming, ZoomingBuilder};

type Evaluate = Box<dyn FnMut(&[f64]) -> f64 + Send>;

/// Builder for [`DiscreteZooming`].
///
/// Exposes the same knobs as [`ZoomingBuilder`]. The domain defaults to the
/// unit hypercube in the arms' dimensionality.
pub struct DiscreteZoomingBuilder {
    arms: Vec<Vec<f64>>,
    evaluate: Evaluate,
    domain: Option<Vec<Bounds>>,
    inner: ZoomingBuilder,
}

impl DiscreteZoomingBuilder {
    fn new(arms: Vec<Vec<f64>>, evaluate: Evaluate) -> Self {
        Self {
            arms,
            evaluate,
            domain: None,
            inner: ZoomingBuilder::new(),
        }
    }

    /// Sets the per-dimension `[low, high]` bounds of the search domain.
    #[must_use]
    pub fn domain(mut self, domain: impl Into<Vec<Bounds>>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// See [`ZoomingBuilder::nu`].
    #[must_use]
    pub fn nu(mut self, nu: f64) -> Self {
        self.inner = self.inner.nu(nu);
        self
    }

    /// See [`ZoomingBuilder::rho`].
    #[must_use]
    pub fn rho(mut self, rho: f64) -> Self {
        self.inner = self.inner.rho(rho);
        self
    }

    /// See [`ZoomingBuilder::scoring_method`].
    #[must_use]
    pub fn scoring_method(mut self, method: ScoringMethod) -> Self {
        self.inner = self.inner.scoring_method(method);
        self
    }

    /// See [`ZoomingBuilder::reward_model`].
    #[must_use]
    pub fn reward_model(mut self, model: RewardModel) -> Self {
        self.inner = self.inner.reward_model(model);
        self
    }

    /// See [`ZoomingBuilder::min_pulls_before_zoom`].
    #[must_use]
    pub fn min_pulls_before_zoom(mut self, n: u64) -> Self {
        self.inner = self.inner.min_pulls_before_zoom(n);
        self
    }

    /// See [`ZoomingBuilder::split_rule`].
    #[must_use]
    pub fn split_rule(mut self, rule: impl SplitRule + 'static) -> Self {
        self.inner = self.inner.split_rule(rule);
        self
    }

    /// See [`ZoomingBuilder::seed`].
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.inner = self.inner.seed(seed);
        self
    }

    /// See [`ZoomingBuilder::max_depth`].
    #[must_use]
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.inner = self.inner.max_depth(depth);
        self
    }

    /// See [`ZoomingBuilder::max_cells`].
    #[must_use]
    pub fn max_cells(mut self, cells: usize) -> Self {
        self.inner = self.inner.max_cells(cells);
        self
    }

    /// Builds the adapter.
    ///
    /// # Errors
    ///
    /// Returns `Error::EmptyArms` for an empty arm set,
    /// `Error::DimensionMismatch` if an arm disagrees with the domain's
    /// dimensionality, and every error of [`ZoomingBuilder::build`].
    pub fn build(self) -> Result<DiscreteZooming> {
        let Some(first) = self.arms.first() else {
            return Err(Error::EmptyArms);
        };
        let domain = self.domain.unwrap_or_else(|| vec![(0.0, 1.0); first.len()]);
        if let Some((index, arm)) = self
            .arms
            .iter()
            .enumerate()
            .find(|(_, arm)| arm.len() != domain.len())
        {
            return Err(Error::DimensionMismatch {
                expected: domain.len(),
                got: arm.len(),
                index,
            });
        }

        let index = KdTree::new(self.arms.clone())?;
        let seeder = ArmSeeder::new(self.arms, self.evaluate);
        let core = self.inner.domain(domain).build_with_seeder(Some(seeder))?;

        trace_info!(
            arms = index.len(),
            active_points = core.n_active_points(),
            "discrete zooming initialized"
        );
        Ok(DiscreteZooming {
            core,
            index,
            proposal: None,
        })
    }
}

impl fmt::Debug for DiscreteZoomingBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscreteZoomingBuilder")
            .field("arms", &self.arms.len())
            .field("domain", &self.domain)
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

/// A zooming bandit restricted to a finite arm set.
///
/// # Examples
///
/// ```
/// use zooming::DiscreteZooming;
///
/// let arms: Vec<Vec<f64>> = (0..10_u32)
///     .flat_map(|i| (0..10_u32).map(move |j| vec![f64::from(i) / 9.0, f64::from(j) / 9.0]))
///     .collect();
/// let mut bandit = DiscreteZooming::builder(arms.clone(), |x| 1.0 - x[0] - x[1])
///     .seed(3)
///     .build()
///     .unwrap();
///
/// for t in 0..50 {
///     let arm = bandit.select_arm(t).unwrap();
///     let idx = bandit.selected_index().unwrap();
///     assert_eq!(arms[idx], arm);
///     bandit.update(idx, 1.0 - arm[0] - arm[1]).unwrap();
/// }
/// ```
pub struct DiscreteZooming {
    core: Zooming,
    index: KdTree,
    proposal: Option<Vec<f64>>,
}

impl DiscreteZooming {
    /// Starts building an adapter over `arms`; `evaluate` ranks the arms
    /// when a refinement seeds new active points.
    pub fn builder<F>(arms: Vec<Vec<f64>>, evaluate: F) -> DiscreteZoomingBuilder
    where
        F: FnMut(&[f64]) -> f64 + Send + 'static,
    {
        DiscreteZoomingBuilder::new(arms, Box::new(evaluate))
    }

    /// Pulls the core at `time` and returns the arm nearest to its proposal.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Zooming::pull`].
    pub fn select_arm(&mut self, time: u64) -> Result<Vec<f64>> {
        let proposal = self.core.pull(time)?;
        let (idx, _) = self.index.nearest(&proposal)?;
        trace_debug!(time, arm = idx, "proposal resolved");
        self.proposal = Some(proposal);
        self.arm(idx)
            .map(<[f64]>::to_vec)
            .ok_or(Error::Internal("nearest arm out of range"))
    }

    /// Index of the arm returned by the most recent
    /// [`select_arm`](Self::select_arm).
    ///
    /// # Errors
    ///
    /// Returns `Error::NoPendingSelection` if no arm was selected yet.
    pub fn selected_index(&self) -> Result<usize> {
        let proposal = self.proposal.as_deref().ok_or(Error::NoPendingSelection)?;
        Ok(self.index.nearest(proposal)?.0)
    }

    /// Records `reward` for the last selection.
    ///
    /// `arm` is range-checked only; the reward always goes to the active
    /// point behind the last proposal.
    ///
    /// # Errors
    ///
    /// Returns `Error::ArmOutOfRange` for an unknown arm and the errors of
    /// [`Zooming::receive_reward`].
    pub fn update(&mut self, arm: usize, reward: f64) -> Result<ZoomEvent> {
        if arm >= self.index.len() {
            return Err(Error::ArmOutOfRange {
                index: arm,
                n_arms: self.index.len(),
            });
        }
        self.core.receive_reward(self.core.time(), reward)
    }

    /// Records `reward` for the last selection.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Zooming::receive_reward`].
    pub fn receive_reward(&mut self, time: u64, reward: f64) -> Result<ZoomEvent> {
        self.core.receive_reward(time, reward)
    }

    /// The arm at `index`.
    #[must_use]
    pub fn arm(&self, index: usize) -> Option<&[f64]> {
        self.index.point(index)
    }

    /// Number of arms.
    #[must_use]
    pub fn n_arms(&self) -> usize {
        self.index.len()
    }

    /// The underlying continuous bandit.
    #[must_use]
    pub fn core(&self) -> &Zooming {
        &self.core
    }
}

impl fmt::Debug for DiscreteZooming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscreteZooming")
            .field("arms", &self.index.len())
            .field("proposal", &self.proposal)
            .field("core", &self.core)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use std::sync::Arc;
    use core::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn grid(n: u32) -> Vec<Vec<f64>> {
        let step = f64::from(n - 1);
        (0..n)
            .flat_map(|i| (0..n).map(move |j| vec![f64::from(i) / step, f64::from(j) / step]))
            .collect()
    }

    #[test]
    fn test_rejects_empty_arms() {
        let result = DiscreteZooming::builder(Vec::new(), |_| 0.0).build();
        assert!(matches!(result, Err(Error::EmptyArms)));
    }

    #[test]
    fn test_rejects_arm_with_wrong_dims() {
        let arms = vec![vec![0.1, 0.2], vec![0.3]];
        let result = DiscreteZooming::builder(arms, |_| 0.0).build();
        assert!(matches!(
            result,
            Err(Error::DimensionMismatch {
                expected: 2,
                got: 1,
                index: 1
            })
        ));
    }

    #[test]
    fn test_rejects_arms_outside_domain_dims() {
        let arms = vec![vec![0.1, 0.2]];
        let result = DiscreteZooming::builder(arms, |_| 0.0)
            .domain([(0.0, 1.0)])
            .build();
        assert!(matches!(result, Err(Error::DimensionMismatch { .. })));
    }

    #[test]
    fn test_initial_points_are_cell_centers() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let bandit = DiscreteZooming::builder(grid(4), move |x| {
            counter.fetch_add(1, Ordering::Relaxed);
            x[0]
        })
        .build()
        .unwrap();
        let coords: Vec<Vec<f64>> = bandit
            .core()
            .active_points()
            .map(|v| v.coords.to_vec())
            .collect();
        assert_eq!(
            coords,
            vec![
                vec![0.25, 0.25],
                vec![0.75, 0.25],
                vec![0.25, 0.75],
                vec![0.75, 0.75]
            ]
        );
        assert_eq!(calls.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_refinement_seeds_children_from_arms() {
        // Arms at (0.6, 0.6) and (0.9, 0.9) fall in the upper-right quadrant.
        let arms = vec![
            vec![0.1, 0.1],
            vec![0.9, 0.1],
            vec![0.1, 0.9],
            vec![0.6, 0.6],
            vec![0.9, 0.9],
        ];
        let mut bandit = DiscreteZooming::builder(arms, |x| x[0] + x[1])
            .nu(10.0)
            .min_pulls_before_zoom(0)
            .build()
            .unwrap();
        // The proposal (0.75, 0.75) is equidistant from arms 3 and 4.
        assert_eq!(bandit.select_arm(0).unwrap(), vec![0.6, 0.6]);
        let event = bandit.update(3, 1.0).unwrap();
        assert!(matches!(event, ZoomEvent::Refined { depth: 2, .. }));

        let coords: Vec<Vec<f64>> = bandit
            .core()
            .active_points()
            .skip(4)
            .map(|v| v.coords.to_vec())
            .collect();
        // The arm-free children fall back to their centers.
        assert_eq!(
            coords,
            vec![vec![0.6, 0.6], vec![0.875, 0.625], vec![0.625, 0.875]]
        );
        assert_eq!(bandit.core().find(&[0.75, 0.75]).unwrap().depth, 2);
    }

    #[test]
    fn test_selected_index_matches_returned_arm() {
        let arms = grid(7);
        let mut bandit = DiscreteZooming::builder(arms.clone(), |x| -(x[0] - 0.3).abs())
            .seed(1)
            .build()
            .unwrap();
        for t in 0..40 {
            let arm = bandit.select_arm(t).unwrap();
            let idx = bandit.selected_index().unwrap();
            assert_eq!(arms[idx], arm);
            bandit.update(idx, 1.0 - (arm[0] - 0.3).abs()).unwrap();
        }
        assert_eq!(bandit.core().time(), 40);
    }

    #[test]
    fn test_selected_index_before_select_is_an_error() {
        let bandit = DiscreteZooming::builder(grid(3), |_| 0.0).build().unwrap();
        assert!(matches!(
            bandit.selected_index(),
            Err(Error::NoPendingSelection)
        ));
    }

    #[test]
    fn test_update_checks_arm_range_and_alternation() {
        let mut bandit = DiscreteZooming::builder(grid(3), |_| 0.0).build().unwrap();
        assert!(matches!(
            bandit.update(0, 1.0),
            Err(Error::NoPendingSelection)
        ));
        bandit.select_arm(0).unwrap();
        assert!(matches!(
            bandit.update(9, 1.0),
            Err(Error::ArmOutOfRange {
                index: 9,
                n_arms: 9
            })
        ));
        bandit.update(0, 1.0).unwrap();
        assert_eq!(bandit.core().total_pulls(), 1);
    }

    #[test]
    fn test_receive_reward_forwards_to_core() {
        let mut bandit = DiscreteZooming::builder(grid(4), |_| 0.0).build().unwrap();
        bandit.select_arm(0).unwrap();
        bandit.receive_reward(0, 0.5).unwrap();
        assert_eq!(bandit.core().time(), 1);
        assert!(bandit.receive_reward(1, 0.5).is_err());
    }
}
