use crate::error::{Error, Result};
use crate::partition::{DyadicSplit, SplitRule};
use crate::types::{Bounds, RewardModel, ScoringMethod, validate_domain};

use super::{ArmSeeder, Zooming};

/// Default smoothness scale.
pub(crate) const DEFAULT_NU: f64 = 1.0;
/// Default per-level shrink factor.
pub(crate) const DEFAULT_RHO: f64 = 0.9;
/// Default minimum pulls before a cell may be refined.
pub(crate) const DEFAULT_MIN_PULLS_BEFORE_ZOOM: u64 = 5;
/// Largest depth-1 layer a build may allocate.
pub(crate) const MAX_INITIAL_CELLS: usize = 1 << 16;

/// Builder for configuring a [`Zooming`] bandit.
///
/// Only the domain is required. Everything else has a default:
/// - `nu`: 1.0
/// - `rho`: 0.9
/// - `scoring_method`: [`ScoringMethod::Ucb`]
/// - `reward_model`: [`RewardModel::Gaussian`]
/// - `min_pulls_before_zoom`: 5
/// - `split_rule`: [`DyadicSplit`]
/// - `seed`: random
/// - `max_depth`, `max_cells`: unlimited
///
/// # Examples
///
/// ```
/// use zooming::{RewardModel, ScoringMethod, Zooming};
///
/// let bandit = Zooming::builder()
///     .domain([(0.0, 1.0), (0.0, 1.0)])
///     .nu(2.0)
///     .rho(0.7)
///     .scoring_method(ScoringMethod::TunedUcb)
///     .reward_model(RewardModel::Bernoulli)
///     .min_pulls_before_zoom(3)
///     .seed(42)
///     .build()
///     .unwrap();
/// assert_eq!(bandit.n_active_points(), 4);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ZoomingBuilder {
    domain: Option<Vec<Bounds>>,
    nu: Option<f64>,
    rho: Option<f64>,
    scoring_method: Option<ScoringMethod>,
    reward_model: Option<RewardModel>,
    min_pulls_before_zoom: Option<u64>,
    split_rule: Option<Box<dyn SplitRule>>,
    seed: Option<u64>,
    max_depth: Option<usize>,
    max_cells: Option<usize>,
}

impl ZoomingBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the per-dimension `[low, high]` bounds of the search domain.
    #[must_use]
    pub fn domain(mut self, domain: impl Into<Vec<Bounds>>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Sets the smoothness scale `nu` of the zoom threshold `nu · rho^depth`.
    ///
    /// Larger values let cells refine earlier. Must be positive.
    ///
    /// Default: 1.0.
    #[must_use]
    pub fn nu(mut self, nu: f64) -> Self {
        self.nu = Some(nu);
        self
    }

    /// Sets the shrink factor `rho` of the zoom threshold `nu · rho^depth`.
    ///
    /// Smaller values shrink the threshold faster with depth. Must be in
    /// (0.0, 1.0).
    ///
    /// Default: 0.9.
    #[must_use]
    pub fn rho(mut self, rho: f64) -> Self {
        self.rho = Some(rho);
        self
    }

    /// Sets the rule used to score active points.
    #[must_use]
    pub fn scoring_method(mut self, method: ScoringMethod) -> Self {
        self.scoring_method = Some(method);
        self
    }

    /// Sets how rewards are accumulated.
    #[must_use]
    pub fn reward_model(mut self, model: RewardModel) -> Self {
        self.reward_model = Some(model);
        self
    }

    /// Sets how many pulls a point needs before its cell may be refined.
    ///
    /// Zero restores the unguarded zooming rule.
    ///
    /// Default: 5.
    #[must_use]
    pub fn min_pulls_before_zoom(mut self, n: u64) -> Self {
        self.min_pulls_before_zoom = Some(n);
        self
    }

    /// Sets how cells are cut when refined.
    ///
    /// Default: [`DyadicSplit`].
    #[must_use]
    pub fn split_rule(mut self, rule: impl SplitRule + 'static) -> Self {
        self.split_rule = Some(Box::new(rule));
        self
    }

    /// Sets the random seed used by Thompson sampling.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Stops refining below `depth`; further zoom events report saturation.
    #[must_use]
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Stops refining once the partition would exceed `cells` cells.
    ///
    /// The root and its depth-1 layer must fit under the ceiling.
    #[must_use]
    pub fn max_cells(mut self, cells: usize) -> Self {
        self.max_cells = Some(cells);
        self
    }

    /// Builds the configured [`Zooming`] bandit.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingDomain` if no domain was set,
    /// `Error::ZeroDimensions` or `Error::InvalidBounds` for a malformed
    /// domain, `Error::BoundsOutOfRange` for bounds too large to round,
    /// `Error::InvalidNu` if `nu` is not positive, `Error::InvalidRho` if
    /// `rho` is not in (0.0, 1.0) and `Error::SplitTooWide` if the first
    /// split would create more than 65,536 cells or break `max_cells`.
    pub fn build(self) -> Result<Zooming> {
        self.build_with_seeder(None)
    }

    pub(crate) fn build_with_seeder(self, seeder: Option<ArmSeeder>) -> Result<Zooming> {
        let domain = validate_domain(self.domain.as_deref().ok_or(Error::MissingDomain)?)?;

        let nu = self.nu.unwrap_or(DEFAULT_NU);
        if !(nu.is_finite() && nu > 0.0) {
            return Err(Error::InvalidNu(nu));
        }
        let rho = self.rho.unwrap_or(DEFAULT_RHO);
        if !(rho > 0.0 && rho < 1.0) {
            return Err(Error::InvalidRho(rho));
        }

        let split_rule = self.split_rule.unwrap_or_else(|| Box::new(DyadicSplit));
        let children = split_rule.width(&domain);
        let max = self.max_cells.map_or(MAX_INITIAL_CELLS, |cells| {
            cells.saturating_sub(1).min(MAX_INITIAL_CELLS)
        });
        if children > max {
            return Err(Error::SplitTooWide { children, max });
        }

        Zooming::from_parts(super::Parts {
            domain,
            nu,
            rho,
            scoring_method: self.scoring_method.unwrap_or_default(),
            reward_model: self.reward_model.unwrap_or_default(),
            min_pulls_before_zoom: self
                .min_pulls_before_zoom
                .unwrap_or(DEFAULT_MIN_PULLS_BEFORE_ZOOM),
            split_rule,
            seed: self.seed,
            max_depth: self.max_depth,
            max_cells: self.max_cells,
            seeder,
        })
    }
}
