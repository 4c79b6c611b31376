//! The zooming bandit over a continuous domain.
//!
//! Zooming keeps a set of *active points*, each standing for one cell of an
//! adaptive [`Partition`] of the domain. Every round it plays the active point
//! with the highest score, and once a point has been pulled often enough that
//! its confidence radius drops below its cell's tolerance it *zooms in*: the
//! cell is split and every child that does not contain the point gets an
//! active point of its own, while the point itself moves (with its
//! statistics) into the child that contains it.
//!
//! # Algorithm overview
//!
//! 1. **Initialization**: the partition is deepened once and every depth-1
//!    cell gets an active point at its center.
//! 2. **Pull**: every active point is scored (see [`crate::scoring`]); the
//!    highest score wins and ties go to the most recently created point.
//! 3. **Reward**: the winner's statistics are updated, the global round
//!    counter advances and the phase moves on an exponential schedule.
//! 4. **Zoom**: with `r = sqrt(8·phase / (2 + pulls))`, the winner's cell
//!    is refined when `r <= nu · rho^depth` and the point has at least
//!    `min_pulls_before_zoom` pulls. A point always stands for a leaf, so
//!    its cell never has children whose pulls could hold the zoom back.
//! 5. **Saturation**: a split that would pass `max_depth` or `max_cells`, or
//!    whose children cannot get distinct rounded representatives inside
//!    their own bounds, leaves the partition untouched and reports
//!    [`ZoomEvent::Saturated`].
//!
//! # Examples
//!
//! ```
//! use zooming::Zooming;
//!
//! let mut bandit = Zooming::builder()
//!     .domain([(0.0, 1.0), (0.0, 1.0)])
//!     .nu(3.0)
//!     .rho(0.8)
//!     .build()
//!     .unwrap();
//!
//! for t in 0..100 {
//!     let x = bandit.pull(t).unwrap();
//!     let reward = 1.0 - ((x[0] - 0.7).powi(2) + (x[1] - 0.2).powi(2)).sqrt();
//!     bandit.receive_reward(t, reward).unwrap();
//! }
//! assert_eq!(bandit.time(), 100);
//! ```

mod builder;
mod clock;

use core::fmt;
use std::collections::HashSet;

use rand::rngs::StdRng;

pub use builder::ZoomingBuilder;
pub use clock::PhaseClock;

use crate::error::{Error, Result};
use crate::partition::{CellId, Partition, SplitRule, box_center};
use crate::point::{PointKey, round_coords};
use crate::registry::{ActiveArmRegistry, ActivePoint, ArmStats, PointId};
use crate::rng_util;
use crate::scoring::{ScoreContext, Scorer, confidence_radius};
use crate::types::{Bounds, RewardModel, ScoringMethod};

/// Pulls a point needs, at depth two or more, for a zoom to count as lock-in.
const LOCK_IN_MIN_PULLS: u64 = 5;

/// Depth from which a zoom counts as lock-in.
const LOCK_IN_MIN_DEPTH: usize = 2;

/// Per child of a split: `None` keeps the carried point, `Some` is a new one.
type ChildPlan = Vec<Option<Vec<f64>>>;

/// What happened to the partition after a reward.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ZoomEvent {
    /// The zoom condition did not hold.
    Unchanged,
    /// The selected point's cell was split.
    Refined {
        /// The cell that was split.
        cell: CellId,
        /// Depth of the new children.
        depth: usize,
        /// Active points created for children that did not contain the
        /// selected point, in creation order.
        new_points: Vec<PointId>,
    },
    /// The zoom condition held but the split was blocked, by a depth or cell
    /// ceiling or because the cell is too small to hold distinct rounded
    /// points.
    Saturated {
        /// The cell that would have been split.
        cell: CellId,
    },
}

/// Seeds the active points created by a refinement from a finite arm set
/// instead of cell centers.
pub(crate) struct ArmSeeder {
    arms: Vec<Vec<f64>>,
    evaluate: Box<dyn FnMut(&[f64]) -> f64 + Send>,
}

impl ArmSeeder {
    pub(crate) fn new(
        arms: Vec<Vec<f64>>,
        evaluate: Box<dyn FnMut(&[f64]) -> f64 + Send>,
    ) -> Self {
        let arms = arms.iter().map(|arm| round_coords(arm)).collect();
        Self { arms, evaluate }
    }

    /// The highest-valued arm inside `bounds`, if any.
    fn best_in(&mut self, partition: &Partition, bounds: &[Bounds]) -> Option<Vec<f64>> {
        let mut best: Option<(f64, usize)> = None;
        for (i, arm) in self.arms.iter().enumerate() {
            if !partition.box_contains(bounds, arm) {
                continue;
            }
            let value = (self.evaluate)(arm);
            if best.is_none_or(|(v, _)| value > v) {
                best = Some((value, i));
            }
        }
        best.map(|(_, i)| self.arms[i].clone())
    }
}

/// A read-only view of one active point.
#[derive(Clone, Copy, Debug)]
pub struct ActivePointView<'a> {
    /// Creation-order id of the point.
    pub id: PointId,
    /// The rounded coordinate.
    pub coords: &'a [f64],
    /// Accumulated reward statistics.
    pub stats: &'a ArmStats,
    /// Mean reward under the configured reward model.
    pub mean: f64,
    /// The cell the point represents.
    pub cell: CellId,
    /// Depth of that cell.
    pub depth: usize,
    /// Bounds of that cell.
    pub bounds: &'a [Bounds],
}

/// An owned summary of the bandit state.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZoomingSnapshot {
    /// Rounds completed.
    pub time: u64,
    /// Current phase.
    pub phase: u32,
    /// Round at which the phase next advances.
    pub next_phase_boundary: u64,
    /// First round at which the bandit locked in, if it has.
    pub locked_in_step: Option<u64>,
    /// Deepest layer of the partition.
    pub max_depth: usize,
    /// Active points in creation order.
    pub points: Vec<PointSnapshot>,
}

/// One active point in a [`ZoomingSnapshot`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointSnapshot {
    /// The rounded coordinate.
    pub coords: Vec<f64>,
    /// Depth of the point's cell.
    pub depth: usize,
    /// Bounds of the point's cell.
    pub bounds: Vec<Bounds>,
    /// Accumulated reward statistics.
    pub stats: ArmStats,
}

/// Validated construction inputs, assembled by [`ZoomingBuilder`].
pub(crate) struct Parts {
    pub(crate) domain: Vec<Bounds>,
    pub(crate) nu: f64,
    pub(crate) rho: f64,
    pub(crate) scoring_method: ScoringMethod,
    pub(crate) reward_model: RewardModel,
    pub(crate) min_pulls_before_zoom: u64,
    pub(crate) split_rule: Box<dyn SplitRule>,
    pub(crate) seed: Option<u64>,
    pub(crate) max_depth: Option<usize>,
    pub(crate) max_cells: Option<usize>,
    pub(crate) seeder: Option<ArmSeeder>,
}

/// Zooming bandit over a bounded hyperrectangle.
///
/// Drive it by alternating [`pull`](Self::pull) and
/// [`receive_reward`](Self::receive_reward); every reward is attributed to
/// the point returned by the most recent pull.
///
/// # Examples
///
/// ```
/// use zooming::{ScoringMethod, Zooming};
///
/// let mut bandit = Zooming::builder()
///     .domain([(0.0, 1.0), (0.0, 1.0)])
///     .scoring_method(ScoringMethod::Thompson)
///     .seed(7)
///     .build()
///     .unwrap();
///
/// let x = bandit.pull(0).unwrap();
/// assert_eq!(x.len(), 2);
/// bandit.receive_reward(0, 0.5).unwrap();
/// ```
pub struct Zooming {
    nu: f64,
    rho: f64,
    scoring_method: ScoringMethod,
    min_pulls_before_zoom: u64,
    max_depth: Option<usize>,
    max_cells: Option<usize>,
    scorer: Scorer,
    partition: Partition,
    registry: ActiveArmRegistry,
    clock: PhaseClock,
    selected: Option<PointId>,
    locked_in_step: Option<u64>,
    seeder: Option<ArmSeeder>,
    rng: StdRng,
}

impl Zooming {
    /// Creates a bandit over `domain` with default settings.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`ZoomingBuilder::build`].
    pub fn new(domain: impl Into<Vec<Bounds>>) -> Result<Self> {
        ZoomingBuilder::new().domain(domain).build()
    }

    /// Creates a builder for configuring a `Zooming` bandit.
    #[must_use]
    pub fn builder() -> ZoomingBuilder {
        ZoomingBuilder::new()
    }

    fn from_parts(parts: Parts) -> Result<Self> {
        let mut partition = Partition::new(parts.domain, parts.split_rule);
        partition.deepen();

        let mut bandit = Self {
            nu: parts.nu,
            rho: parts.rho,
            scoring_method: parts.scoring_method,
            min_pulls_before_zoom: parts.min_pulls_before_zoom,
            max_depth: parts.max_depth,
            max_cells: parts.max_cells,
            scorer: Scorer::new(parts.scoring_method, parts.reward_model),
            partition,
            registry: ActiveArmRegistry::new(),
            clock: PhaseClock::new(),
            selected: None,
            locked_in_step: None,
            seeder: parts.seeder,
            rng: rng_util::make_rng(parts.seed),
        };

        let layer = bandit.partition.layer(1).to_vec();
        for cell in layer {
            let center = bandit.partition.cell(cell).center();
            bandit.registry.insert(&center, cell)?;
        }

        trace_info!(
            dims = bandit.partition.dims(),
            nu = bandit.nu,
            rho = bandit.rho,
            scoring = %bandit.scoring_method,
            model = %bandit.scorer.model(),
            active_points = bandit.registry.len(),
            "zooming bandit initialized"
        );
        Ok(bandit)
    }

    /// Chooses the point to play at `time` and returns its coordinate.
    ///
    /// The choice becomes the pending selection that the next
    /// [`receive_reward`](Self::receive_reward) is attributed to; pulling
    /// again before rewarding replaces it.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoActivePoints` if no point is active.
    pub fn pull(&mut self, time: u64) -> Result<Vec<f64>> {
        let id = self.argmax(time)?;
        self.selected = Some(id);
        let point = self.point(id)?;
        Ok(point.coords().to_vec())
    }

    /// Highest-scoring active point; later points win ties.
    fn argmax(&mut self, time: u64) -> Result<PointId> {
        let ctx = ScoreContext {
            time,
            phase: self.clock.phase(),
        };
        let mut best = None;
        let mut best_score = f64::NEG_INFINITY;
        for (id, point) in self.registry.iter() {
            let score = self.scorer.score(point.stats(), ctx, &mut self.rng);
            if score >= best_score {
                best_score = score;
                best = Some(id);
            }
        }
        best.ok_or(Error::NoActivePoints)
    }

    fn point(&self, id: PointId) -> Result<&ActivePoint> {
        self.registry
            .get(id)
            .ok_or(Error::Internal("selected point missing from the registry"))
    }

    /// Records `reward` for the pending selection and refines its cell when
    /// the zoom condition holds.
    ///
    /// The time argument is accepted for symmetry with [`pull`](Self::pull); the
    /// bandit's own round counter drives the phase schedule.
    ///
    /// # Errors
    ///
    /// Returns `Error::NonFiniteReward` for a NaN or infinite reward, leaving
    /// the selection pending, and `Error::NoPendingSelection` if no pull
    /// precedes this reward.
    pub fn receive_reward(&mut self, _time: u64, reward: f64) -> Result<ZoomEvent> {
        if !reward.is_finite() {
            return Err(Error::NonFiniteReward(reward));
        }
        let id = self.selected.take().ok_or(Error::NoPendingSelection)?;
        let pulls = self.registry.record(id, reward, self.scorer.model())?.pulls;

        if self.clock.tick() {
            trace_debug!(
                time = self.clock.time(),
                phase = self.clock.phase(),
                next_end = self.clock.next_end(),
                "phase advanced"
            );
        }

        let cell = self.point(id)?.cell();
        let depth = self.partition.cell(cell).depth();
        let radius = confidence_radius(self.clock.phase(), pulls);
        if radius > self.zoom_threshold(depth) || pulls < self.min_pulls_before_zoom {
            return Ok(ZoomEvent::Unchanged);
        }

        if self.locked_in_step.is_none()
            && depth >= LOCK_IN_MIN_DEPTH
            && pulls >= LOCK_IN_MIN_PULLS
        {
            self.locked_in_step = Some(self.clock.time());
            trace_info!(time = self.clock.time(), depth, pulls, "locked in");
        }

        if self.is_saturated(cell) {
            trace_debug!(cell = cell.index(), depth, "refinement blocked by ceiling");
            return Ok(ZoomEvent::Saturated { cell });
        }

        self.refine(id, cell)
    }

    /// Splits `cell` and hands each child to `id` or to a new active point.
    ///
    /// Every representative is settled before the partition changes, so a
    /// split that cannot be represented leaves the bandit untouched.
    fn refine(&mut self, id: PointId, cell: CellId) -> Result<ZoomEvent> {
        let coords = self.point(id)?.coords().to_vec();
        let boxes = self.partition.child_bounds(cell);
        let Some(plan) = self.plan_children(&coords, &boxes) else {
            trace_debug!(cell = cell.index(), "refinement blocked by coordinate resolution");
            return Ok(ZoomEvent::Saturated { cell });
        };

        let children = self.partition.attach(cell, boxes);
        let mut new_points = Vec::new();
        for (child, seed) in children.into_iter().zip(plan) {
            match seed {
                None => self.registry.reassign(id, child)?,
                Some(rep) => new_points.push(self.registry.insert(&rep, child)?),
            }
        }

        let depth = self.partition.cell(cell).depth() + 1;
        trace_debug!(
            cell = cell.index(),
            depth,
            new_points = new_points.len(),
            active_points = self.registry.len(),
            "cell refined"
        );
        Ok(ZoomEvent::Refined {
            cell,
            depth,
            new_points,
        })
    }

    /// Representatives for the children in `boxes`: `None` for the one child
    /// holding `carried`, a rounded coordinate for each other child.
    ///
    /// Returns `None` unless exactly one child holds `carried` and every other
    /// representative rounds to a fresh coordinate inside its own child.
    fn plan_children(
        &mut self,
        carried: &[f64],
        boxes: &[Vec<Bounds>],
    ) -> Option<ChildPlan> {
        let mut plan = Vec::with_capacity(boxes.len());
        let mut keys = HashSet::new();
        let mut carriers = 0_usize;
        for bounds in boxes {
            if self.partition.box_contains(bounds, carried) {
                carriers += 1;
                plan.push(None);
                continue;
            }
            let seeded = self
                .seeder
                .as_mut()
                .and_then(|seeder| seeder.best_in(&self.partition, bounds));
            let rep = round_coords(&seeded.unwrap_or_else(|| box_center(bounds)));
            let fresh =
                self.registry.find(&rep).is_none() && keys.insert(PointKey::new(&rep));
            if !fresh || !self.partition.box_contains(bounds, &rep) {
                return None;
            }
            plan.push(Some(rep));
        }
        (carriers == 1).then_some(plan)
    }

    fn is_saturated(&self, cell: CellId) -> bool {
        let depth_blocked = self
            .max_depth
            .is_some_and(|max| self.partition.cell(cell).depth() + 1 > max);
        let cells_blocked = self.max_cells.is_some_and(|max| {
            self.partition
                .n_cells()
                .saturating_add(self.partition.split_width(cell))
                > max
        });
        depth_blocked || cells_blocked
    }

    /// The zoom threshold `nu · rho^depth`.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn zoom_threshold(&self, depth: usize) -> f64 {
        self.nu * self.rho.powf(depth as f64)
    }

    /// The confidence radius of a point with `pulls` pulls in the current phase.
    #[must_use]
    pub fn confidence_radius(&self, pulls: u64) -> f64 {
        confidence_radius(self.clock.phase(), pulls)
    }

    /// The point a [`pull`](Self::pull) at time 0 would choose, without
    /// changing the pending selection.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoActivePoints` if no point is active.
    pub fn last_point(&mut self) -> Result<Vec<f64>> {
        let id = self.argmax(0)?;
        Ok(self.point(id)?.coords().to_vec())
    }

    /// The active point with the highest mean reward; ties go to the more
    /// pulled point, then to the more recently created one.
    #[must_use]
    pub fn best_point(&self) -> Option<ActivePointView<'_>> {
        let mut best: Option<ActivePointView<'_>> = None;
        for view in self.active_points() {
            let better = best.as_ref().is_none_or(|b| {
                (view.mean, view.stats.pulls) >= (b.mean, b.stats.pulls)
            });
            if better {
                best = Some(view);
            }
        }
        best
    }

    /// The pending selection, if a pull is awaiting its reward.
    #[must_use]
    pub fn selected(&self) -> Option<ActivePointView<'_>> {
        self.selected.and_then(|id| self.view(id))
    }

    fn view(&self, id: PointId) -> Option<ActivePointView<'_>> {
        let point = self.registry.get(id)?;
        let cell = self.partition.cell(point.cell());
        Some(ActivePointView {
            id,
            coords: point.coords(),
            stats: point.stats(),
            mean: point.stats().mean_reward(self.scorer.model()),
            cell: point.cell(),
            depth: cell.depth(),
            bounds: cell.bounds(),
        })
    }

    /// Iterates over the active points in creation order.
    pub fn active_points(&self) -> impl Iterator<Item = ActivePointView<'_>> {
        (0..self.registry.len()).filter_map(|i| self.view(PointId(i)))
    }

    /// Looks up the active point at `coords` by rounded coordinate.
    #[must_use]
    pub fn find(&self, coords: &[f64]) -> Option<ActivePointView<'_>> {
        self.registry.find(coords).and_then(|id| self.view(id))
    }

    /// Number of active points.
    #[must_use]
    pub fn n_active_points(&self) -> usize {
        self.registry.len()
    }

    /// Sum of pull counts over all active points; always equals [`time`](Self::time).
    #[must_use]
    pub fn total_pulls(&self) -> u64 {
        self.registry.total_pulls()
    }

    /// Rounds completed.
    #[must_use]
    pub fn time(&self) -> u64 {
        self.clock.time()
    }

    /// The current phase.
    #[must_use]
    pub fn phase(&self) -> u32 {
        self.clock.phase()
    }

    /// The round at which the phase next advances.
    #[must_use]
    pub fn next_phase_boundary(&self) -> u64 {
        self.clock.next_end()
    }

    /// First round at which the zoom condition held at depth two or more
    /// with at least five pulls.
    #[must_use]
    pub fn locked_in_step(&self) -> Option<u64> {
        self.locked_in_step
    }

    /// Deepest layer of the partition.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.partition.depth()
    }

    /// The underlying partition.
    #[must_use]
    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    /// The domain being searched.
    #[must_use]
    pub fn domain(&self) -> &[Bounds] {
        self.partition.domain()
    }

    /// The smoothness scale `nu`.
    #[must_use]
    pub fn nu(&self) -> f64 {
        self.nu
    }

    /// The shrink factor `rho`.
    #[must_use]
    pub fn rho(&self) -> f64 {
        self.rho
    }

    /// The configured scoring method.
    #[must_use]
    pub fn scoring_method(&self) -> ScoringMethod {
        self.scoring_method
    }

    /// The configured reward model.
    #[must_use]
    pub fn reward_model(&self) -> RewardModel {
        self.scorer.model()
    }

    /// The configured minimum pulls before a zoom.
    #[must_use]
    pub fn min_pulls_before_zoom(&self) -> u64 {
        self.min_pulls_before_zoom
    }

    /// Captures the clock and every active point.
    #[must_use]
    pub fn snapshot(&self) -> ZoomingSnapshot {
        ZoomingSnapshot {
            time: self.clock.time(),
            phase: self.clock.phase(),
            next_phase_boundary: self.clock.next_end(),
            locked_in_step: self.locked_in_step,
            max_depth: self.partition.depth(),
            points: self
                .active_points()
                .map(|v| PointSnapshot {
                    coords: v.coords.to_vec(),
                    depth: v.depth,
                    bounds: v.bounds.to_vec(),
                    stats: *v.stats,
                })
                .collect(),
        }
    }
}

impl fmt::Debug for Zooming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Zooming")
            .field("nu", &self.nu)
            .field("rho", &self.rho)
            .field("scoring_method", &self.scoring_method)
            .field("reward_model", &self.scorer.model())
            .field("min_pulls_before_zoom", &self.min_pulls_before_zoom)
            .field("clock", &self.clock)
            .field("active_points", &self.registry.len())
            .field("max_depth", &self.partition.depth())
            .finish_non_exhaustive()
    }
}
