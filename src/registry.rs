//! The active-point registry and its per-point reward statistics.
//!
//! Active points are stored in creation order and addressed by [`PointId`].
//! A side table keyed by [`PointKey`] enforces that no two active points share
//! a rounded coordinate. The cell each point represents is stored as a
//! [`CellId`] so points can be moved to finer cells without touching the
//! partition tree.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::partition::CellId;
use crate::point::PointKey;
use crate::types::RewardModel;

/// Index of an active point, in creation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointId(pub(crate) usize);

impl PointId {
    /// Position of the point in creation order.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Running reward statistics of one active point.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArmStats {
    /// Number of rewards recorded.
    pub pulls: u64,
    /// Running mean of the rewards (Gaussian model).
    pub mean: f64,
    /// Rewards above 0.5 (Bernoulli model).
    pub successes: u64,
    /// Rewards at or below 0.5 (Bernoulli model).
    pub failures: u64,
    /// Sum of squared rewards.
    pub sum_sq: f64,
}

impl ArmStats {
    /// Folds one reward into the statistics.
    #[allow(clippy::cast_precision_loss)]
    pub fn record(&mut self, reward: f64, model: RewardModel) {
        match model {
            RewardModel::Gaussian => {
                let n = self.pulls as f64;
                self.mean = (self.mean * n + reward) / (n + 1.0);
            }
            RewardModel::Bernoulli => {
                if reward > 0.5 {
                    self.successes += 1;
                } else {
                    self.failures += 1;
                }
            }
        }
        self.sum_sq += reward * reward;
        self.pulls += 1;
    }

    /// The estimated mean reward under `model`.
    ///
    /// For the Bernoulli model this is the empirical success rate, and 0 for
    /// an unpulled point.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn mean_reward(&self, model: RewardModel) -> f64 {
        match model {
            RewardModel::Gaussian => self.mean,
            RewardModel::Bernoulli if self.pulls == 0 => 0.0,
            RewardModel::Bernoulli => self.successes as f64 / self.pulls as f64,
        }
    }

    /// Mean of the squared rewards, 0 for an unpulled point.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn mean_sq(&self) -> f64 {
        if self.pulls == 0 {
            0.0
        } else {
            self.sum_sq / self.pulls as f64
        }
    }
}

/// A tracked representative coordinate and the cell it currently stands for.
#[derive(Clone, Debug)]
pub struct ActivePoint {
    key: PointKey,
    coords: Vec<f64>,
    cell: CellId,
    stats: ArmStats,
}

impl ActivePoint {
    /// The rounded coordinate of the point.
    #[must_use]
    pub fn coords(&self) -> &[f64] {
        &self.coords
    }

    /// The identity key of the point.
    #[must_use]
    pub fn key(&self) -> &PointKey {
        &self.key
    }

    /// The cell the point currently represents.
    #[must_use]
    pub fn cell(&self) -> CellId {
        self.cell
    }

    /// The accumulated reward statistics.
    #[must_use]
    pub fn stats(&self) -> &ArmStats {
        &self.stats
    }
}

/// Active points in creation order, unique by rounded coordinate.
#[derive(Clone, Debug, Default)]
pub struct ActiveArmRegistry {
    points: Vec<ActivePoint>,
    index: HashMap<PointKey, PointId>,
}

impl ActiveArmRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new active point for `cell` with zeroed statistics.
    ///
    /// The coordinate is rounded before it is stored.
    ///
    /// # Errors
    ///
    /// Returns `Error::DuplicatePoint` if an active point with the same
    /// rounded coordinate already exists.
    pub fn insert(&mut self, coords: &[f64], cell: CellId) -> Result<PointId> {
        let key = PointKey::new(coords);
        if self.index.contains_key(&key) {
            return Err(Error::DuplicatePoint(key.to_coords()));
        }
        let id = PointId(self.points.len());
        self.points.push(ActivePoint {
            coords: key.to_coords(),
            key: key.clone(),
            cell,
            stats: ArmStats::default(),
        });
        self.index.insert(key, id);
        Ok(id)
    }

    /// Finds the active point at `coords`, comparing rounded coordinates.
    #[must_use]
    pub fn find(&self, coords: &[f64]) -> Option<PointId> {
        self.index.get(&PointKey::new(coords)).copied()
    }

    /// Looks up an active point.
    #[must_use]
    pub fn get(&self, id: PointId) -> Option<&ActivePoint> {
        self.points.get(id.0)
    }

    /// Records a reward for `id`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Internal` if `id` is not registered.
    pub fn record(&mut self, id: PointId, reward: f64, model: RewardModel) -> Result<&ArmStats> {
        let point = self
            .points
            .get_mut(id.0)
            .ok_or(Error::Internal("reward recorded for an unknown active point"))?;
        point.stats.record(reward, model);
        Ok(&point.stats)
    }

    /// Moves `id` to represent `cell`, keeping its statistics.
    ///
    /// # Errors
    ///
    /// Returns `Error::Internal` if `id` is not registered.
    pub fn reassign(&mut self, id: PointId, cell: CellId) -> Result<()> {
        let point = self
            .points
            .get_mut(id.0)
            .ok_or(Error::Internal("reassignment of an unknown active point"))?;
        point.cell = cell;
        Ok(())
    }

    /// The active point currently representing `cell`, if any.
    #[must_use]
    pub fn owner_of(&self, cell: CellId) -> Option<PointId> {
        self.points
            .iter()
            .position(|p| p.cell == cell)
            .map(PointId)
    }

    /// Iterates over the points in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (PointId, &ActivePoint)> {
        self.points.iter().enumerate().map(|(i, p)| (PointId(i), p))
    }

    /// Number of active points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if no point is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sum of pull counts over all active points.
    #[must_use]
    pub fn total_pulls(&self) -> u64 {
        self.points.iter().map(|p| p.stats.pulls).sum()
    }
}
