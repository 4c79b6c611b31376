#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(unreachable_pub)]
#![deny(clippy::correctness)]
#![deny(clippy::suspicious)]
#![deny(clippy::style)]
#![deny(clippy::complexity)]
#![deny(clippy::perf)]
#![deny(clippy::pedantic)]
#![deny(clippy::std_instead_of_core)]

//! Zooming bandits for continuous and densely discretised arm spaces.
//!
//! A zooming bandit searches a bounded hyperrectangle by playing a small set
//! of *active points*, one per cell of an adaptive partition, and splitting a
//! cell once its point has been pulled often enough that the confidence
//! radius drops below the cell's depth-scaled tolerance. Exploration is
//! therefore concentrated where rewards are high.
//!
//! # Getting Started
//!
//! ```
//! use zooming::prelude::*;
//!
//! let mut bandit = Zooming::builder()
//!     .domain([(0.0, 1.0), (0.0, 1.0)])
//!     .nu(3.0)
//!     .rho(0.8)
//!     .reward_model(RewardModel::Bernoulli)
//!     .seed(1)
//!     .build()
//!     .unwrap();
//!
//! for t in 0..200 {
//!     let x = bandit.pull(t).unwrap();
//!     let near = ((x[0] - 0.9).powi(2) + (x[1] - 0.9).powi(2)).sqrt() <= 0.25;
//!     bandit.receive_reward(t, if near { 1.0 } else { 0.0 }).unwrap();
//! }
//!
//! let best = bandit.best_point().unwrap();
//! println!("best = {:?}, mean = {:.3}", best.coords, best.mean);
//! ```
//!
//! # Core Concepts
//!
//! | Type | Role |
//! |------|------|
//! | [`Zooming`] | The bandit: alternate [`pull`](Zooming::pull) and [`receive_reward`](Zooming::receive_reward). |
//! | [`ZoomingBuilder`] | Configure domain, `nu`, `rho`, scoring, reward model and refinement guards. |
//! | [`Partition`](partition::Partition) | Hierarchical cells over the domain, split by a [`SplitRule`](partition::SplitRule). |
//! | [`ActiveArmRegistry`](registry::ActiveArmRegistry) | Active points keyed by rounded coordinate, with per-point statistics. |
//! | [`Scorer`](scoring::Scorer) | The exploration-exploitation index used to rank active points. |
//! | [`DiscreteZooming`] | The bandit restricted to a finite arm set through a [`KdTree`](kdtree::KdTree). |
//! | [`RegretTracker`] | Instantaneous and cumulative regret against known arm means. |
//!
//! # Scoring Methods
//!
//! | Method | Index | Notes |
//! |--------|-------|-------|
//! | [`ScoringMethod::Ucb`] | `mean + sqrt(2 ln(t+1) / n)` | default |
//! | [`ScoringMethod::TunedUcb`] | UCB with a variance-capped bonus | |
//! | [`ScoringMethod::Thompson`] | Beta or Normal posterior draw | seeded by [`ZoomingBuilder::seed`] |
//! | [`ScoringMethod::Zooming`] | `mean + 2r`, `r` the confidence radius | |
//!
//! # Feature Flags
//!
//! | Flag | What it enables | Default |
//! |------|----------------|---------|
//! | `serde` | `Serialize`/`Deserialize` on configuration, statistics and [`ZoomingSnapshot`] | off |
//! | `tracing` | Structured log events via [`tracing`](https://docs.rs/tracing) at initialization, phase changes and refinements | off |

/// Emit a `tracing::info!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_info {
    ($($arg:tt)*) => { tracing::info!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_info {
    ($($arg:tt)*) => {};
}

/// Emit a `tracing::debug!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_debug {
    ($($arg:tt)*) => { tracing::debug!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_debug {
    ($($arg:tt)*) => {};
}

pub mod bandit;
mod discrete;
mod error;
pub mod kdtree;
pub mod partition;
pub mod point;
mod regret;
pub mod registry;
mod rng_util;
pub mod scoring;
pub mod types;
mod zooming;

pub use bandit::Bandit;
pub use discrete::{DiscreteZooming, DiscreteZoomingBuilder};
pub use error::{Error, Result};
pub use regret::RegretTracker;
pub use types::{Bounds, RewardModel, ScoringMethod};
pub use zooming::{
    ActivePointView, PhaseClock, PointSnapshot, ZoomEvent, Zooming, ZoomingBuilder,
    ZoomingSnapshot,
};

/// Convenient wildcard import for the most common types.
///
/// ```
/// use zooming::prelude::*;
/// ```
pub mod prelude {
    pub use crate::bandit::{Bandit, run};
    pub use crate::discrete::{DiscreteZooming, DiscreteZoomingBuilder};
    pub use crate::error::{Error, Result};
    pub use crate::partition::{BinarySplit, DyadicSplit, SplitRule};
    pub use crate::regret::RegretTracker;
    pub use crate::types::{Bounds, RewardModel, ScoringMethod};
    pub use crate::zooming::{ZoomEvent, Zooming, ZoomingBuilder, ZoomingSnapshot};
}
