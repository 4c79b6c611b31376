//! Exploration-exploitation scores for active points.
//!
//! A [`Scorer`] is resolved once from a [`ScoringMethod`] and a
//! [`RewardModel`]; scoring then only dispatches on the resolved rule.
//!
//! | Method | Score |
//! |--------|-------|
//! | `ucb` | `mean + sqrt(2 ln(t+1) / (n+ε))` |
//! | `tuned_ucb` | `mean + sqrt(ln(t+1)/(n+ε) · min(1/4, var + sqrt(2 ln(t+1)/(n+ε))))` |
//! | `ts` | Beta(1+s, 1+f) draw (Bernoulli) or Normal(mean, 1/sqrt(n+ε)) draw (Gaussian) |
//! | `zooming` | `mean + 2 sqrt(8 phase / (2+n))` |
//!
//! `ε` is [`EPSILON`]; `var` is `max(0, mean(r²) − mean²)`.

use rand::rngs::StdRng;

use crate::registry::ArmStats;
use crate::rng_util;
use crate::types::{RewardModel, ScoringMethod};

/// Guard added to pull counts in denominators.
pub const EPSILON: f64 = 1e-6;

/// The round-dependent inputs of a score.
#[derive(Clone, Copy, Debug)]
pub struct ScoreContext {
    /// The caller-supplied time of the pull.
    pub time: u64,
    /// The current confidence-radius phase.
    pub phase: u32,
}

impl ScoreContext {
    #[allow(clippy::cast_precision_loss)]
    fn log_time(self) -> f64 {
        (self.time as f64 + 1.0).ln()
    }
}

/// Confidence radius `sqrt(8 · phase / (2 + pulls))` shared by all points.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn confidence_radius(phase: u32, pulls: u64) -> f64 {
    (8.0 * f64::from(phase) / (2.0 + pulls as f64)).sqrt()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Rule {
    Ucb,
    TunedUcb,
    BetaSample,
    NormalSample,
    ZoomingIndex,
}

/// A scoring rule bound to a reward model.
#[derive(Clone, Copy, Debug)]
pub struct Scorer {
    rule: Rule,
    model: RewardModel,
}

impl Scorer {
    /// Resolves the scoring rule for `method` under `model`.
    #[must_use]
    pub fn new(method: ScoringMethod, model: RewardModel) -> Self {
        let rule = match (method, model) {
            (ScoringMethod::Ucb, _) => Rule::Ucb,
            (ScoringMethod::TunedUcb, _) => Rule::TunedUcb,
            (ScoringMethod::Thompson, RewardModel::Bernoulli) => Rule::BetaSample,
            (ScoringMethod::Thompson, RewardModel::Gaussian) => Rule::NormalSample,
            (ScoringMethod::Zooming, _) => Rule::ZoomingIndex,
        };
        Self { rule, model }
    }

    /// The reward model the scorer reads statistics under.
    #[must_use]
    pub fn model(&self) -> RewardModel {
        self.model
    }

    /// Returns `true` if scores are random draws.
    #[must_use]
    pub fn is_stochastic(&self) -> bool {
        matches!(self.rule, Rule::BetaSample | Rule::NormalSample)
    }

    /// Scores one active point.
    #[allow(clippy::cast_precision_loss)]
    pub fn score(&self, stats: &ArmStats, ctx: ScoreContext, rng: &mut StdRng) -> f64 {
        let mean = stats.mean_reward(self.model);
        let n = stats.pulls as f64 + EPSILON;
        match self.rule {
            Rule::Ucb => mean + (2.0 * ctx.log_time() / n).sqrt(),
            Rule::TunedUcb => {
                let variance = (stats.mean_sq() - mean * mean).max(0.0);
                let log_t = ctx.log_time();
                let cap = (variance + (2.0 * log_t / n).sqrt()).min(0.25);
                mean + (log_t / n * cap).sqrt()
            }
            Rule::BetaSample => rng_util::sample_beta(
                rng,
                1.0 + stats.successes as f64,
                1.0 + stats.failures as f64,
            ),
            Rule::NormalSample => rng_util::sample_normal(rng, mean, 1.0 / n.sqrt()),
            Rule::ZoomingIndex => mean + 2.0 * confidence_radius(ctx.phase, stats.pulls),
        }
    }
}
