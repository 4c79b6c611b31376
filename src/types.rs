//! Core configuration types for the zooming bandits.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::point::MAX_ABS_COORD;

/// Per-dimension `[low, high]` bounds of a search domain.
pub type Bounds = (f64, f64);

/// The statistical rule used to score active points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ScoringMethod {
    /// Upper confidence bound with a `sqrt(2 ln t / n)` bonus.
    #[default]
    Ucb,
    /// UCB whose bonus is tuned by the empirical reward variance.
    TunedUcb,
    /// Thompson sampling from the reward model's posterior.
    #[cfg_attr(feature = "serde", serde(rename = "ts"))]
    Thompson,
    /// The classic zooming index: mean plus twice the phase confidence radius.
    Zooming,
}

impl ScoringMethod {
    /// The canonical configuration name of this method.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ucb => "ucb",
            Self::TunedUcb => "tuned_ucb",
            Self::Thompson => "ts",
            Self::Zooming => "zooming",
        }
    }
}

impl fmt::Display for ScoringMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScoringMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ucb" => Ok(Self::Ucb),
            "tuned_ucb" | "tuned-ucb" | "ucb_tuned" => Ok(Self::TunedUcb),
            "ts" | "thompson" => Ok(Self::Thompson),
            "zooming" => Ok(Self::Zooming),
            _ => Err(Error::UnknownScoringMethod(s.to_string())),
        }
    }
}

/// How observed rewards are accumulated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RewardModel {
    /// Real-valued rewards tracked by a running mean.
    #[default]
    Gaussian,
    /// Binary rewards: anything above 0.5 counts as a success.
    Bernoulli,
}

impl RewardModel {
    /// The canonical configuration name of this model.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gaussian => "gaussian",
            Self::Bernoulli => "bernoulli",
        }
    }
}

impl fmt::Display for RewardModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RewardModel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gaussian" => Ok(Self::Gaussian),
            "bernoulli" => Ok(Self::Bernoulli),
            _ => Err(Error::UnknownRewardModel(s.to_string())),
        }
    }
}

/// Validates a domain and returns it as owned bounds.
pub(crate) fn validate_domain(domain: &[Bounds]) -> Result<Vec<Bounds>> {
    if domain.is_empty() {
        return Err(Error::ZeroDimensions);
    }
    for (dim, &(low, high)) in domain.iter().enumerate() {
        if !(low.is_finite() && high.is_finite()) || low >= high {
            return Err(Error::InvalidBounds { dim, low, high });
        }
        if let Some(value) = [low, high].into_iter().find(|v| v.abs() > MAX_ABS_COORD) {
            return Err(Error::BoundsOutOfRange {
                dim,
                value,
                limit: MAX_ABS_COORD,
            });
        }
    }
    Ok(domain.to_vec())
}
