#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when no domain was given to a builder.
    #[error("parameter space is not given: the domain must be set before building")]
    MissingDomain,

    /// Returned when the domain has no dimensions.
    #[error("domain must have at least one dimension")]
    ZeroDimensions,

    /// Returned when the lower bound is greater than the upper bound.
    #[error("invalid bounds in dimension {dim}: low ({low}) must be less than high ({high})")]
    InvalidBounds {
        /// The offending dimension.
        dim: usize,
        /// The lower bound value.
        low: f64,
        /// The upper bound value.
        high: f64,
    },

    /// Returned when a bound lies outside the range that rounded coordinates
    /// can represent.
    #[error("bounds in dimension {dim} exceed the coordinate range: |{value}| > {limit}")]
    BoundsOutOfRange {
        /// The offending dimension.
        dim: usize,
        /// The offending bound.
        value: f64,
        /// The largest representable magnitude.
        limit: f64,
    },

    /// Returned when the split rule would create more depth-1 cells than allowed.
    #[error("initial split creates {children} cells, more than the limit of {max}")]
    SplitTooWide {
        /// Children the split rule creates for the root cell.
        children: usize,
        /// The largest initial layer allowed.
        max: usize,
    },

    /// Returned when the smoothness scale `nu` is not positive.
    #[error("invalid nu: {0} must be positive")]
    InvalidNu(f64),

    /// Returned when the shrink factor `rho` is not in (0.0, 1.0).
    #[error("invalid rho: {0} must be in (0.0, 1.0)")]
    InvalidRho(f64),

    /// Returned when a scoring method name is not recognized.
    #[error("unknown scoring method '{0}': expected one of ucb, tuned_ucb, ts, zooming")]
    UnknownScoringMethod(String),

    /// Returned when a reward model name is not recognized.
    #[error("unknown reward model '{0}': expected gaussian or bernoulli")]
    UnknownRewardModel(String),

    /// Returned when a point has a different dimensionality than the domain.
    #[error("dimension mismatch: expected {expected} dimensions but point {index} has {got}")]
    DimensionMismatch {
        /// The dimensionality of the domain.
        expected: usize,
        /// The dimensionality of the offending point.
        got: usize,
        /// The index of the offending point.
        index: usize,
    },

    /// Returned when a discrete adapter is built without arms.
    #[error("discrete arm set cannot be empty")]
    EmptyArms,

    /// Returned when an arm index is outside the arm set.
    #[error("arm index {index} out of range for {n_arms} arms")]
    ArmOutOfRange {
        /// The offending index.
        index: usize,
        /// The number of arms.
        n_arms: usize,
    },

    /// Returned when `pull` runs with an empty active-point registry.
    #[error("no active points: the partition produced no cells to explore")]
    NoActivePoints,

    /// Returned when a reward arrives without a preceding selection.
    #[error("no pending selection: every reward must follow exactly one pull")]
    NoPendingSelection,

    /// Returned when a reward is NaN or infinite.
    #[error("reward must be finite, got {0}")]
    NonFiniteReward(f64),

    /// Returned when refinement would register a coordinate that is already active.
    #[error("duplicate active point at {0:?}")]
    DuplicatePoint(Vec<f64>),

    /// Returned when an internal invariant is violated.
    #[error("internal error: {0}")]
    Internal(&'static str),
}

pub type Result<T> = core::result::Result<T, Error>;
