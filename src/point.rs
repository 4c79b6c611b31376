//! Value identity for active-point coordinates.
//!
//! Coordinates are rounded to [`DECIMALS`] places once, when a point is
//! created. The rounded coordinate is what the caller sees, what containment
//! tests use, and what the registry hashes, so two points are the same point
//! exactly when their rounded coordinates are equal.

/// Number of decimal places kept in an active-point coordinate.
pub const DECIMALS: i32 = 8;

const SCALE: f64 = 1e8;

/// Largest coordinate magnitude whose rounded form still fits the integer key.
pub const MAX_ABS_COORD: f64 = 9.2e10;

/// A coordinate rounded to [`DECIMALS`] places, usable as a map key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointKey(Vec<i64>);

impl PointKey {
    /// Builds the key of a coordinate, rounding each component.
    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn new(coords: &[f64]) -> Self {
        Self(coords.iter().map(|&x| (x * SCALE).round() as i64).collect())
    }

    /// The rounded coordinate this key stands for.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn to_coords(&self) -> Vec<f64> {
        self.0.iter().map(|&k| k as f64 / SCALE).collect()
    }

    /// Number of dimensions.
    #[must_use]
    pub fn dims(&self) -> usize {
        self.0.len()
    }
}

/// Rounds a coordinate to [`DECIMALS`] places.
#[must_use]
pub fn round_coords(coords: &[f64]) -> Vec<f64> {
    PointKey::new(coords).to_coords()
}
