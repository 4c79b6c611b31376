//! Dyadic split: halve every dimension at once.

use super::SplitRule;
use crate::types::Bounds;

/// Cuts a cell at the midpoint of every dimension, creating `2^d` children.
///
/// Child `i` takes the upper half of dimension `k` when bit `k` of `i` is
/// set, so the first child is the all-lower corner and the last child is the
/// all-upper corner. In two dimensions the depth-1 layer of the unit square is
/// the four quadrants with centers `(0.25, 0.25)`, `(0.75, 0.25)`,
/// `(0.25, 0.75)` and `(0.75, 0.75)`, in that order.
///
/// The branching factor grows exponentially with the dimension; prefer
/// [`BinarySplit`](super::BinarySplit) beyond a handful of dimensions. When
/// `2^d` does not fit in a `usize` the split yields no children.
#[derive(Debug, Clone, Copy, Default)]
pub struct DyadicSplit;

impl DyadicSplit {
    fn n_children(dims: usize) -> Option<usize> {
        u32::try_from(dims)
            .ok()
            .and_then(|d| 1_usize.checked_shl(d))
    }
}

impl SplitRule for DyadicSplit {
    fn split(&self, bounds: &[Bounds]) -> Vec<Vec<Bounds>> {
        let Some(n_children) = Self::n_children(bounds.len()) else {
            return Vec::new();
        };
        (0..n_children)
            .map(|i| {
                bounds
                    .iter()
                    .enumerate()
                    .map(|(k, &(lo, hi))| {
                        let mid = (lo + hi) / 2.0;
                        if (i >> k) & 1 == 1 { (mid, hi) } else { (lo, mid) }
                    })
                    .collect()
            })
            .collect()
    }

    fn width(&self, bounds: &[Bounds]) -> usize {
        Self::n_children(bounds.len()).unwrap_or(usize::MAX)
    }

    fn clone_box(&self) -> Box<dyn SplitRule> {
        Box::new(*self)
    }
}
