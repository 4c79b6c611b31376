//! Binary split: halve the widest dimension.

use super::SplitRule;
use crate::types::Bounds;

/// Cuts a cell into two halves along its widest dimension.
///
/// Ties between equally wide dimensions go to the lowest dimension index,
/// so repeated splits of a square cycle through the dimensions. The lower
/// half is created first.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinarySplit;

impl BinarySplit {
    fn widest(bounds: &[Bounds]) -> usize {
        let mut best = 0;
        let mut best_width = f64::NEG_INFINITY;
        for (dim, &(lo, hi)) in bounds.iter().enumerate() {
            if hi - lo > best_width {
                best_width = hi - lo;
                best = dim;
            }
        }
        best
    }
}

impl SplitRule for BinarySplit {
    fn split(&self, bounds: &[Bounds]) -> Vec<Vec<Bounds>> {
        let dim = Self::widest(bounds);
        let (lo, hi) = bounds[dim];
        let mid = (lo + hi) / 2.0;

        let mut lower = bounds.to_vec();
        lower[dim] = (lo, mid);
        let mut upper = bounds.to_vec();
        upper[dim] = (mid, hi);
        vec![lower, upper]
    }

    fn width(&self, _bounds: &[Bounds]) -> usize {
        2
    }

    fn clone_box(&self) -> Box<dyn SplitRule> {
        Box::new(*self)
    }
}
