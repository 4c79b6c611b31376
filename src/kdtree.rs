//! Balanced k-d tree for nearest-neighbor lookup over a fixed point set.
//!
//! The tree is built once by recursive median splits on a cycling axis and
//! answers exact Euclidean nearest-neighbor queries. Equidistant points
//! resolve to the lowest index, matching a linear `argmin` scan.

use crate::error::{Error, Result};

#[derive(Clone, Copy, Debug)]
struct Node {
    point: usize,
    axis: usize,
    left: Option<usize>,
    right: Option<usize>,
}

/// A static k-d tree over a set of points.
#[derive(Clone, Debug)]
pub struct KdTree {
    points: Vec<Vec<f64>>,
    nodes: Vec<Node>,
    root: Option<usize>,
    dims: usize,
}

impl KdTree {
    /// Builds a tree over `points`.
    ///
    /// # Errors
    ///
    /// Returns `Error::EmptyArms` if `points` is empty and
    /// `Error::DimensionMismatch` if the points disagree on dimensionality
    /// or have none.
    pub fn new(points: Vec<Vec<f64>>) -> Result<Self> {
        let Some(first) = points.first() else {
            return Err(Error::EmptyArms);
        };
        let dims = first.len();
        if dims == 0 {
            return Err(Error::ZeroDimensions);
        }
        if let Some((index, p)) = points.iter().enumerate().find(|(_, p)| p.len() != dims) {
            return Err(Error::DimensionMismatch {
                expected: dims,
                got: p.len(),
                index,
            });
        }

        let mut tree = Self {
            nodes: Vec::with_capacity(points.len()),
            root: None,
            dims,
            points,
        };
        let mut order: Vec<usize> = (0..tree.points.len()).collect();
        tree.root = tree.build(&mut order, 0);
        Ok(tree)
    }

    fn build(&mut self, indices: &mut [usize], depth: usize) -> Option<usize> {
        if indices.is_empty() {
            return None;
        }
        let axis = depth % self.dims;
        let mid = indices.len() / 2;
        let points = &self.points;
        indices.select_nth_unstable_by(mid, |&a, &b| {
            points[a][axis]
                .total_cmp(&points[b][axis])
                .then(a.cmp(&b))
        });
        let point = indices[mid];
        let (lower, rest) = indices.split_at_mut(mid);
        let upper = &mut rest[1..];

        let left = self.build(lower, depth + 1);
        let right = self.build(upper, depth + 1);
        self.nodes.push(Node {
            point,
            axis,
            left,
            right,
        });
        Some(self.nodes.len() - 1)
    }

    /// Number of indexed points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if the tree indexes no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Dimensionality of the indexed points.
    #[must_use]
    pub fn dims(&self) -> usize {
        self.dims
    }

    /// The indexed point at `index`.
    #[must_use]
    pub fn point(&self, index: usize) -> Option<&[f64]> {
        self.points.get(index).map(Vec::as_slice)
    }

    /// Index of the point nearest to `query` and its Euclidean distance.
    ///
    /// # Errors
    ///
    /// Returns `Error::DimensionMismatch` if `query` has the wrong
    /// dimensionality.
    pub fn nearest(&self, query: &[f64]) -> Result<(usize, f64)> {
        if query.len() != self.dims {
            return Err(Error::DimensionMismatch {
                expected: self.dims,
                got: query.len(),
                index: 0,
            });
        }
        let mut best = (usize::MAX, f64::INFINITY);
        if let Some(root) = self.root {
            self.search(root, query, &mut best);
        }
        Ok((best.0, best.1.sqrt()))
    }

    #[allow(clippy::float_cmp)]
    fn search(&self, node: usize, query: &[f64], best: &mut (usize, f64)) {
        let Node {
            point,
            axis,
            left,
            right,
        } = self.nodes[node];

        let dist = squared_distance(&self.points[point], query);
        if dist < best.1 || (dist == best.1 && point < best.0) {
            *best = (point, dist);
        }

        let diff = query[axis] - self.points[point][axis];
        let (near, far) = if diff < 0.0 {
            (left, right)
        } else {
            (right, left)
        };
        if let Some(near) = near {
            self.search(near, query, best);
        }
        if let Some(far) = far
            && diff * diff <= best.1
        {
            self.search(far, query, best);
        }
    }
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}
