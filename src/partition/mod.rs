//! Hierarchical partitions of a bounded hyperrectangular domain.
//!
//! A [`Partition`] is an arena of [`Cell`]s addressed by [`CellId`]. The root
//! cell covers the whole domain at depth 0; [`Partition::deepen`] splits it
//! into the depth-1 layer, and [`Partition::split`] refines individual cells
//! on demand. How a cell is cut is delegated to a [`SplitRule`]:
//!
//! | Rule | Children per split | Cut |
//! |------|--------------------|-----|
//! | [`DyadicSplit`] | `2^d` | every dimension at its midpoint |
//! | [`BinarySplit`] | 2 | the widest dimension at its midpoint |
//!
//! Cells are half-open: a point belongs to a cell when `low <= x < high` on
//! every dimension, except that `x == high` is accepted on the outer edge of
//! the root domain. Siblings are therefore disjoint and tile their parent.

pub mod binary;
pub mod dyadic;

use core::fmt::Debug;

pub use binary::BinarySplit;
pub use dyadic::DyadicSplit;

use crate::types::Bounds;

/// Index of a cell inside its [`Partition`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellId(pub(crate) usize);

impl CellId {
    /// The arena slot of this cell.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// A hyperrectangular region of the domain.
#[derive(Clone, Debug)]
pub struct Cell {
    bounds: Vec<Bounds>,
    depth: usize,
    parent: Option<CellId>,
    children: Vec<CellId>,
}

impl Cell {
    /// Per-dimension `[low, high]` bounds.
    #[must_use]
    pub fn bounds(&self) -> &[Bounds] {
        &self.bounds
    }

    /// Depth in the tree; the root is at depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The cell this one was split from.
    #[must_use]
    pub fn parent(&self) -> Option<CellId> {
        self.parent
    }

    /// Children created by splitting this cell, in creation order.
    #[must_use]
    pub fn children(&self) -> &[CellId] {
        &self.children
    }

    /// Returns `true` if the cell has not been split.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// The geometric center, used as the cell's representative point.
    #[must_use]
    pub fn center(&self) -> Vec<f64> {
        box_center(&self.bounds)
    }
}

/// The geometric center of `bounds`.
#[must_use]
pub fn box_center(bounds: &[Bounds]) -> Vec<f64> {
    bounds.iter().map(|&(lo, hi)| (lo + hi) / 2.0).collect()
}

/// A strategy for cutting a cell into children.
///
/// The returned boxes must be pairwise disjoint (under half-open containment)
/// and cover the input box exactly. The order of the returned boxes is the
/// order in which children are created.
///
/// # Examples
///
/// ```
/// use zooming::partition::SplitRule;
/// use zooming::types::Bounds;
///
/// /// Cut the first dimension into thirds.
/// #[derive(Debug, Clone)]
/// struct Thirds;
///
/// impl SplitRule for Thirds {
///     fn split(&self, bounds: &[Bounds]) -> Vec<Vec<Bounds>> {
///         let (lo, hi) = bounds[0];
///         let w = (hi - lo) / 3.0;
///         (0..3_u8)
///             .map(|i| {
///                 let mut b = bounds.to_vec();
///                 let i = f64::from(i);
///                 b[0] = (lo + i * w, if i == 2.0 { hi } else { lo + (i + 1.0) * w });
///                 b
///             })
///             .collect()
///     }
///
///     fn clone_box(&self) -> Box<dyn SplitRule> {
///         Box::new(self.clone())
///     }
/// }
/// ```
pub trait SplitRule: Send + Sync + Debug {
    /// Cuts `bounds` into the bounds of its children.
    fn split(&self, bounds: &[Bounds]) -> Vec<Vec<Bounds>>;

    /// Number of children [`split`](Self::split) would return for `bounds`.
    ///
    /// The default calls `split`; rules whose width is known up front should
    /// override it so callers can check the width without allocating.
    fn width(&self, bounds: &[Bounds]) -> usize {
        self.split(bounds).len()
    }

    /// Creates a boxed clone of this rule.
    fn clone_box(&self) -> Box<dyn SplitRule>;
}

impl Clone for Box<dyn SplitRule> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// An arena-allocated tree of cells over a fixed domain.
#[derive(Clone, Debug)]
pub struct Partition {
    domain: Vec<Bounds>,
    cells: Vec<Cell>,
    layers: Vec<Vec<CellId>>,
    rule: Box<dyn SplitRule>,
}

impl Partition {
    /// Creates a partition holding only the root cell.
    #[must_use]
    pub fn new(domain: Vec<Bounds>, rule: Box<dyn SplitRule>) -> Self {
        let root = Cell {
            bounds: domain.clone(),
            depth: 0,
            parent: None,
            children: Vec::new(),
        };
        Self {
            domain,
            cells: vec![root],
            layers: vec![vec![CellId(0)]],
            rule,
        }
    }

    /// The root cell, covering the whole domain.
    #[must_use]
    pub fn root(&self) -> CellId {
        CellId(0)
    }

    /// The domain this partition covers.
    #[must_use]
    pub fn domain(&self) -> &[Bounds] {
        &self.domain
    }

    /// Number of dimensions.
    #[must_use]
    pub fn dims(&self) -> usize {
        self.domain.len()
    }

    /// The deepest layer materialized so far.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.layers.len() - 1
    }

    /// Total number of cells, including the root and interior cells.
    #[must_use]
    pub fn n_cells(&self) -> usize {
        self.cells.len()
    }

    /// Number of children a split of `id` would create.
    #[must_use]
    pub fn split_width(&self, id: CellId) -> usize {
        self.rule.width(&self.cells[id.0].bounds)
    }

    /// The bounds a split of `id` would give its children, without splitting.
    #[must_use]
    pub fn child_bounds(&self, id: CellId) -> Vec<Vec<Bounds>> {
        self.rule.split(&self.cells[id.0].bounds)
    }

    /// Looks up a cell.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this partition.
    #[must_use]
    pub fn cell(&self, id: CellId) -> &Cell {
        &self.cells[id.0]
    }

    /// The cells at `depth`, in creation order.
    #[must_use]
    pub fn layer(&self, depth: usize) -> &[CellId] {
        self.layers.get(depth).map_or(&[], Vec::as_slice)
    }

    /// Splits every leaf of the deepest layer, adding one layer to the tree.
    ///
    /// A fresh partition becomes a depth-1 partition whose layer tiles the
    /// domain.
    pub fn deepen(&mut self) {
        let deepest = self.layers[self.depth()].clone();
        for id in deepest {
            self.split(id);
        }
    }

    /// Splits `parent` into children and returns them in creation order.
    ///
    /// The children land one level below `parent`; if `parent` is already in
    /// the deepest layer this grows the tree by a new layer. Splitting a cell
    /// that already has children returns the existing children unchanged.
    pub fn split(&mut self, parent: CellId) -> Vec<CellId> {
        if !self.cells[parent.0].children.is_empty() {
            return self.cells[parent.0].children.clone();
        }
        let boxes = self.child_bounds(parent);
        self.attach(parent, boxes)
    }

    /// Attaches children with the given bounds to the leaf `parent`.
    ///
    /// `boxes` must come from [`child_bounds`](Self::child_bounds) of the
    /// same leaf.
    pub(crate) fn attach(&mut self, parent: CellId, boxes: Vec<Vec<Bounds>>) -> Vec<CellId> {
        if boxes.is_empty() {
            return Vec::new();
        }
        let depth = self.cells[parent.0].depth + 1;
        if depth == self.layers.len() {
            self.layers.push(Vec::new());
        }
        let mut children = Vec::with_capacity(boxes.len());
        for bounds in boxes {
            let id = CellId(self.cells.len());
            self.cells.push(Cell {
                bounds,
                depth,
                parent: Some(parent),
                children: Vec::new(),
            });
            self.layers[depth].push(id);
            children.push(id);
        }
        self.cells[parent.0].children.clone_from(&children);
        children
    }

    /// Returns `true` if `point` lies inside cell `id` under half-open containment.
    #[must_use]
    pub fn contains(&self, id: CellId, point: &[f64]) -> bool {
        self.box_contains(&self.cells[id.0].bounds, point)
    }

    /// Half-open containment of `point` in `bounds`, a box inside this
    /// partition's domain.
    #[allow(clippy::float_cmp)]
    #[must_use]
    pub fn box_contains(&self, bounds: &[Bounds], point: &[f64]) -> bool {
        point.len() == bounds.len()
            && bounds
                .iter()
                .zip(&self.domain)
                .zip(point)
                .all(|((&(lo, hi), &(_, outer_hi)), &x)| {
                    x >= lo && (x < hi || (x == hi && hi == outer_hi))
                })
    }

    /// Finds the leaf containing `point`, walking down from the root.
    #[must_use]
    pub fn locate(&self, point: &[f64]) -> Option<CellId> {
        let mut current = self.root();
        if !self.contains(current, point) {
            return None;
        }
        loop {
            let next = self.cells[current.0]
                .children
                .iter()
                .copied()
                .find(|&child| self.contains(child, point));
            match next {
                Some(child) => current = child,
                None => return Some(current),
            }
        }
    }
}
