use crate::error::{KdIndexError, Result};
use crate::kdtree::node::Node;
use crate::r#type::CoordFloat;

/// Dimension used by [`KdTree::new`] when the caller does not choose one.
const DEFAULT_DIMENSION: usize = 3;

/// A dynamic k-d tree over points of a fixed, runtime-chosen dimension.
///
/// Every inserted point may carry an optional payload of type `V`, returned
/// by the query methods alongside (or instead of) the coordinates. The tree
/// never rebalances: its shape is purely insertion-order-dependent, so
/// queries are expected `O(log n)` on randomly ordered input and degrade
/// toward `O(n)` when points arrive pre-sorted.
#[derive(Debug, Clone)]
pub struct KdTree<N: CoordFloat, V = ()> {
    pub(crate) dimension: usize,
    pub(crate) root: Option<Box<Node<N, V>>>,
    pub(crate) len: usize,
}

impl<N: CoordFloat, V> KdTree<N, V> {
    /// Create an empty tree with the default dimension of 3.
    pub fn new() -> Self {
        Self {
            dimension: DEFAULT_DIMENSION,
            root: None,
            len: 0,
        }
    }

    /// Create an empty tree over points of the given dimension.
    ///
    /// Returns [`KdIndexError::InvalidDimension`] if `dimension` is zero.
    pub fn with_dimension(dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(KdIndexError::InvalidDimension(
                "Tree dimension must be a positive integer.".to_string(),
            ));
        }
        Ok(Self {
            dimension,
            root: None,
            len: 0,
        })
    }

    /// The dimension every stored and queried point must have.
    pub fn dimensions(&self) -> usize {
        self.dimension
    }

    /// The number of points stored in this tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether this tree holds no points.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Insert a point without a payload.
    ///
    /// Returns [`KdIndexError::InvalidDimension`] if the point's length does
    /// not match [`dimensions`][Self::dimensions]; the tree is untouched in
    /// that case.
    pub fn insert(&mut self, point: &[N]) -> Result<()> {
        self.insert_node(point, None)
    }

    /// Insert a point carrying a payload.
    ///
    /// Duplicate coordinates are allowed; each insertion stores a separate
    /// point with its own payload.
    pub fn insert_with(&mut self, point: &[N], value: V) -> Result<()> {
        self.insert_node(point, Some(value))
    }

    fn insert_node(&mut self, point: &[N], value: Option<V>) -> Result<()> {
        self.check_point(point)?;

        let node = Box::new(Node::new(point.into(), value, self.len));

        // Descend cycling the split axis with depth: `<=` routes left, `>`
        // routes right. The search code mirrors the same branch choice, so
        // the comparison operator must stay identical in both places.
        let mut slot = &mut self.root;
        let mut depth = 0;
        loop {
            match slot {
                Some(current) => {
                    let axis = depth % self.dimension;
                    slot = if node.coords[axis] <= current.coords[axis] {
                        &mut current.left
                    } else {
                        &mut current.right
                    };
                    depth += 1;
                }
                None => break,
            }
        }
        *slot = Some(node);
        self.len += 1;
        Ok(())
    }

    pub(crate) fn check_point(&self, point: &[N]) -> Result<()> {
        if point.len() != self.dimension {
            return Err(KdIndexError::InvalidDimension(format!(
                "Got a point of length {} when expected {}.",
                point.len(),
                self.dimension
            )));
        }
        Ok(())
    }
}

impl<N: CoordFloat, V> Default for KdTree<N, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: CoordFloat, V> Drop for KdTree<N, V> {
    fn drop(&mut self) {
        // Sorted insertion orders make the tree a linear chain, so the
        // default recursive drop could exhaust the stack. Tear down
        // iteratively instead.
        let mut stack = Vec::new();
        stack.extend(self.root.take());
        while let Some(mut node) = stack.pop() {
            stack.extend(node.left.take());
            stack.extend(node.right.take());
        }
    }
}
