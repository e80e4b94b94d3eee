use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::error::{KdIndexError, Result};
use crate::kdtree::index::KdTree;
use crate::kdtree::node::Node;
use crate::r#type::CoordFloat;

/// A borrowed view of one stored point, as returned by the query methods.
#[derive(Debug)]
pub struct Neighbor<'a, N: CoordFloat, V> {
    coords: &'a [N],
    value: Option<&'a V>,
}

impl<'a, N: CoordFloat, V> Neighbor<'a, N, V> {
    /// The stored point's coordinates.
    pub fn coords(&self) -> &'a [N] {
        self.coords
    }

    /// The payload attached at insertion, if any.
    pub fn value(&self) -> Option<&'a V> {
        self.value
    }

    fn from_node(node: &'a Node<N, V>) -> Self {
        Self {
            coords: &node.coords,
            value: node.value.as_ref(),
        }
    }
}

// Manual impls so `V` itself need not be `Clone`/`Copy`.
impl<N: CoordFloat, V> Clone for Neighbor<'_, N, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N: CoordFloat, V> Copy for Neighbor<'_, N, V> {}

impl<N: CoordFloat, V> KdTree<N, V> {
    /// Find the single stored point nearest to `point` by Euclidean
    /// distance.
    ///
    /// Returns `Ok(None)` on an empty tree. When several stored points are
    /// equally near, the one visited first wins.
    ///
    /// Returns [`KdIndexError::InvalidDimension`] if the query point's
    /// length does not match the tree's dimension.
    pub fn nearest(&self, point: &[N]) -> Result<Option<Neighbor<'_, N, V>>> {
        self.check_point(point)?;

        let mut best: Option<(N, &Node<N, V>)> = None;
        if let Some(root) = &self.root {
            nearest_search(root, point, self.dimension, 0, &mut best);
        }
        Ok(best.map(|(_, node)| Neighbor::from_node(node)))
    }

    /// Shortcut for [`nearest`][Self::nearest] returning only the winning
    /// point's coordinates.
    pub fn nearest_point(&self, point: &[N]) -> Result<Option<&[N]>> {
        Ok(self.nearest(point)?.map(|neighbor| neighbor.coords()))
    }

    /// Shortcut for [`nearest`][Self::nearest] returning only the winning
    /// point's payload.
    ///
    /// Returns `Ok(None)` both when the tree is empty and when the winning
    /// point carries no payload.
    pub fn nearest_value(&self, point: &[N]) -> Result<Option<&V>> {
        Ok(self.nearest(point)?.and_then(|neighbor| neighbor.value()))
    }

    /// Find the `k` stored points nearest to `point`, sorted by ascending
    /// Euclidean distance.
    ///
    /// Returns fewer than `k` entries when the tree holds fewer points, and
    /// an empty vector when `k` is zero or the tree is empty. Points at
    /// equal distance are ordered by insertion order.
    ///
    /// Returns [`KdIndexError::InvalidDimension`] if the query point's
    /// length does not match the tree's dimension.
    pub fn nearest_range(&self, point: &[N], k: usize) -> Result<Vec<Neighbor<'_, N, V>>> {
        self.check_point(point)?;

        if k == 0 {
            return Ok(vec![]);
        }

        let mut heap = BinaryHeap::with_capacity(k.min(self.len) + 1);
        if let Some(root) = &self.root {
            range_search(root, point, self.dimension, 0, k, &mut heap);
        }

        Ok(heap
            .into_sorted_vec()
            .into_iter()
            .map(|candidate| Neighbor::from_node(candidate.node))
            .collect())
    }

    /// Find every stored point within `radius` of `point`, sorted by
    /// ascending Euclidean distance.
    ///
    /// Points at exactly `radius` are included. Returns
    /// [`KdIndexError::InvalidArgument`] when `radius` is negative or NaN,
    /// and [`KdIndexError::InvalidDimension`] on a query-point arity
    /// mismatch.
    pub fn within(&self, point: &[N], radius: N) -> Result<Vec<Neighbor<'_, N, V>>> {
        self.check_point(point)?;
        if radius < N::zero() || radius.is_nan() {
            return Err(KdIndexError::InvalidArgument(format!(
                "Got search radius {:?} when expected a non-negative number.",
                radius
            )));
        }

        let mut found = Vec::new();
        if let Some(root) = &self.root {
            within_search(root, point, self.dimension, 0, radius * radius, &mut found);
        }
        found.sort_unstable();

        Ok(found
            .into_iter()
            .map(|candidate| Neighbor::from_node(candidate.node))
            .collect())
    }
}

/// Heap entry for ranked queries: squared distance first, insertion order
/// breaking ties, so results are totally ordered and reproducible.
struct Candidate<'a, N: CoordFloat, V> {
    dist: N,
    node: &'a Node<N, V>,
}

impl<N: CoordFloat, V> PartialEq for Candidate<'_, N, V> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<N: CoordFloat, V> Eq for Candidate<'_, N, V> {}

impl<N: CoordFloat, V> Ord for Candidate<'_, N, V> {
    fn cmp(&self, other: &Self) -> Ordering {
        // We don't allow NaN. This should only panic on NaN
        self.dist
            .partial_cmp(&other.dist)
            .unwrap()
            .then_with(|| self.node.seq.cmp(&other.node.seq))
    }
}

impl<N: CoordFloat, V> PartialOrd for Candidate<'_, N, V> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[inline]
fn sq_dist<N: CoordFloat>(a: &[N], b: &[N]) -> N {
    let mut acc = N::zero();
    for (&x, &y) in a.iter().zip(b) {
        let d = x - y;
        acc = acc + d * d;
    }
    acc
}

fn nearest_search<'a, N: CoordFloat, V>(
    node: &'a Node<N, V>,
    point: &[N],
    dimension: usize,
    depth: usize,
    best: &mut Option<(N, &'a Node<N, V>)>,
) {
    let dist = sq_dist(point, &node.coords);
    // Strict comparison keeps the earliest-visited node on distance ties.
    match best {
        Some((best_dist, _)) if dist >= *best_dist => {}
        _ => *best = Some((dist, node)),
    }

    let axis = depth % dimension;
    let delta = point[axis] - node.coords[axis];
    // Mirror the insertion branch choice to reach a plausible nearby leaf
    // first, then reconsider the far side.
    let (near, far) = if point[axis] <= node.coords[axis] {
        (&node.left, &node.right)
    } else {
        (&node.right, &node.left)
    };

    if let Some(child) = near {
        nearest_search(child, point, dimension, depth + 1, best);
    }

    // The far subtree can only hold a closer point when the splitting
    // hyperplane is nearer than the best match so far.
    let revisit = match best {
        Some((best_dist, _)) => delta * delta < *best_dist,
        None => true,
    };
    if revisit {
        if let Some(child) = far {
            nearest_search(child, point, dimension, depth + 1, best);
        }
    }
}

fn range_search<'a, N: CoordFloat, V>(
    node: &'a Node<N, V>,
    point: &[N],
    dimension: usize,
    depth: usize,
    k: usize,
    heap: &mut BinaryHeap<Candidate<'a, N, V>>,
) {
    let candidate = Candidate {
        dist: sq_dist(point, &node.coords),
        node,
    };
    if heap.len() < k {
        heap.push(candidate);
    } else if let Some(worst) = heap.peek() {
        if candidate.cmp(worst) == Ordering::Less {
            heap.pop();
            heap.push(candidate);
        }
    }

    let axis = depth % dimension;
    let delta = point[axis] - node.coords[axis];
    let (near, far) = if point[axis] <= node.coords[axis] {
        (&node.left, &node.right)
    } else {
        (&node.right, &node.left)
    };

    if let Some(child) = near {
        range_search(child, point, dimension, depth + 1, k, heap);
    }

    // Until the collection is full the far side must always be visited.
    // Once full, ties on the pruning bound still recurse so an equally
    // distant, earlier-inserted point is never missed.
    let revisit = heap.len() < k
        || heap
            .peek()
            .is_some_and(|worst| delta * delta <= worst.dist);
    if revisit {
        if let Some(child) = far {
            range_search(child, point, dimension, depth + 1, k, heap);
        }
    }
}

fn within_search<'a, N: CoordFloat, V>(
    node: &'a Node<N, V>,
    point: &[N],
    dimension: usize,
    depth: usize,
    radius_sq: N,
    found: &mut Vec<Candidate<'a, N, V>>,
) {
    let dist = sq_dist(point, &node.coords);
    if dist <= radius_sq {
        found.push(Candidate { dist, node });
    }

    let axis = depth % dimension;
    let delta = point[axis] - node.coords[axis];
    let (near, far) = if point[axis] <= node.coords[axis] {
        (&node.left, &node.right)
    } else {
        (&node.right, &node.left)
    };

    if let Some(child) = near {
        within_search(child, point, dimension, depth + 1, radius_sq, found);
    }
    if delta * delta <= radius_sq {
        if let Some(child) = far {
            within_search(child, point, dimension, depth + 1, radius_sq, found);
        }
    }
}
