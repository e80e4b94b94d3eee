use crate::r#type::CoordFloat;

/// One stored point. Coordinates and payload are write-once; each node
/// exclusively owns its children, so whole-tree teardown is a plain
/// ownership drop with no aliasing to reason about.
#[derive(Debug, Clone)]
pub(crate) struct Node<N: CoordFloat, V> {
    pub(crate) coords: Box<[N]>,
    pub(crate) value: Option<V>,
    /// Monotone insertion counter. Ranked queries use it to break distance
    /// ties deterministically in favor of the earlier-inserted point.
    pub(crate) seq: usize,
    pub(crate) left: Option<Box<Node<N, V>>>,
    pub(crate) right: Option<Box<Node<N, V>>>,
}

impl<N: CoordFloat, V> Node<N, V> {
    pub(crate) fn new(coords: Box<[N]>, value: Option<V>, seq: usize) -> Self {
        Self {
            coords,
            value,
            seq,
            left: None,
            right: None,
        }
    }
}
