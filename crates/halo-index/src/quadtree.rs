//! Bucketed point quadtree.
//!
//! Leaves hold up to `QUADTREE_BUCKET_CAP` (point, payload) pairs. A leaf that
//! would overflow splits once into four quadrants and hands its payloads down;
//! from then on it is an internal node and never stores payloads again. Leaves
//! at the maximum depth grow past the cap instead of splitting.
//!
//! Range queries reject subtrees with a rectangle test against the query
//! circle's bounding box and apply the exact circle test only to stored
//! points, so there are no false negatives.

use glam::Vec2;
use tracing::error;

use halo_core::constants::{QUADTREE_BUCKET_CAP, QUADTREE_MAX_DEPTH};

use crate::geometry::{Circle, Rect};

/// Payloads carry an identity used for removal.
pub trait Keyed {
    type Key: PartialEq;

    fn key(&self) -> Self::Key;
}

/// Point quadtree over a fixed root rectangle.
#[derive(Debug, Clone)]
pub struct Quadtree<T> {
    root: Node<T>,
    max_depth: u32,
}

#[derive(Debug, Clone)]
struct Node<T> {
    bounds: Rect,
    depth: u32,
    items: Vec<(Vec2, T)>,
    children: Option<Box<[Node<T>; 4]>>,
}

impl<T: Keyed> Quadtree<T> {
    /// Create an empty tree with the default maximum depth.
    pub fn new(bounds: Rect) -> Self {
        Self::with_max_depth(bounds, QUADTREE_MAX_DEPTH)
    }

    pub fn with_max_depth(bounds: Rect, max_depth: u32) -> Self {
        Self {
            root: Node::leaf(bounds, 0),
            max_depth,
        }
    }

    /// Root rectangle.
    pub fn bounds(&self) -> Rect {
        self.root.bounds
    }

    /// Insert a payload at `point`. Returns `false` (and stores nothing) if
    /// the point is outside the root bounds.
    pub fn insert(&mut self, point: Vec2, payload: T) -> bool {
        if !self.root.bounds.contains(point) {
            return false;
        }
        self.root.insert(point, payload, self.max_depth)
    }

    /// Remove the first payload with `key` from the leaf containing `point`.
    /// Returns `false` if nothing matched; a stale removal is not an error.
    pub fn remove(&mut self, point: Vec2, key: &T::Key) -> bool {
        if !self.root.bounds.contains(point) {
            return false;
        }
        self.root.remove(point, key)
    }

    /// All payloads within `radius` of `center`. Invalid queries (negative
    /// or non-finite radius, non-finite centre) return an empty result.
    pub fn query_range(&self, center: Vec2, radius: f32) -> Vec<&T> {
        let mut results = Vec::new();
        let range = Circle::new(center, radius);
        if range.is_valid() {
            self.root.query(&range, &range.bounds(), &mut results);
        }
        results
    }

    /// Drop every node and payload. The root becomes an empty leaf.
    pub fn clear(&mut self) {
        self.root = Node::leaf(self.root.bounds, 0);
    }

    /// Total stored payloads, summed over the leaves.
    pub fn count(&self) -> usize {
        self.root.count()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Depth of the deepest leaf (0 for an unsplit root).
    pub fn depth(&self) -> u32 {
        self.root.deepest()
    }

    /// Iterate every stored `(point, payload)` pair, depth first.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            stack: vec![&self.root],
            current: Default::default(),
        }
    }
}

impl<T: Keyed> Node<T> {
    fn leaf(bounds: Rect, depth: u32) -> Self {
        Self {
            bounds,
            depth,
            items: Vec::new(),
            children: None,
        }
    }

    fn insert(&mut self, point: Vec2, payload: T, max_depth: u32) -> bool {
        if self.children.is_none() {
            if self.items.len() < QUADTREE_BUCKET_CAP || self.depth >= max_depth {
                self.items.push((point, payload));
                return true;
            }
            self.subdivide(max_depth);
        }

        match self.child_for_mut(point) {
            Some(child) => child.insert(point, payload, max_depth),
            None => {
                error!(?point, bounds = ?self.bounds, "point fits no quadrant");
                false
            }
        }
    }

    fn subdivide(&mut self, max_depth: u32) {
        let [tl, tr, bl, br] = self.bounds.quadrants();
        let depth = self.depth + 1;
        self.children = Some(Box::new([
            Node::leaf(tl, depth),
            Node::leaf(tr, depth),
            Node::leaf(bl, depth),
            Node::leaf(br, depth),
        ]));

        for (point, payload) in std::mem::take(&mut self.items) {
            if let Some(child) = self.child_for_mut(point) {
                child.insert(point, payload, max_depth);
            } else {
                error!(?point, bounds = ?self.bounds, "payload lost during subdivision");
            }
        }
    }

    fn child_for_mut(&mut self, point: Vec2) -> Option<&mut Node<T>> {
        self.children
            .as_deref_mut()?
            .iter_mut()
            .find(|child| child.bounds.contains(point))
    }

    /// Remove from the leaf whose rectangle contains `point`. The caller has
    /// checked that this node contains it.
    fn remove(&mut self, point: Vec2, key: &T::Key) -> bool {
        if self.children.is_some() {
            return match self.child_for_mut(point) {
                Some(child) => child.remove(point, key),
                None => false,
            };
        }
        match self.items.iter().position(|(_, item)| item.key() == *key) {
            Some(idx) => {
                self.items.remove(idx);
                true
            }
            None => false,
        }
    }

    fn query<'a>(&'a self, range: &Circle, range_bounds: &Rect, out: &mut Vec<&'a T>) {
        if !self.bounds.overlaps(range_bounds) {
            return;
        }

        out.extend(
            self.items
                .iter()
                .filter(|(point, _)| range.contains(*point))
                .map(|(_, item)| item),
        );

        if let Some(children) = self.children.as_deref() {
            for child in children {
                child.query(range, range_bounds, out);
            }
        }
    }

    fn count(&self) -> usize {
        match self.children.as_deref() {
            Some(children) => children.iter().map(Node::count).sum(),
            None => self.items.len(),
        }
    }

    fn deepest(&self) -> u32 {
        match self.children.as_deref() {
            Some(children) => children.iter().map(Node::deepest).max().unwrap_or(self.depth),
            None => self.depth,
        }
    }
}

/// Depth-first iterator over stored `(point, payload)` pairs.
pub struct Iter<'a, T> {
    stack: Vec<&'a Node<T>>,
    current: std::slice::Iter<'a, (Vec2, T)>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (Vec2, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((point, item)) = self.current.next() {
                return Some((*point, item));
            }
            let node = self.stack.pop()?;
            if let Some(children) = node.children.as_deref() {
                self.stack.extend(children.iter());
            }
            self.current = node.items.iter();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Item(u32);

    impl Keyed for Item {
        type Key = u32;

        fn key(&self) -> u32 {
            self.0
        }
    }

    fn tree() -> Quadtree<Item> {
        Quadtree::new(Rect::new(0.0, 0.0, 100.0, 100.0))
    }

    fn keys(found: Vec<&Item>) -> Vec<u32> {
        let mut k: Vec<u32> = found.into_iter().map(|i| i.0).collect();
        k.sort_unstable();
        k
    }

    #[test]
    fn test_insert_query_remove_scenario() {
        let mut qt = tree();
        assert!(qt.insert(Vec2::new(10.0, 10.0), Item(1)));

        assert_eq!(keys(qt.query_range(Vec2::new(10.0, 10.0), 5.0)), vec![1]);
        assert!(qt.query_range(Vec2::new(50.0, 50.0), 5.0).is_empty());

        assert!(qt.remove(Vec2::new(10.0, 10.0), &1));
        assert!(qt.query_range(Vec2::new(10.0, 10.0), 5.0).is_empty());
        assert_eq!(qt.count(), 0);
    }

    #[test]
    fn test_insert_out_of_bounds_is_noop() {
        let mut qt = tree();
        assert!(!qt.insert(Vec2::new(-1.0, 50.0), Item(1)));
        assert!(!qt.insert(Vec2::new(100.0, 50.0), Item(2)), "max edge is outside");
        assert!(!qt.insert(Vec2::new(f32::NAN, 50.0), Item(3)));
        assert_eq!(qt.count(), 0);
    }

    #[test]
    fn test_remove_twice_is_noop() {
        let mut qt = tree();
        qt.insert(Vec2::new(20.0, 20.0), Item(1));
        qt.insert(Vec2::new(21.0, 20.0), Item(2));
        assert!(qt.remove(Vec2::new(20.0, 20.0), &1));
        assert!(!qt.remove(Vec2::new(20.0, 20.0), &1));
        assert_eq!(qt.count(), 1);
    }

    #[test]
    fn test_remove_wrong_point_misses() {
        let mut qt = tree();
        for i in 0..20 {
            qt.insert(Vec2::new(5.0 + i as f32, 5.0), Item(i));
        }
        // Item 0 lives in the bottom-left quadrant; looking in the top-right fails.
        assert!(!qt.remove(Vec2::new(90.0, 90.0), &0));
        assert_eq!(qt.count(), 20);
    }

    #[test]
    fn test_subdivides_past_bucket_cap() {
        let mut qt = tree();
        for i in 0..QUADTREE_BUCKET_CAP as u32 {
            qt.insert(Vec2::new(10.0 + i as f32 * 8.0, 10.0 + i as f32 * 8.0), Item(i));
        }
        assert_eq!(qt.depth(), 0, "a full bucket does not split yet");

        qt.insert(Vec2::new(95.0, 5.0), Item(99));
        assert_eq!(qt.depth(), 1);
        assert_eq!(qt.count(), QUADTREE_BUCKET_CAP + 1);
        assert!(qt.root.items.is_empty(), "internal nodes hold no payloads");
        assert_eq!(keys(qt.query_range(Vec2::new(95.0, 5.0), 1.0)), vec![99]);
    }

    #[test]
    fn test_max_depth_leaf_overflows() {
        let mut qt = Quadtree::with_max_depth(Rect::new(0.0, 0.0, 100.0, 100.0), 2);
        // Tightly clustered points force splitting down to the depth limit.
        for i in 0..50 {
            qt.insert(Vec2::new(1.0 + i as f32 * 0.01, 1.0), Item(i));
        }
        assert_eq!(qt.depth(), 2);
        assert_eq!(qt.count(), 50);
        assert_eq!(qt.query_range(Vec2::new(1.25, 1.0), 1.0).len(), 50);
    }

    #[test]
    fn test_boundary_point_single_leaf() {
        let mut qt = tree();
        // Force a split, then insert exactly on the centre lines.
        for i in 0..=QUADTREE_BUCKET_CAP as u32 {
            qt.insert(Vec2::new(3.0 + i as f32, 3.0), Item(i));
        }
        qt.insert(Vec2::new(50.0, 50.0), Item(500));
        qt.insert(Vec2::new(50.0, 10.0), Item(501));
        assert_eq!(qt.count(), QUADTREE_BUCKET_CAP + 3);
        assert_eq!(keys(qt.query_range(Vec2::new(50.0, 50.0), 0.0)), vec![500]);
        assert_eq!(keys(qt.query_range(Vec2::new(50.0, 10.0), 0.0)), vec![501]);
        assert!(qt.remove(Vec2::new(50.0, 50.0), &500));
        assert!(qt.remove(Vec2::new(50.0, 10.0), &501));
    }

    #[test]
    fn test_invalid_queries_are_empty() {
        let mut qt = tree();
        qt.insert(Vec2::new(10.0, 10.0), Item(1));
        assert!(qt.query_range(Vec2::new(10.0, 10.0), -1.0).is_empty());
        assert!(qt.query_range(Vec2::new(10.0, 10.0), f32::NAN).is_empty());
        assert!(qt.query_range(Vec2::new(f32::INFINITY, 10.0), 5.0).is_empty());
        assert_eq!(keys(qt.query_range(Vec2::new(10.0, 10.0), 0.0)), vec![1]);
    }

    #[test]
    fn test_query_is_exact_circle() {
        let mut qt = tree();
        qt.insert(Vec2::new(14.0, 14.0), Item(1)); // inside the box, outside the circle
        qt.insert(Vec2::new(13.0, 10.0), Item(2));
        assert_eq!(keys(qt.query_range(Vec2::new(10.0, 10.0), 5.0)), vec![2]);
    }

    #[test]
    fn test_clear_resets_root() {
        let mut qt = tree();
        for i in 0..40 {
            qt.insert(Vec2::new((i * 2) as f32 + 1.0, (i * 2) as f32 + 1.0), Item(i));
        }
        assert!(qt.depth() > 0);
        qt.clear();
        assert_eq!(qt.count(), 0);
        assert_eq!(qt.depth(), 0);
        assert!(qt.is_empty());
        assert_eq!(qt.bounds(), Rect::new(0.0, 0.0, 100.0, 100.0));
        assert!(qt.insert(Vec2::new(1.0, 1.0), Item(1)));
    }

    #[test]
    fn test_iter_visits_everything() {
        let mut qt = tree();
        for i in 0..30 {
            qt.insert(Vec2::new(3.0 * i as f32 + 0.5, 97.0 - 3.0 * i as f32), Item(i));
        }
        let mut seen: Vec<u32> = qt.iter().map(|(_, item)| item.0).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..30).collect::<Vec<_>>());
        for (point, item) in qt.iter() {
            assert_eq!(point, Vec2::new(3.0 * item.0 as f32 + 0.5, 97.0 - 3.0 * item.0 as f32));
        }
    }
}
