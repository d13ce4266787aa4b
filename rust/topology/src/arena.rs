// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Arena-based storage for welded edges.
//!
//! The [`EdgeArena`] owns every edge produced while welding a feature set.
//! Each edge is an undirected boundary piece referenced by one or more
//! owners: two polygons sharing a border both point at the same edge, which
//! is what guarantees they are simplified identically.
//!
//! Edges are found by their endpoints through an order-independent segment
//! index, and link back to the edge created just before them on the same
//! contour (`prev`). Those back-links are what the chain merger walks.

use edgeweld_geometry::{Point, PointKey};
use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use smallvec::SmallVec;

use crate::keys::*;

/// Owner lists: most edges belong to one or two contours.
pub type Owners = SmallVec<[Owner; 2]>;

/// Data stored for an edge.
#[derive(Debug, Clone)]
pub struct EdgeData {
    /// Geometry, in the orientation of the first owner's traversal.
    pub points: Vec<Point>,
    /// Every contour position that uses this edge. The first entry created it.
    pub owners: Owners,
    /// Edge created immediately before this one on the creator's contour.
    pub prev: Option<EdgeKey>,
}

/// Order-independent key of the segment `{a, b}`.
pub type SegmentKey = (PointKey, PointKey);

/// Canonical key for the undirected segment between `a` and `b`.
pub fn segment_key(a: &Point, b: &Point) -> SegmentKey {
    let (ka, kb) = (a.hash_key(), b.hash_key());
    if ka <= kb { (ka, kb) } else { (kb, ka) }
}

/// The arena that owns all edges and the segment index.
///
/// # Example
///
/// ```
/// use edgeweld_geometry::{points, Geometry};
/// use edgeweld_topology::{EdgeArena, FeatureId};
///
/// let mut arena = EdgeArena::new();
/// let square = Geometry::Polygon(vec![points(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]])]);
/// arena.add_feature(FeatureId(0), &square);
///
/// assert_eq!(arena.edge_count(), 4);
/// ```
#[derive(Debug, Default)]
pub struct EdgeArena {
    pub(crate) edges: SlotMap<EdgeKey, EdgeData>,
    pub(crate) segment_index: FxHashMap<SegmentKey, EdgeKey>,
    /// Creation order; every pass walks edges in this order.
    pub(crate) order: Vec<EdgeKey>,
}

impl EdgeArena {
    /// Creates a new, empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the edge data for the given key, or `None` if not found.
    pub fn edge(&self, key: EdgeKey) -> Option<&EdgeData> {
        self.edges.get(key)
    }

    /// Returns the number of live edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Live edges in creation order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeKey, &EdgeData)> + '_ {
        self.order
            .iter()
            .filter_map(move |&k| self.edges.get(k).map(|e| (k, e)))
    }

    /// Looks up the edge covering the segment `{a, b}` in either direction.
    pub fn find_segment(&self, a: &Point, b: &Point) -> Option<EdgeKey> {
        self.segment_index.get(&segment_key(a, b)).copied()
    }

    /// Number of edges with more than one owner.
    pub fn shared_edge_count(&self) -> usize {
        self.edges.values().filter(|e| e.owners.len() > 1).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_key_is_order_independent() {
        let a = Point::new(0.0, 1.0);
        let b = Point::new(3.0, -2.0);
        assert_eq!(segment_key(&a, &b), segment_key(&b, &a));
        assert_ne!(segment_key(&a, &b), segment_key(&a, &a));
    }

    #[test]
    fn empty_arena() {
        let arena = EdgeArena::new();
        assert_eq!(arena.edge_count(), 0);
        assert_eq!(arena.edges().count(), 0);
        assert!(arena.find_segment(&Point::new(0.0, 0.0), &Point::new(1.0, 0.0)).is_none());
    }
}
