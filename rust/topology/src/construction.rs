// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Edge construction from feature arcs.
//!
//! Features are fed in input order. Each arc either creates a new edge or,
//! when its segment already exists in either direction, registers one more
//! owner on the existing edge.

use edgeweld_geometry::Geometry;

use crate::arcs::{extract_arcs, BoundaryArc};
use crate::arena::*;
use crate::keys::*;

impl EdgeArena {
    /// Builds an arena from features in input order; `None` entries are skipped
    /// but still consume a [`FeatureId`].
    pub fn from_features<'a, I>(features: I) -> Self
    where
        I: IntoIterator<Item = Option<&'a Geometry>>,
    {
        let mut arena = Self::new();
        for (i, geometry) in features.into_iter().enumerate() {
            if let Some(geometry) = geometry {
                arena.add_feature(FeatureId(i), geometry);
            }
        }
        arena
    }

    /// Adds every arc of one feature. Returns the number of arcs processed.
    pub fn add_feature(&mut self, feature: FeatureId, geometry: &Geometry) -> usize {
        let arcs = extract_arcs(geometry);
        let count = arcs.len();
        let mut last_created = None;
        for (index, arc) in arcs.into_iter().enumerate() {
            last_created = self.add_arc(feature, index, arc, last_created);
        }
        count
    }

    /// Registers one arc.
    ///
    /// `last_created` is the contour and key of the edge created by the
    /// previous arc of the same feature, if that arc created one. The returned
    /// value is what the next arc should receive.
    fn add_arc(
        &mut self,
        feature: FeatureId,
        index: usize,
        arc: BoundaryArc,
        last_created: Option<(ContourId, EdgeKey)>,
    ) -> Option<(ContourId, EdgeKey)> {
        let owner = Owner {
            feature,
            contour: arc.contour,
            index,
        };
        let key = segment_key(&arc.start, &arc.end);

        if let Some(&existing) = self.segment_index.get(&key) {
            // Repeat sighting: geometry and back-link stay as first created,
            // and the run of fresh edges on this contour is broken.
            self.edges[existing].owners.push(owner);
            return None;
        }

        let prev = match last_created {
            Some((contour, edge)) if contour == owner.contour => Some(edge),
            _ => None,
        };
        let contour = owner.contour.clone();
        let mut owners = Owners::new();
        owners.push(owner);
        let edge = self.edges.insert(EdgeData {
            points: vec![arc.start, arc.end],
            owners,
            prev,
        });
        self.segment_index.insert(key, edge);
        self.order.push(edge);
        Some((contour, edge))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edgeweld_geometry::{points, Point};

    fn square(x: f64) -> Geometry {
        Geometry::Polygon(vec![points(&[
            [x, 0.0],
            [x + 1.0, 0.0],
            [x + 1.0, 1.0],
            [x, 1.0],
            [x, 0.0],
        ])])
    }

    #[test]
    fn single_square_links_back() {
        let mut arena = EdgeArena::new();
        assert_eq!(arena.add_feature(FeatureId(0), &square(0.0)), 4);
        let edges: Vec<_> = arena.edges().collect();
        assert_eq!(edges.len(), 4);
        assert!(edges[0].1.prev.is_none());
        for w in edges.windows(2) {
            assert_eq!(w[1].1.prev, Some(w[0].0));
        }
    }

    #[test]
    fn shared_segment_gets_two_owners() {
        let a = square(0.0);
        let b = square(1.0);
        let arena = EdgeArena::from_features([Some(&a), Some(&b)]);

        assert_eq!(arena.edge_count(), 7);
        assert_eq!(arena.shared_edge_count(), 1);

        let shared = arena
            .find_segment(&Point::new(1.0, 1.0), &Point::new(1.0, 0.0))
            .unwrap();
        let data = arena.edge(shared).unwrap();
        // Orientation of the first feature that saw it.
        assert_eq!(data.points, points(&[[1.0, 0.0], [1.0, 1.0]]));
        assert_eq!(data.owners.len(), 2);
        assert_eq!(data.owners[0].feature, FeatureId(0));
        assert_eq!(data.owners[0].index, 1);
        assert_eq!(data.owners[1].feature, FeatureId(1));
        assert_eq!(data.owners[1].index, 3);
    }

    #[test]
    fn new_feature_starts_without_back_link() {
        let a = square(0.0);
        let b = square(1.0);
        let arena = EdgeArena::from_features([Some(&a), Some(&b)]);
        let first_of_b = arena
            .find_segment(&Point::new(1.0, 0.0), &Point::new(2.0, 0.0))
            .unwrap();
        assert!(arena.edge(first_of_b).unwrap().prev.is_none());
    }

    #[test]
    fn repeat_sighting_breaks_the_run() {
        // b walks the shared edge first, then creates a fresh one.
        let a = square(0.0);
        let b = Geometry::Polygon(vec![points(&[
            [1.0, 1.0],
            [1.0, 0.0],
            [2.0, 0.0],
            [2.0, 1.0],
            [1.0, 1.0],
        ])]);
        let arena = EdgeArena::from_features([Some(&a), Some(&b)]);
        let after_shared = arena
            .find_segment(&Point::new(1.0, 0.0), &Point::new(2.0, 0.0))
            .unwrap();
        assert!(arena.edge(after_shared).unwrap().prev.is_none());
    }

    #[test]
    fn contour_change_breaks_the_run() {
        let holed = Geometry::Polygon(vec![
            points(&[[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 0.0]]),
            points(&[[1.0, 0.5], [2.0, 0.5], [2.0, 1.0], [1.0, 0.5]]),
        ]);
        let arena = EdgeArena::from_features([Some(&holed)]);
        let hole_start = arena
            .find_segment(&Point::new(1.0, 0.5), &Point::new(2.0, 0.5))
            .unwrap();
        assert!(arena.edge(hole_start).unwrap().prev.is_none());
    }

    #[test]
    fn skipped_features_keep_their_ids() {
        let b = square(5.0);
        let arena = EdgeArena::from_features([None, Some(&b)]);
        assert!(arena.edges().all(|(_, e)| e.owners[0].feature == FeatureId(1)));
    }
}
