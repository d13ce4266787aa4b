// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Backward fusion of edges into chains.
//!
//! An edge is fused with its `prev` edge when both are owned by exactly the
//! same set of contours. Fusion only ever looks backward, so the resulting
//! partition depends solely on creation order.

use edgeweld_geometry::Point;

use crate::arena::*;
use crate::keys::*;

/// A maximal run of edges sharing one owner set.
#[derive(Debug, Clone)]
pub struct Chain {
    /// Key of the surviving edge.
    pub key: EdgeKey,
    /// Current geometry (simplified once a reduction has run).
    pub points: Vec<Point>,
    /// Merged geometry before any simplification.
    pub source: Vec<Point>,
    /// Owners of the surviving (last) edge of the run.
    pub owners: Owners,
    /// Edge preceding the run, if it could not be fused.
    pub prev: Option<EdgeKey>,
}

impl Chain {
    pub fn is_shared(&self) -> bool {
        self.owners.len() > 1
    }
}

/// Two owner lists are connected when they have the same length and every
/// owner of `a` has a counterpart in `b` with the same feature and contour.
///
/// The check runs one way only and does not count multiplicity: `[A, A]` is
/// connected to `[A, B]` but not the reverse. A contour appears twice in an
/// owner list only when it walks the same segment twice (a slit ring), and
/// such an edge still fuses with a predecessor owned by the contour and one
/// neighbour.
pub fn is_connected(a: &[Owner], b: &[Owner]) -> bool {
    a.len() == b.len() && a.iter().all(|x| b.iter().any(|y| x.same_contour(y)))
}

impl EdgeArena {
    /// Fuses every edge with its predecessors and returns the surviving chains
    /// in creation order.
    pub fn merge_chains(mut self) -> Vec<Chain> {
        let order = std::mem::take(&mut self.order);

        for &key in &order {
            loop {
                let Some(edge) = self.edges.get(key) else {
                    break;
                };
                let Some(prev_key) = edge.prev else {
                    break;
                };
                let connected = self
                    .edges
                    .get(prev_key)
                    .is_some_and(|prev| is_connected(&edge.owners, &prev.owners));
                if !connected {
                    break;
                }
                let Some(prev) = self.edges.remove(prev_key) else {
                    break;
                };

                let edge = &mut self.edges[key];
                let mut points = prev.points;
                points.extend_from_slice(&edge.points[1..]);
                edge.points = points;
                edge.prev = prev.prev;
            }
        }

        order
            .into_iter()
            .filter_map(|key| {
                self.edges.remove(key).map(|edge| Chain {
                    key,
                    source: edge.points.clone(),
                    points: edge.points,
                    owners: edge.owners,
                    prev: edge.prev,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edgeweld_geometry::{points, ContourPath, Geometry};

    fn owner(feature: usize, ring: usize, index: usize) -> Owner {
        Owner {
            feature: FeatureId(feature),
            contour: ContourId(ContourPath::from_slice(&[ring])),
            index,
        }
    }

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
    fn connected_ignores_order_and_index() {
        let a = [owner(0, 0, 1), owner(1, 0, 5)];
        let b = [owner(1, 0, 2), owner(0, 0, 3)];
        assert!(is_connected(&a, &b));
        assert!(!is_connected(&a, &b[..1]));
        assert!(!is_connected(&[owner(0, 0, 0)], &[owner(0, 1, 0)]));
    }

    #[test]
    fn connected_is_one_way_for_repeated_owners() {
        let doubled = [owner(0, 0, 1), owner(0, 0, 4)];
        let mixed = [owner(0, 0, 2), owner(1, 0, 3)];
        assert!(is_connected(&doubled, &mixed));
        assert!(!is_connected(&mixed, &doubled));
    }

    #[test]
    fn isolated_square_is_one_closed_chain() {
        let g = square(0.0);
        let chains = EdgeArena::from_features([Some(&g)]).merge_chains();
        assert_eq!(chains.len(), 1);
        assert_eq!(
            chains[0].points,
            points(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]])
        );
        assert_eq!(chains[0].points, chains[0].source);
        assert!(chains[0].prev.is_none());
    }

    #[test]
    fn adjacent_squares_split_at_shared_edge() {
        let a = square(0.0);
        let b = square(1.0);
        let chains = EdgeArena::from_features([Some(&a), Some(&b)]).merge_chains();

        let geoms: Vec<Vec<Point>> = chains.iter().map(|c| c.points.clone()).collect();
        assert_eq!(
            geoms,
            vec![
                points(&[[0.0, 0.0], [1.0, 0.0]]),
                points(&[[1.0, 0.0], [1.0, 1.0]]),
                points(&[[1.0, 1.0], [0.0, 1.0], [0.0, 0.0]]),
                points(&[[1.0, 0.0], [2.0, 0.0], [2.0, 1.0], [1.0, 1.0]]),
            ]
        );
        assert_eq!(chains.iter().filter(|c| c.is_shared()).count(), 1);
        // The shared chain still points at the unfused edge before it.
        assert_eq!(chains[1].prev, Some(chains[0].key));
    }

    #[test]
    fn every_segment_survives_in_exactly_one_chain() {
        let a = square(0.0);
        let b = square(1.0);
        let c = square(2.0);
        let chains = EdgeArena::from_features([Some(&a), Some(&b), Some(&c)]).merge_chains();
        let segments: usize = chains.iter().map(|c| c.points.len() - 1).sum();
        assert_eq!(segments, 10);
    }
}
