// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decomposition of geometries into directed boundary arcs.

use edgeweld_geometry::{is_closed, Geometry, Point};

use crate::keys::ContourId;

/// A directed segment between two consecutive, distinct points of a contour.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryArc {
    pub start: Point,
    pub end: Point,
    pub contour: ContourId,
}

/// Splits every contour of `geometry` into arcs, in traversal order.
///
/// Punctual geometries yield nothing. Consecutive duplicate points are
/// skipped, so no zero-length arc is ever produced.
pub fn extract_arcs(geometry: &Geometry) -> Vec<BoundaryArc> {
    let mut arcs = Vec::new();
    for (path, coords) in geometry.contours() {
        let contour = ContourId(path);
        let Some((&first, rest)) = coords.split_first() else {
            continue;
        };
        let mut p0 = first;
        for &p1 in rest {
            if p0 != p1 {
                arcs.push(BoundaryArc {
                    start: p0,
                    end: p1,
                    contour: contour.clone(),
                });
            }
            p0 = p1;
        }
    }
    arcs
}

/// Contours of `geometry` that end on their starting point.
pub fn closed_contours(geometry: &Geometry) -> Vec<ContourId> {
    geometry
        .contours()
        .into_iter()
        .filter(|(_, coords)| is_closed(coords))
        .map(|(path, _)| ContourId(path))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use edgeweld_geometry::{points, ContourPath};

    #[test]
    fn polygon_ring_arcs() {
        let g = Geometry::Polygon(vec![points(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]])]);
        let arcs = extract_arcs(&g);
        assert_eq!(arcs.len(), 3);
        assert_eq!(arcs[0].start, Point::new(0.0, 0.0));
        assert_eq!(arcs[0].end, Point::new(1.0, 0.0));
        assert_eq!(arcs[2].end, Point::new(0.0, 0.0));
        assert!(arcs.iter().all(|a| a.contour.to_string() == "0-0"));
    }

    #[test]
    fn duplicate_points_are_skipped() {
        let g = Geometry::LineString(points(&[[0.0, 0.0], [0.0, 0.0], [1.0, 0.0], [1.0, 0.0], [2.0, 0.0]]));
        let arcs = extract_arcs(&g);
        assert_eq!(arcs.len(), 2);
        assert_eq!(arcs[1].start, Point::new(1.0, 0.0));
        assert_eq!(arcs[0].contour, ContourId(ContourPath::new()));
    }

    #[test]
    fn multipolygon_contours_are_tagged() {
        let ring = points(&[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [0.0, 0.0]]);
        let g = Geometry::MultiPolygon(vec![vec![ring.clone()], vec![ring.clone(), ring]]);
        let ids: Vec<String> = extract_arcs(&g).iter().map(|a| a.contour.to_string()).collect();
        assert_eq!(ids.iter().filter(|s| *s == "0-1-1").count(), 3);
        assert_eq!(ids[0], "0-0-0");
    }

    #[test]
    fn points_and_empty_geometries_yield_nothing() {
        assert!(extract_arcs(&Geometry::Point(Point::new(1.0, 2.0))).is_empty());
        assert!(extract_arcs(&Geometry::MultiPoint(points(&[[0.0, 0.0], [1.0, 1.0]]))).is_empty());
        assert!(extract_arcs(&Geometry::Polygon(vec![vec![]])).is_empty());
        assert!(extract_arcs(&Geometry::LineString(points(&[[3.0, 3.0]]))).is_empty());
    }

    #[test]
    fn closed_contours_detected() {
        let g = Geometry::MultiLineString(vec![
            points(&[[0.0, 0.0], [1.0, 0.0], [0.0, 0.0]]),
            points(&[[0.0, 0.0], [1.0, 0.0]]),
        ]);
        let closed = closed_contours(&g);
        assert_eq!(closed, vec![ContourId(ContourPath::from_slice(&[0]))]);
    }
}
