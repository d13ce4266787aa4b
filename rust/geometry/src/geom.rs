// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tagged geometry model.
//!
//! Each variant carries its own nesting, so consumers dispatch on the tag
//! rather than inspecting coordinate depth. Linear parts of a geometry are
//! addressed by a [`ContourPath`]: the chain of indices leading from the
//! geometry root to one coordinate sequence.
//!
//! | kind              | path              |
//! |-------------------|-------------------|
//! | `LineString`      | `[]`              |
//! | `MultiLineString` | `[line]`          |
//! | `Polygon`         | `[ring]`          |
//! | `MultiPolygon`    | `[polygon, ring]` |

use std::collections::BTreeMap;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::point::Point;
use crate::primitives::{clip_ring_to_extent, closest_point_on_segment, sample_line, split_h, Extent};

/// Path of nesting indices addressing one contour of a geometry.
pub type ContourPath = smallvec::SmallVec<[usize; 2]>;

/// Geometry type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GeometryKind {
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
}

impl GeometryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeometryKind::Point => "Point",
            GeometryKind::LineString => "LineString",
            GeometryKind::Polygon => "Polygon",
            GeometryKind::MultiPoint => "MultiPoint",
            GeometryKind::MultiLineString => "MultiLineString",
            GeometryKind::MultiPolygon => "MultiPolygon",
        }
    }

    /// Point and MultiPoint have no boundary.
    pub fn is_punctual(&self) -> bool {
        matches!(self, GeometryKind::Point | GeometryKind::MultiPoint)
    }

    pub fn is_polygonal(&self) -> bool {
        matches!(self, GeometryKind::Polygon | GeometryKind::MultiPolygon)
    }

    /// Length of the contour paths of this kind, `None` for punctual kinds.
    pub fn contour_depth(&self) -> Option<usize> {
        match self {
            GeometryKind::Point | GeometryKind::MultiPoint => None,
            GeometryKind::LineString => Some(0),
            GeometryKind::Polygon | GeometryKind::MultiLineString => Some(1),
            GeometryKind::MultiPolygon => Some(2),
        }
    }
}

impl std::fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GeometryKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Point" => Ok(GeometryKind::Point),
            "LineString" => Ok(GeometryKind::LineString),
            "Polygon" => Ok(GeometryKind::Polygon),
            "MultiPoint" => Ok(GeometryKind::MultiPoint),
            "MultiLineString" => Ok(GeometryKind::MultiLineString),
            "MultiPolygon" => Ok(GeometryKind::MultiPolygon),
            other => Err(Error::InvalidGeometryKind(other.to_string())),
        }
    }
}

/// A geometry with explicit nesting.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Point),
    LineString(Vec<Point>),
    Polygon(Vec<Vec<Point>>),
    MultiPoint(Vec<Point>),
    MultiLineString(Vec<Vec<Point>>),
    MultiPolygon(Vec<Vec<Vec<Point>>>),
}

impl Geometry {
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Point(_) => GeometryKind::Point,
            Geometry::LineString(_) => GeometryKind::LineString,
            Geometry::Polygon(_) => GeometryKind::Polygon,
            Geometry::MultiPoint(_) => GeometryKind::MultiPoint,
            Geometry::MultiLineString(_) => GeometryKind::MultiLineString,
            Geometry::MultiPolygon(_) => GeometryKind::MultiPolygon,
        }
    }

    /// Every linear contour, in traversal order.
    pub fn contours(&self) -> Vec<(ContourPath, &[Point])> {
        match self {
            Geometry::Point(_) | Geometry::MultiPoint(_) => Vec::new(),
            Geometry::LineString(line) => vec![(ContourPath::new(), line.as_slice())],
            Geometry::Polygon(rings) | Geometry::MultiLineString(rings) => rings
                .iter()
                .enumerate()
                .map(|(k, ring)| (ContourPath::from_slice(&[k]), ring.as_slice()))
                .collect(),
            Geometry::MultiPolygon(polygons) => polygons
                .iter()
                .enumerate()
                .flat_map(|(i, rings)| {
                    rings
                        .iter()
                        .enumerate()
                        .map(move |(k, ring)| (ContourPath::from_slice(&[i, k]), ring.as_slice()))
                })
                .collect(),
        }
    }

    /// Rebuilds a geometry of `kind` from path-addressed contours.
    ///
    /// Contours are placed in path order; gaps left by missing indices are
    /// compacted. Fails if a path does not have the depth `kind` expects.
    pub fn from_contours<I>(kind: GeometryKind, contours: I) -> Result<Geometry>
    where
        I: IntoIterator<Item = (ContourPath, Vec<Point>)>,
    {
        let depth = kind.contour_depth().ok_or_else(|| punctual(kind))?;

        let mut sorted: BTreeMap<ContourPath, Vec<Point>> = BTreeMap::new();
        for (path, coords) in contours {
            if path.len() != depth {
                return Err(Error::InvalidCoordinates {
                    kind: kind.to_string(),
                    reason: format!("contour path {:?} should have depth {}", path.as_slice(), depth),
                });
            }
            sorted.insert(path, coords);
        }

        Ok(match kind {
            GeometryKind::LineString => {
                Geometry::LineString(sorted.into_values().next().unwrap_or_default())
            }
            GeometryKind::Polygon => Geometry::Polygon(sorted.into_values().collect()),
            GeometryKind::MultiLineString => {
                Geometry::MultiLineString(sorted.into_values().collect())
            }
            GeometryKind::MultiPolygon => {
                let mut polygons: Vec<Vec<Vec<Point>>> = Vec::new();
                let mut current = None;
                for (path, ring) in sorted {
                    if current != Some(path[0]) {
                        current = Some(path[0]);
                        polygons.push(Vec::new());
                    }
                    if let Some(polygon) = polygons.last_mut() {
                        polygon.push(ring);
                    }
                }
                Geometry::MultiPolygon(polygons)
            }
            GeometryKind::Point | GeometryKind::MultiPoint => return Err(punctual(kind)),
        })
    }

    /// Total number of coordinates.
    pub fn point_count(&self) -> usize {
        match self {
            Geometry::Point(_) => 1,
            Geometry::MultiPoint(pts) => pts.len(),
            _ => self.contours().iter().map(|(_, c)| c.len()).sum(),
        }
    }

    /// Bounding box of every coordinate, `None` when there are none.
    pub fn extent(&self) -> Option<Extent> {
        match self {
            Geometry::Point(p) => Extent::from_points(std::iter::once(p)),
            Geometry::MultiPoint(pts) => Extent::from_points(pts),
            _ => Extent::from_points(self.contours().into_iter().flat_map(|(_, c)| c.iter())),
        }
    }

    /// Densifies every contour so no segment is much longer than `step`.
    /// Punctual geometries are returned unchanged.
    pub fn sample_at(&self, step: f64) -> Geometry {
        let line = |c: &Vec<Point>| sample_line(c, step);
        let rings = |r: &Vec<Vec<Point>>| r.iter().map(line).collect::<Vec<_>>();
        match self {
            Geometry::Point(_) | Geometry::MultiPoint(_) => self.clone(),
            Geometry::LineString(c) => Geometry::LineString(line(c)),
            Geometry::Polygon(r) => Geometry::Polygon(rings(r)),
            Geometry::MultiLineString(r) => Geometry::MultiLineString(rings(r)),
            Geometry::MultiPolygon(p) => Geometry::MultiPolygon(p.iter().map(rings).collect()),
        }
    }

    /// Fast clip of a polygonal geometry to `extent`, see
    /// [`clip_ring_to_extent`]. Other kinds give `None`.
    pub fn clip_to_extent(&self, extent: &Extent) -> Option<Geometry> {
        let clip = |rings: &Vec<Vec<Point>>| {
            rings
                .iter()
                .map(|r| clip_ring_to_extent(r, extent))
                .collect::<Vec<_>>()
        };
        match self {
            Geometry::Polygon(rings) => Some(Geometry::Polygon(clip(rings))),
            Geometry::MultiPolygon(polygons) => {
                Some(Geometry::MultiPolygon(polygons.iter().map(clip).collect()))
            }
            _ => None,
        }
    }

    /// Representative point of the geometry.
    ///
    /// A point is its own center. Polygons use an interior point on the
    /// horizontal line through the middle of the outer ring (the first
    /// polygon of a multipolygon). Anything else gives its coordinate closest
    /// to the center of its extent.
    pub fn center(&self) -> Option<Point> {
        match self {
            Geometry::Point(p) => Some(*p),
            Geometry::Polygon(rings) => interior_point(rings),
            Geometry::MultiPolygon(polygons) => interior_point(polygons.first()?),
            _ => self.closest_point(&self.extent()?.center()),
        }
    }

    /// Point of the geometry nearest to `target`, on segments for linear
    /// parts.
    pub fn closest_point(&self, target: &Point) -> Option<Point> {
        let candidates: Vec<Point> = match self {
            Geometry::Point(p) => vec![*p],
            Geometry::MultiPoint(pts) => pts.clone(),
            _ => self
                .contours()
                .into_iter()
                .flat_map(|(_, c)| match c {
                    [single] => vec![*single],
                    _ => c
                        .windows(2)
                        .map(|w| closest_point_on_segment(target, &w[0], &w[1]))
                        .collect(),
                })
                .collect(),
        };
        candidates
            .into_iter()
            .min_by(|a, b| a.squared_distance(target).total_cmp(&b.squared_distance(target)))
    }
}

/// Middle of the widest run of the scanline through the outer ring's
/// vertical center.
fn interior_point(rings: &[Vec<Point>]) -> Option<Point> {
    let y = Extent::from_points(rings.first()?)?.center().y;
    split_h(rings, y)
        .into_iter()
        .rev()
        .max_by(|[a0, a1], [b0, b1]| {
            (a1.point.x - a0.point.x).total_cmp(&(b1.point.x - b0.point.x))
        })
        .map(|[a, b]| Point::new((a.point.x + b.point.x) / 2.0, y))
}

fn punctual(kind: GeometryKind) -> Error {
    Error::InvalidCoordinates {
        kind: kind.to_string(),
        reason: "punctual geometries have no contours".into(),
    }
}

/// True when a coordinate sequence ends on its first point.
pub fn is_closed(coords: &[Point]) -> bool {
    coords.len() > 1 && coords.first() == coords.last()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::points;

    fn square(x: f64) -> Vec<Point> {
        points(&[[x, 0.0], [x + 1.0, 0.0], [x + 1.0, 1.0], [x, 1.0], [x, 0.0]])
    }

    #[test]
    fn kind_round_trips_through_str() {
        for kind in [
            GeometryKind::Point,
            GeometryKind::LineString,
            GeometryKind::Polygon,
            GeometryKind::MultiPoint,
            GeometryKind::MultiLineString,
            GeometryKind::MultiPolygon,
        ] {
            assert_eq!(kind.as_str().parse::<GeometryKind>().unwrap(), kind);
        }
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let err = "GeometryCollection".parse::<GeometryKind>().unwrap_err();
        assert!(matches!(err, Error::InvalidGeometryKind(ref s) if s == "GeometryCollection"));
    }

    #[test]
    fn multipolygon_contour_paths() {
        let g = Geometry::MultiPolygon(vec![vec![square(0.0)], vec![square(5.0), square(7.0)]]);
        let paths: Vec<Vec<usize>> = g.contours().iter().map(|(p, _)| p.to_vec()).collect();
        assert_eq!(paths, vec![vec![0, 0], vec![1, 0], vec![1, 1]]);
    }

    #[test]
    fn punctual_geometries_have_no_contours() {
        assert!(Geometry::Point(Point::new(1.0, 1.0)).contours().is_empty());
        assert!(Geometry::MultiPoint(points(&[[0.0, 0.0]])).contours().is_empty());
    }

    #[test]
    fn from_contours_inverts_contours() {
        let g = Geometry::MultiPolygon(vec![vec![square(0.0), square(0.2)], vec![square(5.0)]]);
        let owned: Vec<(ContourPath, Vec<Point>)> =
            g.contours().into_iter().map(|(p, c)| (p, c.to_vec())).collect();
        let rebuilt = Geometry::from_contours(GeometryKind::MultiPolygon, owned).unwrap();
        assert_eq!(rebuilt, g);
    }

    #[test]
    fn from_contours_compacts_gaps() {
        let contours = vec![
            (ContourPath::from_slice(&[3]), square(3.0)),
            (ContourPath::from_slice(&[0]), square(0.0)),
        ];
        let rebuilt = Geometry::from_contours(GeometryKind::Polygon, contours).unwrap();
        assert_eq!(rebuilt, Geometry::Polygon(vec![square(0.0), square(3.0)]));
    }

    #[test]
    fn from_contours_rejects_wrong_depth() {
        let contours = vec![(ContourPath::from_slice(&[0, 1]), square(0.0))];
        let err = Geometry::from_contours(GeometryKind::Polygon, contours).unwrap_err();
        assert!(matches!(err, Error::InvalidCoordinates { .. }));
    }

    fn shoelace(ring: &[Point]) -> f64 {
        ring.windows(2)
            .map(|w| w[0].x * w[1].y - w[1].x * w[0].y)
            .sum::<f64>()
            / 2.0
    }

    #[test]
    fn sample_at_densifies_polygons() {
        let g = Geometry::Polygon(vec![square(0.0)]).sample_at(0.5);
        let expected = points(&[
            [0.0, 0.0],
            [0.5, 0.0],
            [1.0, 0.0],
            [1.0, 0.5],
            [1.0, 1.0],
            [0.5, 1.0],
            [0.0, 1.0],
            [0.0, 0.5],
            [0.0, 0.0],
        ]);
        assert_eq!(g, Geometry::Polygon(vec![expected]));

        let mp = Geometry::MultiPolygon(vec![vec![square(0.0)], vec![square(5.0)]]).sample_at(0.5);
        assert_eq!(mp.point_count(), 18);
        assert_eq!(mp.contours().len(), 2);

        let p = Geometry::Point(Point::new(1.0, 2.0));
        assert_eq!(p.sample_at(0.1), p);
    }

    #[test]
    fn clip_to_extent_halves_square() {
        let extent = Extent::new(0.0, 0.0, 0.5, 1.0);
        let clipped = Geometry::Polygon(vec![square(0.0)]).clip_to_extent(&extent).unwrap();
        assert_eq!(shoelace(clipped.contours()[0].1), 0.5);

        let mp = Geometry::MultiPolygon(vec![vec![square(0.0)], vec![square(5.0)]]);
        let clipped = mp.clip_to_extent(&extent).unwrap();
        assert_eq!(clipped.kind(), GeometryKind::MultiPolygon);
        // The far square collapses onto the extent border.
        assert_eq!(shoelace(clipped.contours()[1].1), 0.0);

        let line = Geometry::LineString(points(&[[0.0, 0.0], [2.0, 0.0]]));
        assert!(line.clip_to_extent(&extent).is_none());
    }

    #[test]
    fn center_of_polygons() {
        assert_eq!(Geometry::Polygon(vec![square(0.0)]).center(), Some(Point::new(0.5, 0.5)));

        let mp = Geometry::MultiPolygon(vec![vec![square(5.0)], vec![square(0.0)]]);
        assert_eq!(mp.center(), Some(Point::new(5.5, 0.5)));

        // The middle of the ring is a hole; the first widest run wins.
        let outer = points(&[[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0], [0.0, 0.0]]);
        let hole = points(&[[1.0, 1.0], [1.0, 3.0], [3.0, 3.0], [3.0, 1.0], [1.0, 1.0]]);
        assert_eq!(Geometry::Polygon(vec![outer, hole]).center(), Some(Point::new(0.5, 2.0)));
    }

    #[test]
    fn center_of_other_kinds() {
        assert_eq!(Geometry::Point(Point::new(3.0, 4.0)).center(), Some(Point::new(3.0, 4.0)));

        let line = Geometry::LineString(points(&[[0.0, 0.0], [4.0, 0.0], [4.0, 1.0]]));
        assert_eq!(line.center(), Some(Point::new(2.0, 0.0)));

        let pts = Geometry::MultiPoint(points(&[[0.0, 0.0], [3.0, 3.0], [10.0, 10.0]]));
        assert_eq!(pts.center(), Some(Point::new(3.0, 3.0)));

        assert_eq!(Geometry::MultiPoint(Vec::new()).center(), None);
    }

    #[test]
    fn closed_detection() {
        assert!(is_closed(&square(0.0)));
        assert!(!is_closed(&points(&[[0.0, 0.0], [1.0, 0.0]])));
        assert!(!is_closed(&points(&[[0.0, 0.0]])));
    }
}
