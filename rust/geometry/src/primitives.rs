// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Coordinate primitives on plain [`Point`] sequences: distances, nearest
//! points, intersections, segment sampling, offsetting, scanline splits and
//! extent clipping.

use nalgebra::Vector2;

use crate::geom::is_closed;
use crate::point::Point;

/// Tolerance on the unit-direction cross product used by [`find_segment`]
/// and [`offset_coords`].
const COLLINEAR_EPSILON: f64 = 1e-10;

/// Upper bound on the parts [`sample_segment`] splits one segment into.
pub const MAX_SAMPLE_PARTS: usize = 1 << 16;

#[inline]
fn cross(a: &Vector2<f64>, b: &Vector2<f64>) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Euclidean distance between two points.
pub fn distance(p: &Point, q: &Point) -> f64 {
    p.distance(q)
}

/// Closest point to `p` on the segment `[a, b]`.
///
/// A degenerate segment (`a == b`) returns `a`.
pub fn closest_point_on_segment(p: &Point, a: &Point, b: &Point) -> Point {
    let ab = b.to_vector() - a.to_vector();
    let len_sq = ab.norm_squared();
    if len_sq == 0.0 {
        return *a;
    }
    let t = ((p.to_vector() - a.to_vector()).dot(&ab) / len_sq).clamp(0.0, 1.0);
    Point::from_vector(a.to_vector() + ab * t)
}

/// Squared distance from `p` to the segment `[a, b]`.
pub fn squared_segment_distance(p: &Point, a: &Point, b: &Point) -> f64 {
    p.squared_distance(&closest_point_on_segment(p, a, b))
}

/// Area of the triangle `abc` (always non-negative).
pub fn triangle_area(a: &Point, b: &Point, c: &Point) -> f64 {
    let ab = b.to_vector() - a.to_vector();
    let ac = c.to_vector() - a.to_vector();
    cross(&ab, &ac).abs() / 2.0
}

/// Intersection of the infinite lines through `d1` and `d2`.
///
/// Returns `None` for parallel (or degenerate) lines.
pub fn line_intersection(d1: (&Point, &Point), d2: (&Point, &Point)) -> Option<Point> {
    let a0 = d1.0.to_vector();
    let b0 = d2.0.to_vector();
    let v1 = d1.1.to_vector() - a0;
    let v2 = d2.1.to_vector() - b0;

    let det = cross(&v1, &v2);
    if det == 0.0 {
        return None;
    }
    let k = cross(&v1, &(a0 - b0)) / det;
    Some(Point::from_vector(b0 + v2 * k))
}

/// Finds the segment of `coords` that `p` lies on.
///
/// Returns the index `i` of the first segment `[coords[i], coords[i + 1]]`
/// that either has `p` as an endpoint or contains it (collinear and within
/// the segment bounds).
pub fn find_segment(p: &Point, coords: &[Point]) -> Option<usize> {
    coords.windows(2).position(|w| {
        let (p0, p1) = (&w[0], &w[1]);
        if p == p0 || p == p1 {
            return true;
        }
        let seg = p1.to_vector() - p0.to_vector();
        let rel = p.to_vector() - p0.to_vector();
        let (seg_len, rel_len) = (seg.norm(), rel.norm());
        if seg_len == 0.0 {
            return false;
        }
        let aligned = cross(&(seg / seg_len), &(rel / rel_len)).abs() < COLLINEAR_EPSILON;
        let t = rel.dot(&seg) / (seg_len * seg_len);
        aligned && (0.0..=1.0).contains(&t)
    })
}

/// Offsets a polyline or ring sideways by `offset`.
///
/// Positive offsets move to the right of the direction of travel, so a
/// counter-clockwise ring grows. Each inner vertex becomes the intersection
/// of its two offset neighbouring segments; vertices between collinear
/// segments are dropped. An open line keeps one point per end, placed
/// perpendicular to the end segment. A closed ring stays closed and starts at
/// the offset of its second vertex.
pub fn offset_coords(coords: &[Point], offset: f64) -> Vec<Point> {
    let mut pts = coords.to_vec();
    pts.dedup();
    if pts.len() < 2 {
        return pts;
    }

    let shift = |a: &Point, b: &Point| {
        let d = (b.to_vector() - a.to_vector()).normalize();
        Vector2::new(d.y, -d.x) * offset
    };
    let joint = |p0: &Point, p1: &Point, p2: &Point| {
        let u = (p1.to_vector() - p0.to_vector()).normalize();
        let v = (p2.to_vector() - p1.to_vector()).normalize();
        if cross(&u, &v).abs() <= COLLINEAR_EPSILON {
            return None;
        }
        let (s1, s2) = (shift(p0, p1), shift(p1, p2));
        line_intersection(
            (&Point::from_vector(p0.to_vector() + s1), &Point::from_vector(p1.to_vector() + s1)),
            (&Point::from_vector(p1.to_vector() + s2), &Point::from_vector(p2.to_vector() + s2)),
        )
    };

    let mut path = Vec::with_capacity(pts.len());
    if is_closed(&pts) {
        let n = pts.len() - 1;
        if n < 2 {
            return pts;
        }
        for i in 0..n {
            if let Some(p) = joint(&pts[i], &pts[(i + 1) % n], &pts[(i + 2) % n]) {
                path.push(p);
            }
        }
        if let Some(&first) = path.first() {
            path.push(first);
        }
    } else {
        let n = pts.len();
        path.push(Point::from_vector(pts[0].to_vector() + shift(&pts[0], &pts[1])));
        for w in pts.windows(3) {
            if let Some(p) = joint(&w[0], &w[1], &w[2]) {
                path.push(p);
            }
        }
        path.push(Point::from_vector(
            pts[n - 1].to_vector() + shift(&pts[n - 2], &pts[n - 1]),
        ));
    }
    path
}

/// Where a horizontal scanline crosses a contour segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanCrossing {
    /// Index of the contour in the input list.
    pub contour: usize,
    /// Index of the segment `[ring[index], ring[index + 1]]`.
    pub index: usize,
    pub point: Point,
    /// Position of `point` along the segment, from 0 to 1.
    pub t: f64,
}

/// Cuts the contours of a polygon with the horizontal line at `y`.
///
/// Crossings of all contours are sorted by `x` and paired left to right, so
/// each returned pair spans one run of the scanline inside the polygon (holes
/// included). A segment counts as crossed when one end is on or below `y` and
/// the other strictly above, or one end on or above and the other strictly
/// below.
pub fn split_h(contours: &[Vec<Point>], y: f64) -> Vec<[ScanCrossing; 2]> {
    let mut crossings: Vec<ScanCrossing> = contours
        .iter()
        .enumerate()
        .flat_map(|(contour, ring)| {
            ring.windows(2).enumerate().filter_map(move |(index, w)| {
                let (a, b) = (&w[0], &w[1]);
                let crosses = (a.y <= y && b.y > y) || (a.y >= y && b.y < y);
                crosses.then(|| {
                    let t = (y - a.y) / (b.y - a.y);
                    ScanCrossing {
                        contour,
                        index,
                        point: Point::new(a.x + t * (b.x - a.x), y),
                        t,
                    }
                })
            })
        })
        .collect();
    crossings.sort_by(|a, b| a.point.x.total_cmp(&b.point.x));
    crossings
        .chunks_exact(2)
        .map(|pair| [pair[0], pair[1]])
        .collect()
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Extent {
    pub const fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Smallest extent holding every point, `None` when there are none.
    pub fn from_points<'a>(pts: impl IntoIterator<Item = &'a Point>) -> Option<Self> {
        pts.into_iter().fold(None, |acc, p| {
            Some(match acc {
                None => Extent::new(p.x, p.y, p.x, p.y),
                Some(e) => Extent::new(e.min_x.min(p.x), e.min_y.min(p.y), e.max_x.max(p.x), e.max_y.max(p.y)),
            })
        })
    }

    pub fn center(&self) -> Point {
        Point::new((self.min_x + self.max_x) / 2.0, (self.min_y + self.max_y) / 2.0)
    }

    pub fn contains(&self, p: &Point) -> bool {
        (self.min_x..=self.max_x).contains(&p.x) && (self.min_y..=self.max_y).contains(&p.y)
    }

    fn clamp(&self, p: &Point) -> Point {
        Point::new(p.x.clamp(self.min_x, self.max_x), p.y.clamp(self.min_y, self.max_y))
    }
}

/// Inserts a vertex wherever a segment strictly crosses `x = at` (or
/// `y = at` when `on_x` is false).
fn split_at(coords: &[Point], at: f64, on_x: bool) -> Vec<Point> {
    let ord = |p: &Point| if on_x { p.x } else { p.y };
    let mut out = Vec::with_capacity(coords.len());
    for w in coords.windows(2) {
        let (a, b) = (&w[0], &w[1]);
        out.push(*a);
        let (oa, ob) = (ord(a), ord(b));
        if (oa < at && ob > at) || (oa > at && ob < at) {
            let t = (at - oa) / (ob - oa);
            let p = Point::new(a.x + t * (b.x - a.x), a.y + t * (b.y - a.y));
            out.push(if on_x { Point::new(at, p.y) } else { Point::new(p.x, at) });
        }
    }
    if let Some(last) = coords.last() {
        out.push(*last);
    }
    out
}

/// Fast clip of a ring to `extent`.
///
/// The ring is split wherever it crosses an extent side and every vertex is
/// then snapped inside the extent. The result covers the same area as the
/// exact intersection but may contain repeated or collinear vertices along
/// the extent border, so it suits area measurement rather than display.
pub fn clip_ring_to_extent(ring: &[Point], extent: &Extent) -> Vec<Point> {
    let mut pts = split_at(ring, extent.min_x, true);
    pts = split_at(&pts, extent.max_x, true);
    pts = split_at(&pts, extent.min_y, false);
    pts = split_at(&pts, extent.max_y, false);
    pts.iter().map(|p| extent.clamp(p)).collect()
}

/// Densifies the segment `[p1, p2]` with points spaced roughly `step` apart.
///
/// The segment is split into `round(len / step)` parts, capped at
/// [`MAX_SAMPLE_PARTS`]. `p2` is always emitted, `p1` only when
/// `include_start` is set so consecutive segments can be chained without
/// duplicates.
pub fn sample_segment(p1: &Point, p2: &Point, step: f64, include_start: bool) -> Vec<Point> {
    let mut pts = Vec::new();
    if include_start {
        pts.push(*p1);
    }
    let len = p1.distance(p2);
    if len > 0.0 && step > 0.0 {
        let parts = (len / step).round().min(MAX_SAMPLE_PARTS as f64) as usize;
        if parts > 1 {
            let dx = (p2.x - p1.x) / parts as f64;
            let dy = (p2.y - p1.y) / parts as f64;
            for i in 1..parts {
                pts.push(Point::new(p1.x + dx * i as f64, p1.y + dy * i as f64));
            }
        }
    }
    pts.push(*p2);
    pts
}

/// Densifies a whole polyline with [`sample_segment`].
pub fn sample_line(coords: &[Point], step: f64) -> Vec<Point> {
    let mut out = Vec::with_capacity(coords.len());
    for (i, w) in coords.windows(2).enumerate() {
        out.extend(sample_segment(&w[0], &w[1], step, i == 0));
    }
    if coords.len() == 1 {
        out.push(coords[0]);
    }
    out
}
