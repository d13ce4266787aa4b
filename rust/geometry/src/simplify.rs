// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polyline reduction strategies.
//!
//! Two interchangeable algorithms operate on a single coordinate sequence:
//!
//! - [`douglas_peucker`]: tolerance based, drops points closer than the
//!   tolerance to the simplified line.
//! - [`visvalingam`]: area based, repeatedly eliminates the point forming the
//!   smallest triangle with its neighbours.
//!
//! Both keep the endpoints of open sequences. Closed sequences (first point
//! equal to the last) never collapse below a triangle.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::error::{Error, Result};
use crate::geom::is_closed;
use crate::point::Point;
use crate::primitives::{squared_segment_distance, triangle_area};

/// Fewest points a closed sequence is reduced to (a closed triangle).
const MIN_RING_POINTS: usize = 4;

/// Reduction strategy applied to each sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum Method {
    DouglasPeucker { tolerance: f64 },
    Visvalingam(VisvalingamOptions),
}

impl Method {
    pub fn validate(&self) -> Result<()> {
        match self {
            Method::DouglasPeucker { tolerance } => {
                if tolerance.is_nan() || *tolerance < 0.0 {
                    return Err(Error::InvalidOption(format!(
                        "tolerance must be a non-negative number, got {}",
                        tolerance
                    )));
                }
                Ok(())
            }
            Method::Visvalingam(options) => options.validate(),
        }
    }

    pub fn simplify(&self, points: &[Point]) -> Result<Vec<Point>> {
        self.validate()?;
        match self {
            Method::DouglasPeucker { tolerance } => Ok(douglas_peucker(points, *tolerance)),
            Method::Visvalingam(options) => visvalingam(points, options),
        }
    }
}

/// Options for [`visvalingam`].
#[derive(Debug, Clone, PartialEq)]
pub struct VisvalingamOptions {
    /// Minimum effective triangle area a point needs to survive.
    pub area: f64,
    /// Distance tolerance, converted to an area of `dist² / 2`.
    pub dist: f64,
    /// Fraction of the input points to retain, in `(0, 1]`.
    pub ratio: Option<f64>,
    /// Never reduce below this many points.
    pub min_points: usize,
    /// Keep the seam point of closed sequences.
    pub keep_ends: bool,
}

impl Default for VisvalingamOptions {
    fn default() -> Self {
        Self {
            area: 0.0,
            dist: 0.0,
            ratio: None,
            min_points: 2,
            keep_ends: false,
        }
    }
}

impl VisvalingamOptions {
    pub fn validate(&self) -> Result<()> {
        if self.area.is_nan() || self.area < 0.0 {
            return Err(Error::InvalidOption(format!("area must be non-negative, got {}", self.area)));
        }
        if self.dist.is_nan() || self.dist < 0.0 {
            return Err(Error::InvalidOption(format!("dist must be non-negative, got {}", self.dist)));
        }
        if let Some(ratio) = self.ratio {
            if !(ratio > 0.0 && ratio <= 1.0) {
                return Err(Error::InvalidOption(format!("ratio must be in (0, 1], got {}", ratio)));
            }
        }
        Ok(())
    }

    /// Effective area threshold combining `area` and `dist`.
    pub fn area_threshold(&self) -> f64 {
        self.area.max(self.dist * self.dist / 2.0)
    }
}

/// Douglas-Peucker reduction.
///
/// A point survives if its distance to the segment joining the surrounding
/// kept points is at least `tolerance`. A non-positive tolerance returns the
/// input unchanged.
///
/// Closed sequences are first split at the vertex farthest from the seam and
/// always keep at least four points.
pub fn douglas_peucker(points: &[Point], tolerance: f64) -> Vec<Point> {
    let n = points.len();
    if tolerance.is_nan() || tolerance <= 0.0 || n < 3 {
        return points.to_vec();
    }

    let tol_sq = tolerance * tolerance;
    let mut keep = vec![false; n];
    keep[0] = true;
    keep[n - 1] = true;

    if is_closed(points) && n >= MIN_RING_POINTS {
        let far = farthest(points, 0, n - 1, |p| p.squared_distance(&points[0]));
        keep[far] = true;
        reduce_span(points, 0, far, tol_sq, &mut keep);
        reduce_span(points, far, n - 1, tol_sq, &mut keep);

        if keep.iter().filter(|&&k| k).count() < MIN_RING_POINTS {
            // Only the seam and the far vertex are left: restore the interior
            // vertex deviating most from that diameter.
            let (a, b) = (points[0], points[far]);
            let mut best: Option<(usize, f64)> = None;
            for (i, p) in points.iter().enumerate().take(n - 1).skip(1) {
                if keep[i] {
                    continue;
                }
                let d = squared_segment_distance(p, &a, &b);
                if best.map_or(true, |(_, bd)| d > bd) {
                    best = Some((i, d));
                }
            }
            if let Some((i, _)) = best {
                keep[i] = true;
            }
        }
    } else {
        reduce_span(points, 0, n - 1, tol_sq, &mut keep);
    }

    points
        .iter()
        .zip(&keep)
        .filter(|&(_, k)| *k)
        .map(|(&p, _)| p)
        .collect()
}

/// Index in `(first, last)` maximising `metric`, first one on ties.
fn farthest(points: &[Point], first: usize, last: usize, metric: impl Fn(&Point) -> f64) -> usize {
    let mut best = first + 1;
    let mut best_d = f64::NEG_INFINITY;
    for (i, p) in points.iter().enumerate().take(last).skip(first + 1) {
        let d = metric(p);
        if d > best_d {
            best = i;
            best_d = d;
        }
    }
    best
}

fn reduce_span(points: &[Point], first: usize, last: usize, tol_sq: f64, keep: &mut [bool]) {
    let mut stack = vec![(first, last)];
    while let Some((first, last)) = stack.pop() {
        if last <= first + 1 {
            continue;
        }
        let (a, b) = (points[first], points[last]);
        let idx = farthest(points, first, last, |p| squared_segment_distance(p, &a, &b));
        if squared_segment_distance(&points[idx], &a, &b) >= tol_sq {
            keep[idx] = true;
            stack.push((first, idx));
            stack.push((idx, last));
        }
    }
}

/// Elimination candidate, ordered so that [`BinaryHeap`] pops the smallest
/// area first (lowest index on ties).
#[derive(Debug, Clone, Copy)]
struct Candidate {
    area: f64,
    index: usize,
    version: u32,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap
        other
            .area
            .total_cmp(&self.area)
            .then_with(|| other.index.cmp(&self.index))
    }
}

/// Visvalingam-Whyatt reduction.
///
/// Points are eliminated by increasing effective area (the triangle they form
/// with their current neighbours, never less than the previously eliminated
/// area) while that area is below [`VisvalingamOptions::area_threshold`], or
/// while more than `ceil(ratio * n)` points remain.
///
/// Open sequences keep both endpoints. A closed sequence keeps its seam point
/// only with `keep_ends`; otherwise the seam competes like any vertex and the
/// result is re-closed on its new first point.
pub fn visvalingam(points: &[Point], options: &VisvalingamOptions) -> Result<Vec<Point>> {
    options.validate()?;
    let threshold = options.area_threshold();
    let n = points.len();
    if (threshold <= 0.0 && options.ratio.is_none()) || n < 3 {
        return Ok(points.to_vec());
    }

    let closed = is_closed(points);
    if closed && n <= MIN_RING_POINTS {
        return Ok(points.to_vec());
    }

    // A cyclic sequence drops the duplicated closing point while working.
    let cyclic = closed && !options.keep_ends;
    let m = if cyclic { n - 1 } else { n };
    let extra = usize::from(cyclic);
    let floor = options
        .min_points
        .max(if closed { MIN_RING_POINTS } else { 2 });
    let target = options.ratio.map(|r| (r * n as f64).ceil() as usize);

    let mut prev: Vec<usize> = (0..m).map(|i| if i == 0 { m - 1 } else { i - 1 }).collect();
    let mut next: Vec<usize> = (0..m).map(|i| (i + 1) % m).collect();
    let mut removed = vec![false; m];
    let mut version = vec![0u32; m];
    let removable = |i: usize| cyclic || (i != 0 && i != m - 1);
    let area_at = |i: usize, prev: &[usize], next: &[usize]| {
        triangle_area(&points[prev[i]], &points[i], &points[next[i]])
    };

    let mut heap: BinaryHeap<Candidate> = (0..m)
        .filter(|&i| removable(i))
        .map(|i| Candidate {
            area: area_at(i, &prev, &next),
            index: i,
            version: 0,
        })
        .collect();

    let mut remaining = m;
    let mut last_area = 0.0f64;
    while let Some(candidate) = heap.pop() {
        let i = candidate.index;
        if removed[i] || candidate.version != version[i] {
            continue;
        }
        if remaining + extra <= floor {
            break;
        }
        let effective = candidate.area.max(last_area);
        let over_ratio = target.is_some_and(|t| remaining + extra > t);
        if effective >= threshold && !over_ratio {
            break;
        }

        last_area = effective;
        removed[i] = true;
        remaining -= 1;
        let (p, q) = (prev[i], next[i]);
        next[p] = q;
        prev[q] = p;

        for j in [p, q] {
            if removable(j) && !removed[j] {
                version[j] += 1;
                heap.push(Candidate {
                    area: area_at(j, &prev, &next),
                    index: j,
                    version: version[j],
                });
            }
        }
    }

    let mut out: Vec<Point> = (0..m).filter(|&i| !removed[i]).map(|i| points[i]).collect();
    if cyclic {
        if let Some(&first) = out.first() {
            out.push(first);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::points;

    fn zigzag() -> Vec<Point> {
        points(&[
            [0.0, 0.0],
            [1.0, 0.1],
            [2.0, 0.0],
            [3.0, -0.05],
            [4.0, 0.0],
            [5.0, 2.0],
            [6.0, 0.0],
        ])
    }

    #[test]
    fn dp_zero_tolerance_is_identity() {
        let line = points(&[[0.0, 0.0], [1.0, 0.0], [2.0, 0.0], [2.0, 5.0]]);
        assert_eq!(douglas_peucker(&line, 0.0), line);
    }

    #[test]
    fn dp_keeps_endpoints_and_large_deviation() {
        let result = douglas_peucker(&zigzag(), 0.5);
        assert_eq!(result, points(&[[0.0, 0.0], [4.0, 0.0], [5.0, 2.0], [6.0, 0.0]]));
    }

    #[test]
    fn dp_short_input_unchanged() {
        let line = points(&[[0.0, 0.0], [3.0, 1.0]]);
        assert_eq!(douglas_peucker(&line, 10.0), line);
    }

    #[test]
    fn dp_removes_collinear_midpoint_of_triangle() {
        let ring = points(&[[0.0, 0.0], [2.0, 0.0], [4.0, 0.0], [2.0, 3.0], [0.0, 0.0]]);
        let result = douglas_peucker(&ring, 1.0);
        assert_eq!(result, points(&[[0.0, 0.0], [4.0, 0.0], [2.0, 3.0], [0.0, 0.0]]));
    }

    #[test]
    fn dp_ring_never_collapses() {
        let ring = points(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]]);
        let result = douglas_peucker(&ring, 100.0);
        assert_eq!(result.len(), 4);
        assert_eq!(result.first(), result.last());
        assert_eq!(result, points(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]));
    }

    #[test]
    fn vw_zero_threshold_is_identity() {
        let line = zigzag();
        let result = visvalingam(&line, &VisvalingamOptions::default()).unwrap();
        assert_eq!(result, line);
    }

    #[test]
    fn vw_drops_small_triangles() {
        let options = VisvalingamOptions {
            area: 0.5,
            ..Default::default()
        };
        let result = visvalingam(&zigzag(), &options).unwrap();
        assert_eq!(result, points(&[[0.0, 0.0], [4.0, 0.0], [5.0, 2.0], [6.0, 0.0]]));
    }

    #[test]
    fn vw_dist_converts_to_area() {
        let options = VisvalingamOptions {
            dist: 1.0,
            ..Default::default()
        };
        assert_eq!(options.area_threshold(), 0.5);
        let result = visvalingam(&zigzag(), &options).unwrap();
        assert_eq!(result.len(), 4);
    }

    #[test]
    fn vw_ratio_limits_point_count() {
        let options = VisvalingamOptions {
            ratio: Some(0.5),
            ..Default::default()
        };
        let result = visvalingam(&zigzag(), &options).unwrap();
        assert_eq!(result.len(), 4);
        assert_eq!(result.first(), Some(&Point::new(0.0, 0.0)));
        assert_eq!(result.last(), Some(&Point::new(6.0, 0.0)));
    }

    #[test]
    fn vw_respects_min_points() {
        let options = VisvalingamOptions {
            area: 1000.0,
            min_points: 5,
            ..Default::default()
        };
        let result = visvalingam(&zigzag(), &options).unwrap();
        assert_eq!(result.len(), 5);
    }

    #[test]
    fn vw_seam_kept_with_keep_ends() {
        let ring = points(&[[5.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [0.0, 0.0], [5.0, 0.0]]);
        let options = VisvalingamOptions {
            area: 1.0,
            keep_ends: true,
            ..Default::default()
        };
        assert_eq!(visvalingam(&ring, &options).unwrap(), ring);
    }

    #[test]
    fn vw_seam_removed_without_keep_ends() {
        let ring = points(&[[5.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [0.0, 0.0], [5.0, 0.0]]);
        let options = VisvalingamOptions {
            area: 1.0,
            ..Default::default()
        };
        let result = visvalingam(&ring, &options).unwrap();
        assert_eq!(
            result,
            points(&[[10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [0.0, 0.0], [10.0, 0.0]])
        );
    }

    #[test]
    fn vw_rejects_bad_ratio() {
        let options = VisvalingamOptions {
            ratio: Some(1.5),
            ..Default::default()
        };
        assert!(matches!(visvalingam(&zigzag(), &options), Err(Error::InvalidOption(_))));
    }

    #[test]
    fn method_rejects_negative_tolerance() {
        let method = Method::DouglasPeucker { tolerance: -1.0 };
        assert!(method.simplify(&zigzag()).is_err());
    }
}
