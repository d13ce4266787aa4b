// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Planar point type.
//!
//! Equality is exact: two points are the same only if both coordinates
//! compare equal as `f64`. Shared boundaries are detected through this
//! equality, so no tolerance is ever applied.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// A 2D coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Bit-exact hashable form of a [`Point`].
///
/// `-0.0` is folded into `0.0` so that the key agrees with `==`.
pub type PointKey = (u64, u64);

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Hash key consistent with exact equality.
    pub fn hash_key(&self) -> PointKey {
        (canonical_bits(self.x), canonical_bits(self.y))
    }

    pub fn distance(&self, other: &Point) -> f64 {
        self.squared_distance(other).sqrt()
    }

    pub fn squared_distance(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub(crate) fn to_vector(self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }

    pub(crate) fn from_vector(v: Vector2<f64>) -> Self {
        Self::new(v.x, v.y)
    }
}

fn canonical_bits(v: f64) -> u64 {
    if v == 0.0 { 0.0f64.to_bits() } else { v.to_bits() }
}

impl From<[f64; 2]> for Point {
    fn from(c: [f64; 2]) -> Self {
        Self::new(c[0], c[1])
    }
}

impl From<Point> for [f64; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Builds a point list from `[x, y]` pairs.
pub fn points(coords: &[[f64; 2]]) -> Vec<Point> {
    coords.iter().copied().map(Point::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn equality_is_exact() {
        assert_eq!(Point::new(1.0, 2.0), Point::new(1.0, 2.0));
        assert_ne!(Point::new(1.0, 2.0), Point::new(1.0, 2.000_000_000_1));
    }

    #[test]
    fn negative_zero_shares_key() {
        let a = Point::new(0.0, -0.0);
        let b = Point::new(-0.0, 0.0);
        assert_eq!(a, b);
        assert_eq!(a.hash_key(), b.hash_key());
    }

    #[test]
    fn distance_pythagorean() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_relative_eq!(a.distance(&b), 5.0);
        assert_relative_eq!(a.squared_distance(&b), 25.0);
    }

    #[test]
    fn serde_as_pair() {
        let p: Point = serde_json::from_str("[1.5, -2]").unwrap();
        assert_eq!(p, Point::new(1.5, -2.0));
        assert_eq!(serde_json::to_string(&p).unwrap(), "[1.5,-2.0]");
    }
}
