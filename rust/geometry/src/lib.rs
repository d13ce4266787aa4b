// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Edgeweld Geometry
//!
//! Planar coordinate primitives, an explicitly tagged geometry model and the
//! line reduction algorithms used by the edge-welding simplifier, plus a small
//! GeoJSON codec for getting features in and out.

pub mod error;
pub mod geojson;
pub mod geom;
pub mod point;
pub mod primitives;
pub mod simplify;

// Re-export nalgebra types for convenience
pub use nalgebra::Vector2;

pub use error::{Error, Result};
pub use self::geojson::{Feature, FeatureCollection};
pub use geom::{is_closed, ContourPath, Geometry, GeometryKind};
pub use point::{points, Point, PointKey};
pub use primitives::Extent;
pub use simplify::{douglas_peucker, visvalingam, Method, VisvalingamOptions};
