// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Identifier types for the welding pipeline.
//!
//! Edges live in a `slotmap::SlotMap` and are addressed by generational
//! [`EdgeKey`]s, which stay valid while neighbouring edges are merged away.
//! Features are addressed by their position in the input, contours by the
//! nesting path inside their feature's geometry.

use edgeweld_geometry::ContourPath;
use serde::{Serialize, Serializer};
use slotmap::new_key_type;

new_key_type! {
    /// Key for an edge (a boundary segment, later a merged chain).
    pub struct EdgeKey;
}

/// Position of a feature in the input collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FeatureId(pub usize);

impl std::fmt::Display for FeatureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifies one ring or line within a feature's geometry.
///
/// Displayed as a dash-joined path rooted at `0`: ring 1 of a polygon is
/// `0-1`, ring 0 of the second polygon of a multipolygon is `0-1-0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ContourId(pub ContourPath);

impl ContourId {
    pub fn path(&self) -> &ContourPath {
        &self.0
    }
}

impl From<ContourPath> for ContourId {
    fn from(path: ContourPath) -> Self {
        Self(path)
    }
}

impl std::fmt::Display for ContourId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("0")?;
        for i in &self.0 {
            write!(f, "-{}", i)?;
        }
        Ok(())
    }
}

impl Serialize for ContourId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One use of an edge: arc `index` of `contour` in `feature`.
///
/// `index` is the arc's position in its feature's traversal; sorting a
/// contour's owners by it restores the original order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Owner {
    pub feature: FeatureId,
    pub contour: ContourId,
    pub index: usize,
}

impl Owner {
    /// Same feature and contour, regardless of position.
    pub fn same_contour(&self, other: &Owner) -> bool {
        self.feature == other.feature && self.contour == other.contour
    }
}
