// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Topology-preserving simplification of a feature set.
//!
//! [`Simplificator`] runs the whole pass:
//!
//! 1. split every feature into boundary arcs,
//! 2. weld arcs covering the same segment into shared edges,
//! 3. fuse runs of edges owned by the same contours into chains,
//! 4. simplify each chain once,
//! 5. rebuild every feature from its chains.
//!
//! Because a border between two features is a single chain, both sides get
//! exactly the same simplified coordinates and no gaps or overlaps appear.
//!
//! # Example
//!
//! ```
//! use edgeweld_geometry::{points, Geometry};
//! use edgeweld_topology::{Simplificator, WeldOptions};
//!
//! let a = Geometry::Polygon(vec![points(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]])]);
//! let b = Geometry::Polygon(vec![points(&[[1.0, 0.0], [2.0, 0.0], [2.0, 1.0], [1.0, 1.0], [1.0, 0.0]])]);
//!
//! let mut simplificator = Simplificator::new(WeldOptions::default());
//! simplificator.set_features([Some(&a), Some(&b)]).unwrap();
//! simplificator.simplify(0.5).unwrap();
//!
//! let result = simplificator.features().unwrap();
//! assert!(result.is_clean());
//! assert_eq!(result.geometries.len(), 2);
//! ```

use std::borrow::Cow;
use std::time::Instant;

use edgeweld_geometry::{Feature, Geometry, Method, VisvalingamOptions};

use crate::arcs::closed_contours;
use crate::arena::EdgeArena;
use crate::chains::Chain;
use crate::error::{Error, Result};
use crate::reconstruct::{reconstruct, Diagnostic, FeatureLayout, Reconstruction};

/// Largest accepted `round` value (decimal digits).
pub const MAX_ROUND_DIGITS: u32 = 15;

/// Options for a welding pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeldOptions {
    /// Coordinate quantization, in decimal digits.
    ///
    /// Accepted and validated but not applied: coordinates are welded exactly
    /// as given.
    pub round: Option<u32>,
    /// Fail on reconstruction inconsistencies instead of reporting them.
    pub strict: bool,
}

impl WeldOptions {
    pub fn validate(&self) -> Result<()> {
        match self.round {
            Some(digits) if digits > MAX_ROUND_DIGITS => Err(Error::InvalidOption(format!(
                "round must be at most {} digits, got {}",
                MAX_ROUND_DIGITS, digits
            ))),
            _ => Ok(()),
        }
    }
}

/// Access to the geometry of a caller-owned feature.
///
/// This is the seam through which simplified geometries are written back.
pub trait FeatureGeometry {
    fn geometry(&self) -> Option<&Geometry>;
    fn set_geometry(&mut self, geometry: Geometry);
}

impl FeatureGeometry for Geometry {
    fn geometry(&self) -> Option<&Geometry> {
        Some(self)
    }

    fn set_geometry(&mut self, geometry: Geometry) {
        *self = geometry;
    }
}

impl FeatureGeometry for Option<Geometry> {
    fn geometry(&self) -> Option<&Geometry> {
        self.as_ref()
    }

    fn set_geometry(&mut self, geometry: Geometry) {
        *self = Some(geometry);
    }
}

impl FeatureGeometry for Feature {
    fn geometry(&self) -> Option<&Geometry> {
        self.geometry.as_ref()
    }

    fn set_geometry(&mut self, geometry: Geometry) {
        self.geometry = Some(geometry);
    }
}

/// Welds a feature set into shared chains and simplifies them.
#[derive(Debug, Default)]
pub struct Simplificator {
    options: WeldOptions,
    chains: Vec<Chain>,
    layouts: Vec<Option<FeatureLayout>>,
}

impl Simplificator {
    pub fn new(options: WeldOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    pub fn options(&self) -> &WeldOptions {
        &self.options
    }

    /// Welds `features` (in input order) and returns the resulting chains.
    ///
    /// Replaces whatever a previous call produced. `None` entries and punctual
    /// geometries take part in numbering but contribute no edges.
    pub fn set_features<'a, I>(&mut self, features: I) -> Result<&[Chain]>
    where
        I: IntoIterator<Item = Option<&'a Geometry>>,
    {
        self.options.validate()?;
        if let Some(digits) = self.options.round {
            tracing::debug!(digits, "coordinate rounding requested but not applied");
        }

        let start = Instant::now();
        let features: Vec<Option<&Geometry>> = features.into_iter().collect();
        self.layouts = features.iter().map(|g| g.and_then(layout)).collect();

        let arena = EdgeArena::from_features(features.iter().copied());
        let edges = arena.edge_count();
        let shared = arena.shared_edge_count();
        self.chains = arena.merge_chains();

        tracing::debug!(
            features = features.len(),
            edges,
            shared,
            chains = self.chains.len(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "features welded"
        );
        Ok(&self.chains)
    }

    /// Convenience wrapper over [`Simplificator::set_features`].
    pub fn set_feature_list<F: FeatureGeometry>(&mut self, features: &[F]) -> Result<&[Chain]> {
        self.set_features(features.iter().map(FeatureGeometry::geometry))
    }

    /// Current chains (the welded edge set).
    pub fn edges(&self) -> &[Chain] {
        &self.chains
    }

    pub fn edge_count(&self) -> usize {
        self.chains.len()
    }

    /// Number of features given to the last [`Simplificator::set_features`].
    pub fn feature_count(&self) -> usize {
        self.layouts.len()
    }

    /// Douglas-Peucker on every chain.
    pub fn simplify(&mut self, tolerance: f64) -> Result<()> {
        self.simplify_with(&Method::DouglasPeucker { tolerance })
    }

    /// Visvalingam on every chain; chains of polygons always keep their ends.
    pub fn simplify_visvalingam(&mut self, options: &VisvalingamOptions) -> Result<()> {
        self.simplify_with(&Method::Visvalingam(options.clone()))
    }

    /// Simplifies every chain from its unsimplified geometry, so successive
    /// calls do not compound.
    pub fn simplify_with(&mut self, method: &Method) -> Result<()> {
        method.validate()?;
        let start = Instant::now();
        let layouts = &self.layouts;
        let mut before = 0;
        let mut after = 0;

        for chain in &mut self.chains {
            let polygonal = chain
                .owners
                .first()
                .and_then(|o| layouts.get(o.feature.0))
                .and_then(Option::as_ref)
                .is_some_and(|l| l.kind.is_polygonal());

            let method = match method {
                Method::Visvalingam(o) if polygonal && !o.keep_ends => {
                    Cow::Owned(Method::Visvalingam(VisvalingamOptions {
                        keep_ends: true,
                        ..o.clone()
                    }))
                }
                m => Cow::Borrowed(m),
            };

            chain.points = method.simplify(&chain.source)?;
            before += chain.source.len();
            after += chain.points.len();
        }

        tracing::debug!(
            method = ?method,
            chains = self.chains.len(),
            before,
            after,
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "chains simplified"
        );
        Ok(())
    }

    /// Drops any simplification, restoring the merged geometry.
    pub fn reset(&mut self) {
        for chain in &mut self.chains {
            chain.points.clone_from(&chain.source);
        }
    }

    /// Rebuilds every feature from the current chains.
    pub fn features(&self) -> Result<Reconstruction> {
        reconstruct(&self.chains, &self.layouts, self.options.strict)
    }

    /// Writes rebuilt geometries into `features`, which must be the set given
    /// to [`Simplificator::set_features`]. Features without a boundary are
    /// left untouched.
    pub fn apply<F: FeatureGeometry>(&self, features: &mut [F]) -> Result<Vec<Diagnostic>> {
        if features.len() != self.layouts.len() {
            return Err(Error::FeatureCountMismatch {
                expected: self.layouts.len(),
                actual: features.len(),
            });
        }
        let rebuilt = self.features()?;
        for (feature, geometry) in features.iter_mut().zip(rebuilt.geometries) {
            if let Some(geometry) = geometry {
                feature.set_geometry(geometry);
            }
        }
        Ok(rebuilt.diagnostics)
    }
}

fn layout(geometry: &Geometry) -> Option<FeatureLayout> {
    let kind = geometry.kind();
    if kind.is_punctual() {
        return None;
    }
    Some(FeatureLayout {
        kind,
        closed: closed_contours(geometry).into_iter().collect(),
    })
}

/// Welds, simplifies and writes back `features` in one pass.
pub fn weld_simplify<F: FeatureGeometry>(
    features: &mut [F],
    options: &WeldOptions,
    method: &Method,
) -> Result<Vec<Diagnostic>> {
    let mut simplificator = Simplificator::new(options.clone());
    simplificator.set_feature_list(features)?;
    simplificator.simplify_with(method)?;
    simplificator.apply(features)
}
