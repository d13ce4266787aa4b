// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for welding operations.

use crate::keys::{ContourId, FeatureId};

/// Result type alias for welding operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while welding, simplifying or rebuilding features.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid geometry input or simplification options.
    #[error(transparent)]
    Geometry(#[from] edgeweld_geometry::Error),

    /// A chain could not be attached to either end of its contour.
    #[error("contour {contour} of feature {feature} does not connect to chain {chain}")]
    TopologyInconsistency {
        feature: FeatureId,
        contour: ContourId,
        chain: usize,
    },

    /// Write-back target does not match the feature set that was welded.
    #[error("expected {expected} features, got {actual}")]
    FeatureCountMismatch { expected: usize, actual: usize },

    /// An option outside its accepted range.
    #[error("invalid option: {0}")]
    InvalidOption(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}
