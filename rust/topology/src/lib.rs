// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Edgeweld Topology
//!
//! Topology-preserving simplification of feature collections.
//!
//! Boundaries of all features are decomposed into segments which are welded
//! into shared edges stored in a slot-map arena: a border between two
//! polygons exists exactly once, owned by both. Runs of edges with identical
//! owners are fused into chains, each chain is simplified once, and every
//! feature is rebuilt from the simplified chains. Neighbours therefore stay
//! gap-free and overlap-free after simplification.
//!
//! The entry point is [`Simplificator`], or [`weld_simplify`] for a single
//! pass over caller-owned features.

pub mod arcs;
pub mod arena;
pub mod chains;
pub mod construction;
pub mod error;
pub mod keys;
pub mod reconstruct;
pub mod serialization;
pub mod simplificator;

pub use arena::{EdgeArena, EdgeData, Owners};
pub use chains::Chain;
pub use error::{Error, Result};
pub use keys::{ContourId, EdgeKey, FeatureId, Owner};
pub use reconstruct::{Diagnostic, Reconstruction};
pub use serialization::{ChainSnapshot, WeldSnapshot};
pub use simplificator::{weld_simplify, FeatureGeometry, Simplificator, WeldOptions};

pub use edgeweld_geometry::{Method, VisvalingamOptions};
