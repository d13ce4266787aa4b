// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON export of the welded edge set, for inspection and debugging.
//!
//! Chains are numbered in creation order; `prev` links are expressed with
//! those numbers rather than arena keys so the output is portable.

use edgeweld_geometry::{Feature, FeatureCollection, Geometry};
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::keys::*;
use crate::simplificator::Simplificator;

/// Serializable representation of the welded edge set.
#[derive(Debug, Serialize)]
pub struct WeldSnapshot {
    pub features: usize,
    pub chains: Vec<ChainSnapshot>,
}

#[derive(Debug, Serialize)]
pub struct ChainSnapshot {
    pub id: usize,
    pub coordinates: Vec<[f64; 2]>,
    /// Point count before simplification.
    pub source_len: usize,
    pub owners: Vec<Owner>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<usize>,
}

impl Simplificator {
    /// Creates a serializable snapshot of the current chains.
    pub fn to_snapshot(&self) -> WeldSnapshot {
        let ids: FxHashMap<EdgeKey, usize> = self
            .edges()
            .iter()
            .enumerate()
            .map(|(i, c)| (c.key, i))
            .collect();

        let chains = self
            .edges()
            .iter()
            .enumerate()
            .map(|(i, c)| ChainSnapshot {
                id: i,
                coordinates: c.points.iter().map(|p| [p.x, p.y]).collect(),
                source_len: c.source.len(),
                owners: c.owners.to_vec(),
                prev: c.prev.and_then(|k| ids.get(&k).copied()),
            })
            .collect();

        WeldSnapshot {
            features: self.feature_count(),
            chains,
        }
    }

    /// Serializes the current chains to a JSON string.
    pub fn edges_to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.to_snapshot())
            .map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Current chains as `LineString` features, tagged with their id, owner
    /// count and owning features.
    pub fn edges_to_geojson(&self) -> FeatureCollection {
        let features = self
            .edges()
            .iter()
            .enumerate()
            .map(|(i, chain)| {
                let mut owners: Vec<usize> = chain.owners.iter().map(|o| o.feature.0).collect();
                owners.dedup();
                Feature::new(Geometry::LineString(chain.points.clone()))
                    .with_property("chain", i)
                    .with_property("shared", chain.is_shared())
                    .with_property("owners", owners)
            })
            .collect();
        FeatureCollection::new(features)
    }
}
