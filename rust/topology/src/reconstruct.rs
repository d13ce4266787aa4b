// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reassembly of per-feature geometries from (simplified) chains.
//!
//! Every chain owner names a `(feature, contour, index)` position. Grouping
//! owners by feature and contour and sorting them by index recovers the
//! order in which the contour was originally walked; the chains are then
//! joined end to end, reversing those traversed against the contour.

use std::collections::{BTreeMap, VecDeque};

use edgeweld_geometry::{Geometry, GeometryKind, Point};
use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::chains::Chain;
use crate::error::{Error, Result};
use crate::keys::*;

/// Shape information about an input feature needed to rebuild it.
#[derive(Debug, Clone)]
pub struct FeatureLayout {
    pub kind: GeometryKind,
    /// Contours that ended on their starting point.
    pub closed: FxHashSet<ContourId>,
}

/// Anomalies found while reassembling.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum Diagnostic {
    /// A chain shared no endpoint with the contour built so far and was
    /// appended reversed.
    TopologyInconsistency {
        feature: FeatureId,
        contour: ContourId,
        chain: usize,
    },
    /// A closed contour came out with fewer than four points.
    DegenerateRing {
        feature: FeatureId,
        contour: ContourId,
        points: usize,
    },
}

/// Result of reassembly: one entry per input feature (`None` when the
/// feature had no boundary) plus any diagnostics.
#[derive(Debug, Clone, Default)]
pub struct Reconstruction {
    pub geometries: Vec<Option<Geometry>>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Reconstruction {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// How a chain was attached to the contour being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Join {
    Append,
    PrependReversed,
    Prepend,
    AppendReversed,
    Unmatched,
}

/// Attaches `coords` to `acc`, dropping the shared joint.
fn join(acc: &mut VecDeque<Point>, coords: &[Point]) -> Join {
    let (Some(first), Some(last)) = (coords.first(), coords.last()) else {
        return Join::Append;
    };
    let n = coords.len();

    if acc.is_empty() {
        acc.extend(coords.iter().copied());
        Join::Append
    } else if acc.back() == Some(first) {
        acc.extend(coords[1..].iter().copied());
        Join::Append
    } else if acc.front() == Some(first) {
        for &p in &coords[1..] {
            acc.push_front(p);
        }
        Join::PrependReversed
    } else if acc.front() == Some(last) {
        for &p in coords[..n - 1].iter().rev() {
            acc.push_front(p);
        }
        Join::Prepend
    } else {
        let matched = acc.back() == Some(last);
        acc.extend(coords[..n - 1].iter().rev().copied());
        if matched { Join::AppendReversed } else { Join::Unmatched }
    }
}

/// Rebuilds the geometry of every feature described by `layouts` from
/// `chains`.
///
/// With `strict`, an unmatched join aborts with
/// [`Error::TopologyInconsistency`]; otherwise it is recorded as a
/// [`Diagnostic`] and logged.
pub fn reconstruct(
    chains: &[Chain],
    layouts: &[Option<FeatureLayout>],
    strict: bool,
) -> Result<Reconstruction> {
    // (feature, contour) -> [(arc index, chain)]
    let mut contours: BTreeMap<(FeatureId, ContourId), Vec<(usize, usize)>> = BTreeMap::new();
    for (c, chain) in chains.iter().enumerate() {
        for owner in &chain.owners {
            contours
                .entry((owner.feature, owner.contour.clone()))
                .or_default()
                .push((owner.index, c));
        }
    }

    let mut diagnostics = Vec::new();
    let mut per_feature: BTreeMap<FeatureId, Vec<(ContourId, Vec<Point>)>> = BTreeMap::new();

    for ((feature, contour), mut entries) in contours {
        entries.sort_by_key(|&(index, _)| index);

        let mut acc = VecDeque::new();
        for &(_, c) in &entries {
            if join(&mut acc, &chains[c].points) == Join::Unmatched {
                if strict {
                    return Err(Error::TopologyInconsistency {
                        feature,
                        contour,
                        chain: c,
                    });
                }
                tracing::warn!(
                    feature = feature.0,
                    contour = %contour,
                    chain = c,
                    "chain shares no endpoint with its contour"
                );
                diagnostics.push(Diagnostic::TopologyInconsistency {
                    feature,
                    contour: contour.clone(),
                    chain: c,
                });
            }
        }

        let mut coords: Vec<Point> = acc.into();
        let closed = layouts
            .get(feature.0)
            .and_then(Option::as_ref)
            .is_some_and(|l| l.closed.contains(&contour));
        if closed {
            if let Some(&first) = coords.first() {
                if coords.last() != Some(&first) {
                    coords.push(first);
                }
            }
            if coords.len() < 4 {
                tracing::debug!(
                    feature = feature.0,
                    contour = %contour,
                    points = coords.len(),
                    "ring collapsed below a triangle"
                );
                diagnostics.push(Diagnostic::DegenerateRing {
                    feature,
                    contour: contour.clone(),
                    points: coords.len(),
                });
            }
        }

        per_feature.entry(feature).or_default().push((contour, coords));
    }

    let mut geometries: Vec<Option<Geometry>> = vec![None; layouts.len()];
    for (feature, contours) in per_feature {
        let Some(layout) = layouts.get(feature.0).and_then(Option::as_ref) else {
            continue;
        };
        let geometry = Geometry::from_contours(
            layout.kind,
            contours.into_iter().map(|(id, coords)| (id.0, coords)),
        )?;
        geometries[feature.0] = Some(geometry);
    }

    Ok(Reconstruction {
        geometries,
        diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use edgeweld_geometry::points;

    fn deque(coords: &[[f64; 2]]) -> VecDeque<Point> {
        points(coords).into()
    }

    #[test]
    fn join_appends_on_matching_tail() {
        let mut acc = deque(&[[0.0, 0.0], [1.0, 0.0]]);
        let how = join(&mut acc, &points(&[[1.0, 0.0], [1.0, 1.0]]));
        assert_eq!(how, Join::Append);
        assert_eq!(Vec::from(acc), points(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]]));
    }

    #[test]
    fn join_prepends_reversed_on_matching_heads() {
        let mut acc = deque(&[[0.0, 0.0], [1.0, 0.0]]);
        let how = join(&mut acc, &points(&[[0.0, 0.0], [0.0, 1.0], [0.0, 2.0]]));
        assert_eq!(how, Join::PrependReversed);
        assert_eq!(
            Vec::from(acc),
            points(&[[0.0, 2.0], [0.0, 1.0], [0.0, 0.0], [1.0, 0.0]])
        );
    }

    #[test]
    fn join_prepends_when_tail_meets_head() {
        let mut acc = deque(&[[0.0, 0.0], [1.0, 0.0]]);
        let how = join(&mut acc, &points(&[[0.0, 2.0], [0.0, 1.0], [0.0, 0.0]]));
        assert_eq!(how, Join::Prepend);
        assert_eq!(
            Vec::from(acc),
            points(&[[0.0, 2.0], [0.0, 1.0], [0.0, 0.0], [1.0, 0.0]])
        );
    }

    #[test]
    fn join_appends_reversed_when_tails_meet() {
        let mut acc = deque(&[[0.0, 0.0], [1.0, 0.0]]);
        let how = join(&mut acc, &points(&[[1.0, 2.0], [1.0, 1.0], [1.0, 0.0]]));
        assert_eq!(how, Join::AppendReversed);
        assert_eq!(
            Vec::from(acc),
            points(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [1.0, 2.0]])
        );
    }

    #[test]
    fn join_reports_unmatched() {
        let mut acc = deque(&[[0.0, 0.0], [1.0, 0.0]]);
        let how = join(&mut acc, &points(&[[5.0, 5.0], [6.0, 6.0]]));
        assert_eq!(how, Join::Unmatched);
        assert_eq!(acc.len(), 3);
    }
}
