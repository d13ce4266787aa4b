// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! GeoJSON reading and writing on top of the `geojson` crate.
//!
//! Parsing and serialization are left to `geojson`; this module only converts
//! between its untyped coordinate arrays and the tagged [`Geometry`]. Only the
//! six simple geometry types are supported. Positions are read as `[x, y]`;
//! any extra ordinate (elevation, measure) is dropped.

use ::geojson::feature::Id;
use ::geojson::{GeoJson, JsonObject, Position};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::geom::{Geometry, GeometryKind};
use crate::point::Point;

/// A GeoJSON feature whose geometry has been converted to [`Geometry`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Feature {
    pub id: Option<Id>,
    pub properties: JsonObject,
    pub geometry: Option<Geometry>,
    pub foreign_members: Option<JsonObject>,
}

impl Feature {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry: Some(geometry),
            ..Default::default()
        }
    }

    /// Sets a property, builder style.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

impl TryFrom<::geojson::Feature> for Feature {
    type Error = Error;

    fn try_from(feature: ::geojson::Feature) -> Result<Self> {
        let geometry = match &feature.geometry {
            Some(g) => Some(geometry_from_geojson(&g.value)?),
            None => None,
        };
        Ok(Self {
            id: feature.id,
            properties: feature.properties.unwrap_or_default(),
            geometry,
            foreign_members: feature.foreign_members,
        })
    }
}

impl From<&Feature> for ::geojson::Feature {
    fn from(feature: &Feature) -> Self {
        ::geojson::Feature {
            bbox: None,
            geometry: feature
                .geometry
                .as_ref()
                .map(|g| ::geojson::Geometry::new(geometry_to_geojson(g))),
            id: feature.id.clone(),
            properties: Some(feature.properties.clone()),
            foreign_members: feature.foreign_members.clone(),
        }
    }
}

/// An ordered list of features.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
    pub foreign_members: Option<JsonObject>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            features,
            foreign_members: None,
        }
    }

    /// Parses a `FeatureCollection`, a single `Feature`, or a bare geometry.
    pub fn from_json(input: &str) -> Result<Self> {
        Self::from_geojson(input.parse::<GeoJson>()?)
    }

    pub fn from_value(value: &Value) -> Result<Self> {
        Self::from_geojson(GeoJson::from_json_value(value.clone())?)
    }

    pub fn from_geojson(geojson: GeoJson) -> Result<Self> {
        match geojson {
            GeoJson::FeatureCollection(fc) => Ok(Self {
                features: fc
                    .features
                    .into_iter()
                    .map(Feature::try_from)
                    .collect::<Result<_>>()?,
                foreign_members: fc.foreign_members,
            }),
            GeoJson::Feature(feature) => Ok(Self::new(vec![Feature::try_from(feature)?])),
            GeoJson::Geometry(geometry) => Ok(Self::new(vec![Feature {
                geometry: Some(geometry_from_geojson(&geometry.value)?),
                ..Default::default()
            }])),
        }
    }

    pub fn to_geojson(&self) -> ::geojson::FeatureCollection {
        ::geojson::FeatureCollection {
            bbox: None,
            features: self.features.iter().map(::geojson::Feature::from).collect(),
            foreign_members: self.foreign_members.clone(),
        }
    }

    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self.to_geojson())?)
    }

    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let fc = self.to_geojson();
        Ok(if pretty {
            serde_json::to_string_pretty(&fc)?
        } else {
            serde_json::to_string(&fc)?
        })
    }
}

/// Reads a standalone geometry object; `null` yields `None`.
pub fn geometry_from_json(value: &Value) -> Result<Option<Geometry>> {
    if value.is_null() {
        return Ok(None);
    }
    let geometry = ::geojson::Geometry::from_json_value(value.clone())?;
    geometry_from_geojson(&geometry.value).map(Some)
}

/// Converts a parsed `geojson` value into a tagged geometry.
pub fn geometry_from_geojson(value: &::geojson::Value) -> Result<Geometry> {
    use ::geojson::Value as V;

    Ok(match value {
        V::Point(p) => Geometry::Point(read_position(GeometryKind::Point, p)?),
        V::MultiPoint(pts) => Geometry::MultiPoint(read_line(GeometryKind::MultiPoint, pts)?),
        V::LineString(line) => Geometry::LineString(read_line(GeometryKind::LineString, line)?),
        V::MultiLineString(lines) => {
            Geometry::MultiLineString(read_rings(GeometryKind::MultiLineString, lines)?)
        }
        V::Polygon(rings) => Geometry::Polygon(read_rings(GeometryKind::Polygon, rings)?),
        V::MultiPolygon(polygons) => Geometry::MultiPolygon(
            polygons
                .iter()
                .map(|rings| read_rings(GeometryKind::MultiPolygon, rings))
                .collect::<Result<_>>()?,
        ),
        V::GeometryCollection(_) => {
            return Err(Error::InvalidGeometryKind("GeometryCollection".into()))
        }
    })
}

pub fn geometry_to_geojson(geometry: &Geometry) -> ::geojson::Value {
    use ::geojson::Value as V;

    let line = |pts: &Vec<Point>| pts.iter().map(position).collect::<Vec<_>>();
    let rings = |rings: &Vec<Vec<Point>>| rings.iter().map(line).collect::<Vec<_>>();
    match geometry {
        Geometry::Point(p) => V::Point(position(p)),
        Geometry::MultiPoint(pts) => V::MultiPoint(line(pts)),
        Geometry::LineString(pts) => V::LineString(line(pts)),
        Geometry::MultiLineString(lines) => V::MultiLineString(rings(lines)),
        Geometry::Polygon(polygon) => V::Polygon(rings(polygon)),
        Geometry::MultiPolygon(polygons) => {
            V::MultiPolygon(polygons.iter().map(rings).collect())
        }
    }
}

fn position(p: &Point) -> Position {
    vec![p.x, p.y]
}

fn read_position(kind: GeometryKind, position: &Position) -> Result<Point> {
    match position.as_slice() {
        [x, y, ..] => Ok(Point::new(*x, *y)),
        _ => Err(Error::InvalidCoordinates {
            kind: kind.to_string(),
            reason: format!("position needs two numbers, found {}", position.len()),
        }),
    }
}

fn read_line(kind: GeometryKind, positions: &[Position]) -> Result<Vec<Point>> {
    positions.iter().map(|p| read_position(kind, p)).collect()
}

fn read_rings(kind: GeometryKind, lines: &[Vec<Position>]) -> Result<Vec<Vec<Point>>> {
    lines.iter().map(|l| read_line(kind, l)).collect()
}
