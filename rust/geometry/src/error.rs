// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during geometry processing
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid geometry kind: {0}")]
    InvalidGeometryKind(String),

    #[error("Invalid coordinates for {kind}: {reason}")]
    InvalidCoordinates { kind: String, reason: String },

    #[error("Invalid simplification option: {0}")]
    InvalidOption(String),

    #[error("GeoJSON error: {0}")]
    GeoJson(#[source] geojson::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<geojson::Error> for Error {
    fn from(err: geojson::Error) -> Self {
        match err {
            geojson::Error::GeometryUnknownType(kind) => Error::InvalidGeometryKind(kind),
            geojson::Error::ExpectedArrayValue(_)
            | geojson::Error::ExpectedF64Value
            | geojson::Error::PositionTooShort(_) => Error::InvalidCoordinates {
                kind: "geometry".into(),
                reason: err.to_string(),
            },
            other => Error::GeoJson(other),
        }
    }
}
