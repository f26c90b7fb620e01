use std::collections::BTreeMap;

use scene::LandGeometry;
use serde::Deserialize;
use serde_json::Value;

use crate::geojson::polygons_from_value;

/// Name of the collection holding the landmass boundary.
pub const DEFAULT_LAND_OBJECT: &str = "land";

#[derive(Debug)]
pub enum DatasetError {
    Json(serde_json::Error),
    /// Topology-encoded input has to be converted to GeoJSON before loading.
    TopologyUnsupported,
    MissingObject {
        name: String,
        available: Vec<String>,
    },
    InvalidGeometry {
        name: String,
        reason: String,
    },
    NoLand {
        name: String,
    },
    /// The dataset could not be fetched at all.
    Unavailable(String),
}

impl std::fmt::Display for DatasetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetError::Json(e) => write!(f, "dataset is not valid JSON: {e}"),
            DatasetError::TopologyUnsupported => {
                write!(f, "topology-encoded datasets are not supported; convert to GeoJSON")
            }
            DatasetError::MissingObject { name, available } => {
                write!(f, "dataset has no object named {name:?} (found: {available:?})")
            }
            DatasetError::InvalidGeometry { name, reason } => {
                write!(f, "invalid geometry in object {name:?}: {reason}")
            }
            DatasetError::NoLand { name } => {
                write!(f, "object {name:?} contains no polygon boundaries")
            }
            DatasetError::Unavailable(msg) => write!(f, "dataset unavailable: {msg}"),
        }
    }
}

impl std::error::Error for DatasetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DatasetError::Json(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawDataset {
    Wrapped { objects: BTreeMap<String, Value> },
    Flat(BTreeMap<String, Value>),
}

/// World map document: named GeoJSON collections, or a single bare GeoJSON
/// object that stands in for every name.
#[derive(Debug, Clone, PartialEq)]
pub enum WorldDataset {
    Named(BTreeMap<String, Value>),
    Bare(Value),
}

impl WorldDataset {
    pub fn from_json_str(payload: &str) -> Result<Self, DatasetError> {
        let value: Value = serde_json::from_str(payload).map_err(DatasetError::Json)?;
        Self::from_json_value(value)
    }

    pub fn from_json_value(value: Value) -> Result<Self, DatasetError> {
        match value.get("type").and_then(|v| v.as_str()) {
            Some("Topology") => return Err(DatasetError::TopologyUnsupported),
            Some(_) => return Ok(WorldDataset::Bare(value)),
            None => {}
        }
        let raw: RawDataset = serde_json::from_value(value).map_err(DatasetError::Json)?;
        Ok(match raw {
            RawDataset::Wrapped { objects } => WorldDataset::Named(objects),
            RawDataset::Flat(objects) => WorldDataset::Named(objects),
        })
    }

    pub fn object_names(&self) -> Vec<&str> {
        match self {
            WorldDataset::Named(objects) => objects.keys().map(String::as_str).collect(),
            WorldDataset::Bare(_) => Vec::new(),
        }
    }

    pub fn land(&self) -> Result<LandGeometry, DatasetError> {
        self.extract(DEFAULT_LAND_OBJECT)
    }

    /// Builds the land geometry from the named collection.
    pub fn extract(&self, name: &str) -> Result<LandGeometry, DatasetError> {
        let value = match self {
            WorldDataset::Bare(value) => value,
            WorldDataset::Named(objects) => {
                objects
                    .get(name)
                    .ok_or_else(|| DatasetError::MissingObject {
                        name: name.to_string(),
                        available: objects.keys().cloned().collect(),
                    })?
            }
        };
        let polygons = polygons_from_value(value).map_err(|reason| DatasetError::InvalidGeometry {
            name: name.to_string(),
            reason,
        })?;
        let land = LandGeometry::new(polygons);
        if land.is_empty() {
            return Err(DatasetError::NoLand {
                name: name.to_string(),
            });
        }
        Ok(land)
    }
}
