use super::dataset::{DatasetSnapshot, LayerKind};
use super::geo::Geometry;
use super::items::{Feature, Properties, PropertyValue};
use super::layer::Layer;
use super::rules::{RuleRow, RuleTable};
use geo_types::{Coordinate, LineString, MultiPolygon, Polygon};
use geojson::{GeoJson, Value};
use log::{info, warn};
use serde_json::Value as JsonValue;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid GeoJSON: {0}")]
    GeoJson(String),
    #[error("expected a FeatureCollection")]
    NotAFeatureCollection,
    #[error("invalid CSV: {0}")]
    Csv(#[from] csv::Error),
}

fn to_ring(positions: &[Vec<f64>]) -> LineString<f64> {
    positions
        .iter()
        .filter(|position| position.len() >= 2)
        .map(|position| Coordinate {
            x: position[0],
            y: position[1],
        })
        .collect::<Vec<_>>()
        .into()
}

fn to_polygon(rings: &[Vec<Vec<f64>>]) -> Polygon<f64> {
    let mut rings = rings.iter().map(|ring| to_ring(ring));
    let exterior = rings.next().unwrap_or_else(|| LineString(vec![]));
    Polygon::new(exterior, rings.collect())
}

fn to_geometry(value: &Value) -> Option<Geometry> {
    match value {
        Value::Polygon(rings) => Some(to_polygon(rings).into()),
        Value::MultiPolygon(polygons) => {
            let polygons = polygons.iter().map(|rings| to_polygon(rings)).collect();
            Some(MultiPolygon(polygons).into())
        }
        _ => None,
    }
}

fn to_property(value: &JsonValue) -> PropertyValue {
    match value {
        JsonValue::Null => PropertyValue::Null,
        JsonValue::String(text) => PropertyValue::Text(text.clone()),
        JsonValue::Number(n) => n.as_f64().map_or(PropertyValue::Null, PropertyValue::Number),
        other => PropertyValue::Text(other.to_string()),
    }
}

fn to_feature(feature: geojson::Feature) -> Option<Feature> {
    let geometry = match feature.geometry.as_ref().map(|g| to_geometry(&g.value)) {
        Some(Some(geometry)) => geometry,
        Some(None) => {
            warn!("skipping feature with non-areal geometry");
            return None;
        }
        None => {
            warn!("skipping feature without geometry");
            return None;
        }
    };
    let properties: Properties = feature
        .properties
        .unwrap_or_default()
        .iter()
        .map(|(key, value)| (key.clone(), to_property(value)))
        .collect();
    Some(Feature::new(geometry, properties))
}

/// Parse a GeoJSON FeatureCollection into a layer, keeping feature order.
/// Features that are not (Multi)Polygons are skipped.
pub fn parse_layer(text: &str) -> Result<Layer, LoadError> {
    let geojson: GeoJson = text
        .parse()
        .map_err(|e: geojson::Error| LoadError::GeoJson(e.to_string()))?;
    let collection = match geojson {
        GeoJson::FeatureCollection(collection) => collection,
        _ => return Err(LoadError::NotAFeatureCollection),
    };
    Ok(collection.features.into_iter().filter_map(to_feature).collect())
}

pub fn load_layer(path: impl AsRef<Path>) -> Result<Layer, LoadError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let layer = parse_layer(&text)?;
    info!("loaded {} features from {:?}", layer.len(), path);
    Ok(layer)
}

/// Read an activity table with a header row. Headers are trimmed and rows
/// without any content are dropped.
pub fn read_rules(reader: impl Read) -> Result<RuleTable, LoadError> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|header| header.trim().to_string())
        .collect();

    let mut rows = vec![];
    for record in rdr.records() {
        let record = record?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let cells = headers.iter().cloned().zip(record.iter().map(String::from));
        rows.push(RuleRow::from_cells(cells));
    }
    Ok(RuleTable::new(rows))
}

pub fn load_rules(path: impl AsRef<Path>) -> Result<RuleTable, LoadError> {
    let path = path.as_ref();
    let table = read_rules(File::open(path)?)?;
    info!("loaded {} activity rules from {:?}", table.rows().len(), path);
    Ok(table)
}

/// File locations of every source a snapshot is assembled from.
#[derive(Debug, Default, Clone)]
pub struct DataSources {
    pub city: Option<PathBuf>,
    pub boroughs: Option<PathBuf>,
    pub conservation: Option<PathBuf>,
    pub zoning: Option<PathBuf>,
    pub protected_areas: Option<PathBuf>,
    /// Merged into a single layer in this order.
    pub protected_area_zoning: Vec<PathBuf>,
    /// Checked in this order for points outside the city.
    pub neighbors: Vec<(String, PathBuf)>,
    pub rules: Option<PathBuf>,
}

fn layer_or_empty(path: &Path) -> Layer {
    load_layer(path).unwrap_or_else(|e| {
        warn!("could not load {:?}: {}", path, e);
        Layer::default()
    })
}

fn optional_layer(path: &Option<PathBuf>) -> Layer {
    path.as_deref().map(layer_or_empty).unwrap_or_default()
}

impl DataSources {
    /// Assemble a snapshot. A source that is not given or fails to load
    /// becomes an empty layer; a rule table that fails to load is left out
    /// so classifications report it as unavailable.
    pub fn load(&self) -> DatasetSnapshot {
        let internal = Layer::merge(self.protected_area_zoning.iter().map(|p| layer_or_empty(p)));
        let mut snapshot = DatasetSnapshot::new()
            .with_layer(LayerKind::CityBoundary, optional_layer(&self.city))
            .with_layer(LayerKind::Boroughs, optional_layer(&self.boroughs))
            .with_layer(LayerKind::ConservationSoil, optional_layer(&self.conservation))
            .with_layer(LayerKind::Zoning, optional_layer(&self.zoning))
            .with_layer(LayerKind::ProtectedAreas, optional_layer(&self.protected_areas))
            .with_layer(LayerKind::ProtectedAreaZoning, internal);
        for (name, path) in self.neighbors.iter() {
            snapshot = snapshot.with_neighbor(name, layer_or_empty(path));
        }
        match self.rules.as_deref().map(load_rules) {
            Some(Ok(rules)) => snapshot.with_rules(rules),
            Some(Err(e)) => {
                warn!("could not load activity rules: {}", e);
                snapshot
            }
            None => snapshot,
        }
    }
}
