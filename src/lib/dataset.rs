use super::layer::Layer;
use super::rules::RuleTable;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Property names carried by the source layers.
pub mod keys {
    pub const BOROUGH_NAME: &str = "NOMBRE";
    pub const ZONING_CODE: &str = "CLAVE";
    pub const ZONING_DESCRIPTION: &str = "PGOEDF";
    pub const ANP_ID: &str = "ANP_ID";
    pub const ANP_NAME: &str = "NOMBRE";
    pub const ANP_CATEGORY: &str = "CATEGORIA_PROTECCION";
    pub const ANP_DECREE_TYPE: &str = "TIPO_DECRETO";
    pub const ANP_DECREE_DATE: &str = "FECHA_DECRETO";
    pub const ANP_DECREED_SURFACE: &str = "SUP_DECRETADA";
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    CityBoundary,
    Boroughs,
    ConservationSoil,
    Zoning,
    ProtectedAreas,
    ProtectedAreaZoning,
}

/// A bordering jurisdiction, reported by name for points outside the city.
pub struct Jurisdiction {
    pub name: String,
    pub layer: Layer,
}

/// Everything a classification reads. Assembled once, never mutated by
/// the engine, shareable across threads.
#[derive(Default)]
pub struct DatasetSnapshot {
    layers: BTreeMap<LayerKind, Layer>,
    neighbors: Vec<Jurisdiction>,
    rules: Option<RuleTable>,
}

impl DatasetSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layer(mut self, kind: LayerKind, layer: Layer) -> Self {
        self.layers.insert(kind, layer);
        self
    }

    /// Neighbors are checked in the order they were added.
    pub fn with_neighbor(mut self, name: &str, layer: Layer) -> Self {
        self.neighbors.push(Jurisdiction {
            name: name.into(),
            layer,
        });
        self
    }

    pub fn with_rules(mut self, rules: RuleTable) -> Self {
        self.rules = Some(rules);
        self
    }

    pub fn layer(&self, kind: LayerKind) -> Option<&Layer> {
        self.layers.get(&kind)
    }

    /// The layer, or `None` when it is missing or has no features.
    pub fn populated_layer(&self, kind: LayerKind) -> Option<&Layer> {
        self.layer(kind).filter(|layer| !layer.is_empty())
    }

    pub fn neighbors(&self) -> &[Jurisdiction] {
        &self.neighbors
    }

    pub fn rules(&self) -> Option<&RuleTable> {
        self.rules.as_ref()
    }
}
