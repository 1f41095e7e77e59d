use super::geo::{Geometry, Location};
use super::items::Feature;
use rstar::{RTree, RTreeObject, AABB};
use std::iter::FromIterator;
use std::sync::OnceLock;

/// Layers with at least this many features are resolved through an R-tree.
pub const INDEX_THRESHOLD: usize = 256;

struct FeatureEnvelope {
    index: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for FeatureEnvelope {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// An ordered collection of features. Later features stack on top of
/// earlier ones: when several contain a point the last one wins.
#[derive(Default)]
pub struct Layer {
    features: Vec<Feature>,
    index: OnceLock<RTree<FeatureEnvelope>>,
}

impl Layer {
    pub fn new(features: Vec<Feature>) -> Self {
        Layer {
            features,
            index: OnceLock::new(),
        }
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Concatenate layers, keeping the stacking order of the inputs.
    pub fn merge(layers: impl IntoIterator<Item = Layer>) -> Layer {
        layers.into_iter().flat_map(|layer| layer.features).collect()
    }

    pub fn replace_geometry(&mut self, idx: usize, geometry: impl Into<Geometry>) {
        if let Some(feature) = self.features.get_mut(idx) {
            feature.replace_geometry(geometry);
            self.index = OnceLock::new();
        }
    }

    /// Top-most feature containing `loc`, with its position in the layer.
    pub fn resolve(&self, loc: &Location) -> Option<(usize, &Feature)> {
        if self.features.len() >= INDEX_THRESHOLD {
            self.resolve_indexed(loc)
        } else {
            self.resolve_linear(loc)
        }
    }

    fn resolve_linear(&self, loc: &Location) -> Option<(usize, &Feature)> {
        self.features
            .iter()
            .enumerate()
            .rev()
            .find(|(_, feature)| feature.contains(loc))
    }

    fn resolve_indexed(&self, loc: &Location) -> Option<(usize, &Feature)> {
        let tree = self.index.get_or_init(|| self.build_index());
        let point: [f64; 2] = (*loc).into();
        let mut candidates: Vec<usize> = tree
            .locate_in_envelope_intersecting(&AABB::from_point(point))
            .map(|entry| entry.index)
            .collect();
        candidates.sort_unstable_by(|a, b| b.cmp(a));
        candidates
            .into_iter()
            .map(|idx| (idx, &self.features[idx]))
            .find(|(_, feature)| feature.contains(loc))
    }

    fn build_index(&self) -> RTree<FeatureEnvelope> {
        let entries = self
            .features
            .iter()
            .enumerate()
            .filter_map(|(index, feature)| {
                let (sw, ne) = feature.bounds()?.sw_ne();
                let envelope = AABB::from_corners(sw, ne);
                Some(FeatureEnvelope { index, envelope })
            })
            .collect();
        RTree::bulk_load(entries)
    }
}

impl FromIterator<Feature> for Layer {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        Layer::new(iter.into_iter().collect())
    }
}
