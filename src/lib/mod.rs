//! Point classification against layered land-use zoning data.
//!
//! A [`DatasetSnapshot`](dataset::DatasetSnapshot) bundles the polygon layers
//! (city boundary, boroughs, conservation soil mask, ecological zoning,
//! protected areas and their internal zoning, neighboring jurisdictions)
//! and the activity rule table. [`classify`] resolves a coordinate against
//! it and returns one immutable [`Classification`].
//!
//! # Example
//!
//! ```
//! use zoning_resolver::dataset::{DatasetSnapshot, LayerKind};
//! use zoning_resolver::geo::Location;
//! use zoning_resolver::items::Feature;
//! use zoning_resolver::layer::Layer;
//! use zoning_resolver::{classify, Status};
//! use geo_types::{LineString, Polygon};
//!
//! let square = |w: f64, s: f64| {
//!     let ring: LineString<f64> = vec![(w, s), (w + 1., s), (w + 1., s + 1.), (w, s + 1.)].into();
//!     Feature::new(Polygon::new(ring, vec![]), Default::default())
//! };
//! let snapshot = DatasetSnapshot::new()
//!     .with_layer(LayerKind::CityBoundary, Layer::new(vec![square(-99.5, 19.)]))
//!     .with_layer(LayerKind::ConservationSoil, Layer::new(vec![square(-99.5, 19.)]));
//!
//! let result = classify(&snapshot, &Location::new(19.5, -99.));
//! assert_eq!(result.status, Status::ConservationSoil);
//! ```

pub mod analysis;
pub mod dataset;
pub mod geo;
pub mod items;
pub mod layer;
pub mod loader;
pub mod output;
pub mod rules;
pub mod zoning;

#[cfg(test)]
mod test_helpers;

pub use analysis::{classify, classify_all, Classification, Status};
