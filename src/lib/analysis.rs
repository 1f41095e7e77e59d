use super::dataset::{keys, DatasetSnapshot, LayerKind};
use super::geo::Location;
use super::items::{Feature, Properties, PropertyLookup, PropertyValue};
use super::rules::{Activity, CatalogUnavailable, RuleTable};
use super::zoning::{self, ZoningCode};
use log::{debug, warn};
use rayon::prelude::*;
use serde::Serialize;

/// Borough label used when no borough polygon matches.
pub const CITY_LABEL: &str = "CDMX";

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    OutsideCity,
    NoData,
    UrbanSoil,
    ConservationSoil,
}

/// Decree metadata of a natural protected area. Missing values are
/// `PropertyValue::Null` and render as a placeholder.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ProtectedArea {
    pub id: Option<String>,
    pub name: PropertyValue,
    pub category: PropertyValue,
    pub decree_type: PropertyValue,
    pub decree_date: PropertyValue,
    pub decreed_surface: PropertyValue,
    pub properties: Properties,
}

impl From<&Feature> for ProtectedArea {
    fn from(feature: &Feature) -> Self {
        let p = &feature.properties;
        ProtectedArea {
            id: p.text(keys::ANP_ID).filter(|id| !id.trim().is_empty()),
            name: p.value(keys::ANP_NAME),
            category: p.value(keys::ANP_CATEGORY),
            decree_type: p.value(keys::ANP_DECREE_TYPE),
            decree_date: p.value(keys::ANP_DECREE_DATE),
            decreed_surface: p.value(keys::ANP_DECREED_SURFACE),
            properties: p.clone(),
        }
    }
}

/// Owned reference to a feature of the snapshot.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct FeatureRef {
    pub layer: LayerKind,
    pub index: usize,
    pub properties: Properties,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Classification {
    pub location: Location,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
    pub borough: Option<String>,
    pub is_restricted: bool,
    pub is_protected_area: bool,
    pub protected_area: Option<ProtectedArea>,
    pub zoning_code: Option<ZoningCode>,
    pub zoning_display_name: Option<String>,
    pub catalog_ineligible: bool,
    pub is_pdu: bool,
    pub has_internal_protected_area_zoning: bool,
    pub internal_zoning: Option<FeatureRef>,
    pub allowed_activities: Vec<Activity>,
    pub prohibited_activities: Vec<Activity>,
    pub catalog_unavailable_reason: Option<CatalogUnavailable>,
    pub outside_country_context: Option<String>,
}

impl Classification {
    fn new(location: Location) -> Self {
        Classification {
            location,
            status: Status::NoData,
            diagnostic: None,
            borough: None,
            is_restricted: false,
            is_protected_area: false,
            protected_area: None,
            zoning_code: None,
            zoning_display_name: None,
            catalog_ineligible: false,
            is_pdu: false,
            has_internal_protected_area_zoning: false,
            internal_zoning: None,
            allowed_activities: vec![],
            prohibited_activities: vec![],
            catalog_unavailable_reason: None,
            outside_country_context: None,
        }
    }

    fn no_data(mut self, diagnostic: &str) -> Self {
        warn!("{:?}: {}", self.location, diagnostic);
        self.status = Status::NoData;
        self.diagnostic = Some(diagnostic.into());
        self
    }

    fn code(&self) -> Option<&str> {
        self.zoning_code.as_deref()
    }

    pub fn is_conservation_soil(&self) -> bool {
        self.status == Status::ConservationSoil
    }

    pub fn is_urban_soil(&self) -> bool {
        self.status == Status::UrbanSoil
    }

    pub fn is_outside_city(&self) -> bool {
        self.status == Status::OutsideCity
    }

    /// Either inside a protected-area polygon or carrying the ANP pseudo-code.
    pub fn is_protected_area_any(&self) -> bool {
        self.is_protected_area || self.code() == Some(zoning::PROTECTED_AREA)
    }

    pub fn has_zoning_data(&self) -> bool {
        match self.code() {
            Some(code) => code != zoning::NO_DATA,
            None => false,
        }
    }

    pub fn has_specific_pdu(&self) -> bool {
        self.code()
            .map_or(false, |code| code.starts_with(zoning::URBAN_PROGRAM_PREFIX))
    }

    pub fn shows_normative_instrument(&self) -> bool {
        self.is_conservation_soil() || self.is_urban_soil()
    }

    pub fn shows_activities_catalog(&self) -> bool {
        self.is_conservation_soil() && !self.is_pdu && !self.catalog_ineligible
    }

    pub fn shows_zoning_result(&self) -> bool {
        self.is_conservation_soil()
            && self.code() != Some(zoning::PROTECTED_AREA)
            && self.has_zoning_data()
    }

    pub fn zoning_label(&self) -> &str {
        match self.code() {
            Some(zoning::PROTECTED_AREA) => zoning::PROTECTED_AREA_LABEL,
            Some(zoning::NO_DATA) => zoning::NO_DATA_LABEL,
            _ => self
                .zoning_display_name
                .as_deref()
                .unwrap_or(zoning::UNKNOWN_LABEL),
        }
    }
}

fn outside_context(snapshot: &DatasetSnapshot, loc: &Location) -> Option<String> {
    snapshot
        .neighbors()
        .iter()
        .find(|jurisdiction| jurisdiction.layer.resolve(loc).is_some())
        .map(|jurisdiction| jurisdiction.name.clone())
}

fn borough_name(snapshot: &DatasetSnapshot, loc: &Location) -> String {
    snapshot
        .layer(LayerKind::Boroughs)
        .and_then(|layer| layer.resolve(loc))
        .and_then(|(_, feature)| feature.properties.text(keys::BOROUGH_NAME))
        .unwrap_or_else(|| CITY_LABEL.into())
}

fn detect_protected_area(snapshot: &DatasetSnapshot, loc: &Location, r: &mut Classification) {
    let layer = match snapshot.populated_layer(LayerKind::ProtectedAreas) {
        Some(layer) => layer,
        None => return,
    };
    if let Some((_, feature)) = layer.resolve(loc) {
        let area = ProtectedArea::from(feature);
        debug!("{:?}: protected area {}", loc, area.name);
        r.is_protected_area = true;
        r.protected_area = Some(area);
    }
}

fn assign_pseudo_code(r: &mut Classification, code: &str, label: &str) {
    r.zoning_code = Some(code.into());
    r.zoning_display_name = Some(label.into());
}

fn resolve_zoning(snapshot: &DatasetSnapshot, loc: &Location, r: &mut Classification) {
    let zone = snapshot
        .populated_layer(LayerKind::Zoning)
        .and_then(|layer| layer.resolve(loc));

    match zone {
        Some((_, feature)) => {
            let raw_code = feature.properties.text(keys::ZONING_CODE).unwrap_or_default();
            let description = feature
                .properties
                .text(keys::ZONING_DESCRIPTION)
                .filter(|d| !d.trim().is_empty());
            let resolved = zoning::resolve(&raw_code, description.as_deref().unwrap_or(""));
            if resolved.urban_program {
                r.catalog_ineligible = true;
            }
            let code = Some(resolved.code).filter(|code| !code.is_empty());
            r.zoning_display_name = description.or_else(|| code.as_ref().map(|c| c.to_string()));
            r.zoning_code = code;
        }
        None if r.is_protected_area => {
            assign_pseudo_code(r, zoning::PROTECTED_AREA, zoning::PROTECTED_AREA_LABEL)
        }
        None if r.is_conservation_soil() => {
            assign_pseudo_code(r, zoning::NO_DATA, zoning::NO_DATA_LABEL)
        }
        None => r.zoning_display_name = Some(zoning::URBAN_SOIL_LABEL.into()),
    }

    // urban soil is governed by development programs, never by the table
    if r.is_urban_soil() {
        r.catalog_ineligible = true;
    }
    debug!("{:?}: zoning {:?}", loc, r.zoning_code);
}

fn attach_catalog(rules: Option<&RuleTable>, r: &mut Classification) {
    let code = match &r.zoning_code {
        Some(code) => code.clone(),
        None => return,
    };
    let rules = match rules {
        Some(rules) if rules.is_empty() => Err(CatalogUnavailable::RuleTableEmpty),
        Some(rules) => Ok(rules),
        None => Err(CatalogUnavailable::RuleTableMissing),
    };
    let rules = match rules {
        Ok(rules) => rules,
        Err(reason) => {
            r.catalog_unavailable_reason = Some(reason);
            r.catalog_ineligible = true;
            return;
        }
    };

    r.is_pdu = r
        .zoning_display_name
        .as_deref()
        .map_or(false, zoning::is_pdu_name);
    if zoning::is_pseudo_code(&code) || r.is_pdu || r.catalog_ineligible {
        r.catalog_ineligible = true;
        return;
    }

    match rules.catalog(&code) {
        Ok(catalog) => {
            r.allowed_activities = catalog.allowed;
            r.prohibited_activities = catalog.prohibited;
        }
        Err(reason) => {
            warn!("{:?}: {}", r.location, reason);
            r.catalog_unavailable_reason = Some(reason);
            r.catalog_ineligible = true;
        }
    }
}

fn attach_internal_zoning(snapshot: &DatasetSnapshot, loc: &Location, r: &mut Classification) {
    let has_id = r.protected_area.as_ref().map_or(false, |area| area.id.is_some());
    if !r.is_protected_area || !has_id {
        return;
    }
    let layer = match snapshot.populated_layer(LayerKind::ProtectedAreaZoning) {
        Some(layer) => layer,
        None => return,
    };
    if let Some((index, feature)) = layer.resolve(loc) {
        r.has_internal_protected_area_zoning = true;
        r.internal_zoning = Some(FeatureRef {
            layer: LayerKind::ProtectedAreaZoning,
            index,
            properties: feature.properties.clone(),
        });
    }
}

/// Classify a single location against the snapshot
///
/// Layers are consulted in a fixed order: city boundary, boroughs,
/// conservation soil, protected areas, zoning, then the internal zoning of
/// protected areas. Missing data never fails the call; it degrades the
/// result instead (`Status::NoData`, pseudo-codes or an unavailable catalog).
pub fn classify(snapshot: &DatasetSnapshot, loc: &Location) -> Classification {
    let mut r = Classification::new(*loc);
    if !loc.is_valid() {
        return r.no_data("invalid coordinate");
    }

    let city = match snapshot.populated_layer(LayerKind::CityBoundary) {
        Some(layer) => layer,
        None => return r.no_data("city boundary layer missing or empty"),
    };
    if city.resolve(loc).is_none() {
        r.status = Status::OutsideCity;
        r.outside_country_context = outside_context(snapshot, loc);
        debug!("{:?}: outside city ({:?})", loc, r.outside_country_context);
        return r;
    }

    r.borough = Some(borough_name(snapshot, loc));

    let conservation = match snapshot.populated_layer(LayerKind::ConservationSoil) {
        Some(layer) => layer,
        None => return r.no_data("conservation soil layer missing or empty"),
    };
    if conservation.resolve(loc).is_some() {
        r.status = Status::ConservationSoil;
        r.is_restricted = true;
    } else {
        r.status = Status::UrbanSoil;
    }
    debug!("{:?}: {:?} in {:?}", loc, r.status, r.borough);

    detect_protected_area(snapshot, loc, &mut r);
    resolve_zoning(snapshot, loc, &mut r);
    attach_catalog(snapshot.rules(), &mut r);
    attach_internal_zoning(snapshot, loc, &mut r);
    r
}

/// Classify many locations in parallel over one shared snapshot.
pub fn classify_all(snapshot: &DatasetSnapshot, locations: &[Location]) -> Vec<Classification> {
    locations
        .par_iter()
        .map(|loc| classify(snapshot, loc))
        .collect()
}
