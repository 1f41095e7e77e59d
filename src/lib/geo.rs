use geo::prelude::*;
use geo_types::{Coordinate, LineString, MultiPolygon, Polygon, Rect};
use serde::Serialize;
use std::str::FromStr;
use thiserror::Error;

/// A WGS84 position in decimal degrees.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    pub fn new(lat: f64, lon: f64) -> Self {
        Location { lat, lon }
    }

    /// Finite and within [-90, 90] / [-180, 180].
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && self.lat.abs() <= 90.
            && self.lon.abs() <= 180.
    }
}

impl From<Location> for [f64; 2] {
    fn from(loc: Location) -> Self {
        [loc.lon, loc.lat]
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum ParseLocationError {
    #[error("expected `lat,lng`, `lat lng` or degrees-minutes-seconds, got {0:?}")]
    Format(String),
    #[error("{0:?} is not a number")]
    Number(String),
    #[error("coordinate out of range: lat {lat}, lng {lon}")]
    OutOfRange { lat: f64, lon: f64 },
}

/// Any of these switches parsing to degrees-minutes-seconds.
const DMS_MARKERS: &[char] = &[
    '°', '\'', '’', '"', 'N', 'n', 'S', 's', 'E', 'e', 'W', 'w',
];

fn parse_degrees(s: &str) -> Result<f64, ParseLocationError> {
    let value: f64 = s
        .parse()
        .map_err(|_| ParseLocationError::Number(s.into()))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ParseLocationError::Number(s.into()))
    }
}

fn parse_decimal(s: &str) -> Result<Location, ParseLocationError> {
    let parts: Vec<&str> = if s.contains(',') {
        s.split(',').map(str::trim).collect()
    } else {
        s.split_whitespace().collect()
    };
    if parts.len() != 2 {
        return Err(ParseLocationError::Format(s.into()));
    }
    Ok(Location {
        lat: parse_degrees(parts[0])?,
        lon: parse_degrees(parts[1])?,
    })
}

/// Two `D M S H` groups in any order, one per axis. The hemisphere letter
/// picks the axis; south and west are negative.
fn parse_dms(s: &str) -> Result<Location, ParseLocationError> {
    let format_error = || ParseLocationError::Format(s.into());
    let mut pending: Vec<f64> = vec![];
    let (mut lat, mut lon) = (None, None);

    let tokens = s
        .split(|c: char| c.is_whitespace() || "°'’\",".contains(c))
        .filter(|token| !token.is_empty());
    for token in tokens {
        let (number, hemisphere) = match token.char_indices().last() {
            Some((i, c)) if c.is_ascii_alphabetic() => (&token[..i], Some(c.to_ascii_uppercase())),
            _ => (token, None),
        };
        if !number.is_empty() {
            if !number.chars().all(|c| c.is_ascii_digit() || c == '.') {
                return Err(ParseLocationError::Number(number.into()));
            }
            pending.push(parse_degrees(number)?);
        }
        let hemisphere = match hemisphere {
            Some(hemisphere) => hemisphere,
            None => continue,
        };
        let degrees = match pending.as_slice() {
            [d, m, sec] => d + m / 60. + sec / 3600.,
            _ => return Err(format_error()),
        };
        pending.clear();
        match hemisphere {
            'N' => lat = Some(degrees),
            'S' => lat = Some(-degrees),
            'E' => lon = Some(degrees),
            'W' => lon = Some(-degrees),
            _ => return Err(format_error()),
        }
    }

    match (lat, lon) {
        (Some(lat), Some(lon)) if pending.is_empty() => Ok(Location { lat, lon }),
        _ => Err(format_error()),
    }
}

/// Parse a coordinate, latitude first
///
/// Decimal degrees as `19.3,-99.2` or `19.3 -99.2`, or degrees, minutes
/// and seconds with hemisphere letters such as `19°25'10"N 99°08'00"W`.
///
/// # Example
///
/// ```
/// use zoning_resolver::geo::Location;
///
/// let loc: Location = "19.3, -99.2".parse().unwrap();
/// assert_eq!(loc, Location::new(19.3, -99.2));
/// let loc: Location = "19°30'00\"N 99°15'00\"W".parse().unwrap();
/// assert_eq!(loc, Location::new(19.5, -99.25));
/// assert!("91,0".parse::<Location>().is_err());
/// ```
impl FromStr for Location {
    type Err = ParseLocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let location = if s.contains(DMS_MARKERS) {
            parse_dms(s)?
        } else {
            parse_decimal(s)?
        };
        if !location.is_valid() {
            return Err(ParseLocationError::OutOfRange {
                lat: location.lat,
                lon: location.lon,
            });
        }
        Ok(location)
    }
}

/// Axis-aligned bounding box in degrees, bounds inclusive.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub e: f64,
    pub n: f64,
    pub s: f64,
    pub w: f64,
}

impl Bounds {
    pub fn contains(&self, loc: &Location) -> bool {
        loc.lon >= self.w && loc.lon <= self.e && loc.lat >= self.s && loc.lat <= self.n
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            e: self.e.max(other.e),
            n: self.n.max(other.n),
            s: self.s.min(other.s),
            w: self.w.min(other.w),
        }
    }

    pub fn sw_ne(&self) -> ([f64; 2], [f64; 2]) {
        ([self.w, self.s], [self.e, self.n])
    }
}

impl From<Rect<f64>> for Bounds {
    fn from(rect: Rect<f64>) -> Self {
        Bounds {
            e: rect.max().x,
            n: rect.max().y,
            s: rect.min().y,
            w: rect.min().x,
        }
    }
}

/// Areal geometry of a feature. Coordinates are (lng, lat).
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Polygon(Polygon<f64>),
    MultiPolygon(MultiPolygon<f64>),
}

impl From<Polygon<f64>> for Geometry {
    fn from(polygon: Polygon<f64>) -> Self {
        Geometry::Polygon(polygon)
    }
}

impl From<MultiPolygon<f64>> for Geometry {
    fn from(multi_polygon: MultiPolygon<f64>) -> Self {
        Geometry::MultiPolygon(multi_polygon)
    }
}

/// Even-odd membership test. Orientation of rings does not matter and
/// rings may be open or closed.
pub trait Containment {
    fn contains_location(&self, loc: &Location) -> bool;
}

fn vertex_count(coords: &[Coordinate<f64>]) -> usize {
    match (coords.first(), coords.last()) {
        (Some(first), Some(last)) if coords.len() > 1 && first == last => coords.len() - 1,
        _ => coords.len(),
    }
}

impl Containment for LineString<f64> {
    fn contains_location(&self, loc: &Location) -> bool {
        let coords = &self.0;
        if vertex_count(coords) < 3 {
            return false;
        }
        let (x, y) = (loc.lon, loc.lat);
        let mut inside = false;
        let mut j = coords.len() - 1;
        for i in 0..coords.len() {
            let (xi, yi) = (coords[i].x, coords[i].y);
            let (xj, yj) = (coords[j].x, coords[j].y);
            j = i;

            // horizontal and zero-length edges never toggle parity
            let denom = yj - yi;
            if denom == 0. {
                continue;
            }
            if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / denom + xi {
                inside = !inside;
            }
        }
        inside
    }
}

impl Containment for Polygon<f64> {
    fn contains_location(&self, loc: &Location) -> bool {
        self.exterior().contains_location(loc)
            && !self.interiors().iter().any(|hole| hole.contains_location(loc))
    }
}

impl Containment for MultiPolygon<f64> {
    fn contains_location(&self, loc: &Location) -> bool {
        self.0.iter().any(|polygon| polygon.contains_location(loc))
    }
}

impl Containment for Geometry {
    fn contains_location(&self, loc: &Location) -> bool {
        match self {
            Geometry::Polygon(p) => p.contains_location(loc),
            Geometry::MultiPolygon(mp) => mp.contains_location(loc),
        }
    }
}

/// Bounding box of the outer rings only; holes never extend it.
pub trait OuterBounds {
    fn outer_bounds(&self) -> Option<Bounds>;
}

impl OuterBounds for Polygon<f64> {
    fn outer_bounds(&self) -> Option<Bounds> {
        let rect = self.exterior().bounding_rect()?;
        Some(rect.into())
    }
}

impl OuterBounds for MultiPolygon<f64> {
    fn outer_bounds(&self) -> Option<Bounds> {
        self.0
            .iter()
            .filter_map(OuterBounds::outer_bounds)
            .fold(None, |acc: Option<Bounds>, bounds| match acc {
                Some(acc) => Some(acc.union(&bounds)),
                None => Some(bounds),
            })
    }
}

impl OuterBounds for Geometry {
    fn outer_bounds(&self) -> Option<Bounds> {
        match self {
            Geometry::Polygon(p) => p.outer_bounds(),
            Geometry::MultiPolygon(mp) => mp.outer_bounds(),
        }
    }
}
