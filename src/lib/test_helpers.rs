use super::dataset::{DatasetSnapshot, LayerKind};
use super::items::{Feature, Properties, PropertyValue};
use super::layer::Layer;
use super::rules::{RuleRow, RuleTable};
use geo_types::{LineString, Polygon};

/// An open ring from (lng, lat) pairs.
pub fn ring(coordinates: &[(f64, f64)]) -> LineString<f64> {
    coordinates.to_vec().into()
}

/// Axis-aligned rectangle, latitude first: south, west, north, east.
pub fn rectangle(s: f64, w: f64, n: f64, e: f64) -> Polygon<f64> {
    let exterior = ring(&[(w, s), (e, s), (e, n), (w, n)]);
    Polygon::new(exterior, vec![])
}

pub fn props(entries: &[(&str, PropertyValue)]) -> Properties {
    entries
        .iter()
        .map(|(key, value)| ((*key).to_string(), value.clone()))
        .collect()
}

pub fn square_feature(s: f64, w: f64, size: f64, properties: Properties) -> Feature {
    Feature::new(rectangle(s, w, s + size, w + size), properties)
}

fn rect_feature(s: f64, w: f64, n: f64, e: f64, entries: &[(&str, PropertyValue)]) -> Feature {
    Feature::new(rectangle(s, w, n, e), props(entries))
}

/// Overlapping cells: each one is 1.5 times the grid step wide.
pub fn grid_layer(rows: usize, cols: usize, step: f64) -> Layer {
    (0..rows)
        .flat_map(|r| (0..cols).map(move |c| (r, c)))
        .map(|(r, c)| {
            let name = format!("{}-{}", r, c);
            let properties = props(&[("NOMBRE", name.into())]);
            square_feature(r as f64 * step, c as f64 * step, step * 1.5, properties)
        })
        .collect()
}

pub fn rule_table(headers: &[&str], rows: &[&[&str]]) -> RuleTable {
    let rows = rows
        .iter()
        .map(|cells| RuleRow::from_cells(headers.iter().cloned().zip(cells.iter().cloned())))
        .collect();
    RuleTable::new(rows)
}

pub fn fixture_rules() -> RuleTable {
    rule_table(
        &["Sector", "Actividad general", "Actividad específica", "FC", "AE", "PR"],
        &[
            &["Agrícola", "Agricultura", "Cultivo anual", "P", "A", "A"],
            &["Forestal", "Aprovechamiento forestal", "Reforestación", "A", "A", "A"],
            &["Turismo", "Ecoturismo", "Senderismo", "A", "P", ""],
            &["Vivienda", "Construcción", "Vivienda unifamiliar", "P", "P", "A"],
        ],
    )
}

/// A miniature city: conservation soil in the south half, urban soil in
/// the north, two neighbors west and south.
pub fn fixture_layers() -> DatasetSnapshot {
    let city = Layer::new(vec![rect_feature(19., -99.4, 19.6, -98.9, &[])]);
    let edomex = Layer::new(vec![rect_feature(19., -99.9, 19.6, -99.4, &[])]);
    let morelos = Layer::new(vec![rect_feature(18.5, -99.4, 19., -98.9, &[])]);
    let boroughs = Layer::new(vec![
        rect_feature(19., -99.4, 19.3, -99.15, &[("NOMBRE", "Tlalpan".into())]),
        rect_feature(19., -99.15, 19.3, -98.9, &[("NOMBRE", "Milpa Alta".into())]),
    ]);
    let conservation = Layer::new(vec![rect_feature(19., -99.4, 19.3, -98.9, &[])]);
    let zoning = Layer::new(vec![
        rect_feature(
            19.,
            -99.4,
            19.1,
            -99.3,
            &[("CLAVE", "FC".into()), ("PGOEDF", "Forestal de Conservación".into())],
        ),
        rect_feature(
            19.,
            -99.3,
            19.1,
            -99.2,
            &[
                ("CLAVE", "PDU".into()),
                ("PGOEDF", "Programa Parcial de Desarrollo Urbano".into()),
            ],
        ),
        rect_feature(
            19.1,
            -99.4,
            19.2,
            -99.3,
            &[("CLAVE", "re".into()), ("PGOEDF", "Restauración Ecológica".into())],
        ),
        rect_feature(
            19.1,
            -99.3,
            19.2,
            -99.2,
            &[("CLAVE", "PROGRAMAS".into()), ("PGOEDF", "Programa Delegacional".into())],
        ),
        rect_feature(
            19.2,
            -99.4,
            19.3,
            -99.3,
            &[("CLAVE", "PR".into()), ("PGOEDF", "PDU Poblado Rural".into())],
        ),
        rect_feature(19.4, -99.4, 19.5, -99.3, &[("CLAVE", "FC".into())]),
    ]);
    let protected_areas = Layer::new(vec![
        rect_feature(
            19.2,
            -99.,
            19.3,
            -98.9,
            &[
                ("ANP_ID", "ANP-07".into()),
                ("NOMBRE", "Parque Ecológico de la Ciudad".into()),
                ("CATEGORIA_PROTECCION", "Zona Sujeta a Conservación Ecológica".into()),
                ("TIPO_DECRETO", "Decreto".into()),
                ("FECHA_DECRETO", "1989-06-28".into()),
                ("SUP_DECRETADA", 727.61.into()),
            ],
        ),
        rect_feature(
            19.5,
            -99.,
            19.6,
            -98.9,
            &[("NOMBRE", "Cerro de la Estrella".into())],
        ),
    ]);
    let internal = Layer::new(vec![
        rect_feature(
            19.2,
            -99.,
            19.3,
            -98.95,
            &[("ZONIFICACION", "Uso Público".into())],
        ),
        rect_feature(
            19.5,
            -99.,
            19.6,
            -98.9,
            &[("ZONIFICACION", "Núcleo".into())],
        ),
    ]);

    DatasetSnapshot::new()
        .with_layer(LayerKind::CityBoundary, city)
        .with_layer(LayerKind::Boroughs, boroughs)
        .with_layer(LayerKind::ConservationSoil, conservation)
        .with_layer(LayerKind::Zoning, zoning)
        .with_layer(LayerKind::ProtectedAreas, protected_areas)
        .with_layer(LayerKind::ProtectedAreaZoning, internal)
        .with_neighbor("Estado de México", edomex)
        .with_neighbor("Morelos", morelos)
}
