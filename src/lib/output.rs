use super::analysis::Classification;
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, Value};
use serde_json::{to_string, to_value, Value as JsonValue};
use std::error::Error;
use std::io::Write;

pub trait Output {
    fn write_geojson(&self, writer: &mut dyn Write) -> Result<(), Box<dyn Error>>;
    fn write_json_lines(&self, writer: &mut dyn Write) -> Result<(), Box<dyn Error>>;
}

impl Output for Vec<Classification> {
    fn write_json_lines(&self, writer: &mut dyn Write) -> Result<(), Box<dyn Error>> {
        for classification in self.iter() {
            let json = to_string(classification)?;
            writeln!(writer, "{}", json)?;
        }
        Ok(())
    }

    fn write_geojson(&self, writer: &mut dyn Write) -> Result<(), Box<dyn Error>> {
        let features = self
            .iter()
            .map(|classification| -> Result<Feature, serde_json::Error> {
                let loc = classification.location;
                let geometry = Geometry::new(Value::Point(vec![loc.lon, loc.lat]));
                let properties = match to_value(classification)? {
                    JsonValue::Object(map) => Some(map),
                    _ => None,
                };
                Ok(Feature {
                    bbox: None,
                    geometry: Some(geometry),
                    id: None,
                    properties,
                    foreign_members: None,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let feature_collection = GeoJson::FeatureCollection(FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        });
        writeln!(writer, "{}", feature_collection.to_string())?;
        Ok(())
    }
}
