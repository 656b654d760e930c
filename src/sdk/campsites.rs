use std::fs;
use std::path::Path;

use geojson::{GeoJson, Value};
use serde_json::Map;
use thiserror::Error;

use crate::sdk::geo::LngLat;

/// Fixed, ordered schema of campsite attributes shown in the popup.
/// Anything outside this list is silently dropped.
pub const POPUP_SCHEMA: [(&str, &str); 10] = [
    ("name", "Name"),
    ("operator", "Operator"),
    ("phone", "Phone"),
    ("tents", "Tents"),
    ("caravans", "Caravans"),
    ("drinking_water", "Drinking Water"),
    ("backcountry", "Backcountry"),
    ("fee", "Fee"),
    ("toilets", "Toilets"),
    ("shower", "Shower"),
];

const MISSING_NAME: &str = "No Name Available";

#[derive(Error, Debug)]
pub enum CampsiteError {
    #[error("Failed to read campsite data: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse campsite GeoJSON: {0}")]
    GeoJson(#[from] geojson::Error),

    #[error("Campsite data is not a FeatureCollection")]
    NotACollection,
}

/// One campsite point feature with whatever attributes the source carried.
#[derive(Debug, Clone)]
pub struct CampSite {
    pub coord: LngLat,
    pub properties: Map<String, serde_json::Value>,
}

impl CampSite {
    /// Popup body for this site, one line per schema attribute present.
    pub fn popup_html(&self) -> String {
        let mut out = String::new();
        for (key, label) in POPUP_SCHEMA {
            match self.properties.get(key) {
                Some(value) => {
                    out.push_str(&format!(
                        "<p><strong>{}:</strong> {}</p>",
                        label,
                        display_value(value)
                    ));
                }
                // Name is the only attribute with a placeholder
                None if key == "name" => {
                    out.push_str(&format!("<p><strong>{}:</strong> {}</p>", label, MISSING_NAME));
                }
                None => {}
            }
        }
        out
    }

    pub fn name(&self) -> Option<&str> {
        self.properties.get("name").and_then(|v| v.as_str())
    }
}

fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Loads the bundled campsite point collection. Non-point features are
/// skipped rather than treated as an error.
pub fn load_campsites<P: AsRef<Path>>(path: P) -> Result<Vec<CampSite>, CampsiteError> {
    let data = fs::read_to_string(path)?;
    parse_campsites(&data)
}

pub fn parse_campsites(data: &str) -> Result<Vec<CampSite>, CampsiteError> {
    let geojson: GeoJson = data.parse()?;
    let collection = match geojson {
        GeoJson::FeatureCollection(fc) => fc,
        _ => return Err(CampsiteError::NotACollection),
    };

    let mut sites = Vec::new();
    for feature in collection.features {
        let Some(geometry) = feature.geometry else {
            continue;
        };
        if let Value::Point(coords) = geometry.value {
            if coords.len() < 2 {
                continue;
            }
            sites.push(CampSite {
                coord: LngLat::new(coords[0], coords[1]),
                properties: feature.properties.unwrap_or_default(),
            });
        }
    }
    log::debug!("Loaded {} campsite point features", sites.len());
    Ok(sites)
}

/// Sites closest to `origin`, nearest first.
pub fn nearest<'a>(sites: &'a [CampSite], origin: &LngLat, limit: usize) -> Vec<&'a CampSite> {
    let mut indexed: Vec<&CampSite> = sites.iter().collect();
    indexed.sort_by(|a, b| {
        let da = origin.haversine_km(&a.coord);
        let db = origin.haversine_km(&b.coord);
        da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
    });
    indexed.truncate(limit);
    indexed
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {
                    "name": "Elk River Campground",
                    "operator": "State Parks",
                    "tents": "yes",
                    "website": "https://example.com"
                },
                "geometry": { "type": "Point", "coordinates": [-94.9, 36.9] }
            },
            {
                "type": "Feature",
                "properties": { "fee": "no" },
                "geometry": { "type": "Point", "coordinates": [-95.2, 37.1] }
            },
            {
                "type": "Feature",
                "properties": {},
                "geometry": {
                    "type": "LineString",
                    "coordinates": [[-95.0, 37.0], [-94.8, 36.8]]
                }
            }
        ]
    }"#;

    #[test]
    fn only_point_features_become_campsites() {
        let sites = parse_campsites(SAMPLE).unwrap();
        assert_eq!(sites.len(), 2);
        assert_eq!(sites[0].name(), Some("Elk River Campground"));
    }

    #[test]
    fn popup_follows_schema_order_and_drops_unknown_keys() {
        let sites = parse_campsites(SAMPLE).unwrap();
        let html = sites[0].popup_html();
        let name_at = html.find("Name:").unwrap();
        let operator_at = html.find("Operator:").unwrap();
        let tents_at = html.find("Tents:").unwrap();
        assert!(name_at < operator_at && operator_at < tents_at);
        // website is not in the schema
        assert!(!html.contains("website"));
        assert!(!html.contains("example.com"));
    }

    #[test]
    fn missing_name_gets_a_placeholder() {
        let sites = parse_campsites(SAMPLE).unwrap();
        let html = sites[1].popup_html();
        assert!(html.contains("No Name Available"));
        assert!(html.contains("<strong>Fee:</strong> no"));
        // absent attributes are skipped entirely
        assert!(!html.contains("Operator"));
    }

    #[test]
    fn nearest_sorts_by_distance() {
        let sites = parse_campsites(SAMPLE).unwrap();
        let origin = LngLat::new(-95.2, 37.1);
        let ranked = nearest(&sites, &origin, 2);
        assert_eq!(ranked[0].coord, LngLat::new(-95.2, 37.1));
    }

    #[test]
    fn non_collection_input_is_rejected() {
        let err = parse_campsites(r#"{"type": "Point", "coordinates": [0, 0]}"#).unwrap_err();
        assert!(matches!(err, CampsiteError::NotACollection));
    }
}
