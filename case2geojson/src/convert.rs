use anyhow::Result;
use geojson::{Feature, FeatureCollection, Geometry};

use crate::record::GeoRecord;

/// Builds one Feature per record, preserving input order. Properties carry
/// the six address fields; an unset field gets no key at all rather than an
/// explicit null, uniformly across the document. A Point geometry is attached
/// only when [`GeoRecord::point`] passes -- records without usable
/// coordinates keep their address data and serialize with a null geometry,
/// so no location is ever dropped outright.
pub fn feature_collection(records: Vec<GeoRecord>) -> FeatureCollection {
    let mut features = Vec::new();
    for record in records {
        // GeoJSON wants x before y
        let geometry = record
            .point()
            .map(|(lon, lat)| Geometry::new(geojson::Value::Point(vec![lon, lat])));

        let mut properties = serde_json::Map::new();
        for (key, value) in [
            ("addressType", &record.address_type),
            ("street", &record.street),
            ("locality", &record.locality),
            ("region", &record.region),
            ("postalCode", &record.postal_code),
            ("country", &record.country),
        ] {
            if let Some(value) = value {
                properties.insert(key.to_string(), value.clone().into());
            }
        }

        features.push(Feature {
            bbox: None,
            geometry,
            id: None,
            properties: Some(properties),
            foreign_members: None,
        });
    }

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Serializes the collection as indented JSON and overwrites `path`. A
/// missing or unwritable output directory surfaces as an error.
pub fn write_geojson(path: &str, collection: &FeatureCollection) -> Result<()> {
    let contents = serde_json::to_string_pretty(collection)?;
    fs_err::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nyc() -> GeoRecord {
        GeoRecord {
            latitude: Some("40.7128".to_string()),
            longitude: Some("-74.0060".to_string()),
            street: Some("5th Ave".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn feature_with_geometry_and_properties() {
        let collection = feature_collection(vec![nyc()]);
        assert_eq!(collection.features.len(), 1);

        let feature = &collection.features[0];
        let geometry = feature.geometry.as_ref().unwrap();
        assert_eq!(geometry.value, geojson::Value::Point(vec![-74.0060, 40.7128]));

        let properties = feature.properties.as_ref().unwrap();
        assert_eq!(properties["street"], "5th Ave");
        assert!(!properties.contains_key("country"));
        assert!(!properties.contains_key("latitude"));
    }

    #[test]
    fn zero_coordinates_keep_the_feature_but_not_the_geometry() {
        let record = GeoRecord {
            latitude: Some("0".to_string()),
            longitude: Some("0".to_string()),
            street: Some("Unknown".to_string()),
            ..Default::default()
        };
        let collection = feature_collection(vec![record]);
        assert_eq!(collection.features.len(), 1);
        assert!(collection.features[0].geometry.is_none());
        assert_eq!(
            collection.features[0].properties.as_ref().unwrap()["street"],
            "Unknown"
        );
    }

    #[test]
    fn address_only_records_get_a_null_geometry() {
        let record = GeoRecord {
            locality: Some("Seattle".to_string()),
            region: Some("WA".to_string()),
            ..Default::default()
        };
        let collection = feature_collection(vec![record]);
        assert_eq!(collection.features.len(), 1);
        assert!(collection.features[0].geometry.is_none());

        // The serialized form spells the missing geometry as an explicit null
        let json: serde_json::Value =
            serde_json::to_value(&collection.features[0]).unwrap();
        assert_eq!(json["geometry"], serde_json::Value::Null);
        assert_eq!(json["properties"]["locality"], "Seattle");
    }

    #[test]
    fn empty_input_serializes_to_an_empty_collection() {
        let collection = feature_collection(Vec::new());
        let json: serde_json::Value = serde_json::to_value(&collection).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "type": "FeatureCollection", "features": [] })
        );
    }

    #[test]
    fn input_order_is_preserved() {
        let records = ["a", "b", "c"]
            .iter()
            .map(|name| GeoRecord {
                street: Some(name.to_string()),
                ..Default::default()
            })
            .collect();
        let collection = feature_collection(records);
        let streets: Vec<&str> = collection
            .features
            .iter()
            .map(|f| f.properties.as_ref().unwrap()["street"].as_str().unwrap())
            .collect();
        assert_eq!(streets, vec!["a", "b", "c"]);
    }

    #[test]
    fn fully_unset_record_still_emits_a_feature() {
        let collection = feature_collection(vec![GeoRecord::default()]);
        assert_eq!(collection.features.len(), 1);
        assert!(collection.features[0].geometry.is_none());
        assert!(collection.features[0].properties.as_ref().unwrap().is_empty());
    }

    #[test]
    fn output_round_trips_through_the_geojson_parser() {
        let paris = GeoRecord {
            latitude: Some("48.860346".to_string()),
            longitude: Some("2.331199".to_string()),
            street: Some("38 Bad Guy Headquarters st.".to_string()),
            locality: Some("Paris".to_string()),
            postal_code: Some("F-75002".to_string()),
            country: Some("France".to_string()),
            ..Default::default()
        };
        let collection = feature_collection(vec![paris, nyc()]);

        let contents = serde_json::to_string_pretty(&collection).unwrap();
        let parsed = match contents.parse::<geojson::GeoJson>().unwrap() {
            geojson::GeoJson::FeatureCollection(fc) => fc,
            other => panic!("expected a FeatureCollection, got {:?}", other),
        };

        assert_eq!(parsed.features.len(), 2);
        let first = parsed.features[0].properties.as_ref().unwrap();
        assert_eq!(first["street"], "38 Bad Guy Headquarters st.");
        assert_eq!(first["locality"], "Paris");
        assert_eq!(first["postalCode"], "F-75002");
        assert_eq!(first["country"], "France");
        assert_eq!(
            parsed.features[0].geometry.as_ref().unwrap().value,
            geojson::Value::Point(vec![2.331199, 48.860346])
        );
        let second = parsed.features[1].properties.as_ref().unwrap();
        assert_eq!(second["street"], "5th Ave");
        assert!(!second.contains_key("locality"));
    }

    #[test]
    fn writes_and_rejects_missing_directories() {
        let collection = feature_collection(vec![nyc()]);

        let dir = std::env::temp_dir().join(format!("case2geojson-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("out.geojson");
        write_geojson(path.to_str().unwrap(), &collection).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.parse::<geojson::GeoJson>().is_ok());
        std::fs::remove_dir_all(&dir).unwrap();

        let missing = dir.join("nope").join("out.geojson");
        assert!(write_geojson(missing.to_str().unwrap(), &collection).is_err());
    }
}
