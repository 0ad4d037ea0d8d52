//! CSV and GeoJSON serialization of the filtered result array.
//!
//! Both exporters operate on the post-pipeline view, never the raw store,
//! and carry the backend's export column set.

use serde_json::{Value, json};

use crate::state::Place;

/// What: Serialize places as CSV with the canonical export columns.
///
/// Inputs:
/// - `places`: The filtered result array.
///
/// Output:
/// - CSV text with header `id,name,city,state,country,lat,lon`; fields are
///   RFC 4180 quoted when they contain delimiters, quotes, or newlines.
///   Missing coordinates serialize as empty cells.
#[must_use]
pub fn places_to_csv(places: &[Place]) -> String {
    let mut out = String::from("id,name,city,state,country,lat,lon\n");
    for p in places {
        let row = [
            p.id.to_string(),
            csv_field(&p.name),
            csv_field(&p.city),
            csv_field(&p.state),
            csv_field(&p.country),
            p.lat.map(|v| v.to_string()).unwrap_or_default(),
            p.lon.map(|v| v.to_string()).unwrap_or_default(),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

/// Quote a CSV field when it needs quoting.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// What: Serialize places as a GeoJSON `FeatureCollection`.
///
/// Output:
/// - Point features in `[lon, lat]` order with the export columns as
///   properties; places without coordinates get a `null` geometry, matching
///   the backend's lenient export.
#[must_use]
pub fn places_to_geojson(places: &[Place]) -> Value {
    let features: Vec<Value> = places
        .iter()
        .map(|p| {
            let geometry = match (p.lon, p.lat) {
                (Some(lon), Some(lat)) => json!({
                    "type": "Point",
                    "coordinates": [lon, lat],
                }),
                _ => Value::Null,
            };
            json!({
                "type": "Feature",
                "properties": {
                    "id": p.id,
                    "name": p.name,
                    "city": p.city,
                    "state": p.state,
                    "country": p.country,
                    "lat": p.lat,
                    "lon": p.lon,
                },
                "geometry": geometry,
            })
        })
        .collect();
    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(id: i64, name: &str) -> Place {
        Place {
            id,
            name: name.to_string(),
            city: "Munich".into(),
            state: "Bavaria".into(),
            country: "Germany".into(),
            lat: Some(48.14),
            lon: Some(11.58),
            ..Default::default()
        }
    }

    #[test]
    /// What: CSV carries the export header and quotes delimiter-laden names
    ///
    /// - Input: One plain record and one with a comma in the name
    /// - Output: Header row plus two data rows, the second quoted
    fn csv_header_and_quoting() {
        let out = places_to_csv(&[place(1, "Augustiner"), place(2, "Bar, Grill & \"Co\"")]);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "id,name,city,state,country,lat,lon");
        assert_eq!(lines[1], "1,Augustiner,Munich,Bavaria,Germany,48.14,11.58");
        assert!(lines[2].starts_with("2,\"Bar, Grill & \"\"Co\"\"\","));
        assert_eq!(lines.len(), 3);
    }

    #[test]
    /// What: GeoJSON features use [lon, lat] point order
    ///
    /// - Input: One record with coordinates, one without
    /// - Output: Point geometry for the first, null geometry for the second
    fn geojson_point_order_and_null_geometry() {
        let mut bare = place(2, "Unlocated");
        bare.lat = None;
        bare.lon = None;
        let doc = places_to_geojson(&[place(1, "Augustiner"), bare]);
        assert_eq!(doc["type"], "FeatureCollection");
        assert_eq!(doc["features"][0]["geometry"]["coordinates"][0], 11.58);
        assert_eq!(doc["features"][0]["geometry"]["coordinates"][1], 48.14);
        assert!(doc["features"][1]["geometry"].is_null());
        assert_eq!(doc["features"][1]["properties"]["name"], "Unlocated");
    }
}
