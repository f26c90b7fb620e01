use foundation::math::LonLat;
use scene::{Polygon, Ring};
use serde_json::Value;

/// Collects every polygonal boundary from a GeoJSON object.
///
/// Accepts `FeatureCollection`, `Feature`, `GeometryCollection`, `Polygon` and
/// `MultiPolygon`. Points and lines carry no area and are skipped; features
/// with a `null` geometry are skipped as well.
pub fn polygons_from_value(value: &Value) -> Result<Vec<Polygon>, String> {
    let mut out = Vec::new();
    collect_polygons(value, &mut out)?;
    Ok(out)
}

fn collect_polygons(value: &Value, out: &mut Vec<Polygon>) -> Result<(), String> {
    let obj = value
        .as_object()
        .ok_or("GeoJSON object must be an object".to_string())?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or("GeoJSON object missing type".to_string())?;

    match ty {
        "FeatureCollection" => {
            let features = obj
                .get("features")
                .and_then(|v| v.as_array())
                .ok_or("FeatureCollection missing features".to_string())?;
            for (index, feature) in features.iter().enumerate() {
                collect_polygons(feature, out)
                    .map_err(|reason| format!("feature {index}: {reason}"))?;
            }
            Ok(())
        }
        "Feature" => match obj.get("geometry") {
            None | Some(Value::Null) => Ok(()),
            Some(geometry) => collect_polygons(geometry, out),
        },
        "GeometryCollection" => {
            let geometries = obj
                .get("geometries")
                .and_then(|v| v.as_array())
                .ok_or("GeometryCollection missing geometries".to_string())?;
            for geometry in geometries {
                collect_polygons(geometry, out)?;
            }
            Ok(())
        }
        "Polygon" => {
            out.push(parse_polygon(coordinates(obj)?)?);
            Ok(())
        }
        "MultiPolygon" => {
            out.extend(parse_multi_polygon(coordinates(obj)?)?);
            Ok(())
        }
        "Point" | "MultiPoint" | "LineString" | "MultiLineString" => Ok(()),
        other => Err(format!("unsupported GeoJSON type: {other}")),
    }
}

fn coordinates(obj: &serde_json::Map<String, Value>) -> Result<&Value, String> {
    obj.get("coordinates")
        .ok_or("geometry missing coordinates".to_string())
}

fn parse_position(coords: &Value) -> Result<LonLat, String> {
    let arr = coords
        .as_array()
        .ok_or("position must be an array".to_string())?;
    if arr.len() < 2 {
        return Err("position must have [lon, lat]".to_string());
    }
    let lon = arr[0].as_f64().ok_or("lon must be a number".to_string())?;
    let lat = arr[1].as_f64().ok_or("lat must be a number".to_string())?;
    Ok(LonLat::new(lon, lat))
}

fn parse_ring(coords: &Value) -> Result<Ring, String> {
    let arr = coords
        .as_array()
        .ok_or("ring must be an array of positions".to_string())?;
    arr.iter().map(parse_position).collect()
}

fn parse_polygon(coords: &Value) -> Result<Polygon, String> {
    let rings = coords
        .as_array()
        .ok_or("Polygon coordinates must be an array of rings".to_string())?;
    rings.iter().map(parse_ring).collect()
}

fn parse_multi_polygon(coords: &Value) -> Result<Vec<Polygon>, String> {
    let polys = coords
        .as_array()
        .ok_or("MultiPolygon coordinates must be an array of polygons".to_string())?;
    polys.iter().map(parse_polygon).collect()
}
