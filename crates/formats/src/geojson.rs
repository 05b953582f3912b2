//! GeoJSON FeatureCollection ingest and export.
//!
//! Positions are kept in whatever CRS the file declares. Strict GeoJSON is
//! always WGS84, but the datasets this engine frames routinely carry a
//! legacy `crs` member with projected coordinates, so the member is honored
//! when present and its absence simply leaves `FeatureCollection::crs` unset
//! for the normalizer to resolve.

use serde_json::{Map, Value};

use crate::crs::Crs;
use crate::feature::{Feature, FeatureCollection, Geometry};

#[derive(Debug)]
pub enum GeoJsonError {
    NotAFeatureCollection,
    InvalidFeature { index: usize, reason: String },
}

impl std::fmt::Display for GeoJsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeoJsonError::NotAFeatureCollection => {
                write!(f, "expected GeoJSON FeatureCollection")
            }
            GeoJsonError::InvalidFeature { index, reason } => {
                write!(f, "invalid feature at index {index}: {reason}")
            }
        }
    }
}

impl std::error::Error for GeoJsonError {}

pub fn from_geojson_str(payload: &str) -> Result<FeatureCollection, GeoJsonError> {
    let value: Value = serde_json::from_str(payload).map_err(|e| GeoJsonError::InvalidFeature {
        index: 0,
        reason: format!("JSON parse error: {e}"),
    })?;
    from_geojson_value(&value)
}

pub fn from_geojson_value(value: &Value) -> Result<FeatureCollection, GeoJsonError> {
    let obj = value.as_object().ok_or(GeoJsonError::NotAFeatureCollection)?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or(GeoJsonError::NotAFeatureCollection)?;
    if ty != "FeatureCollection" {
        return Err(GeoJsonError::NotAFeatureCollection);
    }

    let crs = obj.get("crs").and_then(parse_crs_member);

    let features_val = obj
        .get("features")
        .and_then(|v| v.as_array())
        .ok_or(GeoJsonError::NotAFeatureCollection)?;

    let mut features = Vec::with_capacity(features_val.len());
    for (index, feat_val) in features_val.iter().enumerate() {
        let feat_obj = feat_val.as_object().ok_or(GeoJsonError::InvalidFeature {
            index,
            reason: "feature must be an object".to_string(),
        })?;

        let feat_type = feat_obj.get("type").and_then(|v| v.as_str()).ok_or(
            GeoJsonError::InvalidFeature {
                index,
                reason: "feature missing type".to_string(),
            },
        )?;
        if feat_type != "Feature" {
            return Err(GeoJsonError::InvalidFeature {
                index,
                reason: format!("unexpected feature type: {feat_type}"),
            });
        }

        let id = match feat_obj.get("id") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };

        let properties = feat_obj
            .get("properties")
            .and_then(|v| v.as_object())
            .cloned()
            .unwrap_or_default();

        let geometry_val = feat_obj
            .get("geometry")
            .ok_or(GeoJsonError::InvalidFeature {
                index,
                reason: "feature missing geometry".to_string(),
            })?;
        let geometry = parse_geometry(geometry_val)
            .map_err(|reason| GeoJsonError::InvalidFeature { index, reason })?;

        features.push(Feature {
            id,
            properties,
            geometry,
        });
    }

    Ok(FeatureCollection::new(crs, features))
}

/// Legacy GeoJSON `crs` member: `{"type": "name", "properties": {"name": ...}}`.
fn parse_crs_member(value: &Value) -> Option<Crs> {
    let name = value
        .as_object()?
        .get("properties")?
        .as_object()?
        .get("name")?
        .as_str()?;
    Crs::parse(name)
}

/// Semantic round-trip exporter: emits a GeoJSON FeatureCollection.
/// (Property ordering may differ from the original input.)
pub fn to_geojson_value(collection: &FeatureCollection) -> Value {
    let mut root = Map::new();
    root.insert(
        "type".to_string(),
        Value::String("FeatureCollection".to_string()),
    );

    if let Some(crs) = collection.crs {
        let mut props = Map::new();
        props.insert("name".to_string(), Value::String(crs.to_string()));
        let mut crs_obj = Map::new();
        crs_obj.insert("type".to_string(), Value::String("name".to_string()));
        crs_obj.insert("properties".to_string(), Value::Object(props));
        root.insert("crs".to_string(), Value::Object(crs_obj));
    }

    let mut features: Vec<Value> = Vec::with_capacity(collection.features.len());
    for feat in &collection.features {
        let mut fobj = Map::new();
        fobj.insert("type".to_string(), Value::String("Feature".to_string()));
        if let Some(id) = &feat.id {
            fobj.insert("id".to_string(), Value::String(id.clone()));
        }
        fobj.insert(
            "properties".to_string(),
            Value::Object(feat.properties.clone()),
        );
        fobj.insert("geometry".to_string(), geometry_to_value(&feat.geometry));
        features.push(Value::Object(fobj));
    }

    root.insert("features".to_string(), Value::Array(features));
    Value::Object(root)
}

fn geometry_to_value(geom: &Geometry) -> Value {
    let mut obj = Map::new();
    let (ty, coords) = match geom {
        Geometry::Point(p) => ("Point", point_coords(p)),
        Geometry::MultiPoint(ps) => ("MultiPoint", points_coords(ps)),
        Geometry::LineString(ps) => ("LineString", points_coords(ps)),
        Geometry::MultiLineString(lines) => (
            "MultiLineString",
            Value::Array(lines.iter().map(points_coords).collect()),
        ),
        Geometry::Polygon(rings) => (
            "Polygon",
            Value::Array(rings.iter().map(points_coords).collect()),
        ),
        Geometry::MultiPolygon(polys) => (
            "MultiPolygon",
            Value::Array(
                polys
                    .iter()
                    .map(|rings| Value::Array(rings.iter().map(points_coords).collect()))
                    .collect(),
            ),
        ),
    };
    obj.insert("type".to_string(), Value::String(ty.to_string()));
    obj.insert("coordinates".to_string(), coords);
    Value::Object(obj)
}

fn point_coords(p: &[f64; 2]) -> Value {
    Value::Array(vec![Value::from(p[0]), Value::from(p[1])])
}

fn points_coords(points: &Vec<[f64; 2]>) -> Value {
    Value::Array(points.iter().map(point_coords).collect())
}

fn parse_geometry(value: &Value) -> Result<Geometry, String> {
    let obj = value
        .as_object()
        .ok_or("geometry must be an object".to_string())?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or("geometry missing type".to_string())?;
    let coords = obj
        .get("coordinates")
        .ok_or("geometry missing coordinates".to_string())?;

    match ty {
        "Point" => Ok(Geometry::Point(parse_point(coords)?)),
        "MultiPoint" => Ok(Geometry::MultiPoint(parse_points(coords)?)),
        "LineString" => Ok(Geometry::LineString(parse_points(coords)?)),
        "MultiLineString" => Ok(Geometry::MultiLineString(parse_lines(coords)?)),
        "Polygon" => Ok(Geometry::Polygon(parse_lines(coords)?)),
        "MultiPolygon" => Ok(Geometry::MultiPolygon(parse_multi_polygon(coords)?)),
        other => Err(format!("unsupported geometry type: {other}")),
    }
}

fn parse_point(coords: &Value) -> Result<[f64; 2], String> {
    let arr = coords
        .as_array()
        .ok_or("Point coordinates must be an array".to_string())?;
    if arr.len() < 2 {
        return Err("Point coordinates must have [x, y]".to_string());
    }
    let x = arr[0].as_f64().ok_or("x must be a number".to_string())?;
    let y = arr[1].as_f64().ok_or("y must be a number".to_string())?;
    Ok([x, y])
}

fn parse_points(coords: &Value) -> Result<Vec<[f64; 2]>, String> {
    let arr = coords
        .as_array()
        .ok_or("coordinates must be an array".to_string())?;
    let mut out = Vec::with_capacity(arr.len());
    for item in arr {
        out.push(parse_point(item)?);
    }
    Ok(out)
}

fn parse_lines(coords: &Value) -> Result<Vec<Vec<[f64; 2]>>, String> {
    let arr = coords
        .as_array()
        .ok_or("coordinates must be an array of arrays".to_string())?;
    let mut out = Vec::with_capacity(arr.len());
    for line in arr {
        out.push(parse_points(line)?);
    }
    Ok(out)
}

fn parse_multi_polygon(coords: &Value) -> Result<Vec<Vec<Vec<[f64; 2]>>>, String> {
    let arr = coords
        .as_array()
        .ok_or("MultiPolygon coordinates must be an array".to_string())?;
    let mut out = Vec::with_capacity(arr.len());
    for poly in arr {
        out.push(parse_lines(poly)?);
    }
    Ok(out)
}
