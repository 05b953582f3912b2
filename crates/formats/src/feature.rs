use serde_json::{Map, Value};

use foundation::bounds::Bounds2;

use crate::crs::Crs;

/// 2-D vector geometry with positions in the collection's CRS.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point([f64; 2]),
    MultiPoint(Vec<[f64; 2]>),
    LineString(Vec<[f64; 2]>),
    MultiLineString(Vec<Vec<[f64; 2]>>),
    Polygon(Vec<Vec<[f64; 2]>>),
    MultiPolygon(Vec<Vec<Vec<[f64; 2]>>>),
}

impl Geometry {
    pub fn for_each_vertex(&self, mut f: impl FnMut([f64; 2])) {
        match self {
            Geometry::Point(p) => f(*p),
            Geometry::MultiPoint(ps) => ps.iter().copied().for_each(f),
            Geometry::LineString(ps) => ps.iter().copied().for_each(f),
            Geometry::MultiLineString(lines) => {
                for line in lines {
                    for p in line {
                        f(*p);
                    }
                }
            }
            Geometry::Polygon(rings) => {
                for ring in rings {
                    for p in ring {
                        f(*p);
                    }
                }
            }
            Geometry::MultiPolygon(polys) => {
                for rings in polys {
                    for ring in rings {
                        for p in ring {
                            f(*p);
                        }
                    }
                }
            }
        }
    }

    /// Applies a coordinate transform to every vertex, preserving structure.
    pub fn map_vertices(&self, f: &impl Fn([f64; 2]) -> [f64; 2]) -> Geometry {
        let map_line = |line: &Vec<[f64; 2]>| line.iter().map(|p| f(*p)).collect::<Vec<_>>();
        match self {
            Geometry::Point(p) => Geometry::Point(f(*p)),
            Geometry::MultiPoint(ps) => Geometry::MultiPoint(map_line(ps)),
            Geometry::LineString(ps) => Geometry::LineString(map_line(ps)),
            Geometry::MultiLineString(lines) => {
                Geometry::MultiLineString(lines.iter().map(map_line).collect())
            }
            Geometry::Polygon(rings) => Geometry::Polygon(rings.iter().map(map_line).collect()),
            Geometry::MultiPolygon(polys) => Geometry::MultiPolygon(
                polys
                    .iter()
                    .map(|rings| rings.iter().map(map_line).collect())
                    .collect(),
            ),
        }
    }

    pub fn bounds(&self) -> Option<Bounds2> {
        let mut points = Vec::new();
        self.for_each_vertex(|p| points.push(p));
        Bounds2::from_points(points)
    }

    /// Polygon rings, outer first; empty for non-area geometries.
    pub fn polygon_rings(&self) -> Vec<&Vec<[f64; 2]>> {
        match self {
            Geometry::Polygon(rings) => rings.iter().collect(),
            Geometry::MultiPolygon(polys) => polys.iter().flatten().collect(),
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: Option<String>,
    pub properties: Map<String, Value>,
    pub geometry: Geometry,
}

impl Feature {
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }
}

/// Ordered feature sequence sharing one CRS.
///
/// `crs: None` means the source file carried no CRS tag; the normalizer
/// substitutes the geographic default and reports the substitution.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureCollection {
    pub crs: Option<Crs>,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(crs: Option<Crs>, features: Vec<Feature>) -> Self {
        Self { crs, features }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Union bounding box over every vertex of every feature.
    pub fn bounds(&self) -> Option<Bounds2> {
        let mut points = Vec::new();
        for feature in &self.features {
            feature.geometry.for_each_vertex(|p| points.push(p));
        }
        Bounds2::from_points(points)
    }
}
