pub mod crs;
pub mod feature;
pub mod geojson;

pub use crs::{Crs, CrsKind};
pub use feature::{Feature, FeatureCollection, Geometry};
pub use geojson::GeoJsonError;
