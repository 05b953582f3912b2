use serde::{Deserialize, Serialize};

use foundation::math::TransverseMercator;

/// Whether coordinates are angles (degrees) or linear units (meters).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrsKind {
    Geographic,
    Projected,
}

/// EPSG-tagged coordinate reference system descriptor.
///
/// Only the systems this engine can actually transform are "supported":
/// WGS84 geographic (EPSG:4326) and the WGS84 UTM zones (EPSG:326xx north,
/// EPSG:327xx south). Anything else is carried opaquely and rejected by the
/// normalizer as a hard error.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Crs {
    pub epsg: u32,
}

impl Crs {
    /// WGS84 geographic, the fallback when a dataset carries no CRS.
    pub const GEOGRAPHIC: Crs = Crs { epsg: 4326 };

    /// UTM zone 48S, the working projected CRS for all distance and area
    /// arithmetic.
    pub const WORKING: Crs = Crs { epsg: 32748 };

    pub fn new(epsg: u32) -> Self {
        Crs { epsg }
    }

    /// `None` for EPSG codes this engine cannot transform.
    pub fn kind(&self) -> Option<CrsKind> {
        match self.epsg {
            4326 => Some(CrsKind::Geographic),
            32601..=32660 | 32701..=32760 => Some(CrsKind::Projected),
            _ => None,
        }
    }

    /// `(zone, southern_hemisphere)` for UTM codes.
    pub fn utm_zone(&self) -> Option<(u8, bool)> {
        match self.epsg {
            32601..=32660 => Some(((self.epsg - 32600) as u8, false)),
            32701..=32760 => Some(((self.epsg - 32700) as u8, true)),
            _ => None,
        }
    }

    /// Projection parameters for projected CRSs.
    pub fn projection(&self) -> Option<TransverseMercator> {
        self.utm_zone()
            .map(|(zone, south)| TransverseMercator::utm_zone(zone, south))
    }

    /// Parses `EPSG:4326`, `epsg:4326`, or the OGC URN form
    /// `urn:ogc:def:crs:EPSG::4326`.
    pub fn parse(name: &str) -> Option<Crs> {
        let tail = name.rsplit(':').next()?;
        let epsg: u32 = tail.parse().ok()?;
        let head = &name[..name.len() - tail.len()];
        if head.to_ascii_lowercase().contains("epsg") {
            Some(Crs { epsg })
        } else {
            None
        }
    }
}

impl std::fmt::Display for Crs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EPSG:{}", self.epsg)
    }
}
