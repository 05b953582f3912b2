//! CRS normalization: every dataset is brought into the working projected
//! CRS (UTM 48S) before any distance or area arithmetic, because degree
//! deltas are not comparable as linear distances. A parallel geographic
//! (EPSG:4326) copy is kept for consumers that want WGS84 output, and the
//! transform is verified by round-tripping the data back to its source CRS.

use foundation::math::METERS_PER_DEGREE_EQUATOR;
use formats::{Crs, CrsKind, Feature, FeatureCollection, Geometry};
use symbology::feature_area_m2;

use crate::diagnostics::{Diagnostics, Warning};
use crate::error::FramingError;

/// Round-trip verification tolerances, in source-CRS units.
///
/// The defaults mirror the empirically chosen source thresholds (0.001
/// degree, 1 % area); the projected-input coordinate tolerance is the
/// linear equivalent of 0.001 degree at the equator. Both are configurable
/// because the right values depend on the CRS pair being exercised.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct VerifyConfig {
    pub max_coordinate_drift: f64,
    pub max_area_drift_percent: f64,
}

impl VerifyConfig {
    pub fn for_kind(kind: CrsKind) -> Self {
        match kind {
            CrsKind::Geographic => VerifyConfig {
                max_coordinate_drift: 0.001,
                max_area_drift_percent: 1.0,
            },
            CrsKind::Projected => VerifyConfig {
                max_coordinate_drift: 0.001 * METERS_PER_DEGREE_EQUATOR,
                max_area_drift_percent: 1.0,
            },
        }
    }
}

/// A dataset normalized into the two CRSs the rest of the pipeline uses.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedCollection {
    /// Working projected copy (UTM 48S); all framing math runs on this.
    pub working: FeatureCollection,
    /// Geographic copy (EPSG:4326) for WGS84-consuming output layers.
    pub geographic: FeatureCollection,
    /// The CRS the data arrived in (the assumed default if it had none).
    pub source_crs: Crs,
}

/// Normalizes a dataset into the working and geographic CRSs.
///
/// `verify` overrides the per-kind round-trip tolerances; `None` uses
/// [`VerifyConfig::for_kind`] for the source CRS.
pub fn normalize(
    collection: &FeatureCollection,
    verify: Option<VerifyConfig>,
    diagnostics: &mut Diagnostics,
) -> Result<NormalizedCollection, FramingError> {
    if collection.is_empty() {
        return Err(FramingError::EmptyCollection);
    }

    let source_crs = match collection.crs {
        Some(crs) => crs,
        None => {
            diagnostics.push(Warning::MissingCrs {
                assumed: Crs::GEOGRAPHIC.to_string(),
            });
            Crs::GEOGRAPHIC
        }
    };
    let source_kind = source_crs
        .kind()
        .ok_or(FramingError::UnsupportedCrs { crs: source_crs })?;

    let working = reproject_collection(collection, source_crs, Crs::WORKING)?;
    let geographic = reproject_collection(collection, source_crs, Crs::GEOGRAPHIC)?;

    let config = verify.unwrap_or_else(|| VerifyConfig::for_kind(source_kind));
    verify_round_trip(
        collection,
        &working,
        source_crs,
        source_kind,
        &config,
        diagnostics,
    )?;

    Ok(NormalizedCollection {
        working,
        geographic,
        source_crs,
    })
}

/// Transforms one position between supported CRSs via the geographic
/// intermediate.
pub fn transform_point(p: [f64; 2], from: Crs, to: Crs) -> [f64; 2] {
    if from == to {
        return p;
    }
    let geographic = match from.projection() {
        Some(proj) => proj.inverse(p[0], p[1]),
        None => p,
    };
    match to.projection() {
        Some(proj) => proj.forward(geographic[0], geographic[1]),
        None => geographic,
    }
}

pub fn reproject_collection(
    collection: &FeatureCollection,
    from: Crs,
    to: Crs,
) -> Result<FeatureCollection, FramingError> {
    for crs in [from, to] {
        if crs.kind().is_none() {
            return Err(FramingError::UnsupportedCrs { crs });
        }
    }

    let mut features = Vec::with_capacity(collection.features.len());
    for feature in &collection.features {
        let geometry = feature
            .geometry
            .map_vertices(&|p| transform_point(p, from, to));
        ensure_finite(&geometry, feature)?;
        features.push(Feature {
            id: feature.id.clone(),
            properties: feature.properties.clone(),
            geometry,
        });
    }

    Ok(FeatureCollection::new(Some(to), features))
}

fn ensure_finite(geometry: &Geometry, feature: &Feature) -> Result<(), FramingError> {
    let mut bad: Option<[f64; 2]> = None;
    geometry.for_each_vertex(|p| {
        if !(p[0].is_finite() && p[1].is_finite()) && bad.is_none() {
            bad = Some(p);
        }
    });
    match bad {
        None => Ok(()),
        Some(p) => Err(FramingError::Projection {
            detail: format!(
                "non-finite vertex ({}, {}) in feature {}",
                p[0],
                p[1],
                feature.id.as_deref().unwrap_or("<unnamed>")
            ),
        }),
    }
}

/// A→B→A verification: reproject the working copy back to the source CRS
/// and compare bounding boxes and total area against the original. Drift
/// beyond tolerance degrades confidence but never aborts; a map with a
/// small projection error is still a usable map.
fn verify_round_trip(
    original: &FeatureCollection,
    working: &FeatureCollection,
    source_crs: Crs,
    source_kind: CrsKind,
    config: &VerifyConfig,
    diagnostics: &mut Diagnostics,
) -> Result<(), FramingError> {
    let round_tripped = reproject_collection(working, Crs::WORKING, source_crs)?;

    if let (Some(before), Some(after)) = (original.bounds(), round_tripped.bounds()) {
        let drift = (before.min[0] - after.min[0])
            .abs()
            .max((before.min[1] - after.min[1]).abs())
            .max((before.max[0] - after.max[0]).abs())
            .max((before.max[1] - after.max[1]).abs());
        if drift >= config.max_coordinate_drift {
            diagnostics.push(Warning::ReprojectionDrift {
                drift,
                tolerance: config.max_coordinate_drift,
            });
        }
    }

    let area_before: f64 = original
        .features
        .iter()
        .map(|f| feature_area_m2(&f.geometry, source_kind))
        .sum();
    let area_after: f64 = round_tripped
        .features
        .iter()
        .map(|f| feature_area_m2(&f.geometry, source_kind))
        .sum();
    if area_before > 0.0 {
        let drift_percent = ((area_before - area_after) / area_before).abs() * 100.0;
        if drift_percent >= config.max_area_drift_percent {
            diagnostics.push(Warning::AreaDrift {
                drift_percent,
                tolerance_percent: config.max_area_drift_percent,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{NormalizedCollection, VerifyConfig, normalize, transform_point};
    use crate::diagnostics::{Diagnostics, Warning};
    use crate::error::FramingError;
    use formats::{Crs, Feature, FeatureCollection, Geometry};
    use serde_json::Map;

    fn feature(geometry: Geometry) -> Feature {
        Feature {
            id: None,
            properties: Map::new(),
            geometry,
        }
    }

    fn belitung_square_deg() -> Geometry {
        Geometry::Polygon(vec![vec![
            [107.60, -2.90],
            [107.70, -2.90],
            [107.70, -2.80],
            [107.60, -2.80],
            [107.60, -2.90],
        ]])
    }

    #[test]
    fn normalizes_geographic_input() {
        let collection = FeatureCollection::new(
            Some(Crs::GEOGRAPHIC),
            vec![feature(belitung_square_deg())],
        );
        let mut diag = Diagnostics::new();
        let NormalizedCollection {
            working,
            geographic,
            source_crs,
        } = normalize(&collection, None, &mut diag).unwrap();

        assert_eq!(source_crs, Crs::GEOGRAPHIC);
        assert_eq!(working.crs, Some(Crs::WORKING));
        assert_eq!(geographic.crs, Some(Crs::GEOGRAPHIC));
        assert!(diag.is_clean(), "unexpected warnings: {:?}", diag.warnings);

        // ~0.1 degree near the equator is ~11 km.
        let b = working.bounds().unwrap();
        assert!((b.width() - 11_130.0).abs() < 150.0, "width {}", b.width());
        assert!((b.height() - 11_057.0).abs() < 150.0, "height {}", b.height());
    }

    #[test]
    fn missing_crs_assumes_geographic_with_warning() {
        let collection = FeatureCollection::new(None, vec![feature(belitung_square_deg())]);
        let mut diag = Diagnostics::new();
        let normalized = normalize(&collection, None, &mut diag).unwrap();
        assert_eq!(normalized.source_crs, Crs::GEOGRAPHIC);
        assert!(matches!(
            diag.warnings.as_slice(),
            [Warning::MissingCrs { assumed }] if assumed == "EPSG:4326"
        ));
    }

    #[test]
    fn projected_input_passes_through_working_copy() {
        let collection = FeatureCollection::new(
            Some(Crs::WORKING),
            vec![feature(Geometry::Point([820_000.0, 9_680_000.0]))],
        );
        let mut diag = Diagnostics::new();
        let normalized = normalize(&collection, None, &mut diag).unwrap();
        let p = match normalized.working.features[0].geometry {
            Geometry::Point(p) => p,
            _ => unreachable!(),
        };
        assert!((p[0] - 820_000.0).abs() < 1e-6);
        assert!((p[1] - 9_680_000.0).abs() < 1e-6);
        assert!(diag.is_clean());
    }

    #[test]
    fn empty_collection_is_fatal() {
        let collection = FeatureCollection::new(Some(Crs::GEOGRAPHIC), vec![]);
        let mut diag = Diagnostics::new();
        assert!(matches!(
            normalize(&collection, None, &mut diag),
            Err(FramingError::EmptyCollection)
        ));
    }

    #[test]
    fn unsupported_crs_is_fatal() {
        let collection = FeatureCollection::new(
            Some(Crs::new(2154)),
            vec![feature(Geometry::Point([650_000.0, 6_860_000.0]))],
        );
        let mut diag = Diagnostics::new();
        assert!(matches!(
            normalize(&collection, None, &mut diag),
            Err(FramingError::UnsupportedCrs { crs }) if crs == Crs::new(2154)
        ));
    }

    #[test]
    fn custom_verify_tolerance_overrides_the_default() {
        let collection = FeatureCollection::new(
            Some(Crs::GEOGRAPHIC),
            vec![feature(belitung_square_deg())],
        );

        // Default tolerances absorb the series residual.
        let mut diag = Diagnostics::new();
        normalize(&collection, None, &mut diag).unwrap();
        assert!(diag.is_clean());

        // A tolerance tighter than the residual reports the drift.
        let strict = VerifyConfig {
            max_coordinate_drift: 1e-13,
            max_area_drift_percent: 1.0,
        };
        let mut diag = Diagnostics::new();
        normalize(&collection, Some(strict), &mut diag).unwrap();
        assert!(diag.reprojection_degraded());
        assert!(matches!(
            diag.warnings.as_slice(),
            [Warning::ReprojectionDrift { tolerance, .. }] if *tolerance == 1e-13
        ));
    }

    #[test]
    fn transform_point_round_trips() {
        let p = [107.65, -2.85];
        let utm = transform_point(p, Crs::GEOGRAPHIC, Crs::WORKING);
        let back = transform_point(utm, Crs::WORKING, Crs::GEOGRAPHIC);
        assert!((back[0] - p[0]).abs() < 1e-9);
        assert!((back[1] - p[1]).abs() < 1e-9);
    }
}
