//! End-to-end pipeline scenarios over small synthetic plantation datasets.

use pretty_assertions::assert_eq;
use serde_json::{Map, Value, json};

use formats::{Crs, Feature, FeatureCollection, Geometry};
use framing::{FilterSpec, FramingRequest, frame};

fn block(id: &str, divisi: &str, origin: [f64; 2], w: f64, h: f64) -> Feature {
    let [x, y] = origin;
    let mut properties = Map::new();
    properties.insert("BLOK".to_string(), Value::String(id.to_string()));
    properties.insert("DIVISI".to_string(), Value::String(divisi.to_string()));
    properties.insert(
        "SUB_DIVISI".to_string(),
        Value::String(format!("Sub {divisi}")),
    );
    Feature {
        id: Some(id.to_string()),
        properties,
        geometry: Geometry::Polygon(vec![vec![
            [x, y],
            [x + w, y],
            [x + w, y + h],
            [x, y + h],
            [x, y],
        ]]),
    }
}

/// Working-CRS dataset whose union extent is exactly 500 m x 300 m,
/// matching the worked example: 22 cm x 18 cm panel and 1.3 buffer need
/// ~1:2955, which rounds up to 1:5000 and a 1100 m x 900 m window.
fn example_estate() -> FeatureCollection {
    FeatureCollection::new(
        Some(Crs::WORKING),
        vec![
            block("A1", "Air Raya", [820_000.0, 9_680_000.0], 200.0, 300.0),
            block("A2", "Air Raya", [820_300.0, 9_680_050.0], 200.0, 150.0),
            block("B1", "Air Cendong", [820_150.0, 9_680_100.0], 100.0, 100.0),
        ],
    )
}

#[test]
fn worked_example_scale_and_window() {
    let report = frame(&example_estate(), &FramingRequest::default()).unwrap();

    assert_eq!(report.scale.denominator, 5_000);
    assert!((report.scale.required - 2_954.5).abs() < 1.0);
    assert!((report.viewport.half_width_m * 2.0 - 1_100.0).abs() < 1e-9);
    assert!((report.viewport.half_height_m * 2.0 - 900.0).abs() < 1e-9);
    assert_eq!(report.viewport.center, [820_250.0, 9_680_150.0]);
    assert!(report.viewport.contains(&report.extent));
    assert!(report.diagnostics.is_clean());
}

#[test]
fn filter_narrows_both_copies_and_colors() {
    let request = FramingRequest {
        filter: Some(FilterSpec {
            attribute: "DIVISI".to_string(),
            values: vec!["Air Raya".to_string()],
        }),
        label_attribute: Some("BLOK".to_string()),
        ..FramingRequest::default()
    };
    let report = frame(&example_estate(), &request).unwrap();

    assert!(!report.filter_fell_back);
    assert_eq!(report.working.len(), 2);
    assert_eq!(report.geographic.len(), 2);
    assert_eq!(report.geographic.crs, Some(Crs::GEOGRAPHIC));

    // One unique DIVISI value survives the filter, so one legend entry.
    assert_eq!(report.colors.len(), 1);
    assert_eq!(report.colors.color_of("Air Raya"), Some("#E74C3C"));

    // Labels carry block codes and working-CRS areas.
    let texts: Vec<_> = report
        .labels
        .iter()
        .map(|l| l.text.clone().unwrap())
        .collect();
    assert_eq!(texts, vec!["A1", "A2"]);
    assert_eq!(report.labels[0].area_m2, 200.0 * 300.0);
    // 6 ha block: the 5-10 ha bucket.
    assert_eq!(report.labels[0].class.font_size_pt, 9.0);

    // The narrowed extent still satisfies containment.
    assert!(report.viewport.contains(&report.extent));
}

#[test]
fn default_request_colors_by_subdivision() {
    let report = frame(&example_estate(), &FramingRequest::default()).unwrap();

    // No filter and no color attribute: fills come from SUB_DIVISI.
    assert!(!report.colors.is_empty());
    assert_eq!(report.colors.len(), 2);
    assert_eq!(report.colors.color_of("Sub Air Raya"), Some("#E74C3C"));
    assert_eq!(report.colors.color_of("Sub Air Cendong"), Some("#3498DB"));

    // Without the column the legend is empty but framing still succeeds.
    let mut bare = example_estate();
    for feature in &mut bare.features {
        feature.properties.remove("SUB_DIVISI");
    }
    let report = frame(&bare, &FramingRequest::default()).unwrap();
    assert!(report.colors.is_empty());
    assert_eq!(report.scale.denominator, 5_000);
}

#[test]
fn hopeless_filter_falls_back_to_everything() {
    let request = FramingRequest {
        filter: Some(FilterSpec {
            attribute: "DIVISI".to_string(),
            values: vec!["Padang Tembalun".to_string()],
        }),
        ..FramingRequest::default()
    };
    let report = frame(&example_estate(), &request).unwrap();

    assert!(report.filter_fell_back);
    assert_eq!(report.working.len(), 3);
    assert!(report.diagnostics.filter_fell_back());
    // The fallback keeps the full-extent framing.
    assert_eq!(report.scale.denominator, 5_000);
}

#[test]
fn geographic_input_is_normalized_before_framing() {
    // A ~1.1 km square near Belitung, given in degrees.
    let mut properties = Map::new();
    properties.insert("DIVISI".to_string(), json!("Air Raya"));
    let collection = FeatureCollection::new(
        Some(Crs::GEOGRAPHIC),
        vec![Feature {
            id: Some("deg".to_string()),
            properties,
            geometry: Geometry::Polygon(vec![vec![
                [107.60, -2.85],
                [107.61, -2.85],
                [107.61, -2.84],
                [107.60, -2.84],
                [107.60, -2.85],
            ]]),
        }],
    );
    let report = frame(&collection, &FramingRequest::default()).unwrap();

    assert_eq!(report.working.crs, Some(Crs::WORKING));
    assert!(report.extent.width() > 1_000.0 && report.extent.width() < 1_250.0);
    // ~1.1 km at 1.3 buffer on a 22 cm panel: 1:10,000.
    assert_eq!(report.scale.denominator, 10_000);
    assert!(report.viewport.contains(&report.extent));
    assert!(report.diagnostics.is_clean());
}

#[test]
fn missing_crs_is_reported_not_fatal() {
    let collection = FeatureCollection::new(
        None,
        vec![Feature {
            id: None,
            properties: Map::new(),
            geometry: Geometry::Point([107.6, -2.85]),
        }],
    );
    let report = frame(&collection, &FramingRequest::default()).unwrap();
    assert!(!report.diagnostics.is_clean());
    assert_eq!(report.source_crs, Crs::GEOGRAPHIC);
    // Degenerate single-point extent still frames at the smallest scale.
    assert_eq!(report.scale.denominator, 1_000);
    assert!(report.viewport.half_width_m > 0.0);
}

#[test]
fn empty_collection_is_a_hard_error() {
    let collection = FeatureCollection::new(Some(Crs::WORKING), vec![]);
    assert!(frame(&collection, &FramingRequest::default()).is_err());
}
