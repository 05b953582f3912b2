use foundation::math::METERS_PER_DEGREE_EQUATOR;

use formats::{CrsKind, Geometry};

/// Font size and box padding for one label.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LabelClass {
    pub font_size_pt: f32,
    pub padding: f32,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LabelSizeRow {
    pub min_area_m2: f64,
    pub class: LabelClass,
}

/// Ordered area-threshold table mapping feature area to a label class.
///
/// Rows are scanned top-down and the first row whose threshold the area
/// meets wins; areas below every row get the floor class. The thresholds
/// are empirical, tuned for plantation block polygons, so they live in a
/// configurable table rather than inline conditionals.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelSizeTable {
    pub rows: Vec<LabelSizeRow>,
    pub floor: LabelClass,
}

impl Default for LabelSizeTable {
    fn default() -> Self {
        LabelSizeTable {
            rows: vec![
                // > 50 ha
                LabelSizeRow {
                    min_area_m2: 500_000.0,
                    class: LabelClass {
                        font_size_pt: 11.0,
                        padding: 0.4,
                    },
                },
                // 10-50 ha
                LabelSizeRow {
                    min_area_m2: 100_000.0,
                    class: LabelClass {
                        font_size_pt: 10.0,
                        padding: 0.35,
                    },
                },
                // 5-10 ha
                LabelSizeRow {
                    min_area_m2: 50_000.0,
                    class: LabelClass {
                        font_size_pt: 9.0,
                        padding: 0.3,
                    },
                },
                // 1-5 ha
                LabelSizeRow {
                    min_area_m2: 10_000.0,
                    class: LabelClass {
                        font_size_pt: 8.0,
                        padding: 0.25,
                    },
                },
            ],
            floor: LabelClass {
                font_size_pt: 7.0,
                padding: 0.2,
            },
        }
    }
}

impl LabelSizeTable {
    pub fn class_for_area(&self, area_m2: f64) -> LabelClass {
        for row in &self.rows {
            if area_m2 > row.min_area_m2 {
                return row.class;
            }
        }
        self.floor
    }
}

/// Feature area in square meters.
///
/// Projected geometries are measured directly with the shoelace formula
/// (holes subtracted). Geographic geometries are measured in square degrees
/// and converted with the latitude-aware equatorial factor, which is an
/// approximation but only feeds label bucketing, never framing.
pub fn feature_area_m2(geometry: &Geometry, kind: CrsKind) -> f64 {
    let native = native_area(geometry);
    match kind {
        CrsKind::Projected => native,
        CrsKind::Geographic => {
            let Some(bounds) = geometry.bounds() else {
                return 0.0;
            };
            let lat_center = bounds.center()[1];
            let meters_per_degree = METERS_PER_DEGREE_EQUATOR * lat_center.to_radians().cos();
            native * meters_per_degree * meters_per_degree
        }
    }
}

fn native_area(geometry: &Geometry) -> f64 {
    match geometry {
        Geometry::Polygon(rings) => polygon_area(rings),
        Geometry::MultiPolygon(polys) => polys.iter().map(|rings| polygon_area(rings)).sum(),
        _ => 0.0,
    }
}

fn polygon_area(rings: &[Vec<[f64; 2]>]) -> f64 {
    let Some(outer) = rings.first() else {
        return 0.0;
    };
    let mut area = ring_area(outer);
    for hole in &rings[1..] {
        area -= ring_area(hole);
    }
    area.max(0.0)
}

/// Unsigned shoelace area of one ring.
fn ring_area(ring: &[[f64; 2]]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let mut twice = 0.0;
    for i in 0..ring.len() {
        let [x0, y0] = ring[i];
        let [x1, y1] = ring[(i + 1) % ring.len()];
        twice += x0 * y1 - x1 * y0;
    }
    (twice * 0.5).abs()
}

/// Label anchor for a feature: the vertex centroid, nudged off-center for
/// strongly elongated shapes and clamped into the feature's bounds.
pub fn label_anchor(geometry: &Geometry) -> Option<[f64; 2]> {
    let bounds = geometry.bounds()?;
    let centroid = vertex_centroid(geometry)?;
    let width = bounds.width();
    let height = bounds.height();

    let aspect = if height > 0.0 { width / height } else { 1.0 };
    let [mut x, mut y] = centroid;
    if aspect > 3.0 {
        // Very wide shape: sit the label slightly above center.
        y += height * 0.1;
    } else if aspect < 1.0 / 3.0 {
        // Very tall shape: slightly right of center.
        x += width * 0.1;
    }

    Some([
        x.clamp(bounds.min[0], bounds.max[0]),
        y.clamp(bounds.min[1], bounds.max[1]),
    ])
}

fn vertex_centroid(geometry: &Geometry) -> Option<[f64; 2]> {
    // For areas, average the outer ring only so large holes do not drag the
    // anchor; otherwise average every vertex.
    let mut sum = [0.0_f64, 0.0_f64];
    let mut count = 0.0_f64;
    let mut push = |p: [f64; 2]| {
        if p[0].is_finite() && p[1].is_finite() {
            sum[0] += p[0];
            sum[1] += p[1];
            count += 1.0;
        }
    };
    match geometry {
        Geometry::Polygon(rings) => {
            for p in rings.first()? {
                push(*p);
            }
        }
        Geometry::MultiPolygon(polys) => {
            for rings in polys {
                for p in rings.first()? {
                    push(*p);
                }
            }
        }
        other => other.for_each_vertex(push),
    }
    if count <= 0.0 {
        return None;
    }
    Some([sum[0] / count, sum[1] / count])
}

#[cfg(test)]
mod tests {
    use super::{LabelSizeTable, feature_area_m2, label_anchor};
    use formats::{CrsKind, Geometry};

    fn rect(w: f64, h: f64) -> Geometry {
        Geometry::Polygon(vec![vec![[0.0, 0.0], [w, 0.0], [w, h], [0.0, h], [0.0, 0.0]]])
    }

    #[test]
    fn bucket_edges() {
        let table = LabelSizeTable::default();
        assert_eq!(table.class_for_area(600_000.0).font_size_pt, 11.0);
        assert_eq!(table.class_for_area(500_000.0).font_size_pt, 10.0);
        assert_eq!(table.class_for_area(120_000.0).font_size_pt, 10.0);
        assert_eq!(table.class_for_area(60_000.0).font_size_pt, 9.0);
        assert_eq!(table.class_for_area(20_000.0).font_size_pt, 8.0);
        assert_eq!(table.class_for_area(500.0).font_size_pt, 7.0);
        assert_eq!(table.class_for_area(500.0).padding, 0.2);
    }

    #[test]
    fn projected_area_is_shoelace() {
        let area = feature_area_m2(&rect(200.0, 300.0), CrsKind::Projected);
        assert_eq!(area, 60_000.0);
    }

    #[test]
    fn holes_subtract() {
        let geom = Geometry::Polygon(vec![
            vec![[0.0, 0.0], [100.0, 0.0], [100.0, 100.0], [0.0, 100.0], [0.0, 0.0]],
            vec![[10.0, 10.0], [30.0, 10.0], [30.0, 30.0], [10.0, 30.0], [10.0, 10.0]],
        ]);
        assert_eq!(feature_area_m2(&geom, CrsKind::Projected), 10_000.0 - 400.0);
    }

    #[test]
    fn geographic_area_uses_latitude_factor() {
        // A 0.01 x 0.01 degree square at the equator is roughly 1.11 km on
        // a side.
        let geom = Geometry::Polygon(vec![vec![
            [107.0, 0.0],
            [107.01, 0.0],
            [107.01, 0.01],
            [107.0, 0.01],
            [107.0, 0.0],
        ]]);
        let area = feature_area_m2(&geom, CrsKind::Geographic);
        let side = 0.01 * 111_320.0;
        let expected = side * side;
        assert!((area - expected).abs() / expected < 0.01, "area {area}");
    }

    #[test]
    fn non_area_geometry_has_zero_area() {
        let line = Geometry::LineString(vec![[0.0, 0.0], [100.0, 0.0]]);
        assert_eq!(feature_area_m2(&line, CrsKind::Projected), 0.0);
    }

    #[test]
    fn anchor_centers_then_nudges_wide_shapes() {
        let square_anchor = label_anchor(&rect(10.0, 10.0)).unwrap();
        assert!((square_anchor[0] - 4.0).abs() < 1.1); // 5-vertex ring mean
        let wide = rect(100.0, 10.0);
        let anchor = label_anchor(&wide).unwrap();
        let plain = label_anchor(&rect(100.0, 100.0)).unwrap();
        // Wide shape anchor is lifted relative to its centroid.
        assert!(anchor[1] > plain[1] * 10.0 / 100.0);
        assert!(anchor[1] <= 10.0);
    }

    #[test]
    fn anchor_is_clamped_into_bounds() {
        let tall = rect(10.0, 100.0);
        let anchor = label_anchor(&tall).unwrap();
        assert!(anchor[0] >= 0.0 && anchor[0] <= 10.0);
        assert!(anchor[1] >= 0.0 && anchor[1] <= 100.0);
    }
}
