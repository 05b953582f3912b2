//! Round cartographic scale selection.
//!
//! Map readers expect conventional scales (1:25,000, not 1:37,842), so the
//! required scale is always rounded up to the next entry of a fixed catalog.

use serde::{Deserialize, Serialize};

use foundation::bounds::Bounds2;

use crate::diagnostics::{Diagnostics, Warning};

/// Professional scale denominators, ascending. From 1:1,000 site plans up
/// to 1:500,000 provincial overviews.
pub const PROFESSIONAL_SCALES: [u32; 16] = [
    1_000, 2_000, 5_000, 10_000, 15_000, 20_000, 25_000, 30_000, 40_000, 50_000, 75_000, 100_000,
    150_000, 200_000, 250_000, 500_000,
];

/// Physical size of the main map panel on the printed page.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelSize {
    pub width_cm: f64,
    pub height_cm: f64,
}

impl PanelSize {
    pub fn new(width_cm: f64, height_cm: f64) -> Self {
        PanelSize {
            width_cm,
            height_cm,
        }
    }

    pub fn width_m(&self) -> f64 {
        self.width_cm / 100.0
    }

    pub fn height_m(&self) -> f64 {
        self.height_cm / 100.0
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width_cm / self.height_cm
    }
}

impl Default for PanelSize {
    /// Main map panel of the A3 report layout.
    fn default() -> Self {
        PanelSize::new(22.0, 18.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScaleConfig {
    /// Ascending catalog of allowed denominators.
    pub catalog: Vec<u32>,
    /// Multiplier on the extent (> 1.0) so features clear the panel edges.
    pub safety_buffer: f64,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        ScaleConfig {
            catalog: PROFESSIONAL_SCALES.to_vec(),
            safety_buffer: 1.3,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct ScaleChoice {
    /// Always a catalog member.
    pub denominator: u32,
    /// The raw buffered requirement the catalog entry had to meet.
    pub required: f64,
    /// True when even the catalog maximum cannot satisfy the requirement.
    pub clamped: bool,
}

/// Smallest catalog denominator that fits the buffered extent into the
/// panel on both axes. Oversized extents clamp to the catalog maximum with
/// a degraded-fit warning instead of failing.
pub fn select_scale(
    extent: &Bounds2,
    panel: &PanelSize,
    config: &ScaleConfig,
    diagnostics: &mut Diagnostics,
) -> ScaleChoice {
    let scale_for_width = extent.width() * config.safety_buffer / panel.width_m();
    let scale_for_height = extent.height() * config.safety_buffer / panel.height_m();
    let required = scale_for_width.max(scale_for_height);

    for &denominator in &config.catalog {
        if f64::from(denominator) >= required {
            return ScaleChoice {
                denominator,
                required,
                clamped: false,
            };
        }
    }

    let max = config.catalog.last().copied().unwrap_or(0);
    diagnostics.push(Warning::ScaleClamped {
        required,
        clamped_to: max,
    });
    ScaleChoice {
        denominator: max,
        required,
        clamped: true,
    }
}

#[cfg(test)]
mod tests {
    use super::{PanelSize, ScaleConfig, select_scale};
    use crate::diagnostics::Diagnostics;
    use foundation::bounds::Bounds2;

    fn extent(width: f64, height: f64) -> Bounds2 {
        Bounds2::new([0.0, 0.0], [width, height])
    }

    #[test]
    fn example_scenario_picks_5000() {
        // 500 m x 300 m extent, 22 cm x 18 cm panel, 1.3 buffer:
        // required = max(500/0.22, 300/0.18) * 1.3 ~ 2955, next entry 5000.
        let mut diag = Diagnostics::new();
        let choice = select_scale(
            &extent(500.0, 300.0),
            &PanelSize::default(),
            &ScaleConfig::default(),
            &mut diag,
        );
        assert_eq!(choice.denominator, 5_000);
        assert!((choice.required - 2_954.5).abs() < 1.0);
        assert!(!choice.clamped);
        assert!(diag.is_clean());
    }

    #[test]
    fn result_is_always_a_catalog_member() {
        let config = ScaleConfig::default();
        for dims in [(3.0, 3.0), (740.0, 520.0), (61_000.0, 9_000.0)] {
            let mut diag = Diagnostics::new();
            let choice = select_scale(
                &extent(dims.0, dims.1),
                &PanelSize::default(),
                &config,
                &mut diag,
            );
            assert!(config.catalog.contains(&choice.denominator));
            assert!(f64::from(choice.denominator) >= choice.required || choice.clamped);
        }
    }

    #[test]
    fn binding_axis_wins() {
        // Width fits at 1:1000 but height needs more.
        let mut diag = Diagnostics::new();
        let choice = select_scale(
            &extent(100.0, 1_000.0),
            &PanelSize::default(),
            &ScaleConfig::default(),
            &mut diag,
        );
        // height: 1000 * 1.3 / 0.18 ~ 7222 -> 10000
        assert_eq!(choice.denominator, 10_000);
    }

    #[test]
    fn oversized_extent_clamps_with_warning() {
        let mut diag = Diagnostics::new();
        let choice = select_scale(
            &extent(200_000.0, 150_000.0),
            &PanelSize::default(),
            &ScaleConfig::default(),
            &mut diag,
        );
        assert_eq!(choice.denominator, 500_000);
        assert!(choice.clamped);
        assert!(diag.scale_clamped());
    }

    #[test]
    fn degenerate_extent_picks_smallest_scale() {
        let mut diag = Diagnostics::new();
        let choice = select_scale(
            &extent(0.0, 0.0),
            &PanelSize::default(),
            &ScaleConfig::default(),
            &mut diag,
        );
        assert_eq!(choice.denominator, 1_000);
    }
}
