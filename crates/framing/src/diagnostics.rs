use serde::Serialize;

/// Recoverable conditions the pipeline continued through.
///
/// The design rule is that the engine never produces a blank or silently
/// cropped map: every fallback the pipeline takes shows up here so the
/// caller can surface it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// Dataset carried no CRS; the geographic default was assumed.
    MissingCrs { assumed: String },
    /// Round-trip reprojection moved bounding-box coordinates more than the
    /// tolerance allows. Drift and tolerance are in source-CRS units.
    ReprojectionDrift { drift: f64, tolerance: f64 },
    /// Round-trip reprojection changed total feature area beyond tolerance.
    AreaDrift {
        drift_percent: f64,
        tolerance_percent: f64,
    },
    /// The attribute filter matched nothing (or the column was missing);
    /// the full collection was used instead.
    FilterFallback { attribute: String, requested: usize },
    /// The extent needs a larger scale than the catalog offers; the catalog
    /// maximum was used and the map will be tighter than the safety buffer
    /// asks for.
    ScaleClamped { required: f64, clamped_to: u32 },
    /// More unique attribute values than palette colors; colors repeat.
    PaletteCycled {
        unique_values: usize,
        palette_size: usize,
    },
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Diagnostics {
    pub warnings: Vec<Warning>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, warning: Warning) {
        self.warnings.push(warning);
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn filter_fell_back(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| matches!(w, Warning::FilterFallback { .. }))
    }

    pub fn scale_clamped(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| matches!(w, Warning::ScaleClamped { .. }))
    }

    pub fn reprojection_degraded(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| matches!(w, Warning::ReprojectionDrift { .. } | Warning::AreaDrift { .. }))
    }
}
