//! Final map window derivation.
//!
//! The viewport is the real-world rectangle the panel will display. It is
//! sized from the chosen scale, floored so it can never be smaller than the
//! data it must contain, reconciled to the panel's aspect ratio by
//! expansion only (shrinking an axis could re-exclude features), and
//! centered on the extent's centroid. The containment invariant — extent
//! inside viewport with nonnegative margin on all four sides — is the
//! single most important property of this engine.

use serde::Serialize;

use foundation::bounds::Bounds2;

use crate::scale::PanelSize;

/// Fully determines the rendered map window in working-CRS meters.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct ViewportSpec {
    pub center: [f64; 2],
    pub half_width_m: f64,
    pub half_height_m: f64,
    pub scale_denominator: u32,
}

impl ViewportSpec {
    pub fn bounds(&self) -> Bounds2 {
        Bounds2::new(
            [
                self.center[0] - self.half_width_m,
                self.center[1] - self.half_height_m,
            ],
            [
                self.center[0] + self.half_width_m,
                self.center[1] + self.half_height_m,
            ],
        )
    }

    pub fn contains(&self, extent: &Bounds2) -> bool {
        self.bounds().contains(extent)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewportConfig {
    /// Floor multiplier on the extent per axis, applied even when scale
    /// rounding alone would not leave room.
    pub minimum_buffer: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        ViewportConfig {
            minimum_buffer: 1.2,
        }
    }
}

pub fn compute_viewport(
    extent: &Bounds2,
    scale_denominator: u32,
    panel: &PanelSize,
    config: &ViewportConfig,
) -> ViewportSpec {
    let scale = f64::from(scale_denominator);

    // Window implied by the scale, floored by the buffered extent.
    let mut width = (scale * panel.width_m()).max(extent.width() * config.minimum_buffer);
    let mut height = (scale * panel.height_m()).max(extent.height() * config.minimum_buffer);

    // Reconcile to the panel aspect ratio by growing the non-binding axis.
    let aspect = panel.aspect_ratio();
    if width / height > aspect {
        height = width / aspect;
    } else {
        width = height * aspect;
    }

    ViewportSpec {
        center: extent.center(),
        half_width_m: width / 2.0,
        half_height_m: height / 2.0,
        scale_denominator,
    }
}
