//! The full framing pipeline: normalize → filter → extent → scale →
//! viewport, plus color assignment and per-feature label classes, with
//! every recoverable fallback collected into [`Diagnostics`] and logged.

use tracing::{debug, warn};

use foundation::bounds::Bounds2;
use formats::{Crs, CrsKind, FeatureCollection};
use symbology::labels::{LabelClass, LabelSizeTable, feature_area_m2, label_anchor};
use symbology::palette::{BASE_PALETTE, ColorAssignment, ENHANCED_PALETTE, attribute_key};

use crate::crs::{VerifyConfig, normalize};
use crate::diagnostics::{Diagnostics, Warning};
use crate::error::FramingError;
use crate::extent::resolve_extent;
use crate::filter::{FilterOutcome, FilterSpec, apply as apply_filter};
use crate::scale::{PanelSize, ScaleChoice, ScaleConfig, select_scale};
use crate::viewport::{ViewportConfig, ViewportSpec, compute_viewport};

/// Attribute column used for fill colors when the request names neither a
/// filter nor a color attribute.
pub const SUBDIVISION_ATTRIBUTE: &str = "SUB_DIVISI";

#[derive(Debug, Clone, PartialEq)]
pub struct FramingRequest {
    pub filter: Option<FilterSpec>,
    /// Attribute whose values drive fill colors; defaults to the filter
    /// attribute, then to [`SUBDIVISION_ATTRIBUTE`].
    pub color_attribute: Option<String>,
    /// Attribute providing label text (e.g. a block code column).
    pub label_attribute: Option<String>,
    pub panel: PanelSize,
    pub scale: ScaleConfig,
    pub viewport: ViewportConfig,
    pub label_sizes: LabelSizeTable,
    /// Round-trip verification tolerance override; `None` uses the
    /// per-CRS-kind defaults.
    pub verify: Option<VerifyConfig>,
}

impl Default for FramingRequest {
    fn default() -> Self {
        FramingRequest {
            filter: None,
            color_attribute: None,
            label_attribute: None,
            panel: PanelSize::default(),
            scale: ScaleConfig::default(),
            viewport: ViewportConfig::default(),
            label_sizes: LabelSizeTable::default(),
            verify: None,
        }
    }
}

/// Sizing and placement for one feature's label, in working-CRS meters.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureLabel {
    pub feature_id: Option<String>,
    /// Text from the requested label attribute; `None` when the feature
    /// has no value there (the renderer skips those).
    pub text: Option<String>,
    pub anchor: Option<[f64; 2]>,
    pub area_m2: f64,
    pub class: LabelClass,
}

/// Everything the rendering layer needs to draw the page.
#[derive(Debug, Clone, PartialEq)]
pub struct FramingReport {
    /// Filtered features in the working projected CRS; drives drawing.
    pub working: FeatureCollection,
    /// The same features in EPSG:4326 for WGS84-consuming outputs.
    pub geographic: FeatureCollection,
    pub source_crs: Crs,
    pub filter_fell_back: bool,
    pub extent: Bounds2,
    pub scale: ScaleChoice,
    pub viewport: ViewportSpec,
    pub colors: ColorAssignment,
    pub labels: Vec<FeatureLabel>,
    pub diagnostics: Diagnostics,
}

pub fn frame(
    collection: &FeatureCollection,
    request: &FramingRequest,
) -> Result<FramingReport, FramingError> {
    let mut diagnostics = Diagnostics::new();

    let normalized = normalize(collection, request.verify, &mut diagnostics)?;
    if let Some(Warning::MissingCrs { assumed }) = diagnostics.warnings.first() {
        warn!(%assumed, "dataset carries no CRS, assuming geographic default");
    }

    let (working, geographic, filter_fell_back) = match &request.filter {
        Some(spec) => {
            let FilterOutcome {
                collection: working,
                kept,
                fell_back,
                matched,
            } = apply_filter(&normalized.working, spec, &mut diagnostics);
            if fell_back {
                warn!(
                    attribute = %spec.attribute,
                    requested = spec.values.len(),
                    "attribute filter matched nothing, keeping full collection"
                );
            } else {
                debug!(attribute = %spec.attribute, matched, "attribute filter applied");
            }
            let geographic = FeatureCollection::new(
                normalized.geographic.crs,
                kept.iter()
                    .map(|&i| normalized.geographic.features[i].clone())
                    .collect(),
            );
            (working, geographic, fell_back)
        }
        None => (normalized.working, normalized.geographic, false),
    };

    // A collection with features but no vertices has nothing to frame.
    let extent = resolve_extent(&working).ok_or(FramingError::EmptyCollection)?;

    let scale = select_scale(&extent, &request.panel, &request.scale, &mut diagnostics);
    if scale.clamped {
        warn!(
            required = scale.required,
            denominator = scale.denominator,
            "extent exceeds scale catalog, clamping to maximum"
        );
    } else {
        debug!(denominator = scale.denominator, "scale selected");
    }

    let viewport = compute_viewport(&extent, scale.denominator, &request.panel, &request.viewport);
    debug_assert!(viewport.contains(&extent));

    // An explicitly chosen attribute gets the enhanced palette; otherwise
    // fall back to subdivision coloring with the base palette so a default
    // render still has fills and a legend.
    let (color_attribute, palette): (&str, &'static [&'static str]) = match request
        .color_attribute
        .as_deref()
        .or(request.filter.as_ref().map(|f| f.attribute.as_str()))
    {
        Some(attribute) => (attribute, &ENHANCED_PALETTE),
        None => (SUBDIVISION_ATTRIBUTE, &BASE_PALETTE),
    };
    let colors = ColorAssignment::for_attribute(&working, color_attribute, palette);
    if colors.cycled() {
        diagnostics.push(Warning::PaletteCycled {
            unique_values: colors.len(),
            palette_size: palette.len(),
        });
        warn!(
            attribute = color_attribute,
            unique_values = colors.len(),
            "more attribute values than palette colors, cycling"
        );
    }

    let labels = build_labels(&working, request);

    Ok(FramingReport {
        working,
        geographic,
        source_crs: normalized.source_crs,
        filter_fell_back,
        extent,
        scale,
        viewport,
        colors,
        labels,
        diagnostics,
    })
}

fn build_labels(working: &FeatureCollection, request: &FramingRequest) -> Vec<FeatureLabel> {
    working
        .features
        .iter()
        .map(|feature| {
            let area_m2 = feature_area_m2(&feature.geometry, CrsKind::Projected);
            let text = request
                .label_attribute
                .as_deref()
                .and_then(|attr| feature.attribute(attr))
                .and_then(attribute_key);
            FeatureLabel {
                feature_id: feature.id.clone(),
                text,
                anchor: label_anchor(&feature.geometry),
                area_m2,
                class: request.label_sizes.class_for_area(area_m2),
            }
        })
        .collect()
}
