pub mod crs;
pub mod diagnostics;
pub mod error;
pub mod extent;
pub mod filter;
pub mod pipeline;
pub mod scale;
pub mod viewport;

pub use crs::{NormalizedCollection, VerifyConfig, normalize};
pub use diagnostics::{Diagnostics, Warning};
pub use error::FramingError;
pub use extent::resolve_extent;
pub use filter::{FilterOutcome, FilterSpec};
pub use pipeline::{FeatureLabel, FramingReport, FramingRequest, SUBDIVISION_ATTRIBUTE, frame};
pub use scale::{PROFESSIONAL_SCALES, PanelSize, ScaleChoice, ScaleConfig, select_scale};
pub use viewport::{ViewportConfig, ViewportSpec, compute_viewport};
