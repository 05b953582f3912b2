pub mod labels;
pub mod palette;

pub use labels::{LabelClass, LabelSizeTable, feature_area_m2, label_anchor};
pub use palette::{BASE_PALETTE, ColorAssignment, ENHANCED_PALETTE};
