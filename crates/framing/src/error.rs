use formats::Crs;

/// Fatal pipeline errors. Everything recoverable is reported through
/// [`crate::diagnostics::Diagnostics`] instead.
#[derive(Debug)]
pub enum FramingError {
    /// No features at all before filtering; there is nothing to frame.
    EmptyCollection,
    /// The dataset's CRS is not one this engine can transform.
    UnsupportedCrs { crs: Crs },
    /// Reprojection produced non-finite coordinates.
    Projection { detail: String },
}

impl std::fmt::Display for FramingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FramingError::EmptyCollection => {
                write!(f, "feature collection contains no features")
            }
            FramingError::UnsupportedCrs { crs } => {
                write!(f, "unsupported coordinate reference system: {crs}")
            }
            FramingError::Projection { detail } => {
                write!(f, "reprojection failed: {detail}")
            }
        }
    }
}

impl std::error::Error for FramingError {}
