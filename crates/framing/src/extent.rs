//! Extent resolution: the exact union bounding box of a collection.
//!
//! This is a plain min/max fold over every vertex. No convex hull, no
//! simplified geometry — any approximation could shave off a true extremum
//! and let the viewport crop a feature.

use foundation::bounds::Bounds2;
use formats::FeatureCollection;

/// `None` only when no feature contributes a vertex.
pub fn resolve_extent(collection: &FeatureCollection) -> Option<Bounds2> {
    collection.bounds()
}
