pub mod ellipsoid;
pub mod tmerc;

pub use ellipsoid::*;
pub use tmerc::*;
