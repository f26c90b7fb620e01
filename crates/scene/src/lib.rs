pub mod geometry;
pub mod graticule;
pub mod land;

pub use geometry::*;
pub use graticule::*;
pub use land::*;
