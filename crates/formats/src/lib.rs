pub mod dataset;
pub mod geojson;

pub use dataset::*;
pub use geojson::*;
