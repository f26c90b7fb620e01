pub mod layer;
pub mod path;
pub mod raster;
pub mod symbology;
pub mod vector;

pub use layer::*;
pub use path::*;
pub use raster::*;
pub use symbology::*;
pub use vector::*;
