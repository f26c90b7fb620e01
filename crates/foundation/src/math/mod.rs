pub mod projection;
pub mod spherical;
pub mod vec;

pub use projection::*;
pub use spherical::*;
pub use vec::*;
