pub mod config;
pub mod error;
pub mod globe;
pub mod static_scene;

pub use config::*;
pub use error::*;
pub use globe::*;
pub use static_scene::*;
