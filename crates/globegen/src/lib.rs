pub mod config;
pub mod constants;
pub mod error;
pub mod floodfill;
pub mod globe;
pub mod grid;
pub mod prelude;
pub mod tools;

pub use config::{DEFAULT_CONFIG_PATH, GlobeGenConfig};
pub use error::{GlobeError, GlobeResult};
pub use globe::{Globe, GlobeGenerator};
