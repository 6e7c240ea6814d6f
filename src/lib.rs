pub mod editor;
pub mod summary;

pub use editor::{EditInput, TerrainEditor};
pub use summary::GlobeSummary;
