pub use crate::config::{GlobeGenConfig, NoiseConfig};
pub use crate::error::{GlobeError, GlobeResult};
pub use crate::floodfill::Floodfill;
pub use crate::globe::biome::Biome;
pub use crate::globe::editing::EditOutcome;
pub use crate::globe::plates::{Plate, PlateType};
pub use crate::globe::{Globe, GlobeGenerator};
pub use crate::grid::{ChunkId, GridCoordinate, Moisture, Surface, SurfaceType, Tile, TileId, TriangularChunk};
