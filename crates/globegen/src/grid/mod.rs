pub mod chunk;
pub mod coordinate;
pub mod icosphere;
pub mod tile;

pub use chunk::{ChunkBounds, LatticeFrame, TriangularChunk};
pub use coordinate::{GridCoordinate, HEX_DIRECTIONS};
pub use icosphere::{IcosahedralSphere, SphereGrid};
pub use tile::{ChunkId, Moisture, Surface, SurfaceType, Tile, TileId};
