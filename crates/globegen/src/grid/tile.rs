use crate::globe::biome::Biome;
use crate::grid::coordinate::GridCoordinate;
use glam::Vec3;
use std::fmt;

/// Handle of a tile in the globe's tile arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub u32);

impl TileId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle of a chunk in the globe's chunk list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkId(pub u32);

impl ChunkId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Moisture {
    pub clouds: f32,
    pub moisture: f32,
}

impl Moisture {
    pub fn new(clouds: f32, moisture: f32) -> Self {
        Self { clouds, moisture }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SurfaceType {
    #[default]
    Land,
    Lake,
    Beach,
    River,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Surface {
    pub kind: SurfaceType,
    /// Radius of the water surface; only meaningful for water and shore tiles.
    pub water_level: f32,
}

impl Surface {
    pub const LAND: Self = Self {
        kind: SurfaceType::Land,
        water_level: 0.0,
    };

    pub fn lake(water_level: f32) -> Self {
        Self {
            kind: SurfaceType::Lake,
            water_level,
        }
    }

    pub fn beach(water_level: f32) -> Self {
        Self {
            kind: SurfaceType::Beach,
            water_level,
        }
    }

    pub fn is_lake(&self) -> bool {
        self.kind == SurfaceType::Lake
    }

    pub fn is_land(&self) -> bool {
        self.kind == SurfaceType::Land
    }
}

/// One cell of the planetary tiling.
#[derive(Debug, Clone)]
pub struct Tile {
    pub base_position: Vec3,
    pub position: Vec3,
    pub coordinates: GridCoordinate,
    /// Closed cyclic walk of adjacent tiles.
    pub neighbours: Vec<TileId>,
    pub height: f32,
    pub moisture: Moisture,
    pub surface: Surface,
    pub biome: Biome,
    pub color: [f32; 4],
    pub chunk: ChunkId,
}

impl Tile {
    pub fn new(base_position: Vec3, coordinates: GridCoordinate, chunk: ChunkId) -> Self {
        Self {
            base_position,
            position: base_position,
            coordinates,
            neighbours: Vec::with_capacity(6),
            height: 0.0,
            moisture: Moisture::default(),
            surface: Surface::LAND,
            biome: Biome::default(),
            color: Biome::default().color(),
            chunk,
        }
    }

    pub fn has_neighbour(&self, tile: TileId) -> bool {
        self.neighbours.contains(&tile)
    }

    /// Points every reference to `old` at `new`. When `new` is already a
    /// neighbour the reference to `old` is dropped instead of duplicated.
    pub fn replace_neighbour(&mut self, old: TileId, new: TileId) {
        if self.has_neighbour(new) {
            self.neighbours.retain(|n| *n != old);
        } else {
            for n in self.neighbours.iter_mut() {
                if *n == old {
                    *n = new;
                }
            }
        }
    }

    pub fn is_pentagon(&self) -> bool {
        self.neighbours.len() == 5
    }
}
