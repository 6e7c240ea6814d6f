use crate::config::WaterConfig;
use crate::constants::SEA_LEVEL;
use crate::floodfill::Floodfill;
use crate::globe::plates::{Plate, PlateType};
use crate::grid::tile::{Surface, Tile, TileId};

/// Floods the low ground around every water plate.
pub struct WaterGenerator {
    water_level: f32,
    search_depth: u32,
}

impl WaterGenerator {
    pub fn new(radius: f32, config: &WaterConfig) -> Self {
        Self {
            water_level: radius + config.freeboard,
            search_depth: config.search_depth,
        }
    }

    /// Returns the number of tiles turned into lake.
    pub fn generate(&self, tiles: &mut [Tile], plates: &[Plate]) -> usize {
        let mut flooded = 0;
        for plate in plates.iter().filter(|p| p.kind == PlateType::Water) {
            let Some(origin) = find_sea_level_tile(tiles, plate.origin, self.search_depth) else {
                log::debug!("water plate at {} has no sea level tile nearby", plate.origin);
                continue;
            };
            if !tiles[origin.index()].surface.is_land() {
                continue;
            }
            flooded += self.create_sea(tiles, origin);
        }
        flooded
    }

    fn create_sea(&self, tiles: &mut [Tile], origin: TileId) -> usize {
        let mut fill = Floodfill::new(tiles, origin, |t: &Tile| t.height <= SEA_LEVEL);
        fill.find_all(true);
        let (found, edges) = fill.into_parts();

        for id in &found {
            tiles[id.index()].surface = Surface::lake(self.water_level);
        }
        for id in edges {
            let tile = &mut tiles[id.index()];
            if !tile.surface.is_lake() {
                tile.surface = Surface::beach(self.water_level);
            }
        }
        found.len()
    }
}

/// Depth-first search for a tile at or below sea level within `depth` hops.
fn find_sea_level_tile(tiles: &[Tile], origin: TileId, depth: u32) -> Option<TileId> {
    if tiles[origin.index()].height <= SEA_LEVEL {
        return Some(origin);
    }
    if depth == 0 {
        return None;
    }
    tiles[origin.index()]
        .neighbours
        .iter()
        .find_map(|n| find_sea_level_tile(tiles, *n, depth - 1))
}
