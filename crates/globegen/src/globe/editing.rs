//! Interactive terrain edits on a finished globe.
//!
//! Each edit moves one tile a single height step and then repairs the water
//! around it, so that every lake tile stays below its water level and every
//! beach keeps touching a lake.

use crate::floodfill::Floodfill;
use crate::globe::Globe;
use crate::grid::tile::{Surface, SurfaceType, Tile, TileId};

/// Tiles whose render data is stale after an edit, sorted and without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditOutcome {
    pub changed: Vec<TileId>,
}

impl EditOutcome {
    fn new(mut changed: Vec<TileId>) -> Self {
        changed.sort_unstable();
        changed.dedup();
        Self { changed }
    }

    pub fn is_empty(&self) -> bool {
        self.changed.is_empty()
    }
}

impl Globe {
    /// Raises `id` by one height step. A lake tile that ends up above its
    /// water surface becomes shore, and shore left without a lake next to it
    /// dries out.
    ///
    /// `id` must belong to this globe.
    pub fn raise_tile(&mut self, id: TileId) -> EditOutcome {
        let step = self.editing.height_step;
        let mut changed = self.shift_tile(id, step);

        let tile = &mut self.tiles[id.index()];
        if tile.surface.is_lake() && tile.position.length() > tile.surface.water_level {
            tile.surface = Surface::beach(tile.surface.water_level);

            let dried: Vec<TileId> = {
                let tiles = &self.tiles;
                let stranded = |t: &Tile| {
                    t.surface.kind == SurfaceType::Beach
                        && !t.neighbours.iter().any(|n| tiles[n.index()].surface.is_lake())
                };
                let mut fill = Floodfill::new(tiles, id, &stranded);
                fill.find_all(false);
                // the origin is part of the fill even when it still touches a lake
                fill.found_tiles()
                    .iter()
                    .copied()
                    .filter(|found| stranded(&tiles[found.index()]))
                    .collect()
            };

            for found in &dried {
                self.tiles[found.index()].surface = Surface::LAND;
            }
            log::debug!("raised lake tile {id} out of the water, {} tiles dried", dried.len());
            changed.extend(dried);
        }
        EditOutcome::new(changed)
    }

    /// Lowers `id` by one height step. Water or shore that sinks below its
    /// water level floods every connected tile below that level.
    ///
    /// `id` must belong to this globe.
    pub fn lower_tile(&mut self, id: TileId) -> EditOutcome {
        let step = self.editing.height_step;
        let mut changed = self.shift_tile(id, -step);

        let tile = &self.tiles[id.index()];
        if !tile.surface.is_land() && tile.position.length() < tile.surface.water_level {
            let level = tile.surface.water_level;
            let mut fill = Floodfill::new(&self.tiles, id, |t: &Tile| {
                !t.surface.is_lake() && t.position.length() < level
            });
            fill.find_all(true);
            let (flooded, shore) = fill.into_parts();

            for found in &flooded {
                self.tiles[found.index()].surface = Surface::lake(level);
            }
            for edge in &shore {
                let tile = &mut self.tiles[edge.index()];
                if !tile.surface.is_lake() {
                    tile.surface = Surface::beach(level);
                }
            }
            log::debug!("lowered tile {id} below the water, {} tiles flooded", flooded.len());
            changed.extend(flooded);
            changed.extend(shore);
        }
        EditOutcome::new(changed)
    }

    /// Moves a tile `delta` along its normal, reclassifies its biome and
    /// refits the bounds of its chunk. Returns the tile and its neighbours.
    fn shift_tile(&mut self, id: TileId, delta: f32) -> Vec<TileId> {
        let tile = &mut self.tiles[id.index()];
        tile.height += delta;
        let length = tile.position.length();
        tile.position = tile.position.normalize_or_zero() * (length + delta);
        self.biomes.apply_to_tile(tile);

        let mut changed = Vec::with_capacity(tile.neighbours.len() + 1);
        changed.push(id);
        changed.extend_from_slice(&tile.neighbours);

        let chunk = tile.chunk;
        self.chunks[chunk.index()].recompute_bounds(&self.tiles, self.bounds_inflation);
        changed
    }
}
