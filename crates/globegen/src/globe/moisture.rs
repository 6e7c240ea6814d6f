use crate::config::MoistureConfig;
use crate::grid::chunk::TriangularChunk;
use crate::grid::tile::{ChunkId, Moisture, Tile};
use std::collections::BTreeMap;

/// Water balance of one chunk during the coarse phase.
#[derive(Debug, Clone)]
struct ChunkMoisture {
    state: Moisture,
    water_fraction: f32,
    tile_count: usize,
    /// Number of tile adjacencies crossing into each neighbouring chunk.
    connections: BTreeMap<ChunkId, u32>,
    connection_count: u32,
}

impl ChunkMoisture {
    fn new(chunk: &TriangularChunk, tiles: &[Tile], base_moisture: f32) -> Self {
        let mut water_tiles = 0;
        let mut connections = BTreeMap::new();
        let mut connection_count = 0;
        for id in chunk.tiles() {
            let tile = &tiles[id.index()];
            if !tile.surface.is_land() {
                water_tiles += 1;
            }
            for neighbour in &tile.neighbours {
                let other = tiles[neighbour.index()].chunk;
                if other != chunk.id {
                    *connections.entry(other).or_insert(0) += 1;
                    connection_count += 1;
                }
            }
        }
        let tile_count = chunk.len();
        let water_fraction = if tile_count == 0 {
            0.0
        } else {
            water_tiles as f32 / tile_count as f32
        };
        Self {
            state: Moisture::new(0.0, base_moisture + water_fraction),
            water_fraction,
            tile_count,
            connections,
            connection_count,
        }
    }

    /// Share of the chunk's own moisture a tile keeps: the part not exposed
    /// along chunk borders.
    fn land_factor(&self) -> f32 {
        if self.tile_count == 0 {
            return 0.0;
        }
        let interior = self.tile_count as f32 - self.connection_count as f32;
        (interior / self.tile_count as f32).clamp(0.0, 1.0)
    }
}

/// Two-phase moisture diffusion.
///
/// A coarse pass over the chunk graph moves water between regions cheaply; its
/// result seeds every tile, and a fine pass over the tile graph then lets
/// water evaporate, rain, run downhill and seep sideways. Every round reads
/// the previous round's values only.
pub struct MoistureGenerator {
    config: MoistureConfig,
}

impl MoistureGenerator {
    pub fn new(config: &MoistureConfig) -> Self {
        Self { config: config.clone() }
    }

    pub fn generate(&self, tiles: &mut [Tile], chunks: &[TriangularChunk]) {
        let regions = self.diffuse_chunks(tiles, chunks);
        self.distribute_to_tiles(tiles, chunks, &regions);
        for _ in 0..self.config.tile_rounds {
            self.evolve_tiles(tiles);
        }
        self.smooth(tiles);
    }

    fn diffuse_chunks(&self, tiles: &[Tile], chunks: &[TriangularChunk]) -> Vec<ChunkMoisture> {
        let mut regions: Vec<ChunkMoisture> = chunks
            .iter()
            .map(|chunk| ChunkMoisture::new(chunk, tiles, self.config.base_chunk_moisture))
            .collect();

        for _ in 0..self.config.chunk_rounds {
            let mut next = vec![Moisture::default(); regions.len()];
            for (i, region) in regions.iter().enumerate() {
                let Moisture { mut clouds, mut moisture } = region.state;

                let evaporation = moisture * self.config.evaporation * region.water_fraction;
                moisture -= evaporation;
                clouds += evaporation;
                let rainfall = clouds * self.config.rainfall;
                clouds -= rainfall;
                moisture += rainfall;

                if region.connection_count == 0 {
                    next[i].clouds += clouds;
                    next[i].moisture += moisture;
                    continue;
                }

                let seepage = moisture * self.config.seepage;
                next[i].moisture += moisture - seepage;
                let total = region.connection_count as f32;
                for (other, count) in &region.connections {
                    let share = *count as f32 / total;
                    next[other.index()].clouds += clouds * share;
                    next[other.index()].moisture += seepage * share;
                }
            }
            for (region, state) in regions.iter_mut().zip(next) {
                region.state = state;
            }
        }
        regions
    }

    fn distribute_to_tiles(&self, tiles: &mut [Tile], chunks: &[TriangularChunk], regions: &[ChunkMoisture]) {
        let centers: Vec<_> = chunks.iter().map(|c| c.center()).collect();
        for (chunk, region) in chunks.iter().zip(regions) {
            let own = region.state;
            let kept = own.moisture * region.land_factor();
            for id in chunk.tiles() {
                let tile = &mut tiles[id.index()];
                if tile.surface.is_lake() {
                    tile.moisture = own;
                    continue;
                }
                let mut moisture = kept;
                for (other, count) in &region.connections {
                    let distance = tile
                        .position
                        .distance(centers[other.index()])
                        .max(self.config.min_center_distance);
                    moisture += regions[other.index()].state.moisture * *count as f32
                        / region.connection_count as f32
                        / distance;
                }
                tile.moisture = Moisture::new(moisture, moisture);
            }
        }
    }

    fn evolve_tiles(&self, tiles: &mut [Tile]) {
        let mut next = vec![Moisture::default(); tiles.len()];
        for (i, tile) in tiles.iter().enumerate() {
            let Moisture { mut clouds, mut moisture } = tile.moisture;

            let evaporation = moisture * self.config.evaporation;
            moisture -= evaporation;
            clouds += evaporation;
            let rainfall = clouds * self.config.rainfall;
            clouds -= rainfall;
            moisture += rainfall;

            let degree = tile.neighbours.len();
            if degree == 0 {
                next[i].clouds += clouds;
                next[i].moisture += moisture;
                continue;
            }
            let runoff = moisture * self.config.runoff / degree as f32;
            let seepage = moisture * self.config.seepage / degree as f32;
            let dispersal = clouds / degree as f32;
            for neighbour in &tile.neighbours {
                let height = tiles[neighbour.index()].height;
                let flow = if height == tile.height {
                    seepage
                } else if height < tile.height {
                    runoff
                } else {
                    0.0
                };
                moisture -= flow;
                next[neighbour.index()].moisture += flow;
                next[neighbour.index()].clouds += dispersal;
            }
            next[i].moisture += moisture;
        }
        for (tile, moisture) in tiles.iter_mut().zip(next) {
            tile.moisture = moisture;
        }
        self.saturate_lakes(tiles);
    }

    /// One averaging pass over each tile and its neighbours.
    fn smooth(&self, tiles: &mut [Tile]) {
        let averaged: Vec<Moisture> = tiles
            .iter()
            .map(|tile| {
                let mut sum = tile.moisture;
                for neighbour in &tile.neighbours {
                    let m = tiles[neighbour.index()].moisture;
                    sum.clouds += m.clouds;
                    sum.moisture += m.moisture;
                }
                let count = (tile.neighbours.len() + 1) as f32;
                Moisture::new(sum.clouds / count, sum.moisture / count)
            })
            .collect();
        for (tile, moisture) in tiles.iter_mut().zip(averaged) {
            tile.moisture = moisture;
        }
        self.saturate_lakes(tiles);
    }

    fn saturate_lakes(&self, tiles: &mut [Tile]) {
        for tile in tiles.iter_mut().filter(|t| t.surface.is_lake()) {
            tile.moisture.moisture = self.config.max_moisture;
        }
    }
}
