pub mod biome;
pub mod editing;
pub mod moisture;
pub mod plates;
pub mod terrain;
pub mod water;

use crate::config::{EditingConfig, GlobeGenConfig};
use crate::error::{GlobeError, GlobeResult};
use crate::grid::chunk::TriangularChunk;
use crate::grid::icosphere::{IcosahedralSphere, SphereGrid};
use crate::grid::tile::{ChunkId, Tile, TileId};
use crate::tools::generate_seed8;
use biome::BiomeGenerator;
use moisture::MoistureGenerator;
use plates::{Plate, PlateGenerator};
use std::f32::consts::TAU;
use std::time::Instant;
use terrain::TerrainGenerator;
use water::WaterGenerator;

/// The equator of an icosahedral sphere spans five face edges.
const FACE_EDGES_PER_EQUATOR: u32 = 5;

/// Settings for one globe. Fields default to the `globe` section of the
/// configuration and can be overridden before calling [`generate`](Self::generate).
#[derive(Debug, Clone)]
pub struct GlobeGenerator {
    pub equator_length: u32,
    pub chunk_divisions: u32,
    pub seed: Option<u32>,
    pub land_plates: usize,
    pub water_plates: usize,
    pub config: GlobeGenConfig,
}

impl Default for GlobeGenerator {
    fn default() -> Self {
        Self::from_config(GlobeGenConfig::default())
    }
}

impl GlobeGenerator {
    pub fn from_config(config: GlobeGenConfig) -> Self {
        Self {
            equator_length: config.globe.equator_length,
            chunk_divisions: config.globe.chunk_divisions,
            seed: config.globe.seed,
            land_plates: config.globe.land_plates,
            water_plates: config.globe.water_plates,
            config,
        }
    }

    pub fn radius(&self) -> f32 {
        self.equator_length as f32 / TAU
    }

    pub fn face_size(&self) -> u32 {
        self.equator_length / FACE_EDGES_PER_EQUATOR
    }

    /// Runs the whole pipeline: topology, plates, heights, water, moisture,
    /// biomes, and finally lifts every tile to its height.
    pub fn generate(&self) -> GlobeResult<Globe> {
        self.config.validate_stages()?;
        if self.land_plates + self.water_plates == 0 {
            return Err(GlobeError::InvalidConfig("at least one plate is required".to_string()));
        }

        let start = Instant::now();
        let seed = self.seed.unwrap_or_else(|| {
            let seed = generate_seed8();
            log::info!("no seed configured, using random seed {seed}");
            seed
        });
        let radius = self.radius();
        let config = &self.config;

        let sphere = IcosahedralSphere::new(self.face_size(), radius, config.grid.stitch_tolerance)?;
        let SphereGrid { mut tiles, mut chunks } =
            sphere.get_chunks(self.chunk_divisions, config.grid.bounds_inflation)?;
        log::info!(
            "built sphere grid: {} tiles in {} chunks, radius {:.2}",
            tiles.len(),
            chunks.len(),
            radius
        );

        let plates = PlateGenerator::new(seed).generate(tiles.len(), self.land_plates, self.water_plates);
        log::debug!(
            "plate origins: {:?}",
            plates.iter().map(|p| (p.kind, p.origin.0)).collect::<Vec<_>>()
        );

        TerrainGenerator::new(seed, radius, &config.terrain).generate(&mut tiles, &plates);
        log::info!("generated heights for {} plates", plates.len());

        let flooded = WaterGenerator::new(radius, &config.water).generate(&mut tiles, &plates);
        log::info!("flooded {flooded} tiles");

        MoistureGenerator::new(&config.moisture).generate(&mut tiles, &chunks);
        log::info!("diffused moisture");

        let biomes = BiomeGenerator::new(seed, config.biome.clone());
        biomes.apply(&mut tiles);

        for tile in tiles.iter_mut() {
            tile.position = tile.base_position.normalize() * (tile.height + radius);
        }
        for chunk in chunks.iter_mut() {
            chunk.recompute_bounds(&tiles, config.grid.bounds_inflation);
        }

        log::info!("globe generated in {:.2?} (seed {seed})", start.elapsed());
        Ok(Globe {
            radius,
            seed,
            tiles,
            chunks,
            plates,
            biomes,
            editing: config.editing.clone(),
            bounds_inflation: config.grid.bounds_inflation,
        })
    }
}

/// A generated planet: the tile arena, the chunks partitioning it and the
/// plates it was shaped from.
#[derive(Debug)]
pub struct Globe {
    radius: f32,
    seed: u32,
    tiles: Vec<Tile>,
    chunks: Vec<TriangularChunk>,
    plates: Vec<Plate>,
    biomes: BiomeGenerator,
    editing: EditingConfig,
    bounds_inflation: f32,
}

impl Globe {
    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id.index())
    }

    pub fn tile_ids(&self) -> impl Iterator<Item = TileId> {
        (0..self.tiles.len() as u32).map(TileId)
    }

    pub fn chunks(&self) -> &[TriangularChunk] {
        &self.chunks
    }

    pub fn chunk(&self, id: ChunkId) -> Option<&TriangularChunk> {
        self.chunks.get(id.index())
    }

    pub fn plates(&self) -> &[Plate] {
        &self.plates
    }
}
