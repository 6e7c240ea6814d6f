//! Biome classification from temperature and moisture bands.
//!
//! Temperature falls off from the equator towards the poles and with height;
//! a small noise jitter breaks up the band borders.

use crate::config::{BiomeConfig, NoiseConfig};
use crate::grid::tile::Tile;
use crate::tools::derive_seed;
use glam::Vec3;

const JITTER_SALT: u64 = 0xB10E;
const BAND_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Biome {
    #[default]
    Tundra,
    Glacier,
    Desert,
    Forest,
    Grassland,
}

impl Biome {
    pub const ALL: [Biome; 5] = [
        Biome::Tundra,
        Biome::Glacier,
        Biome::Desert,
        Biome::Forest,
        Biome::Grassland,
    ];

    /// Debug color of the biome, RGBA in [0.0, 1.0].
    pub fn color(self) -> [f32; 4] {
        match self {
            Biome::Tundra => [0.83, 0.83, 0.83, 1.0],
            Biome::Glacier => [1.0, 1.0, 1.0, 1.0],
            Biome::Desert => [0.96, 0.64, 0.38, 1.0],
            Biome::Forest => [0.13, 0.55, 0.13, 1.0],
            Biome::Grassland => [0.0, 0.5, 0.0, 1.0],
        }
    }
}

/// Rows: temperature band (cold to hot). Columns: moisture band (dry to wet).
const BIOME_TABLE: [[Biome; BAND_COUNT]; BAND_COUNT] = {
    use Biome::*;
    [
        [Tundra, Glacier, Glacier, Glacier],
        [Tundra, Tundra, Tundra, Tundra],
        [Desert, Forest, Forest, Grassland],
        [Desert, Forest, Grassland, Grassland],
    ]
};

#[derive(Debug, Clone)]
pub struct BiomeGenerator {
    jitter: NoiseConfig,
    config: BiomeConfig,
}

impl BiomeGenerator {
    pub fn new(seed: u32, config: BiomeConfig) -> Self {
        Self {
            jitter: NoiseConfig::new(derive_seed(seed, JITTER_SALT), 1.0, config.jitter_amplitude),
            config,
        }
    }

    pub fn apply(&self, tiles: &mut [Tile]) {
        for tile in tiles.iter_mut() {
            self.apply_to_tile(tile);
        }
    }

    pub fn apply_to_tile(&self, tile: &mut Tile) {
        tile.biome = self.classify(tile);
        tile.color = tile.biome.color();
    }

    pub fn classify(&self, tile: &Tile) -> Biome {
        let t = band(self.temperature(tile), &self.config.temperature_bands);
        let m = band(tile.moisture.moisture, &self.config.moisture_bands);
        BIOME_TABLE[t][m]
    }

    /// Sampled at the base position so edits that move a tile only change
    /// the elevation term.
    pub fn temperature(&self, tile: &Tile) -> f32 {
        let latitude = Vec3::Y.dot(tile.base_position.normalize_or_zero()).abs();
        self.config.equator_temperature * (1.0 - latitude)
            + self.config.pole_temperature * latitude
            + tile.height * self.config.elevation_cooldown
            + self.jitter.sample(tile.base_position)
    }
}

/// Index of the first band whose upper limit exceeds `value`.
fn band(value: f32, limits: &[f32]) -> usize {
    limits
        .iter()
        .position(|limit| value < *limit)
        .unwrap_or(limits.len())
        .min(BAND_COUNT - 1)
}
