use crate::config::{NoiseConfig, TerrainConfig};
use crate::globe::plates::{Plate, PlateType};
use crate::grid::tile::Tile;
use crate::tools::{derive_seed, spherical_distance};
use glam::Vec3;

const RIDGE_SALTS: [u64; 2] = [0x5249_4447_4501, 0x5249_4447_4502];

/// Distance from a tile to one plate origin.
#[derive(Debug, Clone, Copy)]
struct PlateDistance {
    kind: PlateType,
    distance: f32,
}

/// Assigns every tile a height blended from the plates around it.
///
/// Each plate kind has its own noise profile; near plate seams the heights of
/// the nearest plates are mixed so continents slope into the sea instead of
/// ending in cliffs. Seams between two land plates additionally get a ridge.
pub struct TerrainGenerator {
    radius: f32,
    octaves: Vec<NoiseConfig>,
    ridge: [NoiseConfig; 2],
    config: TerrainConfig,
}

impl TerrainGenerator {
    pub fn new(seed: u32, radius: f32, config: &TerrainConfig) -> Self {
        let octaves = config
            .noise_wavelengths
            .iter()
            .map(|wavelength| NoiseConfig::with_wavelength(seed, *wavelength, 1.0))
            .collect();
        let ridge = RIDGE_SALTS.map(|salt| {
            NoiseConfig::with_wavelength(derive_seed(seed, salt), config.ridge_wavelength, 1.0)
        });
        Self {
            radius,
            octaves,
            ridge,
            config: config.clone(),
        }
    }

    pub fn generate(&self, tiles: &mut [Tile], plates: &[Plate]) {
        if plates.is_empty() {
            return;
        }
        let centers: Vec<(PlateType, Vec3)> = plates
            .iter()
            .map(|plate| (plate.kind, tiles[plate.origin.index()].base_position))
            .collect();

        for tile in tiles.iter_mut() {
            tile.height = self.tile_height(tile.base_position, &centers);
        }
    }

    fn tile_height(&self, position: Vec3, centers: &[(PlateType, Vec3)]) -> f32 {
        let distances = self.ordered_plate_distances(position, centers);
        let closest = distances[0];

        let mut height = self.plate_height(closest.kind, position);
        for other in &distances[1..] {
            let from_edge = other.distance - closest.distance;
            if from_edge >= self.config.edge_window {
                break;
            }
            let other_height = self.plate_height(other.kind, position);
            let weight = (from_edge / self.config.edge_window)
                .clamp(0.0, 1.0)
                .powf(self.config.blend_exponent);
            height = 0.5 * (1.0 + weight) * height + 0.5 * (1.0 - weight) * other_height;
        }

        let land_seam = distances
            .get(1)
            .filter(|second| closest.kind == PlateType::Land && second.kind == PlateType::Land);
        if let Some(second) = land_seam {
            height += self.ridge_height(position, second.distance - closest.distance);
        }

        height.floor()
    }

    fn ordered_plate_distances(&self, position: Vec3, centers: &[(PlateType, Vec3)]) -> Vec<PlateDistance> {
        let mut distances: Vec<PlateDistance> = centers
            .iter()
            .map(|(kind, center)| PlateDistance {
                kind: *kind,
                distance: spherical_distance(self.radius, position, *center),
            })
            .collect();
        distances.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        distances
    }

    fn plate_height(&self, kind: PlateType, position: Vec3) -> f32 {
        let (bias, scale) = match kind {
            PlateType::Land => (self.config.land_bias, self.config.land_scale),
            PlateType::Water => (self.config.water_bias, self.config.water_scale),
        };
        self.octaves
            .iter()
            .enumerate()
            .fold(bias, |height, (i, octave)| {
                height + scale * (octave.sample(position) / (i + 1) as f32 + 1.0)
            })
    }

    /// Ridge along the seam of two land plates, fading out over `ridge_width`.
    fn ridge_height(&self, position: Vec3, seam_distance: f32) -> f32 {
        if self.config.ridge_amplitude == 0.0 {
            return 0.0;
        }
        let falloff = 1.0 - (seam_distance / self.config.ridge_width).clamp(0.0, 1.0);
        let crest = self.ridge[0].sample(position).min(self.ridge[1].sample(position));
        self.config.ridge_amplitude * crest * crest * falloff
    }
}
