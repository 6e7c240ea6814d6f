use crate::error::{GlobeError, GlobeResult};
use glam::Vec3;
use noise::{NoiseFn, OpenSimplex};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "globegen_config.toml";

/// Seeded coherent noise scaled by a frequency and an amplitude.
///
/// Every noise lookup in the pipeline goes through this type so the same seed
/// and coordinates always give the same value.
#[derive(Debug, Clone)]
pub struct NoiseConfig {
    simplex: OpenSimplex,
    frequency: f32,
    amplitude: f32,
}

impl NoiseConfig {
    pub fn new(seed: u32, frequency: f32, amplitude: f32) -> Self {
        Self {
            simplex: OpenSimplex::new(seed),
            frequency,
            amplitude,
        }
    }

    /// Noise of a position whose features repeat roughly every `wavelength` units.
    pub fn with_wavelength(seed: u32, wavelength: f32, amplitude: f32) -> Self {
        Self::new(seed, 1.0 / wavelength, amplitude)
    }

    pub fn sample(&self, position: Vec3) -> f32 {
        let x = position.x * self.frequency;
        let y = position.y * self.frequency;
        let z = position.z * self.frequency;
        self.simplex.get([x as f64, y as f64, z as f64]) as f32 * self.amplitude
    }

    pub fn sample_2d(&self, x: f32, y: f32) -> f32 {
        let x = x * self.frequency;
        let y = y * self.frequency;
        self.simplex.get([x as f64, y as f64]) as f32 * self.amplitude
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobeGenConfig {
    pub globe: GlobeConfig,
    pub grid: GridConfig,
    pub terrain: TerrainConfig,
    pub water: WaterConfig,
    pub moisture: MoistureConfig,
    pub biome: BiomeConfig,
    pub editing: EditingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobeConfig {
    /// Number of tiles around the equator; the sphere radius is derived from it.
    pub equator_length: u32,
    /// How many times every icosahedron face chunk is split into four.
    pub chunk_divisions: u32,
    /// Fixed seed. A random one is drawn when absent.
    #[serde(default)]
    pub seed: Option<u32>,
    pub land_plates: usize,
    pub water_plates: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Distance (in lattice units, about one tile apart) under which two
    /// generated tiles are considered the same tile when stitching faces.
    pub stitch_tolerance: f32,
    /// Factor applied to a chunk's bounding sphere to cover curvature and relief.
    pub bounds_inflation: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainConfig {
    /// Plates further than this past the nearest plate do not influence a tile.
    pub edge_window: f32,
    pub blend_exponent: f32,
    /// Wavelength of each height octave, in world units.
    pub noise_wavelengths: Vec<f32>,
    pub land_bias: f32,
    pub land_scale: f32,
    pub water_bias: f32,
    pub water_scale: f32,
    /// Height added along seams between two land plates. Zero disables ridges.
    pub ridge_amplitude: f32,
    pub ridge_wavelength: f32,
    /// Distance from the seam over which the ridge fades out.
    pub ridge_width: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterConfig {
    /// Water surface height above the sphere radius.
    pub freeboard: f32,
    /// How many neighbour hops from a water plate origin to look for sea level.
    pub search_depth: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoistureConfig {
    pub chunk_rounds: usize,
    pub tile_rounds: usize,
    pub evaporation: f32,
    pub rainfall: f32,
    pub runoff: f32,
    pub seepage: f32,
    pub base_chunk_moisture: f32,
    pub max_moisture: f32,
    /// Lower bound for tile to chunk distances when spreading chunk moisture.
    pub min_center_distance: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiomeConfig {
    pub equator_temperature: f32,
    pub pole_temperature: f32,
    /// Temperature change per height tier (negative cools).
    pub elevation_cooldown: f32,
    pub jitter_amplitude: f32,
    /// Ascending upper limits of the first three temperature bands.
    pub temperature_bands: Vec<f32>,
    /// Ascending upper limits of the first three moisture bands.
    pub moisture_bands: Vec<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditingConfig {
    pub height_step: f32,
}

impl Default for GlobeGenConfig {
    fn default() -> Self {
        Self {
            globe: GlobeConfig {
                equator_length: 400,
                chunk_divisions: 2,
                seed: None,
                land_plates: 3,
                water_plates: 7,
            },
            grid: GridConfig {
                stitch_tolerance: 0.05,
                bounds_inflation: 1.1,
            },
            terrain: TerrainConfig {
                edge_window: 16.0,
                blend_exponent: 0.75,
                noise_wavelengths: vec![96.0, 48.0],
                land_bias: -5.0,
                land_scale: 5.0,
                water_bias: -5.0,
                water_scale: 2.5,
                ridge_amplitude: 6.0,
                ridge_wavelength: 24.0,
                ridge_width: 4.0,
            },
            water: WaterConfig {
                freeboard: 0.25,
                search_depth: 3,
            },
            moisture: MoistureConfig {
                chunk_rounds: 20,
                tile_rounds: 50,
                evaporation: 0.5,
                rainfall: 0.3,
                runoff: 0.3,
                seepage: 0.28,
                base_chunk_moisture: 0.1,
                max_moisture: 1.0,
                min_center_distance: 1.0,
            },
            biome: BiomeConfig {
                equator_temperature: 40.0,
                pole_temperature: -10.0,
                elevation_cooldown: -0.5,
                jitter_amplitude: 1.0,
                temperature_bands: vec![-8.0, -3.0, 15.0],
                moisture_bands: vec![0.1, 0.25, 0.5],
            },
            editing: EditingConfig { height_step: 1.0 },
        }
    }
}

impl GlobeGenConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> GlobeResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: GlobeGenConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the file when it exists, otherwise falls back to the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> GlobeResult<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load_from_file(path)
        } else {
            log::warn!("{} not found, using default generation settings", path.display());
            Ok(Self::default())
        }
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> GlobeResult<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Checks value ranges that would otherwise break generation halfway.
    ///
    /// Grid resolution and division depth are checked by the sphere builder,
    /// which knows the chunk sizes they lead to.
    pub fn validate(&self) -> GlobeResult<()> {
        if self.globe.land_plates + self.globe.water_plates == 0 {
            return invalid("at least one plate is required");
        }
        self.validate_stages()
    }

    /// Like [`validate`](Self::validate) but skips the `globe` section, for
    /// callers that carry their own globe settings.
    pub fn validate_stages(&self) -> GlobeResult<()> {
        if !(self.grid.stitch_tolerance > 0.0 && self.grid.stitch_tolerance < 0.5) {
            return invalid("grid.stitch_tolerance must be in (0, 0.5)");
        }
        if self.grid.bounds_inflation < 1.0 {
            return invalid("grid.bounds_inflation must be at least 1");
        }
        if self.terrain.edge_window <= 0.0 {
            return invalid("terrain.edge_window must be positive");
        }
        if self.terrain.blend_exponent <= 0.0 {
            return invalid("terrain.blend_exponent must be positive");
        }
        if self.terrain.noise_wavelengths.is_empty()
            || self.terrain.noise_wavelengths.iter().any(|w| *w <= 0.0)
        {
            return invalid("terrain.noise_wavelengths must be non-empty and positive");
        }
        if self.terrain.ridge_wavelength <= 0.0 || self.terrain.ridge_width <= 0.0 {
            return invalid("terrain.ridge_wavelength and terrain.ridge_width must be positive");
        }
        let m = &self.moisture;
        for (name, value) in [
            ("evaporation", m.evaporation),
            ("rainfall", m.rainfall),
            ("runoff", m.runoff),
            ("seepage", m.seepage),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return invalid(&format!("moisture.{name} must be in [0, 1]"));
            }
        }
        if m.max_moisture <= 0.0 || m.min_center_distance <= 0.0 {
            return invalid("moisture.max_moisture and moisture.min_center_distance must be positive");
        }
        check_bands("biome.temperature_bands", &self.biome.temperature_bands)?;
        check_bands("biome.moisture_bands", &self.biome.moisture_bands)?;
        if self.editing.height_step <= 0.0 {
            return invalid("editing.height_step must be positive");
        }
        Ok(())
    }
}

fn check_bands(name: &str, bands: &[f32]) -> GlobeResult<()> {
    if bands.len() != 3 {
        return invalid(&format!("{name} must have exactly 3 entries"));
    }
    if bands.windows(2).any(|w| w[0] >= w[1]) {
        return invalid(&format!("{name} must be strictly ascending"));
    }
    Ok(())
}

fn invalid(message: &str) -> GlobeResult<()> {
    Err(GlobeError::InvalidConfig(message.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(GlobeGenConfig::default().validate().is_ok());
    }

    #[test]
    fn config_survives_toml() {
        let mut config = GlobeGenConfig::default();
        config.globe.seed = Some(42);
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: GlobeGenConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn missing_seed_parses_as_none() {
        let mut config = GlobeGenConfig::default();
        config.globe.seed = None;
        let text = toml::to_string_pretty(&config).unwrap();
        assert!(!text.contains("seed"));
        let parsed: GlobeGenConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.globe.seed, None);
    }

    #[test]
    fn rejects_unordered_bands() {
        let mut config = GlobeGenConfig::default();
        config.biome.moisture_bands = vec![0.5, 0.25, 0.1];
        assert!(matches!(config.validate(), Err(GlobeError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_zero_plates() {
        let mut config = GlobeGenConfig::default();
        config.globe.land_plates = 0;
        config.globe.water_plates = 0;
        assert!(config.validate().is_err());
        assert!(config.validate_stages().is_ok());
    }

    #[test]
    fn saves_and_loads_file() {
        let path = std::env::temp_dir().join(format!("globegen_config_{}.toml", std::process::id()));
        let mut config = GlobeGenConfig::default();
        config.globe.seed = Some(9);
        config.save_to_file(&path).unwrap();
        let loaded = GlobeGenConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = GlobeGenConfig::load_or_default("no/such/globegen_config.toml").unwrap();
        assert_eq!(config, GlobeGenConfig::default());
    }

    #[test]
    fn noise_is_deterministic() {
        let a = NoiseConfig::new(7, 0.1, 2.0);
        let b = NoiseConfig::new(7, 0.1, 2.0);
        let p = Vec3::new(3.3, -1.2, 8.5);
        assert_eq!(a.sample(p), b.sample(p));
        assert_eq!(a.sample_2d(1.0, 1.0), b.sample_2d(1.0, 1.0));
    }
}
