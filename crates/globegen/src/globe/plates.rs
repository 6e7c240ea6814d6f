use crate::config::NoiseConfig;
use crate::constants::PLATE_STRIDE;
use crate::grid::tile::TileId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlateType {
    Land,
    Water,
}

/// A tectonic plate seed. Heights are computed from noise on demand, so a
/// plate carries nothing but its kind and where it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plate {
    pub kind: PlateType,
    pub origin: TileId,
}

impl Plate {
    pub fn is_land(&self) -> bool {
        self.kind == PlateType::Land
    }
}

/// Picks plate origins from 2D noise sampled on the diagonal `(i, i)`, so the
/// same seed and tile count always give the same plates.
pub struct PlateGenerator {
    noise: NoiseConfig,
}

impl PlateGenerator {
    pub fn new(seed: u32) -> Self {
        Self {
            noise: NoiseConfig::new(seed, 1.0, 1.0),
        }
    }

    /// The first `land` plates are land, the remaining `water` are water.
    pub fn generate(&self, tile_count: usize, land: usize, water: usize) -> Vec<Plate> {
        if tile_count == 0 {
            return Vec::new();
        }
        (0..land + water)
            .map(|i| {
                let kind = if i < land { PlateType::Land } else { PlateType::Water };
                Plate {
                    kind,
                    origin: TileId(self.origin_index(i, tile_count) as u32),
                }
            })
            .collect()
    }

    fn origin_index(&self, plate: usize, tile_count: usize) -> usize {
        let sample = self.noise.sample_2d(plate as f32, plate as f32).abs();
        let slot = (sample * (tile_count - 1) as f32 / PLATE_STRIDE as f32).floor() as usize;
        (slot * PLATE_STRIDE).min(tile_count - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(492, 1, 1)]
    #[case(16002, 3, 7)]
    #[case(3, 2, 2)]
    fn plates_are_typed_and_in_range(#[case] tiles: usize, #[case] land: usize, #[case] water: usize) {
        let plates = PlateGenerator::new(42).generate(tiles, land, water);
        assert_eq!(plates.len(), land + water);
        for (i, plate) in plates.iter().enumerate() {
            assert_eq!(plate.is_land(), i < land);
            assert!(plate.origin.index() < tiles);
        }
    }

    #[test]
    fn origins_sit_on_the_stride_unless_clamped() {
        let tiles = 1000;
        for plate in PlateGenerator::new(7).generate(tiles, 3, 7) {
            let index = plate.origin.index();
            assert!(index % PLATE_STRIDE == 0 || index == tiles - 1);
        }
    }

    #[test]
    fn same_seed_same_plates() {
        let a = PlateGenerator::new(99).generate(5000, 3, 7);
        let b = PlateGenerator::new(99).generate(5000, 3, 7);
        assert_eq!(a, b);
    }

    #[test]
    fn no_tiles_no_plates() {
        assert!(PlateGenerator::new(1).generate(0, 3, 7).is_empty());
    }
}
