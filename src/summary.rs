use globegen::Globe;
use globegen::globe::biome::Biome;
use globegen::grid::SurfaceType;
use std::fmt;

/// Aggregate numbers over a finished globe, for logging.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobeSummary {
    pub seed: u32,
    pub radius: f32,
    pub tiles: usize,
    pub chunks: usize,
    pub pentagons: usize,
    pub hexagons: usize,
    pub land: usize,
    pub lakes: usize,
    pub beaches: usize,
    pub min_height: f32,
    pub max_height: f32,
    pub mean_moisture: f32,
    pub biomes: Vec<(Biome, usize)>,
}

impl GlobeSummary {
    pub fn from_globe(globe: &Globe) -> Self {
        let tiles = globe.tiles();
        let count = |kind: SurfaceType| tiles.iter().filter(|t| t.surface.kind == kind).count();
        let heights = tiles.iter().map(|t| t.height);
        let moisture: f32 = tiles.iter().map(|t| t.moisture.moisture).sum();

        Self {
            seed: globe.seed(),
            radius: globe.radius(),
            tiles: tiles.len(),
            chunks: globe.chunks().len(),
            pentagons: tiles.iter().filter(|t| t.is_pentagon()).count(),
            hexagons: tiles.iter().filter(|t| t.neighbours.len() == 6).count(),
            land: count(SurfaceType::Land),
            lakes: count(SurfaceType::Lake),
            beaches: count(SurfaceType::Beach),
            min_height: heights.clone().fold(f32::INFINITY, f32::min),
            max_height: heights.fold(f32::NEG_INFINITY, f32::max),
            mean_moisture: if tiles.is_empty() { 0.0 } else { moisture / tiles.len() as f32 },
            biomes: Biome::ALL
                .iter()
                .map(|biome| (*biome, tiles.iter().filter(|t| t.biome == *biome).count()))
                .collect(),
        }
    }
}

impl fmt::Display for GlobeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "globe (seed {}, radius {:.2})", self.seed, self.radius)?;
        writeln!(
            f,
            "  {} tiles in {} chunks ({} pentagons, {} hexagons)",
            self.tiles, self.chunks, self.pentagons, self.hexagons
        )?;
        writeln!(
            f,
            "  surface: {} land, {} lake, {} beach",
            self.land, self.lakes, self.beaches
        )?;
        writeln!(
            f,
            "  height {}..={}, mean moisture {:.3}",
            self.min_height, self.max_height, self.mean_moisture
        )?;
        let biomes: Vec<String> = self
            .biomes
            .iter()
            .map(|(biome, count)| format!("{biome:?} {count}"))
            .collect();
        write!(f, "  biomes: {}", biomes.join(", "))
    }
}
