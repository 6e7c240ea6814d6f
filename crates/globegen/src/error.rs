use thiserror::Error;

/// Errors raised while configuring or building a globe.
///
/// Everything except the I/O and parsing variants is a configuration or
/// programming defect: generation is all-or-nothing and is never retried.
#[derive(Error, Debug)]
pub enum GlobeError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("face size {size} is outside the supported range {min}..={max}")]
    FaceSizeOutOfRange { size: u32, min: u32, max: u32 },
    #[error("splitting a chunk of size {size} at division {division} leaves chunks too small to hold a tile")]
    DegenerateChunk { size: u16, division: u32 },
    #[error("stitching faces {first} and {second} matched {found} edge tiles, expected {expected}")]
    EdgeStitch {
        first: usize,
        second: usize,
        expected: usize,
        found: usize,
    },
    #[error("corner stitching produced {groups} groups (sizes {sizes:?}), expected 12 groups of 5")]
    CornerStitch { groups: usize, sizes: Vec<usize> },
    #[error("neighbours of tile {tile} do not form a closed ring")]
    NeighbourRing { tile: u32 },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("failed to serialize configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
}

pub type GlobeResult<T> = Result<T, GlobeError>;
