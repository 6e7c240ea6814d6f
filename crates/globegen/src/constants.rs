/// Plate origins are only placed on every `PLATE_STRIDE`-th tile of the arena.
pub const PLATE_STRIDE: usize = 5;

/// Tiles at or below this height are under water once a sea reaches them.
pub const SEA_LEVEL: f32 = 0.0;
