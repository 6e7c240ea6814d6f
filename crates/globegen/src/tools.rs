use glam::Vec3;
use rand::Rng;

/// Random seed of at most eight decimal digits.
pub fn generate_seed8() -> u32 {
    rand::rng().random_range(0..100_000_000)
}

/// Derives an independent noise seed for a named purpose from the globe seed.
pub fn derive_seed(seed: u32, salt: u64) -> u32 {
    (splitmix64(seed as u64 ^ salt.wrapping_mul(0x9E37_79B9)) >> 32) as u32
}

pub fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

/// Great-circle distance between the directions of two points on a sphere.
///
/// Obtuse angles are clamped to a quarter turn; plates further than that
/// never matter for blending.
pub fn spherical_distance(radius: f32, p1: Vec3, p2: Vec3) -> f32 {
    let dot = p1.normalize().dot(p2.normalize()).clamp(0.0, 1.0);
    radius * dot.acos()
}
