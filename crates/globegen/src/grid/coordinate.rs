use std::ops::{Add, Neg, Sub};

/// Axial lattice coordinate, local to one chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct GridCoordinate {
    pub x: i16,
    pub y: i16,
}

impl GridCoordinate {
    pub const ZERO: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }
}

impl Add for GridCoordinate {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for GridCoordinate {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for GridCoordinate {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

/// The six hex directions on a triangular lattice, in cyclic order:
/// each entry is adjacent to the next one and the last to the first.
pub const HEX_DIRECTIONS: [GridCoordinate; 6] = [
    GridCoordinate::new(1, 0),
    GridCoordinate::new(1, -1),
    GridCoordinate::new(0, -1),
    GridCoordinate::new(-1, 0),
    GridCoordinate::new(-1, 1),
    GridCoordinate::new(0, 1),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic() {
        let a = GridCoordinate::new(3, -2);
        let b = GridCoordinate::new(1, 4);
        assert_eq!(a + b, GridCoordinate::new(4, 2));
        assert_eq!(a - b, GridCoordinate::new(2, -6));
        assert_eq!(-a, GridCoordinate::new(-3, 2));
        assert_eq!(a - a, GridCoordinate::ZERO);
    }

    #[test]
    fn directions_are_closed_under_negation() {
        for d in HEX_DIRECTIONS {
            assert!(HEX_DIRECTIONS.contains(&-d));
        }
    }

    #[test]
    fn consecutive_directions_are_adjacent() {
        for i in 0..6 {
            let step = HEX_DIRECTIONS[(i + 1) % 6] - HEX_DIRECTIONS[i];
            assert!(HEX_DIRECTIONS.contains(&step), "{:?} -> {:?}", HEX_DIRECTIONS[i], HEX_DIRECTIONS[(i + 1) % 6]);
        }
    }
}
