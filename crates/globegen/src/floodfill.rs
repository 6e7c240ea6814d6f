use crate::grid::tile::{Tile, TileId};
use std::collections::{HashSet, VecDeque};

/// Breadth-first region growth over the tile graph.
///
/// The origin is always part of the region, whether or not it satisfies the
/// predicate. Every tile is queued at most once, so a fill always terminates.
pub struct Floodfill<'a, P>
where
    P: Fn(&Tile) -> bool,
{
    tiles: &'a [Tile],
    predicate: P,
    found: HashSet<TileId>,
    pending: VecDeque<TileId>,
    edges: Vec<TileId>,
}

impl<'a, P> Floodfill<'a, P>
where
    P: Fn(&Tile) -> bool,
{
    pub fn new(tiles: &'a [Tile], origin: TileId, predicate: P) -> Self {
        Self {
            tiles,
            predicate,
            found: HashSet::from([origin]),
            pending: VecDeque::from([origin]),
            edges: Vec::new(),
        }
    }

    /// Grows the region until no queued tile is left.
    ///
    /// With `include_edges`, every neighbour failing the predicate is recorded
    /// as an edge tile; a tile reached from several directions is recorded
    /// several times.
    pub fn find_all(&mut self, include_edges: bool) -> &mut Self {
        while let Some(tile) = self.pending.pop_front() {
            for neighbour in &self.tiles[tile.index()].neighbours {
                if (self.predicate)(&self.tiles[neighbour.index()]) {
                    if self.found.insert(*neighbour) {
                        self.pending.push_back(*neighbour);
                    }
                } else if include_edges {
                    self.edges.push(*neighbour);
                }
            }
        }
        self
    }

    pub fn found_tiles(&self) -> &HashSet<TileId> {
        &self.found
    }

    pub fn edge_tiles(&self) -> &[TileId] {
        &self.edges
    }

    pub fn into_parts(self) -> (HashSet<TileId>, Vec<TileId>) {
        (self.found, self.edges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::chunk::TriangularChunk;
    use crate::grid::coordinate::GridCoordinate;
    use crate::grid::tile::ChunkId;
    use glam::Vec3;
    use rstest::rstest;

    fn lattice(size: u16) -> (TriangularChunk, Vec<Tile>) {
        let mut arena = Vec::new();
        let s = size as f32;
        let chunk = TriangularChunk::generate(
            ChunkId(0),
            [Vec3::ZERO, Vec3::new(s, 0.0, 0.0), Vec3::new(0.0, s, 0.0)],
            size,
            &mut arena,
        );
        (chunk, arena)
    }

    /// Region: the lower-left triangle `x + y < 3` of a size 6 lattice.
    fn in_region(tile: &Tile) -> bool {
        tile.coordinates.x + tile.coordinates.y < 3
    }

    #[rstest]
    #[case(0, 0)]
    #[case(2, 0)]
    #[case(1, 1)]
    #[case(0, 2)]
    fn finds_region_from_any_origin(#[case] x: i16, #[case] y: i16) {
        let (chunk, tiles) = lattice(6);
        let origin = chunk.tile_at(GridCoordinate::new(x, y)).unwrap();

        let mut fill = Floodfill::new(&tiles, origin, in_region);
        fill.find_all(true);

        let expected: HashSet<TileId> = chunk.tiles().filter(|id| in_region(&tiles[id.index()])).collect();
        assert_eq!(fill.found_tiles(), &expected);

        let edges: HashSet<TileId> = fill.edge_tiles().iter().copied().collect();
        let boundary: HashSet<TileId> = chunk
            .tiles()
            .filter(|id| {
                let c = tiles[id.index()].coordinates;
                c.x + c.y == 3
            })
            .collect();
        assert_eq!(edges, boundary);
    }

    #[test]
    fn edges_are_not_collected_by_default() {
        let (chunk, tiles) = lattice(6);
        let origin = chunk.tile_at(GridCoordinate::ZERO).unwrap();
        let mut fill = Floodfill::new(&tiles, origin, in_region);
        fill.find_all(false);
        assert!(fill.edge_tiles().is_empty());
        assert_eq!(fill.found_tiles().len(), 6);
    }

    #[test]
    fn unsatisfiable_predicate_gives_singleton() {
        let (chunk, tiles) = lattice(4);
        let origin = chunk.tile_at(GridCoordinate::new(1, 1)).unwrap();
        let mut fill = Floodfill::new(&tiles, origin, |_| false);
        fill.find_all(true);
        assert_eq!(fill.found_tiles().len(), 1);
        assert!(fill.found_tiles().contains(&origin));
        // every neighbour is an edge, each reached exactly once from the origin
        assert_eq!(fill.edge_tiles().len(), tiles[origin.index()].neighbours.len());
    }

    #[test]
    fn edge_tiles_may_repeat() {
        let (chunk, tiles) = lattice(6);
        let origin = chunk.tile_at(GridCoordinate::ZERO).unwrap();
        let mut fill = Floodfill::new(&tiles, origin, in_region);
        fill.find_all(true);
        let (_, edges) = fill.into_parts();
        let unique: HashSet<TileId> = edges.iter().copied().collect();
        assert!(edges.len() > unique.len());
    }
}
