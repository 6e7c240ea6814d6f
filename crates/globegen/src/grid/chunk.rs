use crate::grid::coordinate::{GridCoordinate, HEX_DIRECTIONS};
use crate::grid::tile::{ChunkId, Tile, TileId};
use glam::Vec3;
use std::collections::BTreeMap;

/// Maps coordinates of a parent lattice into a child lattice.
///
/// The central child of a split is upside down relative to its parent, so its
/// axes point the other way (`flipped`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatticeFrame {
    pub origin: GridCoordinate,
    pub flipped: bool,
}

impl LatticeFrame {
    pub const IDENTITY: Self = Self {
        origin: GridCoordinate::ZERO,
        flipped: false,
    };

    pub fn to_local(&self, parent: GridCoordinate) -> GridCoordinate {
        if self.flipped {
            self.origin - parent
        } else {
            parent - self.origin
        }
    }

    pub fn to_parent(&self, local: GridCoordinate) -> GridCoordinate {
        if self.flipped {
            self.origin - local
        } else {
            self.origin + local
        }
    }
}

/// Bounding sphere used for chunk level visibility and picking checks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChunkBounds {
    pub center: Vec3,
    pub radius: f32,
}

impl ChunkBounds {
    pub fn from_points(points: impl IntoIterator<Item = Vec3>, inflation: f32) -> Self {
        let points: Vec<Vec3> = points.into_iter().collect();
        if points.is_empty() {
            return Self {
                center: Vec3::ZERO,
                radius: 0.0,
            };
        }
        let center = points.iter().copied().sum::<Vec3>() / points.len() as f32;
        let radius = points
            .iter()
            .map(|p| p.distance(center))
            .fold(0.0_f32, f32::max);
        Self {
            center,
            radius: radius * inflation,
        }
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.distance_squared(self.center) <= self.radius * self.radius
    }

    /// Whether the ray `origin + t * direction`, `t >= 0`, passes through the bounds.
    pub fn intersects_ray(&self, origin: Vec3, direction: Vec3) -> bool {
        let direction = direction.normalize_or_zero();
        let to_center = self.center - origin;
        let t = to_center.dot(direction).max(0.0);
        let closest = origin + direction * t;
        self.contains(closest)
    }
}

/// A triangular patch of the hex lattice.
///
/// Holds the tiles whose local coordinates satisfy `x, y >= 0` and
/// `x + y < size`; tiles merged into other chunks while stitching leave holes
/// along the edges.
#[derive(Debug, Clone)]
pub struct TriangularChunk {
    pub id: ChunkId,
    size: u16,
    vertices: [Vec3; 3],
    frame: LatticeFrame,
    tiles: BTreeMap<GridCoordinate, TileId>,
    bounds: ChunkBounds,
}

impl TriangularChunk {
    /// Creates tiles for every lattice point of the triangle `vertices` and
    /// wires hex neighbours between them.
    pub fn generate(id: ChunkId, vertices: [Vec3; 3], size: u16, arena: &mut Vec<Tile>) -> Self {
        let mut chunk = Self::empty(id, vertices, size, LatticeFrame::IDENTITY);
        let size = size as i16;
        for x in 0..size {
            for y in 0..size - x {
                let coordinates = GridCoordinate::new(x, y);
                let tile_id = TileId(arena.len() as u32);
                arena.push(Tile::new(chunk.lattice_point(coordinates), coordinates, id));
                chunk.tiles.insert(coordinates, tile_id);
            }
        }
        chunk.connect_tiles(arena);
        chunk
    }

    fn empty(id: ChunkId, vertices: [Vec3; 3], size: u16, frame: LatticeFrame) -> Self {
        Self {
            id,
            size,
            vertices,
            frame,
            tiles: BTreeMap::new(),
            bounds: ChunkBounds::from_points(vertices, 1.0),
        }
    }

    fn connect_tiles(&self, arena: &mut [Tile]) {
        for (coordinates, tile_id) in &self.tiles {
            let neighbours: Vec<TileId> = HEX_DIRECTIONS
                .iter()
                .filter_map(|d| self.tiles.get(&(*coordinates + *d)).copied())
                .collect();
            arena[tile_id.index()].neighbours = neighbours;
        }
    }

    pub fn size(&self) -> u16 {
        self.size
    }

    pub fn vertices(&self) -> [Vec3; 3] {
        self.vertices
    }

    pub fn frame(&self) -> LatticeFrame {
        self.frame
    }

    pub fn bounds(&self) -> ChunkBounds {
        self.bounds
    }

    pub fn center(&self) -> Vec3 {
        (self.vertices[0] + self.vertices[1] + self.vertices[2]) / 3.0
    }

    pub fn tiles(&self) -> impl Iterator<Item = TileId> + '_ {
        self.tiles.values().copied()
    }

    pub fn tile_at(&self, coordinates: GridCoordinate) -> Option<TileId> {
        self.tiles.get(&coordinates).copied()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn remove_tile(&mut self, coordinates: GridCoordinate) -> Option<TileId> {
        self.tiles.remove(&coordinates)
    }

    /// Position of a lattice point interpolated between the three vertices.
    pub fn lattice_point(&self, coordinates: GridCoordinate) -> Vec3 {
        if self.size < 2 {
            return self.vertices[0];
        }
        let steps = (self.size - 1) as f32;
        let x_step = (self.vertices[1] - self.vertices[0]) / steps;
        let y_step = (self.vertices[2] - self.vertices[0]) / steps;
        self.vertices[0] + coordinates.x as f32 * x_step + coordinates.y as f32 * y_step
    }

    pub fn is_on_edge(&self, coordinates: GridCoordinate) -> bool {
        self.edge_count(coordinates) > 0
    }

    pub fn is_on_corner(&self, coordinates: GridCoordinate) -> bool {
        self.edge_count(coordinates) == 2
    }

    fn edge_count(&self, c: GridCoordinate) -> usize {
        let last = self.size as i16 - 1;
        [c.x == 0, c.y == 0, c.x + c.y == last]
            .into_iter()
            .filter(|on_edge| *on_edge)
            .count()
    }

    /// Rewrites tile handles after the arena has been compacted.
    pub(crate) fn remap_tiles(&mut self, remap: &[Option<TileId>]) {
        self.tiles = self
            .tiles
            .iter()
            .filter_map(|(c, id)| remap[id.index()].map(|new| (*c, new)))
            .collect();
    }

    pub fn normalize_vertices(&mut self, radius: f32) {
        for v in self.vertices.iter_mut() {
            *v = v.normalize() * radius;
        }
    }

    /// Recomputes the bounds from the corner vertices and current tile positions.
    pub fn recompute_bounds(&mut self, arena: &[Tile], inflation: f32) {
        let points = self
            .vertices
            .into_iter()
            .chain(self.tiles.values().map(|id| arena[id.index()].position));
        self.bounds = ChunkBounds::from_points(points, inflation);
    }

    /// Splits into three corner triangles and one inverted centre triangle.
    ///
    /// Tiles are re-tagged with their child chunk and child-local coordinates;
    /// neighbour links are left untouched. Returns `None` for chunks with fewer
    /// than three tiles per edge, which would produce an empty child.
    pub fn split(self, arena: &mut [Tile], ids: [ChunkId; 4]) -> Option<[TriangularChunk; 4]> {
        if self.size < 3 {
            return None;
        }
        let n = self.size as i16;
        let h = n / 2;
        let layout = [
            (LatticeFrame { origin: GridCoordinate::new(0, 0), flipped: false }, h),
            (LatticeFrame { origin: GridCoordinate::new(n - h, 0), flipped: false }, h),
            (LatticeFrame { origin: GridCoordinate::new(0, n - h), flipped: false }, h),
            (
                LatticeFrame { origin: GridCoordinate::new(n - h - 1, n - h - 1), flipped: true },
                2 * n - 3 * h - 1,
            ),
        ];

        let mut children = [0, 1, 2, 3].map(|i| {
            let (frame, size) = layout[i];
            let corner = |local: GridCoordinate| self.lattice_point(frame.to_parent(local));
            let last = size - 1;
            let vertices = [
                corner(GridCoordinate::new(0, 0)),
                corner(GridCoordinate::new(last, 0)),
                corner(GridCoordinate::new(0, last)),
            ];
            TriangularChunk::empty(ids[i], vertices, size as u16, frame)
        });

        for (coordinates, tile_id) in &self.tiles {
            let c = *coordinates;
            let child = if c.x + c.y < h {
                0
            } else if c.x >= n - h {
                1
            } else if c.y >= n - h {
                2
            } else {
                3
            };
            let local = layout[child].0.to_local(c);
            let tile = &mut arena[tile_id.index()];
            tile.chunk = ids[child];
            tile.coordinates = local;
            children[child].tiles.insert(local, *tile_id);
        }
        Some(children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashSet;

    fn flat_chunk(size: u16, arena: &mut Vec<Tile>) -> TriangularChunk {
        let s = size as f32;
        TriangularChunk::generate(
            ChunkId(0),
            [Vec3::ZERO, Vec3::new(s, 0.0, 0.0), Vec3::new(s * 0.5, s * 0.866, 0.0)],
            size,
            arena,
        )
    }

    #[rstest]
    #[case(2)]
    #[case(5)]
    #[case(8)]
    #[case(17)]
    fn generates_triangular_number_of_tiles(#[case] size: u16) {
        let mut arena = Vec::new();
        let chunk = flat_chunk(size, &mut arena);
        let n = size as usize;
        assert_eq!(chunk.len(), n * (n + 1) / 2);
        assert_eq!(arena.len(), chunk.len());
    }

    #[test]
    fn interior_tiles_have_six_neighbours() {
        let mut arena = Vec::new();
        let chunk = flat_chunk(6, &mut arena);
        for id in chunk.tiles() {
            let tile = &arena[id.index()];
            if !chunk.is_on_edge(tile.coordinates) {
                assert_eq!(tile.neighbours.len(), 6);
            } else if chunk.is_on_corner(tile.coordinates) {
                assert_eq!(tile.neighbours.len(), 2);
            } else {
                assert_eq!(tile.neighbours.len(), 4);
            }
        }
    }

    #[test]
    fn lattice_wiring_is_symmetric() {
        let mut arena = Vec::new();
        let chunk = flat_chunk(7, &mut arena);
        for id in chunk.tiles() {
            for n in &arena[id.index()].neighbours {
                assert!(arena[n.index()].has_neighbour(id));
            }
        }
    }

    #[rstest]
    #[case(0, 0, true, true)]
    #[case(4, 0, true, true)]
    #[case(0, 4, true, true)]
    #[case(2, 0, true, false)]
    #[case(2, 2, true, false)]
    #[case(1, 1, false, false)]
    fn edge_and_corner_predicates(
        #[case] x: i16,
        #[case] y: i16,
        #[case] edge: bool,
        #[case] corner: bool,
    ) {
        let mut arena = Vec::new();
        let chunk = flat_chunk(5, &mut arena);
        let c = GridCoordinate::new(x, y);
        assert_eq!(chunk.is_on_edge(c), edge);
        assert_eq!(chunk.is_on_corner(c), corner);
    }

    #[rstest]
    #[case(3)]
    #[case(4)]
    #[case(7)]
    #[case(8)]
    #[case(9)]
    #[case(16)]
    fn split_partitions_tiles(#[case] size: u16) {
        let mut arena = Vec::new();
        let chunk = flat_chunk(size, &mut arena);
        let before: HashSet<TileId> = chunk.tiles().collect();
        let parent_coordinates: Vec<(TileId, GridCoordinate)> = chunk
            .tiles()
            .map(|id| (id, arena[id.index()].coordinates))
            .collect();

        let ids = [ChunkId(10), ChunkId(11), ChunkId(12), ChunkId(13)];
        let children = chunk.split(&mut arena, ids).unwrap();

        let mut after = HashSet::new();
        for child in &children {
            let s = child.size() as i16;
            assert!(s >= 1);
            for id in child.tiles() {
                assert!(after.insert(id), "tile {id} in two children");
                let tile = &arena[id.index()];
                assert_eq!(tile.chunk, child.id);
                let c = tile.coordinates;
                assert!(c.x >= 0 && c.y >= 0 && c.x + c.y < s, "{c:?} outside child of size {s}");
                assert_eq!(child.tile_at(c), Some(id));
            }
            assert_eq!(child.len(), (s as usize) * (s as usize + 1) / 2);
        }
        assert_eq!(before, after);

        for (id, parent) in parent_coordinates {
            let tile = &arena[id.index()];
            let child = &children[ids.iter().position(|c| *c == tile.chunk).unwrap()];
            assert_eq!(child.frame().to_parent(tile.coordinates), parent);
        }
    }

    #[test]
    fn odd_split_sizes() {
        let mut arena = Vec::new();
        let chunk = flat_chunk(9, &mut arena);
        let children = chunk
            .split(&mut arena, [ChunkId(0), ChunkId(1), ChunkId(2), ChunkId(3)])
            .unwrap();
        let sizes: Vec<u16> = children.iter().map(|c| c.size()).collect();
        assert_eq!(sizes, vec![4, 4, 4, 5]);
    }

    #[test]
    fn split_keeps_neighbour_links() {
        let mut arena = Vec::new();
        let chunk = flat_chunk(9, &mut arena);
        let links: Vec<Vec<TileId>> = arena.iter().map(|t| t.neighbours.clone()).collect();
        chunk.split(&mut arena, [ChunkId(0), ChunkId(1), ChunkId(2), ChunkId(3)]);
        let after: Vec<Vec<TileId>> = arena.iter().map(|t| t.neighbours.clone()).collect();
        assert_eq!(links, after);
    }

    #[test]
    fn child_vertices_lie_on_their_tiles() {
        let mut arena = Vec::new();
        let chunk = flat_chunk(9, &mut arena);
        let children = chunk
            .split(&mut arena, [ChunkId(0), ChunkId(1), ChunkId(2), ChunkId(3)])
            .unwrap();
        for child in &children {
            let last = child.size() as i16 - 1;
            for (corner, local) in [(0, 0), (last, 0), (0, last)].into_iter().enumerate() {
                let id = child.tile_at(GridCoordinate::new(local.0, local.1)).unwrap();
                let distance = arena[id.index()].base_position.distance(child.vertices()[corner]);
                assert!(distance < 1e-4, "corner {corner} off by {distance}");
            }
        }
    }

    #[test]
    fn too_small_chunk_does_not_split() {
        let mut arena = Vec::new();
        let chunk = flat_chunk(2, &mut arena);
        assert!(chunk.split(&mut arena, [ChunkId(0), ChunkId(1), ChunkId(2), ChunkId(3)]).is_none());
    }

    #[rstest]
    #[case(true)]
    #[case(false)]
    fn frame_round_trip(#[case] flipped: bool) {
        let frame = LatticeFrame { origin: GridCoordinate::new(4, 3), flipped };
        for x in -3..6 {
            for y in -3..6 {
                let c = GridCoordinate::new(x, y);
                assert_eq!(frame.to_parent(frame.to_local(c)), c);
            }
        }
    }

    #[test]
    fn bounds_contain_vertices_and_catch_rays() {
        let bounds = ChunkBounds::from_points([Vec3::X, Vec3::Y, Vec3::Z], 1.1);
        assert!(bounds.contains(Vec3::X));
        assert!(bounds.contains(Vec3::Z));
        assert!(!bounds.contains(Vec3::splat(-1.0)));
        assert!(bounds.intersects_ray(Vec3::splat(5.0), -Vec3::ONE));
        assert!(!bounds.intersects_ray(Vec3::splat(5.0), Vec3::ONE));
    }
}
