use crate::error::{GlobeError, GlobeResult};
use crate::grid::chunk::TriangularChunk;
use crate::grid::tile::{ChunkId, Tile, TileId};
use glam::{Quat, Vec3};
use std::collections::{BTreeSet, HashMap};

pub const MIN_FACE_SIZE: u32 = 2;
pub const MAX_FACE_SIZE: u32 = 1024;
/// Smallest chunk a split may produce. Any edge of it that runs inside the
/// face has a midpoint tile that stitching never touches.
pub const MIN_SPLIT_CHILD: u16 = 3;

const ICOSAHEDRON_FACES: usize = 20;
const ICOSAHEDRON_VERTICES: usize = 12;
const FACES_PER_VERTEX: usize = 5;

/// Vertex indices of each face: top cap, upper band, lower band, bottom cap.
const TRIANGLES: [[usize; 3]; ICOSAHEDRON_FACES] = [
    [1, 2, 0], [2, 3, 0], [3, 4, 0], [4, 5, 0], [5, 1, 0],
    [2, 1, 6], [3, 2, 7], [4, 3, 8], [5, 4, 9], [1, 5, 10],
    [6, 7, 2], [7, 8, 3], [8, 9, 4], [9, 10, 5], [10, 6, 1],
    [7, 6, 11], [8, 7, 11], [9, 8, 11], [10, 9, 11], [6, 10, 11],
];

/// Every pair of faces sharing an edge, in stitching order.
fn adjacent_faces() -> Vec<(usize, usize)> {
    let mut pairs = Vec::with_capacity(30);
    for i in 0..5 {
        // top cap ring
        pairs.push((i, (i + 1) % 5));
        // bottom cap ring
        pairs.push(((i + 1) % 5 + 15, i + 15));
        // caps to the bands
        pairs.push((i, i + 5));
        pairs.push((i + 10, i + 15));
        // upper band to lower band
        pairs.push((i + 10, (i + 1) % 5 + 5));
        pairs.push((i + 5, i + 10));
    }
    pairs
}

fn icosahedron_vertices() -> [Vec3; ICOSAHEDRON_VERTICES] {
    let mut vertices = [Vec3::ZERO; ICOSAHEDRON_VERTICES];
    vertices[0] = Vec3::Y;
    vertices[11] = Vec3::NEG_Y;

    let upper = Quat::from_rotation_z(0.5_f32.atan()) * Vec3::X;
    let lower = Vec3::new(upper.x, -upper.y, upper.z);
    for i in 0..5 {
        let angle = i as f32 * 72.0;
        vertices[i + 1] = Quat::from_rotation_y(angle.to_radians()) * upper;
        vertices[i + 6] = Quat::from_rotation_y((angle + 36.0).to_radians()) * lower;
    }
    vertices
}

/// The tiles and chunks of a finished sphere.
pub struct SphereGrid {
    pub tiles: Vec<Tile>,
    pub chunks: Vec<TriangularChunk>,
}

/// Builds a closed hex/pentagon tiling from the twenty faces of an icosahedron.
///
/// Every face is generated as its own lattice, so tiles along shared edges and
/// at the twelve vertices exist several times. Those duplicates are folded
/// into a single tile, neighbour rings are rebuilt, and the surviving tiles
/// are compacted into a dense arena on a sphere of the requested radius.
pub struct IcosahedralSphere {
    face_size: u16,
    radius: f32,
    tolerance: f32,
    tiles: Vec<Tile>,
    removed: Vec<bool>,
    chunks: Vec<TriangularChunk>,
}

impl IcosahedralSphere {
    pub fn new(face_size: u32, radius: f32, tolerance: f32) -> GlobeResult<Self> {
        if !(MIN_FACE_SIZE..=MAX_FACE_SIZE).contains(&face_size) {
            return Err(GlobeError::FaceSizeOutOfRange {
                size: face_size,
                min: MIN_FACE_SIZE,
                max: MAX_FACE_SIZE,
            });
        }
        let face_size = face_size as u16;
        let mut sphere = Self {
            face_size,
            radius,
            tolerance,
            tiles: Vec::new(),
            removed: Vec::new(),
            chunks: Vec::with_capacity(ICOSAHEDRON_FACES),
        };

        sphere.generate_faces();
        sphere.stitch_edges()?;
        sphere.stitch_corners()?;
        sphere.order_neighbours()?;
        sphere.compact_onto_sphere()?;

        log::debug!(
            "icosahedral sphere: face size {}, {} tiles, radius {:.2}",
            face_size,
            sphere.tiles.len(),
            radius
        );
        Ok(sphere)
    }

    /// Number of tiles a sphere of this face size ends up with.
    pub fn expected_tile_count(face_size: u32) -> usize {
        let f = face_size.saturating_sub(1) as usize;
        10 * f * f + 2
    }

    /// Checks that `divisions` rounds of splitting only ever produce children
    /// of at least [`MIN_SPLIT_CHILD`] tiles per edge.
    ///
    /// Smaller children hold nothing but edge and corner tiles, which stitching
    /// may have handed to the neighbouring face, leaving them empty.
    pub fn check_divisions(face_size: u16, divisions: u32) -> GlobeResult<()> {
        let mut sizes = BTreeSet::from([face_size]);
        for division in 0..divisions {
            let mut next = BTreeSet::new();
            for size in sizes {
                let children = split_sizes(size).filter(|c| c.iter().all(|s| *s >= MIN_SPLIT_CHILD));
                let Some(children) = children else {
                    return Err(GlobeError::DegenerateChunk { size, division });
                };
                next.extend(children);
            }
            sizes = next;
        }
        Ok(())
    }

    /// Splits every face chunk `divisions` times and hands over the result.
    pub fn get_chunks(self, divisions: u32, bounds_inflation: f32) -> GlobeResult<SphereGrid> {
        Self::check_divisions(self.face_size, divisions)?;

        let Self {
            radius,
            mut tiles,
            mut chunks,
            ..
        } = self;

        for division in 0..divisions {
            let mut next = Vec::with_capacity(chunks.len() * 4);
            for (i, chunk) in chunks.into_iter().enumerate() {
                let base = (i * 4) as u32;
                let size = chunk.size();
                let ids = [0, 1, 2, 3].map(|k| ChunkId(base + k));
                let children = chunk
                    .split(&mut tiles, ids)
                    .ok_or(GlobeError::DegenerateChunk { size, division })?;
                next.extend(children);
            }
            chunks = next;
        }

        if let Some(empty) = chunks.iter().find(|c| c.is_empty()) {
            return Err(GlobeError::DegenerateChunk {
                size: empty.size(),
                division: divisions,
            });
        }
        for chunk in chunks.iter_mut() {
            chunk.normalize_vertices(radius);
            chunk.recompute_bounds(&tiles, bounds_inflation);
        }

        log::debug!("split sphere into {} chunks", chunks.len());
        Ok(SphereGrid { tiles, chunks })
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn chunks(&self) -> &[TriangularChunk] {
        &self.chunks
    }

    fn generate_faces(&mut self) {
        let vertices = icosahedron_vertices();
        let scale = self.face_size as f32;
        for (face, triangle) in TRIANGLES.into_iter().enumerate() {
            let corners = triangle.map(|v| vertices[v] * scale);
            let chunk =
                TriangularChunk::generate(ChunkId(face as u32), corners, self.face_size, &mut self.tiles);
            self.chunks.push(chunk);
        }
        self.removed = vec![false; self.tiles.len()];
    }

    fn stitch_edges(&mut self) -> GlobeResult<()> {
        let expected = self.face_size.saturating_sub(2) as usize;
        for (first, second) in adjacent_faces() {
            let pairs = self.matching_edge_tiles(first, second);
            if pairs.len() != expected {
                return Err(GlobeError::EdgeStitch {
                    first,
                    second,
                    expected,
                    found: pairs.len(),
                });
            }
            for (keep, remove) in pairs {
                self.fold_tile(keep, remove);
            }
        }
        Ok(())
    }

    /// Pairs of non-corner edge tiles of two chunks that share a position.
    fn matching_edge_tiles(&self, first: usize, second: usize) -> Vec<(TileId, TileId)> {
        let cell_size = self.tolerance;
        let mut cells: HashMap<(i32, i32, i32), Vec<TileId>> = HashMap::new();
        for id in self.stitchable_edge_tiles(second) {
            let key = cell_key(self.tiles[id.index()].base_position, cell_size);
            cells.entry(key).or_default().push(id);
        }

        let mut pairs = Vec::new();
        for id in self.stitchable_edge_tiles(first) {
            let position = self.tiles[id.index()].base_position;
            let (cx, cy, cz) = cell_key(position, cell_size);
            let mut found = None;
            'search: for dx in -1..=1 {
                for dy in -1..=1 {
                    for dz in -1..=1 {
                        let Some(candidates) = cells.get(&(cx + dx, cy + dy, cz + dz)) else {
                            continue;
                        };
                        for candidate in candidates {
                            if self.tiles[candidate.index()].base_position.distance(position) < self.tolerance {
                                found = Some(*candidate);
                                break 'search;
                            }
                        }
                    }
                }
            }
            if let Some(duplicate) = found {
                pairs.push((id, duplicate));
            }
        }
        pairs
    }

    fn stitchable_edge_tiles(&self, face: usize) -> Vec<TileId> {
        let chunk = &self.chunks[face];
        chunk
            .tiles()
            .filter(|id| {
                let c = self.tiles[id.index()].coordinates;
                chunk.is_on_edge(c) && !chunk.is_on_corner(c)
            })
            .collect()
    }

    fn stitch_corners(&mut self) -> GlobeResult<()> {
        let mut groups: Vec<(Vec3, Vec<TileId>)> = Vec::with_capacity(ICOSAHEDRON_VERTICES);
        for chunk in &self.chunks {
            for id in chunk.tiles() {
                let tile = &self.tiles[id.index()];
                if !chunk.is_on_corner(tile.coordinates) {
                    continue;
                }
                match groups
                    .iter_mut()
                    .find(|(p, _)| p.distance(tile.base_position) < self.tolerance)
                {
                    Some((_, members)) => members.push(id),
                    None => groups.push((tile.base_position, vec![id])),
                }
            }
        }

        if groups.len() != ICOSAHEDRON_VERTICES
            || groups.iter().any(|(_, m)| m.len() != FACES_PER_VERTEX)
        {
            return Err(GlobeError::CornerStitch {
                groups: groups.len(),
                sizes: groups.iter().map(|(_, m)| m.len()).collect(),
            });
        }

        for (_, members) in groups {
            let keep = members[0];
            for remove in members.into_iter().skip(1) {
                self.fold_tile(keep, remove);
            }
        }
        Ok(())
    }

    /// Merges `remove` into `keep`: every reference is redirected, the
    /// neighbour sets are united and `remove` leaves its chunk.
    fn fold_tile(&mut self, keep: TileId, remove: TileId) {
        let former = std::mem::take(&mut self.tiles[remove.index()].neighbours);
        for neighbour in former {
            if neighbour == keep {
                self.tiles[keep.index()].neighbours.retain(|n| *n != remove);
                continue;
            }
            self.tiles[neighbour.index()].replace_neighbour(remove, keep);
            let kept = &mut self.tiles[keep.index()];
            if !kept.has_neighbour(neighbour) {
                kept.neighbours.push(neighbour);
            }
        }
        self.removed[remove.index()] = true;
        let tile = &self.tiles[remove.index()];
        let (chunk, coordinates) = (tile.chunk, tile.coordinates);
        self.chunks[chunk.index()].remove_tile(coordinates);
    }

    fn order_neighbours(&mut self) -> GlobeResult<()> {
        for i in 0..self.tiles.len() {
            if self.removed[i] {
                continue;
            }
            let ring = self
                .ordered_ring(TileId(i as u32))
                .ok_or(GlobeError::NeighbourRing { tile: i as u32 })?;
            self.tiles[i].neighbours = ring;
        }
        Ok(())
    }

    /// Orders a tile's neighbours into a closed walk, wound counter-clockwise
    /// when seen from outside the sphere.
    fn ordered_ring(&self, id: TileId) -> Option<Vec<TileId>> {
        let mut remaining = self.tiles[id.index()].neighbours.clone();
        if remaining.len() < 3 {
            return None;
        }
        let mut ring = vec![remaining.remove(0)];
        while !remaining.is_empty() {
            let last = self.tiles[ring[ring.len() - 1].index()].neighbours.as_slice();
            let next = remaining.iter().position(|n| last.contains(n))?;
            ring.push(remaining.remove(next));
        }
        if !self.tiles[ring[ring.len() - 1].index()].has_neighbour(ring[0]) {
            return None;
        }

        let center = self.tiles[id.index()].base_position;
        let a = self.tiles[ring[0].index()].base_position - center;
        let b = self.tiles[ring[1].index()].base_position - center;
        if a.cross(b).dot(center) < 0.0 {
            ring.reverse();
        }
        Some(ring)
    }

    fn compact_onto_sphere(&mut self) -> GlobeResult<()> {
        let mut remap = vec![None; self.tiles.len()];
        let mut tiles = Vec::with_capacity(self.tiles.len());
        for (i, tile) in std::mem::take(&mut self.tiles).into_iter().enumerate() {
            if !self.removed[i] {
                remap[i] = Some(TileId(tiles.len() as u32));
                tiles.push(tile);
            }
        }

        for (i, tile) in tiles.iter_mut().enumerate() {
            let mut neighbours = Vec::with_capacity(tile.neighbours.len());
            for n in &tile.neighbours {
                let mapped = remap[n.index()].ok_or(GlobeError::NeighbourRing { tile: i as u32 })?;
                neighbours.push(mapped);
            }
            tile.neighbours = neighbours;
            tile.base_position = tile.base_position.normalize() * self.radius;
            tile.position = tile.base_position;
        }
        for chunk in self.chunks.iter_mut() {
            chunk.remap_tiles(&remap);
        }

        self.removed = vec![false; tiles.len()];
        self.tiles = tiles;
        Ok(())
    }
}

/// Edge sizes of the three corner children and the central child.
fn split_sizes(size: u16) -> Option<[u16; 2]> {
    if size < 3 {
        return None;
    }
    let h = size / 2;
    Some([h, 2 * size - 3 * h - 1])
}

fn cell_key(position: Vec3, cell_size: f32) -> (i32, i32, i32) {
    let p = (position / cell_size).floor();
    (p.x as i32, p.y as i32, p.z as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn icosahedron_vertices_are_unit_and_equidistant() {
        let vertices = icosahedron_vertices();
        for v in vertices {
            assert!((v.length() - 1.0).abs() < 1e-5);
        }
        let edge = vertices[0].distance(vertices[1]);
        for triangle in TRIANGLES {
            for k in 0..3 {
                let d = vertices[triangle[k]].distance(vertices[triangle[(k + 1) % 3]]);
                assert!((d - edge).abs() < 1e-4, "edge {:?} has length {d}", triangle);
            }
        }
    }

    #[test]
    fn every_face_edge_is_stitched_once() {
        let pairs = adjacent_faces();
        assert_eq!(pairs.len(), 30);
        let mut edges = BTreeSet::new();
        for (a, b) in pairs {
            let shared: Vec<usize> = TRIANGLES[a]
                .iter()
                .filter(|v| TRIANGLES[b].contains(v))
                .copied()
                .collect();
            assert_eq!(shared.len(), 2, "faces {a} and {b} do not share an edge");
            assert!(edges.insert((shared[0].min(shared[1]), shared[0].max(shared[1]))));
        }
    }

    #[rstest]
    #[case(2)]
    #[case(3)]
    #[case(8)]
    #[case(13)]
    fn sphere_is_closed(#[case] face_size: u32) {
        let sphere = IcosahedralSphere::new(face_size, 10.0, 0.05).unwrap();
        let tiles = sphere.tiles();
        assert_eq!(tiles.len(), IcosahedralSphere::expected_tile_count(face_size));

        let mut pentagons = 0;
        for (i, tile) in tiles.iter().enumerate() {
            let id = TileId(i as u32);
            match tile.neighbours.len() {
                5 => pentagons += 1,
                6 => {}
                n => panic!("tile {i} has {n} neighbours"),
            }
            for n in &tile.neighbours {
                assert!(tiles[n.index()].has_neighbour(id), "{id} -> {n} is one-way");
            }
            assert!((tile.base_position.length() - 10.0).abs() < 1e-3);
        }
        assert_eq!(pentagons, 12);
    }

    #[test]
    fn neighbour_rings_are_closed_and_wound_consistently() {
        let sphere = IcosahedralSphere::new(6, 5.0, 0.05).unwrap();
        let tiles = sphere.tiles();
        for (i, tile) in tiles.iter().enumerate() {
            let ring = &tile.neighbours;
            for k in 0..ring.len() {
                let a = ring[k];
                let b = ring[(k + 1) % ring.len()];
                assert!(tiles[a.index()].has_neighbour(b), "tile {i}: {a} and {b} not adjacent");
                let center = tile.base_position;
                let cross = (tiles[a.index()].base_position - center)
                    .cross(tiles[b.index()].base_position - center);
                assert!(cross.dot(center) > 0.0, "tile {i} wound clockwise");
            }
        }
    }

    #[test]
    fn no_duplicate_positions_remain() {
        let sphere = IcosahedralSphere::new(7, 7.0 * 5.0, 0.05).unwrap();
        let tiles = sphere.tiles();
        for (i, a) in tiles.iter().enumerate() {
            for b in &tiles[i + 1..] {
                assert!(a.base_position.distance(b.base_position) > 0.05);
            }
        }
    }

    #[test]
    fn chunks_own_every_tile_once() {
        let sphere = IcosahedralSphere::new(8, 3.0, 0.05).unwrap();
        let tile_count = sphere.tiles().len();
        let grid = sphere.get_chunks(1, 1.1).unwrap();
        assert_eq!(grid.chunks.len(), 80);
        let mut owner = vec![None; tile_count];
        for (index, chunk) in grid.chunks.iter().enumerate() {
            assert_eq!(chunk.id.index(), index);
            assert!(!chunk.is_empty(), "chunk {index} is empty");
            for id in chunk.tiles() {
                assert!(owner[id.index()].is_none());
                owner[id.index()] = Some(chunk.id);
                assert_eq!(grid.tiles[id.index()].chunk, chunk.id);
            }
        }
        assert!(owner.iter().all(|o| o.is_some()));
    }

    #[test]
    fn chunk_vertices_end_on_sphere() {
        let grid = IcosahedralSphere::new(16, 4.0, 0.05)
            .unwrap()
            .get_chunks(2, 1.1)
            .unwrap();
        assert_eq!(grid.chunks.len(), 320);
        for chunk in &grid.chunks {
            for v in chunk.vertices() {
                assert!((v.length() - 4.0).abs() < 1e-3);
            }
        }
    }

    #[rstest]
    #[case(1)]
    #[case(1025)]
    fn rejects_face_size_out_of_range(#[case] face_size: u32) {
        assert!(matches!(
            IcosahedralSphere::new(face_size, 1.0, 0.05),
            Err(GlobeError::FaceSizeOutOfRange { .. })
        ));
    }

    #[rstest]
    #[case(2, 0, true)]
    #[case(8, 0, true)]
    #[case(8, 1, true)]
    #[case(8, 2, false)]
    #[case(9, 2, false)]
    #[case(16, 2, true)]
    #[case(16, 3, false)]
    #[case(80, 2, true)]
    #[case(5, 1, false)]
    #[case(2, 1, false)]
    fn division_depth_is_checked(#[case] face_size: u16, #[case] divisions: u32, #[case] ok: bool) {
        assert_eq!(IcosahedralSphere::check_divisions(face_size, divisions).is_ok(), ok);
    }

    #[rstest]
    #[case(5, 1)]
    #[case(8, 2)]
    #[case(9, 2)]
    fn small_split_children_are_rejected(#[case] face_size: u32, #[case] divisions: u32) {
        let sphere = IcosahedralSphere::new(face_size, 2.0, 0.05).unwrap();
        assert!(matches!(
            sphere.get_chunks(divisions, 1.1),
            Err(GlobeError::DegenerateChunk { .. })
        ));
    }

    #[rstest]
    #[case(2)]
    #[case(8)]
    #[case(13)]
    fn faces_start_as_full_triangles(#[case] face_size: u16) {
        let mut sphere = IcosahedralSphere {
            face_size,
            radius: 1.0,
            tolerance: 0.05,
            tiles: Vec::new(),
            removed: Vec::new(),
            chunks: Vec::new(),
        };
        sphere.generate_faces();

        let n = face_size as usize;
        assert_eq!(sphere.chunks.len(), ICOSAHEDRON_FACES);
        for chunk in &sphere.chunks {
            assert_eq!(chunk.len(), n * (n + 1) / 2);
        }
        assert_eq!(sphere.tiles.len(), ICOSAHEDRON_FACES * n * (n + 1) / 2);
        assert_eq!(sphere.removed.len(), sphere.tiles.len());
    }
}
