use globegen::globe::editing::EditOutcome;
use globegen::grid::{ChunkId, TileId};
use globegen::Globe;
use std::collections::BTreeSet;

/// Pointer state for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditInput {
    pub primary_pressed: bool,
    pub secondary_pressed: bool,
    pub hovered: Option<TileId>,
}

/// Turns pointer input into terrain edits.
///
/// The primary button raises the hovered tile and the secondary one lowers
/// it. Holding a button edits each tile once until the pointer moves on.
/// Tiles touched by edits pile up until the renderer takes them.
#[derive(Debug, Default)]
pub struct TerrainEditor {
    last_tile: Option<TileId>,
    invalidated: BTreeSet<TileId>,
}

impl TerrainEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, globe: &mut Globe, input: &EditInput) -> Option<EditOutcome> {
        if !input.primary_pressed && !input.secondary_pressed {
            self.last_tile = None;
            return None;
        }
        let tile = input.hovered?;
        if self.last_tile == Some(tile) {
            return None;
        }
        if globe.tile(tile).is_none() {
            log::warn!("ignoring edit of unknown tile {tile}");
            return None;
        }
        self.last_tile = Some(tile);

        let outcome = if input.primary_pressed {
            globe.raise_tile(tile)
        } else {
            globe.lower_tile(tile)
        };
        self.invalidated.extend(outcome.changed.iter().copied());
        Some(outcome)
    }

    /// Tiles whose meshes must be rebuilt since the last call.
    pub fn take_invalidated(&mut self) -> Vec<TileId> {
        std::mem::take(&mut self.invalidated).into_iter().collect()
    }

    /// Chunks owning any of `tiles`.
    pub fn affected_chunks(globe: &Globe, tiles: &[TileId]) -> BTreeSet<ChunkId> {
        tiles
            .iter()
            .filter_map(|id| globe.tile(*id))
            .map(|tile| tile.chunk)
            .collect()
    }
}
