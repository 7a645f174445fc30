use std::collections::BTreeSet;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::grid::TileGrid;
use crate::tile::TileCoord;

/// Index of a render chunk: tile coordinate divided by the chunk size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub x: u32,
    pub z: u32,
}

/// The two mesh layers drawn per chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ChunkLayer {
    /// Ground surface, textures and cliffs.
    Terrain,
    /// Selection grid and highlight overlay.
    Overlay,
}

/// Which layers an edit invalidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RedrawLayers {
    pub terrain: bool,
    pub overlay: bool,
}

impl RedrawLayers {
    pub const NONE: Self = Self {
        terrain: false,
        overlay: false,
    };
    /// Height edits move both the ground and the overlay drawn on top of it.
    pub const ALL: Self = Self {
        terrain: true,
        overlay: true,
    };
    pub const TERRAIN: Self = Self {
        terrain: true,
        overlay: false,
    };
    pub const OVERLAY: Self = Self {
        terrain: false,
        overlay: true,
    };
}

#[inline]
pub fn chunk_at_tile(tile: TileCoord, chunk_size: u32) -> ChunkCoord {
    let size = chunk_size.max(1);
    ChunkCoord {
        x: tile.x / size,
        z: tile.z / size,
    }
}

/// Deduplicated set of chunks to redraw, iterated in coordinate order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirtyChunkSet {
    chunks: BTreeSet<ChunkCoord>,
}

impl DirtyChunkSet {
    /// Every chunk of a `grid_size`-tile grid.
    pub fn all(grid_size: u32, chunk_size: u32) -> Self {
        let per_side = grid_size.div_ceil(chunk_size.max(1));
        (0..per_side)
            .flat_map(|z| (0..per_side).map(move |x| ChunkCoord { x, z }))
            .collect()
    }

    pub fn insert(&mut self, chunk: ChunkCoord) -> bool {
        self.chunks.insert(chunk)
    }

    pub fn insert_tile(&mut self, tile: TileCoord, chunk_size: u32) -> bool {
        self.insert(chunk_at_tile(tile, chunk_size))
    }

    pub fn extend(&mut self, other: &DirtyChunkSet) {
        self.chunks.extend(other.chunks.iter().copied());
    }

    pub fn contains(&self, chunk: ChunkCoord) -> bool {
        self.chunks.contains(&chunk)
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.chunks.iter().copied()
    }

    pub fn clear(&mut self) {
        self.chunks.clear();
    }

    /// Ask `renderer` to redraw every chunk in the set, then empty it.
    pub fn draw(&mut self, grid: &TileGrid, renderer: &mut impl ChunkRenderer, overlay: bool) {
        for chunk in std::mem::take(&mut self.chunks) {
            renderer.draw_tiles(chunk, grid, overlay);
        }
    }
}

impl FromIterator<ChunkCoord> for DirtyChunkSet {
    fn from_iter<I: IntoIterator<Item = ChunkCoord>>(iter: I) -> Self {
        Self {
            chunks: iter.into_iter().collect(),
        }
    }
}

/// Chunks owning any of `tiles`.
pub fn dirty_chunks(tiles: &[TileCoord], chunk_size: u32) -> DirtyChunkSet {
    tiles
        .iter()
        .map(|t| chunk_at_tile(*t, chunk_size))
        .collect()
}

/// Contract of the external mesh builder.
///
/// `draw_tiles` regenerates only the geometry of `chunk`, reading whatever
/// tiles it needs from the full grid.
pub trait ChunkRenderer {
    fn draw_tiles(&mut self, chunk: ChunkCoord, grid: &TileGrid, overlay: bool);
}

/// Redraw requests accumulated by edits and not yet handed to chunk entities.
#[derive(Resource, Debug, Default)]
pub struct PendingRedraws {
    pub terrain: DirtyChunkSet,
    pub overlay: DirtyChunkSet,
}

impl PendingRedraws {
    pub fn add(&mut self, chunks: &DirtyChunkSet, layers: RedrawLayers) {
        if layers.terrain {
            self.terrain.extend(chunks);
        }
        if layers.overlay {
            self.overlay.extend(chunks);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.terrain.is_empty() && self.overlay.is_empty()
    }
}

/// One chunk mesh of one layer.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerrainChunk {
    pub chunk: ChunkCoord,
    pub layer: ChunkLayer,
}

/// Marker: this chunk's mesh is stale.
#[derive(Component)]
pub struct ChunkDirty;
