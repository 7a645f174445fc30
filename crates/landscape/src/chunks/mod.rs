//! Chunk index: which render chunk owns which tiles, and which chunks need a
//! redraw after an edit.
//!
//! The mesh builder itself lives outside this crate. It either implements
//! [`ChunkRenderer`] and is driven by [`ChunkRendererPlugin`], or watches for
//! the [`ChunkDirty`] marker on [`TerrainChunk`] entities.

mod plugin;
mod systems;
#[cfg(test)]
mod tests;
mod types;

pub use plugin::ChunkRendererPlugin;
pub use systems::{draw_dirty_chunks, flag_dirty_chunks, sync_chunk_entities};
pub use types::{
    chunk_at_tile, dirty_chunks, ChunkCoord, ChunkDirty, ChunkLayer, ChunkRenderer,
    DirtyChunkSet, PendingRedraws, RedrawLayers, TerrainChunk,
};
