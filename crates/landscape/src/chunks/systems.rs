use bevy::prelude::*;

use crate::config::WorldConfig;
use crate::grid::TileGrid;

use super::types::{
    ChunkCoord, ChunkDirty, ChunkLayer, ChunkRenderer, PendingRedraws, TerrainChunk,
};

/// Keep one chunk entity per chunk and layer, respawning the whole set when
/// the grid size or chunk size changes. Fresh chunks start dirty.
pub fn sync_chunk_entities(
    mut commands: Commands,
    grid: Res<TileGrid>,
    config: Res<WorldConfig>,
    chunks: Query<Entity, With<TerrainChunk>>,
    mut spawned_for: Local<Option<(u32, u32)>>,
) {
    let key = (grid.size(), config.chunk_size);
    if *spawned_for == Some(key) {
        return;
    }
    *spawned_for = Some(key);

    for entity in &chunks {
        commands.entity(entity).despawn();
    }

    let per_side = grid.size().div_ceil(config.chunk_size.max(1));
    for layer in [ChunkLayer::Terrain, ChunkLayer::Overlay] {
        for z in 0..per_side {
            for x in 0..per_side {
                commands.spawn((
                    TerrainChunk {
                        chunk: ChunkCoord { x, z },
                        layer,
                    },
                    ChunkDirty,
                ));
            }
        }
    }
    debug!(
        "Spawned {} chunk entities per layer for a {}-tile grid",
        per_side * per_side,
        grid.size()
    );
}

/// Move pending redraw requests onto the chunk entities.
pub fn flag_dirty_chunks(
    mut commands: Commands,
    mut pending: ResMut<PendingRedraws>,
    chunks: Query<(Entity, &TerrainChunk), Without<ChunkDirty>>,
) {
    if pending.is_empty() {
        return;
    }
    for (entity, chunk) in &chunks {
        let set = match chunk.layer {
            ChunkLayer::Terrain => &pending.terrain,
            ChunkLayer::Overlay => &pending.overlay,
        };
        if set.contains(chunk.chunk) {
            commands.entity(entity).insert(ChunkDirty);
        }
    }
    pending.terrain.clear();
    pending.overlay.clear();
}

/// Hand every dirty chunk to the renderer `R`, terrain layer first.
pub fn draw_dirty_chunks<R: ChunkRenderer + Resource>(
    mut commands: Commands,
    grid: Res<TileGrid>,
    mut renderer: ResMut<R>,
    dirty: Query<(Entity, &TerrainChunk), With<ChunkDirty>>,
) {
    let mut queue: Vec<(ChunkLayer, ChunkCoord, Entity)> = dirty
        .iter()
        .map(|(entity, chunk)| (chunk.layer, chunk.chunk, entity))
        .collect();
    queue.sort_by_key(|(layer, chunk, _)| (*layer, *chunk));

    for (layer, chunk, entity) in queue {
        renderer.draw_tiles(chunk, &grid, layer == ChunkLayer::Overlay);
        commands.entity(entity).remove::<ChunkDirty>();
    }
}
