use bevy::prelude::*;

use crate::chunks::{DirtyChunkSet, PendingRedraws, RedrawLayers};
use crate::config::WorldConfig;
use crate::error::LandscapeError;
use crate::grid::TileGrid;
use crate::invariants::enforce_grid;
use crate::terrain_generation::{generate_terrain, GenerationParams};

use super::editor::{finite, EditReport};
use super::painting::{apply_overlay_change, paint_with_tools, toggle_overlay_grid};
use super::types::{
    EditAction, LandscapingTools, LevelTerrainEvent, ModifyTileHeightEvent, ModifyVertexEvent,
    PaintTerrainEvent, RaiseLowerTerrainEvent, RebuildTerrainEvent, ResizeWorldEvent,
    SetOverlayEvent, TerrainEditFailedEvent, TerrainEditedEvent, TerrainRebuild,
    ToggleOverlayGridEvent,
};

/// Queue redraws and announce the outcome of one edit.
fn publish(
    action: EditAction,
    result: Result<EditReport, LandscapeError>,
    chunk_size: u32,
    pending: &mut PendingRedraws,
    edited: &mut EventWriter<TerrainEditedEvent>,
    failed: &mut EventWriter<TerrainEditFailedEvent>,
) {
    match result {
        Ok(report) => {
            let chunks = report.dirty_chunks(chunk_size);
            if report.changed {
                pending.add(&chunks, report.layers);
            }
            if let Some(smoothing) = &report.smoothing {
                debug!(
                    "{action:?}: smoothing {:?} after {} passes, {} tiles touched",
                    smoothing.outcome,
                    smoothing.passes,
                    smoothing.touched.len()
                );
            }
            edited.send(TerrainEditedEvent {
                action,
                dirty_chunk_count: chunks.len(),
                report,
            });
        }
        Err(err) => {
            warn!("{action:?} rejected: {err}");
            failed.send(TerrainEditFailedEvent {
                action,
                message: err.to_string(),
            });
        }
    }
}

/// Report for operations that rewrite the whole grid.
fn whole_grid_report(layers: RedrawLayers) -> EditReport {
    EditReport {
        targeted: Vec::new(),
        dirty_tiles: Vec::new(),
        new_height: None,
        smoothing: None,
        layers,
        changed: true,
    }
}

// ---------------------------------------------------------------------------
// World-level commands
// ---------------------------------------------------------------------------

/// Resize, rebuild and grid toggles. Runs before height edits so a resize
/// never lands in the middle of a smoothing run.
#[allow(clippy::too_many_arguments)]
pub fn apply_world_commands(
    mut resizes: EventReader<ResizeWorldEvent>,
    mut rebuilds: EventReader<RebuildTerrainEvent>,
    mut toggles: EventReader<ToggleOverlayGridEvent>,
    mut grid: ResMut<TileGrid>,
    mut config: ResMut<WorldConfig>,
    mut generation: ResMut<GenerationParams>,
    mut pending: ResMut<PendingRedraws>,
    mut edited: EventWriter<TerrainEditedEvent>,
    mut failed: EventWriter<TerrainEditFailedEvent>,
) {
    for resize in resizes.read() {
        match grid.resize(resize.size) {
            Ok(()) => {
                config.world_size = grid.size();
                // New chunk entities are spawned dirty by the chunk sync.
                let chunk_count = DirtyChunkSet::all(grid.size(), config.chunk_size).len();
                edited.send(TerrainEditedEvent {
                    action: EditAction::Resize,
                    report: whole_grid_report(RedrawLayers::ALL),
                    dirty_chunk_count: chunk_count,
                });
            }
            Err(err) => {
                warn!("Resize to {} rejected: {err}", resize.size);
                failed.send(TerrainEditFailedEvent {
                    action: EditAction::Resize,
                    message: err.to_string(),
                });
            }
        }
    }

    for RebuildTerrainEvent(rebuild) in rebuilds.read() {
        match *rebuild {
            TerrainRebuild::Flat { height } => match finite(height) {
                Ok(height) => {
                    let height = config.clamp_height(height);
                    grid.flatten(height);
                    info!("Flattened terrain to {height}");
                }
                Err(err) => {
                    warn!("Flatten rejected: {err}");
                    failed.send(TerrainEditFailedEvent {
                        action: EditAction::Rebuild,
                        message: err.to_string(),
                    });
                    continue;
                }
            },
            TerrainRebuild::Generated { seed } => {
                *generation = GenerationParams::randomized(seed);
                generate_terrain(&mut grid, &generation, &config);
                enforce_grid(&mut grid, &config);
            }
        }
        let all = DirtyChunkSet::all(grid.size(), config.chunk_size);
        pending.add(&all, RedrawLayers::ALL);
        edited.send(TerrainEditedEvent {
            action: EditAction::Rebuild,
            report: whole_grid_report(RedrawLayers::ALL),
            dirty_chunk_count: all.len(),
        });
    }

    for _ in toggles.read() {
        config.grid_enabled = toggle_overlay_grid(&mut grid);
        let all = DirtyChunkSet::all(grid.size(), config.chunk_size);
        pending.add(&all, RedrawLayers::OVERLAY);
        edited.send(TerrainEditedEvent {
            action: EditAction::ToggleGrid,
            report: whole_grid_report(RedrawLayers::OVERLAY),
            dirty_chunk_count: all.len(),
        });
    }
}

// ---------------------------------------------------------------------------
// Height edits
// ---------------------------------------------------------------------------

/// Apply every height edit requested this frame, in event-type order.
#[allow(clippy::too_many_arguments)]
pub fn apply_terrain_edits(
    mut levels: EventReader<LevelTerrainEvent>,
    mut raise_lowers: EventReader<RaiseLowerTerrainEvent>,
    mut tile_heights: EventReader<ModifyTileHeightEvent>,
    mut vertices: EventReader<ModifyVertexEvent>,
    mut grid: ResMut<TileGrid>,
    tools: Res<LandscapingTools>,
    config: Res<WorldConfig>,
    mut pending: ResMut<PendingRedraws>,
    mut edited: EventWriter<TerrainEditedEvent>,
    mut failed: EventWriter<TerrainEditFailedEvent>,
) {
    #[cfg(feature = "trace")]
    let _span = bevy::log::info_span!("apply_terrain_edits").entered();

    let editor = tools.editor(&config);
    let chunk_size = config.chunk_size;

    for event in levels.read() {
        let result = editor.level_terrain(&mut grid, &event.tiles, event.height);
        publish(EditAction::Level, result, chunk_size, &mut pending, &mut edited, &mut failed);
    }
    for event in raise_lowers.read() {
        let result = editor.raise_or_lower(&mut grid, &event.tiles, event.raising, event.step);
        let action = if event.raising {
            EditAction::Raise
        } else {
            EditAction::Lower
        };
        publish(action, result, chunk_size, &mut pending, &mut edited, &mut failed);
    }
    for event in tile_heights.read() {
        let result = editor.modify_tile_height(&mut grid, event.tile, event.height);
        publish(EditAction::TileHeight, result, chunk_size, &mut pending, &mut edited, &mut failed);
    }
    for event in vertices.read() {
        let result = editor.modify_vertex(&mut grid, event.tile, event.corner, event.height);
        publish(EditAction::Vertex, result, chunk_size, &mut pending, &mut edited, &mut failed);
    }
}

// ---------------------------------------------------------------------------
// Classification edits
// ---------------------------------------------------------------------------

#[allow(clippy::too_many_arguments)]
pub fn apply_paint_and_overlay(
    mut paints: EventReader<PaintTerrainEvent>,
    mut overlays: EventReader<SetOverlayEvent>,
    mut grid: ResMut<TileGrid>,
    tools: Res<LandscapingTools>,
    config: Res<WorldConfig>,
    mut pending: ResMut<PendingRedraws>,
    mut edited: EventWriter<TerrainEditedEvent>,
    mut failed: EventWriter<TerrainEditFailedEvent>,
) {
    let chunk_size = config.chunk_size;
    for event in paints.read() {
        // Explicit ids override the tool's current textures; the painting
        // switches still gate each kind.
        let brush = LandscapingTools {
            current_terrain_texture: event
                .terrain_texture
                .unwrap_or(tools.current_terrain_texture),
            current_cliff_texture: event.cliff_texture.unwrap_or(tools.current_cliff_texture),
            ..tools.clone()
        };
        let result = paint_with_tools(&mut grid, &event.tiles, &brush);
        publish(EditAction::Paint, result, chunk_size, &mut pending, &mut edited, &mut failed);
    }
    for event in overlays.read() {
        let result = apply_overlay_change(&mut grid, &event.tiles, event.change);
        publish(EditAction::Overlay, result, chunk_size, &mut pending, &mut edited, &mut failed);
    }
}
