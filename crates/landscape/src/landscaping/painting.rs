//! Texture, cliff and overlay classification edits.
//!
//! These never touch heights, so they skip smoothing and only invalidate the
//! layer that draws the changed ids.

use crate::chunks::RedrawLayers;
use crate::direction::{Corner, FULL_TILE_SELECTION_OVERLAY};
use crate::error::LandscapeError;
use crate::grid::TileGrid;
use crate::tile::TileCoord;

use super::editor::{checked_tiles, EditReport};
use super::types::{LandscapingTools, OverlayChange};

fn classification_report(targeted: Vec<TileCoord>, layers: RedrawLayers, changed: bool) -> EditReport {
    EditReport {
        dirty_tiles: targeted.clone(),
        targeted,
        new_height: None,
        smoothing: None,
        layers,
        changed,
    }
}

/// Write terrain and/or cliff ids. `None` leaves that id alone.
pub fn paint_textures(
    grid: &mut TileGrid,
    tiles: &[TileCoord],
    terrain_texture: Option<u8>,
    cliff_texture: Option<u8>,
) -> Result<EditReport, LandscapeError> {
    let tiles = checked_tiles(grid, tiles)?;
    let mut changed = false;
    for &t in &tiles {
        let Some(tile) = grid.tile_mut(t) else {
            continue;
        };
        if let Some(terrain) = terrain_texture {
            changed |= tile.terrain_type != terrain;
            tile.terrain_type = terrain;
        }
        if let Some(cliff) = cliff_texture {
            changed |= tile.cliff_type != cliff;
            tile.cliff_type = cliff;
        }
    }
    Ok(classification_report(tiles, RedrawLayers::TERRAIN, changed))
}

/// Paint with the tool's current textures, dropping whichever painting mode
/// is switched off.
pub fn paint_with_tools(
    grid: &mut TileGrid,
    tiles: &[TileCoord],
    tools: &LandscapingTools,
) -> Result<EditReport, LandscapeError> {
    paint_textures(
        grid,
        tiles,
        tools
            .terrain_texture_painting_enabled
            .then_some(tools.current_terrain_texture),
        tools
            .terrain_cliff_painting_enabled
            .then_some(tools.current_cliff_texture),
    )
}

pub fn set_cliff_type(
    grid: &mut TileGrid,
    tiles: &[TileCoord],
    cliff_type: u8,
) -> Result<EditReport, LandscapeError> {
    paint_textures(grid, tiles, None, Some(cliff_type))
}

pub fn set_overlay_types(
    grid: &mut TileGrid,
    tiles: &[TileCoord],
    overlay: u8,
) -> Result<EditReport, LandscapeError> {
    let tiles = checked_tiles(grid, tiles)?;
    let mut changed = false;
    for &t in &tiles {
        if let Some(tile) = grid.tile_mut(t) {
            changed |= tile.overlay_type != overlay;
            tile.overlay_type = overlay;
        }
    }
    Ok(classification_report(tiles, RedrawLayers::OVERLAY, changed))
}

/// Put the grid tag (or the hidden-grid overlay) back on `tiles`.
pub fn reset_overlay_to_default(
    grid: &mut TileGrid,
    tiles: &[TileCoord],
) -> Result<EditReport, LandscapeError> {
    let tiles = checked_tiles(grid, tiles)?;
    let grid_enabled = grid.defaults().grid_enabled;
    let mut changed = false;
    for &t in &tiles {
        if let Some(tile) = grid.tile_mut(t) {
            let before = tile.overlay_type;
            tile.reset_overlay(grid_enabled);
            changed |= before != tile.overlay_type;
        }
    }
    Ok(classification_report(tiles, RedrawLayers::OVERLAY, changed))
}

pub fn apply_overlay_change(
    grid: &mut TileGrid,
    tiles: &[TileCoord],
    change: OverlayChange,
) -> Result<EditReport, LandscapeError> {
    match change {
        OverlayChange::Set(overlay) => set_overlay_types(grid, tiles, overlay),
        OverlayChange::Reset => reset_overlay_to_default(grid, tiles),
    }
}

/// Overlay id highlighting `corner`, or the whole tile for `None`.
pub fn vertex_selection_overlay(corner: Option<Corner>) -> u8 {
    corner.map_or(FULL_TILE_SELECTION_OVERLAY, Corner::selection_overlay)
}

/// Flip the checkerboard grid on every tile. Returns the new state.
pub fn toggle_overlay_grid(grid: &mut TileGrid) -> bool {
    let enabled = !grid.defaults().grid_enabled;
    grid.set_grid_enabled(enabled);
    enabled
}
