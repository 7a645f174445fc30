//! Height edits on sets of tiles, followed by optional smoothing.
//!
//! Every entry point checks its whole input before touching the grid, so a
//! rejected edit leaves the terrain exactly as it was.

use std::collections::HashSet;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::chunks::{dirty_chunks, DirtyChunkSet, RedrawLayers};
use crate::config::{WorldConfig, SMOOTHING_PASS_LIMIT};
use crate::direction::Corner;
use crate::error::LandscapeError;
use crate::grid::TileGrid;
use crate::tile::TileCoord;

use super::smoothing::{propagate_smoothing, SmoothingReport};

/// Heights are quarter multiples; this only absorbs float noise from
/// repeated step arithmetic.
const HEIGHT_EPSILON: f32 = 1e-4;

#[inline]
fn same_height(a: f32, b: f32) -> bool {
    (a - b).abs() < HEIGHT_EPSILON
}

/// What an edit did to the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditReport {
    /// Tiles the edit wrote directly, after any lowest/highest filtering.
    pub targeted: Vec<TileCoord>,
    /// Targeted tiles plus every tile smoothing rewrote, deduplicated.
    pub dirty_tiles: Vec<TileCoord>,
    /// Height written to the targeted tiles, for height edits.
    pub new_height: Option<f32>,
    pub smoothing: Option<SmoothingReport>,
    pub layers: RedrawLayers,
    /// False when every tile already had the requested values.
    pub changed: bool,
}

impl EditReport {
    pub fn dirty_chunks(&self, chunk_size: u32) -> DirtyChunkSet {
        dirty_chunks(&self.dirty_tiles, chunk_size)
    }
}

/// The terrain editing engine.
///
/// Holds the switches that shape an edit; the grid is always passed in, so
/// one editor can be rebuilt from settings each frame at no cost.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainEditor {
    /// Conform neighbors after each edit ("mountain tool").
    pub smoothing_enabled: bool,
    pub smoothing_pass_limit: u32,
    pub modification_enabled: bool,
    /// Fine editing: raise/lower moves one step instead of two.
    pub advanced_mode: bool,
    pub min_height: f32,
    pub max_height: f32,
}

impl Default for TerrainEditor {
    fn default() -> Self {
        Self::from_config(&WorldConfig::default())
    }
}

impl TerrainEditor {
    pub fn from_config(config: &WorldConfig) -> Self {
        Self {
            smoothing_enabled: false,
            smoothing_pass_limit: SMOOTHING_PASS_LIMIT,
            modification_enabled: true,
            advanced_mode: config.advanced_construction_mode,
            min_height: config.min_edit_height(),
            max_height: config.max_height,
        }
    }

    pub fn with_smoothing(mut self, enabled: bool) -> Self {
        self.smoothing_enabled = enabled;
        self
    }

    pub fn with_pass_limit(mut self, limit: u32) -> Self {
        self.smoothing_pass_limit = limit;
        self
    }

    pub fn with_advanced_mode(mut self, enabled: bool) -> Self {
        self.advanced_mode = enabled;
        self
    }

    pub fn clamp_height(&self, height: f32) -> f32 {
        height.clamp(self.min_height, self.max_height)
    }

    fn checked_selection(
        &self,
        grid: &TileGrid,
        tiles: &[TileCoord],
    ) -> Result<Vec<TileCoord>, LandscapeError> {
        if !self.modification_enabled {
            return Err(LandscapeError::ModificationDisabled);
        }
        checked_tiles(grid, tiles)
    }

    /// Flatten every tile in `tiles` to `height`, then smooth around them.
    pub fn level_terrain(
        &self,
        grid: &mut TileGrid,
        tiles: &[TileCoord],
        height: f32,
    ) -> Result<EditReport, LandscapeError> {
        let height = finite(height)?;
        let tiles = self.checked_selection(grid, tiles)?;
        Ok(self.apply_level(grid, tiles, height))
    }

    fn apply_level(&self, grid: &mut TileGrid, tiles: Vec<TileCoord>, height: f32) -> EditReport {
        let height = self.clamp_height(height);
        let mut changed = false;
        for &t in &tiles {
            if let Some(tile) = grid.tile_mut(t) {
                if tile.is_slope() || !same_height(tile.height(), height) {
                    changed = true;
                }
                tile.set_uniform_height(height);
            }
        }
        self.finish(grid, tiles, Some(height), changed)
    }

    /// Raise the lowest or lower the highest tiles of a selection by one
    /// step (advanced mode) or two steps (basic mode).
    ///
    /// On an uneven selection only the extreme tiles move, so repeated calls
    /// terrace the selection toward level. A sloped tile one step off the
    /// extreme counts as extreme, since its top corner already sits there.
    pub fn raise_or_lower(
        &self,
        grid: &mut TileGrid,
        tiles: &[TileCoord],
        raising: bool,
        step: f32,
    ) -> Result<EditReport, LandscapeError> {
        let step = finite(step)?;
        let tiles = self.checked_selection(grid, tiles)?;
        let heights: Vec<(TileCoord, f32, bool)> = tiles
            .iter()
            .filter_map(|t| grid.tile(*t).map(|tile| (*t, tile.height(), tile.is_slope())))
            .collect();
        let min = heights.iter().map(|h| h.1).fold(f32::INFINITY, f32::min);
        let max = heights.iter().map(|h| h.1).fold(f32::NEG_INFINITY, f32::max);

        let operand: Vec<TileCoord> = if same_height(min, max) {
            tiles
        } else if raising {
            lowest_tiles(&heights, min, step)
        } else {
            highest_tiles(&heights, max, step)
        };

        let delta = if self.advanced_mode { step } else { step * 2.0 };
        let new_height = if raising { min + delta } else { max - delta };
        debug!(
            "{} {} of {} tiles to {new_height}",
            if raising { "Raising" } else { "Lowering" },
            operand.len(),
            heights.len()
        );
        Ok(self.apply_level(grid, operand, new_height))
    }

    /// Flatten a single tile to `height`.
    pub fn modify_tile_height(
        &self,
        grid: &mut TileGrid,
        tile: TileCoord,
        height: f32,
    ) -> Result<EditReport, LandscapeError> {
        self.level_terrain(grid, &[tile], height)
    }

    /// Move one corner of one tile, dragging the tile's other corners into
    /// slope range, then smooth around the tile.
    pub fn modify_vertex(
        &self,
        grid: &mut TileGrid,
        tile: TileCoord,
        corner: Corner,
        height: f32,
    ) -> Result<EditReport, LandscapeError> {
        let height = self.clamp_height(finite(height)?);
        let tiles = self.checked_selection(grid, &[tile])?;
        let mut changed = false;
        if let Some(t) = grid.tile_mut(tile) {
            let before = t.corners();
            t.set_corner_height(corner, height);
            changed = before != t.corners();
        }
        Ok(self.finish(grid, tiles, Some(height), changed))
    }

    /// Smooth (if enabled) and assemble the report for a height edit.
    fn finish(
        &self,
        grid: &mut TileGrid,
        targeted: Vec<TileCoord>,
        new_height: Option<f32>,
        changed: bool,
    ) -> EditReport {
        let mut dirty_tiles = targeted.clone();
        let smoothing = if self.smoothing_enabled && !targeted.is_empty() {
            let report = propagate_smoothing(grid, &targeted, self.smoothing_pass_limit);
            dirty_tiles.extend(report.touched.iter().copied());
            Some(report)
        } else {
            None
        };
        debug_assert!(
            dirty_tiles
                .iter()
                .filter_map(|t| grid.tile(*t))
                .all(crate::invariants::slope_clamp_holds),
            "edit left a tile outside the slope clamp"
        );
        let changed = changed
            || smoothing
                .as_ref()
                .is_some_and(|report| !report.touched.is_empty());
        EditReport {
            targeted,
            dirty_tiles,
            new_height,
            smoothing,
            layers: RedrawLayers::ALL,
            changed,
        }
    }
}

/// Reject NaN and infinities; `f32::clamp` passes NaN through.
pub(crate) fn finite(value: f32) -> Result<f32, LandscapeError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(LandscapeError::NonFiniteHeight(value))
    }
}

/// Deduplicate `tiles`, keeping first-seen order, and make sure every one
/// exists.
pub(crate) fn checked_tiles(
    grid: &TileGrid,
    tiles: &[TileCoord],
) -> Result<Vec<TileCoord>, LandscapeError> {
    if tiles.is_empty() {
        return Err(LandscapeError::EmptySelection);
    }
    let mut seen = HashSet::with_capacity(tiles.len());
    let mut out = Vec::with_capacity(tiles.len());
    for &t in tiles {
        grid.require(t)?;
        if seen.insert(t) {
            out.push(t);
        }
    }
    Ok(out)
}

/// Tiles at the selection minimum, plus slopes whose top is one step above.
pub fn lowest_tiles(heights: &[(TileCoord, f32, bool)], min: f32, step: f32) -> Vec<TileCoord> {
    heights
        .iter()
        .filter(|(_, h, slope)| same_height(*h, min) || (*slope && same_height(*h, min + step)))
        .map(|(t, _, _)| *t)
        .collect()
}

/// Tiles at the selection maximum, plus slopes whose top is one step below.
pub fn highest_tiles(heights: &[(TileCoord, f32, bool)], max: f32, step: f32) -> Vec<TileCoord> {
    heights
        .iter()
        .filter(|(_, h, slope)| same_height(*h, max) || (*slope && same_height(*h, max - step)))
        .map(|(t, _, _)| *t)
        .collect()
}
