use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{WorldConfig, DEFAULT_CLIFF_TYPE, DEFAULT_TERRAIN_TYPE, SMOOTHING_PASS_LIMIT};
use crate::direction::Corner;
use crate::tile::TileCoord;

use super::editor::{EditReport, TerrainEditor};
use super::smoothing::SmoothingOutcome;

// ---------------------------------------------------------------------------
// Landscaping tool settings
// ---------------------------------------------------------------------------

/// Player-facing switches of the landscaping tool.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandscapingTools {
    /// Tool window open.
    pub landscaping_enabled: bool,
    /// Conform neighbors after edits.
    pub smoothing_enabled: bool,
    pub terrain_modification_enabled: bool,
    pub terrain_texture_painting_enabled: bool,
    pub terrain_cliff_painting_enabled: bool,
    pub current_terrain_texture: u8,
    pub current_cliff_texture: u8,
    pub smoothing_pass_limit: u32,
}

impl Default for LandscapingTools {
    fn default() -> Self {
        Self {
            landscaping_enabled: false,
            smoothing_enabled: false,
            terrain_modification_enabled: true,
            terrain_texture_painting_enabled: false,
            terrain_cliff_painting_enabled: false,
            current_terrain_texture: DEFAULT_TERRAIN_TYPE,
            current_cliff_texture: DEFAULT_CLIFF_TYPE,
            smoothing_pass_limit: SMOOTHING_PASS_LIMIT,
        }
    }
}

impl LandscapingTools {
    /// Open or close the tool. Closing also switches painting off.
    pub fn toggle(&mut self) {
        self.landscaping_enabled = !self.landscaping_enabled;
        if !self.landscaping_enabled {
            self.terrain_texture_painting_enabled = false;
            self.terrain_cliff_painting_enabled = false;
        }
    }

    /// Editor configured from these switches and the world envelope.
    pub fn editor(&self, config: &WorldConfig) -> TerrainEditor {
        TerrainEditor {
            smoothing_enabled: self.smoothing_enabled,
            smoothing_pass_limit: self.smoothing_pass_limit,
            modification_enabled: self.terrain_modification_enabled,
            ..TerrainEditor::from_config(config)
        }
    }
}

// ---------------------------------------------------------------------------
// Input events
// ---------------------------------------------------------------------------

/// Flatten `tiles` to `height`.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct LevelTerrainEvent {
    pub tiles: Vec<TileCoord>,
    pub height: f32,
}

/// Raise the lowest / lower the highest tiles of `tiles`.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct RaiseLowerTerrainEvent {
    pub tiles: Vec<TileCoord>,
    pub raising: bool,
    pub step: f32,
}

#[derive(Event, Debug, Clone, PartialEq)]
pub struct ModifyTileHeightEvent {
    pub tile: TileCoord,
    pub height: f32,
}

#[derive(Event, Debug, Clone, PartialEq)]
pub struct ModifyVertexEvent {
    pub tile: TileCoord,
    pub corner: Corner,
    pub height: f32,
}

/// Paint texture and/or cliff ids, subject to the painting switches.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct PaintTerrainEvent {
    pub tiles: Vec<TileCoord>,
    pub terrain_texture: Option<u8>,
    pub cliff_texture: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverlayChange {
    Set(u8),
    /// Back to the grid tag, or the hidden-grid overlay.
    Reset,
}

#[derive(Event, Debug, Clone, PartialEq)]
pub struct SetOverlayEvent {
    pub tiles: Vec<TileCoord>,
    pub change: OverlayChange,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeWorldEvent {
    pub size: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TerrainRebuild {
    Flat { height: f32 },
    Generated { seed: u64 },
}

/// Replace the whole surface, keeping the grid size.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct RebuildTerrainEvent(pub TerrainRebuild);

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleOverlayGridEvent;

// ---------------------------------------------------------------------------
// Output events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditAction {
    Level,
    Raise,
    Lower,
    TileHeight,
    Vertex,
    Paint,
    Overlay,
    Resize,
    Rebuild,
    ToggleGrid,
}

/// Sent after an edit (and all its smoothing) has been applied.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct TerrainEditedEvent {
    pub action: EditAction,
    pub report: EditReport,
    pub dirty_chunk_count: usize,
}

impl TerrainEditedEvent {
    pub fn smoothing_outcome(&self) -> Option<SmoothingOutcome> {
        self.report.smoothing.as_ref().map(|s| s.outcome)
    }
}

/// Sent when an edit was rejected; the grid is unchanged.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct TerrainEditFailedEvent {
    pub action: EditAction,
    pub message: String,
}
