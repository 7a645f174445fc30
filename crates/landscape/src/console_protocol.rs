//! Console protocol types for the headless landscaping console.
//!
//! Scripts and test drivers talk to the terrain over newline-delimited JSON
//! on stdin/stdout: one [`ConsoleCommand`] per line in, one
//! [`ConsoleResponse`] per line out. Execution lives in [`crate::console`];
//! the I/O loop lives in `crates/app/src/console_mode.rs`.

use serde::{Deserialize, Serialize};

use crate::config::HEIGHT_INCREMENT;
use crate::direction::Corner;
use crate::landscaping::{EditAction, LandscapingTools, SmoothingOutcome, TerrainEditedEvent};
use crate::tile::{QuarterTile, TileCoord};

// ---------------------------------------------------------------------------
// Commands (stdin → console)
// ---------------------------------------------------------------------------

/// A single console command. The `cmd` field is the discriminator.
///
/// Rectangles are given by two opposite corner tiles, `from` and `to`, in
/// any order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "cmd")]
pub enum ConsoleCommand {
    /// Flatten a rectangle to one height.
    #[serde(rename = "level")]
    Level {
        from: TileCoord,
        to: TileCoord,
        height: f32,
    },

    #[serde(rename = "raise")]
    Raise {
        from: TileCoord,
        to: TileCoord,
        #[serde(default = "default_step")]
        step: f32,
    },

    #[serde(rename = "lower")]
    Lower {
        from: TileCoord,
        to: TileCoord,
        #[serde(default = "default_step")]
        step: f32,
    },

    /// Set one tile flat at a height.
    #[serde(rename = "tile_height")]
    TileHeight { tile: TileCoord, height: f32 },

    #[serde(rename = "vertex")]
    Vertex {
        tile: TileCoord,
        corner: Corner,
        height: f32,
    },

    /// Paint terrain and/or cliff ids over a rectangle.
    #[serde(rename = "paint")]
    Paint {
        from: TileCoord,
        to: TileCoord,
        #[serde(default)]
        terrain: Option<u8>,
        #[serde(default)]
        cliff: Option<u8>,
    },

    /// Set an overlay id over a rectangle; omit `overlay` to reset.
    #[serde(rename = "overlay")]
    Overlay {
        from: TileCoord,
        to: TileCoord,
        #[serde(default)]
        overlay: Option<u8>,
    },

    #[serde(rename = "toggle_grid")]
    ToggleGrid,

    #[serde(rename = "resize")]
    Resize { size: u32 },

    /// Regenerate the surface from a seed.
    #[serde(rename = "generate")]
    Generate { seed: u64 },

    #[serde(rename = "flatten")]
    Flatten {
        #[serde(default)]
        height: f32,
    },

    /// Change tool switches; omitted fields keep their value. Always
    /// answers with the resulting settings.
    #[serde(rename = "settings")]
    Settings(SettingsPatch),

    /// ASCII height map. With `block`, a downsampled overview; with `from`
    /// and `to`, a cropped detail map; otherwise the whole grid.
    #[serde(rename = "map")]
    Map {
        #[serde(default)]
        from: Option<TileCoord>,
        #[serde(default)]
        to: Option<TileCoord>,
        #[serde(default)]
        block: Option<u32>,
    },

    /// Inspect one tile.
    #[serde(rename = "tile")]
    Tile { tile: TileCoord },

    #[serde(rename = "quit")]
    Quit,
}

fn default_step() -> f32 {
    HEIGHT_INCREMENT
}

/// Partial update of the tool switches.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SettingsPatch {
    pub landscaping_enabled: Option<bool>,
    pub smoothing_enabled: Option<bool>,
    pub terrain_modification_enabled: Option<bool>,
    pub terrain_texture_painting_enabled: Option<bool>,
    pub terrain_cliff_painting_enabled: Option<bool>,
    pub current_terrain_texture: Option<u8>,
    pub current_cliff_texture: Option<u8>,
    pub smoothing_pass_limit: Option<u32>,
    pub advanced_construction_mode: Option<bool>,
}

impl SettingsPatch {
    pub fn apply(&self, tools: &mut LandscapingTools) {
        let set_bool = |target: &mut bool, value: Option<bool>| {
            if let Some(v) = value {
                *target = v;
            }
        };
        set_bool(&mut tools.landscaping_enabled, self.landscaping_enabled);
        set_bool(&mut tools.smoothing_enabled, self.smoothing_enabled);
        set_bool(
            &mut tools.terrain_modification_enabled,
            self.terrain_modification_enabled,
        );
        set_bool(
            &mut tools.terrain_texture_painting_enabled,
            self.terrain_texture_painting_enabled,
        );
        set_bool(
            &mut tools.terrain_cliff_painting_enabled,
            self.terrain_cliff_painting_enabled,
        );
        if let Some(id) = self.current_terrain_texture {
            tools.current_terrain_texture = id;
        }
        if let Some(id) = self.current_cliff_texture {
            tools.current_cliff_texture = id;
        }
        if let Some(limit) = self.smoothing_pass_limit {
            tools.smoothing_pass_limit = limit;
        }
    }
}

// ---------------------------------------------------------------------------
// Responses (console → stdout)
// ---------------------------------------------------------------------------

/// Every response carries the protocol version and a tagged payload.
#[derive(Debug, Serialize)]
pub struct ConsoleResponse {
    pub protocol_version: u32,
    #[serde(flatten)]
    pub payload: ResponsePayload,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum ResponsePayload {
    #[serde(rename = "ready")]
    Ready { world_size: u32 },

    /// One entry per edit applied by the command.
    #[serde(rename = "edited")]
    Edited { edits: Vec<EditSummary> },

    #[serde(rename = "settings")]
    Settings {
        tools: LandscapingTools,
        advanced_construction_mode: bool,
    },

    #[serde(rename = "map")]
    Map { map: String },

    #[serde(rename = "tile")]
    Tile { tile: QuarterTile },

    #[serde(rename = "error")]
    Error { message: String },

    #[serde(rename = "goodbye")]
    Goodbye,
}

/// Compact account of one applied edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditSummary {
    pub action: EditAction,
    pub changed: bool,
    pub targeted: usize,
    pub dirty_tiles: usize,
    pub dirty_chunks: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_height: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smoothing: Option<SmoothingSummary>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmoothingSummary {
    pub outcome: SmoothingOutcome,
    pub passes: u32,
    pub touched: usize,
}

impl From<&TerrainEditedEvent> for EditSummary {
    fn from(event: &TerrainEditedEvent) -> Self {
        let report = &event.report;
        Self {
            action: event.action,
            changed: report.changed,
            targeted: report.targeted.len(),
            dirty_tiles: report.dirty_tiles.len(),
            dirty_chunks: event.dirty_chunk_count,
            new_height: report.new_height,
            smoothing: report.smoothing.as_ref().map(|s| SmoothingSummary {
                outcome: s.outcome,
                passes: s.passes,
                touched: s.touched.len(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Bump when the command/response schema changes.
pub const PROTOCOL_VERSION: u32 = 1;

pub fn make_response(payload: ResponsePayload) -> ConsoleResponse {
    ConsoleResponse {
        protocol_version: PROTOCOL_VERSION,
        payload,
    }
}
