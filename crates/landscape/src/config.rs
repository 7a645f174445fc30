//! World configuration for the terrain grid.
//!
//! Compile-time constants cover values the core treats as fixed (the slope
//! clamp increment, world size bounds). Everything a scenario may tune lives
//! in the [`WorldConfig`] resource, which can be loaded from JSON.

use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::LandscapeError;

/// Maximum height difference between two adjacent corners of one tile.
/// Diagonal corners may differ by twice this value.
pub const HEIGHT_INCREMENT: f32 = 0.25;

pub const MIN_WORLD_SIZE: u32 = 10;
pub const MAX_WORLD_SIZE: u32 = 500;
pub const DEFAULT_WORLD_SIZE: u32 = 250;
pub const DEFAULT_CHUNK_SIZE: u32 = 40;

/// Meters per side of a quarter tile.
pub const TILE_SIZE: f32 = 0.25;

/// Height change of one raise/lower step.
pub const TILE_HEIGHT_STEP: f32 = 0.5;
pub const MAX_HEIGHT: f32 = 25.0;
pub const BOTTOM_OF_MAP_HEIGHT: f32 = -6.0;
pub const BASE_ELEVATION: f32 = 0.0;

pub const DEFAULT_TERRAIN_TYPE: u8 = 0;
pub const DEFAULT_CLIFF_TYPE: u8 = 1;
pub const DEFAULT_OVERLAY_TYPE: u8 = 0;
/// Overlay id used when the selection grid is hidden.
pub const HIDDEN_GRID_OVERLAY: u8 = 6;

pub const SMOOTHING_PASS_LIMIT: u32 = 30;

/// Tunable world parameters, read-only to the terrain editor.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Tiles per side.
    pub world_size: u32,
    /// Tiles per side of each render chunk.
    pub chunk_size: u32,
    pub tile_size: f32,
    pub tile_height_step: f32,
    pub max_height: f32,
    pub bottom_of_map_height: f32,
    /// Height of freshly created tiles.
    pub base_elevation: f32,
    pub default_terrain_type: u8,
    pub default_cliff_type: u8,
    pub default_overlay_type: u8,
    /// Whether the checkerboard selection grid is shown on the overlay layer.
    pub grid_enabled: bool,
    /// Fine-grained editing: one quarter tile / one step at a time.
    pub advanced_construction_mode: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            world_size: DEFAULT_WORLD_SIZE,
            chunk_size: DEFAULT_CHUNK_SIZE,
            tile_size: TILE_SIZE,
            tile_height_step: TILE_HEIGHT_STEP,
            max_height: MAX_HEIGHT,
            bottom_of_map_height: BOTTOM_OF_MAP_HEIGHT,
            base_elevation: BASE_ELEVATION,
            default_terrain_type: DEFAULT_TERRAIN_TYPE,
            default_cliff_type: DEFAULT_CLIFF_TYPE,
            default_overlay_type: DEFAULT_OVERLAY_TYPE,
            grid_enabled: true,
            advanced_construction_mode: false,
        }
    }
}

impl WorldConfig {
    /// Lowest height an edit may write.
    pub fn min_edit_height(&self) -> f32 {
        self.bottom_of_map_height + self.tile_height_step
    }

    /// Clamp a height into the editable envelope.
    pub fn clamp_height(&self, height: f32) -> f32 {
        height.clamp(self.min_edit_height(), self.max_height)
    }

    /// Number of chunks per side, rounding up so partial chunks are covered.
    pub fn chunks_per_side(&self) -> u32 {
        self.world_size.div_ceil(self.chunk_size.max(1))
    }

    /// Parse a config from JSON, falling back to defaults for missing fields.
    pub fn from_json_str(json: &str) -> Result<Self, LandscapeError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, LandscapeError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Reject sizes the grid cannot be built with.
    pub fn validate(&self) -> Result<(), LandscapeError> {
        if !(MIN_WORLD_SIZE..=MAX_WORLD_SIZE).contains(&self.world_size) {
            return Err(LandscapeError::InvalidWorldSize(self.world_size));
        }
        if self.chunk_size == 0 {
            return Err(LandscapeError::InvalidChunkSize(self.chunk_size));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_envelope() {
        let config = WorldConfig::default();
        assert_eq!(config.min_edit_height(), -5.5);
        assert_eq!(config.clamp_height(-100.0), -5.5);
        assert_eq!(config.clamp_height(100.0), 25.0);
        assert_eq!(config.clamp_height(3.25), 3.25);
    }

    #[test]
    fn test_chunks_per_side_rounds_up() {
        let config = WorldConfig {
            world_size: 250,
            chunk_size: 40,
            ..Default::default()
        };
        assert_eq!(config.chunks_per_side(), 7);

        let exact = WorldConfig {
            world_size: 80,
            ..config
        };
        assert_eq!(exact.chunks_per_side(), 2);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config =
            WorldConfig::from_json_str(r#"{ "world_size": 64, "advanced_construction_mode": true }"#)
                .unwrap();
        assert_eq!(config.world_size, 64);
        assert!(config.advanced_construction_mode);
        assert_eq!(config.chunk_size, DEFAULT_CHUNK_SIZE);
        assert_eq!(config.max_height, MAX_HEIGHT);
    }

    #[test]
    fn test_json_rejects_out_of_range_size() {
        let err = WorldConfig::from_json_str(r#"{ "world_size": 9 }"#).unwrap_err();
        assert!(matches!(err, LandscapeError::InvalidWorldSize(9)));
    }

    #[test]
    fn test_json_rejects_malformed_input() {
        let err = WorldConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, LandscapeError::Config(_)));
    }
}
