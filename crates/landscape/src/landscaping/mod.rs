//! The landscaping tool: height edits with neighbor smoothing, texture
//! painting and overlay changes, driven by Bevy events.

mod editor;
mod painting;
mod plugin;
mod smoothing;
mod systems;
mod types;

pub use editor::{highest_tiles, lowest_tiles, EditReport, TerrainEditor};
pub use painting::{
    apply_overlay_change, paint_textures, paint_with_tools, reset_overlay_to_default,
    set_cliff_type, set_overlay_types, toggle_overlay_grid, vertex_selection_overlay,
};
pub use plugin::LandscapingPlugin;
pub use smoothing::{
    conform_neighbor, needs_smoothing, propagate_smoothing, smoothing_pass, SmoothingOutcome,
    SmoothingReport,
};
pub use systems::{apply_paint_and_overlay, apply_terrain_edits, apply_world_commands};
pub use types::{
    EditAction, LandscapingTools, LevelTerrainEvent, ModifyTileHeightEvent, ModifyVertexEvent,
    OverlayChange, PaintTerrainEvent, RaiseLowerTerrainEvent, RebuildTerrainEvent,
    ResizeWorldEvent, SetOverlayEvent, TerrainEditFailedEvent, TerrainEditedEvent,
    TerrainRebuild, ToggleOverlayGridEvent,
};
