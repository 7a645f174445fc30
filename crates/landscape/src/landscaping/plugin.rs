use bevy::prelude::*;

use super::systems::{apply_paint_and_overlay, apply_terrain_edits, apply_world_commands};
use super::types::{
    LandscapingTools, LevelTerrainEvent, ModifyTileHeightEvent, ModifyVertexEvent,
    PaintTerrainEvent, RaiseLowerTerrainEvent, RebuildTerrainEvent, ResizeWorldEvent,
    SetOverlayEvent, TerrainEditFailedEvent, TerrainEditedEvent, ToggleOverlayGridEvent,
};

pub struct LandscapingPlugin;

impl Plugin for LandscapingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LandscapingTools>()
            .add_event::<LevelTerrainEvent>()
            .add_event::<RaiseLowerTerrainEvent>()
            .add_event::<ModifyTileHeightEvent>()
            .add_event::<ModifyVertexEvent>()
            .add_event::<PaintTerrainEvent>()
            .add_event::<SetOverlayEvent>()
            .add_event::<ResizeWorldEvent>()
            .add_event::<RebuildTerrainEvent>()
            .add_event::<ToggleOverlayGridEvent>()
            .add_event::<TerrainEditedEvent>()
            .add_event::<TerrainEditFailedEvent>()
            .add_systems(
                Update,
                apply_world_commands.in_set(crate::LandscapeSet::World),
            )
            .add_systems(
                Update,
                (apply_terrain_edits, apply_paint_and_overlay)
                    .chain()
                    .in_set(crate::LandscapeSet::Edit),
            );
    }
}
