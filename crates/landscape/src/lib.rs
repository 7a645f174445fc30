use bevy::prelude::*;

pub mod ascii_map;
pub mod chunks;
pub mod config;
pub mod console;
pub mod console_protocol;
pub mod direction;
pub mod error;
pub mod full_tile;
pub mod grid;
pub mod invariants;
pub mod landscape_sets;
pub mod landscaping;
pub mod selection;
pub mod selection_input;
pub mod terrain_generation;
pub mod tile;


#[cfg(any(test, feature = "bench"))]
pub mod test_harness;

pub use landscape_sets::LandscapeSet;

use chunks::{flag_dirty_chunks, sync_chunk_entities, PendingRedraws};
use config::WorldConfig;
use grid::TileGrid;
use invariants::{validate_edited_tiles, TerrainInvariantViolations};
use landscaping::LandscapingPlugin;
use selection_input::SelectionInputPlugin;
use terrain_generation::GenerationParams;

/// Headless terrain grid, landscaping tool and chunk bookkeeping.
///
/// A `WorldConfig` or `TileGrid` inserted before this plugin is kept;
/// otherwise a flat grid is built from the default config.
pub struct LandscapePlugin;

impl Plugin for LandscapePlugin {
    fn build(&self, app: &mut App) {
        landscape_sets::configure_sets(app);

        app.init_resource::<WorldConfig>();
        match app.world().get_resource::<TileGrid>().map(TileGrid::size) {
            Some(size) => app.world_mut().resource_mut::<WorldConfig>().world_size = size,
            None => {
                let grid = TileGrid::from_config(app.world().resource::<WorldConfig>());
                app.insert_resource(grid);
            }
        }

        app.init_resource::<PendingRedraws>()
            .init_resource::<GenerationParams>()
            .init_resource::<TerrainInvariantViolations>()
            .add_plugins((LandscapingPlugin, SelectionInputPlugin))
            .add_systems(
                Update,
                validate_edited_tiles.in_set(LandscapeSet::Validate),
            )
            .add_systems(
                Update,
                (sync_chunk_entities, flag_dirty_chunks)
                    .chain()
                    .in_set(LandscapeSet::Redraw),
            );

        let config = app.world().resource::<WorldConfig>();
        info!(
            "Landscape ready: {}x{} tiles, chunk size {}",
            config.world_size, config.world_size, config.chunk_size
        );
    }
}
