//! # TestWorld: headless integration test harness for the landscaping tool
//!
//! Wraps `bevy::app::App` + `LandscapePlugin` with a fluent builder so tests
//! can set up terrain, send edit events, tick frames and assert on the grid
//! without a window or renderer.

use bevy::app::App;
use bevy::prelude::*;

use crate::chunks::{ChunkCoord, ChunkDirty, ChunkLayer, TerrainChunk};
use crate::config::WorldConfig;
use crate::direction::Corner;
use crate::grid::TileGrid;
use crate::invariants::TerrainInvariantViolations;
use crate::landscaping::{
    LandscapingTools, LevelTerrainEvent, ModifyTileHeightEvent, ModifyVertexEvent,
    RaiseLowerTerrainEvent, TerrainEditFailedEvent, TerrainEditedEvent,
};
use crate::selection_input::{PointerAction, PointerEvent, PointerHit};
use crate::tile::{QuarterTile, TileCoord};
use crate::LandscapePlugin;

/// A headless Bevy App wrapping `LandscapePlugin` for integration testing.
pub struct TestWorld {
    app: App,
    /// Edits and rejections reported by the most recent `tick` frame.
    last_edits: Vec<TerrainEditedEvent>,
    last_failures: Vec<TerrainEditFailedEvent>,
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorld {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    /// A flat 250×250 world with default config and the landscaping tool
    /// open.
    pub fn new() -> Self {
        Self::with_config(WorldConfig::default())
    }

    /// A flat world of `size` tiles per side with 10-tile chunks.
    pub fn sized(size: u32) -> Self {
        Self::with_config(WorldConfig {
            world_size: size,
            chunk_size: 10,
            ..Default::default()
        })
    }

    /// Build from an explicit config. Chunk entities are spawned by the
    /// first update.
    pub fn with_config(config: WorldConfig) -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(config);
        app.add_plugins(LandscapePlugin);
        app.world_mut()
            .resource_mut::<LandscapingTools>()
            .landscaping_enabled = true;
        let mut world = Self {
            app,
            last_edits: Vec::new(),
            last_failures: Vec::new(),
        };
        world.tick(1);
        world
    }

    // -----------------------------------------------------------------------
    // World setup (builder pattern: consumes and returns Self)
    // -----------------------------------------------------------------------

    /// Resize the grid directly, bypassing the event path.
    pub fn with_size(mut self, size: u32) -> Self {
        {
            let world = self.app.world_mut();
            if world.resource_mut::<TileGrid>().resize(size).is_ok() {
                let actual = world.resource::<TileGrid>().size();
                world.resource_mut::<WorldConfig>().world_size = actual;
            }
        }
        self.tick(1);
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: u32) -> Self {
        self.app.world_mut().resource_mut::<WorldConfig>().chunk_size = chunk_size;
        self.tick(1);
        self
    }

    /// Set one tile flat at `height` without smoothing or events.
    pub fn with_height(mut self, x: u32, z: u32, height: f32) -> Self {
        if let Some(tile) = self.app.world_mut().resource_mut::<TileGrid>().get_mut(x, z) {
            tile.set_uniform_height(height);
        }
        self
    }

    pub fn with_smoothing(mut self, enabled: bool) -> Self {
        self.app
            .world_mut()
            .resource_mut::<LandscapingTools>()
            .smoothing_enabled = enabled;
        self
    }

    pub fn with_advanced_mode(mut self, enabled: bool) -> Self {
        self.app
            .world_mut()
            .resource_mut::<WorldConfig>()
            .advanced_construction_mode = enabled;
        self
    }

    pub fn with_tools(mut self, tools: LandscapingTools) -> Self {
        self.app.insert_resource(tools);
        self
    }

    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------

    pub fn send<E: Event>(&mut self, event: E) -> &mut Self {
        self.app.world_mut().send_event(event);
        self
    }

    pub fn send_level(&mut self, tiles: Vec<TileCoord>, height: f32) -> &mut Self {
        self.send(LevelTerrainEvent { tiles, height })
    }

    pub fn send_raise(&mut self, tiles: Vec<TileCoord>, step: f32) -> &mut Self {
        self.send(RaiseLowerTerrainEvent {
            tiles,
            raising: true,
            step,
        })
    }

    pub fn send_lower(&mut self, tiles: Vec<TileCoord>, step: f32) -> &mut Self {
        self.send(RaiseLowerTerrainEvent {
            tiles,
            raising: false,
            step,
        })
    }

    pub fn send_tile_height(&mut self, tile: TileCoord, height: f32) -> &mut Self {
        self.send(ModifyTileHeightEvent { tile, height })
    }

    pub fn send_vertex(&mut self, tile: TileCoord, corner: Corner, height: f32) -> &mut Self {
        self.send(ModifyVertexEvent {
            tile,
            corner,
            height,
        })
    }

    /// One pointer sample at the center of `tile`.
    pub fn send_pointer(
        &mut self,
        action: PointerAction,
        tile: TileCoord,
        screen_y: f32,
        modifier: bool,
    ) -> &mut Self {
        self.send(PointerEvent {
            action,
            hit: Some(PointerHit::new(tile, 0.5, 0.5)),
            screen_y,
            modifier,
        })
    }

    // -----------------------------------------------------------------------
    // Frames
    // -----------------------------------------------------------------------

    /// Run `n` full frames, keeping the edit outcomes of the last one.
    ///
    /// Event buffers only swap on fixed-timestep ticks, so outcomes are read
    /// through cursors taken before each frame.
    pub fn tick(&mut self, n: u32) -> &mut Self {
        for _ in 0..n {
            let world = self.app.world();
            let mut edited = world
                .resource::<Events<TerrainEditedEvent>>()
                .get_cursor_current();
            let mut failed = world
                .resource::<Events<TerrainEditFailedEvent>>()
                .get_cursor_current();

            self.app.update();

            let world = self.app.world();
            self.last_edits = edited
                .read(world.resource::<Events<TerrainEditedEvent>>())
                .cloned()
                .collect();
            self.last_failures = failed
                .read(world.resource::<Events<TerrainEditFailedEvent>>())
                .cloned()
                .collect();
        }
        self
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    pub fn resource<T: Resource>(&self) -> &T {
        self.app.world().resource::<T>()
    }

    pub fn grid(&self) -> &TileGrid {
        self.resource::<TileGrid>()
    }

    pub fn config(&self) -> &WorldConfig {
        self.resource::<WorldConfig>()
    }

    /// Panics if `(x, z)` is outside the grid.
    pub fn tile(&self, x: u32, z: u32) -> &QuarterTile {
        self.grid()
            .get(x, z)
            .unwrap_or_else(|| panic!("tile ({x}, {z}) outside the grid"))
    }

    pub fn height(&self, x: u32, z: u32) -> f32 {
        self.tile(x, z).height()
    }

    pub fn violations(&self) -> &TerrainInvariantViolations {
        self.resource::<TerrainInvariantViolations>()
    }

    /// Edits reported during the last frame.
    pub fn last_edits(&self) -> Vec<TerrainEditedEvent> {
        self.last_edits.clone()
    }

    /// Rejections reported during the last frame.
    pub fn last_failures(&self) -> Vec<TerrainEditFailedEvent> {
        self.last_failures.clone()
    }

    /// Chunk entities of `layer` currently marked dirty, sorted.
    pub fn dirty_chunks(&mut self, layer: ChunkLayer) -> Vec<ChunkCoord> {
        let world = self.app.world_mut();
        let mut query = world.query_filtered::<&TerrainChunk, With<ChunkDirty>>();
        let mut chunks: Vec<ChunkCoord> = query
            .iter(world)
            .filter(|c| c.layer == layer)
            .map(|c| c.chunk)
            .collect();
        chunks.sort();
        chunks
    }

    pub fn chunk_entity_count(&mut self) -> usize {
        let world = self.app.world_mut();
        let mut query = world.query::<&TerrainChunk>();
        query.iter(world).count()
    }

    /// Clear the dirty markers, as a renderer would after drawing.
    pub fn mark_all_drawn(&mut self) -> &mut Self {
        let world = self.app.world_mut();
        let mut query = world.query_filtered::<Entity, With<ChunkDirty>>();
        let dirty: Vec<Entity> = query.iter(world).collect();
        for entity in dirty {
            world.entity_mut(entity).remove::<ChunkDirty>();
        }
        self
    }
}
