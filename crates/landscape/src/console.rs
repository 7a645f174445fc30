//! Executes console commands against a running landscaping `App`.
//!
//! Edit commands are sent as the same events the pointer input produces,
//! then one `app.update()` applies them; the outcome is read back from the
//! `TerrainEditedEvent` / `TerrainEditFailedEvent` sent during that update.

use bevy::prelude::*;

use crate::ascii_map::{build_detail_map, build_full_map, build_overview_map};
use crate::config::WorldConfig;
use crate::console_protocol::{
    make_response, ConsoleCommand, ConsoleResponse, EditSummary, ResponsePayload,
};
use crate::grid::TileGrid;
use crate::landscaping::{
    LandscapingTools, LevelTerrainEvent, ModifyTileHeightEvent, ModifyVertexEvent, OverlayChange,
    PaintTerrainEvent, RaiseLowerTerrainEvent, RebuildTerrainEvent, ResizeWorldEvent,
    SetOverlayEvent, TerrainEditFailedEvent, TerrainEditedEvent, TerrainRebuild,
    ToggleOverlayGridEvent,
};
use crate::tile::TileCoord;

/// Run one command. `Quit` only produces the goodbye; the caller ends the loop.
pub fn execute(app: &mut App, cmd: ConsoleCommand) -> ConsoleResponse {
    match cmd {
        ConsoleCommand::Level { from, to, height } => {
            let tiles = rectangle(app, from, to);
            apply(app, LevelTerrainEvent { tiles, height })
        }
        ConsoleCommand::Raise { from, to, step } => {
            let tiles = rectangle(app, from, to);
            apply(
                app,
                RaiseLowerTerrainEvent {
                    tiles,
                    raising: true,
                    step,
                },
            )
        }
        ConsoleCommand::Lower { from, to, step } => {
            let tiles = rectangle(app, from, to);
            apply(
                app,
                RaiseLowerTerrainEvent {
                    tiles,
                    raising: false,
                    step,
                },
            )
        }
        ConsoleCommand::TileHeight { tile, height } => {
            apply(app, ModifyTileHeightEvent { tile, height })
        }
        ConsoleCommand::Vertex {
            tile,
            corner,
            height,
        } => apply(
            app,
            ModifyVertexEvent {
                tile,
                corner,
                height,
            },
        ),
        ConsoleCommand::Paint {
            from,
            to,
            terrain,
            cliff,
        } => {
            let tiles = rectangle(app, from, to);
            apply(
                app,
                PaintTerrainEvent {
                    tiles,
                    terrain_texture: terrain,
                    cliff_texture: cliff,
                },
            )
        }
        ConsoleCommand::Overlay { from, to, overlay } => {
            let tiles = rectangle(app, from, to);
            let change = overlay.map_or(OverlayChange::Reset, OverlayChange::Set);
            apply(app, SetOverlayEvent { tiles, change })
        }
        ConsoleCommand::ToggleGrid => apply(app, ToggleOverlayGridEvent),
        ConsoleCommand::Resize { size } => apply(app, ResizeWorldEvent { size }),
        ConsoleCommand::Generate { seed } => apply(
            app,
            RebuildTerrainEvent(TerrainRebuild::Generated { seed }),
        ),
        ConsoleCommand::Flatten { height } => {
            apply(app, RebuildTerrainEvent(TerrainRebuild::Flat { height }))
        }
        ConsoleCommand::Settings(patch) => {
            let world = app.world_mut();
            patch.apply(&mut world.resource_mut::<LandscapingTools>());
            if let Some(advanced) = patch.advanced_construction_mode {
                world.resource_mut::<WorldConfig>().advanced_construction_mode = advanced;
            }
            make_response(ResponsePayload::Settings {
                tools: world.resource::<LandscapingTools>().clone(),
                advanced_construction_mode: world.resource::<WorldConfig>().advanced_construction_mode,
            })
        }
        ConsoleCommand::Map { from, to, block } => {
            let grid = app.world().resource::<TileGrid>();
            let map = match (block, from, to) {
                (Some(block), _, _) => build_overview_map(grid, block),
                (None, Some(a), Some(b)) => build_detail_map(grid, a, b),
                _ => build_full_map(grid),
            };
            make_response(ResponsePayload::Map { map })
        }
        ConsoleCommand::Tile { tile } => match app.world().resource::<TileGrid>().require(tile) {
            Ok(found) => make_response(ResponsePayload::Tile {
                tile: found.clone(),
            }),
            Err(err) => error(err.to_string()),
        },
        ConsoleCommand::Quit => make_response(ResponsePayload::Goodbye),
    }
}

/// Parse and run one JSON line.
pub fn execute_line(app: &mut App, line: &str) -> ConsoleResponse {
    match serde_json::from_str::<ConsoleCommand>(line) {
        Ok(cmd) => execute(app, cmd),
        Err(err) => error(format!("Parse error: {err}")),
    }
}

fn error(message: String) -> ConsoleResponse {
    make_response(ResponsePayload::Error { message })
}

/// Rectangle clamped to the grid; corners may be given in any order.
fn rectangle(app: &App, from: TileCoord, to: TileCoord) -> Vec<TileCoord> {
    let grid = app.world().resource::<TileGrid>();
    if !grid.contains(from) {
        // Keep the offending corner so the editor reports it.
        return vec![from];
    }
    grid.tiles_in_rectangle(from, to)
}

/// Send one event, run a frame, and report what this command's edits did.
///
/// Without a fixed-timestep tick the event buffers are not swapped between
/// commands, so results are read through cursors taken before the update.
fn apply<E: Event>(app: &mut App, event: E) -> ConsoleResponse {
    let mut edited_cursor = app
        .world()
        .resource::<Events<TerrainEditedEvent>>()
        .get_cursor_current();
    let mut failed_cursor = app
        .world()
        .resource::<Events<TerrainEditFailedEvent>>()
        .get_cursor_current();

    app.world_mut().send_event(event);
    app.update();

    let world = app.world();
    let failures: Vec<String> = failed_cursor
        .read(world.resource::<Events<TerrainEditFailedEvent>>())
        .map(|failed| failed.message.clone())
        .collect();
    if !failures.is_empty() {
        return error(failures.join("; "));
    }
    let edits = edited_cursor
        .read(world.resource::<Events<TerrainEditedEvent>>())
        .map(EditSummary::from)
        .collect();
    make_response(ResponsePayload::Edited { edits })
}
