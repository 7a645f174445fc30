//! Pointer-driven selection for the landscaping tool.
//!
//! The platform layer ray-casts the cursor onto the terrain and sends one
//! [`PointerEvent`] per button press, cursor move and release. This module
//! turns that stream into terrain edit events:
//!
//! ```text
//! Idle ──press──▶ ClickedDown ──release on same tile──▶ click (level / paint)
//!                     │
//!                     ├──tile changes──▶ Dragging ──release──▶ level / paint rectangle
//!                     │
//!                     └──modifier held──▶ HeightDrag ──move──▶ raise / lower / set height
//! ```
//!
//! Hovered tiles are highlighted through overlay events, so the selection is
//! visible without any renderer knowledge here.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{WorldConfig, HEIGHT_INCREMENT};
use crate::direction::Corner;
use crate::grid::TileGrid;
use crate::landscape_sets::LandscapeSet;
use crate::landscaping::{
    vertex_selection_overlay, LandscapingTools, LevelTerrainEvent, ModifyTileHeightEvent,
    ModifyVertexEvent, OverlayChange, PaintTerrainEvent, RaiseLowerTerrainEvent, SetOverlayEvent,
};
use crate::tile::TileCoord;

// =============================================================================
// Constants
// =============================================================================

/// Vertical cursor travel, in pixels, per height step while height-dragging.
pub const HEIGHT_CHANGE_INTERVAL: f32 = 33.0;

pub const MAX_BRUSH_SIZE: u32 = 20;

/// Inside `[LOW, HIGH]` on both axes the cursor picks the whole tile;
/// anywhere else it picks the nearest corner.
const VERTEX_PICK_LOW: f32 = 0.3;
const VERTEX_PICK_HIGH: f32 = 0.7;

/// Bounds on the height a drag can request. The editor clamps further to
/// the world envelope.
pub const DRAG_MIN_HEIGHT: f32 = -5.0;
pub const DRAG_MAX_HEIGHT: f32 = 100.0;

// =============================================================================
// Pointer events
// =============================================================================

/// Where the cursor ray meets the terrain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerHit {
    pub tile: TileCoord,
    /// Position inside the tile, `0.0..1.0` from the south-west corner.
    pub local_x: f32,
    pub local_z: f32,
}

impl PointerHit {
    pub fn new(tile: TileCoord, local_x: f32, local_z: f32) -> Self {
        Self {
            tile,
            local_x,
            local_z,
        }
    }

    /// Hit from a world-space position in meters.
    pub fn from_world(grid: &TileGrid, world_x: f32, world_z: f32, tile_size: f32) -> Option<Self> {
        let tile = grid.world_to_tile(world_x, world_z, tile_size)?;
        let local_x = world_x / tile_size - tile.x as f32;
        let local_z = world_z / tile_size - tile.z as f32;
        Some(Self::new(tile, local_x, local_z))
    }

    pub fn corner(&self) -> Option<Corner> {
        corner_under_cursor(self.local_x, self.local_z)
    }
}

/// The corner the cursor is over, or `None` near the tile center.
pub fn corner_under_cursor(local_x: f32, local_z: f32) -> Option<Corner> {
    let central = |v: f32| (VERTEX_PICK_LOW..=VERTEX_PICK_HIGH).contains(&v);
    if central(local_x) && central(local_z) {
        return None;
    }
    Some(match (local_x < 0.5, local_z < 0.5) {
        (true, true) => Corner::LowerLeft,
        (true, false) => Corner::UpperLeft,
        (false, false) => Corner::UpperRight,
        (false, true) => Corner::LowerRight,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerAction {
    Press,
    Move,
    Release,
}

/// One sample of the primary pointer.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub action: PointerAction,
    /// `None` when the cursor is off the terrain or over UI.
    pub hit: Option<PointerHit>,
    /// Cursor height on screen in pixels, growing upward.
    pub screen_y: f32,
    /// Height-modification modifier key held.
    pub modifier: bool,
}

/// Grow (`+`) or shrink (`-`) the brush.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrushSizeEvent(pub i32);

// =============================================================================
// Brush
// =============================================================================

/// Square selection brush anchored at its south-west tile.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionBrush {
    size: u32,
}

impl Default for SelectionBrush {
    fn default() -> Self {
        Self { size: 1 }
    }
}

impl SelectionBrush {
    pub fn new(size: u32) -> Self {
        Self {
            size: size.clamp(1, MAX_BRUSH_SIZE),
        }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn adjust(&mut self, delta: i32) {
        *self = Self::new(self.size.saturating_add_signed(delta));
    }

    /// A size-1 brush in advanced mode edits one quarter tile (or vertex).
    pub fn is_single_quarter(&self, advanced: bool) -> bool {
        advanced && self.size == 1
    }

    /// Tiles under the brush. Basic mode works in full tiles, so a size-1
    /// brush covers the 2×2 full tile and larger brushes double their side.
    pub fn footprint(&self, grid: &TileGrid, origin: TileCoord, advanced: bool) -> Vec<TileCoord> {
        if !grid.contains(origin) {
            return Vec::new();
        }
        if self.size == 1 {
            if advanced {
                return vec![origin];
            }
            return grid
                .full_tile_containing(origin)
                .map(|full| full.quarters())
                .unwrap_or_default();
        }
        let side = self.size * if advanced { 1 } else { 2 };
        let far = TileCoord::new(origin.x + side - 1, origin.z + side - 1);
        grid.tiles_in_rectangle(origin, far)
    }
}

// =============================================================================
// Height drag
// =============================================================================

/// One height step produced by a drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightStep {
    pub height: f32,
    pub raising: bool,
}

/// Converts vertical cursor travel into quarter (advanced) or half (basic)
/// height steps, one per [`HEIGHT_CHANGE_INTERVAL`] pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightDragTracker {
    anchor_y: f32,
    threshold_y: f32,
    base_height: f32,
    increment: f32,
}

impl HeightDragTracker {
    pub fn new(screen_y: f32, base_height: f32, advanced: bool) -> Self {
        Self {
            anchor_y: screen_y,
            threshold_y: screen_y,
            base_height,
            increment: if advanced {
                HEIGHT_INCREMENT
            } else {
                HEIGHT_INCREMENT * 2.0
            },
        }
    }

    pub fn increment(&self) -> f32 {
        self.increment
    }

    /// Feed the current cursor height. Returns a step once the cursor has
    /// moved a full interval past the last threshold.
    pub fn update(&mut self, screen_y: f32) -> Option<HeightStep> {
        let travel = screen_y - self.threshold_y;
        if travel.abs() < HEIGHT_CHANGE_INTERVAL {
            return None;
        }
        let raising = travel > 0.0;
        self.threshold_y += HEIGHT_CHANGE_INTERVAL.copysign(travel);

        let raw = self.base_height
            + (screen_y - self.anchor_y) / HEIGHT_CHANGE_INTERVAL * self.increment;
        let height = ((raw / self.increment).round() * self.increment)
            .clamp(DRAG_MIN_HEIGHT, DRAG_MAX_HEIGHT);
        Some(HeightStep { height, raising })
    }
}

// =============================================================================
// Selection state machine
// =============================================================================

/// What a height drag edits.
#[derive(Debug, Clone, PartialEq)]
pub enum DragTarget {
    Vertex { tile: TileCoord, corner: Corner },
    Tile(TileCoord),
    Tiles(Vec<TileCoord>),
}

impl DragTarget {
    fn tiles(&self) -> Vec<TileCoord> {
        match self {
            DragTarget::Vertex { tile, .. } | DragTarget::Tile(tile) => vec![*tile],
            DragTarget::Tiles(tiles) => tiles.clone(),
        }
    }

    fn base_height(&self, grid: &TileGrid) -> f32 {
        match self {
            DragTarget::Vertex { tile, corner } => grid.tile(*tile).map_or(0.0, |t| t.corner(*corner)),
            DragTarget::Tile(tile) => grid.tile(*tile).map_or(0.0, |t| t.height()),
            DragTarget::Tiles(tiles) => highest_of(grid, tiles),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SelectionPhase {
    #[default]
    Idle,
    ClickedDown { start: PointerHit },
    Dragging { start: TileCoord, end: TileCoord },
    HeightDrag {
        tracker: HeightDragTracker,
        target: DragTarget,
    },
}

/// An edit requested by the pointer.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionCommand {
    Level(LevelTerrainEvent),
    RaiseLower(RaiseLowerTerrainEvent),
    TileHeight(ModifyTileHeightEvent),
    Vertex(ModifyVertexEvent),
    Paint(PaintTerrainEvent),
}

/// Everything the state machine reads besides its own state.
pub struct SelectionContext<'a> {
    pub grid: &'a TileGrid,
    pub tools: &'a LandscapingTools,
    pub brush: SelectionBrush,
    pub advanced: bool,
}

impl SelectionContext<'_> {
    fn can_modify(&self) -> bool {
        self.tools.landscaping_enabled && self.tools.terrain_modification_enabled
    }

    fn can_paint(&self) -> bool {
        self.tools.landscaping_enabled
            && (self.tools.terrain_texture_painting_enabled
                || self.tools.terrain_cliff_painting_enabled)
    }

    fn single_quarter(&self) -> bool {
        self.brush.is_single_quarter(self.advanced)
    }
}

/// Pointer state plus the tiles currently highlighted.
#[derive(Resource, Debug, Clone, Default)]
pub struct CurrentSelection {
    pub phase: SelectionPhase,
    pub hovered: Option<PointerHit>,
    pub highlighted: Vec<TileCoord>,
    pub highlight_overlay: u8,
}

impl CurrentSelection {
    /// Advance the state machine by one pointer sample.
    pub fn handle(&mut self, event: &PointerEvent, ctx: &SelectionContext) -> Vec<SelectionCommand> {
        if event.hit.is_some() {
            self.hovered = event.hit;
        }
        let phase = std::mem::take(&mut self.phase);
        let (next, commands) = match (event.action, phase) {
            (PointerAction::Press, _) => match event.hit {
                Some(hit) if event.modifier && ctx.can_modify() => {
                    (self.start_height_drag(hit.tile, Some(hit), event, ctx), Vec::new())
                }
                Some(hit) => (SelectionPhase::ClickedDown { start: hit }, Vec::new()),
                None => (SelectionPhase::Idle, Vec::new()),
            },

            (PointerAction::Move, SelectionPhase::ClickedDown { start }) => {
                if event.modifier && ctx.can_modify() {
                    (self.start_height_drag(start.tile, Some(start), event, ctx), Vec::new())
                } else {
                    match event.hit {
                        Some(hit) if hit.tile != start.tile => (
                            SelectionPhase::Dragging {
                                start: start.tile,
                                end: hit.tile,
                            },
                            Vec::new(),
                        ),
                        _ => (SelectionPhase::ClickedDown { start }, Vec::new()),
                    }
                }
            }

            (PointerAction::Move, SelectionPhase::Dragging { start, end }) => {
                if event.modifier && ctx.can_modify() {
                    let tiles = ctx.grid.tiles_in_rectangle(start, end);
                    let tracker = HeightDragTracker::new(
                        event.screen_y,
                        highest_of(ctx.grid, &tiles),
                        ctx.advanced,
                    );
                    (
                        SelectionPhase::HeightDrag {
                            tracker,
                            target: DragTarget::Tiles(tiles),
                        },
                        Vec::new(),
                    )
                } else {
                    let end = event.hit.map_or(end, |hit| hit.tile);
                    (SelectionPhase::Dragging { start, end }, Vec::new())
                }
            }

            (PointerAction::Move, SelectionPhase::HeightDrag { mut tracker, target }) => {
                let commands = tracker
                    .update(event.screen_y)
                    .map(|step| height_drag_command(&target, step))
                    .into_iter()
                    .collect();
                (SelectionPhase::HeightDrag { tracker, target }, commands)
            }

            (PointerAction::Release, SelectionPhase::ClickedDown { start }) => {
                let same_tile = event.hit.is_some_and(|hit| hit.tile == start.tile);
                let commands = if same_tile && !event.modifier {
                    click_commands(start, ctx)
                } else {
                    Vec::new()
                };
                (SelectionPhase::Idle, commands)
            }

            (PointerAction::Release, SelectionPhase::Dragging { start, end }) => {
                let end = event.hit.map_or(end, |hit| hit.tile);
                let tiles = ctx.grid.tiles_in_rectangle(start, end);
                let mut commands = Vec::new();
                if ctx.can_modify() && !event.modifier {
                    let height = ctx.grid.tile(start).map_or(0.0, |t| t.height());
                    commands.push(SelectionCommand::Level(LevelTerrainEvent {
                        tiles: tiles.clone(),
                        height,
                    }));
                }
                if ctx.can_paint() {
                    commands.push(paint(tiles));
                }
                (SelectionPhase::Idle, commands)
            }

            (PointerAction::Release, _) => (SelectionPhase::Idle, Vec::new()),
            (PointerAction::Move, phase) => (phase, Vec::new()),
        };
        self.phase = next;
        commands
    }

    fn start_height_drag(
        &self,
        origin: TileCoord,
        hit: Option<PointerHit>,
        event: &PointerEvent,
        ctx: &SelectionContext,
    ) -> SelectionPhase {
        let target = if ctx.single_quarter() {
            match hit.and_then(|h| h.corner()) {
                Some(corner) => DragTarget::Vertex {
                    tile: origin,
                    corner,
                },
                None => DragTarget::Tile(origin),
            }
        } else {
            DragTarget::Tiles(ctx.brush.footprint(ctx.grid, origin, ctx.advanced))
        };
        let tracker =
            HeightDragTracker::new(event.screen_y, target.base_height(ctx.grid), ctx.advanced);
        SelectionPhase::HeightDrag { tracker, target }
    }

    /// Tiles that should carry the selection overlay right now, and which
    /// overlay id to use.
    pub fn desired_highlight(&self, ctx: &SelectionContext) -> (Vec<TileCoord>, u8) {
        let full = vertex_selection_overlay(None);
        match &self.phase {
            SelectionPhase::Dragging { start, end } => (ctx.grid.tiles_in_rectangle(*start, *end), full),
            SelectionPhase::HeightDrag {
                target: DragTarget::Vertex { tile, corner },
                ..
            } => (vec![*tile], vertex_selection_overlay(Some(*corner))),
            SelectionPhase::HeightDrag { target, .. } => (target.tiles(), full),
            SelectionPhase::Idle | SelectionPhase::ClickedDown { .. } => {
                let Some(hit) = self.hovered else {
                    return (Vec::new(), full);
                };
                let overlay = if ctx.single_quarter() {
                    vertex_selection_overlay(hit.corner())
                } else {
                    full
                };
                (ctx.brush.footprint(ctx.grid, hit.tile, ctx.advanced), overlay)
            }
        }
    }
}

fn highest_of(grid: &TileGrid, tiles: &[TileCoord]) -> f32 {
    tiles
        .iter()
        .filter_map(|c| grid.tile(*c))
        .map(|t| t.height())
        .fold(f32::NEG_INFINITY, f32::max)
        .max(DRAG_MIN_HEIGHT)
}

fn paint(tiles: Vec<TileCoord>) -> SelectionCommand {
    SelectionCommand::Paint(PaintTerrainEvent {
        tiles,
        terrain_texture: None,
        cliff_texture: None,
    })
}

fn height_drag_command(target: &DragTarget, step: HeightStep) -> SelectionCommand {
    match target {
        DragTarget::Vertex { tile, corner } => SelectionCommand::Vertex(ModifyVertexEvent {
            tile: *tile,
            corner: *corner,
            height: step.height,
        }),
        DragTarget::Tile(tile) => SelectionCommand::TileHeight(ModifyTileHeightEvent {
            tile: *tile,
            height: step.height,
        }),
        // The editor doubles the step in basic mode.
        DragTarget::Tiles(tiles) => SelectionCommand::RaiseLower(RaiseLowerTerrainEvent {
            tiles: tiles.clone(),
            raising: step.raising,
            step: HEIGHT_INCREMENT,
        }),
    }
}

/// A press and release on the same tile: level to the clicked height and
/// paint, as the tool switches allow.
fn click_commands(start: PointerHit, ctx: &SelectionContext) -> Vec<SelectionCommand> {
    let mut commands = Vec::new();
    let Some(tile) = ctx.grid.tile(start.tile) else {
        return commands;
    };
    let tiles = if ctx.single_quarter() {
        vec![start.tile]
    } else {
        ctx.brush.footprint(ctx.grid, start.tile, ctx.advanced)
    };

    if ctx.can_modify() {
        let height = if ctx.single_quarter() {
            start.corner().map_or(tile.height(), |corner| tile.corner(corner))
        } else {
            highest_of(ctx.grid, &tiles)
        };
        commands.push(SelectionCommand::Level(LevelTerrainEvent {
            tiles: tiles.clone(),
            height,
        }));
    }
    if ctx.can_paint() {
        commands.push(paint(tiles));
    }
    commands
}

// =============================================================================
// Systems
// =============================================================================

pub fn adjust_brush_size(mut events: EventReader<BrushSizeEvent>, mut brush: ResMut<SelectionBrush>) {
    for BrushSizeEvent(delta) in events.read() {
        brush.adjust(*delta);
        debug!("Selection brush size {}", brush.size());
    }
}

/// Run pointer samples through the selection state machine and send the
/// resulting edit and highlight events.
#[allow(clippy::too_many_arguments)]
pub fn handle_pointer_input(
    mut pointer: EventReader<PointerEvent>,
    mut selection: ResMut<CurrentSelection>,
    grid: Res<TileGrid>,
    tools: Res<LandscapingTools>,
    config: Res<WorldConfig>,
    brush: Res<SelectionBrush>,
    mut levels: EventWriter<LevelTerrainEvent>,
    mut raise_lowers: EventWriter<RaiseLowerTerrainEvent>,
    mut tile_heights: EventWriter<ModifyTileHeightEvent>,
    mut vertices: EventWriter<ModifyVertexEvent>,
    mut paints: EventWriter<PaintTerrainEvent>,
    mut overlays: EventWriter<SetOverlayEvent>,
) {
    let ctx = SelectionContext {
        grid: &grid,
        tools: &tools,
        brush: *brush,
        advanced: config.advanced_construction_mode,
    };

    for event in pointer.read() {
        for command in selection.handle(event, &ctx) {
            match command {
                SelectionCommand::Level(e) => {
                    levels.send(e);
                }
                SelectionCommand::RaiseLower(e) => {
                    raise_lowers.send(e);
                }
                SelectionCommand::TileHeight(e) => {
                    tile_heights.send(e);
                }
                SelectionCommand::Vertex(e) => {
                    vertices.send(e);
                }
                SelectionCommand::Paint(e) => {
                    paints.send(e);
                }
            }
        }
    }

    let (tiles, overlay) = if tools.landscaping_enabled {
        selection.desired_highlight(&ctx)
    } else {
        (Vec::new(), selection.highlight_overlay)
    };
    if tiles == selection.highlighted && overlay == selection.highlight_overlay {
        return;
    }
    if !selection.highlighted.is_empty() {
        overlays.send(SetOverlayEvent {
            tiles: std::mem::take(&mut selection.highlighted),
            change: OverlayChange::Reset,
        });
    }
    if !tiles.is_empty() {
        overlays.send(SetOverlayEvent {
            tiles: tiles.clone(),
            change: OverlayChange::Set(overlay),
        });
    }
    selection.highlighted = tiles;
    selection.highlight_overlay = overlay;
}

// =============================================================================
// Plugin
// =============================================================================

pub struct SelectionInputPlugin;

impl Plugin for SelectionInputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CurrentSelection>()
            .init_resource::<SelectionBrush>()
            .add_event::<PointerEvent>()
            .add_event::<BrushSizeEvent>()
            .add_systems(
                Update,
                (adjust_brush_size, handle_pointer_input)
                    .chain()
                    .in_set(LandscapeSet::Input),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::TileDefaults;

    fn t(x: u32, z: u32) -> TileCoord {
        TileCoord::new(x, z)
    }

    fn center(x: u32, z: u32) -> Option<PointerHit> {
        Some(PointerHit::new(t(x, z), 0.5, 0.5))
    }

    fn pointer(action: PointerAction, hit: Option<PointerHit>, screen_y: f32, modifier: bool) -> PointerEvent {
        PointerEvent {
            action,
            hit,
            screen_y,
            modifier,
        }
    }

    fn tools() -> LandscapingTools {
        LandscapingTools {
            landscaping_enabled: true,
            ..Default::default()
        }
    }

    fn ctx<'a>(grid: &'a TileGrid, tools: &'a LandscapingTools, advanced: bool) -> SelectionContext<'a> {
        SelectionContext {
            grid,
            tools,
            brush: SelectionBrush::default(),
            advanced,
        }
    }

    #[test]
    fn test_corner_picking_thresholds() {
        assert_eq!(corner_under_cursor(0.5, 0.5), None);
        assert_eq!(corner_under_cursor(0.3, 0.7), None);
        assert_eq!(corner_under_cursor(0.1, 0.1), Some(Corner::LowerLeft));
        assert_eq!(corner_under_cursor(0.2, 0.6), Some(Corner::UpperLeft));
        assert_eq!(corner_under_cursor(0.9, 0.8), Some(Corner::UpperRight));
        assert_eq!(corner_under_cursor(0.75, 0.45), Some(Corner::LowerRight));
    }

    #[test]
    fn test_hit_from_world_position() {
        let grid = TileGrid::new(10, TileDefaults::default());
        let hit = PointerHit::from_world(&grid, 1.3, 0.55, 0.25).unwrap();
        assert_eq!(hit.tile, t(5, 2));
        assert!((hit.local_x - 0.2).abs() < 1e-4);
        assert!((hit.local_z - 0.2).abs() < 1e-4);
        assert!(PointerHit::from_world(&grid, -0.1, 0.0, 0.25).is_none());
    }

    #[test]
    fn test_brush_size_is_clamped() {
        let mut brush = SelectionBrush::default();
        brush.adjust(-3);
        assert_eq!(brush.size(), 1);
        brush.adjust(50);
        assert_eq!(brush.size(), MAX_BRUSH_SIZE);
    }

    #[test]
    fn test_brush_footprint_doubles_in_basic_mode() {
        let grid = TileGrid::new(10, TileDefaults::default());
        let brush = SelectionBrush::new(3);
        assert_eq!(brush.footprint(&grid, t(2, 2), true).len(), 9);
        assert_eq!(brush.footprint(&grid, t(2, 2), false).len(), 36);
        // Clipped at the north-east edge.
        assert_eq!(brush.footprint(&grid, t(8, 8), true).len(), 4);
    }

    #[test]
    fn test_single_brush_in_basic_mode_is_full_tile() {
        let grid = TileGrid::new(10, TileDefaults::default());
        let tiles = SelectionBrush::default().footprint(&grid, t(3, 5), false);
        assert_eq!(tiles, vec![t(2, 4), t(2, 5), t(3, 5), t(3, 4)]);
    }

    #[test]
    fn test_height_drag_quarter_steps() {
        let mut tracker = HeightDragTracker::new(100.0, 1.0, true);
        assert_eq!(tracker.update(120.0), None);
        assert_eq!(
            tracker.update(133.0),
            Some(HeightStep {
                height: 1.25,
                raising: true
            })
        );
        assert_eq!(tracker.update(140.0), None);
        assert_eq!(
            tracker.update(166.0),
            Some(HeightStep {
                height: 1.5,
                raising: true
            })
        );
        let down = tracker.update(100.0).unwrap();
        assert!(!down.raising);
        assert_eq!(down.height, 1.0);
    }

    #[test]
    fn test_height_drag_half_steps_and_clamp() {
        let mut tracker = HeightDragTracker::new(0.0, 0.0, false);
        assert_eq!(tracker.update(-33.0).map(|s| s.height), Some(-0.5));

        let mut deep = HeightDragTracker::new(0.0, -4.75, true);
        assert_eq!(deep.update(-66.0).map(|s| s.height), Some(DRAG_MIN_HEIGHT));
    }

    #[test]
    fn test_click_levels_clicked_tile_in_advanced_mode() {
        let mut grid = TileGrid::new(10, TileDefaults::default());
        grid.get_mut(4, 4).unwrap().set_uniform_height(0.75);
        let tools = tools();
        let ctx = ctx(&grid, &tools, true);
        let mut selection = CurrentSelection::default();

        assert!(selection
            .handle(&pointer(PointerAction::Press, center(4, 4), 0.0, false), &ctx)
            .is_empty());
        let commands = selection.handle(&pointer(PointerAction::Release, center(4, 4), 0.0, false), &ctx);
        assert_eq!(
            commands,
            vec![SelectionCommand::Level(LevelTerrainEvent {
                tiles: vec![t(4, 4)],
                height: 0.75,
            })]
        );
        assert_eq!(selection.phase, SelectionPhase::Idle);
    }

    #[test]
    fn test_click_over_vertex_levels_to_corner() {
        let mut grid = TileGrid::new(10, TileDefaults::default());
        grid.get_mut(4, 4).unwrap().set_corner_height(Corner::UpperRight, 0.25);
        let tools = tools();
        let ctx = ctx(&grid, &tools, true);
        let mut selection = CurrentSelection::default();
        let hit = Some(PointerHit::new(t(4, 4), 0.1, 0.1));

        selection.handle(&pointer(PointerAction::Press, hit, 0.0, false), &ctx);
        let commands = selection.handle(&pointer(PointerAction::Release, hit, 0.0, false), &ctx);
        assert_eq!(
            commands,
            vec![SelectionCommand::Level(LevelTerrainEvent {
                tiles: vec![t(4, 4)],
                height: 0.0,
            })]
        );
    }

    #[test]
    fn test_drag_levels_rectangle_to_start_height() {
        let mut grid = TileGrid::new(10, TileDefaults::default());
        grid.get_mut(1, 1).unwrap().set_uniform_height(0.5);
        let mut tools = tools();
        tools.terrain_texture_painting_enabled = true;
        let ctx = ctx(&grid, &tools, true);
        let mut selection = CurrentSelection::default();

        selection.handle(&pointer(PointerAction::Press, center(1, 1), 0.0, false), &ctx);
        selection.handle(&pointer(PointerAction::Move, center(2, 1), 0.0, false), &ctx);
        selection.handle(&pointer(PointerAction::Move, center(3, 2), 0.0, false), &ctx);
        assert_eq!(
            selection.phase,
            SelectionPhase::Dragging {
                start: t(1, 1),
                end: t(3, 2)
            }
        );
        let commands = selection.handle(&pointer(PointerAction::Release, center(3, 2), 0.0, false), &ctx);
        let rect = grid.tiles_in_rectangle(t(1, 1), t(3, 2));
        assert_eq!(
            commands,
            vec![
                SelectionCommand::Level(LevelTerrainEvent {
                    tiles: rect.clone(),
                    height: 0.5,
                }),
                paint(rect),
            ]
        );
    }

    #[test]
    fn test_modifier_drag_on_vertex_emits_vertex_edits() {
        let grid = TileGrid::new(10, TileDefaults::default());
        let tools = tools();
        let ctx = ctx(&grid, &tools, true);
        let mut selection = CurrentSelection::default();
        let hit = Some(PointerHit::new(t(4, 4), 0.9, 0.9));

        selection.handle(&pointer(PointerAction::Press, hit, 200.0, true), &ctx);
        let commands = selection.handle(&pointer(PointerAction::Move, hit, 233.0, true), &ctx);
        assert_eq!(
            commands,
            vec![SelectionCommand::Vertex(ModifyVertexEvent {
                tile: t(4, 4),
                corner: Corner::UpperRight,
                height: 0.25,
            })]
        );
        // Releasing ends the drag without a level.
        assert!(selection
            .handle(&pointer(PointerAction::Release, hit, 233.0, true), &ctx)
            .is_empty());
        assert_eq!(selection.phase, SelectionPhase::Idle);
    }

    #[test]
    fn test_modifier_during_rectangle_drag_raises_selection() {
        let grid = TileGrid::new(10, TileDefaults::default());
        let tools = tools();
        let ctx = ctx(&grid, &tools, false);
        let mut selection = CurrentSelection::default();

        selection.handle(&pointer(PointerAction::Press, center(0, 0), 0.0, false), &ctx);
        selection.handle(&pointer(PointerAction::Move, center(1, 1), 0.0, false), &ctx);
        selection.handle(&pointer(PointerAction::Move, center(1, 1), 0.0, true), &ctx);
        let commands = selection.handle(&pointer(PointerAction::Move, center(1, 1), 40.0, true), &ctx);
        assert_eq!(
            commands,
            vec![SelectionCommand::RaiseLower(RaiseLowerTerrainEvent {
                tiles: grid.tiles_in_rectangle(t(0, 0), t(1, 1)),
                raising: true,
                step: HEIGHT_INCREMENT,
            })]
        );
    }

    #[test]
    fn test_disabled_tool_emits_nothing() {
        let grid = TileGrid::new(10, TileDefaults::default());
        let tools = LandscapingTools::default();
        let ctx = ctx(&grid, &tools, true);
        let mut selection = CurrentSelection::default();

        selection.handle(&pointer(PointerAction::Press, center(2, 2), 0.0, true), &ctx);
        assert!(matches!(selection.phase, SelectionPhase::ClickedDown { .. }));
        assert!(selection
            .handle(&pointer(PointerAction::Release, center(2, 2), 0.0, false), &ctx)
            .is_empty());
    }

    #[test]
    fn test_release_off_terrain_cancels_click() {
        let grid = TileGrid::new(10, TileDefaults::default());
        let tools = tools();
        let ctx = ctx(&grid, &tools, true);
        let mut selection = CurrentSelection::default();

        selection.handle(&pointer(PointerAction::Press, center(2, 2), 0.0, false), &ctx);
        assert!(selection
            .handle(&pointer(PointerAction::Release, None, 0.0, false), &ctx)
            .is_empty());
    }

    #[test]
    fn test_hover_highlight_uses_vertex_overlay() {
        let grid = TileGrid::new(10, TileDefaults::default());
        let tools = tools();
        let ctx = ctx(&grid, &tools, true);
        let mut selection = CurrentSelection::default();
        selection.handle(
            &pointer(PointerAction::Move, Some(PointerHit::new(t(3, 3), 0.1, 0.9)), 0.0, false),
            &ctx,
        );
        assert_eq!(
            selection.desired_highlight(&ctx),
            (vec![t(3, 3)], Corner::UpperLeft.selection_overlay())
        );
    }
}
