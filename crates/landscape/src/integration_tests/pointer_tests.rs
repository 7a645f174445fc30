//! Pointer samples driven through the selection state machine into edits.

use crate::landscaping::EditAction;
use crate::selection_input::{BrushSizeEvent, PointerAction, SelectionBrush};
use crate::test_harness::TestWorld;
use crate::tile::TileCoord;

#[test]
fn test_drag_levels_rectangle_to_start_height() {
    let mut world = TestWorld::sized(20)
        .with_advanced_mode(true)
        .with_height(1, 1, 0.5);

    world
        .send_pointer(PointerAction::Press, TileCoord::new(1, 1), 0.0, false)
        .tick(1);
    world
        .send_pointer(PointerAction::Move, TileCoord::new(3, 2), 0.0, false)
        .tick(1);
    world
        .send_pointer(PointerAction::Release, TileCoord::new(3, 2), 0.0, false)
        .tick(2);

    for z in 1..=2 {
        for x in 1..=3 {
            assert_eq!(world.height(x, z), 0.5, "tile ({x}, {z})");
        }
    }
    assert_eq!(world.height(4, 2), 0.0);
    // The hovered tile keeps the full-tile highlight.
    assert_eq!(world.tile(3, 2).overlay_type, 1);
    assert_eq!(world.violations().tiles_repaired, 0);
}

#[test]
fn test_modifier_drag_sets_tile_height() {
    let mut world = TestWorld::sized(20).with_advanced_mode(true);

    world
        .send_pointer(PointerAction::Press, TileCoord::new(4, 4), 0.0, true)
        .tick(1);
    assert_eq!(world.height(4, 4), 0.0);

    world
        .send_pointer(PointerAction::Move, TileCoord::new(4, 4), 33.0, true)
        .tick(1);
    assert_eq!(world.height(4, 4), 0.25);

    world
        .send_pointer(PointerAction::Move, TileCoord::new(4, 4), 66.0, true)
        .tick(1);
    assert_eq!(world.height(4, 4), 0.5);

    world
        .send_pointer(PointerAction::Release, TileCoord::new(4, 4), 66.0, true)
        .tick(1);
    assert_eq!(world.height(4, 5), 0.0);
}

#[test]
fn test_small_cursor_motion_does_not_edit() {
    let mut world = TestWorld::sized(20).with_advanced_mode(true);
    world
        .send_pointer(PointerAction::Press, TileCoord::new(4, 4), 0.0, true)
        .tick(1);
    world
        .send_pointer(PointerAction::Move, TileCoord::new(4, 4), 20.0, true)
        .tick(1);
    assert!(world
        .last_edits()
        .iter()
        .all(|edit| edit.action == EditAction::Overlay));
    assert_eq!(world.height(4, 4), 0.0);
}

#[test]
fn test_brush_size_events_adjust_brush() {
    let mut world = TestWorld::sized(20);
    world.send(BrushSizeEvent(2)).tick(1);
    assert_eq!(world.resource::<SelectionBrush>().size(), 3);

    world.send(BrushSizeEvent(-10)).tick(1);
    assert_eq!(world.resource::<SelectionBrush>().size(), 1);
}
