//! Frame ordering for the landscaping systems.
//!
//! ```text
//! Input  →  World  →  Edit  →  Validate  →  Redraw
//! ```
//!
//! * **Input** – Pointer handling turns clicks and drags into edit events.
//! * **World** – Whole-grid commands: resize, flatten, generate, grid toggle.
//!   Running before edits keeps a resize from landing between an edit and
//!   its smoothing.
//! * **Edit** – Height edits (with smoothing), painting and overlay changes.
//!   Each edit runs to completion, then queues its dirty chunks.
//! * **Validate** – Invariant guard over the tiles this frame's edits touched.
//! * **Redraw** – Chunk entity sync, dirty flagging and the renderer.
//!
//! All sets run in `Update`; the grid is only ever mutated through `ResMut`,
//! so no system observes a half-applied edit.

use bevy::prelude::*;

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum LandscapeSet {
    Input,
    World,
    Edit,
    Validate,
    Redraw,
}

pub(crate) fn configure_sets(app: &mut App) {
    app.configure_sets(
        Update,
        (
            LandscapeSet::Input,
            LandscapeSet::World,
            LandscapeSet::Edit,
            LandscapeSet::Validate,
            LandscapeSet::Redraw,
        )
            .chain(),
    );
}
