use std::marker::PhantomData;

use bevy::prelude::*;

use super::systems::{draw_dirty_chunks, flag_dirty_chunks};
use super::types::ChunkRenderer;

/// Drives a [`ChunkRenderer`] resource from the dirty chunk markers.
///
/// Add alongside [`crate::LandscapePlugin`]; the renderer resource must be
/// inserted by the caller.
pub struct ChunkRendererPlugin<R> {
    marker: PhantomData<fn() -> R>,
}

impl<R> Default for ChunkRendererPlugin<R> {
    fn default() -> Self {
        Self {
            marker: PhantomData,
        }
    }
}

impl<R: ChunkRenderer + Resource> Plugin for ChunkRendererPlugin<R> {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            draw_dirty_chunks::<R>
                .after(flag_dirty_chunks)
                .in_set(crate::LandscapeSet::Redraw),
        );
    }
}
