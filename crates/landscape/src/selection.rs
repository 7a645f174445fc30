//! Border decomposition of a rectangular tile selection.
//!
//! Smoothing only needs to look outward from the rim of an edited region.
//! [`find_rectangle_border`] splits a selection into its four corner tiles
//! and four edge runs; interior tiles are ignored.

use crate::tile::TileCoord;

/// Corners and edges of the bounding rectangle of a selection.
///
/// A corner is `None` when the selection has no tile at that exact
/// coordinate (non-rectangular selections). Edge lists exclude the corner
/// columns/rows so no tile appears in two lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RectangleBorder {
    pub min_x: u32,
    pub max_x: u32,
    pub min_z: u32,
    pub max_z: u32,
    pub south_west: Option<TileCoord>,
    pub north_west: Option<TileCoord>,
    pub north_east: Option<TileCoord>,
    pub south_east: Option<TileCoord>,
    pub southern: Vec<TileCoord>,
    pub western: Vec<TileCoord>,
    pub northern: Vec<TileCoord>,
    pub eastern: Vec<TileCoord>,
}

impl RectangleBorder {
    /// Number of border entries. In a one-row or one-column selection a tile
    /// sits on two sides and is counted twice.
    pub fn len(&self) -> usize {
        let corners = [
            self.south_west,
            self.north_west,
            self.north_east,
            self.south_east,
        ]
        .iter()
        .flatten()
        .count();
        corners + self.southern.len() + self.western.len() + self.northern.len() + self.eastern.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Find the border of `tiles`. Returns `None` for an empty selection.
pub fn find_rectangle_border(tiles: &[TileCoord]) -> Option<RectangleBorder> {
    let first = tiles.first()?;
    let mut border = RectangleBorder {
        min_x: first.x,
        max_x: first.x,
        min_z: first.z,
        max_z: first.z,
        ..Default::default()
    };
    for t in tiles {
        border.min_x = border.min_x.min(t.x);
        border.max_x = border.max_x.max(t.x);
        border.min_z = border.min_z.min(t.z);
        border.max_z = border.max_z.max(t.z);
    }

    let (min_x, max_x, min_z, max_z) = (border.min_x, border.max_x, border.min_z, border.max_z);
    let find = |x: u32, z: u32| tiles.iter().copied().find(|t| t.x == x && t.z == z);
    border.south_west = find(min_x, min_z);
    border.north_west = find(min_x, max_z);
    border.north_east = find(max_x, max_z);
    border.south_east = find(max_x, min_z);

    let inner_x = |t: &TileCoord| t.x != min_x && t.x != max_x;
    let inner_z = |t: &TileCoord| t.z != min_z && t.z != max_z;
    for t in tiles {
        if t.z == min_z && inner_x(t) {
            border.southern.push(*t);
        }
        if t.z == max_z && inner_x(t) {
            border.northern.push(*t);
        }
        if t.x == min_x && inner_z(t) {
            border.western.push(*t);
        }
        if t.x == max_x && inner_z(t) {
            border.eastern.push(*t);
        }
    }
    Some(border)
}
