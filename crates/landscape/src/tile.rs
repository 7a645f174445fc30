//! The quarter tile: smallest addressable terrain cell.

use serde::{Deserialize, Serialize};

use crate::config::{HEIGHT_INCREMENT, HIDDEN_GRID_OVERLAY};
use crate::direction::Corner;

/// Integer grid coordinate of a tile. `x` grows east, `z` grows north.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: u32,
    pub z: u32,
}

impl TileCoord {
    pub const fn new(x: u32, z: u32) -> Self {
        Self { x, z }
    }

    /// Apply a signed offset, returning `None` when it would go below zero.
    pub fn offset(self, dx: i32, dz: i32) -> Option<TileCoord> {
        let x = self.x.checked_add_signed(dx)?;
        let z = self.z.checked_add_signed(dz)?;
        Some(TileCoord { x, z })
    }
}

/// Checkerboard tag used by the overlay grid, derived from coordinate parity.
pub fn grid_type_for(coord: TileCoord) -> u8 {
    match (coord.x % 2 == 0, coord.z % 2 == 0) {
        (true, true) => 7,
        (true, false) => 8,
        (false, false) => 9,
        (false, true) => 10,
    }
}

/// One terrain cell with four independently stored corner heights.
///
/// `height` and `is_slope` are derived from the corners and are refreshed by
/// every mutating method; they are never written directly from outside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuarterTile {
    coord: TileCoord,
    lower_left: f32,
    upper_left: f32,
    upper_right: f32,
    lower_right: f32,
    /// Floor under the grid, used for skirt geometry only.
    pub bottom_height: f32,
    height: f32,
    is_slope: bool,
    pub terrain_type: u8,
    pub cliff_type: u8,
    pub overlay_type: u8,
    grid_type: u8,
    pub owned_by_zoo: bool,
    pub enclosure_id: Option<u32>,
}

impl QuarterTile {
    /// Create a flat tile. The overlay shows the grid tag when `grid_enabled`.
    pub fn flat(
        coord: TileCoord,
        height: f32,
        bottom_height: f32,
        terrain_type: u8,
        cliff_type: u8,
        grid_enabled: bool,
    ) -> Self {
        let grid_type = grid_type_for(coord);
        Self {
            coord,
            lower_left: height,
            upper_left: height,
            upper_right: height,
            lower_right: height,
            bottom_height,
            height,
            is_slope: false,
            terrain_type,
            cliff_type,
            overlay_type: if grid_enabled {
                grid_type
            } else {
                HIDDEN_GRID_OVERLAY
            },
            grid_type,
            owned_by_zoo: false,
            enclosure_id: None,
        }
    }

    pub fn coord(&self) -> TileCoord {
        self.coord
    }

    /// Highest corner.
    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn is_slope(&self) -> bool {
        self.is_slope
    }

    pub fn grid_type(&self) -> u8 {
        self.grid_type
    }

    pub fn corner(&self, corner: Corner) -> f32 {
        match corner {
            Corner::LowerLeft => self.lower_left,
            Corner::UpperLeft => self.upper_left,
            Corner::UpperRight => self.upper_right,
            Corner::LowerRight => self.lower_right,
        }
    }

    /// Corner heights in `Corner::ALL` order.
    pub fn corners(&self) -> [f32; 4] {
        [
            self.lower_left,
            self.upper_left,
            self.upper_right,
            self.lower_right,
        ]
    }

    pub fn min_corner(&self) -> f32 {
        self.corners().into_iter().fold(f32::INFINITY, f32::min)
    }

    fn corner_mut(&mut self, corner: Corner) -> &mut f32 {
        match corner {
            Corner::LowerLeft => &mut self.lower_left,
            Corner::UpperLeft => &mut self.upper_left,
            Corner::UpperRight => &mut self.upper_right,
            Corner::LowerRight => &mut self.lower_right,
        }
    }

    /// Set one corner, then pull the other corners into slope range of it.
    pub fn set_corner_height(&mut self, corner: Corner, height: f32) {
        *self.corner_mut(corner) = height;
        self.validate_and_propagate(corner);
    }

    /// Clamp the other three corners against `updated`.
    ///
    /// Adjacent corners end within one increment of `updated`, the diagonal
    /// corner within one increment of both adjacent corners (and therefore
    /// within two of `updated`). Each clamp moves a corner only as far as
    /// needed, keeping the side of the original difference.
    pub fn validate_and_propagate(&mut self, updated: Corner) {
        let anchor = self.corner(updated);
        let [a, b] = updated.adjacent();
        for adjacent in [a, b] {
            let value = self.corner_mut(adjacent);
            *value = value.clamp(anchor - HEIGHT_INCREMENT, anchor + HEIGHT_INCREMENT);
        }

        let (ha, hb) = (self.corner(a), self.corner(b));
        let low = ha.max(hb) - HEIGHT_INCREMENT;
        let high = ha.min(hb) + HEIGHT_INCREMENT;
        let diagonal = self.corner_mut(updated.diagonal());
        *diagonal = diagonal.clamp(low, high);

        self.refresh_stats();
    }

    /// Make the tile flat at `height`.
    pub fn set_uniform_height(&mut self, height: f32) {
        self.lower_left = height;
        self.upper_left = height;
        self.upper_right = height;
        self.lower_right = height;
        self.refresh_stats();
    }

    /// Overwrite all four corners, e.g. from a generated heightmap.
    ///
    /// The caller is responsible for passing slope-consistent values;
    /// `invariants::enforce_tile` repairs them otherwise.
    pub fn set_corners(&mut self, corners: [f32; 4]) {
        let [ll, ul, ur, lr] = corners;
        self.lower_left = ll;
        self.upper_left = ul;
        self.upper_right = ur;
        self.lower_right = lr;
        self.refresh_stats();
    }

    /// Show the grid checkerboard tag, or the hidden-grid overlay.
    pub fn reset_overlay(&mut self, grid_enabled: bool) {
        self.overlay_type = if grid_enabled {
            self.grid_type
        } else {
            HIDDEN_GRID_OVERLAY
        };
    }

    /// Recompute `height` and `is_slope` from the corners.
    pub(crate) fn refresh_stats(&mut self) {
        let corners = self.corners();
        self.height = corners.into_iter().fold(f32::NEG_INFINITY, f32::max);
        let average = corners.iter().sum::<f32>() / 4.0;
        self.is_slope = average != self.height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile_at(height: f32) -> QuarterTile {
        QuarterTile::flat(TileCoord::new(3, 4), height, -6.0, 0, 1, true)
    }

    fn assert_slope_clamp(tile: &QuarterTile) {
        let eps = 1e-5;
        for corner in Corner::ALL {
            let h = tile.corner(corner);
            for adjacent in corner.adjacent() {
                let d = (h - tile.corner(adjacent)).abs();
                assert!(
                    d <= HEIGHT_INCREMENT + eps,
                    "{corner:?}/{adjacent:?} differ by {d}: {:?}",
                    tile.corners()
                );
            }
            let d = (h - tile.corner(corner.diagonal())).abs();
            assert!(d <= 2.0 * HEIGHT_INCREMENT + eps, "diagonal differ by {d}");
        }
    }

    #[test]
    fn test_flat_tile_stats() {
        let tile = tile_at(1.5);
        assert_eq!(tile.height(), 1.5);
        assert!(!tile.is_slope());
        assert_eq!(tile.grid_type(), 10);
        assert_eq!(tile.overlay_type, 10);
    }

    #[test]
    fn test_grid_type_parity() {
        assert_eq!(grid_type_for(TileCoord::new(0, 0)), 7);
        assert_eq!(grid_type_for(TileCoord::new(0, 1)), 8);
        assert_eq!(grid_type_for(TileCoord::new(1, 1)), 9);
        assert_eq!(grid_type_for(TileCoord::new(1, 0)), 10);
        assert_eq!(grid_type_for(TileCoord::new(42, 17)), 8);
    }

    #[test]
    fn test_hidden_grid_overlay() {
        let tile = QuarterTile::flat(TileCoord::new(0, 0), 0.0, -6.0, 0, 1, false);
        assert_eq!(tile.overlay_type, HIDDEN_GRID_OVERLAY);
        let mut tile = tile;
        tile.reset_overlay(true);
        assert_eq!(tile.overlay_type, 7);
    }

    #[test]
    fn test_small_corner_change_leaves_others() {
        let mut tile = tile_at(0.0);
        tile.set_corner_height(Corner::UpperRight, 0.25);
        assert_eq!(tile.corners(), [0.0, 0.0, 0.25, 0.0]);
        assert_eq!(tile.height(), 0.25);
        assert!(tile.is_slope());
    }

    #[test]
    fn test_large_corner_raise_drags_neighbors_up() {
        let mut tile = tile_at(0.0);
        tile.set_corner_height(Corner::LowerLeft, 2.0);
        assert_eq!(tile.corner(Corner::LowerLeft), 2.0);
        assert_eq!(tile.corner(Corner::UpperLeft), 1.75);
        assert_eq!(tile.corner(Corner::LowerRight), 1.75);
        assert_eq!(tile.corner(Corner::UpperRight), 1.5);
        assert_slope_clamp(&tile);
    }

    #[test]
    fn test_large_corner_drop_drags_neighbors_down() {
        let mut tile = tile_at(1.0);
        tile.set_corner_height(Corner::UpperLeft, -1.0);
        assert_eq!(tile.corner(Corner::UpperRight), -0.75);
        assert_eq!(tile.corner(Corner::LowerLeft), -0.75);
        assert_eq!(tile.corner(Corner::LowerRight), -0.5);
        assert_eq!(tile.height(), -0.5);
        assert_slope_clamp(&tile);
    }

    #[test]
    fn test_diagonal_pulled_between_diverging_adjacents() {
        // Adjacent corners on opposite sides of the edited corner leave the
        // diagonal only one valid value.
        let mut tile = tile_at(0.0);
        tile.set_corners([0.0, 0.25, 0.0, -0.25]);
        tile.set_corner_height(Corner::LowerLeft, 0.0);
        assert_slope_clamp(&tile);
        assert_eq!(tile.corner(Corner::UpperRight), 0.0);
    }

    #[test]
    fn test_every_corner_edit_keeps_clamp() {
        let heights = [-3.0, -0.5, -0.25, 0.0, 0.25, 0.5, 0.75, 4.0];
        let starts: [[f32; 4]; 3] = [
            [0.0, 0.0, 0.0, 0.0],
            [0.0, 0.25, 0.5, 0.25],
            [1.0, 0.75, 1.0, 1.25],
        ];
        for start in starts {
            for corner in Corner::ALL {
                for h in heights {
                    let mut tile = tile_at(0.0);
                    tile.set_corners(start);
                    tile.set_corner_height(corner, h);
                    assert_eq!(tile.corner(corner), h);
                    assert_slope_clamp(&tile);
                }
            }
        }
    }

    #[test]
    fn test_height_and_slope_derivation() {
        let mut tile = tile_at(0.0);
        tile.set_corners([0.5, 0.25, 0.5, 0.25]);
        assert_eq!(tile.height(), 0.5);
        assert!(tile.is_slope());
        assert_eq!(tile.min_corner(), 0.25);

        tile.set_uniform_height(-2.0);
        assert_eq!(tile.height(), -2.0);
        assert!(!tile.is_slope());
    }

    #[test]
    fn test_coord_offset_rejects_negative() {
        let c = TileCoord::new(0, 5);
        assert_eq!(c.offset(-1, 0), None);
        assert_eq!(c.offset(1, -5), Some(TileCoord::new(1, 0)));
    }
}
