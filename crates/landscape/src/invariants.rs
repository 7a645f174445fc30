//! Runtime invariant guards for tile corner data.
//!
//! Every edit leaves the tiles it wrote consistent; these checks catch data
//! that arrived some other way (direct grid writes, generated maps, config
//! mistakes). On violation, a warning is logged and the tile is re-clamped.

use bevy::prelude::*;

use crate::config::{WorldConfig, HEIGHT_INCREMENT};
use crate::direction::Corner;
use crate::grid::TileGrid;
use crate::landscaping::TerrainEditedEvent;
use crate::tile::QuarterTile;

/// Float slack when comparing quarter-step heights.
const TOLERANCE: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TileViolation {
    NonFinite,
    /// Two corners sharing an edge differ by more than one increment.
    AdjacentCorners { a: Corner, b: Corner, difference: f32 },
    /// Opposite corners differ by more than two increments.
    DiagonalCorners { a: Corner, b: Corner, difference: f32 },
    /// Cached height or slope flag does not match the corners.
    StaleDerived,
    OutOfEnvelope { height: f32 },
}

/// Every violation on `tile`; empty when the tile is consistent.
pub fn check_tile(tile: &QuarterTile, config: &WorldConfig) -> Vec<TileViolation> {
    let corners = tile.corners();
    if corners.iter().any(|h| !h.is_finite()) {
        return vec![TileViolation::NonFinite];
    }

    let mut violations = Vec::new();
    for (i, &a) in Corner::ALL.iter().enumerate() {
        for &b in &Corner::ALL[i + 1..] {
            let difference = (tile.corner(a) - tile.corner(b)).abs();
            if b == a.diagonal() {
                if difference > 2.0 * HEIGHT_INCREMENT + TOLERANCE {
                    violations.push(TileViolation::DiagonalCorners { a, b, difference });
                }
            } else if difference > HEIGHT_INCREMENT + TOLERANCE {
                violations.push(TileViolation::AdjacentCorners { a, b, difference });
            }
        }
    }

    let max = corners.into_iter().fold(f32::NEG_INFINITY, f32::max);
    let average = corners.iter().sum::<f32>() / 4.0;
    if tile.height() != max || tile.is_slope() != (average != max) {
        violations.push(TileViolation::StaleDerived);
    }

    for h in corners {
        if h < config.bottom_of_map_height || h > config.max_height {
            violations.push(TileViolation::OutOfEnvelope { height: h });
            break;
        }
    }
    violations
}

/// Whether the corner-difference rule holds, ignoring the envelope.
pub fn slope_clamp_holds(tile: &QuarterTile) -> bool {
    Corner::ALL.into_iter().all(|a| {
        let h = tile.corner(a);
        a.adjacent()
            .into_iter()
            .all(|b| (h - tile.corner(b)).abs() <= HEIGHT_INCREMENT + TOLERANCE)
            && (h - tile.corner(a.diagonal())).abs() <= 2.0 * HEIGHT_INCREMENT + TOLERANCE
    })
}

/// Repair `tile` in place. Returns true if anything had to change.
///
/// Non-finite corners flatten the tile at the base elevation; otherwise
/// corners are clamped into the envelope and re-validated from the lowest
/// corner.
pub fn enforce_tile(tile: &mut QuarterTile, config: &WorldConfig) -> bool {
    let violations = check_tile(tile, config);
    if violations.is_empty() {
        return false;
    }
    if violations.contains(&TileViolation::NonFinite) {
        tile.set_uniform_height(config.base_elevation);
        return true;
    }

    let clamped = tile
        .corners()
        .map(|h| h.clamp(config.bottom_of_map_height, config.max_height));
    tile.set_corners(clamped);
    let lowest = Corner::ALL
        .into_iter()
        .min_by(|a, b| tile.corner(*a).total_cmp(&tile.corner(*b)))
        .unwrap_or(Corner::LowerLeft);
    tile.validate_and_propagate(lowest);
    true
}

/// Counts of violations repaired by the guard since startup.
#[derive(Resource, Default, Debug)]
pub struct TerrainInvariantViolations {
    pub tiles_checked: u64,
    pub tiles_repaired: u32,
    pub corner_violations: u32,
    pub envelope_violations: u32,
    pub non_finite: u32,
}

impl TerrainInvariantViolations {
    fn record(&mut self, violations: &[TileViolation]) {
        for v in violations {
            match v {
                TileViolation::NonFinite => self.non_finite += 1,
                TileViolation::AdjacentCorners { .. }
                | TileViolation::DiagonalCorners { .. }
                | TileViolation::StaleDerived => self.corner_violations += 1,
                TileViolation::OutOfEnvelope { .. } => self.envelope_violations += 1,
            }
        }
    }
}

/// Check (and repair) every tile reported dirty by this frame's edits.
pub fn validate_edited_tiles(
    mut edits: EventReader<TerrainEditedEvent>,
    mut grid: ResMut<TileGrid>,
    config: Res<WorldConfig>,
    mut violations: ResMut<TerrainInvariantViolations>,
) {
    for edit in edits.read() {
        for &coord in &edit.report.dirty_tiles {
            let Some(tile) = grid.tile_mut(coord) else {
                continue;
            };
            violations.tiles_checked += 1;
            let found = check_tile(tile, &config);
            if found.is_empty() {
                continue;
            }
            warn!(
                "Invariant violation on tile ({}, {}): {:?}. Re-clamping corners {:?}.",
                coord.x,
                coord.z,
                found,
                tile.corners()
            );
            violations.record(&found);
            if enforce_tile(tile, &config) {
                violations.tiles_repaired += 1;
            }
        }
    }
}

/// Full-grid sweep, for loaded or generated maps.
pub fn enforce_grid(grid: &mut TileGrid, config: &WorldConfig) -> u32 {
    let mut repaired = 0;
    for tile in grid.tiles_mut() {
        if enforce_tile(tile, config) {
            repaired += 1;
        }
    }
    if repaired > 0 {
        warn!("Repaired {repaired} inconsistent tiles");
    }
    repaired
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::TileCoord;

    fn tile() -> QuarterTile {
        QuarterTile::flat(TileCoord::new(1, 1), 0.0, -6.0, 0, 1, true)
    }

    #[test]
    fn test_flat_tile_is_clean() {
        assert!(check_tile(&tile(), &WorldConfig::default()).is_empty());
    }

    #[test]
    fn test_detects_steep_corners() {
        let mut t = tile();
        t.set_corners([0.0, 1.0, 0.0, 0.0]);
        let found = check_tile(&t, &WorldConfig::default());
        assert!(found
            .iter()
            .any(|v| matches!(v, TileViolation::AdjacentCorners { .. })));
        assert!(found
            .iter()
            .any(|v| matches!(v, TileViolation::DiagonalCorners { .. })));
    }

    #[test]
    fn test_enforce_repairs_steep_tile() {
        let config = WorldConfig::default();
        let mut t = tile();
        t.set_corners([0.0, 1.0, 2.0, 0.0]);
        assert!(enforce_tile(&mut t, &config));
        assert!(check_tile(&t, &config).is_empty());
        assert_eq!(t.corner(Corner::LowerLeft), 0.0);
        assert_eq!(t.corner(Corner::UpperRight), 0.25);
    }

    #[test]
    fn test_enforce_flattens_non_finite() {
        let config = WorldConfig::default();
        let mut t = tile();
        t.set_corners([f32::NAN, 0.0, 0.0, 0.0]);
        assert_eq!(check_tile(&t, &config), vec![TileViolation::NonFinite]);
        assert!(enforce_tile(&mut t, &config));
        assert_eq!(t.corners(), [0.0; 4]);
    }

    #[test]
    fn test_envelope_clamp() {
        let config = WorldConfig::default();
        let mut t = tile();
        t.set_corners([30.0; 4]);
        assert!(matches!(
            check_tile(&t, &config)[..],
            [TileViolation::OutOfEnvelope { .. }]
        ));
        enforce_tile(&mut t, &config);
        assert_eq!(t.height(), 25.0);
    }

    #[test]
    fn test_clean_tile_is_left_alone() {
        let mut t = tile();
        t.set_corner_height(Corner::UpperLeft, 0.25);
        let before = t.clone();
        assert!(!enforce_tile(&mut t, &WorldConfig::default()));
        assert_eq!(t, before);
    }
}
