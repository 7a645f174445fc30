//! Border propagation that conforms neighbors to an edited region.
//!
//! Each pass looks outward from the rim of the current generation of tiles.
//! A neighbor whose shared corners disagree with the rim tile ("master") is
//! rewritten to match it ("slave"), re-clamped, and joins the next
//! generation. Passes repeat until nothing changes or the pass limit is hit.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::direction::Direction;
use crate::grid::TileGrid;
use crate::selection::find_rectangle_border;
use crate::tile::TileCoord;

/// How a smoothing run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SmoothingOutcome {
    /// A pass touched no tiles.
    Converged,
    /// Passes stopped at the limit while tiles were still being touched.
    PassLimitReached,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmoothingReport {
    pub passes: u32,
    pub outcome: SmoothingOutcome,
    /// Every tile rewritten by any pass, in first-touch order.
    pub touched: Vec<TileCoord>,
}

/// Directions a border tile looks in, by its position on the rectangle.
const SOUTH_WEST_CHECKS: &[Direction] =
    &[Direction::South, Direction::SouthWest, Direction::West];
const NORTH_WEST_CHECKS: &[Direction] =
    &[Direction::West, Direction::NorthWest, Direction::North];
const NORTH_EAST_CHECKS: &[Direction] =
    &[Direction::North, Direction::NorthEast, Direction::East];
const SOUTH_EAST_CHECKS: &[Direction] =
    &[Direction::East, Direction::SouthEast, Direction::South];

/// Smooth outward from `seeds` for at most `pass_limit` passes.
///
/// A single seed tile checks all eight neighbors; larger sets check outward
/// from their bounding-rectangle border only.
pub fn propagate_smoothing(
    grid: &mut TileGrid,
    seeds: &[TileCoord],
    pass_limit: u32,
) -> SmoothingReport {
    let mut generation: Vec<TileCoord> = seeds.to_vec();
    let mut touched_all = Vec::new();
    let mut seen = HashSet::new();
    let mut passes = 0;

    let outcome = loop {
        if generation.is_empty() {
            break SmoothingOutcome::Converged;
        }
        if passes >= pass_limit {
            break SmoothingOutcome::PassLimitReached;
        }
        let touched = smoothing_pass(grid, &generation);
        passes += 1;
        for t in &touched {
            if seen.insert(*t) {
                touched_all.push(*t);
            }
        }
        generation = touched;
    };

    SmoothingReport {
        passes,
        outcome,
        touched: touched_all,
    }
}

/// Run one pass from `generation`, returning the tiles it rewrote.
pub fn smoothing_pass(grid: &mut TileGrid, generation: &[TileCoord]) -> Vec<TileCoord> {
    let members: HashSet<TileCoord> = generation.iter().copied().collect();
    let mut touched = Vec::new();
    let mut touched_set = HashSet::new();

    let mut visit = |grid: &mut TileGrid, master: TileCoord, directions: &[Direction]| {
        for &dir in directions {
            let Some(slave) = grid.neighbor(master, dir) else {
                continue;
            };
            if members.contains(&slave) {
                continue;
            }
            if conform_neighbor(grid, master, slave, dir) && touched_set.insert(slave) {
                touched.push(slave);
            }
        }
    };

    if let [single] = generation {
        visit(grid, *single, &Direction::ALL);
        return touched;
    }

    let Some(border) = find_rectangle_border(generation) else {
        return touched;
    };
    if let Some(tile) = border.south_west {
        visit(grid, tile, SOUTH_WEST_CHECKS);
    }
    for &tile in &border.western {
        visit(grid, tile, &[Direction::West]);
    }
    if let Some(tile) = border.north_west {
        visit(grid, tile, NORTH_WEST_CHECKS);
    }
    for &tile in &border.northern {
        visit(grid, tile, &[Direction::North]);
    }
    if let Some(tile) = border.north_east {
        visit(grid, tile, NORTH_EAST_CHECKS);
    }
    for &tile in &border.eastern {
        visit(grid, tile, &[Direction::East]);
    }
    if let Some(tile) = border.south_east {
        visit(grid, tile, SOUTH_EAST_CHECKS);
    }
    for &tile in &border.southern {
        visit(grid, tile, &[Direction::South]);
    }
    touched
}

/// Whether any corner shared between `master` and the neighbor in
/// `direction` disagrees.
pub fn needs_smoothing(grid: &TileGrid, master: TileCoord, slave: TileCoord, direction: Direction) -> bool {
    let (Some(m), Some(s)) = (grid.tile(master), grid.tile(slave)) else {
        return false;
    };
    direction
        .shared_corners()
        .iter()
        .any(|&(mc, sc)| m.corner(mc) != s.corner(sc))
}

/// Copy the master's shared corners onto the slave, re-clamping the slave
/// after each changed corner. Returns true if the slave changed.
pub fn conform_neighbor(
    grid: &mut TileGrid,
    master: TileCoord,
    slave: TileCoord,
    direction: Direction,
) -> bool {
    if !needs_smoothing(grid, master, slave, direction) {
        return false;
    }
    let mut changed = false;
    for &(master_corner, slave_corner) in direction.shared_corners() {
        let Some(target) = grid.tile(master).map(|t| t.corner(master_corner)) else {
            return changed;
        };
        let Some(tile) = grid.tile_mut(slave) else {
            return changed;
        };
        if tile.corner(slave_corner) != target {
            tile.set_corner_height(slave_corner, target);
            changed = true;
        }
    }
    changed
}
