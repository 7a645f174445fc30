use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{WorldConfig, MAX_WORLD_SIZE, MIN_WORLD_SIZE};
use crate::direction::Direction;
use crate::error::LandscapeError;
use crate::full_tile::FullTile;
use crate::tile::{QuarterTile, TileCoord};

/// Properties given to tiles created by the grid (initial build, growth,
/// flattening).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileDefaults {
    pub height: f32,
    pub bottom_height: f32,
    pub terrain_type: u8,
    pub cliff_type: u8,
    pub grid_enabled: bool,
}

impl Default for TileDefaults {
    fn default() -> Self {
        Self::from(&WorldConfig::default())
    }
}

impl From<&WorldConfig> for TileDefaults {
    fn from(config: &WorldConfig) -> Self {
        Self {
            height: config.base_elevation,
            bottom_height: config.bottom_of_map_height,
            terrain_type: config.default_terrain_type,
            cliff_type: config.default_cliff_type,
            grid_enabled: config.grid_enabled,
        }
    }
}

/// Dense square grid of quarter tiles, indexed `z * size + x`.
///
/// Every coordinate in `[0, size)²` holds a tile. Neighboring tiles store
/// their shared corners separately; the editor keeps them in agreement.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileGrid {
    tiles: Vec<QuarterTile>,
    size: u32,
    defaults: TileDefaults,
}

impl Default for TileGrid {
    fn default() -> Self {
        Self::from_config(&WorldConfig::default())
    }
}

impl TileGrid {
    /// Build a flat grid. `size` is clamped into the supported range.
    pub fn new(size: u32, defaults: TileDefaults) -> Self {
        let size = size.clamp(MIN_WORLD_SIZE, MAX_WORLD_SIZE);
        let mut tiles = Vec::with_capacity((size * size) as usize);
        for z in 0..size {
            for x in 0..size {
                tiles.push(Self::new_tile(TileCoord::new(x, z), &defaults));
            }
        }
        Self {
            tiles,
            size,
            defaults,
        }
    }

    pub fn from_config(config: &WorldConfig) -> Self {
        Self::new(config.world_size, TileDefaults::from(config))
    }

    fn new_tile(coord: TileCoord, defaults: &TileDefaults) -> QuarterTile {
        QuarterTile::flat(
            coord,
            defaults.height,
            defaults.bottom_height,
            defaults.terrain_type,
            defaults.cliff_type,
            defaults.grid_enabled,
        )
    }

    /// Tiles per side.
    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn defaults(&self) -> &TileDefaults {
        &self.defaults
    }

    #[inline]
    fn index(&self, x: u32, z: u32) -> usize {
        (z * self.size + x) as usize
    }

    #[inline]
    pub fn in_bounds(&self, x: u32, z: u32) -> bool {
        x < self.size && z < self.size
    }

    #[inline]
    pub fn contains(&self, coord: TileCoord) -> bool {
        self.in_bounds(coord.x, coord.z)
    }

    /// Tile at `(x, z)`, or `None` outside the grid.
    #[inline]
    pub fn get(&self, x: u32, z: u32) -> Option<&QuarterTile> {
        if !self.in_bounds(x, z) {
            return None;
        }
        self.tiles.get(self.index(x, z))
    }

    #[inline]
    pub fn get_mut(&mut self, x: u32, z: u32) -> Option<&mut QuarterTile> {
        if !self.in_bounds(x, z) {
            return None;
        }
        let idx = self.index(x, z);
        self.tiles.get_mut(idx)
    }

    #[inline]
    pub fn tile(&self, coord: TileCoord) -> Option<&QuarterTile> {
        self.get(coord.x, coord.z)
    }

    #[inline]
    pub fn tile_mut(&mut self, coord: TileCoord) -> Option<&mut QuarterTile> {
        self.get_mut(coord.x, coord.z)
    }

    /// Like [`TileGrid::tile`] but reports the miss as an error, for edit
    /// entry points where an absent tile is a caller mistake.
    pub fn require(&self, coord: TileCoord) -> Result<&QuarterTile, LandscapeError> {
        self.tile(coord).ok_or(LandscapeError::OutOfBounds {
            x: coord.x,
            z: coord.z,
            size: self.size,
        })
    }

    pub fn tiles(&self) -> impl Iterator<Item = &QuarterTile> {
        self.tiles.iter()
    }

    pub fn tiles_mut(&mut self) -> impl Iterator<Item = &mut QuarterTile> {
        self.tiles.iter_mut()
    }

    /// Neighbor of `coord` in `direction`, if inside the grid.
    pub fn neighbor(&self, coord: TileCoord, direction: Direction) -> Option<TileCoord> {
        let (dx, dz) = direction.offset();
        coord.offset(dx, dz).filter(|c| self.contains(*c))
    }

    /// All eight neighbors in S, SW, W, NW, N, NE, E, SE order; `None` for
    /// directions leaving the grid.
    pub fn adjacent_tiles(&self, coord: TileCoord) -> [Option<TileCoord>; 8] {
        Direction::ALL.map(|dir| self.neighbor(coord, dir))
    }

    /// Rebuild the grid at `new_size` tiles per side.
    ///
    /// Tiles inside both the old and new bounds are kept as they are; new
    /// tiles are flat at the default height with their grid tag assigned.
    pub fn resize(&mut self, new_size: u32) -> Result<(), LandscapeError> {
        if !(MIN_WORLD_SIZE..=MAX_WORLD_SIZE).contains(&new_size) {
            return Err(LandscapeError::InvalidWorldSize(new_size));
        }
        if new_size == self.size {
            return Ok(());
        }

        let old_size = self.size;
        let mut old: Vec<Option<QuarterTile>> =
            std::mem::take(&mut self.tiles).into_iter().map(Some).collect();
        let mut tiles = Vec::with_capacity((new_size * new_size) as usize);
        for z in 0..new_size {
            for x in 0..new_size {
                let kept = if x < old_size && z < old_size {
                    old.get_mut((z * old_size + x) as usize).and_then(Option::take)
                } else {
                    None
                };
                tiles.push(
                    kept.unwrap_or_else(|| Self::new_tile(TileCoord::new(x, z), &self.defaults)),
                );
            }
        }
        self.tiles = tiles;
        self.size = new_size;
        info!("Resized terrain grid from {old_size} to {new_size} tiles per side");
        Ok(())
    }

    /// The full tile whose south-west quarter is `southwest`.
    pub fn full_tile(&self, southwest: TileCoord) -> Option<FullTile> {
        if !self.contains(southwest) {
            return None;
        }
        Some(FullTile {
            south_west: southwest,
            north_west: self.neighbor(southwest, Direction::North),
            north_east: self.neighbor(southwest, Direction::NorthEast),
            south_east: self.neighbor(southwest, Direction::East),
        })
    }

    /// The full tile containing `coord`, aligned to even coordinates.
    pub fn full_tile_containing(&self, coord: TileCoord) -> Option<FullTile> {
        self.full_tile(TileCoord::new(coord.x & !1, coord.z & !1))
    }

    /// Every tile of the inclusive rectangle spanned by `a` and `b`, row by
    /// row from the south. Corners outside the grid are clamped to its edge.
    pub fn tiles_in_rectangle(&self, a: TileCoord, b: TileCoord) -> Vec<TileCoord> {
        let last = self.size - 1;
        let (min_x, max_x) = (a.x.min(b.x).min(last), a.x.max(b.x).min(last));
        let (min_z, max_z) = (a.z.min(b.z).min(last), a.z.max(b.z).min(last));
        let mut out = Vec::with_capacity(((max_x - min_x + 1) * (max_z - min_z + 1)) as usize);
        for z in min_z..=max_z {
            for x in min_x..=max_x {
                out.push(TileCoord::new(x, z));
            }
        }
        out
    }

    /// Reset every tile to a flat surface at `height`.
    pub fn flatten(&mut self, height: f32) {
        for tile in &mut self.tiles {
            tile.set_uniform_height(height);
        }
    }

    /// Highest tile height in the grid.
    pub fn highest_tile_height(&self) -> f32 {
        self.tiles
            .iter()
            .map(QuarterTile::height)
            .fold(f32::NEG_INFINITY, f32::max)
    }

    /// Show or hide the checkerboard overlay on every tile.
    pub fn set_grid_enabled(&mut self, enabled: bool) {
        self.defaults.grid_enabled = enabled;
        for tile in &mut self.tiles {
            tile.reset_overlay(enabled);
        }
    }

    /// Convert a world-space position (meters) to the tile under it.
    pub fn world_to_tile(&self, world_x: f32, world_z: f32, tile_size: f32) -> Option<TileCoord> {
        let tx = (world_x / tile_size).floor();
        let tz = (world_z / tile_size).floor();
        if tx < 0.0 || tz < 0.0 {
            return None;
        }
        let coord = TileCoord::new(tx as u32, tz as u32);
        self.contains(coord).then_some(coord)
    }
}
