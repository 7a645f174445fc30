//! Procedural terrain generation with octave Perlin noise.
//!
//! Heights are sampled on the `(size + 1)²` vertex lattice so neighboring
//! tiles read the same value for every shared corner. Each vertex is the sum
//! of octaves whose frequency doubles and whose amplitude decays by the
//! persistence factor, mapped into the generation height band and floored to
//! quarter steps. A slope limit then pulls peaks down until no two lattice
//! neighbors differ by more than one height increment.

use bevy::prelude::*;
use fastnoise_lite::{FastNoiseLite, NoiseType};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::config::{WorldConfig, HEIGHT_INCREMENT};
use crate::grid::TileGrid;

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

/// Noise-space distance spanned by the whole map per unit of frequency and
/// seed scale.
const SAMPLE_SCALE: f32 = 100.0;

/// Terrain and cliff texture ids assigned by elevation band.
pub mod textures {
    pub const GRASS: u8 = 0;
    pub const SAND: u8 = 2;
    pub const ROCK: u8 = 4;
    pub const SNOW: u8 = 5;
    pub const WATER_BED: u8 = 6;

    pub const DIRT_CLIFF: u8 = 1;
    pub const SAND_CLIFF: u8 = 3;
    pub const ROCK_CLIFF: u8 = 5;
}

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParams {
    /// Seed of the noise lattice itself.
    pub noise_seed: i32,
    /// Multiplier on sample coordinates, in `0.02..0.06` when randomized.
    pub elevation_seed: f32,
    pub octaves: u32,
    pub base_frequency: f32,
    pub base_amplitude: f32,
    pub persistence: f32,
    pub min_generation_height: f32,
    pub max_generation_height: f32,
    pub water_level: f32,
    pub snow_line: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            noise_seed: 0,
            elevation_seed: 0.04,
            octaves: 4,
            base_frequency: 0.5,
            base_amplitude: 1.0,
            persistence: 0.5,
            min_generation_height: -2.0,
            max_generation_height: 10.0,
            water_level: 0.0,
            snow_line: 8.0,
        }
    }
}

impl GenerationParams {
    /// Draw every shape parameter from `seed`. The same seed always yields
    /// the same parameters.
    pub fn randomized(seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Self {
            noise_seed: rng.gen(),
            elevation_seed: rng.gen_range(0.02..0.06),
            octaves: rng.gen_range(4..8),
            base_frequency: rng.gen_range(0.25..0.75),
            base_amplitude: rng.gen_range(0.5..1.5),
            persistence: rng.gen_range(0.25..0.5),
            ..Self::default()
        }
    }

    /// `(frequency, amplitude)` of every octave.
    pub fn octave_table(&self) -> Vec<(f32, f32)> {
        let mut frequency = self.base_frequency;
        let mut amplitude = self.base_amplitude;
        (0..self.octaves)
            .map(|_| {
                let octave = (frequency, amplitude);
                frequency *= 2.0;
                amplitude *= self.persistence;
                octave
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Heightmap
// ---------------------------------------------------------------------------

/// Vertex heights of a `size`-tile map, row-major over `(size + 1)²`
/// entries indexed `z * (size + 1) + x`.
#[derive(Debug, Clone, PartialEq)]
pub struct Heightmap {
    side: usize,
    heights: Vec<f32>,
}

impl Heightmap {
    /// Vertices per side.
    pub fn side(&self) -> usize {
        self.side
    }

    pub fn get(&self, x: usize, z: usize) -> f32 {
        self.heights[z * self.side + x]
    }

    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    /// Lower every vertex until each one is within one height increment of
    /// its four lattice neighbors. Only lowers, so no vertex leaves the
    /// band it was clamped to.
    pub fn limit_slopes(&mut self) {
        let side = self.side;
        let h = &mut self.heights;
        for z in 0..side {
            for x in 0..side {
                let i = z * side + x;
                if x > 0 {
                    h[i] = h[i].min(h[i - 1] + HEIGHT_INCREMENT);
                }
                if z > 0 {
                    h[i] = h[i].min(h[i - side] + HEIGHT_INCREMENT);
                }
            }
        }
        for z in (0..side).rev() {
            for x in (0..side).rev() {
                let i = z * side + x;
                if x + 1 < side {
                    h[i] = h[i].min(h[i + 1] + HEIGHT_INCREMENT);
                }
                if z + 1 < side {
                    h[i] = h[i].min(h[i + side] + HEIGHT_INCREMENT);
                }
            }
        }
    }

    /// Corner heights of tile `(x, z)` in lower-left, upper-left,
    /// upper-right, lower-right order.
    pub fn tile_corners(&self, x: usize, z: usize) -> [f32; 4] {
        [
            self.get(x, z),
            self.get(x, z + 1),
            self.get(x + 1, z + 1),
            self.get(x + 1, z),
        ]
    }
}

fn floor_to_quarter(height: f32) -> f32 {
    (height * 4.0).floor() / 4.0
}

/// Sample the raw vertex heightmap for a map of `size` tiles per side.
pub fn generate_heightmap(size: u32, params: &GenerationParams, config: &WorldConfig) -> Heightmap {
    let mut noise = FastNoiseLite::with_seed(params.noise_seed);
    noise.set_noise_type(Some(NoiseType::Perlin));
    noise.set_frequency(Some(1.0));

    let octaves = params.octave_table();
    let side = size as usize + 1;
    let world = size.max(1) as f32;
    let scale = params.elevation_seed * SAMPLE_SCALE;
    let floor = config.bottom_of_map_height + 1.0;

    let mut heights = Vec::with_capacity(side * side);
    for z in 0..side {
        for x in 0..side {
            let nx = x as f32 / world;
            let nz = z as f32 / world;
            let mut value = 0.0;
            for &(frequency, amplitude) in &octaves {
                let raw = noise.get_noise_2d(frequency * nx * scale, frequency * nz * scale);
                // Perlin output in [-1, 1] rescaled to [0, 0.5].
                value += amplitude * (raw + 1.0) * 0.25;
            }
            let t = value.clamp(0.0, 1.0);
            let lerped = params.min_generation_height
                + (params.max_generation_height - params.min_generation_height) * t;
            let height = floor_to_quarter(lerped)
                .clamp(params.min_generation_height, params.max_generation_height)
                .clamp(floor, config.max_height);
            heights.push(height);
        }
    }

    let mut map = Heightmap { side, heights };
    map.limit_slopes();
    map
}

// ---------------------------------------------------------------------------
// Texture assignment
// ---------------------------------------------------------------------------

pub fn terrain_type_for_height(height: f32, params: &GenerationParams, max_height: f32) -> u8 {
    if height <= params.water_level {
        textures::WATER_BED
    } else if height <= params.water_level + 0.25 {
        textures::SAND
    } else if height >= params.snow_line && height <= max_height {
        if height < params.snow_line + 1.0 {
            textures::ROCK
        } else {
            textures::SNOW
        }
    } else {
        textures::GRASS
    }
}

pub fn cliff_type_for_height(height: f32, params: &GenerationParams, max_height: f32) -> u8 {
    if height <= params.water_level {
        textures::DIRT_CLIFF
    } else if height <= params.water_level + 0.5 {
        textures::SAND_CLIFF
    } else if height >= params.snow_line && height <= max_height {
        textures::ROCK_CLIFF
    } else {
        textures::DIRT_CLIFF
    }
}

// ---------------------------------------------------------------------------
// Grid application
// ---------------------------------------------------------------------------

/// Replace every tile's corners and textures with generated terrain, and
/// reset overlays to the grid state.
pub fn generate_terrain(grid: &mut TileGrid, params: &GenerationParams, config: &WorldConfig) {
    let size = grid.size();
    let map = generate_heightmap(size, params, config);
    let grid_enabled = grid.defaults().grid_enabled;
    for tile in grid.tiles_mut() {
        let coord = tile.coord();
        tile.set_corners(map.tile_corners(coord.x as usize, coord.z as usize));
        let height = tile.height();
        tile.terrain_type = terrain_type_for_height(height, params, config.max_height);
        tile.cliff_type = cliff_type_for_height(height, params, config.max_height);
        tile.reset_overlay(grid_enabled);
    }
    info!(
        "Generated {size}x{size} terrain: {} octaves, highest tile {}",
        params.octaves,
        grid.highest_tile_height()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direction::Corner;
    use crate::grid::TileDefaults;

    #[test]
    fn test_randomized_params_are_deterministic_and_in_range() {
        let a = GenerationParams::randomized(42);
        let b = GenerationParams::randomized(42);
        assert_eq!(a, b);
        for seed in 0..50 {
            let p = GenerationParams::randomized(seed);
            assert!((0.02..0.06).contains(&p.elevation_seed));
            assert!((4..8).contains(&p.octaves));
            assert!((0.25..0.75).contains(&p.base_frequency));
            assert!((0.5..1.5).contains(&p.base_amplitude));
            assert!((0.25..0.5).contains(&p.persistence));
        }
    }

    #[test]
    fn test_octave_table_doubles_frequency_and_decays_amplitude() {
        let params = GenerationParams::default();
        let table = params.octave_table();
        assert_eq!(table, vec![(0.5, 1.0), (1.0, 0.5), (2.0, 0.25), (4.0, 0.125)]);
    }

    #[test]
    fn test_heightmap_is_quarter_stepped_and_in_band() {
        let config = WorldConfig::default();
        let params = GenerationParams::randomized(7);
        let map = generate_heightmap(20, &params, &config);
        assert_eq!(map.side(), 21);
        assert_eq!(map.heights().len(), 21 * 21);
        for &h in map.heights() {
            assert_eq!((h * 4.0).fract(), 0.0, "{h} is not a quarter step");
            assert!((-2.0..=10.0).contains(&h));
        }
    }

    #[test]
    fn test_limit_slopes_bounds_lattice_neighbors() {
        let mut map = Heightmap {
            side: 4,
            heights: vec![
                0.0, 0.0, 0.0, 0.0, //
                0.0, 3.0, 0.0, 0.0, //
                0.0, 0.0, 0.0, 2.0, //
                0.0, 0.0, 0.0, 0.0,
            ],
        };
        map.limit_slopes();
        for z in 0..4 {
            for x in 0..4 {
                if x + 1 < 4 {
                    assert!((map.get(x, z) - map.get(x + 1, z)).abs() <= HEIGHT_INCREMENT);
                }
                if z + 1 < 4 {
                    assert!((map.get(x, z) - map.get(x, z + 1)).abs() <= HEIGHT_INCREMENT);
                }
            }
        }
        assert_eq!(map.get(1, 1), 0.25);
    }

    #[test]
    fn test_generated_grid_shares_corners_and_respects_slope_clamp() {
        let config = WorldConfig::default();
        let mut grid = TileGrid::new(24, TileDefaults::default());
        generate_terrain(&mut grid, &GenerationParams::randomized(3), &config);
        for tile in grid.tiles() {
            for corner in Corner::ALL {
                for adjacent in corner.adjacent() {
                    assert!((tile.corner(corner) - tile.corner(adjacent)).abs() <= HEIGHT_INCREMENT);
                }
            }
        }
        let a = grid.get(4, 4).unwrap();
        let east = grid.get(5, 4).unwrap();
        assert_eq!(a.corner(Corner::LowerRight), east.corner(Corner::LowerLeft));
        assert_eq!(a.corner(Corner::UpperRight), east.corner(Corner::UpperLeft));
    }

    #[test]
    fn test_texture_bands() {
        let p = GenerationParams::default();
        assert_eq!(terrain_type_for_height(-1.0, &p, 25.0), textures::WATER_BED);
        assert_eq!(terrain_type_for_height(0.25, &p, 25.0), textures::SAND);
        assert_eq!(terrain_type_for_height(3.0, &p, 25.0), textures::GRASS);
        assert_eq!(terrain_type_for_height(8.5, &p, 25.0), textures::ROCK);
        assert_eq!(terrain_type_for_height(9.0, &p, 25.0), textures::SNOW);

        assert_eq!(cliff_type_for_height(0.0, &p, 25.0), textures::DIRT_CLIFF);
        assert_eq!(cliff_type_for_height(0.5, &p, 25.0), textures::SAND_CLIFF);
        assert_eq!(cliff_type_for_height(2.0, &p, 25.0), textures::DIRT_CLIFF);
        assert_eq!(cliff_type_for_height(9.0, &p, 25.0), textures::ROCK_CLIFF);
    }
}
