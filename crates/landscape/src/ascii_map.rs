//! ASCII height maps of the terrain grid.
//!
//! Provides two views:
//! - **Detail**: one character per tile, optionally cropped to a rectangle
//! - **Overview**: each character is the highest tile of a square block
//!
//! North is at the top, so rows are printed from the highest `z` down.
//! Maps are built on demand from `&TileGrid`; no per-frame systems needed.

use crate::config::HEIGHT_INCREMENT;
use crate::grid::TileGrid;
use crate::tile::{QuarterTile, TileCoord};

// -----------------------------------------------------------------------
// Character encoding
// -----------------------------------------------------------------------

/// Character for a height: `~` below zero, `.` at zero, then one symbol per
/// quarter step (`1`-`9`, `a`-`z`), and `^` above that.
pub fn height_char(height: f32) -> char {
    let steps = (height / HEIGHT_INCREMENT).round() as i32;
    match steps {
        i32::MIN..=-1 => '~',
        0 => '.',
        1..=9 => char::from(b'0' + steps as u8),
        10..=35 => char::from(b'a' + (steps - 10) as u8),
        _ => '^',
    }
}

/// Character for one tile. Sloped tiles use their highest corner.
pub fn tile_char(tile: &QuarterTile) -> char {
    height_char(tile.height())
}

fn append_legend(lines: &mut Vec<String>) {
    lines.push("Legend: ~ below 0  . level 0  1-9 quarter steps  a-z 2.5m+  ^ above 9m".to_string());
}

fn col_header(x0: u32, width: u32) -> String {
    let mut header = String::from("       ");
    let mut col = 0;
    while col < width {
        let real_x = x0 + col;
        if real_x % 10 == 0 || col == 0 {
            let label = real_x.to_string();
            col += label.len() as u32;
            header.push_str(&label);
        } else {
            header.push(' ');
            col += 1;
        }
    }
    header.trim_end().to_string()
}

// -----------------------------------------------------------------------
// Detail map
// -----------------------------------------------------------------------

/// Full-resolution map of the rectangle spanned by `a` and `b`, clamped to
/// the grid.
pub fn build_detail_map(grid: &TileGrid, a: TileCoord, b: TileCoord) -> String {
    let last = grid.size() - 1;
    let (x0, x1) = (a.x.min(b.x).min(last), a.x.max(b.x).min(last));
    let (z0, z1) = (a.z.min(b.z).min(last), a.z.max(b.z).min(last));

    let mut lines = Vec::with_capacity((z1 - z0 + 4) as usize);
    lines.push(col_header(x0, x1 - x0 + 1));
    for z in (z0..=z1).rev() {
        let mut line = format!("{z:>4} | ");
        for x in x0..=x1 {
            line.push(grid.get(x, z).map_or(' ', tile_char));
        }
        lines.push(line);
    }
    lines.push(String::new());
    append_legend(&mut lines);
    lines.join("\n")
}

/// Detail map of the whole grid.
pub fn build_full_map(grid: &TileGrid) -> String {
    let last = grid.size() - 1;
    build_detail_map(grid, TileCoord::new(0, 0), TileCoord::new(last, last))
}

// -----------------------------------------------------------------------
// Overview map
// -----------------------------------------------------------------------

/// Downsampled map where each character covers `block × block` tiles and
/// shows the highest tile in the block. Blocks larger than the grid cover
/// the whole grid.
pub fn build_overview_map(grid: &TileGrid, block: u32) -> String {
    let block = block.clamp(1, grid.size().max(1));
    let cells = grid.size().div_ceil(block);

    let mut lines = Vec::with_capacity(cells as usize + 3);
    for row in (0..cells).rev() {
        let z0 = row * block;
        let mut line = format!("{z0:>4} | ");
        for col in 0..cells {
            line.push(height_char(block_max(grid, col * block, z0, block)));
        }
        lines.push(line);
    }
    lines.push(String::new());
    append_legend(&mut lines);
    lines.join("\n")
}

fn block_max(grid: &TileGrid, x0: u32, z0: u32, block: u32) -> f32 {
    let size = grid.size();
    let mut best = f32::NEG_INFINITY;
    for z in z0..z0.saturating_add(block).min(size) {
        for x in x0..x0.saturating_add(block).min(size) {
            if let Some(tile) = grid.get(x, z) {
                best = best.max(tile.height());
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::TileDefaults;

    #[test]
    fn test_height_chars() {
        assert_eq!(height_char(-0.25), '~');
        assert_eq!(height_char(0.0), '.');
        assert_eq!(height_char(0.25), '1');
        assert_eq!(height_char(2.25), '9');
        assert_eq!(height_char(2.5), 'a');
        assert_eq!(height_char(8.75), 'z');
        assert_eq!(height_char(9.0), '^');
    }

    #[test]
    fn test_detail_map_puts_north_on_top() {
        let mut grid = TileGrid::new(10, TileDefaults::default());
        grid.get_mut(1, 2).unwrap().set_uniform_height(0.5);
        let map = build_detail_map(&grid, TileCoord::new(0, 0), TileCoord::new(3, 2));
        let rows: Vec<&str> = map.lines().skip(1).take(3).collect();
        assert_eq!(rows, vec!["   2 | .2..", "   1 | ....", "   0 | ...."]);
    }

    #[test]
    fn test_overview_uses_block_maximum() {
        let mut grid = TileGrid::new(10, TileDefaults::default());
        grid.get_mut(9, 0).unwrap().set_uniform_height(-1.0);
        grid.get_mut(0, 0).unwrap().set_uniform_height(1.0);
        let map = build_overview_map(&grid, 5);
        let rows: Vec<&str> = map.lines().take(2).collect();
        assert_eq!(rows, vec!["   5 | ..", "   0 | 4."]);
    }

    #[test]
    fn test_overview_block_larger_than_grid_is_one_cell() {
        let mut grid = TileGrid::new(10, TileDefaults::default());
        grid.get_mut(9, 9).unwrap().set_uniform_height(0.5);
        let map = build_overview_map(&grid, 2_000_000);
        let rows: Vec<&str> = map.lines().take_while(|l| !l.is_empty()).collect();
        assert_eq!(rows, vec!["   0 | 2"]);

        let map = build_overview_map(&grid, u32::MAX);
        assert!(map.starts_with("   0 | 2\n"));
    }
}
