//! Tile corners, compass directions, and which corners neighboring tiles share.
//!
//! Coordinates grow east along `x` and north along `z`, so "south" is `z - 1`.

use serde::{Deserialize, Serialize};

/// One of the four corners of a quarter tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    /// South-west corner.
    LowerLeft,
    /// North-west corner.
    UpperLeft,
    /// North-east corner.
    UpperRight,
    /// South-east corner.
    LowerRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::LowerLeft,
        Corner::UpperLeft,
        Corner::UpperRight,
        Corner::LowerRight,
    ];

    /// The two corners sharing an edge with this one.
    pub fn adjacent(self) -> [Corner; 2] {
        match self {
            Corner::LowerLeft => [Corner::UpperLeft, Corner::LowerRight],
            Corner::UpperLeft => [Corner::UpperRight, Corner::LowerLeft],
            Corner::UpperRight => [Corner::UpperLeft, Corner::LowerRight],
            Corner::LowerRight => [Corner::LowerLeft, Corner::UpperRight],
        }
    }

    pub fn diagonal(self) -> Corner {
        match self {
            Corner::LowerLeft => Corner::UpperRight,
            Corner::UpperLeft => Corner::LowerRight,
            Corner::UpperRight => Corner::LowerLeft,
            Corner::LowerRight => Corner::UpperLeft,
        }
    }

    /// Overlay id highlighting this corner while it is being edited.
    pub fn selection_overlay(self) -> u8 {
        match self {
            Corner::LowerLeft => 2,
            Corner::UpperLeft => 3,
            Corner::UpperRight => 4,
            Corner::LowerRight => 5,
        }
    }
}

/// Overlay id highlighting a whole tile.
pub const FULL_TILE_SELECTION_OVERLAY: u8 = 1;

/// The eight compass directions, in the order neighbor arrays are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    South,
    SouthWest,
    West,
    NorthWest,
    North,
    NorthEast,
    East,
    SouthEast,
}

impl Direction {
    /// Neighbor slot order: S, SW, W, NW, N, NE, E, SE.
    pub const ALL: [Direction; 8] = [
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
    ];

    /// Position of this direction in a neighbor array.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Coordinate offset `(dx, dz)` of the neighbor in this direction.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::South => (0, -1),
            Direction::SouthWest => (-1, -1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, 1),
            Direction::North => (0, 1),
            Direction::NorthEast => (1, 1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, -1),
        }
    }

    /// Corner pairs `(master, slave)` that coincide when the slave tile lies in
    /// this direction from the master. Straight directions share an edge (two
    /// corners); diagonal directions share a single corner.
    pub fn shared_corners(self) -> &'static [(Corner, Corner)] {
        use Corner::*;
        match self {
            Direction::South => &[(LowerLeft, UpperLeft), (LowerRight, UpperRight)],
            Direction::SouthWest => &[(LowerLeft, UpperRight)],
            Direction::West => &[(LowerLeft, LowerRight), (UpperLeft, UpperRight)],
            Direction::NorthWest => &[(UpperLeft, LowerRight)],
            Direction::North => &[(UpperLeft, LowerLeft), (UpperRight, LowerRight)],
            Direction::NorthEast => &[(UpperRight, LowerLeft)],
            Direction::East => &[(UpperRight, UpperLeft), (LowerRight, LowerLeft)],
            Direction::SouthEast => &[(LowerRight, UpperLeft)],
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::South => Direction::North,
            Direction::SouthWest => Direction::NorthEast,
            Direction::West => Direction::East,
            Direction::NorthWest => Direction::SouthEast,
            Direction::North => Direction::South,
            Direction::NorthEast => Direction::SouthWest,
            Direction::East => Direction::West,
            Direction::SouthEast => Direction::NorthWest,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_order_matches_slots() {
        for (i, dir) in Direction::ALL.iter().enumerate() {
            assert_eq!(dir.index(), i);
        }
    }

    #[test]
    fn test_diagonal_is_not_adjacent() {
        for corner in Corner::ALL {
            assert!(!corner.adjacent().contains(&corner.diagonal()));
            assert!(!corner.adjacent().contains(&corner));
            assert_eq!(corner.diagonal().diagonal(), corner);
        }
    }

    #[test]
    fn test_shared_corners_are_symmetric() {
        // Looking back from the slave must pair the same corners, reversed.
        for dir in Direction::ALL {
            let forward = dir.shared_corners();
            let backward = dir.opposite().shared_corners();
            assert_eq!(forward.len(), backward.len(), "{dir:?}");
            for &(master, slave) in forward {
                assert!(
                    backward.contains(&(slave, master)),
                    "{dir:?}: ({master:?}, {slave:?}) missing from the reverse table"
                );
            }
        }
    }

    #[test]
    fn test_straight_directions_share_an_edge() {
        for dir in [
            Direction::South,
            Direction::West,
            Direction::North,
            Direction::East,
        ] {
            assert_eq!(dir.shared_corners().len(), 2);
            let (dx, dz) = dir.offset();
            assert_eq!(dx.abs() + dz.abs(), 1);
        }
    }

    #[test]
    fn test_selection_overlay_ids() {
        let ids: Vec<u8> = Corner::ALL.iter().map(|c| c.selection_overlay()).collect();
        assert_eq!(ids, vec![2, 3, 4, 5]);
        assert_eq!(FULL_TILE_SELECTION_OVERLAY, 1);
    }
}
