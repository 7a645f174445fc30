//! Full tiles: the 2×2 block of quarter tiles edited together in basic mode.

use serde::{Deserialize, Serialize};

use crate::tile::TileCoord;

/// Four quarter tiles sharing one coarse cell. Quarters other than the
/// south-west one are absent at the grid's north and east edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullTile {
    pub south_west: TileCoord,
    pub north_west: Option<TileCoord>,
    pub north_east: Option<TileCoord>,
    pub south_east: Option<TileCoord>,
}

impl FullTile {
    /// Present quarters in SW, NW, NE, SE order.
    pub fn quarters(&self) -> Vec<TileCoord> {
        std::iter::once(self.south_west)
            .chain(self.north_west)
            .chain(self.north_east)
            .chain(self.south_east)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quarters_skip_absent() {
        let full = FullTile {
            south_west: TileCoord::new(9, 2),
            north_west: Some(TileCoord::new(9, 3)),
            north_east: None,
            south_east: None,
        };
        assert_eq!(
            full.quarters(),
            vec![TileCoord::new(9, 2), TileCoord::new(9, 3)]
        );
    }
}
