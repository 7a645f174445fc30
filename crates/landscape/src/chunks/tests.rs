#[cfg(test)]
mod tests {
    use crate::chunks::{
        chunk_at_tile, dirty_chunks, ChunkCoord, ChunkRenderer, DirtyChunkSet, PendingRedraws,
        RedrawLayers,
    };
    use crate::grid::{TileDefaults, TileGrid};
    use crate::tile::TileCoord;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<(ChunkCoord, bool)>,
    }

    impl ChunkRenderer for Recorder {
        fn draw_tiles(&mut self, chunk: ChunkCoord, _grid: &TileGrid, overlay: bool) {
            self.calls.push((chunk, overlay));
        }
    }

    fn chunk(x: u32, z: u32) -> ChunkCoord {
        ChunkCoord { x, z }
    }

    #[test]
    fn test_chunk_at_tile_divides() {
        assert_eq!(chunk_at_tile(TileCoord::new(0, 0), 40), chunk(0, 0));
        assert_eq!(chunk_at_tile(TileCoord::new(39, 40), 40), chunk(0, 1));
        assert_eq!(chunk_at_tile(TileCoord::new(249, 125), 40), chunk(6, 3));
    }

    #[test]
    fn test_zero_chunk_size_does_not_divide_by_zero() {
        assert_eq!(chunk_at_tile(TileCoord::new(7, 3), 0), chunk(7, 3));
    }

    #[test]
    fn test_dirty_chunks_deduplicates() {
        let tiles = [
            TileCoord::new(1, 1),
            TileCoord::new(2, 3),
            TileCoord::new(3, 3),
            TileCoord::new(4, 0),
            TileCoord::new(1, 1),
        ];
        let set = dirty_chunks(&tiles, 4);
        assert_eq!(set.len(), 2);
        assert!(set.contains(chunk(0, 0)));
        assert!(set.contains(chunk(1, 0)));
    }

    #[test]
    fn test_all_covers_partial_chunks() {
        let set = DirtyChunkSet::all(250, 40);
        assert_eq!(set.len(), 49);
        assert!(set.contains(chunk(6, 6)));
        assert!(!set.contains(chunk(7, 0)));
    }

    #[test]
    fn test_iteration_is_ordered() {
        let set: DirtyChunkSet = [chunk(2, 1), chunk(0, 3), chunk(1, 1)].into_iter().collect();
        let order: Vec<ChunkCoord> = set.iter().collect();
        assert_eq!(order, vec![chunk(0, 3), chunk(1, 1), chunk(2, 1)]);
    }

    #[test]
    fn test_draw_calls_renderer_once_per_chunk_and_empties() {
        let grid = TileGrid::new(10, TileDefaults::default());
        let mut set = dirty_chunks(
            &[
                TileCoord::new(0, 0),
                TileCoord::new(1, 0),
                TileCoord::new(9, 9),
            ],
            5,
        );
        let mut recorder = Recorder::default();
        set.draw(&grid, &mut recorder, true);
        assert_eq!(
            recorder.calls,
            vec![(chunk(0, 0), true), (chunk(1, 1), true)]
        );
        assert!(set.is_empty());
    }

    #[test]
    fn test_pending_redraws_respects_layers() {
        let set: DirtyChunkSet = [chunk(0, 0)].into_iter().collect();
        let mut pending = PendingRedraws::default();
        assert!(pending.is_empty());

        pending.add(&set, RedrawLayers::OVERLAY);
        assert!(pending.terrain.is_empty());
        assert_eq!(pending.overlay.len(), 1);

        pending.add(&set, RedrawLayers::ALL);
        assert_eq!(pending.terrain.len(), 1);
        assert_eq!(pending.overlay.len(), 1);

        pending.add(&[chunk(3, 3)].into_iter().collect(), RedrawLayers::NONE);
        assert_eq!(pending.terrain.len(), 1);
    }
}
