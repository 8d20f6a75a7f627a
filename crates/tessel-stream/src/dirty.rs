use hashbrown::HashSet;
use tessel_atlas::TileId;
use tessel_world::{CellCoord, TileIds};

use crate::viewport::Band;

/// Draw order for streamed cells: top rows first, then left to right.
pub fn sort_back_to_front(cells: &mut [CellCoord]) {
    cells.sort_unstable_by(|a, b| b.y.cmp(&a.y).then(a.x.cmp(&b.x)));
}

/// Pending meta and visual invalidations.
#[derive(Default, Debug)]
pub struct DirtyRegionTracker {
    meta: HashSet<u64>,
    vis: HashSet<u64>,
}

impl DirtyRegionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_meta(&mut self, c: CellCoord) {
        self.meta.insert(c.key());
    }

    pub fn mark_vis(&mut self, c: CellCoord) -> bool {
        self.vis.insert(c.key())
    }

    /// Marks every cell of a band; returns how many were newly dirty.
    pub fn mark_band(&mut self, band: &Band) -> usize {
        band.cells().filter(|c| self.vis.insert(c.key())).count()
    }

    /// Marks cells whose cached ids appear in a freshly made batch. Returns
    /// the number of cells marked.
    pub fn mark_revealed(
        &mut self,
        made: &HashSet<TileId>,
        cells: impl IntoIterator<Item = (CellCoord, TileIds)>,
    ) -> usize {
        if made.is_empty() {
            return 0;
        }
        let mut n = 0;
        for (c, ids) in cells {
            if (made.contains(&ids.bottom) || made.contains(&ids.top)) && self.vis.insert(c.key())
            {
                n += 1;
            }
        }
        n
    }

    /// Moves each meta-dirty cell's 3x3 block into the visual set. Returns
    /// the expanded cells, whose cached visuals the caller must drop.
    pub fn drain_meta(&mut self) -> Vec<CellCoord> {
        let mut out: Vec<CellCoord> = Vec::with_capacity(self.meta.len() * 9);
        let mut seen: HashSet<u64> = HashSet::with_capacity(self.meta.len() * 9);
        for key in self.meta.drain() {
            for c in CellCoord::from_key(key).block3x3() {
                if seen.insert(c.key()) {
                    self.vis.insert(c.key());
                    out.push(c);
                }
            }
        }
        out
    }

    /// Drains the visual set in back-to-front order.
    pub fn take_vis(&mut self) -> Vec<CellCoord> {
        let mut out: Vec<CellCoord> = self.vis.drain().map(CellCoord::from_key).collect();
        sort_back_to_front(&mut out);
        out
    }

    pub fn has_pending_meta(&self) -> bool {
        !self.meta.is_empty()
    }

    pub fn pending_vis(&self) -> usize {
        self.vis.len()
    }

    pub fn is_clean(&self) -> bool {
        self.meta.is_empty() && self.vis.is_empty()
    }

    pub fn clear(&mut self) {
        self.meta.clear();
        self.vis.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meta_expands_to_block() {
        let mut d = DirtyRegionTracker::new();
        d.mark_meta(CellCoord::new(4, -2));
        assert!(d.has_pending_meta());
        let cells = d.drain_meta();
        assert_eq!(cells.len(), 9);
        assert!(!d.has_pending_meta());
        assert_eq!(d.pending_vis(), 9);
        let vis = d.take_vis();
        for dy in -1..=1 {
            for dx in -1..=1 {
                assert!(vis.contains(&CellCoord::new(4 + dx, -2 + dy)));
            }
        }
        assert!(d.is_clean());
    }

    #[test]
    fn adjacent_edits_share_cells() {
        let mut d = DirtyRegionTracker::new();
        d.mark_meta(CellCoord::new(0, 0));
        d.mark_meta(CellCoord::new(1, 0));
        assert_eq!(d.drain_meta().len(), 12);
        assert_eq!(d.take_vis().len(), 12);
    }

    #[test]
    fn take_vis_is_back_to_front() {
        let mut d = DirtyRegionTracker::new();
        for c in [(0, 0), (2, 1), (1, 1), (5, -3), (0, 1)] {
            d.mark_vis(c.into());
        }
        let got: Vec<(i32, i32)> = d.take_vis().into_iter().map(Into::into).collect();
        assert_eq!(got, vec![(0, 1), (1, 1), (2, 1), (0, 0), (5, -3)]);
    }

    #[test]
    fn band_marks_each_cell_once() {
        let mut d = DirtyRegionTracker::new();
        let band = Band { x: 0..2, y: 0..3 };
        assert_eq!(d.mark_band(&band), 6);
        assert_eq!(d.mark_band(&band), 0);
        assert_eq!(d.pending_vis(), 6);
    }

    #[test]
    fn reveal_matches_either_layer() {
        let mut d = DirtyRegionTracker::new();
        let made: HashSet<TileId> = [7].into_iter().collect();
        let cells = [
            (CellCoord::new(0, 0), TileIds { bottom: 7, top: 8 }),
            (CellCoord::new(1, 0), TileIds { bottom: 3, top: 7 }),
            (CellCoord::new(2, 0), TileIds { bottom: 3, top: 4 }),
        ];
        assert_eq!(d.mark_revealed(&made, cells), 2);
        assert_eq!(d.mark_revealed(&HashSet::new(), cells), 0);
    }
}
