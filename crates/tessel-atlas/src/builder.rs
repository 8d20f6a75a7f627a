use std::collections::VecDeque;

use hashbrown::HashMap;

use super::{AtlasBuilder, AtlasError, TileId};

/// In-memory atlas builder with a fixed tile budget.
///
/// Registration assigns ids immediately; tiles become "made" only when
/// [`PatternAtlas::bake`] processes them, the way a renderer would draw a
/// few new atlas tiles per frame.
#[derive(Debug, Clone)]
pub struct PatternAtlas {
    capacity: usize,
    tiles_per_row: u32,
    patterns: Vec<Box<[u8]>>,
    by_pattern: HashMap<Box<[u8]>, TileId>,
    pending: VecDeque<TileId>,
    made: Vec<TileId>,
}

impl PatternAtlas {
    pub fn new(capacity: usize, tiles_per_row: u32) -> Self {
        Self {
            capacity,
            tiles_per_row: tiles_per_row.max(1),
            patterns: Vec::new(),
            by_pattern: HashMap::new(),
            pending: VecDeque::new(),
            made: Vec::new(),
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of allocated tiles.
    #[inline]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    #[inline]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn pattern(&self, id: TileId) -> Option<&[u8]> {
        let idx = (id as usize).checked_sub(1)?;
        self.patterns.get(idx).map(|p| &p[..])
    }

    /// Grid cell `(column, row)` of a tile in the atlas texture. Slot 0 is
    /// the empty tile.
    pub fn slot(&self, id: TileId) -> (u32, u32) {
        (id % self.tiles_per_row, id / self.tiles_per_row)
    }

    /// Materializes up to `budget` pending tiles. Returns how many were made.
    pub fn bake(&mut self, budget: usize) -> usize {
        let n = budget.min(self.pending.len());
        self.made.extend(self.pending.drain(..n));
        if n > 0 {
            log::trace!(target: "atlas", "baked {} tiles, {} pending", n, self.pending.len());
        }
        n
    }
}

impl AtlasBuilder for PatternAtlas {
    fn register(&mut self, pattern: &[u8]) -> Result<TileId, AtlasError> {
        if let Some(id) = self.by_pattern.get(pattern) {
            return Ok(*id);
        }
        if self.patterns.len() >= self.capacity {
            return Err(AtlasError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        let boxed: Box<[u8]> = pattern.into();
        self.patterns.push(boxed.clone());
        let id = self.patterns.len() as TileId;
        self.by_pattern.insert(boxed, id);
        self.pending.push_back(id);
        Ok(id)
    }

    fn take_made(&mut self, out: &mut Vec<TileId>) {
        out.append(&mut self.made);
    }
}
