use hashbrown::HashMap;
use tessel_props::{Dir, Neighborhood, VisualBits, resolve_visual};

use crate::coord::CellCoord;
use crate::meta::{CacheStats, MetaClassifier};

/// Per-cell visual decorations derived from each cell's 3x3 neighborhood.
#[derive(Default)]
pub struct VisualResolver {
    cache: HashMap<u64, VisualBits>,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl VisualResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sample(&mut self, meta: &mut MetaClassifier, c: CellCoord) -> VisualBits {
        let key = c.key();
        if let Some(bits) = self.cache.get(&key) {
            self.hits += 1;
            return *bits;
        }
        self.misses += 1;
        let bits = resolve_visual(&Self::neighborhood(meta, c));
        self.cache.insert(key, bits);
        bits
    }

    /// Samples the center and its eight neighbors, filling the meta cache.
    pub fn neighborhood(meta: &mut MetaClassifier, c: CellCoord) -> Neighborhood {
        let mut n = Neighborhood {
            center: meta.sample_meta(c),
            ..Neighborhood::default()
        };
        for dir in Dir::ALL {
            n.around[dir.index()] = meta.sample_meta(c.step(dir));
        }
        n
    }

    pub fn peek(&self, c: CellCoord) -> Option<VisualBits> {
        self.cache.get(&c.key()).copied()
    }

    pub fn invalidate(&mut self, c: CellCoord) -> bool {
        let removed = self.cache.remove(&c.key()).is_some();
        if removed {
            self.evictions += 1;
        }
        removed
    }

    pub fn retain(&mut self, mut keep: impl FnMut(CellCoord) -> bool) -> usize {
        let before = self.cache.len();
        self.cache.retain(|k, _| keep(CellCoord::from_key(*k)));
        let removed = before - self.cache.len();
        self.evictions += removed as u64;
        removed
    }

    pub fn clear(&mut self) {
        self.evictions += self.cache.len() as u64;
        self.cache.clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
            entries: self.cache.len(),
        }
    }
}
