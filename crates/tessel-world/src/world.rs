use hashbrown::HashMap;
use tessel_atlas::{AtlasBuilder, AtlasError, TileId, TileIdResolver};
use tessel_props::{MetaBits, VisualBits};

use crate::config::GenParams;
use crate::coord::CellCoord;
use crate::meta::{CacheStats, MetaClassifier, PropFields};
use crate::visual::VisualResolver;

/// The two stacked atlas tiles drawn for one cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TileIds {
    pub bottom: TileId,
    pub top: TileId,
}

impl TileIds {
    #[inline]
    pub fn contains(&self, id: TileId) -> bool {
        self.bottom == id || self.top == id
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct WorldCacheStats {
    pub meta: CacheStats,
    pub visual: CacheStats,
    pub ids: CacheStats,
}

/// All cached state for one generated world.
pub struct TileWorld<A> {
    params: GenParams,
    meta: MetaClassifier,
    visual: VisualResolver,
    ids: HashMap<u64, TileIds>,
    id_hits: u64,
    id_misses: u64,
    id_evictions: u64,
    tiles: TileIdResolver<A>,
}

impl<A: AtlasBuilder> TileWorld<A> {
    pub fn new(params: GenParams, atlas: A) -> Self {
        let meta = MetaClassifier::from_params(&params);
        Self::from_parts(params, meta, atlas)
    }

    /// World over caller-supplied fields; other settings come from `params`.
    pub fn with_fields(params: GenParams, fields: PropFields, atlas: A) -> Self {
        let mut meta = MetaClassifier::new(fields);
        meta.set_debug_view(params.debug_view);
        Self::from_parts(params, meta, atlas)
    }

    fn from_parts(params: GenParams, meta: MetaClassifier, atlas: A) -> Self {
        Self {
            params,
            meta,
            visual: VisualResolver::new(),
            ids: HashMap::new(),
            id_hits: 0,
            id_misses: 0,
            id_evictions: 0,
            tiles: TileIdResolver::new(atlas),
        }
    }

    #[inline]
    pub fn params(&self) -> &GenParams {
        &self.params
    }

    pub fn sample_meta(&mut self, c: impl Into<CellCoord>) -> MetaBits {
        self.meta.sample_meta(c.into())
    }

    /// Meta bits ignoring the debug view.
    pub fn sample_meta_raw(&mut self, c: impl Into<CellCoord>) -> MetaBits {
        self.meta.sample_meta_raw(c.into())
    }

    pub fn sample_vis_props(&mut self, c: impl Into<CellCoord>) -> VisualBits {
        self.visual.sample(&mut self.meta, c.into())
    }

    /// Bottom and top tile ids for a cell, registering new patterns with the
    /// atlas as needed.
    pub fn sample_vis_ids(&mut self, c: impl Into<CellCoord>) -> Result<TileIds, AtlasError> {
        let c = c.into();
        if let Some(ids) = self.ids.get(&c.key()) {
            self.id_hits += 1;
            return Ok(*ids);
        }
        self.id_misses += 1;
        let bits = self.visual.sample(&mut self.meta, c);
        let ids = TileIds {
            bottom: self.tiles.get_tile_id(&bits)?,
            top: self.tiles.get_tile_id(&bits.top())?,
        };
        self.ids.insert(c.key(), ids);
        Ok(ids)
    }

    pub fn cached_ids(&self, c: CellCoord) -> Option<TileIds> {
        self.ids.get(&c.key()).copied()
    }

    pub fn write_meta(&mut self, c: impl Into<CellCoord>, bits: MetaBits) -> MetaBits {
        self.meta.write_meta(c.into(), bits)
    }

    pub fn clear_edit(&mut self, c: impl Into<CellCoord>) -> bool {
        self.meta.clear_edit(c.into())
    }

    /// Forgets the visual bits and tile ids of one cell.
    pub fn invalidate_visual(&mut self, c: CellCoord) {
        self.visual.invalidate(c);
        if self.ids.remove(&c.key()).is_some() {
            self.id_evictions += 1;
        }
    }

    /// Replaces generation parameters. Every cache is dropped; edits and
    /// registered tile ids are kept.
    pub fn reload(&mut self, params: GenParams) {
        log::info!(
            "reloading world params seed={} debug_view={}",
            params.seed,
            params.debug_view
        );
        self.meta
            .reset(PropFields::from_params(&params), params.debug_view);
        self.params = params;
        self.clear_derived();
    }

    pub fn set_debug_view(&mut self, on: bool) {
        if self.meta.debug_view() != on {
            self.meta.set_debug_view(on);
            self.params.debug_view = on;
            self.clear_derived();
        }
    }

    fn clear_derived(&mut self) {
        self.visual.clear();
        self.id_evictions += self.ids.len() as u64;
        self.ids.clear();
    }

    /// Drops cached cells outside `[min, max]` grown by `margin` on every
    /// side. Negative margins count as zero and the grown window stops at
    /// the edges of the `i32` plane. Returns the number of entries removed
    /// across all caches.
    pub fn prune_outside(&mut self, min: CellCoord, max: CellCoord, margin: i32) -> usize {
        let m = margin.max(0);
        let lo = CellCoord::new(min.x.saturating_sub(m), min.y.saturating_sub(m));
        let hi = CellCoord::new(max.x.saturating_add(m), max.y.saturating_add(m));
        let inside = |c: CellCoord| c.x >= lo.x && c.x <= hi.x && c.y >= lo.y && c.y <= hi.y;
        let mut removed = self.meta.retain(inside) + self.visual.retain(inside);
        let before = self.ids.len();
        self.ids.retain(|k, _| inside(CellCoord::from_key(*k)));
        let ids_removed = before - self.ids.len();
        self.id_evictions += ids_removed as u64;
        removed += ids_removed;
        removed
    }

    pub fn tiles(&self) -> &TileIdResolver<A> {
        &self.tiles
    }

    pub fn tiles_mut(&mut self) -> &mut TileIdResolver<A> {
        &mut self.tiles
    }

    pub fn meta(&self) -> &MetaClassifier {
        &self.meta
    }

    pub fn stats(&self) -> WorldCacheStats {
        WorldCacheStats {
            meta: self.meta.stats(),
            visual: self.visual.stats(),
            ids: CacheStats {
                hits: self.id_hits,
                misses: self.id_misses,
                evictions: self.id_evictions,
                entries: self.ids.len(),
            },
        }
    }
}
