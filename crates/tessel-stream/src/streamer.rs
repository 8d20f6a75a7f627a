use std::time::Instant;

use hashbrown::HashSet;
use tessel_atlas::{AtlasBuilder, TileId};
use tessel_props::MetaBits;
use tessel_world::{CellCoord, GenParams, TileWorld};

use crate::StreamError;
use crate::buffer::TileBuffer;
use crate::dirty::{DirtyRegionTracker, sort_back_to_front};
use crate::viewport::Viewport;

/// Cumulative counters, reported by the preview per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamStats {
    pub frames: u64,
    pub cells: u64,
    pub records: u64,
    pub full_restreams: u64,
    pub revealed: u64,
    pub prunes: u64,
}

/// Owns a world and keeps two tile buffers in sync with a scrolling
/// viewport over it.
pub struct TileStreamer<A> {
    world: TileWorld<A>,
    dirty: DirtyRegionTracker,
    view: Viewport,
    // Window the buffers currently hold; None forces a full restream.
    streamed: Option<Viewport>,
    stats: StreamStats,
}

impl<A: AtlasBuilder> TileStreamer<A> {
    pub fn new(params: GenParams, atlas: A) -> Self {
        Self::from_world(TileWorld::new(params, atlas))
    }

    pub fn from_world(world: TileWorld<A>) -> Self {
        let p = world.params();
        let view = Viewport::new(p.view_width, p.view_height);
        Self {
            world,
            dirty: DirtyRegionTracker::new(),
            view,
            streamed: None,
            stats: StreamStats::default(),
        }
    }

    pub fn world(&self) -> &TileWorld<A> {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut TileWorld<A> {
        &mut self.world
    }

    pub fn viewport(&self) -> Viewport {
        self.view
    }

    pub fn stats(&self) -> StreamStats {
        self.stats
    }

    pub fn tracker(&self) -> &DirtyRegionTracker {
        &self.dirty
    }

    /// Buffers sized for this streamer's viewport.
    pub fn make_buffers(&self) -> (TileBuffer, TileBuffer) {
        let n = self.world.params().buffer_records();
        (TileBuffer::new(n), TileBuffer::new(n))
    }

    pub fn offset(&self) -> (i32, i32) {
        (self.view.x, self.view.y)
    }

    pub fn set_offset_x(&mut self, x: i32) {
        self.view.x = x;
    }

    pub fn set_offset_y(&mut self, y: i32) {
        self.view.y = y;
    }

    pub fn set_offset(&mut self, x: i32, y: i32) {
        self.view = self.view.at(x, y);
    }

    pub fn scroll_by(&mut self, dx: i32, dy: i32) {
        self.set_offset(self.view.x.wrapping_add(dx), self.view.y.wrapping_add(dy));
    }

    /// Stores an edit and schedules its neighborhood for restreaming.
    /// Returns the validated bits.
    pub fn write_meta(&mut self, x: i32, y: i32, bits: MetaBits) -> MetaBits {
        let c = CellCoord::new(x, y);
        let out = self.world.write_meta(c, bits);
        self.dirty.mark_meta(c);
        out
    }

    /// Read-modify-write of one cell's stored meta bits. `f` sees the
    /// unmasked value even while the debug view is on.
    pub fn edit_meta(&mut self, x: i32, y: i32, f: impl FnOnce(MetaBits) -> MetaBits) -> MetaBits {
        let cur = self.world.sample_meta_raw((x, y));
        self.write_meta(x, y, f(cur))
    }

    /// Drops any edit at the cell so it is reclassified from noise.
    pub fn invalidate_meta(&mut self, x: i32, y: i32) {
        let c = CellCoord::new(x, y);
        self.world.clear_edit(c);
        self.dirty.mark_meta(c);
    }

    /// New generation parameters. Caches are dropped and the next
    /// `update_vis` restreams the whole viewport; tile ids survive.
    pub fn reload(&mut self, params: GenParams) {
        let view = Viewport::new(params.view_width, params.view_height).at(self.view.x, self.view.y);
        self.world.reload(params);
        self.view = view;
        self.dirty.clear();
        self.streamed = None;
    }

    pub fn set_debug_view(&mut self, on: bool) {
        if self.world.meta().debug_view() != on {
            self.world.set_debug_view(on);
            self.streamed = None;
        }
    }

    /// Expands pending meta invalidations into visual ones. Returns whether
    /// there was anything to do.
    pub fn update_meta(&mut self) -> bool {
        let cells = self.dirty.drain_meta();
        for c in &cells {
            self.world.invalidate_visual(*c);
        }
        if !cells.is_empty() {
            log::trace!(target: "stream", "update_meta cells={}", cells.len());
        }
        !cells.is_empty()
    }

    /// Writes records for every dirty cell into the buffers. Returns false
    /// when nothing changed. After an error the buffers are in an unknown
    /// state, so the next call restreams the whole viewport.
    pub fn update_vis(
        &mut self,
        bottom: &mut TileBuffer,
        top: &mut TileBuffer,
    ) -> Result<bool, StreamError> {
        let out = self.stream_frame(bottom, top);
        if let Err(e) = &out {
            log::warn!(target: "stream", "update_vis failed, next frame restreams: {e}");
            self.streamed = None;
        }
        out
    }

    fn stream_frame(
        &mut self,
        bottom: &mut TileBuffer,
        top: &mut TileBuffer,
    ) -> Result<bool, StreamError> {
        let t0 = Instant::now();
        if self.dirty.has_pending_meta() {
            log::warn!(target: "stream", "update_vis before update_meta; draining meta first");
            self.update_meta();
        }
        let mut full = self.resolve_offset();
        self.reveal_made();

        let mut cells = self.dirty.take_vis();
        cells.retain(|c| self.view.contains(*c));
        if !full && cells.is_empty() {
            return Ok(false);
        }
        self.stats.frames += 1;

        let needed = 3 * cells.len();
        if !full && (bottom.remaining() < needed || top.remaining() < needed) {
            log::debug!(
                target: "stream",
                "buffer full ({} + {}), restreaming viewport",
                bottom.len(),
                needed
            );
            full = true;
        }
        if full {
            let required = 3 * self.view.area();
            let capacity = bottom.capacity().min(top.capacity());
            if capacity < required {
                return Err(StreamError::BufferTooSmall { capacity, required });
            }
            bottom.reset();
            top.reset();
            cells = self.view.cells().collect();
            sort_back_to_front(&mut cells);
            self.stats.full_restreams += 1;
        }

        let before = bottom.len();
        for c in &cells {
            self.write_cell(*c, bottom, top)?;
        }
        let written = bottom.len() - before;
        self.stats.cells += cells.len() as u64;
        self.stats.records += written as u64;
        log::debug!(
            target: "stream",
            "ms={} update_vis cells={} records={} full={} len={}",
            t0.elapsed().as_millis(),
            cells.len(),
            written,
            full,
            bottom.len()
        );
        Ok(true)
    }

    // Marks the cells that entered the window since the last stream.
    // Returns true when the whole viewport must be rewritten.
    fn resolve_offset(&mut self) -> bool {
        let Some(prev) = self.streamed else {
            self.streamed = Some(self.view);
            return true;
        };
        if prev == self.view {
            return false;
        }
        let bands = self.view.entered_since(&prev);
        let mut n = 0;
        for band in &bands {
            n += self.dirty.mark_band(band);
        }
        log::trace!(
            target: "stream",
            "offset ({}, {}) -> ({}, {}) bands={} cells={}",
            prev.x,
            prev.y,
            self.view.x,
            self.view.y,
            bands.len(),
            n
        );
        self.streamed = Some(self.view);
        self.maybe_prune();
        false
    }

    fn maybe_prune(&mut self) {
        let p = self.world.params();
        let (limit, margin) = (p.cache_soft_limit, p.cache_margin);
        if self.world.stats().meta.entries <= limit {
            return;
        }
        let removed = self
            .world
            .prune_outside(self.view.min(), self.view.max(), margin);
        self.stats.prunes += 1;
        log::debug!(target: "stream", "pruned {} cache entries (limit {})", removed, limit);
    }

    // Cells already streamed with not-yet-made ids get rewritten once their
    // tiles exist.
    fn reveal_made(&mut self) {
        let fresh: HashSet<TileId> = self.world.tiles_mut().collect_made().iter().copied().collect();
        if fresh.is_empty() {
            return;
        }
        let world = &self.world;
        let cached = self
            .view
            .cells()
            .filter_map(|c| world.cached_ids(c).map(|ids| (c, ids)));
        let n = self.dirty.mark_revealed(&fresh, cached);
        self.stats.revealed += n as u64;
        log::trace!(target: "stream", "made={} revealed={}", fresh.len(), n);
    }

    // Three vertically stacked records per cell, back to front.
    fn write_cell(
        &mut self,
        c: CellCoord,
        bottom: &mut TileBuffer,
        top: &mut TileBuffer,
    ) -> Result<(), StreamError> {
        for dy in [1, 0, -1] {
            let s = c.offset(0, dy);
            if !self.view.contains(s) {
                continue;
            }
            let ids = self.world.sample_vis_ids(s)?;
            let tiles = self.world.tiles();
            if bottom.remaining() == 0 || top.remaining() == 0 {
                return Err(StreamError::BufferTooSmall {
                    capacity: bottom.capacity().min(top.capacity()),
                    required: 3 * self.view.area(),
                });
            }
            let (px, py) = self.view.wrap(s);
            bottom.push(px, py, tiles.drawable(ids.bottom));
            top.push(px, py, tiles.drawable(ids.top));
        }
        Ok(())
    }
}
