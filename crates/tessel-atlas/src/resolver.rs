use hashbrown::{HashMap, HashSet};
use tessel_props::VisualBits;

use super::{AtlasBuilder, AtlasError, EMPTY_TILE, TileId};

/// Remembers the tile id of every visual pattern seen so far and which of
/// those ids the builder has materialized.
pub struct TileIdResolver<A> {
    atlas: A,
    ids: HashMap<VisualBits, TileId>,
    made: HashSet<TileId>,
    fresh: Vec<TileId>,
}

impl<A: AtlasBuilder> TileIdResolver<A> {
    pub fn new(atlas: A) -> Self {
        Self {
            atlas,
            ids: HashMap::new(),
            made: HashSet::new(),
            fresh: Vec::new(),
        }
    }

    pub fn atlas(&self) -> &A {
        &self.atlas
    }

    pub fn atlas_mut(&mut self) -> &mut A {
        &mut self.atlas
    }

    /// Id for `pattern`, registering it with the builder on first sight.
    pub fn get_tile_id(&mut self, pattern: &VisualBits) -> Result<TileId, AtlasError> {
        if let Some(id) = self.ids.get(pattern) {
            return Ok(*id);
        }
        let id = self.atlas.register(pattern.as_bytes())?;
        if id == EMPTY_TILE {
            return Err(AtlasError::ReservedId(id));
        }
        debug_assert!(
            !self.ids.values().any(|v| *v == id),
            "atlas reused tile id {id}"
        );
        log::trace!(target: "atlas", "registered tile {} bits={:?}", id, pattern);
        self.ids.insert(*pattern, id);
        Ok(id)
    }

    #[inline]
    pub fn is_made(&self, id: TileId) -> bool {
        self.made.contains(&id)
    }

    /// The id to draw for `id` right now: itself once made, otherwise
    /// [`EMPTY_TILE`].
    #[inline]
    pub fn drawable(&self, id: TileId) -> TileId {
        if self.is_made(id) { id } else { EMPTY_TILE }
    }

    /// Pulls newly materialized ids from the builder. The returned batch is
    /// empty when nothing changed since the last call.
    pub fn collect_made(&mut self) -> &[TileId] {
        self.fresh.clear();
        self.atlas.take_made(&mut self.fresh);
        let made = &mut self.made;
        self.fresh.retain(|id| made.insert(*id));
        &self.fresh
    }

    /// Number of distinct patterns registered.
    #[inline]
    pub fn known(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub fn made_count(&self) -> usize {
        self.made.len()
    }
}
