use hashbrown::HashMap;
use tessel_noise::{NoiseField, NoiseSource, NoiseSum, Threshold};
use tessel_props::{META_PROP_COUNT, MetaBits, MetaProp, validate};

use crate::config::{FieldParams, GenParams};
use crate::coord::CellCoord;

/// Properties kept when the debug view is on.
pub const DEBUG_VIEW_MASK: MetaBits =
    MetaBits::from_raw(MetaProp::Floor.bit() | MetaProp::Grass.bit() | MetaProp::Rocks.bit());

pub type PropField = Threshold<Box<dyn NoiseSource>>;

/// One thresholded noise field per [`MetaProp`], indexed by bit position.
pub struct PropFields {
    fields: Vec<PropField>,
}

impl PropFields {
    pub fn from_params(params: &GenParams) -> Self {
        Self::from_fn(|prop| {
            let f = params.field(prop);
            (build_source(params.seed, f), f.threshold)
        })
    }

    /// Builds every field from `make(prop) -> (source, threshold)`.
    pub fn from_fn(mut make: impl FnMut(MetaProp) -> (Box<dyn NoiseSource>, f32)) -> Self {
        let fields = MetaProp::ALL
            .iter()
            .map(|p| {
                let (source, threshold) = make(*p);
                Threshold::new(source, threshold)
            })
            .collect();
        Self { fields }
    }

    #[inline]
    pub fn get(&self, prop: MetaProp) -> &PropField {
        &self.fields[prop.index()]
    }

    /// Raw, unvalidated classification of one cell.
    pub fn sample_raw(&self, c: CellCoord) -> MetaBits {
        let (x, y) = (f64::from(c.x), f64::from(c.y));
        self.fields
            .iter()
            .zip(MetaProp::ALL)
            .fold(MetaBits::EMPTY, |bits, (field, prop)| {
                bits.set(prop, field.test(x, y))
            })
    }
}

fn build_source(seed: i32, f: &FieldParams) -> Box<dyn NoiseSource> {
    let base_seed = seed.wrapping_add(f.salt);
    let base = NoiseField::new(base_seed, f.kind, f.frequency)
        .with_scale(f.scale)
        .with_offset(f.offset.0, f.offset.1)
        .with_strength(f.strength)
        .with_octaves(f.octaves);
    if f.layers.is_empty() {
        return Box::new(base);
    }
    let mut sum = NoiseSum::new().with(base);
    for (i, l) in f.layers.iter().enumerate() {
        let layer_seed = base_seed ^ ((i as i32 + 1).wrapping_mul(0x2545_F491));
        sum.push(
            NoiseField::new(layer_seed, l.kind, l.frequency)
                .with_scale(l.scale)
                .with_offset(l.offset.0, l.offset.1)
                .with_strength(l.strength)
                .with_octaves(l.octaves),
        );
    }
    Box::new(sum)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub entries: usize,
}

/// Per-cell meta classification with a lazily filled cache.
///
/// A cached value is never re-validated; it changes only through
/// [`MetaClassifier::write_meta`] or by being evicted and recomputed.
pub struct MetaClassifier {
    fields: PropFields,
    cache: HashMap<u64, MetaBits>,
    // Explicit edits override noise and survive eviction.
    edits: HashMap<u64, MetaBits>,
    debug_view: bool,
    validations: u64,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl MetaClassifier {
    pub fn new(fields: PropFields) -> Self {
        Self {
            fields,
            cache: HashMap::new(),
            edits: HashMap::new(),
            debug_view: false,
            validations: 0,
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    pub fn from_params(params: &GenParams) -> Self {
        let mut out = Self::new(PropFields::from_params(params));
        out.debug_view = params.debug_view;
        out
    }

    /// Classification as seen by rendering: the debug view masks it.
    pub fn sample_meta(&mut self, c: CellCoord) -> MetaBits {
        let bits = self.sample_meta_raw(c);
        if self.debug_view {
            bits.masked(DEBUG_VIEW_MASK)
        } else {
            bits
        }
    }

    /// Stored classification, unaffected by the debug view. Use this for
    /// read-modify-write edits.
    pub fn sample_meta_raw(&mut self, c: CellCoord) -> MetaBits {
        let key = c.key();
        match self.cache.get(&key) {
            Some(bits) => {
                self.hits += 1;
                *bits
            }
            None => {
                self.misses += 1;
                let bits = match self.edits.get(&key) {
                    Some(edit) => *edit,
                    None => {
                        self.validations += 1;
                        validate(self.fields.sample_raw(c))
                    }
                };
                self.cache.insert(key, bits);
                bits
            }
        }
    }

    /// Cached value without computing anything.
    pub fn peek(&self, c: CellCoord) -> Option<MetaBits> {
        self.cache.get(&c.key()).copied()
    }

    /// Stores an explicit edit. The value is validated first; the validated
    /// bits are returned.
    pub fn write_meta(&mut self, c: CellCoord, bits: MetaBits) -> MetaBits {
        let bits = validate(bits);
        self.validations += 1;
        self.edits.insert(c.key(), bits);
        self.cache.insert(c.key(), bits);
        bits
    }

    /// Drops an edit and the cached value so the cell is reclassified from
    /// noise. Returns whether anything was removed.
    pub fn clear_edit(&mut self, c: CellCoord) -> bool {
        let had_edit = self.edits.remove(&c.key()).is_some();
        let had_cache = self.cache.remove(&c.key()).is_some();
        had_edit || had_cache
    }

    pub fn is_edited(&self, c: CellCoord) -> bool {
        self.edits.contains_key(&c.key())
    }

    /// Evicts cached cells rejected by `keep`. Edits are untouched.
    pub fn retain(&mut self, mut keep: impl FnMut(CellCoord) -> bool) -> usize {
        let before = self.cache.len();
        self.cache.retain(|k, _| keep(CellCoord::from_key(*k)));
        let removed = before - self.cache.len();
        self.evictions += removed as u64;
        removed
    }

    /// Swaps in new fields and drops every cached value. Edits are kept.
    pub fn reset(&mut self, fields: PropFields, debug_view: bool) {
        self.evictions += self.cache.len() as u64;
        self.cache.clear();
        self.fields = fields;
        self.debug_view = debug_view;
    }

    #[inline]
    pub fn debug_view(&self) -> bool {
        self.debug_view
    }

    pub fn set_debug_view(&mut self, on: bool) {
        self.debug_view = on;
    }

    /// Number of times the rule table has run.
    #[inline]
    pub fn validations(&self) -> u64 {
        self.validations
    }

    pub fn fields(&self) -> &PropFields {
        &self.fields
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

const _: () = assert!(META_PROP_COUNT <= 32);
