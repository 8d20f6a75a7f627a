use serde::Deserialize;
use std::collections::BTreeMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use tessel_noise::NoiseKind;
use tessel_props::{META_PROP_COUNT, MetaProp};

#[derive(Clone, Debug, Deserialize)]
pub struct TesselConfig {
    #[serde(default = "default_seed")]
    pub seed: i32,
    #[serde(default)]
    pub debug_view: bool,
    #[serde(default)]
    pub viewport: Viewport,
    #[serde(default)]
    pub buffers: Buffers,
    #[serde(default)]
    pub atlas: Atlas,
    #[serde(default)]
    pub cache: Cache,
    /// Per-property overrides keyed by property name (`grass`, `tree_pine`, ...).
    #[serde(default)]
    pub fields: BTreeMap<String, FieldConfig>,
}

impl Default for TesselConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            debug_view: false,
            viewport: Viewport::default(),
            buffers: Buffers::default(),
            atlas: Atlas::default(),
            cache: Cache::default(),
            fields: BTreeMap::new(),
        }
    }
}

fn default_seed() -> i32 {
    1
}

#[derive(Clone, Debug, Deserialize)]
pub struct Viewport {
    #[serde(default = "default_view_w")]
    pub width: u32,
    #[serde(default = "default_view_h")]
    pub height: u32,
}
fn default_view_w() -> u32 {
    48
}
fn default_view_h() -> u32 {
    24
}
impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: default_view_w(),
            height: default_view_h(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Buffers {
    /// Records per buffer. Zero means "size from the viewport".
    #[serde(default)]
    pub capacity: usize,
}
impl Default for Buffers {
    fn default() -> Self {
        Self { capacity: 0 }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Atlas {
    #[serde(default = "default_atlas_capacity")]
    pub capacity: usize,
    #[serde(default = "default_tiles_per_row")]
    pub tiles_per_row: u32,
    #[serde(default = "default_bake_per_frame")]
    pub bake_per_frame: usize,
}
fn default_atlas_capacity() -> usize {
    4096
}
fn default_tiles_per_row() -> u32 {
    64
}
fn default_bake_per_frame() -> usize {
    32
}
impl Default for Atlas {
    fn default() -> Self {
        Self {
            capacity: default_atlas_capacity(),
            tiles_per_row: default_tiles_per_row(),
            bake_per_frame: default_bake_per_frame(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Cache {
    #[serde(default = "default_soft_limit")]
    pub soft_limit: usize,
    #[serde(default = "default_margin")]
    pub margin: i32,
}
fn default_soft_limit() -> usize {
    1 << 16
}
fn default_margin() -> i32 {
    8
}
impl Default for Cache {
    fn default() -> Self {
        Self {
            soft_limit: default_soft_limit(),
            margin: default_margin(),
        }
    }
}

/// Overrides for one property's noise field. Unset keys keep the built-in
/// default for that property.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct FieldConfig {
    pub noise: Option<NoiseKind>,
    pub frequency: Option<f32>,
    pub scale: Option<f32>,
    pub offset: Option<[f32; 2]>,
    pub strength: Option<f32>,
    pub octaves: Option<i32>,
    pub threshold: Option<f32>,
    pub salt: Option<i32>,
    /// Extra fields summed on top of the base one.
    #[serde(default)]
    pub layers: Vec<LayerConfig>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct LayerConfig {
    #[serde(default)]
    pub noise: NoiseKind,
    #[serde(default = "default_layer_freq")]
    pub frequency: f32,
    #[serde(default = "d_one")]
    pub scale: f32,
    #[serde(default)]
    pub offset: [f32; 2],
    #[serde(default = "default_layer_strength")]
    pub strength: f32,
    #[serde(default = "d_one_i")]
    pub octaves: i32,
}
fn default_layer_freq() -> f32 {
    0.25
}
fn default_layer_strength() -> f32 {
    0.25
}
fn d_one() -> f32 {
    1.0
}
fn d_one_i() -> i32 {
    1
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown property `{0}` in [fields]")]
    UnknownProperty(String),
    #[error("viewport must be at least 1x1, got {width}x{height}")]
    EmptyViewport { width: u32, height: u32 },
    #[error("cache margin must not be negative, got {0}")]
    NegativeMargin(i32),
}

// Flattened params used by the classifier and streamer (snapshot of config)
#[derive(Clone, Debug, PartialEq)]
pub struct GenParams {
    pub seed: i32,
    pub debug_view: bool,
    pub view_width: u32,
    pub view_height: u32,
    pub buffer_capacity: usize,
    pub atlas_capacity: usize,
    pub tiles_per_row: u32,
    pub bake_per_frame: usize,
    pub cache_soft_limit: usize,
    pub cache_margin: i32,
    pub fields: Vec<FieldParams>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldParams {
    pub kind: NoiseKind,
    pub frequency: f32,
    pub scale: f32,
    pub offset: (f32, f32),
    pub strength: f32,
    pub octaves: i32,
    pub threshold: f32,
    pub salt: i32,
    pub layers: Vec<LayerParams>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LayerParams {
    pub kind: NoiseKind,
    pub frequency: f32,
    pub scale: f32,
    pub offset: (f32, f32),
    pub strength: f32,
    pub octaves: i32,
}

impl FieldParams {
    /// Built-in field for a property: frequency and threshold tuned so rare
    /// objects stay rare.
    pub fn builtin(prop: MetaProp) -> Self {
        use MetaProp::*;
        let (frequency, threshold, octaves) = match prop {
            Floor => (0.035, 0.35, 2),
            Beam => (0.2, 0.1, 1),
            Bricks => (0.12, 0.2, 1),
            Grass => (0.02, -0.15, 3),
            Bush => (0.15, 0.45, 1),
            GoldPile => (0.5, 0.8, 1),
            LampPost => (0.6, 0.85, 1),
            TestObject => (0.7, 0.95, 1),
            Pyramid => (0.05, 0.7, 1),
            RockyGround => (0.03, 0.45, 2),
            Rocks => (0.08, 0.4, 2),
            GoldOreForRocks => (0.3, 0.5, 1),
            Harvested => (0.4, 0.9, 1),
            TreePine => (0.4, 0.55, 1),
            TreeMaple => (0.35, 0.55, 1),
        };
        Self {
            kind: NoiseKind::OpenSimplex2,
            frequency,
            scale: 1.0,
            offset: (0.0, 0.0),
            strength: 1.0,
            octaves,
            threshold,
            salt: (prop.index() as i32 + 1).wrapping_mul(1_013_904_223),
            layers: Vec::new(),
        }
    }

    fn apply(&mut self, cfg: &FieldConfig) {
        if let Some(v) = cfg.noise {
            self.kind = v;
        }
        if let Some(v) = cfg.frequency {
            self.frequency = v;
        }
        if let Some(v) = cfg.scale {
            self.scale = v;
        }
        if let Some([ox, oy]) = cfg.offset {
            self.offset = (ox, oy);
        }
        if let Some(v) = cfg.strength {
            self.strength = v;
        }
        if let Some(v) = cfg.octaves {
            self.octaves = v;
        }
        if let Some(v) = cfg.threshold {
            self.threshold = v;
        }
        if let Some(v) = cfg.salt {
            self.salt = v;
        }
        self.layers = cfg
            .layers
            .iter()
            .map(|l| LayerParams {
                kind: l.noise,
                frequency: l.frequency,
                scale: l.scale,
                offset: (l.offset[0], l.offset[1]),
                strength: l.strength,
                octaves: l.octaves,
            })
            .collect();
    }
}

impl GenParams {
    pub fn from_config(cfg: &TesselConfig) -> Result<Self, ConfigError> {
        let (w, h) = (cfg.viewport.width, cfg.viewport.height);
        if w == 0 || h == 0 {
            return Err(ConfigError::EmptyViewport {
                width: w,
                height: h,
            });
        }
        if cfg.cache.margin < 0 {
            return Err(ConfigError::NegativeMargin(cfg.cache.margin));
        }
        let mut fields: Vec<FieldParams> =
            MetaProp::ALL.iter().map(|p| FieldParams::builtin(*p)).collect();
        for (name, field) in &cfg.fields {
            let prop = MetaProp::from_name(name)
                .ok_or_else(|| ConfigError::UnknownProperty(name.clone()))?;
            fields[prop.index()].apply(field);
        }
        debug_assert_eq!(fields.len(), META_PROP_COUNT);
        Ok(Self {
            seed: cfg.seed,
            debug_view: cfg.debug_view,
            view_width: w,
            view_height: h,
            buffer_capacity: cfg.buffers.capacity,
            atlas_capacity: cfg.atlas.capacity,
            tiles_per_row: cfg.atlas.tiles_per_row,
            bake_per_frame: cfg.atlas.bake_per_frame,
            cache_soft_limit: cfg.cache.soft_limit,
            cache_margin: cfg.cache.margin,
            fields,
        })
    }

    pub fn field(&self, prop: MetaProp) -> &FieldParams {
        &self.fields[prop.index()]
    }

    /// Records each buffer must hold: the configured capacity, or enough
    /// for a full viewport restream with headroom for incremental updates.
    pub fn buffer_records(&self) -> usize {
        let full = 3 * self.view_width as usize * self.view_height as usize;
        if self.buffer_capacity == 0 {
            full * 2
        } else {
            self.buffer_capacity
        }
    }
}

impl Default for GenParams {
    fn default() -> Self {
        match Self::from_config(&TesselConfig::default()) {
            Ok(p) => p,
            Err(e) => unreachable!("default config is valid: {e}"),
        }
    }
}

pub fn load_params_from_str(s: &str) -> Result<GenParams, Box<dyn Error>> {
    let cfg: TesselConfig = toml::from_str(s)?;
    Ok(GenParams::from_config(&cfg)?)
}

pub fn load_params_from_path(path: &Path) -> Result<GenParams, Box<dyn Error>> {
    let s = fs::read_to_string(path)?;
    load_params_from_str(&s)
}
