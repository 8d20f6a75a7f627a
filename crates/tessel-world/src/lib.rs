//! Cell classification, neighborhood resolution, and the caches behind them.
#![forbid(unsafe_code)]

pub mod config;
mod coord;
pub mod meta;
pub mod visual;
mod world;

pub use config::{GenParams, load_params_from_path, load_params_from_str};
pub use coord::CellCoord;
pub use meta::{CacheStats, MetaClassifier, PropField, PropFields};
pub use visual::VisualResolver;
pub use world::{TileIds, TileWorld, WorldCacheStats};
