//! Incremental streaming of generated tiles into render buffers.
#![forbid(unsafe_code)]

mod buffer;
mod dirty;
mod streamer;
mod viewport;

pub use buffer::TileBuffer;
pub use dirty::{DirtyRegionTracker, sort_back_to_front};
pub use streamer::{StreamStats, TileStreamer};
pub use viewport::{Band, Viewport, wrap};

use tessel_atlas::AtlasError;

#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error("buffer holds {capacity} records, full viewport needs {required}")]
    BufferTooSmall { capacity: usize, required: usize },
    #[error(transparent)]
    Atlas(#[from] AtlasError),
}
