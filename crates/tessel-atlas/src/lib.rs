//! Visual pattern to atlas tile id resolution.
#![forbid(unsafe_code)]

mod builder;
mod resolver;

pub use builder::PatternAtlas;
pub use resolver::TileIdResolver;

/// Handle into the tile atlas. `0` is reserved for "draw nothing".
pub type TileId = u32;

pub const EMPTY_TILE: TileId = 0;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AtlasError {
    #[error("tile atlas full: all {capacity} tiles are allocated")]
    CapacityExceeded { capacity: usize },
    #[error("atlas builder handed out reserved tile id {0}")]
    ReservedId(TileId),
}

/// Owner of atlas storage. Hands out ids for new byte patterns and later
/// reports which of those tiles have actually been materialized.
pub trait AtlasBuilder {
    /// Allocates a tile for a pattern seen for the first time. Ids are never
    /// reused for a different pattern.
    fn register(&mut self, pattern: &[u8]) -> Result<TileId, AtlasError>;

    /// Appends ids materialized since the previous call to `out`.
    fn take_made(&mut self, out: &mut Vec<TileId>);
}

impl<A: AtlasBuilder + ?Sized> AtlasBuilder for &mut A {
    fn register(&mut self, pattern: &[u8]) -> Result<TileId, AtlasError> {
        (**self).register(pattern)
    }

    fn take_made(&mut self, out: &mut Vec<TileId>) {
        (**self).take_made(out)
    }
}
