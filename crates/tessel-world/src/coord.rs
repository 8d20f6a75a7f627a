use tessel_props::Dir;

/// Integer cell position in the unbounded grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCoord {
    pub x: i32,
    pub y: i32,
}

impl CellCoord {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Packs both components into one cache key. Bijective over all `i32`
    /// pairs.
    #[inline]
    pub const fn key(self) -> u64 {
        ((self.x as u32 as u64) << 32) | (self.y as u32 as u64)
    }

    #[inline]
    pub const fn from_key(key: u64) -> Self {
        Self {
            x: (key >> 32) as u32 as i32,
            y: key as u32 as i32,
        }
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.wrapping_add(dx),
            y: self.y.wrapping_add(dy),
        }
    }

    #[inline]
    pub fn step(self, dir: Dir) -> Self {
        let (dx, dy) = dir.offset();
        self.offset(dx, dy)
    }

    /// The 3x3 block centered on this cell, row by row from the south-west.
    pub fn block3x3(self) -> impl Iterator<Item = CellCoord> {
        (-1..=1).flat_map(move |dy| (-1..=1).map(move |dx| self.offset(dx, dy)))
    }
}

impl From<(i32, i32)> for CellCoord {
    fn from(value: (i32, i32)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl From<CellCoord> for (i32, i32) {
    fn from(value: CellCoord) -> Self {
        (value.x, value.y)
    }
}
