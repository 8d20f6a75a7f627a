use std::ops::Range;

use tessel_world::CellCoord;

/// Wraps `v` into `[lo, lo + extent)`.
#[inline]
pub fn wrap(v: i32, lo: i32, extent: u32) -> i32 {
    let e = i64::from(extent.max(1));
    let off = (i64::from(v) - i64::from(lo)).rem_euclid(e);
    (i64::from(lo) + off) as i32
}

/// Half-open rectangle of cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Band {
    pub x: Range<i32>,
    pub y: Range<i32>,
}

impl Band {
    pub fn len(&self) -> usize {
        self.x.len() * self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty() || self.y.is_empty()
    }

    pub fn cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.y
            .clone()
            .flat_map(move |y| self.x.clone().map(move |x| CellCoord::new(x, y)))
    }
}

/// The window of the grid currently mapped onto the render buffers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub fn at(self, x: i32, y: i32) -> Self {
        Self { x, y, ..self }
    }

    #[inline]
    fn x_end(&self) -> i32 {
        self.x.saturating_add(self.width as i32)
    }

    #[inline]
    fn y_end(&self) -> i32 {
        self.y.saturating_add(self.height as i32)
    }

    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Lowest cell inside the window.
    pub fn min(&self) -> CellCoord {
        CellCoord::new(self.x, self.y)
    }

    /// Highest cell inside the window (inclusive).
    pub fn max(&self) -> CellCoord {
        CellCoord::new(self.x_end() - 1, self.y_end() - 1)
    }

    #[inline]
    pub fn contains(&self, c: CellCoord) -> bool {
        c.x >= self.x && c.x < self.x_end() && c.y >= self.y && c.y < self.y_end()
    }

    pub fn band(&self) -> Band {
        Band {
            x: self.x..self.x_end(),
            y: self.y..self.y_end(),
        }
    }

    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let b = self.band();
        b.y.flat_map(move |y| (self.x..self.x_end()).map(move |x| CellCoord::new(x, y)))
    }

    /// Buffer-local position of a cell.
    #[inline]
    pub fn wrap(&self, c: CellCoord) -> (f32, f32) {
        (
            wrap(c.x, 0, self.width) as f32,
            wrap(c.y, 0, self.height) as f32,
        )
    }

    /// Cells of `self` that `prev` did not cover, as at most two disjoint
    /// bands: the entered columns over the full height, then the entered
    /// rows over the remaining columns. A move of a full extent or more on
    /// either axis, or a change of size, yields the whole window.
    pub fn entered_since(&self, prev: &Viewport) -> Vec<Band> {
        if self.width != prev.width || self.height != prev.height {
            return vec![self.band()];
        }
        let dx = i64::from(self.x) - i64::from(prev.x);
        let dy = i64::from(self.y) - i64::from(prev.y);
        if dx.unsigned_abs() >= u64::from(self.width) || dy.unsigned_abs() >= u64::from(self.height)
        {
            return vec![self.band()];
        }
        let mut out = Vec::with_capacity(2);
        // Columns shared with the previous window.
        let mut kept_x = self.x..self.x_end();
        if dx > 0 {
            out.push(Band {
                x: prev.x_end()..self.x_end(),
                y: self.y..self.y_end(),
            });
            kept_x = self.x..prev.x_end();
        } else if dx < 0 {
            out.push(Band {
                x: self.x..prev.x,
                y: self.y..self.y_end(),
            });
            kept_x = prev.x..self.x_end();
        }
        if dy > 0 {
            out.push(Band {
                x: kept_x,
                y: prev.y_end()..self.y_end(),
            });
        } else if dy < 0 {
            out.push(Band {
                x: kept_x,
                y: self.y..prev.y,
            });
        }
        out.retain(|b| !b.is_empty());
        out
    }
}
