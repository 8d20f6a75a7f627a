use tessel_atlas::TileId;

/// Fixed-capacity record sink: one `xy` position and one tile id per record.
#[derive(Clone, Debug)]
pub struct TileBuffer {
    capacity: usize,
    positions: Vec<f32>,
    ids: Vec<TileId>,
}

impl TileBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            positions: Vec::with_capacity(capacity * 2),
            ids: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Active record count.
    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.capacity - self.ids.len()
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn ids(&self) -> &[TileId] {
        &self.ids
    }

    pub fn record(&self, i: usize) -> Option<(f32, f32, TileId)> {
        let id = *self.ids.get(i)?;
        Some((self.positions[2 * i], self.positions[2 * i + 1], id))
    }

    /// Appends a record; false when the buffer is full.
    pub fn push(&mut self, x: f32, y: f32, id: TileId) -> bool {
        if self.ids.len() >= self.capacity {
            return false;
        }
        self.positions.push(x);
        self.positions.push(y);
        self.ids.push(id);
        true
    }

    pub fn reset(&mut self) {
        self.positions.clear();
        self.ids.clear();
    }
}
