use std::cell::Cell;

use super::NoiseSource;

/// Sum of several sources, evaluated in insertion order.
#[derive(Default)]
pub struct NoiseSum {
    layers: Vec<Box<dyn NoiseSource>>,
}

impl NoiseSum {
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    pub fn push(&mut self, layer: impl NoiseSource + 'static) {
        self.layers.push(Box::new(layer));
    }

    pub fn with(mut self, layer: impl NoiseSource + 'static) -> Self {
        self.push(layer);
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl NoiseSource for NoiseSum {
    fn value(&self, x: f64, y: f64) -> f32 {
        self.layers.iter().map(|l| l.value(x, y)).sum()
    }
}

/// Boolean view of a source: `value(x, y) > threshold`.
pub struct Threshold<N> {
    source: N,
    threshold: f32,
}

impl<N: NoiseSource> Threshold<N> {
    pub fn new(source: N, threshold: f32) -> Self {
        Self { source, threshold }
    }

    #[inline]
    pub fn test(&self, x: f64, y: f64) -> bool {
        self.source.value(x, y) > self.threshold
    }

    #[inline]
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn source(&self) -> &N {
        &self.source
    }
}

impl<N: NoiseSource> NoiseSource for Threshold<N> {
    #[inline]
    fn value(&self, x: f64, y: f64) -> f32 {
        self.source.value(x, y)
    }
}

/// Adapts a closure into a [`NoiseSource`].
pub struct FnNoise<F>(pub F);

impl<F: Fn(f64, f64) -> f32> NoiseSource for FnNoise<F> {
    #[inline]
    fn value(&self, x: f64, y: f64) -> f32 {
        (self.0)(x, y)
    }
}

/// Counts evaluations of the wrapped source.
pub struct CountingNoise<N> {
    inner: N,
    calls: Cell<u64>,
}

impl<N: NoiseSource> CountingNoise<N> {
    pub fn new(inner: N) -> Self {
        Self {
            inner,
            calls: Cell::new(0),
        }
    }

    #[inline]
    pub fn calls(&self) -> u64 {
        self.calls.get()
    }

    pub fn reset(&self) {
        self.calls.set(0);
    }
}

impl<N: NoiseSource> NoiseSource for CountingNoise<N> {
    #[inline]
    fn value(&self, x: f64, y: f64) -> f32 {
        self.calls.set(self.calls.get() + 1);
        self.inner.value(x, y)
    }
}
