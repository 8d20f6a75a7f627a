//! Deterministic 2D noise sources and threshold helpers.
#![forbid(unsafe_code)]

mod compose;
mod field;

use std::rc::Rc;

pub use compose::{CountingNoise, FnNoise, NoiseSum, Threshold};
pub use field::{NoiseField, NoiseKind};

/// A pure 2D scalar field.
///
/// Coordinates are `f64` so every `i32` cell maps to a distinct sample
/// point.
///
/// Implementations must return the same value for the same `(x, y)` for as
/// long as their construction parameters are unchanged.
pub trait NoiseSource {
    fn value(&self, x: f64, y: f64) -> f32;
}

impl<N: NoiseSource + ?Sized> NoiseSource for Box<N> {
    #[inline]
    fn value(&self, x: f64, y: f64) -> f32 {
        (**self).value(x, y)
    }
}

impl<N: NoiseSource + ?Sized> NoiseSource for &N {
    #[inline]
    fn value(&self, x: f64, y: f64) -> f32 {
        (**self).value(x, y)
    }
}

impl<N: NoiseSource + ?Sized> NoiseSource for Rc<N> {
    #[inline]
    fn value(&self, x: f64, y: f64) -> f32 {
        (**self).value(x, y)
    }
}
