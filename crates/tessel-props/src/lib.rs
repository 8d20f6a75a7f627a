//! Cell classification bitsets and the rules that relate them.
#![forbid(unsafe_code)]

pub mod dir;
pub mod meta;
pub mod neighborhood;
pub mod rules;
pub mod visual;

pub use dir::Dir;
pub use meta::{META_PROP_COUNT, MetaBits, MetaProp};
pub use neighborhood::{Neighborhood, resolve_visual};
pub use rules::{RuleKind, VALIDATION_RULES, ValidationRule, validate};
pub use visual::{VIS_BYTES, VIS_PROP_COUNT, VisProp, VisualBits};
