//! Ordered meta-bit validation.
//!
//! Raw classification samples every property independently, so a cell can
//! come out as e.g. both floor and grass. [`validate`] folds the cell through
//! [`VALIDATION_RULES`] in order. Rules only ever clear bits, so a constraint
//! established by an earlier rule holds after every later one.

use super::meta::{MetaBits, MetaProp};

use MetaProp::*;

#[derive(Copy, Clone, Debug)]
pub enum RuleKind {
    /// When `winner` is set, clear every prop in `losers`.
    Excludes {
        winner: MetaProp,
        losers: &'static [MetaProp],
    },
    /// Clear `prop` when `requires` is absent.
    Requires { prop: MetaProp, requires: MetaProp },
    /// Clear `prop` when none of `any` is present.
    RequiresAny {
        prop: MetaProp,
        any: &'static [MetaProp],
    },
    /// Clear `prop` when any of `by` is present.
    ExcludedBy {
        prop: MetaProp,
        by: &'static [MetaProp],
    },
    /// When `prop` is set, reset the cell to `prop` plus whichever of `keep`
    /// were already set.
    Isolate {
        prop: MetaProp,
        keep: &'static [MetaProp],
    },
}

#[derive(Copy, Clone, Debug)]
pub struct ValidationRule {
    pub name: &'static str,
    pub kind: RuleKind,
}

impl ValidationRule {
    pub fn applies(&self, bits: MetaBits) -> bool {
        match self.kind {
            RuleKind::Excludes { winner, losers } => bits.has(winner) && bits.any_of(losers),
            RuleKind::Requires { prop, requires } => bits.has(prop) && !bits.has(requires),
            RuleKind::RequiresAny { prop, any } => bits.has(prop) && !bits.any_of(any),
            RuleKind::ExcludedBy { prop, by } => bits.has(prop) && bits.any_of(by),
            RuleKind::Isolate { prop, .. } => bits.has(prop),
        }
    }

    pub fn apply(&self, bits: MetaBits) -> MetaBits {
        if !self.applies(bits) {
            return bits;
        }
        match self.kind {
            RuleKind::Excludes { losers, .. } => bits.without_all(losers),
            RuleKind::Requires { prop, .. }
            | RuleKind::RequiresAny { prop, .. }
            | RuleKind::ExcludedBy { prop, .. } => bits.without(prop),
            RuleKind::Isolate { prop, keep } => keep
                .iter()
                .fold(MetaBits::EMPTY.with(prop), |out, k| out.set(*k, bits.has(*k))),
        }
    }
}

pub static VALIDATION_RULES: &[ValidationRule] = &[
    ValidationRule {
        name: "floor_excludes_grass",
        kind: RuleKind::Excludes {
            winner: Floor,
            losers: &[Grass],
        },
    },
    ValidationRule {
        name: "pyramid_clears_structures",
        kind: RuleKind::Excludes {
            winner: Pyramid,
            losers: &[Floor, Beam, Bricks, LampPost, GoldPile, TestObject],
        },
    },
    ValidationRule {
        name: "rocky_ground_clears_cover",
        kind: RuleKind::Excludes {
            winner: RockyGround,
            losers: &[Grass, Floor, Pyramid, LampPost, Bush],
        },
    },
    ValidationRule {
        name: "lamp_post_clears_clutter",
        kind: RuleKind::Excludes {
            winner: LampPost,
            losers: &[Beam, Bricks, Bush, GoldPile, TestObject],
        },
    },
    ValidationRule {
        name: "beam_needs_floor",
        kind: RuleKind::Requires {
            prop: Beam,
            requires: Floor,
        },
    },
    ValidationRule {
        name: "bricks_need_floor",
        kind: RuleKind::Requires {
            prop: Bricks,
            requires: Floor,
        },
    },
    ValidationRule {
        name: "bush_needs_grass",
        kind: RuleKind::Requires {
            prop: Bush,
            requires: Grass,
        },
    },
    ValidationRule {
        name: "rocks_isolate",
        kind: RuleKind::Isolate {
            prop: Rocks,
            keep: &[GoldOreForRocks, Harvested],
        },
    },
    ValidationRule {
        name: "gold_ore_needs_rocks",
        kind: RuleKind::Requires {
            prop: GoldOreForRocks,
            requires: Rocks,
        },
    },
    ValidationRule {
        name: "pine_blocked_by_objects",
        kind: RuleKind::ExcludedBy {
            prop: TreePine,
            by: &[Bush, GoldPile, TestObject],
        },
    },
    ValidationRule {
        name: "maple_blocked_by_objects",
        kind: RuleKind::ExcludedBy {
            prop: TreeMaple,
            by: &[Bush, GoldPile, TestObject],
        },
    },
    ValidationRule {
        name: "pine_needs_grass",
        kind: RuleKind::Requires {
            prop: TreePine,
            requires: Grass,
        },
    },
    ValidationRule {
        name: "maple_needs_grass",
        kind: RuleKind::Requires {
            prop: TreeMaple,
            requires: Grass,
        },
    },
    ValidationRule {
        name: "pine_over_maple",
        kind: RuleKind::Excludes {
            winner: TreePine,
            losers: &[TreeMaple],
        },
    },
    ValidationRule {
        name: "harvested_needs_harvestable",
        kind: RuleKind::RequiresAny {
            prop: Harvested,
            any: &[Rocks, TreePine, TreeMaple],
        },
    },
];

/// Runs every rule in order over `raw` and returns the resolved cell.
pub fn validate(raw: MetaBits) -> MetaBits {
    VALIDATION_RULES.iter().fold(raw, |bits, rule| rule.apply(bits))
}
