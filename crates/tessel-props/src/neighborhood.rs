use super::dir::Dir;
use super::meta::{MetaBits, MetaProp};
use super::visual::{VisProp, VisualBits};

/// A cell's own meta bits plus those of its eight neighbors.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Neighborhood {
    pub center: MetaBits,
    pub around: [MetaBits; 8],
}

impl Neighborhood {
    /// Every cell, center included, set to `bits`.
    pub fn uniform(bits: MetaBits) -> Self {
        Self {
            center: bits,
            around: [bits; 8],
        }
    }

    #[inline]
    pub fn at(&self, dir: Dir) -> MetaBits {
        self.around[dir.index()]
    }

    pub fn with_neighbor(mut self, dir: Dir, bits: MetaBits) -> Self {
        self.around[dir.index()] = bits;
        self
    }
}

// A 9-patch category: center bit plus edge and corner bits. `has` decides
// membership per cell.
struct Patch {
    center: Option<VisProp>,
    edges: [VisProp; 4],
    corners: [VisProp; 4],
}

impl Patch {
    fn apply(&self, n: &Neighborhood, out: VisualBits, has: impl Fn(MetaBits) -> bool) -> VisualBits {
        let mut out = out;
        if let Some(c) = self.center {
            out = out.set(c, has(n.center));
        }
        for (i, dir) in Dir::EDGES.into_iter().enumerate() {
            out = out.set(self.edges[i], has(n.at(dir)));
        }
        for (i, dir) in Dir::CORNERS.into_iter().enumerate() {
            let (a, b) = dir.flanks();
            let on = has(n.at(a)) && has(n.at(b)) && has(n.at(dir));
            out = out.set(self.corners[i], on);
        }
        out
    }
}

const GRASS: Patch = Patch {
    center: Some(VisProp::GrassC),
    edges: VisProp::GRASS_EDGES,
    corners: VisProp::GRASS_CORNERS,
};
const BUSH: Patch = Patch {
    center: Some(VisProp::BushC),
    edges: VisProp::BUSH_EDGES,
    corners: VisProp::BUSH_CORNERS,
};
const ROCKY_GROUND: Patch = Patch {
    center: Some(VisProp::RockyGroundC),
    edges: VisProp::ROCKY_GROUND_EDGES,
    corners: VisProp::ROCKY_GROUND_CORNERS,
};
const ROCKS: Patch = Patch {
    center: Some(VisProp::RocksC),
    edges: VisProp::ROCKS_EDGES,
    corners: VisProp::ROCKS_CORNERS,
};
const CRUMBS: Patch = Patch {
    center: Some(VisProp::RockCrumbsC),
    edges: VisProp::CRUMBS_EDGES,
    corners: VisProp::CRUMBS_CORNERS,
};

#[inline]
fn solid_rock(b: MetaBits) -> bool {
    b.has(MetaProp::Rocks) && !b.has(MetaProp::Harvested)
}

#[inline]
fn crumbled_rock(b: MetaBits) -> bool {
    b.has(MetaProp::Rocks) && b.has(MetaProp::Harvested)
}

#[inline]
fn any_tree(b: MetaBits) -> bool {
    b.any_of(&[MetaProp::TreePine, MetaProp::TreeMaple])
}

/// Derives a cell's visual decorations from its neighborhood.
pub fn resolve_visual(n: &Neighborhood) -> VisualBits {
    let c = n.center;
    let mut out = VisualBits::EMPTY;

    out = out.set(VisProp::FloorC, c.has(MetaProp::Floor));
    out = GRASS.apply(n, out, |b| b.has(MetaProp::Grass));
    out = BUSH.apply(n, out, |b| b.has(MetaProp::Bush));
    out = ROCKY_GROUND.apply(n, out, |b| b.has(MetaProp::RockyGround));

    out = beams(n, out);
    out = bricks(n, out);

    out = ROCKS.apply(n, out, solid_rock);
    out = CRUMBS.apply(n, out, crumbled_rock);
    out = out.set(
        VisProp::GoldOreC,
        solid_rock(c) && c.has(MetaProp::GoldOreForRocks),
    );
    out = out.set(
        VisProp::RocksBig,
        solid_rock(c) && Dir::EDGES.iter().all(|d| solid_rock(n.at(*d))),
    );

    out = out.set(VisProp::GoldPileC, c.has(MetaProp::GoldPile));
    out = out.set(VisProp::LampPostC, c.has(MetaProp::LampPost));
    out = out.set(VisProp::PyramidC, c.has(MetaProp::Pyramid));
    out = out.set(VisProp::TestObjectC, c.has(MetaProp::TestObject));

    trees(n, out)
}

fn beams(n: &Neighborhood, out: VisualBits) -> VisualBits {
    if !n.center.has(MetaProp::Beam) {
        return out;
    }
    let mut out = out.with(VisProp::BeamC);
    let mut linked = false;
    for (i, dir) in Dir::EDGES.into_iter().enumerate() {
        if n.at(dir).has(MetaProp::Beam) {
            out = out.with(VisProp::BEAM_EDGES[i]);
            linked = true;
        }
    }
    if !linked {
        out = out.with(VisProp::BeamPost);
    }
    out
}

fn bricks(n: &Neighborhood, out: VisualBits) -> VisualBits {
    if !n.center.has(MetaProp::Bricks) {
        return out;
    }
    let wall = |d: Dir| n.at(d).has(MetaProp::Bricks);
    let mut out = out;
    for (i, dir) in Dir::EDGES.into_iter().enumerate() {
        out = out.set(VisProp::BRICK_FACES[i], !wall(dir));
    }
    for (i, dir) in Dir::CORNERS.into_iter().enumerate() {
        let (a, b) = dir.flanks();
        out = out.set(VisProp::BRICK_OUTER_CORNERS[i], !wall(a) && !wall(b));
        out = out.set(
            VisProp::BRICK_INNER_CORNERS[i],
            wall(a) && wall(b) && !wall(dir),
        );
    }
    out
}

fn trees(n: &Neighborhood, out: VisualBits) -> VisualBits {
    let c = n.center;
    let (young, mature, stump) = if c.has(MetaProp::TreePine) {
        (
            VisProp::TreePineC,
            VisProp::TreePineMatureC,
            VisProp::TreePineStumpC,
        )
    } else if c.has(MetaProp::TreeMaple) {
        (
            VisProp::TreeMapleC,
            VisProp::TreeMapleMatureC,
            VisProp::TreeMapleStumpC,
        )
    } else {
        return out;
    };
    if c.has(MetaProp::Harvested) {
        return out.with(stump);
    }
    let crowded = Dir::EDGES.iter().any(|d| any_tree(n.at(*d)));
    out.with(if crowded { young } else { mature })
}

#[cfg(test)]
mod tests {
    use super::*;
    use MetaProp::*;

    #[test]
    fn floor_field_has_only_floor_center() {
        let out = resolve_visual(&Neighborhood::uniform(MetaBits::of(&[Floor])));
        assert_eq!(out, VisualBits::EMPTY.with(VisProp::FloorC));
    }

    #[test]
    fn lone_grass_cell_gets_center_only() {
        let n = Neighborhood {
            center: MetaBits::of(&[Grass]),
            around: [MetaBits::EMPTY; 8],
        };
        assert_eq!(resolve_visual(&n), VisualBits::EMPTY.with(VisProp::GrassC));
    }

    #[test]
    fn diagonal_grass_alone_draws_nothing() {
        let n = Neighborhood::default().with_neighbor(Dir::NE, MetaBits::of(&[Grass]));
        assert!(resolve_visual(&n).is_empty());
    }

    #[test]
    fn grass_corner_needs_both_edges_and_diagonal() {
        let g = MetaBits::of(&[Grass]);
        let base = Neighborhood::default()
            .with_neighbor(Dir::N, g)
            .with_neighbor(Dir::E, g);
        let without_diag = resolve_visual(&base);
        assert!(without_diag.has(VisProp::GrassN));
        assert!(without_diag.has(VisProp::GrassE));
        assert!(!without_diag.has(VisProp::GrassNE));

        let with_diag = resolve_visual(&base.with_neighbor(Dir::NE, g));
        assert!(with_diag.has(VisProp::GrassNE));
        assert!(!with_diag.has(VisProp::GrassNW));
    }

    #[test]
    fn isolated_beam_is_a_post() {
        let n = Neighborhood {
            center: MetaBits::of(&[Floor, Beam]),
            around: [MetaBits::of(&[Floor]); 8],
        };
        let out = resolve_visual(&n);
        assert!(out.has(VisProp::BeamC));
        assert!(out.has(VisProp::BeamPost));
        assert!(!out.any_of(&VisProp::BEAM_EDGES));

        let linked = resolve_visual(&n.with_neighbor(Dir::W, MetaBits::of(&[Floor, Beam])));
        assert!(linked.has(VisProp::BeamW));
        assert!(!linked.has(VisProp::BeamPost));
    }

    #[test]
    fn beam_neighbors_do_not_decorate_plain_cells() {
        let n = Neighborhood::uniform(MetaBits::of(&[Floor, Beam]))
            .with_neighbor(Dir::N, MetaBits::of(&[Floor, Beam]));
        let n = Neighborhood {
            center: MetaBits::of(&[Floor]),
            ..n
        };
        assert!(!resolve_visual(&n).any_of(&VisProp::BEAM_EDGES));
    }

    #[test]
    fn lone_brick_shows_all_faces_and_outer_corners() {
        let n = Neighborhood {
            center: MetaBits::of(&[Floor, Bricks]),
            around: [MetaBits::of(&[Floor]); 8],
        };
        let out = resolve_visual(&n);
        for p in VisProp::BRICK_FACES.iter().chain(&VisProp::BRICK_OUTER_CORNERS) {
            assert!(out.has(*p), "{p:?}");
        }
        assert!(!out.any_of(&VisProp::BRICK_INNER_CORNERS));
    }

    #[test]
    fn brick_inner_corner_when_diagonal_open() {
        let wall = MetaBits::of(&[Floor, Bricks]);
        let n = Neighborhood::uniform(wall).with_neighbor(Dir::SW, MetaBits::of(&[Floor]));
        let out = resolve_visual(&n);
        assert!(!out.any_of(&VisProp::BRICK_FACES));
        assert!(!out.any_of(&VisProp::BRICK_OUTER_CORNERS));
        assert!(out.has(VisProp::Bricks10));
        assert!(!out.has(VisProp::Bricks8));
    }

    #[test]
    fn harvested_rock_neighbor_draws_crumbs() {
        let center = MetaBits::of(&[Rocks, GoldOreForRocks]);
        let n = Neighborhood {
            center,
            around: [MetaBits::EMPTY; 8],
        }
        .with_neighbor(Dir::N, MetaBits::of(&[Rocks, Harvested]));
        let out = resolve_visual(&n);
        assert!(out.has(VisProp::RocksC));
        assert!(out.has(VisProp::GoldOreC));
        assert!(out.has(VisProp::RockCrumbsN));
        assert!(!out.has(VisProp::RocksN));
        assert!(!out.has(VisProp::RocksBig));

        let solid = resolve_visual(&n.with_neighbor(Dir::N, MetaBits::of(&[Rocks])));
        assert!(solid.has(VisProp::RocksN));
        assert!(!solid.has(VisProp::RockCrumbsN));
    }

    #[test]
    fn big_rock_needs_four_solid_edges() {
        let rock = MetaBits::of(&[Rocks]);
        let n = Neighborhood {
            center: rock,
            around: [MetaBits::EMPTY; 8],
        }
        .with_neighbor(Dir::N, rock)
        .with_neighbor(Dir::E, rock)
        .with_neighbor(Dir::S, rock)
        .with_neighbor(Dir::W, rock);
        assert!(resolve_visual(&n).has(VisProp::RocksBig));
        let one_harvested = n.with_neighbor(Dir::W, MetaBits::of(&[Rocks, Harvested]));
        assert!(!resolve_visual(&one_harvested).has(VisProp::RocksBig));
        let center_harvested = Neighborhood {
            center: MetaBits::of(&[Rocks, Harvested]),
            ..n
        };
        let out = resolve_visual(&center_harvested);
        assert!(!out.has(VisProp::RocksBig));
        assert!(out.has(VisProp::RockCrumbsC));
        assert!(!out.has(VisProp::RocksC));
    }

    #[test]
    fn tree_maturity_and_stumps() {
        let grass = MetaBits::of(&[Grass]);
        let maple = MetaBits::of(&[Grass, TreeMaple]);
        let alone = Neighborhood {
            center: maple,
            around: [grass; 8],
        };
        assert!(resolve_visual(&alone).has(VisProp::TreeMapleMatureC));

        let crowded = alone.with_neighbor(Dir::S, MetaBits::of(&[Grass, TreePine]));
        let out = resolve_visual(&crowded);
        assert!(out.has(VisProp::TreeMapleC));
        assert!(!out.has(VisProp::TreeMapleMatureC));

        let stump = Neighborhood {
            center: MetaBits::of(&[Grass, TreePine, Harvested]),
            ..alone
        };
        let out = resolve_visual(&stump);
        assert!(out.has(VisProp::TreePineStumpC));
        assert!(!out.has(VisProp::TreePineC));
    }

    #[test]
    fn resolver_never_sets_layer_bit() {
        let all = MetaBits::from_raw(u32::MAX);
        assert!(!resolve_visual(&Neighborhood::uniform(all)).has(VisProp::Layer2));
    }
}
