use proptest::prelude::*;
use tessel_props::{Dir, MetaBits, MetaProp, Neighborhood, VisProp, resolve_visual, validate};

fn raw_bits() -> impl Strategy<Value = MetaBits> {
    any::<u32>().prop_map(MetaBits::from_raw)
}

fn valid_bits() -> impl Strategy<Value = MetaBits> {
    raw_bits().prop_map(validate)
}

fn neighborhood() -> impl Strategy<Value = Neighborhood> {
    (valid_bits(), proptest::array::uniform8(valid_bits()))
        .prop_map(|(center, around)| Neighborhood { center, around })
}

// (corner, flank a, flank b) triples for every conjunctive category.
const CORNER_LAWS: &[(VisProp, VisProp, VisProp)] = &[
    (VisProp::GrassNE, VisProp::GrassN, VisProp::GrassE),
    (VisProp::GrassSE, VisProp::GrassS, VisProp::GrassE),
    (VisProp::GrassSW, VisProp::GrassS, VisProp::GrassW),
    (VisProp::GrassNW, VisProp::GrassN, VisProp::GrassW),
    (VisProp::BushNE, VisProp::BushN, VisProp::BushE),
    (VisProp::BushSW, VisProp::BushS, VisProp::BushW),
    (VisProp::RockyGroundSE, VisProp::RockyGroundS, VisProp::RockyGroundE),
    (VisProp::RockyGroundNW, VisProp::RockyGroundN, VisProp::RockyGroundW),
    (VisProp::RocksNE, VisProp::RocksN, VisProp::RocksE),
    (VisProp::RocksSW, VisProp::RocksS, VisProp::RocksW),
    (VisProp::RockCrumbsNW, VisProp::RockCrumbsN, VisProp::RockCrumbsW),
    (VisProp::RockCrumbsSE, VisProp::RockCrumbsS, VisProp::RockCrumbsE),
];

proptest! {
    #[test]
    fn validated_bits_hold_invariants(raw in raw_bits()) {
        use MetaProp::*;
        let b = validate(raw);
        prop_assert!(!(b.has(Floor) && b.has(Grass)));
        prop_assert!(!(b.has(Beam) && !b.has(Floor)));
        prop_assert!(!(b.has(Bush) && !b.has(Grass)));
        prop_assert!(!(b.has(TreePine) && b.has(TreeMaple)));
        if b.has(Rocks) {
            let rest = b.without_all(&[Rocks, GoldOreForRocks, Harvested]);
            prop_assert!(rest.is_empty(), "rocks cell kept {:?}", rest);
        }
        // Validation never invents a property.
        prop_assert_eq!(b.raw() & !raw.raw(), 0);
    }

    #[test]
    fn corner_bits_imply_their_edges(n in neighborhood()) {
        let out = resolve_visual(&n);
        for (corner, a, b) in CORNER_LAWS {
            if out.has(*corner) {
                prop_assert!(out.has(*a) && out.has(*b), "{:?} without {:?}/{:?}", corner, a, b);
            }
        }
    }

    #[test]
    fn edge_bits_follow_neighbors(n in neighborhood()) {
        let out = resolve_visual(&n);
        for (i, dir) in Dir::EDGES.into_iter().enumerate() {
            let nb = n.at(dir);
            prop_assert_eq!(out.has(VisProp::GRASS_EDGES[i]), nb.has(MetaProp::Grass));
            prop_assert_eq!(out.has(VisProp::BUSH_EDGES[i]), nb.has(MetaProp::Bush));
            let rock = nb.has(MetaProp::Rocks);
            let harvested = nb.has(MetaProp::Harvested);
            prop_assert_eq!(out.has(VisProp::ROCKS_EDGES[i]), rock && !harvested);
            prop_assert_eq!(out.has(VisProp::CRUMBS_EDGES[i]), rock && harvested);
        }
    }

    #[test]
    fn resolution_is_a_pure_function(n in neighborhood()) {
        prop_assert_eq!(resolve_visual(&n), resolve_visual(&n));
    }
}
