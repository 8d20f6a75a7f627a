use std::rc::Rc;

use tessel_atlas::PatternAtlas;
use tessel_noise::{CountingNoise, FnNoise, NoiseSource};
use tessel_props::{MetaBits, MetaProp, VisProp};
use tessel_world::{CellCoord, GenParams, PropFields, TileWorld};

fn atlas() -> PatternAtlas {
    PatternAtlas::new(256, 16)
}

// Fields where prop `p` fires wherever `fires(p, x, y)` is true.
fn fields_by(fires: fn(MetaProp, i32, i32) -> bool) -> PropFields {
    PropFields::from_fn(move |p| {
        let source: Box<dyn NoiseSource> = Box::new(FnNoise(move |x: f64, y: f64| -> f32 {
            if fires(p, x as i32, y as i32) { 1.0 } else { -1.0 }
        }));
        (source, 0.0)
    })
}

#[test]
fn same_seed_same_classification() {
    let params = GenParams::default();
    let mut a = TileWorld::new(params.clone(), atlas());
    let mut b = TileWorld::new(params, atlas());
    for y in -20..20 {
        for x in -20..20 {
            assert_eq!(a.sample_meta((x, y)), b.sample_meta((x, y)));
        }
    }
}

#[test]
fn default_world_is_not_empty() {
    let mut w = TileWorld::new(GenParams::default(), atlas());
    let mut seen = MetaBits::EMPTY;
    for y in 0..96 {
        for x in 0..96 {
            seen = MetaBits::from_raw(seen.raw() | w.sample_meta((x, y)).raw());
        }
    }
    assert!(seen.has(MetaProp::Grass), "{seen:?}");
}

#[test]
fn second_sample_is_a_pure_cache_read() {
    let counters: Vec<Rc<CountingNoise<FnNoise<fn(f64, f64) -> f32>>>> = MetaProp::ALL
        .iter()
        .map(|_| Rc::new(CountingNoise::new(FnNoise((|x, _| x as f32) as fn(f64, f64) -> f32))))
        .collect();
    let fields = PropFields::from_fn(|p| {
        let source: Box<dyn NoiseSource> = Box::new(Rc::clone(&counters[p.index()]));
        (source, 0.0)
    });
    let mut w = TileWorld::with_fields(GenParams::default(), fields, atlas());
    let total = || counters.iter().map(|p| p.calls()).sum::<u64>();

    let first = w.sample_meta((7, -3));
    assert_eq!(total(), MetaProp::ALL.len() as u64);
    assert_eq!(w.meta().validations(), 1);

    let second = w.sample_meta((7, -3));
    assert_eq!(first, second);
    assert_eq!(total(), MetaProp::ALL.len() as u64);
    assert_eq!(w.meta().validations(), 1);
}

#[test]
fn floor_only_cell_resolves_to_floor_tile() {
    let mut w = TileWorld::with_fields(
        GenParams::default(),
        fields_by(|p, _, _| p == MetaProp::Floor),
        atlas(),
    );
    assert_eq!(w.sample_meta((0, 0)), MetaBits::of(&[MetaProp::Floor]));
    let vis = w.sample_vis_props((0, 0));
    assert!(vis.has(VisProp::FloorC));
    assert!(!vis.any_of(&[VisProp::GrassC, VisProp::BushC, VisProp::BeamC]));
    assert!(!vis.any_of(&VisProp::GRASS_EDGES));
    assert!(!vis.any_of(&VisProp::BUSH_EDGES));
    assert!(!vis.any_of(&VisProp::BEAM_EDGES));
    assert!(!vis.any_of(&VisProp::BRICK_FACES));
    assert_eq!(vis.count(), 1);
}

#[test]
fn rock_with_ore_next_to_harvested_rock() {
    let mut w = TileWorld::with_fields(
        GenParams::default(),
        fields_by(|p, x, y| match (p, x, y) {
            (MetaProp::Rocks, 0, 0) | (MetaProp::Rocks, 0, 1) => true,
            (MetaProp::GoldOreForRocks, 0, 0) => true,
            (MetaProp::Grass, 0, 0) => true,
            (MetaProp::Harvested, 0, 1) => true,
            _ => false,
        }),
        atlas(),
    );
    let center = w.sample_meta((0, 0));
    assert_eq!(
        center,
        MetaBits::of(&[MetaProp::Rocks, MetaProp::GoldOreForRocks])
    );
    let vis = w.sample_vis_props((0, 0));
    assert!(vis.has(VisProp::RockCrumbsN));
    assert!(!vis.has(VisProp::RocksN));
    assert!(vis.has(VisProp::GoldOreC));

    // Un-harvest the neighbor: the center now shows a solid rock edge.
    w.write_meta((0, 1), MetaBits::of(&[MetaProp::Rocks]));
    w.invalidate_visual(CellCoord::new(0, 0));
    let vis = w.sample_vis_props((0, 0));
    assert!(vis.has(VisProp::RocksN));
    assert!(!vis.has(VisProp::RockCrumbsN));
}

#[test]
fn visual_sampling_fills_neighbor_meta() {
    let mut w = TileWorld::with_fields(GenParams::default(), fields_by(|_, _, _| false), atlas());
    w.sample_vis_props((10, 10));
    for c in CellCoord::new(10, 10).block3x3() {
        assert_eq!(w.meta().peek(c), Some(MetaBits::EMPTY));
    }
    assert_eq!(w.stats().meta.entries, 9);
}

#[test]
fn ids_are_cached_and_stacked() {
    let mut w = TileWorld::with_fields(
        GenParams::default(),
        fields_by(|p, x, _| p == MetaProp::Grass && x >= 0),
        atlas(),
    );
    let a = w.sample_vis_ids((5, 0)).unwrap();
    assert_ne!(a.bottom, a.top);
    assert_eq!(w.sample_vis_ids((5, 0)).unwrap(), a);
    // Same neighborhood, same pattern, same ids.
    assert_eq!(w.sample_vis_ids((6, 3)).unwrap(), a);
    // Border cell differs.
    let edge = w.sample_vis_ids((0, 0)).unwrap();
    assert_ne!(edge.bottom, a.bottom);
    assert_eq!(w.cached_ids(CellCoord::new(0, 0)), Some(edge));
    assert_eq!(w.tiles().known(), 4);
}

#[test]
fn atlas_exhaustion_surfaces_as_error() {
    let mut w = TileWorld::with_fields(
        GenParams::default(),
        fields_by(|_, _, _| false),
        PatternAtlas::new(1, 4),
    );
    assert!(w.sample_vis_ids((0, 0)).is_err());
}

#[test]
fn prune_keeps_edits_and_nearby_cells() {
    let mut w = TileWorld::with_fields(GenParams::default(), fields_by(|_, _, _| false), atlas());
    let far = CellCoord::new(500, 500);
    w.write_meta(far, MetaBits::of(&[MetaProp::Grass]));
    for x in 0..4 {
        w.sample_vis_ids((x, 0)).unwrap();
    }
    let removed = w.prune_outside(CellCoord::new(0, 0), CellCoord::new(1, 0), 0);
    assert!(removed > 0);
    assert!(w.meta().peek(far).is_none());
    assert_eq!(w.sample_meta(far), MetaBits::of(&[MetaProp::Grass]));
    assert!(w.cached_ids(CellCoord::new(1, 0)).is_some());
    assert!(w.cached_ids(CellCoord::new(3, 0)).is_none());
}

#[test]
fn prune_margin_saturates_at_plane_edges() {
    let mut w = TileWorld::with_fields(GenParams::default(), fields_by(|_, _, _| false), atlas());
    let edge = CellCoord::new(i32::MAX, i32::MIN);
    w.sample_vis_ids(edge).unwrap();
    w.sample_vis_ids((0, 0)).unwrap();

    // A negative margin prunes like zero instead of shrinking the window.
    w.prune_outside(CellCoord::new(0, 0), CellCoord::new(0, 0), i32::MIN);
    assert!(w.cached_ids(CellCoord::new(0, 0)).is_some());
    assert!(w.cached_ids(edge).is_none());

    w.sample_vis_ids(edge).unwrap();
    let near = CellCoord::new(i32::MAX - 1, i32::MIN + 1);
    w.prune_outside(near, near, 8);
    assert!(w.cached_ids(edge).is_some());
    assert!(w.cached_ids(CellCoord::new(0, 0)).is_none());
}

#[test]
fn reload_drops_caches_but_keeps_ids() {
    let mut w = TileWorld::new(GenParams::default(), atlas());
    w.sample_vis_ids((2, 2)).unwrap();
    let known = w.tiles().known();
    let mut params = GenParams::default();
    params.seed = 99;
    w.reload(params);
    assert_eq!(w.stats().meta.entries, 0);
    assert!(w.cached_ids(CellCoord::new(2, 2)).is_none());
    assert!(w.tiles().known() >= known);
    assert_eq!(w.params().seed, 99);
}

#[test]
fn debug_view_toggle_rederives_visuals() {
    let mut w = TileWorld::with_fields(
        GenParams::default(),
        fields_by(|p, _, _| matches!(p, MetaProp::Floor | MetaProp::Beam)),
        atlas(),
    );
    assert!(w.sample_vis_props((0, 0)).has(VisProp::BeamC));
    w.set_debug_view(true);
    assert!(!w.sample_vis_props((0, 0)).has(VisProp::BeamC));
    assert!(w.sample_vis_props((0, 0)).has(VisProp::FloorC));
}

#[test]
fn cells_past_f32_precision_stay_distinct() {
    // 2^24 + 1 has no exact f32 representation.
    const EDGE: f64 = 16_777_216.0;
    let fields = PropFields::from_fn(|p| {
        let on = p == MetaProp::Floor;
        let source: Box<dyn NoiseSource> = Box::new(FnNoise(move |x: f64, _: f64| -> f32 {
            if on && x > EDGE { 1.0 } else { -1.0 }
        }));
        (source, 0.0)
    });
    let mut w = TileWorld::with_fields(GenParams::default(), fields, atlas());
    assert!(w.sample_meta((16_777_216, 0)).is_empty());
    assert_eq!(
        w.sample_meta((16_777_217, 0)),
        MetaBits::of(&[MetaProp::Floor])
    );
}
