use tessel_atlas::AtlasBuilder;
use tessel_props::{MetaBits, MetaProp};
use tessel_stream::Viewport;
use tessel_world::{CellCoord, TileWorld};

/// One character per cell, most prominent property first.
pub fn glyph(bits: MetaBits) -> char {
    use MetaProp::*;
    if bits.has(Rocks) {
        return if bits.has(Harvested) {
            ','
        } else if bits.has(GoldOreForRocks) {
            '*'
        } else {
            '#'
        };
    }
    for (prop, c) in [
        (Pyramid, '^'),
        (LampPost, 'i'),
        (GoldPile, '$'),
        (TestObject, '?'),
    ] {
        if bits.has(prop) {
            return c;
        }
    }
    if bits.any_of(&[TreePine, TreeMaple]) {
        return match (bits.has(Harvested), bits.has(TreePine)) {
            (true, _) => 't',
            (false, true) => 'A',
            (false, false) => 'T',
        };
    }
    for (prop, c) in [
        (Bricks, '='),
        (Beam, '+'),
        (Floor, '.'),
        (Bush, '%'),
        (Grass, '"'),
        (RockyGround, ':'),
    ] {
        if bits.has(prop) {
            return c;
        }
    }
    ' '
}

/// Text rendering of the window's meta classification, north row first.
pub fn render<A: AtlasBuilder>(world: &mut TileWorld<A>, view: Viewport) -> String {
    let max = view.max();
    let mut out = String::with_capacity((view.width as usize + 1) * view.height as usize);
    for y in (view.y..=max.y).rev() {
        for x in view.x..=max.x {
            out.push(glyph(world.sample_meta(CellCoord::new(x, y))));
        }
        out.push('\n');
    }
    out.pop();
    out
}
