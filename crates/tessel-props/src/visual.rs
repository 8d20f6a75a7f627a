use std::fmt;

pub const VIS_PROP_COUNT: usize = 77;
pub const VIS_BYTES: usize = 16;

/// Named visual decorations, in bit order.
///
/// Suffixes: `C` center, `N/E/S/W` edge toward that neighbor,
/// `NE/SE/SW/NW` corner.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum VisProp {
    FloorC = 0,

    GrassC,
    GrassN,
    GrassE,
    GrassS,
    GrassW,
    GrassNE,
    GrassSE,
    GrassSW,
    GrassNW,

    BushC,
    BushN,
    BushE,
    BushS,
    BushW,
    BushNE,
    BushSE,
    BushSW,
    BushNW,

    RockyGroundC,
    RockyGroundN,
    RockyGroundE,
    RockyGroundS,
    RockyGroundW,
    RockyGroundNE,
    RockyGroundSE,
    RockyGroundSW,
    RockyGroundNW,

    BeamC,
    BeamN,
    BeamE,
    BeamS,
    BeamW,
    BeamPost,

    // Exposed faces N, E, S, W.
    Bricks0,
    Bricks1,
    Bricks2,
    Bricks3,
    // Outer corners NE, SE, SW, NW.
    Bricks4,
    Bricks5,
    Bricks6,
    Bricks7,
    // Inner corners NE, SE, SW, NW.
    Bricks8,
    Bricks9,
    Bricks10,
    Bricks11,

    RocksC,
    RockCrumbsC,
    GoldOreC,
    RocksBig,
    RocksN,
    RocksE,
    RocksS,
    RocksW,
    RocksNE,
    RocksSE,
    RocksSW,
    RocksNW,
    RockCrumbsN,
    RockCrumbsE,
    RockCrumbsS,
    RockCrumbsW,
    RockCrumbsNE,
    RockCrumbsSE,
    RockCrumbsSW,
    RockCrumbsNW,

    GoldPileC,
    LampPostC,
    PyramidC,
    TestObjectC,

    TreePineC,
    TreePineMatureC,
    TreePineStumpC,
    TreeMapleC,
    TreeMapleMatureC,
    TreeMapleStumpC,

    /// Reserved: forced on for the upper tile of a stacked cell.
    Layer2,
}

impl VisProp {
    pub const GRASS_EDGES: [VisProp; 4] = [VisProp::GrassN, VisProp::GrassE, VisProp::GrassS, VisProp::GrassW];
    pub const GRASS_CORNERS: [VisProp; 4] = [VisProp::GrassNE, VisProp::GrassSE, VisProp::GrassSW, VisProp::GrassNW];
    pub const BUSH_EDGES: [VisProp; 4] = [VisProp::BushN, VisProp::BushE, VisProp::BushS, VisProp::BushW];
    pub const BUSH_CORNERS: [VisProp; 4] = [VisProp::BushNE, VisProp::BushSE, VisProp::BushSW, VisProp::BushNW];
    pub const ROCKY_GROUND_EDGES: [VisProp; 4] = [
        VisProp::RockyGroundN,
        VisProp::RockyGroundE,
        VisProp::RockyGroundS,
        VisProp::RockyGroundW,
    ];
    pub const ROCKY_GROUND_CORNERS: [VisProp; 4] = [
        VisProp::RockyGroundNE,
        VisProp::RockyGroundSE,
        VisProp::RockyGroundSW,
        VisProp::RockyGroundNW,
    ];
    pub const BEAM_EDGES: [VisProp; 4] = [VisProp::BeamN, VisProp::BeamE, VisProp::BeamS, VisProp::BeamW];
    pub const BRICK_FACES: [VisProp; 4] = [VisProp::Bricks0, VisProp::Bricks1, VisProp::Bricks2, VisProp::Bricks3];
    pub const BRICK_OUTER_CORNERS: [VisProp; 4] = [VisProp::Bricks4, VisProp::Bricks5, VisProp::Bricks6, VisProp::Bricks7];
    pub const BRICK_INNER_CORNERS: [VisProp; 4] = [VisProp::Bricks8, VisProp::Bricks9, VisProp::Bricks10, VisProp::Bricks11];
    pub const ROCKS_EDGES: [VisProp; 4] = [VisProp::RocksN, VisProp::RocksE, VisProp::RocksS, VisProp::RocksW];
    pub const ROCKS_CORNERS: [VisProp; 4] = [VisProp::RocksNE, VisProp::RocksSE, VisProp::RocksSW, VisProp::RocksNW];
    pub const CRUMBS_EDGES: [VisProp; 4] = [
        VisProp::RockCrumbsN,
        VisProp::RockCrumbsE,
        VisProp::RockCrumbsS,
        VisProp::RockCrumbsW,
    ];
    pub const CRUMBS_CORNERS: [VisProp; 4] = [
        VisProp::RockCrumbsNE,
        VisProp::RockCrumbsSE,
        VisProp::RockCrumbsSW,
        VisProp::RockCrumbsNW,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Every decoration, in bit order.
    pub fn all() -> impl Iterator<Item = VisProp> {
        (0..VIS_PROP_COUNT as u8).filter_map(VisProp::from_index)
    }

    pub fn from_index(i: u8) -> Option<VisProp> {
        use VisProp::*;
        const TABLE: [VisProp; VIS_PROP_COUNT] = [
            FloorC, GrassC, GrassN, GrassE, GrassS, GrassW, GrassNE, GrassSE, GrassSW, GrassNW,
            BushC, BushN, BushE, BushS, BushW, BushNE, BushSE, BushSW, BushNW, RockyGroundC,
            RockyGroundN, RockyGroundE, RockyGroundS, RockyGroundW, RockyGroundNE, RockyGroundSE,
            RockyGroundSW, RockyGroundNW, BeamC, BeamN, BeamE, BeamS, BeamW, BeamPost, Bricks0,
            Bricks1, Bricks2, Bricks3, Bricks4, Bricks5, Bricks6, Bricks7, Bricks8, Bricks9,
            Bricks10, Bricks11, RocksC, RockCrumbsC, GoldOreC, RocksBig, RocksN, RocksE, RocksS,
            RocksW, RocksNE, RocksSE, RocksSW, RocksNW, RockCrumbsN, RockCrumbsE, RockCrumbsS,
            RockCrumbsW, RockCrumbsNE, RockCrumbsSE, RockCrumbsSW, RockCrumbsNW, GoldPileC,
            LampPostC, PyramidC, TestObjectC, TreePineC, TreePineMatureC, TreePineStumpC,
            TreeMapleC, TreeMapleMatureC, TreeMapleStumpC, Layer2,
        ];
        TABLE.get(i as usize).copied()
    }
}

/// Byte-addressable set of [`VisProp`]s. The byte pattern is what the atlas
/// builder keys tiles by.
#[derive(Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct VisualBits([u8; VIS_BYTES]);

impl VisualBits {
    pub const EMPTY: VisualBits = VisualBits([0; VIS_BYTES]);

    #[inline]
    pub fn from_bytes(bytes: [u8; VIS_BYTES]) -> Self {
        let mut out = Self(bytes);
        // Clear padding bits past the last decoration.
        let last = VIS_PROP_COUNT / 8;
        out.0[last] &= (1u8 << (VIS_PROP_COUNT % 8)) - 1;
        for b in out.0.iter_mut().skip(last + 1) {
            *b = 0;
        }
        out
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[inline]
    pub fn has(&self, prop: VisProp) -> bool {
        let i = prop.index();
        self.0[i >> 3] & (1 << (i & 7)) != 0
    }

    #[inline]
    pub fn with(mut self, prop: VisProp) -> Self {
        let i = prop.index();
        self.0[i >> 3] |= 1 << (i & 7);
        self
    }

    #[inline]
    pub fn set(self, prop: VisProp, on: bool) -> Self {
        if on {
            self.with(prop)
        } else {
            let i = prop.index();
            let mut out = self;
            out.0[i >> 3] &= !(1 << (i & 7));
            out
        }
    }

    pub fn any_of(&self, props: &[VisProp]) -> bool {
        props.iter().any(|p| self.has(*p))
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    pub fn count(&self) -> u32 {
        self.0.iter().map(|b| b.count_ones()).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = VisProp> + '_ {
        VisProp::all().filter(move |p| self.has(*p))
    }

    /// The upper tile variant of a stacked cell.
    #[inline]
    pub fn top(self) -> Self {
        self.with(VisProp::Layer2)
    }
}

impl fmt::Debug for VisualBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_matches_discriminants() {
        let mut n = 0;
        for (i, p) in VisProp::all().enumerate() {
            assert_eq!(p.index(), i);
            n += 1;
        }
        assert_eq!(n, VIS_PROP_COUNT);
        assert_eq!(VisProp::Layer2.index(), VIS_PROP_COUNT - 1);
        assert!(VIS_PROP_COUNT <= VIS_BYTES * 8);
    }

    #[test]
    fn top_differs_only_by_layer_bit() {
        let b = VisualBits::EMPTY.with(VisProp::GrassC).with(VisProp::GrassN);
        let t = b.top();
        assert_ne!(b, t);
        assert!(t.has(VisProp::Layer2));
        assert_eq!(t.count(), b.count() + 1);
        assert_eq!(t.set(VisProp::Layer2, false), b);
    }

    #[test]
    fn from_bytes_clears_padding() {
        let b = VisualBits::from_bytes([0xFF; VIS_BYTES]);
        assert_eq!(b.count() as usize, VIS_PROP_COUNT);
    }
}
