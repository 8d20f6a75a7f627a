use std::fmt;

pub const META_PROP_COUNT: usize = 15;

/// Named per-cell classification properties, in bit order.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum MetaProp {
    Floor = 0,
    Beam,
    Bricks,
    Grass,
    Bush,
    GoldPile,
    LampPost,
    TestObject,
    Pyramid,
    RockyGround,
    Rocks,
    GoldOreForRocks,
    Harvested,
    TreePine,
    TreeMaple,
}

impl MetaProp {
    pub const ALL: [MetaProp; META_PROP_COUNT] = [
        MetaProp::Floor,
        MetaProp::Beam,
        MetaProp::Bricks,
        MetaProp::Grass,
        MetaProp::Bush,
        MetaProp::GoldPile,
        MetaProp::LampPost,
        MetaProp::TestObject,
        MetaProp::Pyramid,
        MetaProp::RockyGround,
        MetaProp::Rocks,
        MetaProp::GoldOreForRocks,
        MetaProp::Harvested,
        MetaProp::TreePine,
        MetaProp::TreeMaple,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub const fn bit(self) -> u32 {
        1u32 << (self as u32)
    }

    pub const fn name(self) -> &'static str {
        match self {
            MetaProp::Floor => "floor",
            MetaProp::Beam => "beam",
            MetaProp::Bricks => "bricks",
            MetaProp::Grass => "grass",
            MetaProp::Bush => "bush",
            MetaProp::GoldPile => "gold_pile",
            MetaProp::LampPost => "lamp_post",
            MetaProp::TestObject => "test_object",
            MetaProp::Pyramid => "pyramid",
            MetaProp::RockyGround => "rocky_ground",
            MetaProp::Rocks => "rocks",
            MetaProp::GoldOreForRocks => "gold_ore_for_rocks",
            MetaProp::Harvested => "harvested",
            MetaProp::TreePine => "tree_pine",
            MetaProp::TreeMaple => "tree_maple",
        }
    }

    pub fn from_name(name: &str) -> Option<MetaProp> {
        MetaProp::ALL.iter().copied().find(|p| p.name() == name)
    }
}

/// Fixed-width set of [`MetaProp`]s. Plain value; every operation returns a
/// new set.
#[derive(Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct MetaBits(u32);

impl MetaBits {
    pub const EMPTY: MetaBits = MetaBits(0);

    const MASK: u32 = (1u32 << META_PROP_COUNT) - 1;

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw & Self::MASK)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    pub fn of(props: &[MetaProp]) -> Self {
        props.iter().fold(Self::EMPTY, |b, p| b.with(*p))
    }

    #[inline]
    pub const fn has(self, prop: MetaProp) -> bool {
        self.0 & prop.bit() != 0
    }

    #[inline]
    pub const fn with(self, prop: MetaProp) -> Self {
        Self(self.0 | prop.bit())
    }

    #[inline]
    pub const fn without(self, prop: MetaProp) -> Self {
        Self(self.0 & !prop.bit())
    }

    #[inline]
    pub fn set(self, prop: MetaProp, on: bool) -> Self {
        if on { self.with(prop) } else { self.without(prop) }
    }

    pub fn any_of(self, props: &[MetaProp]) -> bool {
        props.iter().any(|p| self.has(*p))
    }

    pub fn without_all(self, props: &[MetaProp]) -> Self {
        props.iter().fold(self, |b, p| b.without(*p))
    }

    /// Keeps only the bits also present in `mask`.
    #[inline]
    pub const fn masked(self, mask: MetaBits) -> Self {
        Self(self.0 & mask.0)
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = MetaProp> {
        MetaProp::ALL.into_iter().filter(move |p| self.has(*p))
    }
}

impl fmt::Debug for MetaBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MetaBits{")?;
        for (i, p) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("|")?;
            }
            f.write_str(p.name())?;
        }
        f.write_str("}")
    }
}
