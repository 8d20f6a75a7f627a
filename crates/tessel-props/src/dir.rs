/// The eight neighbor directions. North is `+y`, east is `+x`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum Dir {
    N = 0,
    NE = 1,
    E = 2,
    SE = 3,
    S = 4,
    SW = 5,
    W = 6,
    NW = 7,
}

impl Dir {
    pub const ALL: [Dir; 8] = [
        Dir::N,
        Dir::NE,
        Dir::E,
        Dir::SE,
        Dir::S,
        Dir::SW,
        Dir::W,
        Dir::NW,
    ];

    /// Edge directions in N, E, S, W order.
    pub const EDGES: [Dir; 4] = [Dir::N, Dir::E, Dir::S, Dir::W];

    /// Corner directions in NE, SE, SW, NW order.
    pub const CORNERS: [Dir; 4] = [Dir::NE, Dir::SE, Dir::SW, Dir::NW];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn offset(self) -> (i32, i32) {
        match self {
            Dir::N => (0, 1),
            Dir::NE => (1, 1),
            Dir::E => (1, 0),
            Dir::SE => (1, -1),
            Dir::S => (0, -1),
            Dir::SW => (-1, -1),
            Dir::W => (-1, 0),
            Dir::NW => (-1, 1),
        }
    }

    /// The two edge directions flanking a corner, e.g. `NE -> (N, E)`.
    /// Edges return themselves twice.
    #[inline]
    pub fn flanks(self) -> (Dir, Dir) {
        match self {
            Dir::NE => (Dir::N, Dir::E),
            Dir::SE => (Dir::S, Dir::E),
            Dir::SW => (Dir::S, Dir::W),
            Dir::NW => (Dir::N, Dir::W),
            edge => (edge, edge),
        }
    }

    #[inline]
    pub fn is_corner(self) -> bool {
        matches!(self, Dir::NE | Dir::SE | Dir::SW | Dir::NW)
    }
}
