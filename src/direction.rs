use serde::{Deserialize, Serialize};
use std::ops::{BitAnd, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};

/// Bitmask over the four compass sides of a cell.
///
/// Bit order (UP, RIGHT, DOWN, LEFT) is clockwise so that `rotate` can work
/// on bit indices directly. Compass values describe mirror faces, portal
/// link slots and the side a ray crosses into a cell through.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Compass(u8);

impl Compass {
    pub const NONE: Compass = Compass(0);
    pub const UP: Compass = Compass(1 << 0);
    pub const RIGHT: Compass = Compass(1 << 1);
    pub const DOWN: Compass = Compass(1 << 2);
    pub const LEFT: Compass = Compass(1 << 3);
    pub const ALL: Compass = Compass(0b1111);

    /// The four cardinal directions in clockwise rotation order.
    pub const CARDINALS: [Compass; 4] =
        [Compass::UP, Compass::RIGHT, Compass::DOWN, Compass::LEFT];

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Whether `self` and `other` share at least one side.
    pub fn intersects(self, other: Compass) -> bool {
        self.0 & other.0 != 0
    }

    pub fn is_single(self) -> bool {
        self.0.count_ones() == 1
    }

    /// Individual cardinal directions composing a compound value.
    pub fn components(self) -> impl Iterator<Item = Compass> {
        Compass::CARDINALS
            .into_iter()
            .filter(move |side| self.intersects(*side))
    }

    /// Rotation index of a single cardinal: UP=0, RIGHT=1, DOWN=2, LEFT=3.
    pub fn index(self) -> usize {
        debug_assert!(self.is_single(), "index requires a single cardinal");
        self.0.trailing_zeros() as usize
    }

    /// Rotate by `times` clockwise quarter turns (negative for
    /// counterclockwise). Compound values rotate component-wise.
    pub fn rotate(self, times: i32) -> Compass {
        self.components()
            .map(|side| {
                let index = (side.index() as i32 + times).rem_euclid(4);
                Compass(1 << index)
            })
            .fold(Compass::NONE, |acc, side| acc | side)
    }

    /// Number of clockwise quarter turns from `other` to `self`.
    /// Both sides must be single cardinals.
    pub fn difference(self, other: Compass) -> i32 {
        debug_assert!(self.is_single() && other.is_single());
        (self.index() as i32 - other.index() as i32).rem_euclid(4)
    }

    pub fn opposite(self) -> Compass {
        self.rotate(2)
    }

    /// Cell-coordinate delta of the neighbor in this direction.
    pub fn offset(self) -> (i32, i32) {
        debug_assert!(self.is_single());
        match self {
            Compass::UP => (0, -1),
            Compass::RIGHT => (1, 0),
            Compass::DOWN => (0, 1),
            _ => (-1, 0),
        }
    }

    /// Indices into a 3x3 sub-area layout of a cell corresponding to the
    /// active sides (UP=1, LEFT=3, RIGHT=5, DOWN=7). At least one side must
    /// be set; the layout is meaningless for an empty value.
    pub fn subrect_indices(self) -> Vec<usize> {
        debug_assert!(!self.is_empty(), "subrect lookup requires at least one side");
        let mut indices = Vec::new();
        if self.intersects(Compass::UP) {
            indices.push(1);
        }
        if self.intersects(Compass::DOWN) {
            indices.push(7);
        }
        if self.intersects(Compass::LEFT) {
            indices.push(3);
        }
        if self.intersects(Compass::RIGHT) {
            indices.push(5);
        }
        indices
    }
}

impl BitOr for Compass {
    type Output = Compass;
    fn bitor(self, rhs: Compass) -> Compass {
        Compass(self.0 | rhs.0)
    }
}

impl BitOrAssign for Compass {
    fn bitor_assign(&mut self, rhs: Compass) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Compass {
    type Output = Compass;
    fn bitand(self, rhs: Compass) -> Compass {
        Compass(self.0 & rhs.0)
    }
}

impl BitXor for Compass {
    type Output = Compass;
    fn bitxor(self, rhs: Compass) -> Compass {
        Compass(self.0 ^ rhs.0)
    }
}

impl BitXorAssign for Compass {
    fn bitxor_assign(&mut self, rhs: Compass) {
        self.0 ^= rhs.0;
    }
}

impl Not for Compass {
    type Output = Compass;
    fn not(self) -> Compass {
        Compass(!self.0 & Compass::ALL.0)
    }
}

/// Bitmask of movement inputs relative to the actor's facing, plus the four
/// diagonal unions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MovementCombo(u8);

impl MovementCombo {
    pub const NONE: MovementCombo = MovementCombo(0);
    pub const FORWARD: MovementCombo = MovementCombo(1 << 0);
    pub const BACKWARD: MovementCombo = MovementCombo(1 << 1);
    pub const LEFT: MovementCombo = MovementCombo(1 << 2);
    pub const RIGHT: MovementCombo = MovementCombo(1 << 3);
    pub const FORWARD_LEFT: MovementCombo = MovementCombo(Self::FORWARD.0 | Self::LEFT.0);
    pub const FORWARD_RIGHT: MovementCombo = MovementCombo(Self::FORWARD.0 | Self::RIGHT.0);
    pub const BACKWARD_LEFT: MovementCombo = MovementCombo(Self::BACKWARD.0 | Self::LEFT.0);
    pub const BACKWARD_RIGHT: MovementCombo = MovementCombo(Self::BACKWARD.0 | Self::RIGHT.0);

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn intersects(self, other: MovementCombo) -> bool {
        self.0 & other.0 != 0
    }

    /// Cancel conflicting inputs: forward+backward clear each other, as do
    /// left+right. The result is always NONE, a cardinal, or a diagonal.
    pub fn resolved(self) -> MovementCombo {
        let mut resolved = self;
        if self.intersects(MovementCombo::LEFT) && self.intersects(MovementCombo::RIGHT) {
            resolved = resolved & !(MovementCombo::LEFT | MovementCombo::RIGHT);
        }
        if self.intersects(MovementCombo::FORWARD) && self.intersects(MovementCombo::BACKWARD) {
            resolved = resolved & !(MovementCombo::FORWARD | MovementCombo::BACKWARD);
        }
        resolved
    }
}

impl BitOr for MovementCombo {
    type Output = MovementCombo;
    fn bitor(self, rhs: MovementCombo) -> MovementCombo {
        MovementCombo(self.0 | rhs.0)
    }
}

impl BitOrAssign for MovementCombo {
    fn bitor_assign(&mut self, rhs: MovementCombo) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for MovementCombo {
    type Output = MovementCombo;
    fn bitand(self, rhs: MovementCombo) -> MovementCombo {
        MovementCombo(self.0 & rhs.0)
    }
}

impl Not for MovementCombo {
    type Output = MovementCombo;
    fn not(self) -> MovementCombo {
        MovementCombo(!self.0 & 0b1111)
    }
}
