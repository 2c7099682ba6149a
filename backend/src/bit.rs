use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitXor, BitXorAssign, Not};

/// An element of GF(2).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Bit(bool);

impl Bit {
    pub const ZERO: Bit = Bit(false);
    pub const ONE: Bit = Bit(true);

    pub const fn new(value: bool) -> Self {
        Bit(value)
    }

    pub const fn is_one(self) -> bool {
        self.0
    }

    pub const fn as_u8(self) -> u8 {
        self.0 as u8
    }

    /// Parses `'0'`/`'1'`.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '0' => Some(Bit::ZERO),
            '1' => Some(Bit::ONE),
            _ => None,
        }
    }
}

impl From<bool> for Bit {
    fn from(value: bool) -> Self {
        Bit(value)
    }
}

impl From<Bit> for bool {
    fn from(value: Bit) -> Self {
        value.0
    }
}

impl From<Bit> for u8 {
    fn from(value: Bit) -> Self {
        value.as_u8()
    }
}

impl BitXor for Bit {
    type Output = Bit;

    fn bitxor(self, rhs: Bit) -> Bit {
        Bit(self.0 ^ rhs.0)
    }
}

impl BitXorAssign for Bit {
    fn bitxor_assign(&mut self, rhs: Bit) {
        self.0 ^= rhs.0;
    }
}

impl BitAnd for Bit {
    type Output = Bit;

    fn bitand(self, rhs: Bit) -> Bit {
        Bit(self.0 & rhs.0)
    }
}

impl BitAndAssign for Bit {
    fn bitand_assign(&mut self, rhs: Bit) {
        self.0 &= rhs.0;
    }
}

impl Not for Bit {
    type Output = Bit;

    fn not(self) -> Bit {
        Bit(!self.0)
    }
}

impl fmt::Display for Bit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// Converts a slice of `0`/`1` integers into bits. Any nonzero value maps to one.
pub fn bits_from_u8(values: &[u8]) -> Vec<Bit> {
    values.iter().map(|&v| Bit::new(v != 0)).collect()
}
