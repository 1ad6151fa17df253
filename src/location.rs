use serde::*;
use std::fmt;

/// Identifier of a world map (facet), as reported by the host.
pub type MapIndex = u8;

/// A tile coordinate in world space. Unbounded and signed.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default, PartialOrd, Ord)]
pub struct WorldLocation {
    x: i32,
    y: i32,
}

impl WorldLocation {
    pub const fn new(x: i32, y: i32) -> Self {
        WorldLocation { x, y }
    }

    #[inline]
    pub fn x(self) -> i32 {
        self.x
    }

    #[inline]
    pub fn y(self) -> i32 {
        self.y
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        WorldLocation {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// The bank owning this tile, for banks `bank_size` tiles wide.
    #[inline]
    pub fn bank(self, bank_size: i32) -> BankLocation {
        BankLocation::containing(self, bank_size)
    }

    pub fn distance_to(self, other: Self) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);

        dx.max(dy)
    }
}

impl fmt::Display for WorldLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

impl Serialize for WorldLocation {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (self.x, self.y).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for WorldLocation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        <(i32, i32)>::deserialize(deserializer).map(|(x, y)| WorldLocation::new(x, y))
    }
}

/// Coordinate of a resource bank: the world coordinate floor-divided by the
/// bank size on each axis.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub struct BankLocation {
    x: i32,
    y: i32,
}

impl BankLocation {
    pub const fn new(x: i32, y: i32) -> Self {
        BankLocation { x, y }
    }

    /// Floor division, so tiles left of or above the origin land in negative
    /// banks rather than collapsing into bank 0.
    #[inline]
    pub fn containing(location: WorldLocation, bank_size: i32) -> Self {
        BankLocation {
            x: location.x.div_euclid(bank_size),
            y: location.y.div_euclid(bank_size),
        }
    }

    #[inline]
    pub fn x(self) -> i32 {
        self.x
    }

    #[inline]
    pub fn y(self) -> i32 {
        self.y
    }
}

impl fmt::Display for BankLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.x, self.y)
    }
}

impl Serialize for BankLocation {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (self.x, self.y).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for BankLocation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        <(i32, i32)>::deserialize(deserializer).map(|(x, y)| BankLocation::new(x, y))
    }
}

/// A cell of the window, addressed by row and column.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct GridPos {
    pub row: usize,
    pub col: usize,
}

impl GridPos {
    pub const fn new(row: usize, col: usize) -> Self {
        GridPos { row, col }
    }
}
