use crate::constants::*;
use crate::location::*;
use fnv::FnvHashSet;
use serde::{Deserialize, Serialize};

/// What a land tile is, as far as the radar cares.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TileCategory {
    #[default]
    Plain,
    /// Rock and similar tiles: drawn differently but never mined.
    ObstacleDecoration,
    Mineable,
}

/// Maps land tile ids to a [`TileCategory`] through two disjoint id sets.
#[derive(Clone, Debug)]
pub struct TileClassifier {
    mineable: FnvHashSet<u16>,
    decoration: FnvHashSet<u16>,
}

impl TileClassifier {
    pub fn new<M, D>(mineable: M, decoration: D) -> Self
    where
        M: IntoIterator<Item = u16>,
        D: IntoIterator<Item = u16>,
    {
        TileClassifier {
            mineable: mineable.into_iter().collect(),
            decoration: decoration.into_iter().collect(),
        }
    }

    /// Mineable is tested first; anything in neither set is plain.
    pub fn classify(&self, terrain_id: u16) -> TileCategory {
        if self.mineable.contains(&terrain_id) {
            TileCategory::Mineable
        } else if self.decoration.contains(&terrain_id) {
            TileCategory::ObstacleDecoration
        } else {
            TileCategory::Plain
        }
    }
}

impl Default for TileClassifier {
    /// Mountain and cave resource tiles are mineable, rock tiles decoration.
    fn default() -> Self {
        TileClassifier::new(mineable_tiles(), ROCK_TILES.iter().copied())
    }
}

/// A square, row-major array for window-sized data.
#[derive(Clone, Debug, PartialEq)]
pub struct WindowArray<T: Clone> {
    side: usize,
    data: Vec<T>,
}

impl<T: Clone> WindowArray<T> {
    pub fn new(side: usize, initial: T) -> Self {
        WindowArray {
            side,
            data: vec![initial; side * side],
        }
    }

    /// Builds the array by calling `f` for every cell in row-major order.
    pub fn from_fn<F>(side: usize, mut f: F) -> Self
    where
        F: FnMut(GridPos) -> T,
    {
        let mut data = Vec::with_capacity(side * side);
        for row in 0..side {
            for col in 0..side {
                data.push(f(GridPos::new(row, col)));
            }
        }
        WindowArray { side, data }
    }

    #[inline]
    pub fn side(&self) -> usize {
        self.side
    }

    #[inline]
    pub fn contains(&self, pos: GridPos) -> bool {
        pos.row < self.side && pos.col < self.side
    }

    #[inline]
    pub fn get(&self, pos: GridPos) -> &T {
        &self.data[pos.row * self.side + pos.col]
    }

    #[inline]
    pub fn try_get(&self, pos: GridPos) -> Option<&T> {
        if self.contains(pos) {
            Some(self.get(pos))
        } else {
            None
        }
    }

    #[inline]
    pub fn get_mut(&mut self, pos: GridPos) -> &mut T {
        &mut self.data[pos.row * self.side + pos.col]
    }

    #[inline]
    pub fn set(&mut self, pos: GridPos, value: T) {
        *self.get_mut(pos) = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = (GridPos, &T)> {
        let side = self.side;
        self.data
            .iter()
            .enumerate()
            .map(move |(i, v)| (GridPos::new(i / side, i % side), v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (GridPos, &mut T)> {
        let side = self.side;
        self.data
            .iter_mut()
            .enumerate()
            .map(move |(i, v)| (GridPos::new(i / side, i % side), v))
    }
}

impl<T: Clone + Serialize> Serialize for WindowArray<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        (self.side, &self.data).serialize(serializer)
    }
}

impl<'de, T: Clone + Deserialize<'de>> Deserialize<'de> for WindowArray<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let (side, data) = <(usize, Vec<T>)>::deserialize(deserializer)?;
        if data.len() != side * side {
            return Err(serde::de::Error::custom("Invalid window array size"));
        }
        Ok(WindowArray { side, data })
    }
}
