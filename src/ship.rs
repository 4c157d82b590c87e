//! Ship kinds and placed ships.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::common::Coord;

/// Orientation of a ship on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// The five fixed ship kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
pub enum ShipType {
    Carrier,
    Battleship,
    Cruiser,
    Submarine,
    Destroyer,
}

impl ShipType {
    pub const fn length(self) -> usize {
        match self {
            ShipType::Carrier => 5,
            ShipType::Battleship => 4,
            ShipType::Cruiser => 3,
            ShipType::Submarine => 3,
            ShipType::Destroyer => 2,
        }
    }

    /// Canonical lowercase name, as used on the wire.
    pub const fn name(self) -> &'static str {
        match self {
            ShipType::Carrier => "carrier",
            ShipType::Battleship => "battleship",
            ShipType::Cruiser => "cruiser",
            ShipType::Submarine => "submarine",
            ShipType::Destroyer => "destroyer",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        crate::config::SHIPS.iter().copied().find(|s| s.name() == name)
    }
}

impl core::fmt::Display for ShipType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Coordinates a ship of `length` would occupy from `start`, or `None` if
/// any of them falls off the board.
pub fn ship_coords(start: Coord, orientation: Orientation, length: usize) -> Option<Vec<Coord>> {
    if !start.in_bounds() {
        return None;
    }
    (0..length)
        .map(|i| {
            let step = isize::try_from(i).ok()?;
            match orientation {
                Orientation::Horizontal => start.offset(0, step),
                Orientation::Vertical => start.offset(step, 0),
            }
        })
        .collect()
}

/// A request to place one ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
pub struct ShipPlacement {
    pub ship_type: ShipType,
    pub start_coord: Coord,
    pub orientation: Orientation,
}

impl ShipPlacement {
    pub fn new(ship_type: ShipType, start_coord: Coord, orientation: Orientation) -> Self {
        Self {
            ship_type,
            start_coord,
            orientation,
        }
    }
}

/// A ship placed on a board.
///
/// `hits` never exceeds the length and `sunk` holds exactly when every
/// segment has been hit.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
pub struct Ship {
    pub ship_type: ShipType,
    pub coords: Vec<Coord>,
    pub hits: usize,
    pub sunk: bool,
}

impl Ship {
    pub(crate) fn new(ship_type: ShipType, coords: Vec<Coord>) -> Self {
        debug_assert_eq!(coords.len(), ship_type.length());
        debug_assert!(coords.iter().all(|c| c.in_bounds()));
        Self {
            ship_type,
            coords,
            hits: 0,
            sunk: false,
        }
    }

    pub fn length(&self) -> usize {
        self.ship_type.length()
    }

    pub fn contains(&self, coord: Coord) -> bool {
        self.coords.contains(&coord)
    }

    /// Record one more hit. Returns `true` if this hit sank the ship.
    pub(crate) fn register_hit(&mut self) -> bool {
        if self.sunk {
            return false;
        }
        self.hits = (self.hits + 1).min(self.length());
        self.sunk = self.hits == self.length();
        self.sunk
    }
}
