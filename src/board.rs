//! Player boards: placement legality, shot resolution and the redacted view
//! handed to opponents.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
use core::fmt;
use core::ops::Deref;

use log::{debug, error};
use rand::Rng;

use crate::bitboard::BoardMask;
use crate::common::{Coord, GameError, ShotOutcome};
use crate::config::{BOARD_SIZE, MAX_PLACEMENT_ATTEMPTS, SHIPS};
use crate::ship::{ship_coords, Orientation, Ship, ShipPlacement, ShipType};

/// State of a single grid cell as seen by the board's owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
pub enum CellState {
    #[default]
    Empty,
    /// Unhit ship segment.
    Ship,
    /// Hit segment of a ship still afloat.
    Hit,
    Miss,
    /// Segment of a fully sunk ship.
    Sunk,
}

impl CellState {
    /// Whether a shot may still be fired at this cell.
    pub fn is_untried(self) -> bool {
        matches!(self, CellState::Empty | CellState::Ship)
    }
}

pub type Grid = [[CellState; BOARD_SIZE]; BOARD_SIZE];

/// One player's board.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
pub struct PlayerBoard {
    pub grid: Grid,
    pub ships: Vec<Ship>,
    /// True iff at least one ship exists and every ship is sunk.
    pub all_ships_sunk: bool,
}

impl Default for PlayerBoard {
    fn default() -> Self {
        Self::new()
    }
}

/// Coordinates for `ship_type` at `start`/`orientation`, checked against the
/// ships already on the board. Pure; nothing is mutated.
pub fn validate_placement(
    ship_type: ShipType,
    start: Coord,
    orientation: Orientation,
    existing: &[Ship],
) -> Result<Vec<Coord>, GameError> {
    if existing.iter().any(|s| s.ship_type == ship_type) {
        return Err(GameError::ShipAlreadyPlaced);
    }
    let coords = ship_coords(start, orientation, ship_type.length()).ok_or(GameError::OutOfBounds)?;
    let occupied = BoardMask::from_coords(existing.iter().flat_map(|s| s.coords.iter().copied()));
    let candidate = BoardMask::from_coords(coords.iter().copied());
    if !(occupied & candidate).is_empty() {
        return Err(GameError::Overlap);
    }
    Ok(coords)
}

impl PlayerBoard {
    /// A fresh all-empty board with no ships.
    pub fn new() -> Self {
        Self {
            grid: [[CellState::Empty; BOARD_SIZE]; BOARD_SIZE],
            ships: Vec::new(),
            all_ships_sunk: false,
        }
    }

    /// Cell state at `coord`, or `None` off the board.
    pub fn cell(&self, coord: Coord) -> Option<CellState> {
        coord
            .in_bounds()
            .then(|| self.grid[coord.row][coord.col])
    }

    fn set_cell(&mut self, coord: Coord, state: CellState) {
        self.grid[coord.row][coord.col] = state;
    }

    /// In-bounds and not yet fired upon.
    pub fn is_untried(&self, coord: Coord) -> bool {
        self.cell(coord).is_some_and(CellState::is_untried)
    }

    /// Every cell still open to a shot, in row-major order.
    pub fn untried_cells(&self) -> Vec<Coord> {
        all_coords().filter(|c| self.is_untried(*c)).collect()
    }

    /// Mask of cells whose state matches `pred`.
    pub fn mask_where(&self, pred: impl Fn(CellState) -> bool) -> BoardMask {
        BoardMask::from_coords(all_coords().filter(|c| pred(self.grid[c.row][c.col])))
    }

    pub fn ship(&self, ship_type: ShipType) -> Option<&Ship> {
        self.ships.iter().find(|s| s.ship_type == ship_type)
    }

    pub fn has_full_fleet(&self) -> bool {
        SHIPS.iter().all(|t| self.ship(*t).is_some())
    }

    /// Fleet members not known to be sunk, in fleet order.
    pub fn remaining_ship_types(&self) -> impl Iterator<Item = ShipType> + '_ {
        SHIPS
            .iter()
            .copied()
            .filter(move |t| !self.ship(*t).is_some_and(|s| s.sunk))
    }

    /// Validate and place a ship, painting its cells.
    pub fn place(&mut self, placement: ShipPlacement) -> Result<(), GameError> {
        let coords = validate_placement(
            placement.ship_type,
            placement.start_coord,
            placement.orientation,
            &self.ships,
        )?;
        for c in &coords {
            self.set_cell(*c, CellState::Ship);
        }
        self.ships.push(Ship::new(placement.ship_type, coords));
        Ok(())
    }

    /// Take a ship back off the board, restoring its cells to empty.
    pub fn remove(&mut self, ship_type: ShipType) -> Result<Ship, GameError> {
        let idx = self
            .ships
            .iter()
            .position(|s| s.ship_type == ship_type)
            .ok_or(GameError::ShipNotFound)?;
        let ship = self.ships.remove(idx);
        for c in &ship.coords {
            self.set_cell(*c, CellState::Empty);
        }
        Ok(ship)
    }

    /// Resolve a shot at `coord`.
    ///
    /// The caller must already have checked that the cell is in bounds and
    /// untried.
    pub fn apply_shot(&mut self, coord: Coord) -> ShotOutcome {
        debug_assert!(self.is_untried(coord), "shot at resolved cell {:?}", coord);
        let Some(idx) = self.ships.iter().position(|s| s.contains(coord)) else {
            self.set_cell(coord, CellState::Miss);
            return ShotOutcome::Miss;
        };
        let ship = &mut self.ships[idx];
        if ship.register_hit() {
            let ship_type = ship.ship_type;
            let coords = ship.coords.clone();
            for c in coords {
                self.set_cell(c, CellState::Sunk);
            }
            self.all_ships_sunk = self.ships.iter().all(|s| s.sunk);
            ShotOutcome::Sunk(ship_type)
        } else {
            self.set_cell(coord, CellState::Hit);
            ShotOutcome::Hit
        }
    }

    /// The board as the opponent may see it: unhit ship cells read empty and
    /// only sunk ships keep their coordinates.
    pub fn redact_for_opponent(&self) -> RedactedBoard {
        let mut grid = self.grid;
        for cell in grid.iter_mut().flatten() {
            if *cell == CellState::Ship {
                *cell = CellState::Empty;
            }
        }
        let ships = self
            .ships
            .iter()
            .map(|s| Ship {
                coords: if s.sunk { s.coords.clone() } else { Vec::new() },
                ..s.clone()
            })
            .collect();
        RedactedBoard(PlayerBoard {
            grid,
            ships,
            all_ships_sunk: self.all_ships_sunk,
        })
    }

    /// Returns a random non-overlapping placement for `ship_type`.
    pub fn random_placement<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        ship_type: ShipType,
    ) -> Result<ShipPlacement, GameError> {
        let len = ship_type.length();
        let mut last_err = GameError::OutOfBounds;
        for _ in 0..MAX_PLACEMENT_ATTEMPTS {
            let orientation = if rng.random_bool(0.5) {
                Orientation::Horizontal
            } else {
                Orientation::Vertical
            };
            let max_r = match orientation {
                Orientation::Vertical => BOARD_SIZE - len,
                Orientation::Horizontal => BOARD_SIZE - 1,
            };
            let max_c = match orientation {
                Orientation::Horizontal => BOARD_SIZE - len,
                Orientation::Vertical => BOARD_SIZE - 1,
            };
            let start = Coord::new(rng.random_range(0..=max_r), rng.random_range(0..=max_c));
            match validate_placement(ship_type, start, orientation, &self.ships) {
                Ok(_) => return Ok(ShipPlacement::new(ship_type, start, orientation)),
                Err(e) => last_err = e,
            }
        }
        Err(last_err)
    }

    /// Place every fleet member not yet on the board at random.
    ///
    /// A ship that cannot be placed within the attempt budget is logged and
    /// left off; the return value is the number of ships placed.
    pub fn auto_place_fleet<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        let mut placed = 0;
        for ship_type in SHIPS {
            if self.ship(ship_type).is_some() {
                continue;
            }
            match self
                .random_placement(rng, ship_type)
                .and_then(|p| self.place(p))
            {
                Ok(()) => placed += 1,
                Err(e) => error!(
                    "Failed to place {} after {} attempts: {}",
                    ship_type, MAX_PLACEMENT_ATTEMPTS, e
                ),
            }
        }
        debug!("auto-placed {} ships", placed);
        placed
    }
}

/// All board coordinates in row-major order.
pub fn all_coords() -> impl Iterator<Item = Coord> {
    (0..BOARD_SIZE).flat_map(|r| (0..BOARD_SIZE).map(move |c| Coord::new(r, c)))
}

impl fmt::Debug for PlayerBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "PlayerBoard {{ all_ships_sunk: {} }}", self.all_ships_sunk)?;
        for row in &self.grid {
            for cell in row {
                let ch = match cell {
                    CellState::Empty => '.',
                    CellState::Ship => 'S',
                    CellState::Hit => 'X',
                    CellState::Miss => 'o',
                    CellState::Sunk => '#',
                };
                write!(f, "{} ", ch)?;
            }
            writeln!(f)?;
        }
        for ship in &self.ships {
            writeln!(f, "  {:?}", ship)?;
        }
        Ok(())
    }
}

/// Opponent-facing projection of a [`PlayerBoard`].
///
/// This is the only view of a target board the AI ever receives.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(transparent))]
pub struct RedactedBoard(PlayerBoard);

impl Deref for RedactedBoard {
    type Target = PlayerBoard;

    fn deref(&self) -> &PlayerBoard {
        &self.0
    }
}
