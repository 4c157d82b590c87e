//! Common types: coordinates, shot outcomes and game errors.

use crate::config::BOARD_SIZE;
use crate::ship::ShipType;

/// A cell on the board, `row` and `col` in `[0, BOARD_SIZE)` when valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn in_bounds(&self) -> bool {
        self.row < BOARD_SIZE && self.col < BOARD_SIZE
    }

    /// The cell shifted by `(dr, dc)`, if it stays on the board.
    pub fn offset(&self, dr: isize, dc: isize) -> Option<Coord> {
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        let next = Coord::new(row, col);
        next.in_bounds().then_some(next)
    }

    /// In-bounds orthogonal neighbours in up, down, left, right order.
    pub fn neighbors(self) -> impl Iterator<Item = Coord> {
        [(-1, 0), (1, 0), (0, -1), (0, 1)]
            .into_iter()
            .filter_map(move |(dr, dc)| self.offset(dr, dc))
    }

    /// Whether the cell is on the even colour of a chessboard.
    pub fn is_checkerboard(&self) -> bool {
        (self.row + self.col) % 2 == 0
    }
}

/// Result of a resolved shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
pub enum ShotOutcome {
    /// Shot struck a ship that is still afloat.
    Hit,
    /// Shot landed on open water.
    Miss,
    /// Shot sank a ship, carrying its kind.
    Sunk(ShipType),
}

/// Errors returned by game mutators. All are recoverable and reported only
/// to the caller that triggered them.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum GameError {
    /// Operation not allowed in the current phase.
    PhaseViolation,
    NotYourTurn,
    RoomFull,
    PlayerNotFound,
    ShipAlreadyPlaced,
    OutOfBounds,
    Overlap,
    ShipNotFound,
    /// Ready requested before the whole fleet is on the board.
    FleetIncomplete,
    CellAlreadyTargeted,
    OpponentNotFound,
    InvalidMessage,
}

impl core::fmt::Display for GameError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            GameError::PhaseViolation => write!(f, "Not allowed in the current game phase"),
            GameError::NotYourTurn => write!(f, "Not your turn"),
            GameError::RoomFull => write!(f, "Room is full"),
            GameError::PlayerNotFound => write!(f, "Player not found"),
            GameError::ShipAlreadyPlaced => write!(f, "Ship already placed"),
            GameError::OutOfBounds => write!(f, "Ship goes out of bounds"),
            GameError::Overlap => write!(f, "Ship overlaps with another ship"),
            GameError::ShipNotFound => write!(f, "Ship not found"),
            GameError::FleetIncomplete => write!(f, "Not all ships placed"),
            GameError::CellAlreadyTargeted => write!(f, "Cell already targeted"),
            GameError::OpponentNotFound => write!(f, "Opponent not found"),
            GameError::InvalidMessage => write!(f, "Invalid message format"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for GameError {}
