//! Computer opponent targeting.
//!
//! The engine only ever looks at a [`RedactedBoard`]: shots already resolved
//! and the full outline of sunk ships. Follow-up state between turns lives in
//! [`AiMemory`].

use alloc::collections::VecDeque;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use log::debug;
use rand::Rng;

use crate::bitboard::BoardMask;
use crate::board::{all_coords, CellState, RedactedBoard};
use crate::common::{Coord, ShotOutcome};
use crate::config::BOARD_SIZE;
use crate::ship::Orientation;

/// Coordinate returned when no untried cell is left.
pub const FALLBACK_TARGET: Coord = Coord::new(0, 0);

/// Per-cell placement counts over the board.
pub type DensityMap = [[u32; BOARD_SIZE]; BOARD_SIZE];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
#[cfg_attr(feature = "std", derive(clap::ValueEnum))]
pub enum Difficulty {
    /// Uniform random over untried cells.
    Easy,
    /// Hunt on a checkerboard, then work through neighbours of hits.
    #[default]
    Medium,
    /// Follow known ship axes, then probability density.
    Hard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
pub enum AiMode {
    #[default]
    Hunt,
    Target,
}

/// Targeting state carried between AI turns.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
pub struct AiMemory {
    pub mode: AiMode,
    /// Candidates to investigate, highest priority at the front. Entries may
    /// go stale; they are dropped when popped.
    pub candidates: VecDeque<Coord>,
    pub last_hit: Option<Coord>,
    pub orientation: Option<Orientation>,
}

impl AiMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pop candidates until one is still open on `board`.
    fn next_candidate(&mut self, board: &RedactedBoard) -> Option<Coord> {
        while let Some(coord) = self.candidates.pop_front() {
            if board.is_untried(coord) {
                return Some(coord);
            }
        }
        None
    }

    /// Update memory with the outcome of a shot the AI just fired.
    ///
    /// `board` is the opponent view after the shot was applied.
    pub fn record_outcome(&mut self, coord: Coord, outcome: ShotOutcome, board: &RedactedBoard) {
        match outcome {
            ShotOutcome::Hit => {
                self.mode = AiMode::Target;
                for adj in coord.neighbors() {
                    if board.is_untried(adj) {
                        self.candidates.push_front(adj);
                    }
                }
                if let Some(prev) = self.last_hit {
                    let axis = if prev.row == coord.row {
                        Some(Orientation::Horizontal)
                    } else if prev.col == coord.col {
                        Some(Orientation::Vertical)
                    } else {
                        None
                    };
                    if let Some(axis) = axis {
                        self.orientation = Some(axis);
                        // push in reverse so the first axis neighbour ends up in front
                        for adj in axis_neighbors(coord, axis).into_iter().rev().flatten() {
                            if board.is_untried(adj) {
                                self.candidates.push_front(adj);
                            }
                        }
                    }
                }
                self.last_hit = Some(coord);
            }
            ShotOutcome::Sunk(_) => *self = AiMemory::new(),
            ShotOutcome::Miss => {}
        }
    }
}

/// The two neighbours of `coord` along `axis`: left/right or up/down.
fn axis_neighbors(coord: Coord, axis: Orientation) -> [Option<Coord>; 2] {
    match axis {
        Orientation::Horizontal => [coord.offset(0, -1), coord.offset(0, 1)],
        Orientation::Vertical => [coord.offset(-1, 0), coord.offset(1, 0)],
    }
}

fn pick<R: Rng + ?Sized>(cells: &[Coord], rng: &mut R) -> Option<Coord> {
    if cells.is_empty() {
        None
    } else {
        Some(cells[rng.random_range(0..cells.len())])
    }
}

/// Uniform choice among all untried cells.
pub fn easy_target<R: Rng + ?Sized>(board: &RedactedBoard, rng: &mut R) -> Coord {
    pick(&board.untried_cells(), rng).unwrap_or(FALLBACK_TARGET)
}

/// Candidates first, otherwise a random checkerboard cell while any remain.
pub fn medium_target<R: Rng + ?Sized>(
    board: &RedactedBoard,
    memory: &mut AiMemory,
    rng: &mut R,
) -> Coord {
    if let Some(coord) = memory.next_candidate(board) {
        return coord;
    }
    let untried = board.untried_cells();
    let checkerboard: Vec<Coord> = untried.iter().copied().filter(Coord::is_checkerboard).collect();
    let pool = if checkerboard.is_empty() {
        &untried
    } else {
        &checkerboard
    };
    pick(pool, rng).unwrap_or(FALLBACK_TARGET)
}

/// Axis neighbours of the last hit, then candidates, then the densest cell.
pub fn hard_target<R: Rng + ?Sized>(
    board: &RedactedBoard,
    memory: &mut AiMemory,
    rng: &mut R,
) -> Coord {
    if let (Some(axis), Some(last)) = (memory.orientation, memory.last_hit) {
        if let Some(coord) = axis_neighbors(last, axis)
            .into_iter()
            .flatten()
            .find(|c| board.is_untried(*c))
        {
            return coord;
        }
    }
    if let Some(coord) = memory.next_candidate(board) {
        return coord;
    }

    let density = density_map(board);
    let best = densest_cells(&density);
    match pick(&best, rng) {
        Some(coord) => coord,
        None => easy_target(board, rng),
    }
}

/// Count, for every cell, how many placements of the ships still afloat
/// would cover it without crossing a miss or a sunk ship. Resolved cells
/// read zero.
pub fn density_map(board: &RedactedBoard) -> DensityMap {
    let mut matrix = [[0u32; BOARD_SIZE]; BOARD_SIZE];
    let blocked = board.mask_where(|c| matches!(c, CellState::Miss | CellState::Sunk));

    for ship_type in board.remaining_ship_types() {
        let len = ship_type.length();
        for orient in [Orientation::Horizontal, Orientation::Vertical] {
            let (max_row, max_col) = match orient {
                Orientation::Horizontal => (BOARD_SIZE, BOARD_SIZE - len + 1),
                Orientation::Vertical => (BOARD_SIZE - len + 1, BOARD_SIZE),
            };
            for r in 0..max_row {
                for c in 0..max_col {
                    let cells = BoardMask::from_coords((0..len).map(|k| match orient {
                        Orientation::Horizontal => Coord::new(r, c + k),
                        Orientation::Vertical => Coord::new(r + k, c),
                    }));
                    if !(cells & blocked).is_empty() {
                        continue;
                    }
                    for cell in cells.iter() {
                        matrix[cell.row][cell.col] += 1;
                    }
                }
            }
        }
    }

    for coord in all_coords() {
        if !board.is_untried(coord) {
            matrix[coord.row][coord.col] = 0;
        }
    }
    matrix
}

/// Every cell sharing the highest non-zero density.
pub fn densest_cells(density: &DensityMap) -> Vec<Coord> {
    let max = density.iter().flatten().copied().max().unwrap_or(0);
    if max == 0 {
        return Vec::new();
    }
    all_coords()
        .filter(|c| density[c.row][c.col] == max)
        .collect()
}

/// Choose the AI's next shot against `board`.
pub fn choose_target<R: Rng + ?Sized>(
    board: &RedactedBoard,
    difficulty: Difficulty,
    memory: &mut AiMemory,
    rng: &mut R,
) -> Coord {
    let coord = match difficulty {
        Difficulty::Easy => easy_target(board, rng),
        Difficulty::Medium => medium_target(board, memory, rng),
        Difficulty::Hard => hard_target(board, memory, rng),
    };
    debug!("ai ({:?}, {:?}) targets {:?}", difficulty, memory.mode, coord);
    coord
}
