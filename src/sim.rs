//! Computer-vs-computer games, used by the CLI and for measuring the
//! targeting tiers against each other.

#[cfg(not(feature = "std"))]
use alloc::string::String;

use rand::Rng;

use crate::ai::{choose_target, AiMemory, Difficulty};
use crate::board::PlayerBoard;
use crate::common::GameError;
use crate::config::BOARD_SIZE;
use crate::game::{GameMode, Slot};
use crate::room::Room;

pub const BOT_IDS: [&str; 2] = ["bot_one", "bot_two"];

/// Summary of a finished bot match.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize))]
pub struct MatchSummary {
    pub room_id: String,
    pub winner: Slot,
    pub difficulties: [Difficulty; 2],
    pub shots: [usize; 2],
}

/// Play one full multiplayer game through `room` between two bots. The bots
/// draw their choices from `rng`; the room's own generator places fleets.
pub fn play_bot_match<R: Rng, B: Rng + ?Sized>(
    room: &mut Room<R>,
    difficulties: [Difficulty; 2],
    rng: &mut B,
) -> Result<MatchSummary, GameError> {
    for id in BOT_IDS {
        room.join(id, GameMode::Multiplayer)?;
    }
    for id in BOT_IDS {
        if !room.auto_place(id)? {
            return Err(GameError::FleetIncomplete);
        }
        room.set_ready(id)?;
    }

    let mut memories = [AiMemory::new(), AiMemory::new()];
    let mut shots = [0usize; 2];
    let limit = 2 * BOARD_SIZE * BOARD_SIZE;
    for _ in 0..limit {
        let Some(turn) = room.state().current_turn.clone() else {
            break;
        };
        let shooter = room
            .state()
            .slot_of(&turn)
            .ok_or(GameError::PlayerNotFound)?;
        let target = BOT_IDS[shooter.other().index()];
        let view = room
            .state()
            .board(target)
            .ok_or(GameError::OpponentNotFound)?
            .redact_for_opponent();
        let memory = &mut memories[shooter.index()];
        let coord = choose_target(&view, difficulties[shooter.index()], memory, rng);
        let report = room.fire(&turn, coord)?;
        shots[shooter.index()] += 1;
        if let Some(board) = room.state().board(target) {
            memory.record_outcome(coord, report.outcome, &board.redact_for_opponent());
        }
        if report.game_over {
            return Ok(MatchSummary {
                room_id: room.room_id().into(),
                winner: shooter,
                difficulties,
                shots,
            });
        }
    }
    Err(GameError::PhaseViolation)
}

/// Shots `difficulty` needs to sink a randomly placed fleet.
pub fn shots_to_clear<R: Rng + ?Sized>(difficulty: Difficulty, rng: &mut R) -> usize {
    let mut board = PlayerBoard::new();
    board.auto_place_fleet(rng);
    let mut memory = AiMemory::new();
    let mut shots = 0;
    while !board.all_ships_sunk && shots < BOARD_SIZE * BOARD_SIZE {
        let view = board.redact_for_opponent();
        let coord = choose_target(&view, difficulty, &mut memory, rng);
        if !board.is_untried(coord) {
            // only the exhausted-board fallback can land here
            break;
        }
        let outcome = board.apply_shot(coord);
        shots += 1;
        memory.record_outcome(coord, outcome, &board.redact_for_opponent());
    }
    shots
}
