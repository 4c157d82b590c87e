//! Authoritative per-room game state machine.
//!
//! `waiting → setup → playing → finished → (rematch) setup`. A `GameState` is
//! owned by exactly one room handler and mutated synchronously; every mutator
//! validates before it changes anything.

#[cfg(not(feature = "std"))]
use alloc::string::{String, ToString};

use log::info;
use rand::Rng;

use crate::ai::Difficulty;
use crate::board::{PlayerBoard, RedactedBoard};
use crate::common::{Coord, GameError, ShotOutcome};
use crate::config::AI_PLAYER_ID;
use crate::ship::{ShipPlacement, ShipType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
pub enum GamePhase {
    Waiting,
    Setup,
    Playing,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase", tag = "mode"))]
pub enum GameMode {
    #[default]
    Multiplayer,
    SinglePlayer { difficulty: Difficulty },
}

impl GameMode {
    pub fn difficulty(&self) -> Option<Difficulty> {
        match self {
            GameMode::Multiplayer => None,
            GameMode::SinglePlayer { difficulty } => Some(*difficulty),
        }
    }
}

/// Seat number in a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Slot {
    One,
    Two,
}

impl Slot {
    pub fn index(self) -> usize {
        match self {
            Slot::One => 0,
            Slot::Two => 1,
        }
    }

    pub fn number(self) -> u8 {
        self.index() as u8 + 1
    }

    pub fn other(self) -> Slot {
        match self {
            Slot::One => Slot::Two,
            Slot::Two => Slot::One,
        }
    }

    fn from_index(idx: usize) -> Slot {
        if idx == 0 {
            Slot::One
        } else {
            Slot::Two
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerInfo {
    pub id: String,
    pub ready: bool,
    pub connected: bool,
}

/// An occupied slot: the player and the board they own.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Seat {
    pub player: PlayerInfo,
    pub board: PlayerBoard,
}

/// Result of an accepted shot.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
pub struct ShotReport {
    pub coord: Coord,
    pub outcome: ShotOutcome,
    pub game_over: bool,
    pub winner: Option<String>,
}

/// Whose turn or win something is, from the requester's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
pub enum Perspective {
    You,
    Opponent,
}

/// Snapshot of a room tailored to one player.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
pub struct ClientView {
    pub room_id: String,
    pub phase: GamePhase,
    pub mode: GameMode,
    pub player_id: String,
    pub player_number: u8,
    pub is_your_turn: bool,
    pub turn: Option<Perspective>,
    pub your_board: PlayerBoard,
    pub opponent_board: RedactedBoard,
    pub opponent_ready: bool,
    pub opponent_connected: bool,
    pub is_ai_opponent: bool,
    pub winner: Option<Perspective>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct GameState {
    pub room_id: String,
    pub phase: GamePhase,
    pub mode: GameMode,
    pub slots: [Option<Seat>; 2],
    pub current_turn: Option<String>,
    pub winner: Option<String>,
}

impl GameState {
    pub fn new(room_id: impl Into<String>, mode: GameMode) -> Self {
        Self {
            room_id: room_id.into(),
            phase: GamePhase::Waiting,
            mode,
            slots: [None, None],
            current_turn: None,
            winner: None,
        }
    }

    pub fn seat(&self, slot: Slot) -> Option<&Seat> {
        self.slots[slot.index()].as_ref()
    }

    pub fn slot_of(&self, player_id: &str) -> Option<Slot> {
        self.slots
            .iter()
            .position(|s| s.as_ref().is_some_and(|s| s.player.id == player_id))
            .map(Slot::from_index)
    }

    fn seat_mut(&mut self, player_id: &str) -> Result<&mut Seat, GameError> {
        let slot = self.slot_of(player_id).ok_or(GameError::PlayerNotFound)?;
        self.slots[slot.index()]
            .as_mut()
            .ok_or(GameError::PlayerNotFound)
    }

    pub fn board(&self, player_id: &str) -> Option<&PlayerBoard> {
        let slot = self.slot_of(player_id)?;
        self.seat(slot).map(|s| &s.board)
    }

    pub fn player(&self, slot: Slot) -> Option<&PlayerInfo> {
        self.seat(slot).map(|s| &s.player)
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Id of the player seated opposite `player_id`.
    pub fn opponent_of(&self, player_id: &str) -> Option<&str> {
        let slot = self.slot_of(player_id)?;
        self.player(slot.other()).map(|p| p.id.as_str())
    }

    fn require_phase(&self, phase: GamePhase) -> Result<(), GameError> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(GameError::PhaseViolation)
        }
    }

    /// Seat a player, or mark a returning player connected again.
    ///
    /// Filling the second slot moves the room from waiting to setup.
    pub fn add_player(&mut self, player_id: &str) -> Result<Slot, GameError> {
        if let Some(slot) = self.slot_of(player_id) {
            if let Some(seat) = self.slots[slot.index()].as_mut() {
                seat.player.connected = true;
            }
            return Ok(slot);
        }
        let idx = self
            .slots
            .iter()
            .position(Option::is_none)
            .ok_or(GameError::RoomFull)?;
        self.slots[idx] = Some(Seat {
            player: PlayerInfo {
                id: player_id.to_string(),
                ready: false,
                connected: true,
            },
            board: PlayerBoard::new(),
        });
        let slot = Slot::from_index(idx);
        if self.slots.iter().all(Option::is_some) && self.phase == GamePhase::Waiting {
            self.phase = GamePhase::Setup;
            info!("[{}] both players seated, entering setup", self.room_id);
        }
        Ok(slot)
    }

    /// Mark a player disconnected. The slot stays theirs.
    pub fn remove_player(&mut self, player_id: &str) -> Option<Slot> {
        let slot = self.slot_of(player_id)?;
        if let Some(seat) = self.slots[slot.index()].as_mut() {
            seat.player.connected = false;
        }
        Some(slot)
    }

    /// Place a ship during setup. Placing the last fleet member marks the
    /// player ready.
    pub fn place_ship(&mut self, player_id: &str, placement: ShipPlacement) -> Result<(), GameError> {
        self.require_phase(GamePhase::Setup)?;
        let seat = self.seat_mut(player_id)?;
        seat.board.place(placement)?;
        if seat.board.has_full_fleet() {
            seat.player.ready = true;
        }
        Ok(())
    }

    /// Randomly place whatever part of the player's fleet is missing.
    /// Returns `true` if the fleet is now complete, which also marks the
    /// player ready.
    pub fn auto_place_fleet<R: Rng + ?Sized>(
        &mut self,
        player_id: &str,
        rng: &mut R,
    ) -> Result<bool, GameError> {
        self.require_phase(GamePhase::Setup)?;
        let seat = self.seat_mut(player_id)?;
        seat.board.auto_place_fleet(rng);
        let complete = seat.board.has_full_fleet();
        if complete {
            seat.player.ready = true;
        }
        Ok(complete)
    }

    /// Take a ship back during setup; the player is no longer ready.
    pub fn remove_ship(&mut self, player_id: &str, ship_type: ShipType) -> Result<(), GameError> {
        self.require_phase(GamePhase::Setup)?;
        let seat = self.seat_mut(player_id)?;
        seat.board.remove(ship_type)?;
        seat.player.ready = false;
        Ok(())
    }

    /// Mark a player ready. Returns `true` when this started the game.
    ///
    /// Slot one always fires first.
    pub fn set_player_ready(&mut self, player_id: &str) -> Result<bool, GameError> {
        self.require_phase(GamePhase::Setup)?;
        let seat = self.seat_mut(player_id)?;
        if !seat.board.has_full_fleet() {
            return Err(GameError::FleetIncomplete);
        }
        seat.player.ready = true;

        let both_ready = self
            .slots
            .iter()
            .all(|s| s.as_ref().is_some_and(|s| s.player.ready));
        if both_ready {
            self.phase = GamePhase::Playing;
            self.current_turn = self.player(Slot::One).map(|p| p.id.clone());
            info!("[{}] both players ready, game started", self.room_id);
        }
        Ok(both_ready)
    }

    /// Fire at the opponent's board.
    ///
    /// Sinking the last ship ends the game with the shooter as winner and the
    /// turn left unchanged; any other accepted shot passes the turn.
    pub fn fire_shot(&mut self, player_id: &str, coord: Coord) -> Result<ShotReport, GameError> {
        self.require_phase(GamePhase::Playing)?;
        if self.current_turn.as_deref() != Some(player_id) {
            return Err(GameError::NotYourTurn);
        }
        let shooter = self.slot_of(player_id).ok_or(GameError::PlayerNotFound)?;
        let target = self.slots[shooter.other().index()]
            .as_mut()
            .ok_or(GameError::OpponentNotFound)?;
        match target.board.cell(coord) {
            None => return Err(GameError::OutOfBounds),
            Some(cell) if !cell.is_untried() => return Err(GameError::CellAlreadyTargeted),
            Some(_) => {}
        }

        let outcome = target.board.apply_shot(coord);
        let game_over = target.board.all_ships_sunk;
        let opponent_id = target.player.id.clone();
        if game_over {
            self.phase = GamePhase::Finished;
            self.winner = Some(player_id.to_string());
            info!("[{}] {} sank the last ship and wins", self.room_id, player_id);
        } else {
            self.current_turn = Some(opponent_id);
        }
        Ok(ShotReport {
            coord,
            outcome,
            game_over,
            winner: self.winner.clone(),
        })
    }

    /// Clear both boards and return to setup. Seats, identities and
    /// connection flags are kept.
    pub fn reset_game(&mut self) {
        for seat in self.slots.iter_mut().flatten() {
            seat.player.ready = false;
            seat.board = PlayerBoard::new();
        }
        self.phase = GamePhase::Setup;
        self.current_turn = None;
        self.winner = None;
        info!("[{}] rematch, back to setup", self.room_id);
    }

    /// The room as `player_id` is allowed to see it.
    pub fn client_view(&self, player_id: &str) -> Result<ClientView, GameError> {
        let slot = self.slot_of(player_id).ok_or(GameError::PlayerNotFound)?;
        let seat = self.seat(slot).ok_or(GameError::PlayerNotFound)?;
        let opponent = self.seat(slot.other());
        let relative = |id: &str| {
            if id == player_id {
                Perspective::You
            } else {
                Perspective::Opponent
            }
        };
        Ok(ClientView {
            room_id: self.room_id.clone(),
            phase: self.phase,
            mode: self.mode,
            player_id: player_id.to_string(),
            player_number: slot.number(),
            is_your_turn: self.current_turn.as_deref() == Some(player_id),
            turn: self.current_turn.as_deref().map(relative),
            your_board: seat.board.clone(),
            opponent_board: opponent
                .map(|o| o.board.redact_for_opponent())
                .unwrap_or_default(),
            opponent_ready: opponent.is_some_and(|o| o.player.ready),
            opponent_connected: opponent.is_some_and(|o| o.player.connected),
            is_ai_opponent: opponent.is_some_and(|o| o.player.id == AI_PLAYER_ID),
            winner: self.winner.as_deref().map(relative),
        })
    }
}
