//! Room orchestration on top of [`GameState`].
//!
//! A `Room` is the single writer for one game: it seats the computer opponent
//! in single-player mode, tracks rematch opt-ins, drives AI turns and queues
//! [`RoomEvent`]s for whoever broadcasts them.

#[cfg(not(feature = "std"))]
use alloc::{string::String, vec::Vec};
use core::mem;
use core::time::Duration;

use log::{debug, error, warn};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::ai::{choose_target, AiMemory};
use crate::common::{Coord, GameError};
use crate::config::{AI_DELAY_MS, AI_PLAYER_ID, ROOM_ID_ALPHABET, ROOM_ID_LEN};
use crate::game::{ClientView, GameMode, GamePhase, GameState, ShotReport, Slot};
use crate::ship::{ShipPlacement, ShipType};

/// Notifications produced by accepted room operations.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase", tag = "type"))]
pub enum RoomEvent {
    PlayerJoined { slot: Slot },
    PlayerLeft { slot: Slot },
    PhaseChanged { phase: GamePhase },
    ShotFired { shooter: Slot, report: ShotReport },
    TurnChanged { turn: Slot },
    GameOver { winner: Slot },
    RematchRequested { by: Slot },
    RematchStarted,
}

/// Random six-character room code.
pub fn generate_room_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..ROOM_ID_LEN)
        .map(|_| ROOM_ID_ALPHABET[rng.random_range(0..ROOM_ID_ALPHABET.len())] as char)
        .collect()
}

pub struct Room<R: Rng = SmallRng> {
    state: GameState,
    ai_memory: Option<AiMemory>,
    rematch: [bool; 2],
    events: Vec<RoomEvent>,
    rng: R,
}

impl Room<SmallRng> {
    /// Room with a reproducible random sequence.
    pub fn with_seed(room_id: impl Into<String>, seed: u64) -> Self {
        Self::new(room_id, SmallRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Room<R> {
    pub fn new(room_id: impl Into<String>, rng: R) -> Self {
        Self {
            state: GameState::new(room_id, GameMode::Multiplayer),
            ai_memory: None,
            rematch: [false; 2],
            events: Vec::new(),
            rng,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn room_id(&self) -> &str {
        &self.state.room_id
    }

    pub fn ai_memory(&self) -> Option<&AiMemory> {
        self.ai_memory.as_ref()
    }

    /// Take the events queued since the last call.
    pub fn drain_events(&mut self) -> Vec<RoomEvent> {
        mem::take(&mut self.events)
    }

    fn emit(&mut self, event: RoomEvent) {
        self.events.push(event);
    }

    fn require_slot(&self, player_id: &str) -> Result<Slot, GameError> {
        self.state.slot_of(player_id).ok_or(GameError::PlayerNotFound)
    }

    fn log_rejection<T>(&self, player_id: &str, res: Result<T, GameError>) -> Result<T, GameError> {
        if let Err(e) = &res {
            warn!("[{}] rejected request from {}: {}", self.state.room_id, player_id, e);
        }
        res
    }

    /// Join or rejoin. The first player to arrive picks the mode; in
    /// single-player mode the AI takes slot two straight away.
    pub fn join(&mut self, player_id: &str, mode: GameMode) -> Result<Slot, GameError> {
        if self.state.is_empty() {
            self.state.mode = mode;
        }
        let was_waiting = self.state.phase == GamePhase::Waiting;
        let res = self.state.add_player(player_id);
        let slot = self.log_rejection(player_id, res)?;
        self.emit(RoomEvent::PlayerJoined { slot });

        if self.state.mode.difficulty().is_some() && self.state.slot_of(AI_PLAYER_ID).is_none() {
            self.seat_ai()?;
        }
        if was_waiting && self.state.phase == GamePhase::Setup {
            self.emit(RoomEvent::PhaseChanged {
                phase: GamePhase::Setup,
            });
        }
        Ok(slot)
    }

    fn seat_ai(&mut self) -> Result<(), GameError> {
        let slot = self.state.add_player(AI_PLAYER_ID)?;
        self.emit(RoomEvent::PlayerJoined { slot });
        self.prepare_ai()
    }

    /// Give the AI a fresh fleet and fresh memory for a new game.
    fn prepare_ai(&mut self) -> Result<(), GameError> {
        let placed = self.state.auto_place_fleet(AI_PLAYER_ID, &mut self.rng)?;
        if !placed {
            error!(
                "[{}] AI fleet incomplete, check board and fleet configuration",
                self.state.room_id
            );
        }
        self.ai_memory = Some(AiMemory::new());
        Ok(())
    }

    /// Mark a player disconnected; their seat and board are kept.
    pub fn leave(&mut self, player_id: &str) -> Option<Slot> {
        let slot = self.state.remove_player(player_id)?;
        self.emit(RoomEvent::PlayerLeft { slot });
        Some(slot)
    }

    pub fn place_ship(&mut self, player_id: &str, placement: ShipPlacement) -> Result<(), GameError> {
        let res = self.state.place_ship(player_id, placement);
        self.log_rejection(player_id, res)
    }

    pub fn remove_ship(&mut self, player_id: &str, ship_type: ShipType) -> Result<(), GameError> {
        let res = self.state.remove_ship(player_id, ship_type);
        self.log_rejection(player_id, res)
    }

    /// Place the remainder of a player's fleet at random and mark them ready
    /// if that completed it.
    pub fn auto_place(&mut self, player_id: &str) -> Result<bool, GameError> {
        let res = self.state.auto_place_fleet(player_id, &mut self.rng);
        self.log_rejection(player_id, res)
    }

    /// Returns `true` if this started the game.
    pub fn set_ready(&mut self, player_id: &str) -> Result<bool, GameError> {
        let res = self.state.set_player_ready(player_id);
        let started = self.log_rejection(player_id, res)?;
        if started {
            self.emit(RoomEvent::PhaseChanged {
                phase: GamePhase::Playing,
            });
            self.emit(RoomEvent::TurnChanged { turn: Slot::One });
        }
        Ok(started)
    }

    pub fn fire(&mut self, player_id: &str, coord: Coord) -> Result<ShotReport, GameError> {
        let res = self.state.fire_shot(player_id, coord);
        let report = self.log_rejection(player_id, res)?;
        let shooter = self.require_slot(player_id)?;
        debug!(
            "[{}] {} fired at {:?}: {:?}",
            self.state.room_id, player_id, coord, report.outcome
        );
        self.emit(RoomEvent::ShotFired {
            shooter,
            report: report.clone(),
        });
        if report.game_over {
            self.emit(RoomEvent::PhaseChanged {
                phase: GamePhase::Finished,
            });
            self.emit(RoomEvent::GameOver { winner: shooter });
        } else {
            self.emit(RoomEvent::TurnChanged {
                turn: shooter.other(),
            });
        }
        Ok(report)
    }

    /// Opt in to a rematch. Returns `true` once every seated player has opted
    /// in and the room is back in setup.
    pub fn request_rematch(&mut self, player_id: &str) -> Result<bool, GameError> {
        if self.state.phase != GamePhase::Finished {
            return self.log_rejection(player_id, Err(GameError::PhaseViolation));
        }
        let res = self.require_slot(player_id);
        let slot = self.log_rejection(player_id, res)?;
        self.rematch[slot.index()] = true;
        self.emit(RoomEvent::RematchRequested { by: slot });

        if let Some(ai_slot) = self.state.slot_of(AI_PLAYER_ID) {
            if !self.rematch[ai_slot.index()] {
                self.rematch[ai_slot.index()] = true;
                self.emit(RoomEvent::RematchRequested { by: ai_slot });
            }
        }

        let everyone = [Slot::One, Slot::Two]
            .iter()
            .filter(|s| self.state.seat(**s).is_some())
            .all(|s| self.rematch[s.index()]);
        if !everyone {
            return Ok(false);
        }
        self.rematch = [false; 2];
        self.state.reset_game();
        if self.state.slot_of(AI_PLAYER_ID).is_some() {
            self.prepare_ai()?;
        }
        self.emit(RoomEvent::RematchStarted);
        self.emit(RoomEvent::PhaseChanged {
            phase: GamePhase::Setup,
        });
        Ok(true)
    }

    pub fn view(&self, player_id: &str) -> Result<ClientView, GameError> {
        self.state.client_view(player_id)
    }

    /// Whether the AI should fire now: it holds the turn and the human it
    /// plays against is connected.
    pub fn is_ai_turn(&self) -> bool {
        self.state.phase == GamePhase::Playing
            && self.state.current_turn.as_deref() == Some(AI_PLAYER_ID)
            && self
                .state
                .slot_of(AI_PLAYER_ID)
                .and_then(|s| self.state.player(s.other()))
                .is_some_and(|p| p.connected)
    }

    /// Pacing delay to wait before the next AI shot.
    pub fn ai_delay(&mut self) -> Duration {
        Duration::from_millis(self.rng.random_range(AI_DELAY_MS))
    }

    /// Let the AI take its shot. Does nothing and returns `None` when it is
    /// not the AI's turn.
    pub fn play_ai_turn(&mut self) -> Option<ShotReport> {
        if !self.is_ai_turn() {
            debug!("[{}] AI turn skipped, not its move", self.state.room_id);
            return None;
        }
        let difficulty = self.state.mode.difficulty()?;
        let target_id = String::from(self.state.opponent_of(AI_PLAYER_ID)?);
        let view = self.state.board(&target_id)?.redact_for_opponent();
        let memory = self.ai_memory.get_or_insert_with(AiMemory::new);
        let coord = choose_target(&view, difficulty, memory, &mut self.rng);

        let report = match self.fire(AI_PLAYER_ID, coord) {
            Ok(report) => report,
            Err(e) => {
                error!("[{}] AI shot at {:?} rejected: {}", self.state.room_id, coord, e);
                return None;
            }
        };
        if let (Some(board), Some(memory)) = (self.state.board(&target_id), self.ai_memory.as_mut()) {
            memory.record_outcome(coord, report.outcome, &board.redact_for_opponent());
        }
        Some(report)
    }
}
