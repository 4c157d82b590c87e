#![cfg(feature = "std")]
//! One tokio task per room.
//!
//! The task owns its [`Room`] outright and handles commands one at a time, so
//! room state needs no locking. AI turns are paced by a timer task that posts
//! back into the same queue; any later mutation aborts the timer and a stale
//! or off-turn AI command is ignored.

use rand::rngs::SmallRng;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::{
    common::{Coord, GameError},
    game::{ClientView, GameMode, ShotReport, Slot},
    protocol::RoomApi,
    room::{Room, RoomEvent},
    ship::{ShipPlacement, ShipType},
};

const COMMAND_QUEUE: usize = 64;
const EVENT_QUEUE: usize = 256;

type Reply<T> = oneshot::Sender<Result<T, GameError>>;

enum RoomCommand {
    Join {
        player_id: String,
        mode: GameMode,
        reply: Reply<Slot>,
    },
    Leave {
        player_id: String,
        reply: oneshot::Sender<Option<Slot>>,
    },
    PlaceShip {
        player_id: String,
        placement: ShipPlacement,
        reply: Reply<()>,
    },
    RemoveShip {
        player_id: String,
        ship_type: ShipType,
        reply: Reply<()>,
    },
    Ready {
        player_id: String,
        reply: Reply<bool>,
    },
    Fire {
        player_id: String,
        coord: Coord,
        reply: Reply<ShotReport>,
    },
    Rematch {
        player_id: String,
        reply: Reply<bool>,
    },
    View {
        player_id: String,
        reply: Reply<ClientView>,
    },
    AiTurn {
        generation: u64,
    },
}

impl RoomCommand {
    /// Read-only commands leave a pending AI timer alone.
    fn mutates(&self) -> bool {
        !matches!(self, RoomCommand::View { .. } | RoomCommand::AiTurn { .. })
    }
}

/// Cloneable handle to a running room task.
#[derive(Clone)]
pub struct RoomHandle {
    room_id: String,
    tx: mpsc::Sender<RoomCommand>,
    events: broadcast::Sender<RoomEvent>,
}

/// Start the task that owns `room`. It runs until every handle is dropped.
pub fn spawn_room(room: Room<SmallRng>) -> RoomHandle {
    let (tx, rx) = mpsc::channel(COMMAND_QUEUE);
    let (events, _) = broadcast::channel(EVENT_QUEUE);
    let handle = RoomHandle {
        room_id: room.room_id().to_string(),
        tx: tx.clone(),
        events: events.clone(),
    };
    let actor = RoomActor {
        room,
        rx,
        tx: tx.downgrade(),
        events,
        generation: 0,
        timer: None,
        ai_stalled: false,
    };
    tokio::spawn(actor.run());
    handle
}

struct RoomActor {
    room: Room<SmallRng>,
    rx: mpsc::Receiver<RoomCommand>,
    tx: mpsc::WeakSender<RoomCommand>,
    events: broadcast::Sender<RoomEvent>,
    generation: u64,
    timer: Option<JoinHandle<()>>,
    /// Set when the AI's shot was rejected on its own turn; cleared by the
    /// next mutating command.
    ai_stalled: bool,
}

impl RoomActor {
    async fn run(mut self) {
        while let Some(cmd) = self.rx.recv().await {
            if cmd.mutates() {
                self.cancel_timer();
            }
            self.handle(cmd);
            for event in self.room.drain_events() {
                // no subscribers is fine
                let _ = self.events.send(event);
            }
            self.schedule_ai_turn();
        }
        self.cancel_timer();
        log::debug!("[{}] room task stopped", self.room.room_id());
    }

    fn handle(&mut self, cmd: RoomCommand) {
        let room = &mut self.room;
        match cmd {
            RoomCommand::Join {
                player_id,
                mode,
                reply,
            } => {
                let _ = reply.send(room.join(&player_id, mode));
            }
            RoomCommand::Leave { player_id, reply } => {
                let _ = reply.send(room.leave(&player_id));
            }
            RoomCommand::PlaceShip {
                player_id,
                placement,
                reply,
            } => {
                let _ = reply.send(room.place_ship(&player_id, placement));
            }
            RoomCommand::RemoveShip {
                player_id,
                ship_type,
                reply,
            } => {
                let _ = reply.send(room.remove_ship(&player_id, ship_type));
            }
            RoomCommand::Ready { player_id, reply } => {
                let _ = reply.send(room.set_ready(&player_id));
            }
            RoomCommand::Fire {
                player_id,
                coord,
                reply,
            } => {
                let _ = reply.send(room.fire(&player_id, coord));
            }
            RoomCommand::Rematch { player_id, reply } => {
                let _ = reply.send(room.request_rematch(&player_id));
            }
            RoomCommand::View { player_id, reply } => {
                let _ = reply.send(room.view(&player_id));
            }
            RoomCommand::AiTurn { generation } => {
                if generation != self.generation {
                    return;
                }
                self.timer = None;
                if self.room.play_ai_turn().is_none() && self.room.is_ai_turn() {
                    self.ai_stalled = true;
                }
            }
        }
    }

    fn cancel_timer(&mut self) {
        self.generation += 1;
        self.ai_stalled = false;
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }

    fn schedule_ai_turn(&mut self) {
        if self.timer.is_some() || self.ai_stalled || !self.room.is_ai_turn() {
            return;
        }
        let delay = self.room.ai_delay();
        let generation = self.generation;
        let tx = self.tx.clone();
        log::debug!("[{}] AI fires in {:?}", self.room.room_id(), delay);
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(tx) = tx.upgrade() {
                let _ = tx.send(RoomCommand::AiTurn { generation }).await;
            }
        }));
    }
}

impl RoomHandle {
    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    /// Receive every event the room publishes from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<RoomEvent> {
        self.events.subscribe()
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> RoomCommand,
    ) -> anyhow::Result<T> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(make(reply))
            .await
            .map_err(|_| anyhow::anyhow!("room {} is closed", self.room_id))?;
        rx.await
            .map_err(|_| anyhow::anyhow!("room {} dropped the request", self.room_id))
    }
}

#[async_trait::async_trait]
impl RoomApi for RoomHandle {
    async fn join(&self, player_id: &str, mode: GameMode) -> anyhow::Result<Slot> {
        let player_id = player_id.to_string();
        Ok(self
            .request(|reply| RoomCommand::Join {
                player_id,
                mode,
                reply,
            })
            .await??)
    }

    async fn leave(&self, player_id: &str) -> anyhow::Result<Option<Slot>> {
        let player_id = player_id.to_string();
        self.request(|reply| RoomCommand::Leave { player_id, reply })
            .await
    }

    async fn place_ship(&self, player_id: &str, placement: ShipPlacement) -> anyhow::Result<()> {
        let player_id = player_id.to_string();
        Ok(self
            .request(|reply| RoomCommand::PlaceShip {
                player_id,
                placement,
                reply,
            })
            .await??)
    }

    async fn remove_ship(&self, player_id: &str, ship_type: ShipType) -> anyhow::Result<()> {
        let player_id = player_id.to_string();
        Ok(self
            .request(|reply| RoomCommand::RemoveShip {
                player_id,
                ship_type,
                reply,
            })
            .await??)
    }

    async fn set_ready(&self, player_id: &str) -> anyhow::Result<bool> {
        let player_id = player_id.to_string();
        Ok(self
            .request(|reply| RoomCommand::Ready { player_id, reply })
            .await??)
    }

    async fn fire(&self, player_id: &str, coord: Coord) -> anyhow::Result<ShotReport> {
        let player_id = player_id.to_string();
        Ok(self
            .request(|reply| RoomCommand::Fire {
                player_id,
                coord,
                reply,
            })
            .await??)
    }

    async fn request_rematch(&self, player_id: &str) -> anyhow::Result<bool> {
        let player_id = player_id.to_string();
        Ok(self
            .request(|reply| RoomCommand::Rematch { player_id, reply })
            .await??)
    }

    async fn view(&self, player_id: &str) -> anyhow::Result<ClientView> {
        let player_id = player_id.to_string();
        Ok(self
            .request(|reply| RoomCommand::View { player_id, reply })
            .await??)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::Difficulty;
    use crate::board::CellState;
    use crate::config::AI_PLAYER_ID;

    fn actor_for(room: Room<SmallRng>) -> RoomActor {
        let (tx, rx) = mpsc::channel(COMMAND_QUEUE);
        let (events, _) = broadcast::channel(EVENT_QUEUE);
        RoomActor {
            room,
            rx,
            tx: tx.downgrade(),
            events,
            generation: 0,
            timer: None,
            ai_stalled: false,
        }
    }

    /// AI to move against a board with no open cell left, so its shot is
    /// rejected while the turn stays with it.
    fn room_with_rejected_ai_shot() -> Room<SmallRng> {
        let mut room = Room::with_seed("STALL1", 3);
        room.join(
            "alice",
            GameMode::SinglePlayer {
                difficulty: Difficulty::Easy,
            },
        )
        .unwrap();
        room.auto_place("alice").unwrap();
        assert!(room.set_ready("alice").unwrap());
        let coord = room.state().board(AI_PLAYER_ID).unwrap().untried_cells()[0];
        room.fire("alice", coord).unwrap();
        let seat = room.state_mut().slots[0].as_mut().unwrap();
        for row in seat.board.grid.iter_mut() {
            row.fill(CellState::Miss);
        }
        room
    }

    #[tokio::test(start_paused = true)]
    async fn rejected_ai_shot_waits_for_the_next_mutation() {
        let mut actor = actor_for(room_with_rejected_ai_shot());
        actor.schedule_ai_turn();
        assert!(actor.timer.is_some());

        let generation = actor.generation;
        actor.handle(RoomCommand::AiTurn { generation });
        assert!(actor.ai_stalled);
        assert!(actor.room.is_ai_turn());
        actor.schedule_ai_turn();
        assert!(actor.timer.is_none());

        actor.cancel_timer();
        actor.schedule_ai_turn();
        assert!(actor.timer.is_some());
    }
}
