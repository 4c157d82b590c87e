#![cfg(feature = "std")]
//! Client intents and the async seam a transport drives a room through.

use crate::{
    ai::Difficulty,
    common::{Coord, GameError},
    game::{ClientView, GameMode, ShotReport, Slot},
    ship::{ShipPlacement, ShipType},
};

/// Messages a client may send to its room.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    Join {
        player_id: String,
        #[serde(default)]
        game_mode: Option<WireMode>,
        #[serde(default)]
        ai_difficulty: Option<Difficulty>,
    },
    PlaceShip {
        placement: ShipPlacement,
    },
    RemoveShip {
        ship_type: ShipType,
    },
    Ready,
    Fire {
        coord: Coord,
    },
    Rematch,
}

/// Mode flag as it appears in a join request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WireMode {
    Multiplayer,
    SinglePlayer,
}

impl ClientMessage {
    pub fn from_json(text: &str) -> Result<Self, GameError> {
        serde_json::from_str(text).map_err(|e| {
            log::debug!("undecodable client message: {}", e);
            GameError::InvalidMessage
        })
    }

    /// Game mode requested by a join; single-player without a difficulty
    /// plays at the default level.
    pub fn requested_mode(game_mode: Option<WireMode>, difficulty: Option<Difficulty>) -> GameMode {
        match game_mode {
            Some(WireMode::SinglePlayer) => GameMode::SinglePlayer {
                difficulty: difficulty.unwrap_or_default(),
            },
            Some(WireMode::Multiplayer) | None => GameMode::Multiplayer,
        }
    }
}

/// Operations a transport performs against one room.
#[async_trait::async_trait]
pub trait RoomApi: Send + Sync {
    async fn join(&self, player_id: &str, mode: GameMode) -> anyhow::Result<Slot>;
    async fn leave(&self, player_id: &str) -> anyhow::Result<Option<Slot>>;
    async fn place_ship(&self, player_id: &str, placement: ShipPlacement) -> anyhow::Result<()>;
    async fn remove_ship(&self, player_id: &str, ship_type: ShipType) -> anyhow::Result<()>;
    async fn set_ready(&self, player_id: &str) -> anyhow::Result<bool>;
    async fn fire(&self, player_id: &str, coord: Coord) -> anyhow::Result<ShotReport>;
    async fn request_rematch(&self, player_id: &str) -> anyhow::Result<bool>;
    async fn view(&self, player_id: &str) -> anyhow::Result<ClientView>;

    /// Route a decoded client message. `player_id` is the identity bound to
    /// the sending connection; a join carries its own.
    async fn dispatch(&self, player_id: &str, msg: ClientMessage) -> anyhow::Result<()> {
        match msg {
            ClientMessage::Join {
                player_id,
                game_mode,
                ai_difficulty,
            } => {
                let mode = ClientMessage::requested_mode(game_mode, ai_difficulty);
                self.join(&player_id, mode).await.map(|_| ())
            }
            ClientMessage::PlaceShip { placement } => self.place_ship(player_id, placement).await,
            ClientMessage::RemoveShip { ship_type } => self.remove_ship(player_id, ship_type).await,
            ClientMessage::Ready => self.set_ready(player_id).await.map(|_| ()),
            ClientMessage::Fire { coord } => self.fire(player_id, coord).await.map(|_| ()),
            ClientMessage::Rematch => self.request_rematch(player_id).await.map(|_| ()),
        }
    }
}
