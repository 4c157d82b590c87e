#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod actor;
mod ai;
mod bitboard;
mod board;
mod common;
mod config;
mod game;
#[cfg(feature = "std")]
mod logging;
pub mod protocol;
mod room;
mod ship;
mod sim;

#[cfg(feature = "std")]
pub use actor::{spawn_room, RoomHandle};
pub use ai::*;
pub use bitboard::{BitBoard, BoardMask};
pub use board::*;
pub use common::*;
pub use config::*;
pub use game::*;
#[cfg(feature = "std")]
pub use logging::init_logging;
#[cfg(feature = "std")]
pub use protocol::*;
pub use room::*;
pub use ship::*;
pub use sim::*;
