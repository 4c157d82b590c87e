use core::ops::RangeInclusive;

use crate::ship::ShipType;

pub const BOARD_SIZE: usize = 10;
pub const NUM_SHIPS: usize = 5;

/// The fleet every player places, in placement order.
pub const SHIPS: [ShipType; NUM_SHIPS] = [
    ShipType::Carrier,
    ShipType::Battleship,
    ShipType::Cruiser,
    ShipType::Submarine,
    ShipType::Destroyer,
];

/// Total number of ship segments in the standard fleet.
pub const TOTAL_SHIP_CELLS: usize = 5 + 4 + 3 + 3 + 2;

/// Player id the computer opponent occupies in single-player rooms.
pub const AI_PLAYER_ID: &str = "ai_opponent";

/// Random attempts per ship before auto-placement gives up on it.
pub const MAX_PLACEMENT_ATTEMPTS: usize = 100;

/// Pacing delay before the AI fires, in milliseconds.
pub const AI_DELAY_MS: RangeInclusive<u64> = 1000..=2000;

pub const ROOM_ID_LEN: usize = 6;
pub const ROOM_ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
