use shipwrecker::{
    CellState, Coord, GameError, GameMode, GamePhase, GameState, Orientation, Perspective,
    PlayerBoard, ShipPlacement, ShipType, ShotOutcome, Slot, SHIPS,
};

/// Ship `i` of the fleet lies horizontally on row `2 * i` from column zero.
fn fleet() -> Vec<ShipPlacement> {
    SHIPS
        .iter()
        .enumerate()
        .map(|(i, t)| ShipPlacement::new(*t, Coord::new(2 * i, 0), Orientation::Horizontal))
        .collect()
}

fn fleet_cells() -> Vec<Coord> {
    SHIPS
        .iter()
        .enumerate()
        .flat_map(|(i, t)| (0..t.length()).map(move |c| Coord::new(2 * i, c)))
        .collect()
}

/// Odd rows never hold a ship in the fixed layout.
fn open_water() -> Vec<Coord> {
    (0..5)
        .flat_map(|r| (0..10).map(move |c| Coord::new(2 * r + 1, c)))
        .collect()
}

fn seated() -> GameState {
    let mut state = GameState::new("TEST01", GameMode::Multiplayer);
    state.add_player("alice").unwrap();
    state.add_player("bob").unwrap();
    state
}

fn playing() -> GameState {
    let mut state = seated();
    for id in ["alice", "bob"] {
        for p in fleet() {
            state.place_ship(id, p).unwrap();
        }
    }
    assert!(!state.set_player_ready("alice").unwrap());
    assert!(state.set_player_ready("bob").unwrap());
    state
}

#[test]
fn test_seating_and_phases() {
    let mut state = GameState::new("TEST01", GameMode::Multiplayer);
    assert!(state.is_empty());
    assert_eq!(state.add_player("alice"), Ok(Slot::One));
    assert_eq!(state.phase, GamePhase::Waiting);
    assert_eq!(state.add_player("bob"), Ok(Slot::Two));
    assert_eq!(state.phase, GamePhase::Setup);
    assert_eq!(state.add_player("carol"), Err(GameError::RoomFull));
    assert_eq!(state.opponent_of("alice"), Some("bob"));
    assert_eq!(state.opponent_of("carol"), None);
}

#[test]
fn test_rejoin_keeps_slot_and_board() {
    let mut state = seated();
    state
        .place_ship("bob", ShipPlacement::new(ShipType::Cruiser, Coord::new(4, 4), Orientation::Vertical))
        .unwrap();
    assert_eq!(state.remove_player("bob"), Some(Slot::Two));
    assert!(!state.player(Slot::Two).unwrap().connected);
    let board = state.board("bob").unwrap().clone();

    assert_eq!(state.add_player("bob"), Ok(Slot::Two));
    assert!(state.player(Slot::Two).unwrap().connected);
    assert_eq!(state.board("bob").unwrap(), &board);
    assert_eq!(state.remove_player("nobody"), None);
}

#[test]
fn test_setup_rejections() {
    let mut state = GameState::new("TEST01", GameMode::Multiplayer);
    state.add_player("alice").unwrap();
    let carrier = ShipPlacement::new(ShipType::Carrier, Coord::new(0, 0), Orientation::Horizontal);
    assert_eq!(state.place_ship("alice", carrier), Err(GameError::PhaseViolation));

    state.add_player("bob").unwrap();
    assert_eq!(state.place_ship("carol", carrier), Err(GameError::PlayerNotFound));
    state.place_ship("alice", carrier).unwrap();
    assert_eq!(state.place_ship("alice", carrier), Err(GameError::ShipAlreadyPlaced));
    assert_eq!(
        state.remove_ship("alice", ShipType::Destroyer),
        Err(GameError::ShipNotFound)
    );
    assert_eq!(state.set_player_ready("alice"), Err(GameError::FleetIncomplete));
    assert_eq!(state.fire_shot("alice", Coord::new(0, 0)).unwrap_err(), GameError::PhaseViolation);
}

#[test]
fn test_full_fleet_marks_ready_and_removal_clears_it() {
    let mut state = seated();
    for p in fleet() {
        state.place_ship("alice", p).unwrap();
    }
    assert!(state.player(Slot::One).unwrap().ready);
    // ready alone does not start the game
    assert_eq!(state.phase, GamePhase::Setup);

    state.remove_ship("alice", ShipType::Submarine).unwrap();
    assert!(!state.player(Slot::One).unwrap().ready);
    assert_eq!(state.board("alice").unwrap().cell(Coord::new(6, 0)), Some(CellState::Empty));
}

#[test]
fn test_both_ready_starts_with_slot_one() {
    let state = playing();
    assert_eq!(state.phase, GamePhase::Playing);
    assert_eq!(state.current_turn.as_deref(), Some("alice"));
}

#[test]
fn test_turns_alternate() {
    let mut state = playing();
    assert_eq!(state.fire_shot("bob", Coord::new(9, 9)).unwrap_err(), GameError::NotYourTurn);

    let report = state.fire_shot("alice", Coord::new(9, 9)).unwrap();
    assert_eq!(report.outcome, ShotOutcome::Miss);
    assert!(!report.game_over);
    assert_eq!(state.current_turn.as_deref(), Some("bob"));

    let report = state.fire_shot("bob", Coord::new(0, 0)).unwrap();
    assert_eq!(report.outcome, ShotOutcome::Hit);
    // a hit still passes the turn
    assert_eq!(state.current_turn.as_deref(), Some("alice"));
}

#[test]
fn test_repeat_and_out_of_bounds_shots_are_rejected() {
    let mut state = playing();
    state.fire_shot("alice", Coord::new(9, 9)).unwrap();
    state.fire_shot("bob", Coord::new(9, 9)).unwrap();

    let before = state.clone();
    assert_eq!(
        state.fire_shot("alice", Coord::new(9, 9)).unwrap_err(),
        GameError::CellAlreadyTargeted
    );
    assert_eq!(
        state.fire_shot("alice", Coord::new(10, 3)).unwrap_err(),
        GameError::OutOfBounds
    );
    assert_eq!(state, before);
    assert_eq!(state.current_turn.as_deref(), Some("alice"));
}

#[test]
fn test_last_ship_ends_game() {
    let mut state = playing();
    let targets = fleet_cells();
    let mut water = open_water().into_iter();
    let (last, rest) = targets.split_last().unwrap();
    for coord in rest {
        let report = state.fire_shot("alice", *coord).unwrap();
        assert!(!report.game_over);
        state.fire_shot("bob", water.next().unwrap()).unwrap();
    }
    assert!(!state.board("bob").unwrap().all_ships_sunk);

    let report = state.fire_shot("alice", *last).unwrap();
    assert_eq!(report.outcome, ShotOutcome::Sunk(ShipType::Destroyer));
    assert!(report.game_over);
    assert_eq!(report.winner.as_deref(), Some("alice"));
    assert!(state.board("bob").unwrap().all_ships_sunk);
    assert_eq!(state.phase, GamePhase::Finished);
    assert_eq!(state.winner.as_deref(), Some("alice"));
    assert_eq!(state.current_turn.as_deref(), Some("alice"));

    assert_eq!(state.fire_shot("alice", Coord::new(9, 9)).unwrap_err(), GameError::PhaseViolation);
}

#[test]
fn test_single_ship_board_ends_game() {
    let mut state = playing();
    let mut lone = PlayerBoard::new();
    lone.place(ShipPlacement::new(ShipType::Carrier, Coord::new(0, 0), Orientation::Horizontal))
        .unwrap();
    state.slots[1].as_mut().unwrap().board = lone;

    for c in 0..4 {
        assert_eq!(state.fire_shot("alice", Coord::new(0, c)).unwrap().outcome, ShotOutcome::Hit);
        state.fire_shot("bob", Coord::new(9, c)).unwrap();
    }
    let report = state.fire_shot("alice", Coord::new(0, 4)).unwrap();
    assert_eq!(report.outcome, ShotOutcome::Sunk(ShipType::Carrier));
    assert!(report.game_over);
    assert_eq!(state.winner.as_deref(), Some("alice"));
}

#[test]
fn test_reset_keeps_seats() {
    let mut state = playing();
    state.fire_shot("alice", Coord::new(0, 0)).unwrap();
    state.remove_player("bob");
    state.reset_game();

    assert_eq!(state.phase, GamePhase::Setup);
    assert_eq!(state.current_turn, None);
    assert_eq!(state.winner, None);
    for slot in [Slot::One, Slot::Two] {
        let seat = state.seat(slot).unwrap();
        assert!(!seat.player.ready);
        assert_eq!(seat.board, PlayerBoard::new());
    }
    assert!(state.player(Slot::One).unwrap().connected);
    assert!(!state.player(Slot::Two).unwrap().connected);
    assert_eq!(state.slot_of("bob"), Some(Slot::Two));
}

#[test]
fn test_client_view_is_relative_and_redacted() {
    let mut state = playing();
    state.fire_shot("alice", Coord::new(0, 0)).unwrap();

    let alice = state.client_view("alice").unwrap();
    assert_eq!(alice.player_number, 1);
    assert!(!alice.is_your_turn);
    assert_eq!(alice.turn, Some(Perspective::Opponent));
    assert!(alice.opponent_ready);
    assert!(alice.opponent_connected);
    assert!(!alice.is_ai_opponent);
    assert_eq!(alice.your_board.cell(Coord::new(0, 0)), Some(CellState::Ship));
    assert_eq!(alice.opponent_board.cell(Coord::new(0, 0)), Some(CellState::Hit));
    assert_eq!(alice.opponent_board.cell(Coord::new(0, 1)), Some(CellState::Empty));
    assert!(alice.opponent_board.ships.iter().all(|s| s.coords.is_empty()));

    let bob = state.client_view("bob").unwrap();
    assert_eq!(bob.player_number, 2);
    assert!(bob.is_your_turn);
    assert_eq!(bob.turn, Some(Perspective::You));
    assert_eq!(bob.your_board.cell(Coord::new(0, 0)), Some(CellState::Hit));

    assert_eq!(state.client_view("carol").unwrap_err(), GameError::PlayerNotFound);
}

#[test]
fn test_client_view_before_opponent_arrives() {
    let mut state = GameState::new("TEST01", GameMode::Multiplayer);
    state.add_player("alice").unwrap();
    let view = state.client_view("alice").unwrap();
    assert_eq!(view.phase, GamePhase::Waiting);
    assert!(!view.opponent_connected);
    assert!(!view.opponent_ready);
    assert_eq!(view.turn, None);
    assert_eq!(view.winner, None);
}
