use shipwrecker::{
    validate_placement, CellState, Coord, GameError, Orientation, PlayerBoard, ShipPlacement,
    ShipType, ShotOutcome,
};

fn place(board: &mut PlayerBoard, ship_type: ShipType, row: usize, col: usize, o: Orientation) {
    board
        .place(ShipPlacement::new(ship_type, Coord::new(row, col), o))
        .unwrap();
}

#[test]
fn test_empty_board() {
    let board = PlayerBoard::new();
    assert!(board.grid.iter().flatten().all(|c| *c == CellState::Empty));
    assert!(board.ships.is_empty());
    assert!(!board.all_ships_sunk);
    assert_eq!(board.untried_cells().len(), 100);
}

#[test]
fn test_validate_placement_errors() {
    let mut board = PlayerBoard::new();
    place(&mut board, ShipType::Carrier, 0, 0, Orientation::Horizontal);

    assert_eq!(
        validate_placement(ShipType::Carrier, Coord::new(5, 5), Orientation::Vertical, &board.ships),
        Err(GameError::ShipAlreadyPlaced)
    );
    assert_eq!(
        validate_placement(ShipType::Battleship, Coord::new(0, 7), Orientation::Horizontal, &board.ships),
        Err(GameError::OutOfBounds)
    );
    assert_eq!(
        validate_placement(ShipType::Battleship, Coord::new(12, 0), Orientation::Vertical, &board.ships),
        Err(GameError::OutOfBounds)
    );
    assert_eq!(
        validate_placement(ShipType::Destroyer, Coord::new(0, 4), Orientation::Vertical, &board.ships),
        Err(GameError::Overlap)
    );
    assert_eq!(
        validate_placement(ShipType::Destroyer, Coord::new(1, 4), Orientation::Vertical, &board.ships),
        Ok(vec![Coord::new(1, 4), Coord::new(2, 4)])
    );
}

#[test]
fn test_huge_start_coordinates_are_out_of_bounds() {
    let mut board = PlayerBoard::new();
    for (start, orientation) in [
        (Coord::new(0, usize::MAX), Orientation::Horizontal),
        (Coord::new(usize::MAX, 0), Orientation::Vertical),
        (Coord::new(usize::MAX - 2, usize::MAX - 2), Orientation::Vertical),
        (Coord::new(3, usize::MAX - 1), Orientation::Horizontal),
    ] {
        assert_eq!(
            validate_placement(ShipType::Carrier, start, orientation, &board.ships),
            Err(GameError::OutOfBounds)
        );
        assert_eq!(
            board.place(ShipPlacement::new(ShipType::Carrier, start, orientation)),
            Err(GameError::OutOfBounds)
        );
    }
    assert!(board.ships.is_empty());
}

#[test]
fn test_failed_placement_leaves_board_untouched() {
    let mut board = PlayerBoard::new();
    place(&mut board, ShipType::Cruiser, 3, 3, Orientation::Vertical);
    let before = board.clone();
    let err = board
        .place(ShipPlacement::new(ShipType::Submarine, Coord::new(4, 1), Orientation::Horizontal))
        .unwrap_err();
    assert_eq!(err, GameError::Overlap);
    assert_eq!(board, before);
}

#[test]
fn test_place_paints_and_remove_restores() {
    let mut board = PlayerBoard::new();
    place(&mut board, ShipType::Battleship, 2, 6, Orientation::Vertical);
    for r in 2..6 {
        assert_eq!(board.cell(Coord::new(r, 6)), Some(CellState::Ship));
    }
    let ship = board.remove(ShipType::Battleship).unwrap();
    assert_eq!(ship.coords.len(), 4);
    assert!(board.grid.iter().flatten().all(|c| *c == CellState::Empty));
    assert_eq!(board.remove(ShipType::Battleship), Err(GameError::ShipNotFound));
}

#[test]
fn test_carrier_sinks_on_fifth_hit() {
    let mut board = PlayerBoard::new();
    place(&mut board, ShipType::Carrier, 0, 0, Orientation::Horizontal);

    for c in 0..4 {
        assert_eq!(board.apply_shot(Coord::new(0, c)), ShotOutcome::Hit);
        assert!(!board.ships[0].sunk);
        assert_eq!(board.cell(Coord::new(0, c)), Some(CellState::Hit));
        assert!(!board.all_ships_sunk);
    }
    assert_eq!(
        board.apply_shot(Coord::new(0, 4)),
        ShotOutcome::Sunk(ShipType::Carrier)
    );
    assert!(board.ships[0].sunk);
    assert_eq!(board.ships[0].hits, 5);
    for c in 0..5 {
        assert_eq!(board.cell(Coord::new(0, c)), Some(CellState::Sunk));
    }
    assert!(board.all_ships_sunk);
}

#[test]
fn test_miss_marks_cell() {
    let mut board = PlayerBoard::new();
    place(&mut board, ShipType::Destroyer, 0, 0, Orientation::Horizontal);
    assert_eq!(board.apply_shot(Coord::new(5, 5)), ShotOutcome::Miss);
    assert_eq!(board.cell(Coord::new(5, 5)), Some(CellState::Miss));
    assert!(!board.is_untried(Coord::new(5, 5)));
    assert_eq!(board.ships[0].hits, 0);
}

#[test]
fn test_redaction_hides_unsunk_ships() {
    let mut board = PlayerBoard::new();
    place(&mut board, ShipType::Carrier, 0, 0, Orientation::Horizontal);
    place(&mut board, ShipType::Destroyer, 5, 5, Orientation::Vertical);
    board.apply_shot(Coord::new(0, 2));
    board.apply_shot(Coord::new(5, 5));
    board.apply_shot(Coord::new(6, 5));
    board.apply_shot(Coord::new(9, 9));

    let view = board.redact_for_opponent();
    assert!(view.grid.iter().flatten().all(|c| *c != CellState::Ship));
    assert_eq!(view.cell(Coord::new(0, 2)), Some(CellState::Hit));
    assert_eq!(view.cell(Coord::new(0, 3)), Some(CellState::Empty));
    assert_eq!(view.cell(Coord::new(5, 5)), Some(CellState::Sunk));
    assert_eq!(view.cell(Coord::new(9, 9)), Some(CellState::Miss));

    let carrier = view.ship(ShipType::Carrier).unwrap();
    assert!(carrier.coords.is_empty());
    assert_eq!(carrier.hits, 1);
    let destroyer = view.ship(ShipType::Destroyer).unwrap();
    assert_eq!(destroyer.coords, vec![Coord::new(5, 5), Coord::new(6, 5)]);

    // the owner's board is unchanged
    assert_eq!(board.cell(Coord::new(0, 3)), Some(CellState::Ship));
    assert_eq!(board.ship(ShipType::Carrier).unwrap().coords.len(), 5);
}

#[test]
fn test_remaining_ship_types_skip_sunk() {
    let mut board = PlayerBoard::new();
    place(&mut board, ShipType::Destroyer, 0, 0, Orientation::Horizontal);
    board.apply_shot(Coord::new(0, 0));
    board.apply_shot(Coord::new(0, 1));
    let remaining: Vec<_> = board.redact_for_opponent().remaining_ship_types().collect();
    assert_eq!(
        remaining,
        vec![
            ShipType::Carrier,
            ShipType::Battleship,
            ShipType::Cruiser,
            ShipType::Submarine
        ]
    );
}
