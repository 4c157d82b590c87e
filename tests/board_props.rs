use proptest::prelude::*;
use rand::{rngs::SmallRng, SeedableRng};
use shipwrecker::{CellState, Coord, PlayerBoard, ShotOutcome, NUM_SHIPS, TOTAL_SHIP_CELLS};

fn random_board(seed: u64) -> PlayerBoard {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut board = PlayerBoard::new();
    board.auto_place_fleet(&mut rng);
    board
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn random_fleet_never_overlaps(seed in any::<u64>()) {
        let board = random_board(seed);
        prop_assert_eq!(board.ships.len(), NUM_SHIPS);
        prop_assert!(board.has_full_fleet());
        let mut cells: Vec<Coord> = board.ships.iter().flat_map(|s| s.coords.clone()).collect();
        cells.sort();
        cells.dedup();
        prop_assert_eq!(cells.len(), TOTAL_SHIP_CELLS);
        let painted = board.grid.iter().flatten().filter(|c| **c == CellState::Ship).count();
        prop_assert_eq!(painted, TOTAL_SHIP_CELLS);
        for ship in &board.ships {
            prop_assert_eq!(ship.coords.len(), ship.length());
            prop_assert!(ship.coords.iter().all(|c| c.in_bounds()));
        }
    }

    #[test]
    fn ship_sinks_exactly_on_last_hit(seed in any::<u64>()) {
        let mut board = random_board(seed);
        let ships = board.ships.clone();
        for (n, ship) in ships.iter().enumerate() {
            let (last, rest) = ship.coords.split_last().unwrap();
            for c in rest {
                prop_assert_eq!(board.apply_shot(*c), ShotOutcome::Hit);
            }
            prop_assert!(!board.ship(ship.ship_type).unwrap().sunk);
            prop_assert!(!board.all_ships_sunk);
            prop_assert_eq!(board.apply_shot(*last), ShotOutcome::Sunk(ship.ship_type));
            for c in &ship.coords {
                prop_assert_eq!(board.cell(*c), Some(CellState::Sunk));
            }
            prop_assert_eq!(board.all_ships_sunk, n + 1 == ships.len());
        }
    }

    #[test]
    fn redaction_exposes_only_sunk_ships(seed in any::<u64>(), shots in prop::collection::vec((0usize..10, 0usize..10), 0..60)) {
        let mut board = random_board(seed);
        for (r, c) in shots {
            let coord = Coord::new(r, c);
            if board.is_untried(coord) {
                board.apply_shot(coord);
            }
        }
        let view = board.redact_for_opponent();
        for ship in &view.ships {
            if ship.sunk {
                prop_assert_eq!(ship.coords.len(), ship.length());
            } else {
                prop_assert!(ship.coords.is_empty());
            }
        }
        prop_assert!(view.grid.iter().flatten().all(|c| *c != CellState::Ship));
    }
}
