use battleship_arena::{
    AttackResult, Board, BoardError, Cell, Coordinate, Orientation, BOARD_SIZE, FLEET,
};
use proptest::prelude::*;
use rand::{rngs::SmallRng, Rng, SeedableRng};

fn random_board(seed: u64) -> Board {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut board = Board::new();
    for class in FLEET {
        let (start, orientation) = board.random_placement(&mut rng, class).unwrap();
        board.place_ship(class, start, orientation).unwrap();
    }
    let attacks = rng.random_range(0..BOARD_SIZE * 3);
    for _ in 0..attacks {
        let row = rng.random_range(0..BOARD_SIZE);
        let col = rng.random_range(0..BOARD_SIZE);
        let _ = board.attack(Coordinate::new(row, col));
    }
    board
}

fn orientation() -> impl Strategy<Value = Orientation> {
    prop_oneof![Just(Orientation::Horizontal), Just(Orientation::Vertical)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn placement_covers_exact_footprint(
        idx in 0..FLEET.len(),
        row in 0..BOARD_SIZE,
        col in 0..BOARD_SIZE,
        orientation in orientation(),
    ) {
        let class = FLEET[idx];
        let mut board = Board::new();
        let fits = match orientation {
            Orientation::Horizontal => col + class.length() <= BOARD_SIZE,
            Orientation::Vertical => row + class.length() <= BOARD_SIZE,
        };
        let placed = board.place_ship(class, Coordinate::new(row, col), orientation);
        if !fits {
            prop_assert_eq!(placed, Err(BoardError::OutOfBounds));
            prop_assert_eq!(board, Board::new());
            return Ok(());
        }
        prop_assert!(placed.is_ok());

        let expected: Vec<Coordinate> = (0..class.length())
            .map(|i| match orientation {
                Orientation::Horizontal => Coordinate::new(row, col + i),
                Orientation::Vertical => Coordinate::new(row + i, col),
            })
            .collect();
        prop_assert_eq!(board.ships()[0].remaining(), expected.as_slice());
        for r in 0..BOARD_SIZE {
            for c in 0..BOARD_SIZE {
                let at = Coordinate::new(r, c);
                let want = if expected.contains(&at) { Cell::Occupied } else { Cell::Empty };
                prop_assert_eq!(board.cell(at), Some(want));
            }
        }
    }

    #[test]
    fn ships_never_share_cells(seed in any::<u64>()) {
        let board = random_board(seed);
        let mut seen = Vec::new();
        for ship in board.ships() {
            prop_assert!(ship.remaining().len() <= ship.class().length());
            for at in ship.remaining() {
                prop_assert!(!seen.contains(at));
                seen.push(*at);
            }
        }
    }

    #[test]
    fn second_attack_rejected(seed in any::<u64>(), row in 0..BOARD_SIZE, col in 0..BOARD_SIZE) {
        let mut board = random_board(seed);
        let target = Coordinate::new(row, col);
        let _ = board.attack(target);
        let after_first = board.clone();
        prop_assert_eq!(board.attack(target), Err(BoardError::AlreadyAttacked));
        prop_assert_eq!(board, after_first);
    }

    #[test]
    fn sunk_matches_remaining_cells(seed in any::<u64>()) {
        let board = random_board(seed);
        let mut afloat = false;
        for ship in board.ships() {
            prop_assert_eq!(ship.is_sunk(), ship.remaining().is_empty());
            for at in ship.remaining() {
                prop_assert_eq!(board.cell(*at), Some(Cell::Occupied));
            }
            afloat |= !ship.is_sunk();
        }
        prop_assert_eq!(board.all_ships_sunk(), !afloat);
    }

    #[test]
    fn sweeping_the_board_sinks_everything(seed in any::<u64>()) {
        let mut board = random_board(seed);
        let mut sunk = 0;
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                if let Ok(AttackResult::Sunk(_)) = board.attack(Coordinate::new(row, col)) {
                    sunk += 1;
                }
            }
        }
        prop_assert!(board.all_ships_sunk());
        prop_assert!(sunk <= FLEET.len());
        prop_assert!(board.grid().iter().flatten().all(|c| c.is_attacked() || *c == Cell::Empty));
    }
}
