use battleship_arena::{
    AttackResult, Coordinate, PlayerId, Session, SessionError, SessionState, FLEET,
};
use proptest::prelude::*;
use rand::{rngs::SmallRng, SeedableRng};

fn players() -> [PlayerId; 2] {
    [PlayerId::new("Player1"), PlayerId::new("Player2")]
}

fn fleet_session(seed: u64) -> Session {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut session = Session::new();
    for id in players() {
        session.add_participant(id.clone()).unwrap();
        for class in FLEET {
            let board = session.board(&id).unwrap();
            let (start, orientation) = board.random_placement(&mut rng, class).unwrap();
            session.place_ship(&id, class, start, orientation).unwrap();
        }
    }
    session
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn turn_advances_only_on_accepted_attacks(
        seed in any::<u64>(),
        moves in prop::collection::vec((any::<bool>(), 0..12usize, 0..12usize), 1..300),
    ) {
        let mut session = fleet_session(seed);
        let [p1, p2] = players();
        for (second, row, col) in moves {
            let (attacker, defender) = if second { (&p2, &p1) } else { (&p1, &p2) };
            let before_turn = session.current_participant().cloned();
            let before_board = session.board(defender).unwrap().clone();
            let finished = session.winner().is_some();

            match session.resolve_attack(attacker, defender, Coordinate::new(row, col)) {
                Ok(outcome) => {
                    prop_assert!(!finished);
                    prop_assert_eq!(before_turn.as_ref(), Some(attacker));
                    prop_assert_eq!(session.current_participant(), Some(defender));
                    let defeated = session.board(defender).unwrap().all_ships_sunk();
                    prop_assert_eq!(outcome.defender_defeated, defeated);
                    if defeated {
                        prop_assert!(matches!(outcome.result, AttackResult::Sunk(_)));
                        prop_assert_eq!(
                            session.state(),
                            SessionState::Finished { winner: attacker.clone() }
                        );
                    }
                }
                Err(e) => {
                    if finished {
                        prop_assert_eq!(e, SessionError::MatchOver);
                    }
                    prop_assert_eq!(session.current_participant().cloned(), before_turn);
                    prop_assert_eq!(session.board(defender).unwrap(), &before_board);
                }
            }
        }
    }
}
