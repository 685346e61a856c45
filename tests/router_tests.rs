use battleship_arena::{
    AttackVerdict, CellView, ClientMessage, Coordinate, Envelope, MatchRouter, PlayerId,
    ServerMessage, SessionState,
};

fn p1() -> PlayerId {
    PlayerId::new("Player1")
}

fn p2() -> PlayerId {
    PlayerId::new("Player2")
}

fn place(ship: &str, orientation: Option<&str>, row: i64, col: i64) -> ClientMessage {
    ClientMessage::PlaceShip {
        ship: ship.to_string(),
        orientation: orientation.map(str::to_string),
        row,
        col,
    }
}

fn attack(row: i64, col: i64) -> ClientMessage {
    ClientMessage::Attack { row, col }
}

fn ready_router() -> MatchRouter {
    let mut router = MatchRouter::new();
    router.join(p1()).unwrap();
    router.join(p2()).unwrap();
    router
}

fn error_to(to: PlayerId, text: &str) -> Vec<Envelope> {
    vec![Envelope::new(to, ServerMessage::error(text))]
}

#[test]
fn test_join_announces_match() {
    let mut router = MatchRouter::new();
    let first = router.join(p1()).unwrap();
    assert_eq!(first.len(), 2);
    assert!(first.iter().all(|e| e.to == p1()));
    match &first[0].message {
        ServerMessage::UpdateBoard { board } => {
            assert_eq!(board.count(CellView::Water), 100);
        }
        other => panic!("expected update_board, got {:?}", other),
    }

    let second = router.join(p2()).unwrap();
    let ready = ServerMessage::log("Match ready: Player1 vs Player2. Player1 fires first");
    assert_eq!(second[2], Envelope::new(p1(), ready.clone()));
    assert_eq!(second[3], Envelope::new(p2(), ready));
    assert_eq!(router.session().state(), SessionState::Active);

    assert!(router.join(PlayerId::new("Player3")).is_err());
}

#[test]
fn test_place_ship_success() {
    let mut router = ready_router();
    let out = router.route(&p1(), place("destroyer", None, 0, 0));
    assert_eq!(out.len(), 2);
    let ServerMessage::UpdateBoard { board } = &out[0].message else {
        panic!("expected update_board, got {:?}", out[0].message);
    };
    assert_eq!(out[0].to, p1());
    assert_eq!(board.cell(Coordinate::new(0, 0)), Some(CellView::Ship));
    assert_eq!(board.cell(Coordinate::new(0, 1)), Some(CellView::Ship));
    assert_eq!(board.count(CellView::Ship), 2);
    assert_eq!(
        out[1],
        Envelope::new(p1(), ServerMessage::log("Successfully placed destroyer at (0, 0)"))
    );
}

#[test]
fn test_place_ship_vertical() {
    let mut router = ready_router();
    let out = router.route(&p2(), place("cruiser", Some("vertical"), 7, 9));
    let ServerMessage::UpdateBoard { board } = &out[0].message else {
        panic!("expected update_board");
    };
    for row in 7..10 {
        assert_eq!(board.cell(Coordinate::new(row, 9)), Some(CellView::Ship));
    }
    assert_eq!(board.count(CellView::Ship), 3);
}

#[test]
fn test_place_ship_failures() {
    let mut router = ready_router();
    assert_eq!(
        router.route(&p1(), place("carrier", Some("vertical"), 8, 0)),
        error_to(p1(), "coordinate out of bounds")
    );
    assert_eq!(
        router.route(&p1(), place("carrier", None, -1, 0)),
        error_to(p1(), "coordinate out of bounds")
    );

    router.route(&p1(), place("battleship", None, 3, 3));
    assert_eq!(
        router.route(&p1(), place("submarine", Some("vertical"), 1, 4)),
        error_to(p1(), "ship placement overlaps with another ship")
    );
    assert_eq!(
        router.session().board(&p1()).unwrap().placed_count(),
        1
    );
}

#[test]
fn test_unknown_ship_gets_no_reply() {
    let mut router = ready_router();
    assert!(router.route(&p1(), place("rowboat", None, 0, 0)).is_empty());
    assert_eq!(router.session().board(&p1()).unwrap().placed_count(), 0);
}

#[test]
fn test_unrecognized_gets_no_reply() {
    let mut router = ready_router();
    assert!(router.route(&p2(), ClientMessage::Unrecognized).is_empty());
}

#[test]
fn test_attack_replies() {
    let mut router = ready_router();
    router.route(&p2(), place("destroyer", None, 0, 0));

    let out = router.route(&p1(), attack(0, 0));
    assert_eq!(out.len(), 2);
    assert_eq!(
        out[0],
        Envelope::new(
            p1(),
            ServerMessage::AttackResult {
                row: 0,
                col: 0,
                result: AttackVerdict::Hit
            }
        )
    );
    assert_eq!(out[1].to, p2());
    let ServerMessage::UpdateBoard { board } = &out[1].message else {
        panic!("expected update_board");
    };
    assert_eq!(board.cell(Coordinate::new(0, 0)), Some(CellView::Hit));
    assert_eq!(board.cell(Coordinate::new(0, 1)), Some(CellView::Ship));

    let out = router.route(&p2(), attack(4, 6));
    assert_eq!(
        out[0].message,
        ServerMessage::AttackResult {
            row: 4,
            col: 6,
            result: AttackVerdict::Miss
        }
    );
    let ServerMessage::UpdateBoard { board } = &out[1].message else {
        panic!("expected update_board");
    };
    assert_eq!(out[1].to, p1());
    assert_eq!(board.cell(Coordinate::new(4, 6)), Some(CellView::Miss));
}

#[test]
fn test_attack_errors_go_to_attacker_only() {
    let mut router = ready_router();
    assert_eq!(router.route(&p2(), attack(1, 1)), error_to(p2(), "it's not your turn"));
    assert_eq!(
        router.route(&p1(), attack(10, 3)),
        error_to(p1(), "coordinate out of bounds")
    );
    assert_eq!(
        router.route(&p1(), attack(0, -2)),
        error_to(p1(), "coordinate out of bounds")
    );

    router.route(&p1(), attack(1, 1));
    router.route(&p2(), attack(1, 1));
    assert_eq!(router.route(&p1(), attack(1, 1)), error_to(p1(), "cell already attacked"));
}

#[test]
fn test_attack_before_opponent_joins() {
    let mut router = MatchRouter::new();
    router.join(p1()).unwrap();
    assert_eq!(
        router.route(&p1(), attack(0, 0)),
        error_to(p1(), "waiting for an opponent to join")
    );
    assert_eq!(
        router.route(&PlayerId::new("stranger"), attack(0, 0)),
        error_to(PlayerId::new("stranger"), "player does not exist")
    );
}

#[test]
fn test_final_sink_ends_match() {
    let mut router = ready_router();
    router.route(&p2(), place("destroyer", Some("vertical"), 5, 5));

    router.route(&p1(), attack(5, 5));
    router.route(&p2(), attack(0, 0));
    let out = router.route(&p1(), attack(6, 5));
    assert_eq!(out.len(), 4);
    assert_eq!(
        out[0].message,
        ServerMessage::AttackResult {
            row: 6,
            col: 5,
            result: AttackVerdict::Sunk
        }
    );
    let game_over = ServerMessage::GameOver { winner: p1() };
    assert_eq!(out[2], Envelope::new(p1(), game_over.clone()));
    assert_eq!(out[3], Envelope::new(p2(), game_over));
    assert_eq!(
        router.session().state(),
        SessionState::Finished { winner: p1() }
    );

    assert_eq!(router.route(&p2(), attack(3, 3)), error_to(p2(), "the match is over"));
}

#[test]
fn test_leave_notifies_opponent() {
    let mut router = ready_router();
    assert_eq!(
        router.leave(&p1()),
        vec![Envelope::new(p2(), ServerMessage::log("Player1 disconnected"))]
    );

    let mut lonely = MatchRouter::new();
    lonely.join(p1()).unwrap();
    assert!(lonely.leave(&p1()).is_empty());
}

#[test]
fn test_defender_view_gains_one_mark_per_attack() {
    let mut router = ready_router();
    router.route(&p2(), place("battleship", Some("vertical"), 2, 2));

    let mut marks = 0;
    for (attacker, row, col) in [(p1(), 2, 2), (p2(), 0, 0), (p1(), 9, 9), (p2(), 1, 1), (p1(), 3, 2)] {
        let out = router.route(&attacker, attack(row, col));
        if attacker != p1() {
            continue;
        }
        let ServerMessage::UpdateBoard { board } = &out[1].message else {
            panic!("expected update_board for the defender");
        };
        marks += 1;
        assert_eq!(board.count(CellView::Hit) + board.count(CellView::Miss), marks);
    }
}

#[test]
fn test_turn_checked_before_coordinates() {
    let mut router = ready_router();
    for (row, col) in [(-1, 0), (0, -1), (10, 0)] {
        assert_eq!(
            router.route(&p2(), attack(row, col)),
            error_to(p2(), "it's not your turn")
        );
    }
    assert_eq!(
        router.route(&p1(), attack(-1, 0)),
        error_to(p1(), "coordinate out of bounds")
    );
    assert_eq!(
        router.route(&PlayerId::new("stranger"), place("cruiser", None, -3, 0)),
        error_to(PlayerId::new("stranger"), "player does not exist")
    );
}

#[test]
fn test_finished_match_reported_before_coordinates() {
    let mut router = ready_router();
    router.route(&p2(), place("destroyer", None, 0, 0));
    router.route(&p1(), attack(0, 0));
    router.route(&p2(), attack(5, 5));
    router.route(&p1(), attack(0, 1));
    assert_eq!(
        router.session().state(),
        SessionState::Finished { winner: p1() }
    );

    assert_eq!(router.route(&p2(), attack(-1, 0)), error_to(p2(), "the match is over"));
    assert_eq!(
        router.route(&p1(), place("cruiser", Some("vertical"), 0, -4)),
        error_to(p1(), "the match is over")
    );
}
