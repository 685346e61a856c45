//! Translates inbound client messages into session operations and decides
//! which participants hear about the result.

use log::{debug, info, warn};

use crate::common::SessionError;
use crate::config::ship_class;
use crate::protocol::{BoardView, ClientMessage, ServerMessage};
use crate::session::{AttackOutcome, PlayerId, Session, SessionState};
use crate::ship::{Coordinate, Orientation};

/// An outbound message addressed to one participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub to: PlayerId,
    pub message: ServerMessage,
}

impl Envelope {
    pub fn new(to: PlayerId, message: ServerMessage) -> Self {
        Self { to, message }
    }
}

/// Message routing for a single match.
///
/// The router performs no I/O. Each call returns the envelopes the caller
/// must deliver, in order.
#[derive(Default)]
pub struct MatchRouter {
    session: Session,
}

impl MatchRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Seat a new participant. The newcomer receives its empty board; once
    /// the match is full both participants learn who fires first.
    pub fn join(&mut self, id: PlayerId) -> Result<Vec<Envelope>, SessionError> {
        self.session.add_participant(id.clone())?;
        info!("{} joined the match", id);

        let mut out = Vec::new();
        if let Some(board) = self.session.board(&id) {
            out.push(Envelope::new(
                id.clone(),
                ServerMessage::UpdateBoard {
                    board: BoardView::own(board),
                },
            ));
        }
        out.push(Envelope::new(
            id.clone(),
            ServerMessage::log(format!("Welcome {}, place your fleet", id)),
        ));

        if self.session.state() == SessionState::Active {
            let first = self
                .session
                .current_participant()
                .map(ToString::to_string)
                .unwrap_or_default();
            let roster = self
                .session
                .participants()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" vs ");
            let text = format!("Match ready: {}. {} fires first", roster, first);
            info!("{}", text);
            for participant in self.session.participants() {
                out.push(Envelope::new(participant.clone(), ServerMessage::log(text.clone())));
            }
        }
        Ok(out)
    }

    /// A participant's connection went away. The session and turn are left
    /// as they are; the opponent is told.
    pub fn leave(&mut self, id: &PlayerId) -> Vec<Envelope> {
        info!("{} disconnected", id);
        match self.session.opponent_of(id) {
            Ok(opponent) => vec![Envelope::new(
                opponent.clone(),
                ServerMessage::log(format!("{} disconnected", id)),
            )],
            Err(_) => Vec::new(),
        }
    }

    /// Handle one inbound message from `sender`.
    pub fn route(&mut self, sender: &PlayerId, msg: ClientMessage) -> Vec<Envelope> {
        match msg {
            ClientMessage::PlaceShip {
                ship,
                orientation,
                row,
                col,
            } => self.place_ship(sender, &ship, orientation.as_deref(), row, col),
            ClientMessage::Attack { row, col } => self.attack(sender, row, col),
            ClientMessage::Unrecognized => {
                warn!("ignoring unrecognized message from {}", sender);
                Vec::new()
            }
        }
    }

    fn place_ship(
        &mut self,
        sender: &PlayerId,
        ship: &str,
        orientation: Option<&str>,
        row: i64,
        col: i64,
    ) -> Vec<Envelope> {
        let Some(class) = ship_class(ship) else {
            warn!("ignoring unknown ship type {:?} from {}", ship, sender);
            return Vec::new();
        };
        let orientation = Orientation::from_wire(orientation);

        let start = Coordinate::from_signed(row, col);
        if let Err(e) = self.session.place_ship(sender, class, start, orientation) {
            info!("{} failed to place {} at ({}, {}): {}", sender, ship, row, col, e);
            return vec![Envelope::new(sender.clone(), ServerMessage::error(e))];
        }

        debug!("{} placed {} at ({}, {}) {:?}", sender, ship, row, col, orientation);
        let mut out = Vec::with_capacity(2);
        if let Some(board) = self.session.board(sender) {
            out.push(Envelope::new(
                sender.clone(),
                ServerMessage::UpdateBoard {
                    board: BoardView::own(board),
                },
            ));
        }
        out.push(Envelope::new(
            sender.clone(),
            ServerMessage::log(format!("Successfully placed {} at ({}, {})", ship, row, col)),
        ));
        out
    }

    fn attack(&mut self, sender: &PlayerId, row: i64, col: i64) -> Vec<Envelope> {
        let (defender, target, outcome) = match self.resolve_attack(sender, row, col) {
            Ok(resolved) => resolved,
            Err(e) => {
                info!("{} attack at ({}, {}) rejected: {}", sender, row, col, e);
                return vec![Envelope::new(sender.clone(), ServerMessage::error(e))];
            }
        };
        info!(
            "{} attacked {} at {}: {:?}",
            sender, defender, target, outcome.result
        );

        let mut out = vec![Envelope::new(
            sender.clone(),
            ServerMessage::AttackResult {
                row: target.row,
                col: target.col,
                result: outcome.result.into(),
            },
        )];
        if let Some(board) = self.session.board(&defender) {
            debug!("{} now sees {:?}", sender, BoardView::opponent(board));
            out.push(Envelope::new(
                defender.clone(),
                ServerMessage::UpdateBoard {
                    board: BoardView::own(board),
                },
            ));
        }
        if outcome.defender_defeated {
            info!("{} wins the match against {}", sender, defender);
            for id in [sender, &defender] {
                out.push(Envelope::new(
                    id.clone(),
                    ServerMessage::GameOver {
                        winner: sender.clone(),
                    },
                ));
            }
        }
        out
    }

    fn resolve_attack(
        &mut self,
        sender: &PlayerId,
        row: i64,
        col: i64,
    ) -> Result<(PlayerId, Coordinate, AttackOutcome), SessionError> {
        let defender = self.session.opponent_of(sender)?.clone();
        let target = Coordinate::from_signed(row, col);
        let outcome = self.session.resolve_attack(sender, &defender, target)?;
        Ok((defender, target, outcome))
    }
}
