//! Turn management for one match: participants, their boards and whose turn
//! it is.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::board::Board;
use crate::common::{AttackResult, SessionError};
use crate::config::PLAYERS_PER_MATCH;
use crate::ship::{Coordinate, Orientation, ShipClass};

/// Opaque participant identity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(transparent))]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        PlayerId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Fewer participants than the match needs.
    Forming,
    /// Turns proceed.
    Active,
    /// A board was defeated. Terminal.
    Finished { winner: PlayerId },
}

/// A resolved attack, as seen by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackOutcome {
    pub result: AttackResult,
    /// Set when this attack sank the defender's last ship.
    pub defender_defeated: bool,
}

/// Shared state of one match.
pub struct Session {
    boards: BTreeMap<PlayerId, Board>,
    order: Vec<PlayerId>,
    turn: usize,
    capacity: usize,
    winner: Option<PlayerId>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// A session for the standard two-player match.
    pub fn new() -> Self {
        Self::with_capacity(PLAYERS_PER_MATCH)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Session {
            boards: BTreeMap::new(),
            order: Vec::with_capacity(capacity),
            turn: 0,
            capacity,
            winner: None,
        }
    }

    pub fn state(&self) -> SessionState {
        match &self.winner {
            Some(winner) => SessionState::Finished {
                winner: winner.clone(),
            },
            None if self.order.len() < self.capacity => SessionState::Forming,
            None => SessionState::Active,
        }
    }

    /// Participants in join order, which is also turn order.
    pub fn participants(&self) -> &[PlayerId] {
        &self.order
    }

    pub fn is_full(&self) -> bool {
        self.order.len() >= self.capacity
    }

    pub fn winner(&self) -> Option<&PlayerId> {
        self.winner.as_ref()
    }

    pub fn board(&self, id: &PlayerId) -> Option<&Board> {
        self.boards.get(id)
    }

    /// Attach a fresh, empty board for `id` and append it to the turn order.
    pub fn add_participant(&mut self, id: PlayerId) -> Result<(), SessionError> {
        if self.boards.contains_key(&id) {
            return Err(SessionError::DuplicateParticipant);
        }
        if self.is_full() {
            return Err(SessionError::SessionFull);
        }
        self.boards.insert(id.clone(), Board::new());
        self.order.push(id);
        Ok(())
    }

    /// Participant holding the turn, or `None` before anyone joined.
    pub fn current_participant(&self) -> Option<&PlayerId> {
        if self.order.is_empty() {
            return None;
        }
        self.order.get(self.turn % self.order.len())
    }

    /// Pass the turn to the next participant in join order.
    pub fn advance_turn(&mut self) {
        if !self.order.is_empty() {
            self.turn = (self.turn + 1) % self.order.len();
        }
    }

    /// The opponent paired with `id` when the match formed.
    pub fn opponent_of(&self, id: &PlayerId) -> Result<&PlayerId, SessionError> {
        if !self.boards.contains_key(id) {
            return Err(SessionError::UnknownParticipant);
        }
        self.order
            .iter()
            .find(|other| *other != id)
            .ok_or(SessionError::AwaitingOpponent)
    }

    /// Place a ship on the participant's own board.
    pub fn place_ship(
        &mut self,
        id: &PlayerId,
        class: ShipClass,
        start: Coordinate,
        orientation: Orientation,
    ) -> Result<(), SessionError> {
        if self.winner.is_some() {
            return Err(SessionError::MatchOver);
        }
        let board = self
            .boards
            .get_mut(id)
            .ok_or(SessionError::UnknownParticipant)?;
        board.place_ship(class, start, orientation)?;
        Ok(())
    }

    /// Fire at `target` on the defender's board on behalf of `attacker`.
    ///
    /// The turn advances only when the board accepts the attack. Sinking the
    /// defender's last ship finishes the session with the attacker as winner.
    pub fn resolve_attack(
        &mut self,
        attacker: &PlayerId,
        defender: &PlayerId,
        target: Coordinate,
    ) -> Result<AttackOutcome, SessionError> {
        if self.winner.is_some() {
            return Err(SessionError::MatchOver);
        }
        if self.current_participant() != Some(attacker) {
            return Err(SessionError::NotYourTurn);
        }
        let board = self
            .boards
            .get_mut(defender)
            .ok_or(SessionError::UnknownParticipant)?;
        let result = board.attack(target)?;
        let defender_defeated =
            matches!(result, AttackResult::Sunk(_)) && board.all_ships_sunk();

        self.advance_turn();
        if defender_defeated {
            self.winner = Some(attacker.clone());
        }
        Ok(AttackOutcome {
            result,
            defender_defeated,
        })
    }
}
