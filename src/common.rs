//! Common types: attack results and the errors raised by boards and sessions.

use core::fmt;

/// Outcome of a valid attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackResult {
    /// Attack struck a ship that still has cells afloat.
    Hit,
    /// Attack landed on open water.
    Miss,
    /// Attack struck the last remaining cell of a ship, carrying its name.
    Sunk(&'static str),
}

/// Errors returned by Board operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    /// Ship length must be positive.
    InvalidLength,
    /// A placement or attack target lies outside the grid.
    OutOfBounds,
    /// Ship placement overlaps another ship.
    Overlap,
    /// The targeted cell was already hit or missed.
    AlreadyAttacked,
    /// Random placement found no free position.
    NoRoom,
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::InvalidLength => write!(f, "invalid ship length"),
            BoardError::OutOfBounds => write!(f, "coordinate out of bounds"),
            BoardError::Overlap => write!(f, "ship placement overlaps with another ship"),
            BoardError::AlreadyAttacked => write!(f, "cell already attacked"),
            BoardError::NoRoom => write!(f, "no room left to place ship"),
        }
    }
}

/// Errors returned by Session operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// The participant already has a board in this session.
    DuplicateParticipant,
    /// The session already holds its full complement of participants.
    SessionFull,
    /// No board exists for the named participant.
    UnknownParticipant,
    /// The attacker does not hold the turn.
    NotYourTurn,
    /// The attacker has no opponent yet.
    AwaitingOpponent,
    /// A board has been defeated; no further moves are accepted.
    MatchOver,
    /// Rejected by the underlying board.
    Board(BoardError),
}

impl From<BoardError> for SessionError {
    fn from(err: BoardError) -> Self {
        SessionError::Board(err)
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::DuplicateParticipant => write!(f, "player already exists"),
            SessionError::SessionFull => write!(f, "match is full"),
            SessionError::UnknownParticipant => write!(f, "player does not exist"),
            SessionError::NotYourTurn => write!(f, "it's not your turn"),
            SessionError::AwaitingOpponent => write!(f, "waiting for an opponent to join"),
            SessionError::MatchOver => write!(f, "the match is over"),
            SessionError::Board(e) => write!(f, "{}", e),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BoardError {}

#[cfg(feature = "std")]
impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Board(e) => Some(e),
            _ => None,
        }
    }
}
