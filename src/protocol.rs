//! Messages exchanged between the match server and its clients, and their
//! JSON encoding.

use serde::{Deserialize, Deserializer, Serialize};

use crate::board::{Board, Cell};
use crate::common::AttackResult;
use crate::session::PlayerId;
use crate::ship::Coordinate;

/// Messages a participant sends to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Place a ship from the catalog on the sender's own board.
    PlaceShip {
        ship: String,
        #[serde(
            default,
            deserialize_with = "lenient_string",
            skip_serializing_if = "Option::is_none"
        )]
        orientation: Option<String>,
        row: i64,
        col: i64,
    },
    /// Fire at the opponent's board.
    Attack { row: i64, col: i64 },
    /// Anything that does not parse as one of the above. Ignored by the
    /// router.
    #[serde(other)]
    Unrecognized,
}

/// Non-string orientations are treated as absent.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_str().map(str::to_owned))
}

/// Messages the server sends to a participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Full view of the recipient's own board.
    UpdateBoard { board: BoardView },
    /// Outcome of the recipient's attack.
    AttackResult {
        row: usize,
        col: usize,
        result: AttackVerdict,
    },
    Error { message: String },
    Log { text: String },
    GameOver { winner: PlayerId },
}

impl ServerMessage {
    pub fn error(message: impl ToString) -> Self {
        ServerMessage::Error {
            message: message.to_string(),
        }
    }

    pub fn log(text: impl Into<String>) -> Self {
        ServerMessage::Log { text: text.into() }
    }
}

/// Attack outcome as reported on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AttackVerdict {
    Hit,
    Miss,
    Sunk,
    Invalid,
}

impl From<AttackResult> for AttackVerdict {
    fn from(result: AttackResult) -> Self {
        match result {
            AttackResult::Hit => AttackVerdict::Hit,
            AttackResult::Miss => AttackVerdict::Miss,
            AttackResult::Sunk(_) => AttackVerdict::Sunk,
        }
    }
}

/// How a single cell is shown to a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    #[serde(rename = "ship")]
    Ship,
    #[serde(rename = "white")]
    Water,
    #[serde(rename = "HIT")]
    Hit,
    #[serde(rename = "MISS")]
    Miss,
}

/// Row-major matrix of cell views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardView(Vec<Vec<CellView>>);

impl BoardView {
    /// The owner's view: unattacked ship cells are visible.
    pub fn own(board: &Board) -> Self {
        Self::render(board, CellView::Ship)
    }

    /// What an opponent may see: unattacked ship cells look like water.
    pub fn opponent(board: &Board) -> Self {
        Self::render(board, CellView::Water)
    }

    fn render(board: &Board, occupied: CellView) -> Self {
        let rows = board
            .grid()
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| match cell {
                        Cell::Empty => CellView::Water,
                        Cell::Occupied => occupied,
                        Cell::Hit => CellView::Hit,
                        Cell::Missed => CellView::Miss,
                    })
                    .collect()
            })
            .collect();
        BoardView(rows)
    }

    pub fn rows(&self) -> &[Vec<CellView>] {
        &self.0
    }

    pub fn cell(&self, at: Coordinate) -> Option<CellView> {
        self.0.get(at.row)?.get(at.col).copied()
    }

    /// Number of cells showing `view`.
    pub fn count(&self, view: CellView) -> usize {
        self.0.iter().flatten().filter(|c| **c == view).count()
    }
}

/// A message that can travel as one transport frame.
pub trait Frame: Sized + Send + 'static {
    fn encode(&self) -> anyhow::Result<Vec<u8>>;
    fn decode(bytes: &[u8]) -> anyhow::Result<Self>;
}

impl Frame for ClientMessage {
    fn encode(&self) -> anyhow::Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| anyhow::anyhow!("Serialization error: {}", e))
    }

    /// Never fails: frames that do not parse become `Unrecognized`.
    fn decode(bytes: &[u8]) -> anyhow::Result<Self> {
        match serde_json::from_slice(bytes) {
            Ok(msg) => Ok(msg),
            Err(e) => {
                log::debug!(
                    "unparseable client frame ({}): {}",
                    e,
                    String::from_utf8_lossy(bytes)
                );
                Ok(ClientMessage::Unrecognized)
            }
        }
    }
}

impl Frame for ServerMessage {
    fn encode(&self) -> anyhow::Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| anyhow::anyhow!("Serialization error: {}", e))
    }

    fn decode(bytes: &[u8]) -> anyhow::Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| anyhow::anyhow!("Deserialization error: {}", e))
    }
}
