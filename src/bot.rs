//! Automated client: lays out a random fleet, then hunts with random shots
//! and probes the neighbours of every hit.

use log::debug;
use rand::Rng;

use crate::board::Board;
use crate::common::BoardError;
use crate::config::{BOARD_SIZE, FLEET};
use crate::protocol::{AttackVerdict, ClientMessage, ServerMessage};
use crate::session::PlayerId;
use crate::ship::{Coordinate, Orientation};
use crate::transport::Transport;

/// How a bot's match ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotReport {
    pub winner: PlayerId,
    /// Attacks the server accepted from this bot.
    pub shots_fired: usize,
}

pub struct Bot<R> {
    rng: R,
    shots: [[Option<AttackVerdict>; BOARD_SIZE]; BOARD_SIZE],
    targets: Vec<Coordinate>,
    pending: Option<Coordinate>,
    fired: usize,
}

impl<R: Rng + Send> Bot<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            shots: [[None; BOARD_SIZE]; BOARD_SIZE],
            targets: Vec::new(),
            pending: None,
            fired: 0,
        }
    }

    /// Placement orders for a full, non-overlapping fleet.
    pub fn plan_fleet(&mut self) -> Result<Vec<ClientMessage>, BoardError> {
        let mut scratch = Board::new();
        let mut orders = Vec::with_capacity(FLEET.len());
        for class in FLEET {
            let (start, orientation) = scratch.random_placement(&mut self.rng, class)?;
            scratch.place_ship(class, start, orientation)?;
            let orientation = match orientation {
                Orientation::Horizontal => "horizontal",
                Orientation::Vertical => "vertical",
            };
            orders.push(ClientMessage::PlaceShip {
                ship: class.name().to_string(),
                orientation: Some(orientation.to_string()),
                row: start.row as i64,
                col: start.col as i64,
            });
        }
        Ok(orders)
    }

    /// Next cell to fire at: queued neighbours of earlier hits first, then a
    /// random untried cell.
    fn next_target(&mut self) -> Option<Coordinate> {
        while let Some(target) = self.targets.pop() {
            if self.shots[target.row][target.col].is_none() {
                return Some(target);
            }
        }
        let untried: Vec<Coordinate> = (0..BOARD_SIZE)
            .flat_map(|row| (0..BOARD_SIZE).map(move |col| Coordinate::new(row, col)))
            .filter(|c| self.shots[c.row][c.col].is_none())
            .collect();
        if untried.is_empty() {
            return None;
        }
        Some(untried[self.rng.random_range(0..untried.len())])
    }

    fn record(&mut self, at: Coordinate, verdict: AttackVerdict) {
        if !at.in_bounds() {
            return;
        }
        self.shots[at.row][at.col] = Some(verdict);
        self.fired += 1;
        match verdict {
            AttackVerdict::Hit => {
                let neighbours = [
                    at.row.checked_sub(1).map(|r| Coordinate::new(r, at.col)),
                    Some(Coordinate::new(at.row + 1, at.col)),
                    at.col.checked_sub(1).map(|c| Coordinate::new(at.row, c)),
                    Some(Coordinate::new(at.row, at.col + 1)),
                ];
                self.targets.extend(
                    neighbours
                        .into_iter()
                        .flatten()
                        .filter(|c| c.in_bounds() && self.shots[c.row][c.col].is_none()),
                );
            }
            AttackVerdict::Sunk => self.targets.clear(),
            AttackVerdict::Miss | AttackVerdict::Invalid => {}
        }
    }

    /// Place a fleet and keep firing until the server announces a winner.
    ///
    /// The protocol has no explicit turn signal. The bot keeps at most one
    /// attack in flight; after a rejection it waits for any board update or
    /// log line (the opponent fired, or joined) before trying again.
    pub async fn play<T>(&mut self, transport: &mut T) -> anyhow::Result<BotReport>
    where
        T: Transport<ClientMessage, ServerMessage>,
    {
        for order in self.plan_fleet().map_err(|e| anyhow::anyhow!(e))? {
            transport.send(order).await?;
        }

        let mut ready = true;
        loop {
            if ready && self.pending.is_none() {
                let target = self
                    .next_target()
                    .ok_or_else(|| anyhow::anyhow!("no untried cells left"))?;
                transport
                    .send(ClientMessage::Attack {
                        row: target.row as i64,
                        col: target.col as i64,
                    })
                    .await?;
                self.pending = Some(target);
                ready = false;
            }

            match transport.recv().await? {
                ServerMessage::AttackResult { row, col, result } => {
                    self.pending = None;
                    self.record(Coordinate::new(row, col), result);
                }
                ServerMessage::Error { message } => {
                    debug!("attack rejected: {}", message);
                    if let Some(target) = self.pending.take() {
                        self.targets.push(target);
                    }
                    ready = false;
                }
                ServerMessage::GameOver { winner } => {
                    return Ok(BotReport {
                        winner,
                        shots_fired: self.fired,
                    });
                }
                ServerMessage::UpdateBoard { .. } | ServerMessage::Log { .. } => ready = true,
            }
        }
    }
}
