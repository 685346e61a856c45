#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod board;
mod common;
mod config;
mod session;
mod ship;

#[cfg(feature = "std")]
mod bot;
#[cfg(feature = "std")]
mod logging;
#[cfg(feature = "std")]
pub mod protocol;
#[cfg(feature = "std")]
pub mod router;
#[cfg(feature = "std")]
pub mod server;
#[cfg(feature = "std")]
pub mod transport;

pub use board::*;
pub use common::*;
pub use config::*;
pub use session::*;
pub use ship::*;

#[cfg(feature = "std")]
pub use bot::{Bot, BotReport};
#[cfg(feature = "std")]
pub use logging::init_logging;
#[cfg(feature = "std")]
pub use protocol::{AttackVerdict, BoardView, CellView, ClientMessage, Frame, ServerMessage};
#[cfg(feature = "std")]
pub use router::{Envelope, MatchRouter};
#[cfg(feature = "std")]
pub use server::{Lobby, MatchRoom, Seat};
#[cfg(feature = "std")]
pub use transport::{in_memory::InMemoryTransport, tcp::TcpTransport, Transport};
