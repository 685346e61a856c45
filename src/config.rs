use crate::ship::ShipClass;

/// Side length of every board.
pub const BOARD_SIZE: usize = 10;

/// Participants needed before a match becomes active.
pub const PLAYERS_PER_MATCH: usize = 2;

/// Ships in every fleet.
pub const NUM_SHIPS: usize = 5;

/// Ship catalog, keyed by the names clients use on the wire.
pub const FLEET: [ShipClass; NUM_SHIPS] = [
    ShipClass::new("carrier", 5),
    ShipClass::new("battleship", 4),
    ShipClass::new("cruiser", 3),
    ShipClass::new("submarine", 3),
    ShipClass::new("destroyer", 2),
];

/// Look up a ship class by its wire name. Returns `None` for names outside
/// the catalog.
pub fn ship_class(name: &str) -> Option<ShipClass> {
    FLEET.iter().copied().find(|class| class.name() == name)
}

#[cfg(feature = "std")]
pub use self::runtime::{ServerConfig, DEFAULT_BIND, DEFAULT_MAX_FRAME_SIZE, DEFAULT_SEND_TIMEOUT};

#[cfg(feature = "std")]
mod runtime {
    use std::env;
    use std::time::Duration;

    /// Default address the server listens on.
    pub const DEFAULT_BIND: &str = "0.0.0.0:8080";

    /// Maximum frame size (64 KiB). A full board update is well under 2 KiB.
    pub const DEFAULT_MAX_FRAME_SIZE: u32 = 64 * 1024;

    /// Default timeout for a single outbound write.
    pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(30);

    /// Runtime settings for the match server.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ServerConfig {
        pub bind: String,
        pub max_frame_size: u32,
        pub send_timeout: Duration,
    }

    impl Default for ServerConfig {
        fn default() -> Self {
            Self {
                bind: DEFAULT_BIND.to_string(),
                max_frame_size: DEFAULT_MAX_FRAME_SIZE,
                send_timeout: DEFAULT_SEND_TIMEOUT,
            }
        }
    }

    impl ServerConfig {
        /// Apply `ARENA_BIND` and `ARENA_MAX_FRAME` overrides from the
        /// environment. Unparseable values are ignored.
        pub fn with_env_overrides(mut self) -> Self {
            if let Ok(bind) = env::var("ARENA_BIND") {
                let bind = bind.trim();
                if !bind.is_empty() {
                    self.bind = bind.to_string();
                }
            }
            if let Some(max) = env::var("ARENA_MAX_FRAME")
                .ok()
                .and_then(|s| s.trim().parse().ok())
            {
                self.max_frame_size = max;
            }
            self
        }
    }
}
