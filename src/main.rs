#[cfg(not(feature = "std"))]
fn main() {}

#[cfg(feature = "std")]
use battleship_arena::{init_logging, server, transport::tcp::ClientTcp, Bot, ServerConfig};
#[cfg(feature = "std")]
use clap::Parser;
#[cfg(feature = "std")]
use rand::rngs::SmallRng;
#[cfg(feature = "std")]
use rand::SeedableRng;
#[cfg(feature = "std")]
use tokio::time::Duration;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[cfg(feature = "std")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser)]
#[cfg(feature = "std")]
enum Commands {
    /// Host matches, pairing connections two at a time.
    Serve {
        #[arg(long, help = "Listen address [default: 0.0.0.0:8080, env: ARENA_BIND]")]
        bind: Option<String>,
        #[arg(long, help = "Largest accepted frame in bytes [env: ARENA_MAX_FRAME]")]
        max_frame_size: Option<u32>,
        #[arg(long, help = "Seconds before a stalled write drops the connection")]
        send_timeout_secs: Option<u64>,
    },
    /// Join a server and let the built-in bot play.
    Bot {
        #[arg(long, default_value = "127.0.0.1:8080")]
        connect: String,
        #[arg(long, help = "Fix RNG seed for reproducible play (e.g., --seed 12345)")]
        seed: Option<u64>,
    },
}

#[cfg(feature = "std")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            bind,
            max_frame_size,
            send_timeout_secs,
        } => {
            let mut config = ServerConfig::default().with_env_overrides();
            if let Some(bind) = bind {
                config.bind = bind;
            }
            if let Some(max) = max_frame_size {
                config.max_frame_size = max;
            }
            if let Some(secs) = send_timeout_secs {
                config.send_timeout = Duration::from_secs(secs);
            }
            server::run(config).await?;
        }
        Commands::Bot { connect, seed } => {
            log::info!("connecting to {}", connect);
            let mut transport = ClientTcp::connect(&connect).await?;
            let rng = match seed {
                Some(s) => SmallRng::seed_from_u64(s),
                None => SmallRng::from_rng(&mut rand::rng()),
            };
            let report = Bot::new(rng).play(&mut transport).await?;
            println!(
                "Game over: {} wins ({} shots fired by this bot)",
                report.winner, report.shots_fired
            );
        }
    }
    Ok(())
}
