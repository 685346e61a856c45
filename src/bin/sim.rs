use std::sync::Arc;

use battleship_arena::{transport::in_memory::ServerMemory, Bot, Lobby};
use rand::{rngs::SmallRng, SeedableRng};
use serde_json::json;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: {} <seed1> <seed2>", args[0]);
        std::process::exit(1);
    }
    let seed1: u64 = args[1].parse()?;
    let seed2: u64 = args[2].parse()?;

    let lobby = Arc::new(Lobby::new());
    let mut players = Vec::new();
    for seed in [seed1, seed2] {
        let (server_end, client_end) = ServerMemory::pair();
        let seat = lobby.admit().await?;
        let id = seat.id.clone();
        let lobby = Arc::clone(&lobby);
        tokio::spawn(async move { lobby.serve_seat(seat, server_end).await });
        players.push((id, SmallRng::seed_from_u64(seed), client_end));
    }

    let mut games = Vec::new();
    for (id, rng, mut transport) in players {
        games.push(tokio::spawn(async move {
            let report = Bot::new(rng).play(&mut transport).await?;
            Ok::<_, anyhow::Error>((id, report))
        }));
    }

    let mut winner = None;
    let mut shots = serde_json::Map::new();
    for game in games {
        let (id, report) = game.await??;
        shots.insert(id.to_string(), json!(report.shots_fired));
        winner = Some(report.winner);
    }

    let result = json!({
        "winner": winner,
        "shots": shots,
    });
    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
