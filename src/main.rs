#[cfg(not(feature = "std"))]
fn main() {}

#[cfg(feature = "std")]
use clap::{Parser, Subcommand};
#[cfg(feature = "std")]
use rand::{rngs::SmallRng, SeedableRng};
#[cfg(feature = "std")]
use shipwrecker::{
    generate_room_id, init_logging, play_bot_match, shots_to_clear, Difficulty, Room,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[cfg(feature = "std")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
#[cfg(feature = "std")]
enum Commands {
    /// Play one computer-vs-computer game in a fresh room.
    Sim {
        #[arg(long, value_enum, default_value_t = Difficulty::Hard)]
        first: Difficulty,
        #[arg(long, value_enum, default_value_t = Difficulty::Medium)]
        second: Difficulty,
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
        #[arg(long, help = "Print the result as JSON")]
        json: bool,
    },
    /// Report the average number of shots each difficulty needs to sink a fleet.
    Bench {
        #[arg(long, default_value_t = 200)]
        games: usize,
        #[arg(long, help = "Fix RNG seed for reproducible runs (e.g., --seed 12345)")]
        seed: Option<u64>,
        #[arg(long, help = "Print the result as JSON")]
        json: bool,
    },
}

#[cfg(feature = "std")]
fn make_rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(s) => SmallRng::seed_from_u64(s),
        None => {
            let mut seed_rng = rand::rng();
            SmallRng::from_rng(&mut seed_rng)
        }
    }
}

#[cfg(feature = "std")]
fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Sim {
            first,
            second,
            seed,
            json,
        } => {
            let mut rng = make_rng(seed);
            let room_id = generate_room_id(&mut rng);
            let mut room = Room::new(room_id, make_rng(seed.map(|s| s.wrapping_add(1))));
            let summary = play_bot_match(&mut room, [first, second], &mut rng)?;
            if json {
                println!("{}", serde_json::to_string(&summary)?);
            } else {
                println!(
                    "Room {}: player {} ({:?}) won. Shots fired: {} / {}",
                    summary.room_id,
                    summary.winner.number(),
                    summary.difficulties[summary.winner.index()],
                    summary.shots[0],
                    summary.shots[1],
                );
            }
        }
        Commands::Bench { games, seed, json } => {
            let mut rng = make_rng(seed);
            let mut results = Vec::new();
            for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
                let total: usize = (0..games)
                    .map(|_| shots_to_clear(difficulty, &mut rng))
                    .sum();
                let average = total as f64 / games.max(1) as f64;
                results.push((difficulty, average));
            }
            if json {
                let rows: Vec<_> = results
                    .iter()
                    .map(|(d, avg)| serde_json::json!({ "difficulty": d, "averageShots": avg }))
                    .collect();
                println!("{}", serde_json::to_string(&rows)?);
            } else {
                for (difficulty, average) in results {
                    println!("{:?}: {:.1} shots on average over {} games", difficulty, average, games);
                }
            }
        }
    }
    Ok(())
}
