use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use log::{error, info};
use owo_colors::OwoColorize;

use pacsearch::agents::Agent;
use pacsearch::env::Problem;
use pacsearch::game::Outcome;
use pacsearch::logging;
use pacsearch::simulate::{play, Options};

#[derive(Parser)]
#[command(name = "pacsearch simulator", about = "Play games of an agent against random ghosts.")]
struct Opts {
    /// Layout file, optionally starting with a `seed: <n>` line.
    layout: PathBuf,
    /// Agent configuration in JSON.
    #[arg(long, default_value_t)]
    agent: Agent,
    /// Number of games.
    #[arg(short, long, default_value_t = 1)]
    games: usize,
    /// Overrides the seed of the layout file, negative for random games.
    #[arg(long, allow_negative_numbers = true)]
    seed: Option<i64>,
    /// Maximum number of pacman turns per game.
    #[arg(long)]
    max_turns: Option<usize>,
    /// Play minimax turn by turn instead of a single search.
    #[arg(long)]
    turn_based: bool,
    /// Print the transcript of every game.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    logging();

    let Opts {
        layout,
        agent,
        games,
        seed,
        max_turns,
        turn_based,
        verbose,
    } = Opts::parse();

    let problem: Problem = match std::fs::read_to_string(&layout) {
        Ok(txt) => match txt.parse() {
            Ok(problem) => problem,
            Err(e) => {
                error!("Invalid layout {}: {e}", layout.display());
                return ExitCode::FAILURE;
            }
        },
        Err(e) => {
            error!("Could not read {}: {e}", layout.display());
            return ExitCode::FAILURE;
        }
    };
    let seed = match seed {
        Some(seed) => u64::try_from(seed).ok(),
        None => problem.seed,
    };

    info!("{agent}");
    info!("{:?}", problem.game);

    let options = Options {
        max_turns,
        turn_based,
        transcript: verbose,
    };

    let start = Instant::now();
    let mut wins = 0;
    for i in 0..games {
        let seed = seed.map(|s| s.wrapping_add(i as u64));
        let record = play(&agent, &problem.game, seed, &options);
        if record.winner == Outcome::Pacman {
            wins += 1;
        }
        if verbose {
            println!("{}", record.transcript);
        }
        info!(
            "{}: {} {} score={} moves={} {}ms",
            "Finish Game".bright_green(),
            i,
            record.winner,
            record.score,
            record.moves,
            start.elapsed().as_millis()
        );
    }

    println!("time: {:.3}s", start.elapsed().as_secs_f64());
    println!("win %: {}", wins as f64 / games.max(1) as f64 * 100.0);
    ExitCode::SUCCESS
}
