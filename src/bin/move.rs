use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use pacsearch::agents::Agent;
use pacsearch::env::Problem;
use pacsearch::logging;

#[derive(Parser)]
#[command(name = "pacsearch move", about = "Compute pacman's next move for a layout.")]
struct Opts {
    /// Agent configuration in JSON.
    #[arg(long, default_value_t)]
    agent: Agent,
    /// Layout file, optionally starting with a `seed: <n>` line.
    layout: PathBuf,
}

fn main() -> ExitCode {
    logging();

    let Opts { agent, layout } = Opts::parse();

    let problem = std::fs::read_to_string(&layout)
        .map_err(|e| e.to_string())
        .and_then(|txt| txt.parse::<Problem>().map_err(|e| e.to_string()));
    let problem = match problem {
        Ok(problem) => problem,
        Err(e) => {
            error!("{}: {e}", layout.display());
            return ExitCode::FAILURE;
        }
    };

    info!("{:?}", problem.game);

    let mut rng = match problem.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };
    let step = agent.step(&problem.game, &mut rng);
    info!("Step: {step:?}");
    match step {
        Some(dir) => println!("{dir}"),
        None => println!("stuck"),
    }
    ExitCode::SUCCESS
}
