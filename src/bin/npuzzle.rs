use clap::Parser;
use npuzzle_solver::engine::Board;
use npuzzle_solver::heuristics::{GoalRegistry, Heuristic};
use npuzzle_solver::solver::{solve, Algorithm, Solution};
use npuzzle_solver::utils::{parse_tiles, random_tiles, render_flat, render_pretty};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Search algorithm: greedy, astar or uniform
    #[clap(short, long)]
    algorithm: String,

    /// Heuristic: manhattan, euclidean, hamming or none (uniform only)
    #[clap(short = 'H', long, default_value = "none")]
    heuristic: String,

    /// Read the puzzle from this file instead of stdin
    #[clap(short, long)]
    file: Option<PathBuf>,

    /// Generate a random solvable puzzle of this grid size
    #[clap(short, long, conflicts_with = "file")]
    random: Option<usize>,

    /// Seed for --random; taken from entropy when absent
    #[clap(short, long, requires = "random")]
    seed: Option<u64>,

    /// Write the solution path to this file instead of stdout
    #[clap(short, long)]
    output: Option<PathBuf>,

    /// Print flat tile lists instead of pretty grids
    #[clap(long)]
    flat: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("npuzzle: {}", message);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), String> {
    let algorithm: Algorithm = args.algorithm.parse().map_err(|e| format!("{}", e))?;
    let heuristic = Heuristic::from_name(&args.heuristic).map_err(|e| format!("{}", e))?;
    if heuristic.is_none() && algorithm != Algorithm::Uniform {
        return Err(format!(
            "{} needs a heuristic; pick manhattan, euclidean or hamming",
            algorithm
        ));
    }

    let tiles = load_tiles(args)?;
    let initial =
        Rc::new(Board::new(tiles, heuristic).map_err(|e| format!("invalid puzzle: {}", e))?);

    if initial.is_unsolvable() {
        return Err("this puzzle is unsolvable".to_string());
    }

    let registry = GoalRegistry::new();
    let solution = solve(algorithm, Rc::clone(&initial), &registry);

    report(args, &solution)
}

fn load_tiles(args: &Args) -> Result<Vec<u32>, String> {
    if let Some(n) = args.random {
        let mut rng = match args.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        return random_tiles(n, &mut rng).map_err(|e| format!("{}", e));
    }

    let text = match &args.file {
        Some(path) => fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {}", path.display(), e))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| format!("cannot read stdin: {}", e))?;
            buffer
        }
    };

    parse_tiles(&text)
        .map(|(_, tiles)| tiles)
        .map_err(|e| format!("{}", e))
}

fn report(args: &Args, solution: &Solution) -> Result<(), String> {
    let rendered = if args.flat {
        render_flat(&solution.path)
    } else {
        render_pretty(&solution.path)
    };

    let summary = if solution.reached_goal {
        format!("solved in {} moves", solution.moves())
    } else {
        format!(
            "search exhausted without reaching the goal; best path has {} moves",
            solution.moves()
        )
    };

    match &args.output {
        Some(path) => {
            fs::write(path, rendered)
                .map_err(|e| format!("cannot write {}: {}", path.display(), e))?;
            println!("{}", summary);
            println!("path written to {}", path.display());
        }
        None => {
            print!("{}", rendered);
            println!();
            println!("{}", summary);
        }
    }

    Ok(())
}
