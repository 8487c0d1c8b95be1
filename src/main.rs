//! Half-chess: an MCTS engine for chess on an 8x4 board.
//!
//! ## Usage
//!
//! - `half-chess` - Run the demo
//! - `half-chess play` - Play against the engine on stdin/stdout
//! - `half-chess demo` - Search a mate-in-one position and show the root

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use half_chess::board::{Board, Color};
use half_chess::constants::{N_SIMS, ROLLOUTS};
use half_chess::mcts::{Node, dump_children, tree_search, tree_search_verbose};
use half_chess::play::PlayEngine;
use half_chess::playout::RolloutEvaluator;
use half_chess::position::Position;

/// Half-chess: an MCTS engine for chess on an 8x4 board
#[derive(Parser)]
#[command(name = "half-chess")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Print search progress and root statistics to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play against the engine, one command per line
    Play(SearchArgs),
    /// Search a sample position and print the result
    Demo(SearchArgs),
}

#[derive(Args, Clone, Copy)]
struct SearchArgs {
    /// Simulations per engine move
    #[arg(long, default_value_t = N_SIMS)]
    sims: usize,

    /// Random playouts averaged per evaluation
    #[arg(long, default_value_t = ROLLOUTS)]
    rollouts: usize,

    /// Seed for reproducible playouts
    #[arg(long)]
    seed: Option<u64>,
}

impl Default for SearchArgs {
    fn default() -> Self {
        Self {
            sims: N_SIMS,
            rollouts: ROLLOUTS,
            seed: None,
        }
    }
}

impl SearchArgs {
    fn evaluator(&self) -> RolloutEvaluator {
        let evaluator = match self.seed {
            Some(seed) => RolloutEvaluator::with_seed(seed),
            None => RolloutEvaluator::new(),
        };
        evaluator.rollouts(self.rollouts)
    }
}

const DEMO_BOARD: &str = "\
|k|.|.|.|
|.|.|.|.|
|.|K|.|.|
|.|.|.|.|
|.|.|.|R|
|.|.|.|.|
|.|.|.|.|
|.|.|.|.|";

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Play(args)) => {
            let mut engine =
                PlayEngine::with_simulations(args.evaluator(), args.sims).verbose(cli.verbose);
            engine.run()
        }
        Some(Commands::Demo(args)) => run_demo(args, cli.verbose),
        None => run_demo(SearchArgs::default(), cli.verbose),
    }
}

fn run_demo(args: SearchArgs, verbose: bool) -> Result<()> {
    println!("Half-chess: MCTS on an 8x4 board\n");

    let board: Board = DEMO_BOARD.parse().context("demo board")?;
    let pos = Position::from_board(board, Color::White);
    println!("{pos}{} to move\n", pos.side_to_move());

    println!("Running {} MCTS simulations...", args.sims);
    let mut evaluator = args.evaluator();
    let mut root = Node::root(pos);
    let best = if verbose {
        tree_search_verbose(&mut root, &mut evaluator, args.sims)
    } else {
        tree_search(&mut root, &mut evaluator, args.sims)
    };
    if verbose {
        dump_children(&root);
    }

    match best {
        Some(mv) => println!("Best move: {mv}"),
        None => println!("No move found"),
    }
    println!("Root mean value: {:+.3}\n", root.mean_value());

    let mut shares = root.visit_distribution();
    shares.sort_by(|a, b| b.1.total_cmp(&a.1));
    for (mv, share) in shares.iter().take(5) {
        println!("  {mv}  {:5.1}%", share * 100.0);
    }
    Ok(())
}
