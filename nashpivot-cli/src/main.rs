//! nashpivot CLI - Nash equilibria by complementary pivoting.

mod format;
mod input;

use anyhow::{Context, Result};
use clap::Parser;
use nashpivot_math::{ExactTableau, LuTableau, TableauConfig};
use nashpivot_solver::{BehaviorSolver, SolverConfig, StrategySolver};
use std::fs;
use std::io::Read;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use format::{behavior_rows, float_formatter, mixed_rows, print_behavior, print_mixed, OutputFormat};
use input::GameFile;

#[derive(Parser, Debug)]
#[command(
    name = "nashpivot",
    about = "Find Nash equilibria of two-player games by complementary pivoting",
    version
)]
struct Args {
    /// Game description in JSON; read from stdin when omitted
    input: Option<PathBuf>,

    /// Use exact rational arithmetic instead of floating point
    #[arg(short, long)]
    exact: bool,

    /// Decimal places printed in floating-point mode
    #[arg(short, long, default_value = "6")]
    decimals: usize,

    /// Stop after this many equilibria (0 = enumerate all reachable)
    #[arg(short = 'n', long, default_value = "0")]
    max_equilibria: usize,

    /// Maximum search depth in dropped labels
    #[arg(long, default_value = "32")]
    max_depth: usize,

    /// Pivot budget per path (0 = sized from the game)
    #[arg(long, default_value = "0")]
    max_steps: usize,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all logging
    #[arg(short, long)]
    quiet: bool,
}

fn init_logging(args: &Args) {
    let level = if args.quiet {
        Level::ERROR
    } else {
        match args.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("warning: failed to set up logging: {e}");
    }
}

fn read_input(path: &Option<PathBuf>) -> Result<String> {
    match path {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
        }
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("reading stdin")?;
            Ok(text)
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args);

    let text = read_input(&args.input)?;
    let game: GameFile = serde_json::from_str(&text).context("parsing game input")?;
    let config = SolverConfig {
        stop_after: args.max_equilibria,
        max_depth: args.max_depth,
        max_steps: args.max_steps,
        tableau: TableauConfig::default(),
    };

    match game {
        GameFile::Strategic(strategic) => {
            let game = strategic.build()?;
            if args.exact {
                let solver: StrategySolver<ExactTableau> = StrategySolver::new(config);
                let found = solver.solve(&game, |_, _| {})?;
                print_mixed(&mixed_rows(&found, |v| v.to_string()), args.format);
            } else {
                let solver: StrategySolver<LuTableau> = StrategySolver::new(config);
                let found = solver.solve(&game, |_, _| {})?;
                print_mixed(
                    &mixed_rows(&found, float_formatter(args.decimals)),
                    args.format,
                );
            }
        }
        GameFile::Extensive(extensive) => {
            let game = extensive.build()?;
            if args.exact {
                let solver: BehaviorSolver<ExactTableau> = BehaviorSolver::new(config);
                let found = solver.solve(&game, |_, _| {})?;
                print_behavior(&behavior_rows(&found, |v| v.to_string()), args.format);
            } else {
                let solver: BehaviorSolver<LuTableau> = BehaviorSolver::new(config);
                let found = solver.solve(&game, |_, _| {})?;
                print_behavior(
                    &behavior_rows(&found, float_formatter(args.decimals)),
                    args.format,
                );
            }
        }
    }
    Ok(())
}
