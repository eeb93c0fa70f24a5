//! CLI entry point for the cube solver.
//!
//! Usage:
//!   cube-solver solve <STATE> [options]
//!   cube-solver solve --stdin [options]
//!   cube-solver scramble [--moves <n>] [--seed <n>] [--from <STATE>]
//!   cube-solver apply <STATE> <MOVES>...
//!
//! Solve options:
//!   --config <file>            JSON solver configuration (flags override it)
//!   --forward-depth <n>        Search radius around the scramble (default: 6)
//!   --backward-depth <n>       Search radius around solved states (default: 5)
//!   --max-states <n>           Ceiling on recorded states per search
//!   --timeout-ms <n>           Wall-clock budget for the solve
//!   --max-forward-depth <n>    Deepen the forward search up to this depth on failure
//!   --sequential               Run the two half-searches one after the other
//!   --exhaustive               Use the single-source reference solver
//!
//! Set RUST_LOG to control logging (stderr) and CUBE_SOLVER_LOG_FORMAT=json
//! for JSON log lines.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cube_solver::{
    format_sequence, parse_sequence, random_sequence, solve, solve_exhaustive, CubeState,
    MoveTable, Solution, SolveError, SolverConfig,
};

#[derive(Parser)]
#[command(name = "cube-solver")]
#[command(about = "Bidirectional bounded BFS solver for the 2x2 cube")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find a move sequence that solves a cube
    Solve {
        /// 24 color letters (w r g y o b) in facelet order
        #[arg(value_name = "STATE")]
        state: Option<String>,

        /// Read the cube from stdin instead
        #[arg(long)]
        stdin: bool,

        /// JSON file with solver configuration
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Search radius around the scramble
        #[arg(long)]
        forward_depth: Option<usize>,

        /// Search radius around the solved orientations
        #[arg(long)]
        backward_depth: Option<usize>,

        /// Maximum recorded states per search
        #[arg(long)]
        max_states: Option<usize>,

        /// Wall-clock budget in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// On failure, deepen the forward search up to this depth
        #[arg(long)]
        max_forward_depth: Option<usize>,

        /// Run the forward and backward searches one after the other
        #[arg(long)]
        sequential: bool,

        /// Use the single-source breadth-first reference solver
        #[arg(long)]
        exhaustive: bool,
    },

    /// Generate a random scramble
    Scramble {
        /// Number of moves
        #[arg(long, default_value = "10")]
        moves: usize,

        /// Seed for a reproducible scramble
        #[arg(long)]
        seed: Option<u64>,

        /// Start from this cube instead of the canonical solved one
        #[arg(long, value_name = "STATE")]
        from: Option<String>,
    },

    /// Apply a move sequence to a cube
    Apply {
        #[arg(value_name = "STATE")]
        state: String,

        /// Moves such as R U2 F'
        #[arg(value_name = "MOVES", num_args = 1.., allow_hyphen_values = true)]
        moves: Vec<String>,
    },
}

/// Output format for a solve request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SolveOutput {
    /// "ok" or "fail"
    state: &'static str,
    cube: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    moves: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    /// Only known for a finished search
    #[serde(skip_serializing_if = "Option::is_none")]
    forward_states: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    backward_states: Option<usize>,
    time_elapsed_ms: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScrambleOutput {
    moves: String,
    cube: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApplyOutput {
    cube: String,
    solved: bool,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            state,
            stdin,
            config,
            forward_depth,
            backward_depth,
            max_states,
            timeout_ms,
            max_forward_depth,
            sequential,
            exhaustive,
        } => {
            let input = if stdin {
                let mut buffer = String::new();
                if let Err(e) = io::stdin().read_to_string(&mut buffer) {
                    error!("Failed to read from stdin: {}", e);
                    return ExitCode::FAILURE;
                }
                buffer
            } else if let Some(state) = state {
                state
            } else {
                error!("Must provide either a cube state or --stdin");
                return ExitCode::FAILURE;
            };

            let mut solver_config = match config {
                Some(path) => match load_config(&path) {
                    Ok(c) => c,
                    Err(e) => {
                        error!("{}", e);
                        return ExitCode::FAILURE;
                    }
                },
                None => SolverConfig::default(),
            };
            if let Some(depth) = forward_depth {
                solver_config.forward_depth = depth;
            }
            if let Some(depth) = backward_depth {
                solver_config.backward_depth = depth;
            }
            if max_states.is_some() {
                solver_config.max_states = max_states;
            }
            if timeout_ms.is_some() {
                solver_config.timeout_ms = timeout_ms;
            }
            if max_forward_depth.is_some() {
                solver_config.max_forward_depth = max_forward_depth;
            }
            if sequential {
                solver_config.parallel = false;
            }

            let input = input.trim();
            let start_time = Instant::now();
            let result = CubeState::parse(input).and_then(|cube| {
                if exhaustive {
                    solve_exhaustive(&cube, &solver_config)
                } else {
                    solve(&cube, &solver_config)
                }
            });

            let ok = result.is_ok();
            let elapsed_ms = start_time.elapsed().as_millis() as u64;
            print_json(&format_result(input, &result, elapsed_ms));
            if ok {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }

        Commands::Scramble { moves, seed, from } => {
            let start = match from.as_deref().map(CubeState::parse).transpose() {
                Ok(cube) => cube.unwrap_or_default(),
                Err(e) => {
                    error!("{}", e);
                    return ExitCode::FAILURE;
                }
            };
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_os_rng(),
            };
            let sequence = random_sequence(&mut rng, moves);
            let cube = MoveTable::standard().apply_sequence(&start, &sequence);
            print_json(&ScrambleOutput {
                moves: format_sequence(&sequence),
                cube: cube.to_string(),
            });
            ExitCode::SUCCESS
        }

        Commands::Apply { state, moves } => {
            let result = CubeState::parse(&state).and_then(|cube| {
                let sequence = parse_sequence(&moves.join(" "))?;
                Ok(MoveTable::standard().apply_sequence(&cube, &sequence))
            });
            match result {
                Ok(cube) => {
                    print_json(&ApplyOutput {
                        cube: cube.to_string(),
                        solved: cube.is_solved(),
                    });
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    error!("{}", e);
                    ExitCode::FAILURE
                }
            }
        }
    }
}

/// Logs go to stderr so stdout stays valid JSON.
fn init_tracing() {
    let log_format =
        std::env::var("CUBE_SOLVER_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cube_solver=info".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
                .init();
        }
    }
}

fn load_config(path: &Path) -> Result<SolverConfig, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {:?}: {}", path, e))?;
    serde_json::from_str(&content).map_err(|e| format!("Error parsing config JSON: {}", e))
}

fn format_result(
    input: &str,
    result: &Result<Solution, SolveError>,
    elapsed_ms: u64,
) -> SolveOutput {
    match result {
        Ok(solution) => SolveOutput {
            state: "ok",
            cube: input.to_string(),
            moves: Some(solution.move_names()),
            error: None,
            reason: None,
            forward_states: Some(solution.forward_states),
            backward_states: Some(solution.backward_states),
            time_elapsed_ms: solution.time_elapsed_ms,
        },
        Err(e) => SolveOutput {
            state: "fail",
            cube: input.to_string(),
            moves: None,
            error: Some(e.kind()),
            reason: Some(e.to_string()),
            forward_states: None,
            backward_states: None,
            time_elapsed_ms: elapsed_ms,
        },
    }
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => error!("Failed to serialize output: {}", e),
    }
}
