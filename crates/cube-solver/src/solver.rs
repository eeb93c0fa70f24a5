//! Meet-in-the-middle solver and the exhaustive reference solver.
//!
//! The bidirectional solver explores a small ball around the 24 solved
//! orientations of the cube's own color scheme and a larger one around the scramble, then joins the two at
//! any shared state. The exhaustive solver runs a single breadth-first search
//! until it reaches a solved state; it is slow but simple enough to serve as
//! an oracle for short scrambles.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::cube::{solved_orientations_of, CubeState};
use crate::error::{Result, SolveError};
use crate::explorer::{Explored, Explorer, SearchLimits};
use crate::moves::{invert, MoveTable, Path};

/// Configuration for the solver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Search radius around the scramble
    pub forward_depth: usize,
    /// Search radius around the solved orientations
    pub backward_depth: usize,
    /// Ceiling on recorded states per exploration
    pub max_states: Option<usize>,
    /// Wall-clock budget for one solve, in milliseconds
    pub timeout_ms: Option<u64>,
    /// Run the two half-searches concurrently
    pub parallel: bool,
    /// When set, a failed merge retries with a deeper forward search, up to
    /// this depth
    pub max_forward_depth: Option<usize>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            forward_depth: 6,
            backward_depth: 5,
            max_states: Some(16_000_000),
            timeout_ms: None,
            parallel: true,
            max_forward_depth: None,
        }
    }
}

impl SolverConfig {
    /// Search limits for a solve that started at `start`.
    pub fn limits(&self, start: Instant) -> SearchLimits {
        SearchLimits {
            max_states: self.max_states,
            deadline: self
                .timeout_ms
                .map(|ms| start + Duration::from_millis(ms)),
        }
    }
}

/// A solution and some bookkeeping about how it was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    /// Moves that take the scramble to a solved state; empty if it already was
    pub moves: Path,
    /// States recorded by the scramble-side search
    pub forward_states: usize,
    /// States recorded by the solved-side search
    pub backward_states: usize,
    /// Forward depth actually used (after any escalation)
    pub forward_depth: usize,
    /// Time elapsed in milliseconds
    pub time_elapsed_ms: u64,
}

impl Solution {
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Move names, e.g. `["R", "U2", "F'"]`.
    pub fn move_names(&self) -> Vec<String> {
        self.moves.iter().map(|m| m.to_string()).collect()
    }

    fn already_solved(start: Instant) -> Self {
        Self {
            moves: Path::new(),
            forward_states: 0,
            backward_states: 0,
            forward_depth: 0,
            time_elapsed_ms: start.elapsed().as_millis() as u64,
        }
    }
}

/// Solve a 24-letter cube description.
pub fn solve_str(input: &str, config: &SolverConfig) -> Result<Solution> {
    let state = CubeState::parse(input)?;
    solve(&state, config)
}

/// Find a short move sequence that solves `state`.
///
/// The result has at most `forward_depth + backward_depth` moves (more only
/// through escalation). Fails with [`SolveError::NoSolutionFound`] when the
/// two searches share no state.
pub fn solve(state: &CubeState, config: &SolverConfig) -> Result<Solution> {
    solve_with_table(MoveTable::standard(), state, config)
}

pub fn solve_with_table(
    table: &MoveTable,
    state: &CubeState,
    config: &SolverConfig,
) -> Result<Solution> {
    let start_time = Instant::now();

    if state.is_solved() {
        info!(cube = %state, "already solved");
        return Ok(Solution::already_solved(start_time));
    }

    let explorer = Explorer::with_limits(table, config.limits(start_time));
    let seeds = solved_orientations_of(state)?;
    let scramble = [*state];

    let (backward, forward) = if config.parallel {
        rayon::join(
            || explorer.explore(&seeds, config.backward_depth),
            || explorer.explore(&scramble, config.forward_depth),
        )
    } else {
        (
            explorer.explore(&seeds, config.backward_depth),
            explorer.explore(&scramble, config.forward_depth),
        )
    };
    let backward = backward?;
    let mut forward = forward?;
    let mut forward_depth = config.forward_depth;

    loop {
        if let Some(moves) = merge(&forward, &backward) {
            let solution = Solution {
                moves,
                forward_states: forward.len(),
                backward_states: backward.len(),
                forward_depth,
                time_elapsed_ms: start_time.elapsed().as_millis() as u64,
            };
            info!(
                cube = %state,
                moves = solution.len(),
                forward_states = solution.forward_states,
                backward_states = solution.backward_states,
                elapsed_ms = solution.time_elapsed_ms,
                "solved"
            );
            return Ok(solution);
        }

        match config.max_forward_depth {
            Some(max) if forward_depth < max => {
                forward_depth += 1;
                debug!(forward_depth, "no meeting state, deepening forward search");
                explorer.deepen(&mut forward, forward_depth)?;
            }
            _ => break,
        }
    }

    info!(cube = %state, forward_depth, "no solution within depth bounds");
    Err(SolveError::NoSolutionFound {
        forward_depth,
        backward_depth: config.backward_depth,
    })
}

/// Join the two searches at the shared state with the shortest combined path.
///
/// `forward` maps states to paths from the scramble, `backward` to paths from
/// a solved state; the backward half is inverted to run from the shared state
/// back to solved. Ties go to the earliest state in forward discovery order.
pub fn merge(forward: &Explored, backward: &Explored) -> Option<Path> {
    let mut best: Option<(usize, u64)> = None;

    for &key in forward.keys() {
        let Some(forward_len) = forward.depth_of_key(key) else {
            continue;
        };
        // Keys come in nondecreasing depth, so nothing later can win.
        if best.is_some_and(|(best_len, _)| forward_len >= best_len) {
            break;
        }
        if let Some(backward_len) = backward.depth_of_key(key) {
            let total = forward_len + backward_len;
            if best.map_or(true, |(best_len, _)| total < best_len) {
                best = Some((total, key));
            }
        }
    }

    let (_, key) = best?;
    let mut path = forward.path_of_key(key)?;
    let back = backward.path_of_key(key)?;
    path.extend(invert(&back));
    Some(path)
}

/// Reference solver: plain breadth-first search from the scramble until a
/// solved state turns up. Only `max_states` and `timeout_ms` bound it.
pub fn solve_exhaustive(state: &CubeState, config: &SolverConfig) -> Result<Solution> {
    let start_time = Instant::now();
    let explorer = Explorer::with_limits(MoveTable::standard(), config.limits(start_time));
    let explored = explorer.search(&[*state], |cube| cube.is_solved())?;

    match explored.goal_path() {
        Some(moves) => Ok(Solution {
            forward_depth: moves.len(),
            moves,
            forward_states: explored.len(),
            backward_states: 0,
            time_elapsed_ms: start_time.elapsed().as_millis() as u64,
        }),
        // Reachable set exhausted: the coloring cannot be solved at all.
        None => Err(SolveError::NoSolutionFound {
            forward_depth: explored.depth_histogram().len().saturating_sub(1),
            backward_depth: 0,
        }),
    }
}
