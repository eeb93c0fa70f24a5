//! Solver library for the 2x2 cube.
//!
//! A cube is 24 colored facelets; moves are permutations of facelet
//! positions. The main entry point, [`solve`], runs a bounded breadth-first
//! search from both the scramble and the 24 solved orientations and joins
//! them at a shared state.

pub mod cube;
pub mod error;
pub mod explorer;
pub mod moves;
pub mod solver;

// Re-export main types
pub use cube::{solved_orientations, solved_orientations_of, Color, CubeState, Face, FACELETS};
pub use error::{Limit, Result, SolveError};
pub use explorer::{Explored, Explorer, SearchLimits};
pub use moves::{
    compose, format_sequence, invert, parse_sequence, random_sequence, Move, MoveTable, Path,
    Permutation, Turn,
};
pub use solver::{merge, solve, solve_exhaustive, solve_str, solve_with_table, Solution, SolverConfig};
