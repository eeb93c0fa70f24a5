//! Property tests for the move algebra and the solvers.

use cube_solver::{
    compose, random_sequence, solve, solve_exhaustive, solved_orientations, Color, CubeState,
    Move, MoveTable, Path, SolverConfig,
};
use proptest::collection::vec;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn moves_from(indices: &[usize]) -> Path {
    indices.iter().map(|&i| Move::ALL[i]).collect()
}

fn scrambled(indices: &[usize]) -> CubeState {
    MoveTable::standard().apply_sequence(&CubeState::canonical(), &moves_from(indices))
}

/// A solved cube painted with the six colors in the given face order.
fn painted(scheme: Vec<Color>) -> CubeState {
    let scheme: [Color; 6] = scheme.try_into().unwrap();
    CubeState::solved(scheme)
}

proptest! {
    /// Every move is undone by its inverse, from any reachable state.
    #[test]
    fn inverse_law(indices in vec(0usize..18, 0..12), m in 0usize..18) {
        let table = MoveTable::standard();
        let state = scrambled(&indices);
        let mv = Move::ALL[m];
        let there = table.apply(&state, mv);
        prop_assert_eq!(table.apply(&there, mv.inverse()), state);
    }

    /// Applying a then b equals applying their composition.
    #[test]
    fn composition_law(indices in vec(0usize..18, 0..12), a in 0usize..18, b in 0usize..18) {
        let table = MoveTable::standard();
        let state = scrambled(&indices);
        let pa = table.permutation(Move::ALL[a]);
        let pb = table.permutation(Move::ALL[b]);
        let stepwise = table.apply(&table.apply(&state, Move::ALL[a]), Move::ALL[b]);
        prop_assert_eq!(compose(pa, pb).apply(&state), stepwise);
    }

    /// Packing is lossless for reachable states.
    #[test]
    fn pack_roundtrip(indices in vec(0usize..18, 0..20)) {
        let state = scrambled(&indices);
        prop_assert_eq!(CubeState::unpack(state.pack()), state);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Scrambles within the combined depth always solve, and the solution
    /// really reaches a solved state.
    #[test]
    fn shallow_scrambles_always_solve(indices in vec(0usize..18, 0..=4)) {
        let config = SolverConfig {
            forward_depth: 2,
            backward_depth: 2,
            ..SolverConfig::default()
        };
        let state = scrambled(&indices);
        let solution = solve(&state, &config).unwrap();
        prop_assert!(solution.len() <= 4);
        prop_assert!(solution.len() <= indices.len());
        let end = MoveTable::standard().apply_sequence(&state, &solution.moves);
        prop_assert!(end.is_solved());
    }

    /// Any paint scheme solves, not just the built-in one, and the result is
    /// as short as the breadth-first oracle's.
    #[test]
    fn any_color_scheme_solves(
        scheme in Just(Color::ALL.to_vec()).prop_shuffle(),
        indices in vec(0usize..18, 0..=4),
    ) {
        let config = SolverConfig {
            forward_depth: 2,
            backward_depth: 2,
            ..SolverConfig::default()
        };
        let table = MoveTable::standard();
        let state = table.apply_sequence(&painted(scheme), &moves_from(&indices));

        let solution = solve(&state, &config).unwrap();
        prop_assert!(table.apply_sequence(&state, &solution.moves).is_solved());

        let oracle = solve_exhaustive(&state, &SolverConfig::default()).unwrap();
        prop_assert_eq!(solution.len(), oracle.len());
    }
}

#[test]
fn every_solved_orientation_has_a_breaking_move() {
    let table = MoveTable::standard();
    for cube in solved_orientations() {
        assert!(Move::ALL.iter().any(|&m| !table.apply(&cube, m).is_solved()));
        // In fact no single face turn keeps a cube solved.
        assert!(Move::ALL.iter().all(|&m| !table.apply(&cube, m).is_solved()));
    }
}

#[test]
fn solved_state_stays_solved_after_solution() {
    let table = MoveTable::standard();
    let mut rng = StdRng::seed_from_u64(2024);
    let scramble = random_sequence(&mut rng, 4);
    let state = table.apply_sequence(&CubeState::canonical(), &scramble);
    let config = SolverConfig {
        forward_depth: 2,
        backward_depth: 2,
        ..SolverConfig::default()
    };
    let solution = solve(&state, &config).unwrap();
    let end = table.apply_sequence(&state, &solution.moves);
    assert!(end.is_solved());
    let again = solve(&end, &config).unwrap();
    assert!(again.is_empty());
}

#[test]
fn random_long_scramble_solves_with_default_depths() {
    let table = MoveTable::standard();
    let mut rng = StdRng::seed_from_u64(11);
    let scramble = random_sequence(&mut rng, 25);
    let state = table.apply_sequence(&CubeState::canonical(), &scramble);
    let solution = solve(&state, &SolverConfig::default()).unwrap();
    assert!(solution.len() <= 11);
    assert!(table.apply_sequence(&state, &solution.moves).is_solved());
}

#[test]
fn exhaustive_solver_is_optimal_for_short_scrambles() {
    let table = MoveTable::standard();
    let config = SolverConfig {
        forward_depth: 2,
        backward_depth: 2,
        ..SolverConfig::default()
    };
    for seed in 0..4 {
        let mut rng = StdRng::seed_from_u64(seed);
        let scramble = random_sequence(&mut rng, 3);
        let state = table.apply_sequence(&CubeState::canonical(), &scramble);
        let oracle = solve_exhaustive(&state, &SolverConfig::default()).unwrap();
        let solution = solve(&state, &config).unwrap();
        assert!(oracle.len() <= 3);
        assert_eq!(solution.len(), oracle.len());
    }
}
