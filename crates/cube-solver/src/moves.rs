//! Move algebra: facelet permutations and the 18 face turns.
//!
//! Each quarter turn is three 4-cycles of facelet positions: one on the
//! turning face and two around its ring. Half turns and counter-clockwise
//! turns are derived by composition, once, when the [`MoveTable`] is built.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use rand::Rng;
use smallvec::SmallVec;

use crate::cube::{CubeState, Face, FACELETS, FACES};
use crate::error::{Result, SolveError};

/// A move sequence. Solutions fit inline.
pub type Path = SmallVec<[Move; 16]>;

/// Number of legal moves.
pub const MOVE_COUNT: usize = FACES * 3;

/// Quarter-turn cycles for each face, in [`Face::ALL`] order.
/// A cycle `[a, b, c, d]` sends a to b, b to c, c to d and d to a.
const PRIMITIVE_CYCLES: [[[u8; 4]; 3]; FACES] = [
    // F
    [[0, 1, 2, 3], [7, 16, 13, 22], [6, 19, 12, 21]],
    // U
    [[4, 5, 6, 7], [21, 11, 17, 1], [20, 10, 16, 0]],
    // B
    [[8, 9, 10, 11], [4, 23, 14, 17], [5, 20, 15, 18]],
    // D
    [[12, 13, 14, 15], [3, 19, 9, 23], [2, 18, 8, 22]],
    // R
    [[1, 5, 9, 13], [2, 6, 10, 14], [16, 17, 18, 19]],
    // L
    [[0, 12, 8, 4], [3, 15, 11, 7], [21, 22, 23, 20]],
];

/// A permutation of facelet positions: source position -> destination.
/// Positions that map to themselves are fixed points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Permutation {
    map: [u8; FACELETS],
}

impl Permutation {
    pub const IDENTITY: Permutation = {
        let mut map = [0u8; FACELETS];
        let mut i = 0;
        while i < FACELETS {
            map[i] = i as u8;
            i += 1;
        }
        Permutation { map }
    };

    /// Build a permutation from disjoint cycles.
    pub fn from_cycles(cycles: &[[u8; 4]]) -> Self {
        let mut map = Self::IDENTITY.map;
        for cycle in cycles {
            for (i, &from) in cycle.iter().enumerate() {
                map[from as usize] = cycle[(i + 1) % cycle.len()];
            }
        }
        Self { map }
    }

    /// Where the facelet at `pos` ends up.
    pub fn target(&self, pos: usize) -> usize {
        self.map[pos] as usize
    }

    /// The non-fixed entries of the mapping.
    pub fn moved(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.map
            .iter()
            .enumerate()
            .filter(|&(from, &to)| from != to as usize)
            .map(|(from, &to)| (from, to as usize))
    }

    /// Apply `self`, then `next`.
    pub fn compose(&self, next: &Permutation) -> Permutation {
        let mut map = [0u8; FACELETS];
        for (slot, &to) in map.iter_mut().zip(self.map.iter()) {
            *slot = next.map[to as usize];
        }
        Permutation { map }
    }

    pub fn inverse(&self) -> Permutation {
        let mut map = [0u8; FACELETS];
        for (from, &to) in self.map.iter().enumerate() {
            map[to as usize] = from as u8;
        }
        Permutation { map }
    }

    /// Move every facelet to its destination. Builds a fresh state in one
    /// pass; the input is left untouched.
    pub fn apply(&self, state: &CubeState) -> CubeState {
        let source = state.facelets();
        let mut facelets = *source;
        for (from, &to) in self.map.iter().enumerate() {
            facelets[to as usize] = source[from];
        }
        CubeState::from_colors(facelets)
    }
}

/// `compose(a, b)` applies `a` then `b`.
pub fn compose(a: &Permutation, b: &Permutation) -> Permutation {
    a.compose(b)
}

/// How far a face is turned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Turn {
    Clockwise,
    Half,
    CounterClockwise,
}

impl Turn {
    pub const ALL: [Turn; 3] = [Turn::Clockwise, Turn::Half, Turn::CounterClockwise];

    pub fn inverse(self) -> Turn {
        match self {
            Turn::Clockwise => Turn::CounterClockwise,
            Turn::Half => Turn::Half,
            Turn::CounterClockwise => Turn::Clockwise,
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            Turn::Clockwise => "",
            Turn::Half => "2",
            Turn::CounterClockwise => "'",
        }
    }
}

/// One of the 18 face turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Move {
    pub face: Face,
    pub turn: Turn,
}

impl Move {
    pub const fn new(face: Face, turn: Turn) -> Self {
        Self { face, turn }
    }

    /// All moves, grouped by face, in [`Move::index`] order.
    pub const ALL: [Move; MOVE_COUNT] = [
        Move::new(Face::Front, Turn::Clockwise),
        Move::new(Face::Front, Turn::Half),
        Move::new(Face::Front, Turn::CounterClockwise),
        Move::new(Face::Up, Turn::Clockwise),
        Move::new(Face::Up, Turn::Half),
        Move::new(Face::Up, Turn::CounterClockwise),
        Move::new(Face::Back, Turn::Clockwise),
        Move::new(Face::Back, Turn::Half),
        Move::new(Face::Back, Turn::CounterClockwise),
        Move::new(Face::Down, Turn::Clockwise),
        Move::new(Face::Down, Turn::Half),
        Move::new(Face::Down, Turn::CounterClockwise),
        Move::new(Face::Right, Turn::Clockwise),
        Move::new(Face::Right, Turn::Half),
        Move::new(Face::Right, Turn::CounterClockwise),
        Move::new(Face::Left, Turn::Clockwise),
        Move::new(Face::Left, Turn::Half),
        Move::new(Face::Left, Turn::CounterClockwise),
    ];

    pub fn index(self) -> usize {
        self.face.index() * 3 + self.turn as usize
    }

    /// The move that undoes this one.
    pub fn inverse(self) -> Move {
        Move::new(self.face, self.turn.inverse())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.face.letter(), self.turn.suffix())
    }
}

impl FromStr for Move {
    type Err = SolveError;

    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.chars();
        let face = chars
            .next()
            .and_then(Face::from_letter)
            .ok_or_else(|| SolveError::InvalidInput(format!("unknown move `{}`", s)))?;
        let turn = match chars.as_str() {
            "" => Turn::Clockwise,
            "2" => Turn::Half,
            "'" => Turn::CounterClockwise,
            _ => return Err(SolveError::InvalidInput(format!("unknown move `{}`", s))),
        };
        Ok(Move::new(face, turn))
    }
}

/// Reverse a sequence and invert each move.
pub fn invert(moves: &[Move]) -> Path {
    moves.iter().rev().map(|m| m.inverse()).collect()
}

/// Parse whitespace-separated move names, e.g. `"R U2 F'"`.
pub fn parse_sequence(text: &str) -> Result<Path> {
    text.split_whitespace().map(str::parse).collect()
}

/// Space-separated move names.
pub fn format_sequence(moves: &[Move]) -> String {
    moves
        .iter()
        .map(|m| m.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Random move sequence with no two consecutive turns of the same face.
pub fn random_sequence<R: Rng + ?Sized>(rng: &mut R, length: usize) -> Path {
    let mut moves = Path::with_capacity(length);
    while moves.len() < length {
        let mv = Move::ALL[rng.random_range(0..MOVE_COUNT)];
        if moves.last().is_some_and(|last: &Move| last.face == mv.face) {
            continue;
        }
        moves.push(mv);
    }
    moves
}

/// Permutations for all 18 moves, built once and then only read.
#[derive(Debug, Clone)]
pub struct MoveTable {
    perms: [Permutation; MOVE_COUNT],
}

impl MoveTable {
    pub fn new() -> Self {
        let mut perms = [Permutation::IDENTITY; MOVE_COUNT];
        for face in Face::ALL {
            let quarter = Permutation::from_cycles(&PRIMITIVE_CYCLES[face.index()]);
            let half = compose(&quarter, &quarter);
            let counter = compose(&quarter, &half);
            perms[Move::new(face, Turn::Clockwise).index()] = quarter;
            perms[Move::new(face, Turn::Half).index()] = half;
            perms[Move::new(face, Turn::CounterClockwise).index()] = counter;
        }
        Self { perms }
    }

    /// Process-wide table shared by every solver call.
    pub fn standard() -> &'static MoveTable {
        static TABLE: OnceLock<MoveTable> = OnceLock::new();
        TABLE.get_or_init(MoveTable::new)
    }

    pub fn permutation(&self, mv: Move) -> &Permutation {
        &self.perms[mv.index()]
    }

    pub fn apply(&self, state: &CubeState, mv: Move) -> CubeState {
        self.permutation(mv).apply(state)
    }

    pub fn apply_sequence(&self, state: &CubeState, moves: &[Move]) -> CubeState {
        moves
            .iter()
            .fold(*state, |cube, &mv| self.apply(&cube, mv))
    }
}

impl Default for MoveTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mv(name: &str) -> Move {
        name.parse().unwrap()
    }

    #[test]
    fn test_move_names_roundtrip() {
        for m in Move::ALL {
            assert_eq!(m.to_string().parse::<Move>().unwrap(), m);
        }
        assert_eq!(mv("R'").inverse(), mv("R"));
        assert_eq!(mv("U2").inverse(), mv("U2"));
        assert!("X".parse::<Move>().is_err());
        assert!("R3".parse::<Move>().is_err());
        assert!("".parse::<Move>().is_err());
    }

    #[test]
    fn test_move_indices_match_table_order() {
        for (i, m) in Move::ALL.iter().enumerate() {
            assert_eq!(m.index(), i);
        }
    }

    #[test]
    fn test_primitives_move_twelve_facelets() {
        let table = MoveTable::new();
        for m in Move::ALL {
            assert_eq!(table.permutation(m).moved().count(), 12, "{}", m);
        }
    }

    #[test]
    fn test_quarter_turn_order_four() {
        let table = MoveTable::new();
        for face in Face::ALL {
            let q = table.permutation(Move::new(face, Turn::Clockwise));
            let four = q.compose(q).compose(q).compose(q);
            assert_eq!(four, Permutation::IDENTITY);
            assert_eq!(
                table.permutation(Move::new(face, Turn::CounterClockwise)),
                &q.inverse()
            );
        }
    }

    #[test]
    fn test_apply_r_to_solved() {
        let table = MoveTable::new();
        let cube = table.apply(&CubeState::canonical(), mv("R"));
        assert_eq!(cube.to_string(), "woowrwwryrryoyyoggggbbbb");
        assert_eq!(table.apply(&cube, mv("R'")), CubeState::canonical());
    }

    #[test]
    fn test_parse_and_invert_sequence() {
        let moves = parse_sequence("R U2  F'").unwrap();
        assert_eq!(format_sequence(&moves), "R U2 F'");
        assert_eq!(format_sequence(&invert(&moves)), "F U2 R'");
        assert!(parse_sequence("R Q").is_err());
        assert!(parse_sequence("").unwrap().is_empty());
    }

    #[test]
    fn test_random_sequence_avoids_repeated_faces() {
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let mut rng = StdRng::seed_from_u64(7);
        let moves = random_sequence(&mut rng, 40);
        assert_eq!(moves.len(), 40);
        assert!(moves.windows(2).all(|w| w[0].face != w[1].face));
    }

    #[test]
    fn test_sequence_then_inverse_is_identity() {
        let table = MoveTable::new();
        let moves = parse_sequence("R U F' L2 B D'").unwrap();
        let scrambled = table.apply_sequence(&CubeState::canonical(), &moves);
        assert!(!scrambled.is_solved());
        let back = table.apply_sequence(&scrambled, &invert(&moves));
        assert_eq!(back, CubeState::canonical());
    }
}
