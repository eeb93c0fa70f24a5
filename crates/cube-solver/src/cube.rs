//! Cube state representation and the solved predicate.
//!
//! The puzzle has 24 movable facelets, four per face, laid out so that
//! positions `4i..4i+3` belong to face `i`:
//!
//! ```text
//!         4  5
//!         7  6
//!  20 21  0  1 16 17
//!  23 22  3  2 19 18
//!        12 13
//!        15 14
//!         8  9
//!        11 10
//! ```

use std::fmt;
use std::str::FromStr;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SolveError};

/// Number of movable facelets.
pub const FACELETS: usize = 24;
/// Number of faces.
pub const FACES: usize = 6;
/// Facelets on each face.
pub const FACELETS_PER_FACE: usize = FACELETS / FACES;

/// Sticker color. Each color is written as a single lowercase letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Red,
    Green,
    Yellow,
    Orange,
    Blue,
}

impl Color {
    pub const ALL: [Color; FACES] = [
        Color::White,
        Color::Red,
        Color::Green,
        Color::Yellow,
        Color::Orange,
        Color::Blue,
    ];

    /// Parse a color letter (case-insensitive).
    pub fn from_symbol(symbol: char) -> Option<Color> {
        match symbol.to_ascii_lowercase() {
            'w' => Some(Color::White),
            'r' => Some(Color::Red),
            'g' => Some(Color::Green),
            'y' => Some(Color::Yellow),
            'o' => Some(Color::Orange),
            'b' => Some(Color::Blue),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Color::White => 'w',
            Color::Red => 'r',
            Color::Green => 'g',
            Color::Yellow => 'y',
            Color::Orange => 'o',
            Color::Blue => 'b',
        }
    }

    /// Digit used by the base-6 packing.
    fn digit(self) -> u64 {
        self as u64
    }

    fn from_digit(digit: u64) -> Color {
        Color::ALL[(digit % FACES as u64) as usize]
    }
}

/// A face of the cube, in layout order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Face {
    Front,
    Up,
    Back,
    Down,
    Right,
    Left,
}

impl Face {
    pub const ALL: [Face; FACES] = [
        Face::Front,
        Face::Up,
        Face::Back,
        Face::Down,
        Face::Right,
        Face::Left,
    ];

    /// Index of this face's group of four facelets.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Facelet positions belonging to this face.
    pub fn positions(self) -> std::ops::Range<usize> {
        let start = self.index() * FACELETS_PER_FACE;
        start..start + FACELETS_PER_FACE
    }

    /// Letter used in move notation.
    pub fn letter(self) -> char {
        match self {
            Face::Front => 'F',
            Face::Up => 'U',
            Face::Back => 'B',
            Face::Down => 'D',
            Face::Right => 'R',
            Face::Left => 'L',
        }
    }

    pub fn from_letter(letter: char) -> Option<Face> {
        match letter {
            'F' => Some(Face::Front),
            'U' => Some(Face::Up),
            'B' => Some(Face::Back),
            'D' => Some(Face::Down),
            'R' => Some(Face::Right),
            'L' => Some(Face::Left),
            _ => None,
        }
    }
}

const W: Color = Color::White;
const R: Color = Color::Red;
const G: Color = Color::Green;
const Y: Color = Color::Yellow;
const O: Color = Color::Orange;
const B: Color = Color::Blue;

/// Face colors (in [`Face::ALL`] order) of the 24 orientations of the solved
/// cube. Opposite pairs are white/yellow, red/orange and green/blue.
const SOLVED_SCHEMES: [[Color; FACES]; 24] = [
    [W, R, Y, O, G, B],
    [R, Y, O, W, G, B],
    [Y, O, W, R, G, B],
    [O, W, R, Y, G, B],
    [G, R, B, O, Y, W],
    [R, B, O, G, Y, W],
    [B, O, G, R, Y, W],
    [O, G, R, B, Y, W],
    [Y, R, W, O, B, G],
    [R, W, O, Y, B, G],
    [W, O, Y, R, B, G],
    [O, Y, R, W, B, G],
    [B, R, G, O, W, Y],
    [R, G, O, B, W, Y],
    [G, O, B, R, W, Y],
    [O, B, R, G, W, Y],
    [W, G, Y, B, O, R],
    [G, Y, B, W, O, R],
    [Y, B, W, G, O, R],
    [B, W, G, Y, O, R],
    [W, B, Y, G, R, O],
    [B, Y, G, W, R, O],
    [Y, G, W, B, R, O],
    [G, W, B, Y, R, O],
];

/// Number of orientations of the whole cube.
pub const ORIENTATIONS: usize = 24;

/// Facelets of the 8 corners. Every triple is listed in the same rotational
/// sense, so a face turn carries a corner's triple to a cyclic rotation of
/// another corner's triple.
const CORNERS: [[usize; 3]; 8] = [
    [0, 7, 21],
    [1, 16, 6],
    [2, 13, 19],
    [12, 3, 22],
    [20, 4, 11],
    [5, 17, 10],
    [8, 15, 23],
    [18, 14, 9],
];

/// Full assignment of colors to the 24 facelet positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CubeState {
    facelets: [Color; FACELETS],
}

impl CubeState {
    pub fn from_colors(facelets: [Color; FACELETS]) -> Self {
        Self { facelets }
    }

    /// The solved cube with the given face colors (in [`Face::ALL`] order).
    pub fn solved(scheme: [Color; FACES]) -> Self {
        let mut facelets = [Color::White; FACELETS];
        for face in Face::ALL {
            for pos in face.positions() {
                facelets[pos] = scheme[face.index()];
            }
        }
        Self { facelets }
    }

    /// The canonical solved cube: white front, red up.
    pub fn canonical() -> Self {
        Self::solved(SOLVED_SCHEMES[0])
    }

    /// Parse a 24-letter color string. Whitespace is ignored and letters are
    /// case-insensitive. Color counts are not checked.
    pub fn parse(input: &str) -> Result<Self> {
        let symbols: Vec<char> = input.chars().filter(|c| !c.is_whitespace()).collect();
        if symbols.len() != FACELETS {
            return Err(SolveError::InvalidInput(format!(
                "expected {} facelets, got {}",
                FACELETS,
                symbols.len()
            )));
        }

        let mut facelets = [Color::White; FACELETS];
        for (pos, &symbol) in symbols.iter().enumerate() {
            facelets[pos] = Color::from_symbol(symbol).ok_or_else(|| {
                SolveError::InvalidInput(format!(
                    "unknown color `{}` at position {}",
                    symbol, pos
                ))
            })?;
        }
        Ok(Self { facelets })
    }

    pub fn facelets(&self) -> &[Color; FACELETS] {
        &self.facelets
    }

    pub fn facelet(&self, pos: usize) -> Color {
        self.facelets[pos]
    }

    /// The four colors on a face.
    pub fn face(&self, face: Face) -> &[Color] {
        &self.facelets[face.positions()]
    }

    /// True when every face shows a single color, whatever the coloring.
    pub fn is_solved(&self) -> bool {
        self.facelets
            .chunks_exact(FACELETS_PER_FACE)
            .all(|face| face.iter().all(|&c| c == face[0]))
    }

    /// Corner color triples, each rotated so its smallest color leads, then
    /// sorted. Face turns and whole-cube rotations leave this unchanged.
    pub fn corner_signature(&self) -> [[Color; 3]; 8] {
        let mut signature = CORNERS.map(|corner| {
            let colors = corner.map(|pos| self.facelets[pos]);
            let lead = (0..3).min_by_key(|&i| colors[i]).unwrap_or(0);
            [colors[lead], colors[(lead + 1) % 3], colors[(lead + 2) % 3]]
        });
        signature.sort();
        signature
    }

    /// Base-6 encoding of the state. 6^24 fits in a `u64`.
    pub fn pack(&self) -> u64 {
        self.facelets
            .iter()
            .rev()
            .fold(0u64, |key, color| key * FACES as u64 + color.digit())
    }

    /// Inverse of [`CubeState::pack`].
    pub fn unpack(mut key: u64) -> Self {
        let mut facelets = [Color::White; FACELETS];
        for slot in facelets.iter_mut() {
            *slot = Color::from_digit(key % FACES as u64);
            key /= FACES as u64;
        }
        Self { facelets }
    }
}

impl Default for CubeState {
    fn default() -> Self {
        Self::canonical()
    }
}

impl FromStr for CubeState {
    type Err = SolveError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for CubeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for color in &self.facelets {
            write!(f, "{}", color.symbol())?;
        }
        Ok(())
    }
}

/// The 24 solved states, one per orientation of the whole cube.
pub fn solved_orientations() -> Vec<CubeState> {
    SOLVED_SCHEMES.iter().map(|&scheme| CubeState::solved(scheme)).collect()
}

/// The 24 solved orientations of whatever color scheme `state` is painted
/// in, found as the face colorings whose corners match the cube's.
///
/// Fails with [`SolveError::InvalidInput`] when no real paint scheme fits,
/// e.g. a repeated color on one corner or a mirrored corner.
pub fn solved_orientations_of(state: &CubeState) -> Result<Vec<CubeState>> {
    let signature = state.corner_signature();
    let seeds: Vec<CubeState> = Color::ALL
        .iter()
        .copied()
        .permutations(FACES)
        .filter_map(|scheme| <[Color; FACES]>::try_from(scheme).ok())
        .map(CubeState::solved)
        .filter(|solved| solved.corner_signature() == signature)
        .collect();

    if seeds.len() != ORIENTATIONS {
        return Err(SolveError::InvalidInput(format!(
            "corners of {} do not match any color scheme",
            state
        )));
    }
    Ok(seeds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let cube = CubeState::parse("wwww rrrr gggg yyyy oooo bbbb").unwrap();
        assert_eq!(cube.to_string(), "wwwwrrrrggggyyyyoooobbbb");
        assert_eq!(cube.face(Face::Back), &[Color::Green; 4]);

        let upper: CubeState = "WWWWRRRRGGGGYYYYOOOOBBBB".parse().unwrap();
        assert_eq!(upper, cube);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(matches!(
            CubeState::parse("wwww"),
            Err(SolveError::InvalidInput(_))
        ));
        let err = CubeState::parse("wwwwrrrrggggyyyyoooobbbx").unwrap_err();
        assert_eq!(
            err,
            SolveError::InvalidInput("unknown color `x` at position 23".to_string())
        );
    }

    #[test]
    fn test_is_solved() {
        assert!(CubeState::canonical().is_solved());
        assert!(CubeState::parse("wwwwrrrrggggyyyyoooobbbb").unwrap().is_solved());
        assert!(!CubeState::parse("woowrwwryrryoyyoggggbbbb").unwrap().is_solved());
    }

    #[test]
    fn test_pack_unpack() {
        for cube in solved_orientations() {
            assert_eq!(CubeState::unpack(cube.pack()), cube);
        }
        let scrambled = CubeState::parse("rggbygobogrbwrybwyowrwoy").unwrap();
        assert_eq!(CubeState::unpack(scrambled.pack()), scrambled);
        assert_ne!(scrambled.pack(), CubeState::canonical().pack());
    }

    #[test]
    fn test_solved_orientations_are_distinct() {
        let cubes = solved_orientations();
        assert_eq!(cubes.len(), 24);
        let keys: std::collections::HashSet<u64> = cubes.iter().map(|c| c.pack()).collect();
        assert_eq!(keys.len(), 24);
        assert!(cubes.iter().all(|c| c.is_solved()));
    }

    #[test]
    fn test_orientations_of_canonical_scheme() {
        let derived: std::collections::HashSet<CubeState> =
            solved_orientations_of(&CubeState::canonical()).unwrap().into_iter().collect();
        let fixed: std::collections::HashSet<CubeState> =
            solved_orientations().into_iter().collect();
        assert_eq!(derived, fixed);
    }

    #[test]
    fn test_orientations_of_other_scheme() {
        // White opposite green, red opposite yellow, orange opposite blue.
        let cube = CubeState::parse("wwwwrrrrggggyyyyoooobbbb").unwrap();
        let seeds = solved_orientations_of(&cube).unwrap();
        assert_eq!(seeds.len(), ORIENTATIONS);
        assert!(seeds.contains(&cube));
        assert!(seeds.iter().all(|s| s.is_solved()));
        assert!(!seeds.contains(&CubeState::canonical()));
    }

    #[test]
    fn test_orientations_reject_impossible_corners() {
        let cube = CubeState::parse("wwwwwwwwggggyyyyoooobbbb").unwrap();
        assert!(matches!(
            solved_orientations_of(&cube),
            Err(SolveError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_face_letters() {
        for face in Face::ALL {
            assert_eq!(Face::from_letter(face.letter()), Some(face));
        }
        assert_eq!(Face::from_letter('X'), None);
    }
}
