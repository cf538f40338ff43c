use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use crate::game::{Game, ParseError};

/// Grid coordinate, rows grow downwards.
#[derive(Serialize, Deserialize, Default, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pos {
    pub row: i16,
    pub col: i16,
}

impl Pos {
    pub const fn new(row: i16, col: i16) -> Pos {
        Pos { row, col }
    }

    pub fn apply(self, d: Direction) -> Pos {
        self + d.into()
    }

    pub fn manhattan(&self) -> usize {
        self.row.unsigned_abs() as usize + self.col.unsigned_abs() as usize
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl From<Direction> for Pos {
    fn from(d: Direction) -> Self {
        match d {
            Direction::East => Pos::new(0, 1),
            Direction::North => Pos::new(-1, 0),
            Direction::South => Pos::new(1, 0),
            Direction::West => Pos::new(0, -1),
        }
    }
}

impl Add for Pos {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            row: self.row + other.row,
            col: self.col + other.col,
        }
    }
}

impl Sub for Pos {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            row: self.row - other.row,
            col: self.col - other.col,
        }
    }
}

/// The four moves, declared in alphabetical order of their names.
/// Move generation follows this order, which makes searches deterministic.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Direction {
    #[serde(rename = "E")]
    East,
    #[serde(rename = "N")]
    North,
    #[serde(rename = "S")]
    South,
    #[serde(rename = "W")]
    West,
}

impl Direction {
    pub fn iter() -> impl Iterator<Item = Direction> {
        [
            Direction::East,
            Direction::North,
            Direction::South,
            Direction::West,
        ]
        .into_iter()
    }
}

impl From<u8> for Direction {
    fn from(v: u8) -> Direction {
        match v {
            0 => Direction::East,
            1 => Direction::North,
            2 => Direction::South,
            3 => Direction::West,
            _ => panic!("Invalid direction {v}"),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Direction::East => 'E',
            Direction::North => 'N',
            Direction::South => 'S',
            Direction::West => 'W',
        };
        write!(f, "{c}")
    }
}

/// The agent whose turn it is.
/// Ghosts are referenced by their index in the (id sorted) ghost list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    Pacman,
    Ghost(u8),
}

impl Player {
    /// Strict round robin: pacman, ghost 0, ..., ghost n-1, pacman, ...
    pub fn next(self, ghosts: usize) -> Player {
        match self {
            Player::Pacman if ghosts == 0 => Player::Pacman,
            Player::Pacman => Player::Ghost(0),
            Player::Ghost(i) if i as usize + 1 >= ghosts => Player::Pacman,
            Player::Ghost(i) => Player::Ghost(i + 1),
        }
    }

    pub fn is_pacman(self) -> bool {
        self == Player::Pacman
    }
}

/// A layout file: an optional `seed: <n>` header followed by the board.
#[derive(Debug, Clone)]
pub struct Problem {
    /// `None` if the file has no seed or a negative one.
    pub seed: Option<u64>,
    pub game: Game,
}

impl FromStr for Problem {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut seed = None;
        let mut layout = s;

        let first = s.lines().find(|l| !l.trim().is_empty()).unwrap_or_default();
        if let Some(value) = first.trim().strip_prefix("seed:") {
            let value: i64 = value
                .trim()
                .parse()
                .map_err(|_| ParseError::Seed(value.trim().into()))?;
            seed = u64::try_from(value).ok();

            let start = s.find(first).unwrap_or_default() + first.len();
            layout = &s[start..];
        }

        Ok(Problem {
            seed,
            game: Game::parse(layout)?,
        })
    }
}
