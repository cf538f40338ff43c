use std::fmt::{self, Debug, Display};
use std::sync::Arc;

use owo_colors::{OwoColorize, Style};
use thiserror::Error;

use super::{Cell, Grid};
use crate::env::{Direction, Player, Pos};

pub const PACMAN: char = 'P';
pub const FOOD: char = '.';
pub const WALL: char = '%';
pub const EMPTY: char = ' ';
/// Valid ghost ids, their order is the turn order.
pub const GHOSTS: [char; 4] = ['W', 'X', 'Y', 'Z'];

/// The outcome of a (simulated) game.
/// If the game did not end the outcome is `None`.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum Outcome {
    None,
    /// All food has been eaten.
    Pacman,
    /// Pacman shares a cell with a ghost.
    Ghosts,
}

impl Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::None => write!(f, "None"),
            Outcome::Pacman => write!(f, "Pacman"),
            Outcome::Ghosts => write!(f, "Ghost"),
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("Empty layout")]
    Empty,
    #[error("No pacman found")]
    NoPacman,
    #[error("Second pacman at {0}")]
    DuplicatePacman(Pos),
    #[error("Second ghost {0} at {1}")]
    DuplicateGhost(char, Pos),
    #[error("Unknown cell {0:?} at {1}")]
    UnknownCell(char, Pos),
    #[error("Invalid seed: {0}")]
    Seed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ghost {
    pub id: char,
    pub pos: Pos,
}

/// Snapshot of the complete game state.
///
/// Cloning is cheap: the static grid is shared and the dynamic parts are
/// small vectors. Snapshots never share mutable state, so sibling branches
/// of a search can be simulated from the same ancestor.
#[derive(Clone, PartialEq, Eq)]
pub struct Game {
    pub grid: Arc<Grid>,
    pub pacman: Pos,
    /// Sorted by id, which is also the turn order.
    pub ghosts: Vec<Ghost>,
    /// Remaining food in row major order.
    /// Ghosts standing on food do not remove it.
    pub food: Vec<Pos>,
}

impl Game {
    pub fn new(grid: Grid, pacman: Pos, mut ghosts: Vec<Ghost>, mut food: Vec<Pos>) -> Game {
        assert!(!grid.is_wall(pacman), "pacman inside a wall");
        assert!(ghosts.iter().all(|g| !grid.is_wall(g.pos)), "ghost inside a wall");
        ghosts.sort_by_key(|g| g.id);
        food.sort();
        food.dedup();
        food.retain(|&p| !grid.is_wall(p));
        Game {
            grid: Arc::new(grid),
            pacman,
            ghosts,
            food,
        }
    }

    /// Returns if the game has ended and who the winner is.
    /// A capture is checked before the food.
    pub fn outcome(&self) -> Outcome {
        if self.is_captured() {
            Outcome::Ghosts
        } else if self.food.is_empty() {
            Outcome::Pacman
        } else {
            Outcome::None
        }
    }

    /// Returns if pacman shares a cell with any ghost.
    pub fn is_captured(&self) -> bool {
        self.ghost_at(self.pacman).is_some()
    }

    /// Returns the index of the ghost at `p`.
    pub fn ghost_at(&self, p: Pos) -> Option<u8> {
        self.ghosts.iter().position(|g| g.pos == p).map(|i| i as u8)
    }

    /// Returns if pacman can still reach any food or any ghost.
    /// Otherwise no outcome other than `None` is possible anymore.
    pub fn can_end(&self) -> bool {
        self.outcome() != Outcome::None
            || self
                .grid
                .bfs(self.pacman, |p| self.has_food(p) || self.ghost_at(p).is_some())
                .is_some()
    }

    pub fn has_food(&self, p: Pos) -> bool {
        self.food.binary_search(&p).is_ok()
    }

    pub fn position(&self, player: Player) -> Pos {
        match player {
            Player::Pacman => self.pacman,
            Player::Ghost(i) => self.ghosts[i as usize].pos,
        }
    }

    pub fn wall_count(&self) -> usize {
        self.grid.wall_count()
    }

    /// Returns all valid moves of a player in direction order.
    /// Walls are blocked for everyone, ghosts also block other ghosts.
    pub fn valid_moves(&self, player: Player) -> ValidMoves {
        ValidMoves::new(self, player)
    }

    /// Returns if a move is allowed for the player.
    pub fn move_is_valid(&self, player: Player, dir: Direction) -> bool {
        let p = self.position(player).apply(dir);
        !self.grid.is_wall(p) && (player.is_pacman() || self.ghost_at(p).is_none())
    }

    /// Executes a single move of one player.
    /// Pacman eats the food at its destination.
    ///
    /// Panics if the move is not valid.
    pub fn step(&mut self, player: Player, dir: Direction) {
        assert!(
            self.move_is_valid(player, dir),
            "invalid move {dir} for {player:?}"
        );
        match player {
            Player::Pacman => {
                self.pacman = self.pacman.apply(dir);
                if let Ok(i) = self.food.binary_search(&self.pacman) {
                    self.food.remove(i);
                }
            }
            Player::Ghost(i) => {
                let ghost = &mut self.ghosts[i as usize];
                ghost.pos = ghost.pos.apply(dir);
            }
        }
    }

    /// Returns a new independent snapshot with the move applied.
    pub fn simulate(&self, player: Player, dir: Direction) -> Game {
        let mut game = self.clone();
        game.step(player, dir);
        game
    }
}

impl Game {
    /// Parses the textual layout.
    ///
    /// `%` are walls, `P` is pacman, `W` to `Z` are ghosts, `.` is food
    /// and spaces are empty. Leading and trailing blank lines are ignored,
    /// short lines are filled up with empty cells.
    pub fn parse(txt: &str) -> Result<Game, ParseError> {
        let lines: Vec<&str> = txt
            .lines()
            .map(|l| l.trim_end_matches('\r'))
            .skip_while(|l| l.trim().is_empty())
            .collect();
        let height = lines
            .iter()
            .rposition(|l| !l.trim().is_empty())
            .map(|i| i + 1)
            .ok_or(ParseError::Empty)?;
        let lines = &lines[..height];
        let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);

        let mut cells = vec![Cell::Free; width * height];
        let mut pacman = None;
        let mut ghosts: Vec<Ghost> = Vec::new();
        let mut food = Vec::new();

        for (row, line) in lines.iter().enumerate() {
            for (col, c) in line.chars().enumerate() {
                let p = Pos::new(row as _, col as _);
                match c {
                    WALL => cells[row * width + col] = Cell::Wall,
                    FOOD => food.push(p),
                    EMPTY => {}
                    PACMAN => {
                        if pacman.is_some() {
                            return Err(ParseError::DuplicatePacman(p));
                        }
                        pacman = Some(p);
                    }
                    c if GHOSTS.contains(&c) => {
                        if ghosts.iter().any(|g| g.id == c) {
                            return Err(ParseError::DuplicateGhost(c, p));
                        }
                        ghosts.push(Ghost { id: c, pos: p });
                    }
                    c => return Err(ParseError::UnknownCell(c, p)),
                }
            }
        }

        let pacman = pacman.ok_or(ParseError::NoPacman)?;
        Ok(Game::new(
            Grid::from_cells(width, height, cells),
            pacman,
            ghosts,
            food,
        ))
    }

    fn symbol(&self, p: Pos) -> char {
        if let Some(i) = self.ghost_at(p) {
            // a captured pacman is hidden by the ghost
            self.ghosts[i as usize].id
        } else if p == self.pacman {
            PACMAN
        } else if self.grid.is_wall(p) {
            WALL
        } else if self.has_food(p) {
            FOOD
        } else {
            EMPTY
        }
    }
}

/// Renders the layout in the same alphabet that is parsed.
impl Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.grid.height {
            for col in 0..self.grid.width {
                write!(f, "{}", self.symbol(Pos::new(row as _, col as _)))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn ghost_color(i: usize) -> Style {
            match i {
                0 => Style::new().red(),
                1 => Style::new().magenta(),
                2 => Style::new().cyan(),
                _ => Style::new().blue(),
            }
        }

        writeln!(f, "Game {{")?;
        for row in 0..self.grid.height {
            write!(f, "  ")?;
            for col in 0..self.grid.width {
                let p = Pos::new(row as _, col as _);
                let c = self.symbol(p);
                match self.ghost_at(p) {
                    Some(i) => write!(f, "{} ", c.style(ghost_color(i as usize)))?,
                    None if c == PACMAN => write!(f, "{} ", c.bright_yellow())?,
                    None if c == WALL => write!(f, "{} ", c.bright_black())?,
                    None => write!(f, "{} ", c.green())?,
                }
            }
            writeln!(f)?;
        }

        write!(f, "  Pacman: {}, Ghosts: [", self.pacman)?;
        for (i, ghost) in self.ghosts.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", ghost.id, ghost.pos)?;
        }
        writeln!(f, "], Food: {}", self.food.len())?;
        writeln!(f, "}}")?;

        Ok(())
    }
}

/// Iterator over all possible moves of a player.
pub struct ValidMoves<'a> {
    game: &'a Game,
    player: Player,
    dir: u8,
}

impl<'a> ValidMoves<'a> {
    fn new(game: &'a Game, player: Player) -> ValidMoves<'a> {
        ValidMoves {
            game,
            player,
            dir: 0,
        }
    }
}

impl<'a> Iterator for ValidMoves<'a> {
    type Item = Direction;

    fn next(&mut self) -> Option<Self::Item> {
        while self.dir < 4 {
            let d = Direction::from(self.dir);
            self.dir += 1;
            if self.game.move_is_valid(self.player, d) {
                return Some(d);
            }
        }
        None
    }
}
