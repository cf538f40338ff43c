use std::collections::VecDeque;
use std::ops::Index;

use crate::env::{Direction, Pos};

/// Represents a single static tile of the board.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Cell {
    #[default]
    Free,
    Wall,
}

impl std::fmt::Debug for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Cell::Free => write!(f, " "),
            Cell::Wall => write!(f, "%"),
        }
    }
}

/// The static layer of the board: walls never move during a game,
/// so the grid is shared between all snapshots of a game.
#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    pub width: usize,
    pub height: usize,
    cells: Vec<Cell>,
    walls: usize,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Grid {
        Grid {
            width,
            height,
            cells: vec![Cell::default(); width * height],
            walls: 0,
        }
    }

    pub fn from_cells(width: usize, height: usize, cells: Vec<Cell>) -> Grid {
        assert_eq!(cells.len(), width * height);
        let walls = cells.iter().filter(|&&c| c == Cell::Wall).count();
        Grid {
            width,
            height,
            cells,
            walls,
        }
    }

    pub fn has(&self, p: Pos) -> bool {
        0 <= p.row && p.row < self.height as _ && 0 <= p.col && p.col < self.width as _
    }

    /// Cells outside of the board count as walls.
    pub fn is_wall(&self, p: Pos) -> bool {
        !self.has(p) || self[p] == Cell::Wall
    }

    /// Number of walls, computed once when the grid is built.
    pub fn wall_count(&self) -> usize {
        self.walls
    }

    /// Breadth first search from `start` to the closest cell for which
    /// `target` holds. Returns the number of steps or `None` if no target is
    /// reachable.
    ///
    /// Neighbors are expanded in direction order, walls are never entered.
    pub fn bfs<F: Fn(Pos) -> bool>(&self, start: Pos, target: F) -> Option<usize> {
        if !self.has(start) {
            return None;
        }

        let mut visited = vec![false; self.width * self.height];
        let mut queue = VecDeque::with_capacity(self.width * self.height);
        visited[self.index_of(start)] = true;
        queue.push_back((start, 0));

        while let Some((p, distance)) = queue.pop_front() {
            if target(p) {
                return Some(distance);
            }
            for d in Direction::iter() {
                let next = p.apply(d);
                if !self.is_wall(next) {
                    let i = self.index_of(next);
                    if !visited[i] {
                        visited[i] = true;
                        queue.push_back((next, distance + 1));
                    }
                }
            }
        }
        None
    }

    fn index_of(&self, p: Pos) -> usize {
        p.row as usize * self.width + p.col as usize
    }
}

impl Index<Pos> for Grid {
    type Output = Cell;

    fn index(&self, p: Pos) -> &Self::Output {
        assert!(self.has(p), "{p} is out of bounds");
        &self.cells[self.index_of(p)]
    }
}

impl std::fmt::Debug for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Grid {{")?;
        for row in 0..self.height as i16 {
            write!(f, "  ")?;
            for col in 0..self.width as i16 {
                write!(f, "{:?}", self[Pos::new(row, col)])?;
            }
            writeln!(f)?;
        }
        write!(f, "}}")?;
        Ok(())
    }
}
