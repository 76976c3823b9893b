// Core game types
// Positions, movement directions, cell contents and game outcomes

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Row/column coordinate on the grid. Row 0 is the top row.
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub fn new(row: i32, col: i32) -> Self {
        Position { row, col }
    }

    /// Returns the neighbouring position one step in `dir`.
    /// The result is not bounds-checked.
    pub fn offset(&self, dir: Direction) -> Position {
        let (dr, dc) = dir.delta();
        Position {
            row: self.row + dr,
            col: self.col + dc,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Represents the four possible movement directions
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns all possible directions in the fixed search order
    pub fn all() -> [Direction; 4] {
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
    }

    /// Converts direction to its lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// (row, col) step for this direction
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "up" | "u" => Ok(Direction::Up),
            "down" | "d" => Ok(Direction::Down),
            "left" | "l" => Ok(Direction::Left),
            "right" | "r" => Ok(Direction::Right),
            _ => Err(format!("Invalid direction: {}", s)),
        }
    }
}

/// Contents of a single grid cell.
///
/// Exactly one fact is stored per cell. `PursuerOnGoal` is the compound
/// "pellet present and pursuer standing on it"; when the pursuer leaves,
/// the cell reverts to `Goal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Wall,
    Goal,
    Agent,
    Pursuer,
    PursuerOnGoal,
}

impl Cell {
    /// Board token used by the text format
    pub fn token(&self) -> char {
        match self {
            Cell::Empty => ' ',
            Cell::Wall => '#',
            Cell::Goal => '.',
            Cell::Agent => 'P',
            Cell::Pursuer => 'G',
            Cell::PursuerOnGoal => 'g',
        }
    }

    pub fn from_token(c: char) -> Option<Cell> {
        match c {
            ' ' | '_' => Some(Cell::Empty),
            '#' => Some(Cell::Wall),
            '.' => Some(Cell::Goal),
            'P' => Some(Cell::Agent),
            'G' => Some(Cell::Pursuer),
            'g' => Some(Cell::PursuerOnGoal),
            _ => None,
        }
    }

    /// True for cells that still hold an uneaten pellet
    pub fn is_goal_bearing(&self) -> bool {
        matches!(self, Cell::Goal | Cell::PursuerOnGoal)
    }

    /// True for cells occupied by a pursuer
    pub fn is_pursuer(&self) -> bool {
        matches!(self, Cell::Pursuer | Cell::PursuerOnGoal)
    }
}

/// Result of classifying a state
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    #[default]
    Undecided,
    Won,
    Lost,
}

impl Outcome {
    pub fn is_decided(&self) -> bool {
        *self != Outcome::Undecided
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Undecided => "undecided",
            Outcome::Won => "won",
            Outcome::Lost => "lost",
        }
    }
}
