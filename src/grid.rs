// Grid module
//
// Dense row-major storage of cells plus the text board format:
// one line per row, one token per cell (see Cell::token).

use std::fmt;

use crate::types::{Cell, Direction, Position};

/// Errors raised while reading a board or building a state from it
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("board has no rows")]
    Empty,
    #[error("row {row} has width {got}, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        got: usize,
    },
    #[error("unknown cell token '{token}' at row {row}, column {col}")]
    UnknownToken { token: char, row: usize, col: usize },
    #[error("board must contain exactly one agent, found {0}")]
    AgentCount(usize),
    #[error("pursuer list has {got} entries, board holds {expected} pursuers")]
    PursuerCount { expected: usize, got: usize },
    #[error("pursuer position {0} does not hold a pursuer")]
    NotAPursuer(Position),
}

/// Fixed-size rectangular board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    height: usize,
    width: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Builds a grid from rows of cells. All rows must share the same width.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self, BoardError> {
        let height = rows.len();
        let width = rows.first().map(|r| r.len()).unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(BoardError::Empty);
        }

        let mut cells = Vec::with_capacity(height * width);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(BoardError::Ragged {
                    row: i,
                    expected: width,
                    got: row.len(),
                });
            }
            cells.extend(row);
        }

        Ok(Grid {
            height,
            width,
            cells,
        })
    }

    /// Parses the text board format. Empty lines before the first and after
    /// the last row are ignored.
    pub fn parse(text: &str) -> Result<Self, BoardError> {
        let lines: Vec<&str> = text
            .lines()
            .map(|l| l.trim_end_matches('\r'))
            .collect();
        let first = lines.iter().position(|l| !l.is_empty());
        let last = lines.iter().rposition(|l| !l.is_empty());
        let (first, last) = match (first, last) {
            (Some(f), Some(l)) => (f, l),
            _ => return Err(BoardError::Empty),
        };

        let mut rows = Vec::with_capacity(last - first + 1);
        for (row, line) in lines[first..=last].iter().enumerate() {
            let parsed = line
                .chars()
                .enumerate()
                .map(|(col, token)| {
                    Cell::from_token(token).ok_or(BoardError::UnknownToken { token, row, col })
                })
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(parsed);
        }

        Self::from_rows(rows)
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Total number of cells, also the path-length sentinel
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.row >= 0
            && pos.col >= 0
            && (pos.row as usize) < self.height
            && (pos.col as usize) < self.width
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if self.in_bounds(pos) {
            Some(pos.row as usize * self.width + pos.col as usize)
        } else {
            None
        }
    }

    /// Cell at `pos`, or None when out of bounds
    pub fn get(&self, pos: Position) -> Option<Cell> {
        self.index(pos).map(|i| self.cells[i])
    }

    /// Overwrites the cell at `pos`.
    ///
    /// # Panics
    /// Panics when `pos` is outside the grid; callers validate first.
    pub fn set(&mut self, pos: Position, cell: Cell) {
        match self.index(pos) {
            Some(i) => self.cells[i] = cell,
            None => panic!(
                "grid write at {} outside {}x{} board",
                pos, self.height, self.width
            ),
        }
    }

    /// In bounds and not a wall
    pub fn passable(&self, pos: Position) -> bool {
        matches!(self.get(pos), Some(cell) if cell != Cell::Wall)
    }

    /// In-bounds 4-neighbours in breadth-first expansion order
    /// (left, up, right, down).
    pub fn neighbors(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        [Direction::Left, Direction::Up, Direction::Right, Direction::Down]
            .into_iter()
            .map(move |d| pos.offset(d))
            .filter(move |p| self.in_bounds(*p))
    }

    /// Number of cells matching `pred`
    pub fn count<F: Fn(Cell) -> bool>(&self, pred: F) -> usize {
        self.cells.iter().filter(|c| pred(**c)).count()
    }

    /// Row-major iteration over every (position, cell) pair
    pub fn iter(&self) -> impl Iterator<Item = (Position, Cell)> + '_ {
        let width = self.width;
        self.cells.iter().enumerate().map(move |(i, c)| {
            (
                Position::new((i / width) as i32, (i % width) as i32),
                *c,
            )
        })
    }

    /// Token strings, one per row, accepted back by `Grid::parse`.
    /// Empty cells are written as '_' so rows survive whitespace trimming.
    pub fn rows(&self) -> Vec<String> {
        self.cells
            .chunks(self.width)
            .map(|row| {
                row.iter()
                    .map(|c| match c {
                        Cell::Empty => '_',
                        other => other.token(),
                    })
                    .collect()
            })
            .collect()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.width) {
            let line: String = row.iter().map(|c| c.token()).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dimensions() {
        let grid = Grid::parse("#.P\n._G\n").unwrap();
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.cell_count(), 6);
        assert_eq!(grid.get(Position::new(0, 2)), Some(Cell::Agent));
        assert_eq!(grid.get(Position::new(1, 1)), Some(Cell::Empty));
        assert_eq!(grid.get(Position::new(1, 2)), Some(Cell::Pursuer));
    }

    #[test]
    fn test_parse_skips_surrounding_blank_lines() {
        let grid = Grid::parse("\n\n..\n.P\n\n").unwrap();
        assert_eq!(grid.height(), 2);
    }

    #[test]
    fn test_parse_rejects_ragged_rows() {
        let err = Grid::parse("...\n..\n").unwrap_err();
        assert_eq!(
            err,
            BoardError::Ragged {
                row: 1,
                expected: 3,
                got: 2
            }
        );
    }

    #[test]
    fn test_parse_rejects_unknown_token() {
        let err = Grid::parse("..\n.x\n").unwrap_err();
        assert_eq!(
            err,
            BoardError::UnknownToken {
                token: 'x',
                row: 1,
                col: 1
            }
        );
    }

    #[test]
    fn test_parse_rejects_empty_board() {
        assert_eq!(Grid::parse("\n\n").unwrap_err(), BoardError::Empty);
    }

    #[test]
    fn test_out_of_bounds_access() {
        let grid = Grid::parse("..\n..\n").unwrap();
        assert_eq!(grid.get(Position::new(-1, 0)), None);
        assert_eq!(grid.get(Position::new(0, 2)), None);
        assert!(!grid.passable(Position::new(2, 0)));
    }

    #[test]
    fn test_walls_are_not_passable() {
        let grid = Grid::parse(".#\n..\n").unwrap();
        assert!(!grid.passable(Position::new(0, 1)));
        assert!(grid.passable(Position::new(0, 0)));
    }

    #[test]
    #[should_panic]
    fn test_set_out_of_bounds_panics() {
        let mut grid = Grid::parse("..\n").unwrap();
        grid.set(Position::new(3, 3), Cell::Wall);
    }

    #[test]
    fn test_neighbors_filter_bounds() {
        let grid = Grid::parse("...\n...\n").unwrap();
        let corner: Vec<_> = grid.neighbors(Position::new(0, 0)).collect();
        assert_eq!(corner, vec![Position::new(0, 1), Position::new(1, 0)]);
    }

    #[test]
    fn test_rows_parse_back() {
        let grid = Grid::parse("#. P\ng.G#\n").unwrap();
        let text = grid.rows().join("\n");
        assert_eq!(Grid::parse(&text).unwrap(), grid);
    }
}
