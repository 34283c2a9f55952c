//! The 4x4 Quarto board and win-line detection
//!
//! Cells are addressed by [`Coord`]. There are ten lines that can win:
//! four rows, four columns and the two diagonals. A line wins when all of
//! its cells are occupied and the four pieces agree on at least one
//! attribute.

use std::fmt;

use crate::{
    piece::{shared_attributes, Piece},
    QuartoError, Result,
};

/// Board side length
pub const SIZE: usize = 4;

/// A board cell, zero-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    /// Row index, 0 at the top
    pub row: usize,
    /// Column index, 0 at the left
    pub col: usize,
}

impl Coord {
    /// Creates a coordinate, rejecting cells outside the board
    pub fn new(row: usize, col: usize) -> Option<Self> {
        (row < SIZE && col < SIZE).then_some(Coord { row, col })
    }

    /// Iterates over every cell in row-major order
    pub fn all() -> impl Iterator<Item = Coord> {
        (0..SIZE).flat_map(|row| (0..SIZE).map(move |col| Coord { row, col }))
    }

    /// Manhattan distance from the board centre, doubled to stay integral
    pub fn centre_distance(self) -> usize {
        let twice = |v: usize| (2 * v).abs_diff(SIZE - 1);
        twice(self.row) + twice(self.col)
    }

    /// Returns true for the four corner cells
    pub fn is_corner(self) -> bool {
        (self.row == 0 || self.row == SIZE - 1) && (self.col == 0 || self.col == SIZE - 1)
    }

    /// Returns true for cells on the outer ring that are not corners
    pub fn is_edge(self) -> bool {
        !self.is_corner()
            && (self.row == 0 || self.row == SIZE - 1 || self.col == 0 || self.col == SIZE - 1)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

const fn c(row: usize, col: usize) -> Coord {
    Coord { row, col }
}

/// The ten lines in scan order: rows, columns, main diagonal, anti-diagonal
pub const LINES: [[Coord; 4]; 10] = [
    [c(0, 0), c(0, 1), c(0, 2), c(0, 3)],
    [c(1, 0), c(1, 1), c(1, 2), c(1, 3)],
    [c(2, 0), c(2, 1), c(2, 2), c(2, 3)],
    [c(3, 0), c(3, 1), c(3, 2), c(3, 3)],
    [c(0, 0), c(1, 0), c(2, 0), c(3, 0)],
    [c(0, 1), c(1, 1), c(2, 1), c(3, 1)],
    [c(0, 2), c(1, 2), c(2, 2), c(3, 2)],
    [c(0, 3), c(1, 3), c(2, 3), c(3, 3)],
    [c(0, 0), c(1, 1), c(2, 2), c(3, 3)],
    [c(0, 3), c(1, 2), c(2, 1), c(3, 0)],
];

/// A 4x4 grid of optional pieces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Board {
    cells: [[Option<Piece>; SIZE]; SIZE],
}

impl Board {
    /// Creates an empty board
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the piece at the given cell, if any
    pub fn get(&self, coord: Coord) -> Option<Piece> {
        self.cells[coord.row][coord.col]
    }

    /// Returns true if the cell holds no piece
    pub fn is_empty_at(&self, coord: Coord) -> bool {
        self.get(coord).is_none()
    }

    /// Places a piece on an empty cell
    ///
    /// Occupied cells are never reassigned; attempting it is an
    /// [`QuartoError::IllegalMove`].
    pub fn place(&mut self, coord: Coord, piece: Piece) -> Result<()> {
        if let Some(existing) = self.get(coord) {
            return Err(QuartoError::IllegalMove(format!(
                "cell {} already holds {}",
                coord, existing
            )));
        }
        self.cells[coord.row][coord.col] = Some(piece);
        Ok(())
    }

    /// Empty cells in row-major order
    pub fn empty_cells(&self) -> Vec<Coord> {
        Coord::all().filter(|&coord| self.is_empty_at(coord)).collect()
    }

    /// Occupied cells and their pieces in row-major order
    pub fn pieces(&self) -> impl Iterator<Item = (Coord, Piece)> + '_ {
        Coord::all().filter_map(move |coord| self.get(coord).map(|piece| (coord, piece)))
    }

    /// Number of pieces on the board
    pub fn piece_count(&self) -> usize {
        self.pieces().count()
    }

    /// Returns true if the piece is somewhere on the board
    pub fn contains(&self, piece: Piece) -> bool {
        self.pieces().any(|(_, p)| p == piece)
    }

    /// Returns true if every cell is occupied
    pub fn is_full(&self) -> bool {
        Coord::all().all(|coord| !self.is_empty_at(coord))
    }

    fn line_wins(&self, line: &[Coord; 4]) -> bool {
        let mut pieces = [None; 4];
        for (slot, &coord) in pieces.iter_mut().zip(line) {
            *slot = self.get(coord);
        }
        match pieces {
            [Some(a), Some(b), Some(c), Some(d)] => shared_attributes(&[a, b, c, d]) != 0,
            _ => false,
        }
    }

    /// Returns true if any of the ten lines is a winning line
    pub fn has_winning_line(&self) -> bool {
        LINES.iter().any(|line| self.line_wins(line))
    }

    /// The first winning line in scan order, for highlighting
    pub fn winning_line(&self) -> Option<[Coord; 4]> {
        LINES.iter().find(|line| self.line_wins(line)).copied()
    }

    /// Returns true if putting `piece` on the empty cell `coord` would
    /// complete a winning line through that cell
    pub fn completes_line(&self, coord: Coord, piece: Piece) -> bool {
        if !self.is_empty_at(coord) {
            return false;
        }
        let mut probe = *self;
        probe.cells[coord.row][coord.col] = Some(piece);
        LINES
            .iter()
            .filter(|line| line.contains(&coord))
            .any(|line| probe.line_wins(line))
    }

    /// Returns true if `piece` completes a winning line on some empty cell
    ///
    /// Giving such a piece hands the opponent an immediate win.
    pub fn is_dangerous(&self, piece: Piece) -> bool {
        Coord::all().any(|coord| self.completes_line(coord, piece))
    }
}

/// Free-function form of [`Board::has_winning_line`]
pub fn has_winning_line(board: &Board) -> bool {
    board.has_winning_line()
}

/// Free-function form of [`Board::winning_line`]
pub fn winning_line(board: &Board) -> Option<[Coord; 4]> {
    board.winning_line()
}

/// Free-function form of [`Board::is_full`]
pub fn is_full(board: &Board) -> bool {
    board.is_full()
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..SIZE {
            for col in 0..SIZE {
                if col > 0 {
                    write!(f, " ")?;
                }
                match self.cells[row][col] {
                    Some(piece) => write!(f, "{}", piece)?,
                    None => write!(f, "....")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
