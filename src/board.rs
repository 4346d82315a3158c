//! Caro board representation, move generation and static evaluation.
//!
//! The board is an NxN grid stored row-major in a flat `Vec`. Each cell is
//! either empty or holds a [`Player`] mark. A game is won by the first player
//! to complete a straight run of [`Board::win_len`] marks along a row, a
//! column, or a diagonal in either direction.
//!
//! Every run of `win_len` consecutive cells along one of those lines is a
//! *window*. Both [`Board::winner`] and [`Board::evaluate`] are defined in
//! terms of windows.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::constants::{
    ANSI_O, ANSI_RESET, ANSI_X, DIRECTIONS, LONG_LINE_MIN_SIZE, LONG_WIN_LEN, NEIGHBORS,
    SHORT_WIN_LEN,
};

/// One of the two sides. X always moves first.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    X,
    O,
}

impl Player {
    #[inline]
    pub fn opponent(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Signed cell value: +1 for X, -1 for O.
    #[inline]
    pub fn value(self) -> i8 {
        match self {
            Player::X => 1,
            Player::O => -1,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Player::X => 'X',
            Player::O => 'O',
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A (row, col) coordinate on the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Move {
    pub row: usize,
    pub col: usize,
}

impl Move {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl From<(usize, usize)> for Move {
    fn from((row, col): (usize, usize)) -> Self {
        Self::new(row, col)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Why a move could not be applied. The board is never changed on error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("Illegal move: ({row}, {col}) is outside the {size}x{size} board")]
    OutOfBounds { row: usize, col: usize, size: usize },

    #[error("Illegal move: ({row}, {col}) is not empty")]
    Occupied { row: usize, col: usize },
}

/// Failure to read a board from its text notation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardParseError {
    #[error("board string is empty")]
    Empty,

    #[error("board string has {cells} cells, which is not a square number")]
    NotSquare { cells: usize },

    #[error("invalid character '{character}' at cell {position} (expected 'X', 'O' or '.')")]
    InvalidCell { character: char, position: usize },
}

/// A straight run of `win_len` cells starting at (row, col).
#[derive(Copy, Clone, Debug)]
struct Window {
    row: usize,
    col: usize,
    dr: isize,
    dc: isize,
}

/// An NxN Caro board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    size: usize,
    win_len: usize,
    cells: Vec<Option<Player>>,
    stones: usize,
}

impl Board {
    /// Create an empty board.
    ///
    /// # Panics
    /// Panics if `size` is zero.
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "board size must be positive");
        let win_len = if size < LONG_LINE_MIN_SIZE {
            SHORT_WIN_LEN
        } else {
            LONG_WIN_LEN
        };
        Self {
            size,
            win_len,
            cells: vec![None; size * size],
            stones: 0,
        }
    }

    /// Parse a board from rows of `X`, `O` and `.` characters.
    ///
    /// Whitespace (including row breaks) is ignored, so `"X..\n.O.\n..."` and
    /// `"X...O...."` describe the same 3x3 board. The number of cells must be
    /// a perfect square.
    pub fn from_string(s: &str) -> Result<Self, BoardParseError> {
        let chars: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();
        if chars.is_empty() {
            return Err(BoardParseError::Empty);
        }
        let size = chars.len().isqrt();
        if size * size != chars.len() {
            return Err(BoardParseError::NotSquare { cells: chars.len() });
        }

        let mut board = Board::new(size);
        for (position, &character) in chars.iter().enumerate() {
            let cell = match character {
                'X' | 'x' => Some(Player::X),
                'O' | 'o' => Some(Player::O),
                '.' => None,
                _ => {
                    return Err(BoardParseError::InvalidCell {
                        character,
                        position,
                    });
                }
            };
            if let Some(player) = cell {
                board.cells[position] = Some(player);
                board.stones += 1;
            }
        }
        Ok(board)
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of consecutive marks needed to win (3 below size 5, else 5).
    #[inline]
    pub fn win_len(&self) -> usize {
        self.win_len
    }

    /// The center cell, `(N/2, N/2)`.
    #[inline]
    pub fn center(&self) -> Move {
        Move::new(self.size / 2, self.size / 2)
    }

    #[inline]
    fn idx(&self, row: usize, col: usize) -> usize {
        row * self.size + col
    }

    #[inline]
    fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.size && col < self.size
    }

    /// Cell contents, or `None` for empty and out-of-bounds cells.
    pub fn get(&self, row: usize, col: usize) -> Option<Player> {
        if !self.in_bounds(row, col) {
            return None;
        }
        self.cells[self.idx(row, col)]
    }

    /// Number of marks on the board.
    #[inline]
    pub fn stones(&self) -> usize {
        self.stones
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stones == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.stones == self.cells.len()
    }

    /// Place a mark, reporting why the move is illegal if it is.
    pub fn try_move(&mut self, row: usize, col: usize, player: Player) -> Result<(), MoveError> {
        if !self.in_bounds(row, col) {
            return Err(MoveError::OutOfBounds {
                row,
                col,
                size: self.size,
            });
        }
        let idx = self.idx(row, col);
        if self.cells[idx].is_some() {
            return Err(MoveError::Occupied { row, col });
        }
        self.cells[idx] = Some(player);
        self.stones += 1;
        Ok(())
    }

    /// Place a mark. Returns `false` and leaves the board untouched if the
    /// cell is out of bounds or occupied.
    pub fn apply_move(&mut self, row: usize, col: usize, player: Player) -> bool {
        self.try_move(row, col, player).is_ok()
    }

    /// Clear a cell, returning the mark that was there.
    pub fn undo_move(&mut self, row: usize, col: usize) -> Option<Player> {
        if !self.in_bounds(row, col) {
            return None;
        }
        let idx = self.idx(row, col);
        let prev = self.cells[idx].take();
        if prev.is_some() {
            self.stones -= 1;
        }
        prev
    }

    /// In-bounds 8-neighbours of a cell.
    fn neighbors(&self, row: usize, col: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        NEIGHBORS.iter().filter_map(move |&(dr, dc)| {
            let r = row.checked_add_signed(dr)?;
            let c = col.checked_add_signed(dc)?;
            self.in_bounds(r, c).then_some((r, c))
        })
    }

    /// Candidate moves for search.
    ///
    /// On an empty board this is just the center. Otherwise it is every empty
    /// cell touching (including diagonally) at least one mark, each listed
    /// once. Moves are ordered by Manhattan distance from the center, then by
    /// row and column, so central moves are tried first.
    ///
    /// Returns an empty vector only when the board is full.
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.is_empty() {
            return vec![self.center()];
        }

        let mut seen = vec![false; self.cells.len()];
        let mut moves = Vec::new();
        for row in 0..self.size {
            for col in 0..self.size {
                if self.cells[self.idx(row, col)].is_none() {
                    continue;
                }
                for (nr, nc) in self.neighbors(row, col) {
                    let ni = self.idx(nr, nc);
                    if self.cells[ni].is_none() && !seen[ni] {
                        seen[ni] = true;
                        moves.push(Move::new(nr, nc));
                    }
                }
            }
        }

        let center = self.size / 2;
        moves.sort_by_key(|m| (m.row.abs_diff(center) + m.col.abs_diff(center), m.row, m.col));
        moves
    }

    /// All windows, grouped by direction: rows, columns, `\` diagonals,
    /// then `/` diagonals.
    fn windows(&self) -> impl Iterator<Item = Window> + '_ {
        let n = self.size as isize;
        let span = self.win_len as isize - 1;
        DIRECTIONS.iter().flat_map(move |&(dr, dc)| {
            (0..n)
                .flat_map(move |r| (0..n).map(move |c| (r, c)))
                .filter(move |&(r, c)| {
                    let end_r = r + dr * span;
                    let end_c = c + dc * span;
                    (0..n).contains(&end_r) && (0..n).contains(&end_c)
                })
                .map(move |(r, c)| Window {
                    row: r as usize,
                    col: c as usize,
                    dr,
                    dc,
                })
        })
    }

    /// Count the (X, O) marks inside a window.
    fn tally(&self, w: Window) -> (usize, usize) {
        let mut xs = 0;
        let mut os = 0;
        for i in 0..self.win_len as isize {
            let r = (w.row as isize + w.dr * i) as usize;
            let c = (w.col as isize + w.dc * i) as usize;
            match self.cells[self.idx(r, c)] {
                Some(Player::X) => xs += 1,
                Some(Player::O) => os += 1,
                None => {}
            }
        }
        (xs, os)
    }

    /// The player holding a complete window, if any.
    pub fn winner(&self) -> Option<Player> {
        // Fewer marks than a full run cannot have won yet.
        if self.stones < self.win_len {
            return None;
        }
        for w in self.windows() {
            match self.tally(w) {
                (xs, _) if xs == self.win_len => return Some(Player::X),
                (_, os) if os == self.win_len => return Some(Player::O),
                _ => {}
            }
        }
        None
    }

    /// Static score of the position from `perspective`'s side.
    ///
    /// A window still open to a player (no opposing mark in it) counts one
    /// potential line for that player; an empty window counts for both.
    /// The score is the perspective's potential lines minus the opponent's.
    pub fn evaluate(&self, perspective: Player) -> i32 {
        let mut mine = 0i32;
        let mut theirs = 0i32;
        for w in self.windows() {
            let (xs, os) = self.tally(w);
            let (own, opp) = match perspective {
                Player::X => (xs, os),
                Player::O => (os, xs),
            };
            if opp == 0 {
                mine += 1;
            }
            if own == 0 {
                theirs += 1;
            }
        }
        mine - theirs
    }

    /// Display adapter that prints X in red and O in blue.
    pub fn colored(&self) -> Colored<'_> {
        Colored(self)
    }

    fn render(&self, f: &mut fmt::Formatter<'_>, ansi: bool) -> fmt::Result {
        let header: Vec<String> = (0..self.size).map(|i| format!("{i:2}")).collect();
        let header = header.join(" ");
        writeln!(f, "   {header}")?;
        writeln!(f, "   {}", "-".repeat(header.len()))?;
        for row in 0..self.size {
            write!(f, "{row:2}|")?;
            for col in 0..self.size {
                match (self.get(row, col), ansi) {
                    (None, _) => write!(f, " . ")?,
                    (Some(p), false) => write!(f, " {p} ")?,
                    (Some(p), true) => {
                        let esc = if p == Player::X { ANSI_X } else { ANSI_O };
                        write!(f, " {esc}{p}{ANSI_RESET} ")?
                    }
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = BoardParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Board::from_string(s)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, false)
    }
}

/// ANSI-coloured view of a [`Board`], see [`Board::colored`].
pub struct Colored<'a>(&'a Board);

impl fmt::Display for Colored<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.render(f, true)
    }
}
