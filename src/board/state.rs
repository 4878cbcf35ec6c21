//! Board state representation, move validation and win detection

use std::fmt;

use serde::{Deserialize, Serialize};

use super::lines::Line;
use crate::{Error, Result};

/// A cell on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    X,
    O,
    /// Permanently unplayable; set at construction and never changed.
    Blocked,
}

impl Cell {
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::X => 'X',
            Cell::O => 'O',
            Cell::Blocked => '*',
        }
    }
}

/// A player in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    X,
    O,
}

impl Player {
    /// Get the opponent player
    pub fn opponent(self) -> Player {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Convert player to cell
    pub fn to_cell(self) -> Cell {
        match self {
            Player::X => Cell::X,
            Player::O => Cell::O,
        }
    }

    pub fn to_char(self) -> char {
        self.to_cell().to_char()
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// A (row, column) move into the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub row: usize,
    pub col: usize,
}

impl Move {
    pub const fn new(row: usize, col: usize) -> Self {
        Move { row, col }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Result of scanning the board for a finished game.
///
/// Always derived from the grid on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminalStatus {
    Ongoing,
    XWins,
    OWins,
    Draw,
}

impl TerminalStatus {
    pub fn is_over(self) -> bool {
        self != TerminalStatus::Ongoing
    }

    pub fn winner(self) -> Option<Player> {
        match self {
            TerminalStatus::XWins => Some(Player::X),
            TerminalStatus::OWins => Some(Player::O),
            TerminalStatus::Ongoing | TerminalStatus::Draw => None,
        }
    }
}

/// An n x n grid with a configured win length and the player to move.
///
/// The grid dimensions and blocked cells are fixed for the board's lifetime;
/// exactly one cell changes per applied move. The search mutates the board in
/// place through the strict [`apply`](Board::apply)/[`undo`](Board::undo)
/// pair, so the board is bit-identical before and after any search call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    win_length: usize,
    cells: Vec<Cell>,
    to_move: Player,
    empty_cells: usize,
}

impl Board {
    /// Create a board with the given size, win length and blocked cells.
    ///
    /// X always moves first.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if the win length does not fit the
    /// board, or if a blocked coordinate is out of bounds or repeated.
    pub fn new(size: usize, win_length: usize, blocked: &[(usize, usize)]) -> Result<Self> {
        if size == 0 {
            return Err(Error::InvalidConfiguration {
                message: "board size must be at least 1".to_string(),
            });
        }
        if win_length == 0 || win_length > size {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "win length {win_length} must be between 1 and the board size {size}"
                ),
            });
        }

        let mut board = Board {
            size,
            win_length,
            cells: vec![Cell::Empty; size * size],
            to_move: Player::X,
            empty_cells: size * size,
        };
        board.add_blocked(blocked)?;
        Ok(board)
    }

    /// Mark cells Blocked. Construction-time only, not a play operation.
    fn add_blocked(&mut self, blocked: &[(usize, usize)]) -> Result<()> {
        for &(row, col) in blocked {
            if row >= self.size || col >= self.size {
                return Err(Error::InvalidConfiguration {
                    message: format!(
                        "blocked cell ({row}, {col}) is out of bounds for a {0}x{0} board",
                        self.size
                    ),
                });
            }
            let idx = row * self.size + col;
            if self.cells[idx] == Cell::Blocked {
                return Err(Error::InvalidConfiguration {
                    message: format!("blocked cell ({row}, {col}) given twice"),
                });
            }
            self.cells[idx] = Cell::Blocked;
            self.empty_cells -= 1;
        }
        Ok(())
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn win_length(&self) -> usize {
        self.win_length
    }

    pub fn to_move(&self) -> Player {
        self.to_move
    }

    /// Hand the turn to the opponent and return the new player to move.
    pub fn switch_player(&mut self) -> Player {
        self.to_move = self.to_move.opponent();
        self.to_move
    }

    /// Get the cell at (row, col). Callers must stay in bounds.
    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.cells[row * self.size + col]
    }

    pub fn empty_count(&self) -> usize {
        self.empty_cells
    }

    /// True iff the move is in bounds and targets an Empty cell.
    pub fn is_valid(&self, mv: Move) -> bool {
        mv.row < self.size && mv.col < self.size && self.cell(mv.row, mv.col) == Cell::Empty
    }

    /// Like [`is_valid`](Board::is_valid), but reports why a move is illegal.
    pub fn validate_move(&self, mv: Move) -> Result<()> {
        if mv.row >= self.size || mv.col >= self.size {
            return Err(Error::OutOfBounds {
                row: mv.row,
                col: mv.col,
                size: self.size,
            });
        }
        match self.cell(mv.row, mv.col) {
            Cell::Empty => Ok(()),
            Cell::Blocked => Err(Error::Blocked {
                row: mv.row,
                col: mv.col,
            }),
            Cell::X | Cell::O => Err(Error::Occupied {
                row: mv.row,
                col: mv.col,
            }),
        }
    }

    /// Place `player`'s symbol. Precondition: `is_valid(mv)`.
    pub fn apply(&mut self, mv: Move, player: Player) {
        debug_assert!(self.is_valid(mv), "apply precondition violated at {mv}");
        self.cells[mv.row * self.size + mv.col] = player.to_cell();
        self.empty_cells -= 1;
    }

    /// Reset the cell back to Empty. The caller must guarantee the cell was
    /// previously set by a matching [`apply`](Board::apply).
    pub fn undo(&mut self, mv: Move) {
        let idx = mv.row * self.size + mv.col;
        debug_assert!(
            matches!(self.cells[idx], Cell::X | Cell::O),
            "undo of a cell that was never applied at {mv}"
        );
        self.cells[idx] = Cell::Empty;
        self.empty_cells += 1;
    }

    /// Empty cells in row-major order.
    pub fn empty_positions(&self) -> impl Iterator<Item = Move> + '_ {
        (0..self.size * self.size)
            .filter(|&idx| self.cells[idx] == Cell::Empty)
            .map(|idx| Move::new(idx / self.size, idx % self.size))
    }

    /// Scan the whole board for a finished game.
    ///
    /// Rows are scanned first, then columns, then diagonals of both families
    /// at every offset; the first line holding `win_length` consecutive
    /// identical non-blocked symbols decides the result, with X checked
    /// before O within a line. The priority is documented because several
    /// winning lines can exist at once. A winning run may sit anywhere
    /// inside a longer line, and a Blocked cell breaks any run crossing it.
    ///
    /// Called at every search node; allocates nothing.
    pub fn terminal_status(&self) -> TerminalStatus {
        for line in Line::all(self.size) {
            match self.line_winner(&line) {
                Some(Player::X) => return TerminalStatus::XWins,
                Some(Player::O) => return TerminalStatus::OWins,
                None => {}
            }
        }
        if self.empty_cells == 0 {
            TerminalStatus::Draw
        } else {
            TerminalStatus::Ongoing
        }
    }

    /// Find a winning run on one line, X before O.
    fn line_winner(&self, line: &Line) -> Option<Player> {
        let mut x_run = 0;
        let mut o_run = 0;
        let mut x_won = false;
        let mut o_won = false;
        for (row, col) in line.cells() {
            match self.cell(row, col) {
                Cell::X => {
                    x_run += 1;
                    o_run = 0;
                }
                Cell::O => {
                    o_run += 1;
                    x_run = 0;
                }
                Cell::Empty | Cell::Blocked => {
                    x_run = 0;
                    o_run = 0;
                }
            }
            x_won |= x_run >= self.win_length;
            o_won |= o_run >= self.win_length;
        }
        if x_won {
            Some(Player::X)
        } else if o_won {
            Some(Player::O)
        } else {
            None
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.size {
            for col in 0..self.size {
                write!(f, "{}", self.cell(row, col).to_char())?;
            }
            if row + 1 < self.size {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
