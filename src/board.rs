use anyhow::{anyhow, Result};

use crate::{CELLS, SIDE};

mod lines {
    use crate::{CELLS, SIDE};

    /// Every row, every column and both diagonals
    pub const NUM_LINES: usize = 2 * SIDE + 2;

    pub const fn winning_lines() -> [[usize; SIDE]; NUM_LINES] {
        let mut lines = [[0; SIDE]; NUM_LINES];
        let mut i = 0;
        while i < SIDE {
            let mut j = 0;
            while j < SIDE {
                // row i and column i
                lines[i][j] = i * SIDE + j;
                lines[SIDE + i][j] = j * SIDE + i;
                j += 1;
            }
            i += 1;
        }
        let mut j = 0;
        while j < SIDE {
            lines[2 * SIDE][j] = j * SIDE + j;
            lines[2 * SIDE + 1][j] = j * SIDE + (SIDE - 1 - j);
            j += 1;
        }
        lines
    }

    /// The 8 symmetries of the square as cell index permutations
    pub const fn symmetries() -> [[usize; CELLS]; 8] {
        let mut transforms = [[0; CELLS]; 8];
        let mut cell = 0;
        while cell < CELLS {
            let r = cell / SIDE;
            let c = cell % SIDE;
            transforms[0][cell] = r * SIDE + c;
            transforms[1][cell] = c * SIDE + (SIDE - 1 - r);
            transforms[2][cell] = (SIDE - 1 - r) * SIDE + (SIDE - 1 - c);
            transforms[3][cell] = (SIDE - 1 - c) * SIDE + r;
            transforms[4][cell] = r * SIDE + (SIDE - 1 - c);
            transforms[5][cell] = (SIDE - 1 - r) * SIDE + c;
            transforms[6][cell] = c * SIDE + r;
            transforms[7][cell] = (SIDE - 1 - c) * SIDE + (SIDE - 1 - r);
            cell += 1;
        }
        transforms
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Cell {
    PlayerOne,
    PlayerTwo,
    Empty,
}

impl Cell {
    fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            _ => false,
        }
    }

    fn code_digit(self) -> u32 {
        match self {
            Cell::Empty => 0,
            Cell::PlayerOne => 1,
            Cell::PlayerTwo => 2,
        }
    }
}

/// The two players; `One` moves first and is the maximizing side in search
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    pub fn cell(self) -> Cell {
        match self {
            Player::One => Cell::PlayerOne,
            Player::Two => Cell::PlayerTwo,
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum GameState {
    Playing,
    PlayerOneWin,
    PlayerTwoWin,
    Draw,
}

/// A tic-tac-toe position
///
/// Cells are stored left-to-right, top-to-bottom. `Player::One` always
/// moves first, so the side to move follows from the move count.
#[derive(Clone)]
pub struct Board {
    cells: [Cell; CELLS],
    num_moves: usize,
}

impl Board {
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; CELLS],
            num_moves: 0,
        }
    }

    /// Builds a position from a string of one-indexed cell numbers, the
    /// two players alternating from `Player::One`
    pub fn from_moves<S: AsRef<str>>(moves: S) -> Result<Self> {
        let mut board = Self::new();

        for cell_char in moves.as_ref().chars() {
            match cell_char.to_digit(10).map(|c| c as usize) {
                Some(cell @ 1..=CELLS) => {
                    board.play_checked(cell)?;
                }
                _ => return Err(anyhow!("could not parse '{}' as a valid move", cell_char)),
            }
        }
        Ok(board)
    }

    pub fn cells(&self) -> &[Cell; CELLS] {
        &self.cells
    }

    pub fn num_moves(&self) -> usize {
        self.num_moves
    }

    /// The player whose turn it is
    pub fn to_move(&self) -> Player {
        if self.num_moves % 2 == 0 {
            Player::One
        } else {
            Player::Two
        }
    }

    /// Every empty cell index, in ascending order
    pub fn legal_moves(&self) -> Vec<usize> {
        (0..CELLS).filter(|&i| self.cells[i].is_empty()).collect()
    }

    /// The current game state, derived from the cells on demand
    ///
    /// Win lines are checked before fullness, as a full board can also
    /// contain a completed line.
    pub fn state(&self) -> GameState {
        const LINES: [[usize; SIDE]; lines::NUM_LINES] = lines::winning_lines();

        for line in LINES.iter() {
            let first = self.cells[line[0]];
            if line.iter().all(|&i| self.cells[i] == first) {
                match first {
                    Cell::PlayerOne => return GameState::PlayerOneWin,
                    Cell::PlayerTwo => return GameState::PlayerTwoWin,
                    Cell::Empty => {}
                }
            }
        }

        if self.cells.iter().any(|c| c.is_empty()) {
            GameState::Playing
        } else {
            GameState::Draw
        }
    }

    /// Claims an empty cell for `player`
    ///
    /// Panics if the cell is occupied; callers uphold the contract by only
    /// playing moves taken from `legal_moves`.
    pub fn play(&mut self, cell: usize, player: Player) {
        assert!(
            self.cells[cell].is_empty(),
            "cell {} is already occupied",
            cell + 1
        );
        self.cells[cell] = player.cell();
        self.num_moves += 1;
    }

    /// Reverts a `play`, resetting the cell to empty
    pub fn unplay(&mut self, cell: usize) {
        assert!(
            !self.cells[cell].is_empty(),
            "cell {} is already empty",
            cell + 1
        );
        self.cells[cell] = Cell::Empty;
        self.num_moves -= 1;
    }

    /// Validated move entry for interactive callers
    pub fn play_checked(&mut self, cell_one_indexed: usize) -> Result<GameState> {
        if cell_one_indexed < 1 || cell_one_indexed > CELLS {
            return Err(anyhow!(
                "Invalid move, cell {} out of range. Cells must be between 1 and {}",
                cell_one_indexed,
                CELLS
            ));
        }
        let cell = cell_one_indexed - 1;
        if !self.cells[cell].is_empty() {
            return Err(anyhow!("Invalid move, cell {} occupied", cell_one_indexed));
        }
        if self.state() != GameState::Playing {
            return Err(anyhow!("Invalid position, game is over"));
        }

        let player = self.to_move();
        self.play(cell, player);
        Ok(self.state())
    }

    /// Encodes the position as a base-3 number, a perfect key for the
    /// transposition table
    pub fn code(&self) -> u32 {
        let mut code = 0;
        for cell in self.cells.iter() {
            code = code * 3 + cell.code_digit();
        }
        code
    }

    /// The smallest `code` over the 8 symmetries of the square, shared by
    /// every rotation and reflection of this position
    pub fn canonical_code(&self) -> u32 {
        const SYMMETRIES: [[usize; CELLS]; 8] = lines::symmetries();

        SYMMETRIES
            .iter()
            .map(|transform| {
                let mut code = 0;
                for &source in transform.iter() {
                    code = code * 3 + self.cells[source].code_digit();
                }
                code
            })
            .min()
            .unwrap()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
