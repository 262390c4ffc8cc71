//! An agent to solve tic-tac-toe positions

use crate::{
    board::{Board, GameState, Player},
    opening_book::{OpeningBook, BOOK_DEPTH},
    transposition_table::TranspositionTable,
    CELLS, WIN_BASE,
};

/// An agent to solve tic-tac-toe positions
///
/// # Notes
/// This agent searches the game tree exhaustively with alpha-beta pruning,
/// finding the mathematically best move in any position. Pruning never
/// changes the score or move returned, only the number of nodes visited.
///
/// # Position Scoring
/// Scores are from `Player::One`'s perspective: positive means player one
/// forces a win, negative means player two does, and 0 is a draw under
/// best play on both sides. A win reached after `d` plies of search
/// scores `WIN_BASE - d`, so among winning options the quickest is
/// preferred and among losing ones the longest holdout is preferred
#[derive(Clone)]
pub struct Solver {
    board: Board,

    /// The number of nodes searched by this `Solver` so far (for diagnostics only)
    pub node_count: usize,
    transposition_table: TranspositionTable,
    opening_book: Option<OpeningBook>,
}

impl Solver {
    /// Creates a new `Solver` for a position
    pub fn new(board: Board) -> Self {
        Self {
            board,
            node_count: 0,
            transposition_table: TranspositionTable::new(),
            opening_book: None,
        }
    }

    /// Creates a new `Solver` with a pre-filled transposition table
    pub fn new_with_transposition_table(
        board: Board,
        transposition_table: TranspositionTable,
    ) -> Self {
        Self {
            board,
            node_count: 0,
            transposition_table,
            opening_book: None,
        }
    }

    /// Adds an opening book to an existing `Solver`
    pub fn with_opening_book(mut self, opening_book: OpeningBook) -> Self {
        self.opening_book = Some(opening_book);
        self
    }

    /// Performs game tree search below one root move
    ///
    /// Returns the score of the position (see [Position Scoring]).
    /// `depth` counts plies from the root of the search, shrinking
    /// terminal scores towards 0 the deeper they are found.
    ///
    /// [Position Scoring]: #position-scoring
    pub(crate) fn minimax(
        &mut self,
        depth: i32,
        mut alpha: i32,
        mut beta: i32,
        to_move: Player,
    ) -> i32 {
        self.node_count += 1;

        // depth-adjusted terminal scores
        match self.board.state() {
            GameState::PlayerOneWin => return WIN_BASE - depth,
            GameState::PlayerTwoWin => return depth - WIN_BASE,
            GameState::Draw => return 0,
            GameState::Playing => {}
        }

        // the stone count where this search started; cached and book
        // scores are converted to and from this base
        let root_moves = self.board.num_moves() - depth as usize;

        // check the opening book at its fixed stone count
        if self.board.num_moves() == BOOK_DEPTH {
            if let Some(book) = &self.opening_book {
                if let Some(score) = book.get(self.board.canonical_code()) {
                    return relative_score(score, root_moves);
                }
            }
        }

        let code = self.board.code();
        if let Some(score) = self.transposition_table.get(code) {
            return relative_score(score, root_moves);
        }

        let alpha_entry = alpha;
        let beta_entry = beta;

        let score = if to_move == Player::One {
            let mut best = i32::MIN;
            for cell in self.board.legal_moves() {
                self.board.play(cell, Player::One);
                let child = self.minimax(depth + 1, alpha, beta, Player::Two);
                self.board.unplay(cell);

                best = best.max(child);
                alpha = alpha.max(best);
                // a minimizing ancestor already has a better alternative,
                // the remaining siblings cannot affect the root
                if beta <= alpha {
                    break;
                }
            }
            best
        } else {
            let mut best = i32::MAX;
            for cell in self.board.legal_moves() {
                self.board.play(cell, Player::Two);
                let child = self.minimax(depth + 1, alpha, beta, Player::One);
                self.board.unplay(cell);

                best = best.min(child);
                beta = beta.min(best);
                if beta <= alpha {
                    break;
                }
            }
            best
        };

        // only scores the window proves exact are cached; a score at or
        // outside the entry window is just a bound on the true value
        if alpha_entry < score && score < beta_entry {
            self.transposition_table
                .set(code, absolute_score(score, root_moves));
        }

        score
    }

    /// Calculates the score of the position and the best move for the
    /// player to move
    ///
    /// Ties between equally good moves go to the lowest cell index, so
    /// repeated searches of one position always return the same move.
    /// The move is `None` only when the game is already over.
    pub fn solve(&mut self) -> (i32, Option<usize>) {
        self.node_count += 1;

        match self.board.state() {
            GameState::PlayerOneWin => return (WIN_BASE, None),
            GameState::PlayerTwoWin => return (-WIN_BASE, None),
            GameState::Draw => return (0, None),
            GameState::Playing => {}
        }

        let to_move = self.board.to_move();
        let mut best_score = if to_move == Player::One {
            i32::MIN
        } else {
            i32::MAX
        };
        let mut best_move = None;

        // every root move gets the full window, so the returned score is
        // always exact rather than a bound
        for cell in self.board.legal_moves() {
            self.board.play(cell, to_move);
            let score = self.minimax(0, i32::MIN, i32::MAX, to_move.opponent());
            self.board.unplay(cell);

            let improved = if to_move == Player::One {
                score > best_score
            } else {
                score < best_score
            };
            if improved {
                best_score = score;
                best_move = Some(cell);
            }
        }

        (best_score, best_move)
    }

    /// Converts a position score to the number of moves until the forced
    /// result
    pub fn score_to_win_distance(&self, score: i32) -> usize {
        if score == 0 {
            CELLS - self.board.num_moves()
        } else {
            // root moves are scored one ply shallower than WIN_BASE
            (WIN_BASE - score.abs() + 1) as usize
        }
    }
}

impl std::ops::Deref for Solver {
    type Target = Board;

    fn deref(&self) -> &Self::Target {
        &self.board
    }
}

/// Converts a root-relative score to the storage basis, keyed to the
/// total stone count at the forced terminal rather than the search root
pub(crate) fn absolute_score(relative: i32, root_moves: usize) -> i32 {
    if relative > 0 {
        relative - root_moves as i32
    } else if relative < 0 {
        relative + root_moves as i32
    } else {
        0
    }
}

/// Inverse of `absolute_score` for the given search root
pub(crate) fn relative_score(absolute: i32, root_moves: usize) -> i32 {
    if absolute > 0 {
        absolute + root_moves as i32
    } else if absolute < 0 {
        absolute - root_moves as i32
    } else {
        0
    }
}
