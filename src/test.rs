#[cfg(test)]
pub mod test {
    use anyhow::Result;
    use std::time::Instant;

    use crate::{
        board::{Board, GameState, Player},
        opening_book::OpeningBook,
        solver::{absolute_score, Solver},
        transposition_table::TranspositionTable,
        WIN_BASE,
    };

    // plain minimax with no pruning and no caching, as a reference for
    // the optimised search
    fn reference_minimax(board: &mut Board, depth: i32, to_move: Player) -> i32 {
        match board.state() {
            GameState::PlayerOneWin => return WIN_BASE - depth,
            GameState::PlayerTwoWin => return depth - WIN_BASE,
            GameState::Draw => return 0,
            GameState::Playing => {}
        }

        let mut best = if to_move == Player::One {
            i32::MIN
        } else {
            i32::MAX
        };
        for cell in board.legal_moves() {
            board.play(cell, to_move);
            let child = reference_minimax(board, depth + 1, to_move.opponent());
            board.unplay(cell);

            best = if to_move == Player::One {
                best.max(child)
            } else {
                best.min(child)
            };
        }
        best
    }

    fn reference_solve(board: &Board) -> (i32, Option<usize>) {
        let mut board = board.clone();
        let to_move = board.to_move();

        let mut best_score = if to_move == Player::One {
            i32::MIN
        } else {
            i32::MAX
        };
        let mut best_move = None;
        for cell in board.legal_moves() {
            board.play(cell, to_move);
            let score = reference_minimax(&mut board, 0, to_move.opponent());
            board.unplay(cell);

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

    #[test]
    pub fn line_detection() -> Result<()> {
        // rows
        assert_eq!(Board::from_moves("14253")?.state(), GameState::PlayerOneWin);
        // columns
        assert_eq!(Board::from_moves("12457")?.state(), GameState::PlayerOneWin);
        assert_eq!(
            Board::from_moves("215497")?.state(),
            GameState::PlayerTwoWin
        );
        // diagonals
        assert_eq!(Board::from_moves("12539")?.state(), GameState::PlayerOneWin);
        assert_eq!(Board::from_moves("31527")?.state(), GameState::PlayerOneWin);

        assert_eq!(Board::new().state(), GameState::Playing);
        assert_eq!(Board::from_moves("15")?.state(), GameState::Playing);
        Ok(())
    }

    #[test]
    pub fn win_on_full_board_is_not_a_draw() -> Result<()> {
        // player one completes the 1-5-9 diagonal with the final stone
        let board = Board::from_moves("132457689")?;
        assert_eq!(board.num_moves(), 9);
        assert_eq!(board.state(), GameState::PlayerOneWin);
        Ok(())
    }

    #[test]
    pub fn full_board_draw() -> Result<()> {
        let board = Board::from_moves("123546879")?;
        assert_eq!(board.state(), GameState::Draw);
        assert!(board.legal_moves().is_empty());
        Ok(())
    }

    #[test]
    pub fn move_parsing_rejections() {
        // occupied cell
        assert!(Board::from_moves("11").is_err());
        // moves after the game is over
        assert!(Board::from_moves("142536").is_err());
        // not a cell number
        assert!(Board::from_moves("1a").is_err());
        assert!(Board::from_moves("10").is_err());
    }

    #[test]
    pub fn immediate_win_taken() -> Result<()> {
        // player one completes the top row
        let mut solver = Solver::new(Board::from_moves("1425")?);
        assert_eq!(solver.solve(), (WIN_BASE, Some(2)));

        // player two completes the left column
        let mut solver = Solver::new(Board::from_moves("21549")?);
        assert_eq!(solver.solve(), (-WIN_BASE, Some(6)));
        Ok(())
    }

    #[test]
    pub fn immediate_threat_blocked() -> Result<()> {
        // player two threatens the top row and player one has no win of
        // its own, so the only sound move is the block at cell 3
        let mut solver = Solver::new(Board::from_moves("5192")?);
        let (score, best_move) = solver.solve();
        assert_eq!(best_move, Some(2));
        // the block also creates a double threat, winning the game
        assert!(score > 0);
        Ok(())
    }

    #[test]
    pub fn tie_breaks_pick_the_lowest_cell() -> Result<()> {
        // all first moves draw under best play, so the first cell wins
        // the tie
        let mut solver = Solver::new(Board::new());
        assert_eq!(solver.solve(), (0, Some(0)));

        // the minimizing side breaks ties the same way: every corner
        // reply to the centre draws, and corners come before edges
        let mut solver = Solver::new(Board::from_moves("5")?);
        assert_eq!(solver.solve(), (0, Some(0)));
        Ok(())
    }

    #[test]
    pub fn solve_is_deterministic() -> Result<()> {
        let board = Board::from_moves("152")?;

        let first = Solver::new(board.clone()).solve();
        let second = Solver::new(board.clone()).solve();
        assert_eq!(first, second);

        // solving twice with one solver searches the same position again
        let mut solver = Solver::new(board);
        assert_eq!(solver.solve(), first);
        assert_eq!(solver.solve(), first);
        Ok(())
    }

    #[test]
    pub fn solved_board_is_restored() -> Result<()> {
        let mut solver = Solver::new(Board::from_moves("152")?);
        let cells_before = *solver.cells();
        let moves_before = solver.num_moves();

        solver.solve();

        assert_eq!(*solver.cells(), cells_before);
        assert_eq!(solver.num_moves(), moves_before);
        Ok(())
    }

    #[test]
    pub fn solve_on_finished_game_returns_no_move() -> Result<()> {
        let mut solver = Solver::new(Board::from_moves("14253")?);
        assert_eq!(solver.solve(), (WIN_BASE, None));

        let mut solver = Solver::new(Board::from_moves("123546879")?);
        assert_eq!(solver.solve(), (0, None));
        Ok(())
    }

    #[test]
    pub fn pruning_preserves_scores_and_moves() -> Result<()> {
        for moves in &["", "1", "5", "15", "152", "1425", "21549", "5192", "12345"] {
            let board = Board::from_moves(moves)?;

            let mut solver = Solver::new(board.clone());
            let pruned = solver.solve();
            let unpruned = reference_solve(&board);

            assert_eq!(pruned, unpruned, "position '{}' diverged", moves);
        }
        Ok(())
    }

    #[test]
    pub fn perfect_self_play_draws() -> Result<()> {
        let mut board = Board::new();

        while board.state() == GameState::Playing {
            let (score, best_move) = Solver::new(board.clone()).solve();
            // neither side can do better than a draw at any point
            assert_eq!(score, 0);
            board.play_checked(best_move.unwrap() + 1)?;
        }

        assert_eq!(board.state(), GameState::Draw);
        Ok(())
    }

    #[test]
    pub fn canonical_codes_follow_symmetry() -> Result<()> {
        // the four corner openings are one position up to symmetry, as
        // are the four edge openings
        let corners: Vec<u32> = ["1", "3", "7", "9"]
            .iter()
            .map(|m| Board::from_moves(m).unwrap().canonical_code())
            .collect();
        assert!(corners.iter().all(|&c| c == corners[0]));

        let edges: Vec<u32> = ["2", "4", "6", "8"]
            .iter()
            .map(|m| Board::from_moves(m).unwrap().canonical_code())
            .collect();
        assert!(edges.iter().all(|&c| c == edges[0]));

        assert_ne!(corners[0], edges[0]);
        assert_ne!(corners[0], Board::from_moves("5")?.canonical_code());
        Ok(())
    }

    #[test]
    pub fn transposition_table_roundtrip() -> Result<()> {
        let mut table = TranspositionTable::new();
        let code = Board::from_moves("15")?.code();

        assert_eq!(table.get(code), None);
        table.set(code, -5);
        assert_eq!(table.get(code), Some(-5));
        assert_eq!(table.get(Board::new().code()), None);
        Ok(())
    }

    #[test]
    pub fn opening_book_matches_direct_search() -> Result<()> {
        let path = std::env::temp_dir().join("tictactoe_ai_book_test.bin");
        let path = path.to_str().unwrap();

        OpeningBook::generate_to(path)?;
        let book = OpeningBook::load_from(path)?;

        for moves in &["15", "12", "51", "59", "34"] {
            let board = Board::from_moves(moves)?;

            let mut solver = Solver::new(board.clone());
            let score = solver.minimax(0, i32::MIN, i32::MAX, board.to_move());

            assert_eq!(
                book.get(board.canonical_code()),
                Some(absolute_score(score, board.num_moves())),
                "book disagrees on '{}'",
                moves
            );
        }

        // rotations of an opening share one record
        assert_eq!(
            Board::from_moves("15")?.canonical_code(),
            Board::from_moves("35")?.canonical_code()
        );

        // nothing but two-stone positions is stored
        assert_eq!(book.get(Board::new().canonical_code()), None);

        // a booked solver still returns the plain search's answer
        let mut booked = Solver::new(Board::new()).with_opening_book(book);
        assert_eq!(booked.solve(), (0, Some(0)));

        std::fs::remove_file(path).ok();
        Ok(())
    }

    #[test]
    pub fn full_search() -> Result<()> {
        let board = Board::new();
        let mut solver = Solver::new(board);
        let start_time = Instant::now();
        let (calc, best) = solver.solve();
        let finish_time = Instant::now();
        let time = finish_time - start_time;
        let posis = solver.node_count;

        println!(
            "Full game search\n Time: {:.6}s, No. of positions: {}, kpos/s: {}",
            time.as_secs_f64(),
            posis,
            posis as f64 / (1000.0 * time.as_secs_f64())
        );
        assert_eq!((calc, best), (0, Some(0)));
        Ok(())
    }
}
