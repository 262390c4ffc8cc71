use anyhow::Result;
use rand::Rng;

use std::cmp::Ordering;
use std::io::{stdin, stdout, Stdin, Write};

use tictactoe_ai::*;

mod render;

#[derive(Copy, Clone, Eq, PartialEq)]
enum Controller {
    Human,
    Solver,
    Random,
}

fn main() -> Result<()> {
    let mut board = Board::new();
    // keep the transposition table out here so each solver starts from it
    let transposition_table = TranspositionTable::new();

    let stdin = stdin();

    println!("Welcome to Tic-Tac-Toe\n");

    // check for an opening book
    let mut opening_book: Option<OpeningBook> = None;
    match OpeningBook::load() {
        Ok(book) => opening_book = Some(book),
        Err(err) => match err.root_cause().downcast_ref::<std::io::Error>() {
            Some(io_error) if io_error.kind() == std::io::ErrorKind::NotFound => loop {
                print!("Opening book not found, would you like to generate one?\ny/n: ");
                stdout().flush().expect("failed to flush to stdout!");

                let mut buffer = String::new();
                stdin.read_line(&mut buffer)?;

                match buffer.to_lowercase().chars().next() {
                    Some('y') => {
                        OpeningBook::generate()?;
                        opening_book = Some(OpeningBook::load()?);
                        break;
                    }
                    Some('n') => {
                        println!("Skipping book generation, openings will be searched from scratch");
                        break;
                    }
                    _ => println!("Unknown answer given"),
                }
            },
            _ => println!("Error reading opening book: {}", err.root_cause()),
        },
    }

    let controllers = (
        choose_controller(&stdin, 1)?,
        choose_controller(&stdin, 2)?,
    );

    // game loop
    loop {
        render::draw(&board).expect("Failed to draw board!");

        match board.state() {
            GameState::Playing => {
                let controller = if board.to_move() == Player::One {
                    controllers.0
                } else {
                    controllers.1
                };

                let next_move = match controller {
                    Controller::Solver => {
                        println!("AI is thinking...");
                        stdout().flush().expect("Failed to flush to stdout!");

                        // slow down play if no human is involved
                        if controllers.0 != Controller::Human && controllers.1 != Controller::Human
                        {
                            std::thread::sleep(std::time::Duration::new(1, 0));
                        }

                        let mut solver = Solver::new_with_transposition_table(
                            board.clone(),
                            transposition_table.clone(),
                        );
                        if let Some(book) = opening_book.clone() {
                            solver = solver.with_opening_book(book);
                        }

                        let (score, best_move) = solver.solve();
                        announce(&solver, score);

                        // the game is not over here, so a move exists
                        let best_move = best_move.unwrap() + 1;
                        println!("Best move: {}", best_move);
                        best_move
                    }

                    Controller::Random => {
                        let legal = board.legal_moves();
                        let choice = legal[rand::thread_rng().gen_range(0..legal.len())] + 1;
                        println!("Random player picks {}", choice);
                        choice
                    }

                    Controller::Human => {
                        print!("Move input > ");
                        stdout().flush().expect("Failed to flush to stdout!");
                        let mut input_str = String::new();
                        stdin.read_line(&mut input_str)?;

                        match input_str.trim().parse::<usize>() {
                            Err(_) => {
                                println!("Invalid number: {}", input_str.trim());
                                continue;
                            }
                            Ok(cell) => cell,
                        }
                    }
                };

                if let Err(err) = board.play_checked(next_move) {
                    println!("{}", err);
                    // try the move again
                    continue;
                }
            }

            // end states
            GameState::PlayerOneWin => {
                println!("Player 1 wins!");
                break;
            }
            GameState::PlayerTwoWin => {
                println!("Player 2 wins!");
                break;
            }
            GameState::Draw => {
                println!("Draw!");
                break;
            }
        }
    }
    Ok(())
}

fn choose_controller(stdin: &Stdin, player: usize) -> Result<Controller> {
    loop {
        let mut buffer = String::new();
        print!("Player {} control - (h)uman, (a)i or (r)andom: ", player);
        stdout().flush().expect("failed to flush to stdout!");
        stdin.read_line(&mut buffer)?;
        match buffer.to_lowercase().chars().next() {
            Some('h') => return Ok(Controller::Human),
            Some('a') => return Ok(Controller::Solver),
            Some('r') => return Ok(Controller::Random),
            _ => println!("Unknown answer given"),
        }
    }
}

fn announce(solver: &Solver, score: i32) {
    let distance = solver.score_to_win_distance(score);
    let move_string = if distance == 1 { "move" } else { "moves" };
    match score.cmp(&0) {
        Ordering::Greater => println!(
            "Player 1 can force a win in at most {} {}.",
            distance, move_string
        ),
        Ordering::Less => println!(
            "Player 2 can force a win in at most {} {}.",
            distance, move_string
        ),
        Ordering::Equal => println!(
            "Best play leads to a draw, {} {} remaining.",
            distance, move_string
        ),
    }
}
