use anyhow::Result;
use crossterm::{
    style::{style, Attribute, Color, PrintStyledContent},
    QueueableCommand,
};

use std::io::{stdout, Write};

use tictactoe_ai::{Board, Cell, SIDE};

/// Draws the board, showing the cell number dimmed in each empty cell
pub fn draw(board: &Board) -> Result<()> {
    let mut stdout = stdout();

    stdout.queue(PrintStyledContent(style("\n".to_string())))?;
    for (idx, cell) in board.cells().iter().enumerate() {
        let content = match cell {
            Cell::PlayerOne => style("X".to_string())
                .attribute(Attribute::Bold)
                .with(Color::Red),
            Cell::PlayerTwo => style("O".to_string())
                .attribute(Attribute::Bold)
                .with(Color::Yellow),
            Cell::Empty => style((idx + 1).to_string()).with(Color::DarkGrey),
        };
        stdout.queue(PrintStyledContent(content))?;

        if (idx + 1) % SIDE == 0 {
            stdout.queue(PrintStyledContent(style("\n".to_string())))?;
            if idx + 1 < SIDE * SIDE {
                stdout.queue(PrintStyledContent(style(
                    "-".repeat(SIDE * 4 - 3) + "\n",
                )))?;
            }
        } else {
            stdout.queue(PrintStyledContent(style(" | ".to_string())))?;
        }
    }
    stdout.queue(PrintStyledContent(style("\n".to_string())))?;
    stdout.flush()?;
    Ok(())
}
