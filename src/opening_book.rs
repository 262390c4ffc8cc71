use anyhow::Result;
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use indicatif::*;
use rayon::prelude::*;

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::rc::Rc;
use std::time::Instant;

use crate::{
    board::{Board, Player},
    solver::{absolute_score, Solver},
    CELLS,
};

pub const BOOK_PATH: &str = "opening_book.bin";
/// Stone count at which the tree search probes the book
pub const BOOK_DEPTH: usize = 2;

// bytes per record: u32 canonical code + i8 score
const ENTRY_BYTES: usize = 5;

/// Exact scores for every opening, precomputed and stored on disk
///
/// One entry covers a whole symmetry class: positions are keyed by their
/// canonical code, so all 8 rotations and reflections of an opening share
/// a record.
#[derive(Clone)]
pub struct OpeningBook(Rc<OpeningBookStorage>);

impl OpeningBook {
    pub fn load() -> Result<Self> {
        Self::load_from(BOOK_PATH)
    }

    pub fn load_from(path: &str) -> Result<Self> {
        Ok(Self(Rc::new(OpeningBookStorage::load(path)?)))
    }

    pub fn generate() -> Result<()> {
        Self::generate_to(BOOK_PATH)
    }

    /// Solves every distinct opening with `BOOK_DEPTH` stones and writes
    /// the scores out as sorted big-endian records
    pub fn generate_to(path: &str) -> Result<()> {
        let start = Instant::now();

        // enumerate the ordered two-move openings, keeping one board per
        // symmetry class
        let mut positions: Vec<(u32, Board)> = Vec::new();
        for first in 0..CELLS {
            for second in 0..CELLS {
                if second == first {
                    continue;
                }
                let mut board = Board::new();
                board.play(first, Player::One);
                board.play(second, Player::Two);

                let code = board.canonical_code();
                if !positions.iter().any(|(seen, _)| *seen == code) {
                    positions.push((code, board));
                }
            }
        }

        let progress = ProgressBar::new(positions.len() as u64);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("Solving openings: {bar:40.cyan/blue} {pos}/{len} ~{eta} remaining")
                .progress_chars("█▓▒░  "),
        );

        let mut entries: Vec<(u32, i8)> = positions
            .par_iter()
            .map(|(code, board)| {
                let mut solver = Solver::new(board.clone());
                // searching from the position itself keeps the stored
                // score on the BOOK_DEPTH basis the probe expects
                let score = solver.minimax(0, i32::MIN, i32::MAX, board.to_move());

                progress.inc(1);
                (*code, absolute_score(score, BOOK_DEPTH) as i8)
            })
            .collect();
        progress.finish();

        entries.sort_unstable();

        let mut file = BufWriter::new(File::create(path)?);
        for (code, score) in entries {
            file.write_u32::<BigEndian>(code)?;
            file.write_i8(score)?;
        }

        println!(
            "Opening book generation completed in {}",
            HumanDuration(start.elapsed())
        );

        Ok(())
    }
}

pub struct OpeningBookStorage {
    positions: Vec<u32>,
    scores: Vec<i8>,
}

impl OpeningBookStorage {
    fn load(path: &str) -> Result<Self> {
        let size = std::fs::metadata(path)?.len() as usize / ENTRY_BYTES;
        let mut file = BufReader::new(File::open(path)?);

        let mut positions = Vec::with_capacity(size);
        let mut scores = Vec::with_capacity(size);
        for _ in 0..size {
            positions.push(file.read_u32::<BigEndian>()?);
            scores.push(file.read_i8()?);
        }
        Ok(Self { positions, scores })
    }

    /// Looks up the stored score of a canonical position code
    pub fn get(&self, code: u32) -> Option<i32> {
        self.positions
            .binary_search(&code)
            .ok()
            .map(|i| self.scores[i] as i32)
    }
}

impl std::ops::Deref for OpeningBook {
    type Target = OpeningBookStorage;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
