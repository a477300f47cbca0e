//! Loader and writer utilities around the search core.
//!
//! This module parses the textual puzzle format, generates random solvable
//! puzzles, and renders solution paths for display. None of it is needed
//! to run a search; the core operates on validated in-memory boards.
use crate::engine::Board;
use rand::seq::SliceRandom;
use rand::Rng;
use std::rc::Rc;
use thiserror::Error;

/// Errors raised while reading the textual puzzle format.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    /// The input held no values at all.
    #[error("input contains no values")]
    Empty,
    /// A token was not a non-negative integer.
    #[error("non-numeric token '{0}'")]
    NonNumeric(String),
    /// The first value line must hold the grid size and nothing else.
    #[error("the first value line must hold the grid size alone")]
    NoSize,
    /// Grids smaller than 2x2 have nothing to solve.
    #[error("grid size must be at least 2, got {0}")]
    SizeTooSmall(usize),
    /// A tile row held the wrong number of values.
    #[error("line {line} holds {found} values, expected {expected}")]
    WrongRowWidth {
        line: usize,
        found: usize,
        expected: usize,
    },
    /// A tile value appeared twice.
    #[error("duplicate tile value {0}")]
    Duplicate(u32),
    /// A tile value does not fit the declared grid size.
    #[error("tile value {value} exceeds the maximum {max}")]
    OverMax { value: u32, max: u32 },
    /// The rows ended before the grid was full.
    #[error("expected {expected} tiles, found {found}")]
    WrongTileCount { expected: usize, found: usize },
}

/// Parses the textual puzzle format into a grid size and tile sequence.
///
/// The format is line oriented: `#` starts a comment that runs to the end
/// of the line, blank lines are skipped, the first value line holds the
/// single number `n`, and each following line holds exactly `n` tiles.
/// Values must stay below `n * n` and must not repeat; the rows together
/// must fill the grid exactly.
///
/// The returned tiles are ready for `Board::new`, which re-checks the
/// permutation as part of its own contract.
///
/// # Examples
/// ```
/// use npuzzle_solver::utils::parse_tiles;
///
/// let text = "# a solved 3-puzzle\n3\n1 2 3\n8 0 4\n7 6 5\n";
/// let (n, tiles) = parse_tiles(text).unwrap();
/// assert_eq!(n, 3);
/// assert_eq!(tiles, vec![1, 2, 3, 8, 0, 4, 7, 6, 5]);
/// ```
pub fn parse_tiles(text: &str) -> Result<(usize, Vec<u32>), InputError> {
    let mut n: Option<usize> = None;
    let mut tiles: Vec<u32> = Vec::new();
    let mut seen: Vec<bool> = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line = match raw.find('#') {
            Some(comment) => &raw[..comment],
            None => raw,
        };

        let mut values = Vec::new();
        for token in line.split_whitespace() {
            let value: u32 = token
                .parse()
                .map_err(|_| InputError::NonNumeric(token.to_string()))?;
            values.push(value);
        }
        if values.is_empty() {
            continue;
        }

        match n {
            None => {
                if values.len() != 1 {
                    return Err(InputError::NoSize);
                }
                let size = values[0] as usize;
                if size < 2 {
                    return Err(InputError::SizeTooSmall(size));
                }
                seen = vec![false; size * size];
                n = Some(size);
            }
            Some(size) => {
                if values.len() != size {
                    return Err(InputError::WrongRowWidth {
                        line: index + 1,
                        found: values.len(),
                        expected: size,
                    });
                }
                let max = (size * size - 1) as u32;
                for value in values {
                    if value > max {
                        return Err(InputError::OverMax { value, max });
                    }
                    if seen[value as usize] {
                        return Err(InputError::Duplicate(value));
                    }
                    seen[value as usize] = true;
                    tiles.push(value);
                }
            }
        }
    }

    let size = n.ok_or(InputError::Empty)?;
    if tiles.len() != size * size {
        return Err(InputError::WrongTileCount {
            expected: size * size,
            found: tiles.len(),
        });
    }

    Ok((size, tiles))
}

/// Generates a random solvable tile permutation for grid size `n`.
///
/// Shuffles `0..n*n` and retries until the permutation passes the
/// solvability test. Half of all permutations pass, so the retry loop is
/// short in expectation. A seeded generator makes the result reproducible.
///
/// # Errors
/// `InputError::SizeTooSmall` when `n` is below 2.
pub fn random_tiles<R: Rng>(n: usize, rng: &mut R) -> Result<Vec<u32>, InputError> {
    if n < 2 {
        return Err(InputError::SizeTooSmall(n));
    }

    let mut tiles: Vec<u32> = (0..(n * n) as u32).collect();
    loop {
        tiles.shuffle(rng);
        // The shuffle preserves the permutation, so construction cannot fail.
        let board = Board::new(tiles.clone(), None)
            .expect("shuffled tiles remain a valid permutation");
        if !board.is_unsolvable() {
            return Ok(tiles);
        }
    }
}

/// Renders a solution path as pretty n-by-n grids separated by blank lines.
pub fn render_pretty(path: &[Rc<Board>]) -> String {
    path.iter()
        .map(|board| board.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders a solution path as one flat tile list per line.
pub fn render_flat(path: &[Rc<Board>]) -> String {
    let mut output = String::new();
    for board in path {
        output.push_str(&format!("{:?}\n", board.tiles()));
    }
    output
}
