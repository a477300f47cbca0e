//! # N-Puzzle Solver Library
//!
//! This library provides the search engine for the sliding-tile (N-puzzle)
//! problem: given a square grid of numbered tiles and one blank, find a
//! sequence of blank moves that reaches the canonical goal layout.
//!
//! It is used by one binary:
//! - `npuzzle`: reads or generates a puzzle, checks solvability, runs the
//!   chosen search and prints the solution path.
//!
//! ## Modules
//! - `engine`: the board representation (`Board`), successor generation,
//!   the spiral goal layout, the inversion-parity solvability test and
//!   parent-chain path reconstruction.
//! - `heuristics`: the `Heuristic` scoring strategies (Manhattan,
//!   Euclidean, Hamming) and the `GoalRegistry` that caches each grid
//!   size's goal board and coordinate table.
//! - `solver`: the `Algorithm` selector and the greedy, A* and
//!   uniform-cost searches, all returning a `Solution` path.
//! - `utils`: puzzle-text parsing, random solvable puzzle generation and
//!   path rendering.

pub mod engine;
pub mod heuristics;
pub mod solver;
pub mod utils;

// Items live under their module path, e.g. `npuzzle_solver::engine::Board`;
// the top-level namespace stays clean on purpose.
