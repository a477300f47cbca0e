//! Heuristic scoring strategies and the per-size goal registry.
//!
//! Three heuristics estimate the remaining cost of a board: Manhattan,
//! Euclidean and Hamming. All of them read their targets from a
//! `GoalRegistry`, which memoizes the canonical goal board and a
//! tile-to-coordinate table for every grid size it has been asked about.
//! The registry is created once at process start and passed explicitly to
//! whatever needs to score boards; entries are built lazily and never
//! invalidated.
use crate::engine::Board;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;
use thiserror::Error;

/// Raised when a heuristic name is not one of the recognized selectors.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown heuristic '{0}'; expected manhattan, euclidean, hamming or none")]
pub struct UnknownHeuristicError(pub String);

/// A scoring strategy over a board, resolved once per search by name.
///
/// Every variant returns a non-negative integer score that is 0 exactly
/// when the board matches its grid size's canonical goal. The blank is
/// scored like any other tile, as the distance and mismatch sums include
/// every position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Heuristic {
    /// Sum of per-tile row distance plus column distance to the goal cell.
    Manhattan,
    /// Sum of per-tile straight-line distances, each truncated to an
    /// integer before it joins the sum.
    Euclidean,
    /// Count of cells whose tile differs from the goal tile there.
    Hamming,
}

impl Heuristic {
    /// Resolves the four-way heuristic selector.
    ///
    /// `"none"` is a valid choice meaning no heuristic at all (uniform-cost
    /// scoring); the other three name a concrete strategy.
    ///
    /// # Examples
    /// ```
    /// use npuzzle_solver::heuristics::Heuristic;
    ///
    /// assert_eq!(Heuristic::from_name("manhattan"), Ok(Some(Heuristic::Manhattan)));
    /// assert_eq!(Heuristic::from_name("none"), Ok(None));
    /// assert!(Heuristic::from_name("misplaced").is_err());
    /// ```
    pub fn from_name(name: &str) -> Result<Option<Self>, UnknownHeuristicError> {
        match name.trim().to_lowercase().as_str() {
            "none" => Ok(None),
            other => other.parse().map(Some),
        }
    }

    /// Scores `board` against the canonical goal of its grid size.
    pub fn score(&self, board: &Board, registry: &GoalRegistry) -> u64 {
        let entry = registry.entry(board.n());
        match self {
            Heuristic::Manhattan => manhattan(board, &entry),
            Heuristic::Euclidean => euclidean(board, &entry),
            Heuristic::Hamming => hamming(board, &entry),
        }
    }
}

impl FromStr for Heuristic {
    type Err = UnknownHeuristicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "manhattan" => Ok(Heuristic::Manhattan),
            "euclidean" => Ok(Heuristic::Euclidean),
            "hamming" => Ok(Heuristic::Hamming),
            other => Err(UnknownHeuristicError(other.to_string())),
        }
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Heuristic::Manhattan => "manhattan",
            Heuristic::Euclidean => "euclidean",
            Heuristic::Hamming => "hamming",
        };
        write!(f, "{}", name)
    }
}

fn manhattan(board: &Board, entry: &GoalEntry) -> u64 {
    let n = board.n();
    board
        .tiles()
        .iter()
        .enumerate()
        .map(|(index, &tile)| {
            let (row, col) = (index / n, index % n);
            let (goal_row, goal_col) = entry.target(tile);
            (row.abs_diff(goal_row) + col.abs_diff(goal_col)) as u64
        })
        .sum()
}

fn euclidean(board: &Board, entry: &GoalEntry) -> u64 {
    let n = board.n();
    board
        .tiles()
        .iter()
        .enumerate()
        .map(|(index, &tile)| {
            let (row, col) = (index / n, index % n);
            let (goal_row, goal_col) = entry.target(tile);
            let dr = row.abs_diff(goal_row) as f64;
            let dc = col.abs_diff(goal_col) as f64;
            // Each distance is truncated before summing, matching the
            // integer accumulation of the evaluation pipeline.
            (dr * dr + dc * dc).sqrt() as u64
        })
        .sum()
}

fn hamming(board: &Board, entry: &GoalEntry) -> u64 {
    board
        .tiles()
        .iter()
        .zip(entry.goal().tiles())
        .filter(|(tile, goal_tile)| tile != goal_tile)
        .count() as u64
}

/// The canonical goal of one grid size plus its coordinate table.
#[derive(Debug)]
pub struct GoalEntry {
    goal: Rc<Board>,
    /// Target (row, column) indexed by tile value.
    coords: Vec<(usize, usize)>,
}

impl GoalEntry {
    fn build(n: usize) -> Self {
        let goal = Rc::new(Board::goal(n));
        let mut coords = vec![(0, 0); n * n];
        for (index, &tile) in goal.tiles().iter().enumerate() {
            coords[tile as usize] = (index / n, index % n);
        }
        GoalEntry { goal, coords }
    }

    /// The canonical goal board of this entry's grid size.
    pub fn goal(&self) -> &Rc<Board> {
        &self.goal
    }

    /// The (row, column) a tile value occupies in the goal layout.
    pub fn target(&self, tile: u32) -> (usize, usize) {
        self.coords[tile as usize]
    }
}

/// Process-scoped cache of goal layouts, one per grid size.
///
/// Create a registry once and share it with every search of the run;
/// entries appear the first time a grid size is scored or goal-tested and
/// are reused for the rest of the process.
///
/// # Examples
/// ```
/// use npuzzle_solver::engine::Board;
/// use npuzzle_solver::heuristics::GoalRegistry;
///
/// let registry = GoalRegistry::new();
/// assert!(registry.is_goal(&Board::goal(3)));
/// assert_eq!(registry.entry(3).target(1), (0, 0));
/// ```
#[derive(Debug, Default)]
pub struct GoalRegistry {
    entries: RefCell<HashMap<usize, Rc<GoalEntry>>>,
}

impl GoalRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entry for grid size `n`, building it on first request.
    pub fn entry(&self, n: usize) -> Rc<GoalEntry> {
        if let Some(entry) = self.entries.borrow().get(&n) {
            return Rc::clone(entry);
        }
        let entry = Rc::new(GoalEntry::build(n));
        self.entries.borrow_mut().insert(n, Rc::clone(&entry));
        entry
    }

    /// True if `board` matches the canonical goal of its own grid size,
    /// compared by tile content.
    pub fn is_goal(&self, board: &Board) -> bool {
        *self.entry(board.n()).goal == *board
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(tiles: Vec<u32>, heuristic: Option<Heuristic>) -> Board {
        Board::new(tiles, heuristic).unwrap()
    }

    #[test]
    fn test_all_heuristics_are_zero_on_the_goal() {
        let registry = GoalRegistry::new();
        for n in 2..=4 {
            let goal = Board::goal(n);
            for heuristic in [Heuristic::Manhattan, Heuristic::Euclidean, Heuristic::Hamming] {
                assert_eq!(
                    heuristic.score(&goal, &registry),
                    0,
                    "{} must be 0 on goal({})",
                    heuristic,
                    n
                );
            }
        }
    }

    #[test]
    fn test_manhattan_counts_blank_and_tile_displacement() {
        let registry = GoalRegistry::new();
        // Goal of size 3 with the blank moved up: tiles 0 and 2 are each
        // one cell away from home.
        let one_move = board(vec![1, 0, 3, 8, 2, 4, 7, 6, 5], None);
        assert_eq!(Heuristic::Manhattan.score(&one_move, &registry), 2);
    }

    #[test]
    fn test_hamming_counts_mismatched_cells() {
        let registry = GoalRegistry::new();
        let one_move = board(vec![1, 0, 3, 8, 2, 4, 7, 6, 5], None);
        assert_eq!(Heuristic::Hamming.score(&one_move, &registry), 2);
    }

    #[test]
    fn test_euclidean_truncates_each_distance() {
        let registry = GoalRegistry::new();
        // Swap tiles 1 and 0 across the diagonal: each is sqrt(2) away,
        // truncated to 1 per tile rather than 2.83 overall.
        let diagonal = board(vec![0, 2, 3, 8, 1, 4, 7, 6, 5], None);
        assert_eq!(Heuristic::Euclidean.score(&diagonal, &registry), 2);
        assert_eq!(Heuristic::Manhattan.score(&diagonal, &registry), 4);
    }

    #[test]
    fn test_registry_reuses_entries() {
        let registry = GoalRegistry::new();
        let first = registry.entry(3);
        let second = registry.entry(3);
        assert!(Rc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_registry_goal_detection() {
        let registry = GoalRegistry::new();
        assert!(registry.is_goal(&Board::goal(2)));
        assert!(registry.is_goal(&Board::goal(3)));
        assert!(!registry.is_goal(&board(vec![1, 0, 3, 8, 2, 4, 7, 6, 5], None)));
    }

    #[test]
    fn test_coordinate_table_matches_goal_layout() {
        let registry = GoalRegistry::new();
        let entry = registry.entry(3);
        // goal(3) = 1 2 3 / 8 0 4 / 7 6 5
        assert_eq!(entry.target(1), (0, 0));
        assert_eq!(entry.target(4), (1, 2));
        assert_eq!(entry.target(0), (1, 1));
        assert_eq!(entry.target(5), (2, 2));
    }

    #[test]
    fn test_evaluation_formula_and_initial_board_quirk() {
        let registry = GoalRegistry::new();

        // Any initial board scores 0: g is 0, and the whole formula is
        // scaled by g.
        let scrambled = board(vec![8, 1, 3, 7, 2, 4, 0, 6, 5], Some(Heuristic::Manhattan));
        assert_eq!(scrambled.evaluation(&registry), 0);

        // A first child of the goal has h = 2 and g = 1: 2 * 10 * 1 + 1.
        let goal = Rc::new(board(
            Board::goal(3).tiles().to_vec(),
            Some(Heuristic::Manhattan),
        ));
        let child = Board::children(&goal).remove(0);
        assert_eq!(child.evaluation(&registry), 21);
        // Memoized: asking again returns the same score.
        assert_eq!(child.evaluation(&registry), 21);
    }

    #[test]
    fn test_evaluation_without_heuristic_is_path_cost() {
        let registry = GoalRegistry::new();
        let goal = Rc::new(Board::goal(3));
        let child = Board::children(&goal).remove(0);
        let grandchild = Board::children(&child).remove(0);
        assert_eq!(goal.evaluation(&registry), 0);
        assert_eq!(child.evaluation(&registry), 1);
        assert_eq!(grandchild.evaluation(&registry), 2);
    }

    #[test]
    fn test_heuristic_names() {
        assert_eq!("manhattan".parse(), Ok(Heuristic::Manhattan));
        assert_eq!(" Euclidean ".parse(), Ok(Heuristic::Euclidean));
        assert_eq!("hamming".parse(), Ok(Heuristic::Hamming));
        assert_eq!(Heuristic::from_name("none"), Ok(None));
        assert_eq!(
            Heuristic::from_name("misplaced"),
            Err(UnknownHeuristicError("misplaced".to_string()))
        );
    }
}
