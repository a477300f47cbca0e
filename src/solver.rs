//! Best-first search over the puzzle state space.
//!
//! Three algorithms share one contract: take a validated initial board and
//! return the ordered path of boards from it to the goal, or to the best
//! board reached when the search space runs out. Exhaustion is a terminal
//! outcome, not an error; `Solution::reached_goal` tells the two apart.
//!
//! The closed set deduplicates boards by tile content while the open
//! frontier orders them by score. Those two relations disagree on
//! "sameness" on purpose; see the `engine` module docs.
use crate::engine::Board;
use crate::heuristics::GoalRegistry;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;
use thiserror::Error;

/// Raised when an algorithm name is not one of the recognized selectors.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown algorithm '{0}'; expected greedy, astar or uniform")]
pub struct UnknownAlgorithmError(pub String);

/// The search strategy to run, resolved once per search by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Algorithm {
    /// Myopic best-first: follows the best immediate child only.
    Greedy,
    /// Global best-first over an open frontier ordered by f.
    AStar,
    /// Dijkstra-style search ordered purely by path cost.
    Uniform,
}

impl FromStr for Algorithm {
    type Err = UnknownAlgorithmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "greedy" => Ok(Algorithm::Greedy),
            "astar" => Ok(Algorithm::AStar),
            "uniform" => Ok(Algorithm::Uniform),
            other => Err(UnknownAlgorithmError(other.to_string())),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Algorithm::Greedy => "greedy",
            Algorithm::AStar => "astar",
            Algorithm::Uniform => "uniform",
        };
        write!(f, "{}", name)
    }
}

/// The outcome of one search invocation.
///
/// `path` always starts at the initial board. When `reached_goal` is true
/// the last board is the canonical goal; otherwise the search exhausted
/// its candidates and the path leads to the last board it stood on.
#[derive(Clone, Debug)]
pub struct Solution {
    /// Ordered boards from the initial board to the final one.
    pub path: Vec<Rc<Board>>,
    /// Whether the final board is the goal.
    pub reached_goal: bool,
}

impl Solution {
    /// Number of blank moves along the path.
    pub fn moves(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    /// The last board of the path: the goal, or the best board reached.
    pub fn final_board(&self) -> &Rc<Board> {
        self.path
            .last()
            .expect("a solution path always holds the initial board")
    }
}

/// Runs the selected algorithm from `initial` to the goal of its grid size.
///
/// The caller is expected to have checked `Board::is_unsolvable` first;
/// searching an unsolvable board terminates only after the whole reachable
/// component has been expanded.
pub fn solve(algorithm: Algorithm, initial: Rc<Board>, registry: &GoalRegistry) -> Solution {
    match algorithm {
        Algorithm::Greedy => solve_greedy(initial, registry),
        Algorithm::AStar => best_first(initial, registry, |board, registry| {
            board.evaluation(registry)
        }),
        Algorithm::Uniform => {
            best_first(initial, registry, |board, _| u64::from(board.path_cost()))
        }
    }
}

/// Greedy best-first search.
///
/// Keeps only a closed set and always steps to the lowest-scored child of
/// the current board, ignoring everything discovered earlier. Ties go to
/// the first-generated child. This strategy is deliberately myopic: it is
/// not guaranteed optimal, and on some solvable boards it walks into a
/// dead end where every child is already closed. That dead end ends the
/// search with a best-effort path.
fn solve_greedy(initial: Rc<Board>, registry: &GoalRegistry) -> Solution {
    let mut closed: HashSet<Rc<Board>> = HashSet::new();
    let mut current = initial;
    let mut reached_goal = registry.is_goal(&current);

    while !reached_goal {
        closed.insert(Rc::clone(&current));

        let next = Board::children(&current)
            .into_iter()
            .filter(|child| !closed.contains(child))
            .min_by_key(|child| child.evaluation(registry));

        match next {
            Some(child) => current = child,
            None => break,
        }
        reached_goal = registry.is_goal(&current);
    }

    Solution {
        path: Board::collect_path(&current),
        reached_goal,
    }
}

/// An open-frontier entry: the board plus the key it was inserted under.
///
/// Entries order by key first and insertion sequence second, so exact key
/// ties resolve to the earliest-inserted board. The comparison is reversed
/// to turn `BinaryHeap` into a min-heap.
struct OpenEntry {
    key: u64,
    seq: u64,
    board: Rc<Board>,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.seq == other.seq
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .key
            .cmp(&self.key)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Frontier-driven best-first search, shared by A* and uniform-cost.
///
/// A* keys the frontier by the memoized f score; uniform-cost keys it by
/// g alone. Children already expanded are dropped before insertion, and a
/// board rediscovered along a different path keeps its first-inserted
/// entry rather than being reconciled by cost; later duplicates of an
/// already-expanded board are skipped when popped. The search ends when
/// the goal is selected for expansion or the frontier empties.
fn best_first(
    initial: Rc<Board>,
    registry: &GoalRegistry,
    key: impl Fn(&Board, &GoalRegistry) -> u64,
) -> Solution {
    let mut closed: HashSet<Rc<Board>> = HashSet::new();
    let mut open: BinaryHeap<OpenEntry> = BinaryHeap::new();
    let mut seq: u64 = 0;
    let mut current = initial;
    let mut reached_goal = registry.is_goal(&current);

    while !reached_goal {
        closed.insert(Rc::clone(&current));

        for child in Board::children(&current) {
            if closed.contains(&child) {
                continue;
            }
            open.push(OpenEntry {
                key: key(&child, registry),
                seq,
                board: child,
            });
            seq += 1;
        }

        let mut next = None;
        while let Some(entry) = open.pop() {
            if !closed.contains(&entry.board) {
                next = Some(entry.board);
                break;
            }
        }

        match next {
            Some(board) => current = board,
            None => break,
        }
        reached_goal = registry.is_goal(&current);
    }

    Solution {
        path: Board::collect_path(&current),
        reached_goal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristics::Heuristic;

    fn board(tiles: Vec<u32>, heuristic: Option<Heuristic>) -> Rc<Board> {
        Rc::new(Board::new(tiles, heuristic).unwrap())
    }

    /// Consecutive path boards must differ by exactly one adjacent swap.
    fn assert_path_is_a_move_sequence(solution: &Solution) {
        for pair in solution.path.windows(2) {
            let differing = pair[0]
                .tiles()
                .iter()
                .zip(pair[1].tiles())
                .filter(|(a, b)| a != b)
                .count();
            assert_eq!(differing, 2, "path boards must differ by one swap");
        }
    }

    #[test]
    fn test_algorithm_names() {
        assert_eq!("greedy".parse(), Ok(Algorithm::Greedy));
        assert_eq!(" AStar ".parse(), Ok(Algorithm::AStar));
        assert_eq!("uniform".parse(), Ok(Algorithm::Uniform));
        assert_eq!(
            "bfs".parse::<Algorithm>(),
            Err(UnknownAlgorithmError("bfs".to_string()))
        );
    }

    #[test]
    fn test_search_on_the_goal_is_a_singleton_path() {
        let registry = GoalRegistry::new();
        for algorithm in [Algorithm::Greedy, Algorithm::AStar, Algorithm::Uniform] {
            let goal = board(Board::goal(3).tiles().to_vec(), Some(Heuristic::Manhattan));
            let solution = solve(algorithm, Rc::clone(&goal), &registry);
            assert!(solution.reached_goal);
            assert_eq!(solution.path.len(), 1);
            assert_eq!(solution.moves(), 0);
            assert!(Rc::ptr_eq(&solution.path[0], &goal));
        }
    }

    #[test]
    fn test_greedy_solves_a_one_move_board() {
        let registry = GoalRegistry::new();
        let initial = board(vec![1, 0, 3, 8, 2, 4, 7, 6, 5], Some(Heuristic::Manhattan));
        let solution = solve(Algorithm::Greedy, Rc::clone(&initial), &registry);

        assert!(solution.reached_goal);
        assert_eq!(solution.path.len(), 2);
        assert!(Rc::ptr_eq(&solution.path[0], &initial));
        assert_eq!(solution.final_board().tiles(), Board::goal(3).tiles());
        assert_path_is_a_move_sequence(&solution);
    }

    #[test]
    fn test_greedy_reports_exhaustion_as_best_effort() {
        let registry = GoalRegistry::new();
        // Unsolvable 2x2 board: greedy wanders its 12-state component and
        // runs out of unvisited children without ever finding the goal.
        let initial = board(vec![2, 1, 0, 3], Some(Heuristic::Manhattan));
        let solution = solve(Algorithm::Greedy, Rc::clone(&initial), &registry);

        assert!(!solution.reached_goal);
        assert!(Rc::ptr_eq(&solution.path[0], &initial));
        assert_path_is_a_move_sequence(&solution);
    }

    #[test]
    fn test_astar_reaches_the_goal_with_a_consistent_path() {
        let registry = GoalRegistry::new();
        // Four blank moves away from goal(3).
        let initial = board(vec![8, 1, 3, 7, 2, 4, 0, 6, 5], Some(Heuristic::Manhattan));
        let solution = solve(Algorithm::AStar, Rc::clone(&initial), &registry);

        assert!(solution.reached_goal);
        assert!(Rc::ptr_eq(&solution.path[0], &initial));
        assert_eq!(solution.final_board().tiles(), Board::goal(3).tiles());
        assert_eq!(
            solution.path.len(),
            solution.final_board().path_cost() as usize + 1
        );
        assert_path_is_a_move_sequence(&solution);
    }

    #[test]
    fn test_astar_is_deterministic() {
        let registry = GoalRegistry::new();
        let tiles = vec![8, 1, 3, 7, 2, 4, 0, 6, 5];
        let first = solve(
            Algorithm::AStar,
            board(tiles.clone(), Some(Heuristic::Hamming)),
            &registry,
        );
        let second = solve(
            Algorithm::AStar,
            board(tiles, Some(Heuristic::Hamming)),
            &registry,
        );

        let first_tiles: Vec<&[u32]> = first.path.iter().map(|b| b.tiles()).collect();
        let second_tiles: Vec<&[u32]> = second.path.iter().map(|b| b.tiles()).collect();
        assert_eq!(first_tiles, second_tiles);
    }

    #[test]
    fn test_uniform_finds_a_shortest_path() {
        let registry = GoalRegistry::new();
        // Two blank moves away from goal(3): up then left, reversed.
        let initial = board(vec![0, 1, 3, 8, 2, 4, 7, 6, 5], None);
        let solution = solve(Algorithm::Uniform, Rc::clone(&initial), &registry);

        assert!(solution.reached_goal);
        assert_eq!(solution.path.len(), 3);
        assert_eq!(solution.moves(), 2);
        assert_path_is_a_move_sequence(&solution);
    }

    #[test]
    fn test_uniform_solves_a_scrambled_board_optimally() {
        let registry = GoalRegistry::new();
        // Four moves out; the displaced tiles carry a total Manhattan
        // distance of 4, so no shorter route exists.
        let initial = board(vec![8, 1, 3, 7, 2, 4, 0, 6, 5], None);
        let solution = solve(Algorithm::Uniform, Rc::clone(&initial), &registry);

        assert!(solution.reached_goal);
        assert_eq!(solution.moves(), 4);
        assert_path_is_a_move_sequence(&solution);
    }

    #[test]
    fn test_uniform_exhausts_an_unsolvable_component() {
        let registry = GoalRegistry::new();
        let initial = board(vec![2, 1, 0, 3], None);
        let solution = solve(Algorithm::Uniform, Rc::clone(&initial), &registry);

        assert!(!solution.reached_goal);
        assert!(Rc::ptr_eq(&solution.path[0], &initial));
        assert_path_is_a_move_sequence(&solution);
    }
}
